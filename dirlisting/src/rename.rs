//! In-place rename: the delayed trigger, the edit field and the session.
//!
//! State machine: `Idle -> Armed -> Editing -> Idle`. A second click on the
//! sole selected row arms a deadline; when the host polls past it the row
//! enters editing unless a double click landed in the meantime. Editing ends
//! with a [`Resolution`], after which the controller issues the request.

use std::time::{Duration, Instant};

use log::{debug, trace};

use crate::error::ListingError;
use crate::events::{Key, KeyCombo};

/// Result of feeding a key to the edit field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditResult {
    /// Text was modified.
    Changed,
    /// Key was handled but text didn't change (e.g., cursor movement).
    Handled,
    /// Enter: leave the field through the commit path.
    Commit,
    /// Escape: leave the field discarding the edit.
    Cancel,
    /// Key was not handled.
    Ignored,
}

/// Single-line text field used while a row is being renamed.
///
/// Cursor and anchor are character indices.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditField {
    text: String,
    cursor: usize,
    anchor: Option<usize>,
}

impl EditField {
    /// Field pre-filled with `name`, selecting the name without its extension.
    ///
    /// The selection ends before the last `.`; with no `.` the whole name is
    /// selected.
    pub fn new(name: &str) -> Self {
        let len = name.chars().count();
        let stem_end = name
            .rfind('.')
            .map(|byte| name[..byte].chars().count())
            .unwrap_or(len);
        Self {
            text: name.to_string(),
            cursor: stem_end,
            anchor: Some(0),
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Get the selection range as (start, end) where start <= end.
    pub fn selection(&self) -> Option<(usize, usize)> {
        self.anchor.and_then(|a| {
            if a == self.cursor {
                None
            } else if a < self.cursor {
                Some((a, self.cursor))
            } else {
                Some((self.cursor, a))
            }
        })
    }

    pub fn select_all(&mut self) {
        if !self.text.is_empty() {
            self.anchor = Some(0);
            self.cursor = self.text.chars().count();
        }
    }

    /// Handle a key press.
    pub fn handle_key(&mut self, combo: KeyCombo) -> EditResult {
        let modifiers = combo.modifiers;
        match combo.key {
            Key::Enter => EditResult::Commit,
            Key::Escape => EditResult::Cancel,
            Key::Char('a') if modifiers.toggle() => {
                self.select_all();
                EditResult::Handled
            }
            Key::Char(c) if !modifiers.toggle() && !modifiers.alt => {
                self.insert_char(c);
                EditResult::Changed
            }
            Key::Backspace => self.erase(false),
            Key::Delete => self.erase(true),
            Key::Left => {
                self.move_cursor(-1, modifiers.shift);
                EditResult::Handled
            }
            Key::Right => {
                self.move_cursor(1, modifiers.shift);
                EditResult::Handled
            }
            Key::Home => {
                self.move_to(0, modifiers.shift);
                EditResult::Handled
            }
            Key::End => {
                self.move_to(self.text.chars().count(), modifiers.shift);
                EditResult::Handled
            }
            _ => EditResult::Ignored,
        }
    }

    fn insert_char(&mut self, c: char) {
        if let Some((start, end)) = self.selection() {
            self.remove_range(start, end);
            self.cursor = start;
        }
        let byte = char_to_byte_index(&self.text, self.cursor);
        self.text.insert(byte, c);
        self.cursor += 1;
        self.anchor = None;
    }

    fn erase(&mut self, forward: bool) -> EditResult {
        if let Some((start, end)) = self.selection() {
            self.remove_range(start, end);
            self.cursor = start;
            self.anchor = None;
            return EditResult::Changed;
        }
        self.anchor = None;
        let len = self.text.chars().count();
        if forward && self.cursor < len {
            self.remove_range(self.cursor, self.cursor + 1);
            EditResult::Changed
        } else if !forward && self.cursor > 0 {
            self.remove_range(self.cursor - 1, self.cursor);
            self.cursor -= 1;
            EditResult::Changed
        } else {
            EditResult::Handled
        }
    }

    fn move_cursor(&mut self, delta: i32, extend: bool) {
        if !extend
            && let Some((start, end)) = self.selection()
        {
            self.cursor = if delta < 0 { start } else { end };
            self.anchor = None;
            return;
        }
        let len = self.text.chars().count() as i32;
        let target = (self.cursor as i32 + delta).clamp(0, len) as usize;
        self.move_to(target, extend);
    }

    fn move_to(&mut self, target: usize, extend: bool) {
        if extend && self.anchor.is_none() {
            self.anchor = Some(self.cursor);
        } else if !extend {
            self.anchor = None;
        }
        self.cursor = target;
    }

    fn remove_range(&mut self, start: usize, end: usize) {
        let from = char_to_byte_index(&self.text, start);
        let to = char_to_byte_index(&self.text, end);
        self.text.replace_range(from..to, "");
    }
}

/// Convert character index to byte index in a string.
fn char_to_byte_index(s: &str, char_idx: usize) -> usize {
    s.char_indices()
        .nth(char_idx)
        .map(|(i, _)| i)
        .unwrap_or(s.len())
}

/// How an edit session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// Focus left the field (Enter or a click elsewhere).
    Commit,
    /// Escape.
    Cancel,
}

/// What a finished rename did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenameOutcome {
    /// Cancelled, or the value was left as it was. No request issued.
    Unchanged,
    /// Renamed to the new name.
    Renamed(String),
    /// The new name existed; the user agreed to overwrite it.
    Overwritten(String),
    /// The new name existed and the user kept it. Original name restored.
    Declined,
    /// The request failed. Original name restored.
    Failed,
}

/// An active edit on one row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenameSession {
    /// Row being edited.
    pub index: usize,
    /// Name before editing.
    pub original: String,
    /// Live field value.
    pub field: EditField,
}

impl RenameSession {
    /// The new name if the session committed a changed value.
    pub fn changed_name(&self, resolution: Resolution) -> Option<String> {
        match resolution {
            Resolution::Cancel => None,
            Resolution::Commit if self.field.text() == self.original => None,
            Resolution::Commit => Some(self.field.text().to_string()),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
enum RenameState {
    #[default]
    Idle,
    Armed {
        index: usize,
        deadline: Instant,
    },
    Editing(RenameSession),
}

/// Tracks the delayed trigger and the (single) edit session.
#[derive(Debug, Clone, Default)]
pub struct RenameController {
    state: RenameState,
    /// Set by a double click; a trigger firing before it expires is dropped.
    suppress_until: Option<Instant>,
}

impl RenameController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Arm the delayed rename for `index`. Replaces any earlier trigger.
    pub fn arm(&mut self, index: usize, now: Instant, delay: Duration) {
        if self.is_editing() {
            return;
        }
        debug!("Rename armed for row {}", index);
        self.state = RenameState::Armed {
            index,
            deadline: now + delay,
        };
    }

    /// Drop a pending trigger. Editing is left alone.
    pub fn disarm(&mut self) {
        if let RenameState::Armed { index, .. } = self.state {
            trace!("Rename disarmed for row {}", index);
            self.state = RenameState::Idle;
        }
    }

    /// A double click: disarm and block triggers for `window`.
    pub fn suppress(&mut self, now: Instant, window: Duration) {
        self.disarm();
        self.suppress_until = Some(now + window);
    }

    pub fn is_armed(&self) -> bool {
        matches!(self.state, RenameState::Armed { .. })
    }

    pub fn is_editing(&self) -> bool {
        matches!(self.state, RenameState::Editing(_))
    }

    /// Fire the trigger if its deadline has passed.
    ///
    /// Returns the armed row, or `None` if nothing is due or the trigger was
    /// suppressed by a double click.
    pub fn poll(&mut self, now: Instant) -> Option<usize> {
        let RenameState::Armed { index, deadline } = self.state else {
            return None;
        };
        if now < deadline {
            return None;
        }
        self.state = RenameState::Idle;
        match self.suppress_until {
            Some(until) if now < until => {
                debug!("Rename trigger suppressed by double click");
                None
            }
            _ => {
                self.suppress_until = None;
                Some(index)
            }
        }
    }

    /// Start editing `index`.
    pub fn begin(&mut self, index: usize, original: &str) -> Result<(), ListingError> {
        if self.is_editing() {
            return Err(ListingError::RenameInProgress);
        }
        debug!("Rename editing row {} ({})", index, original);
        self.state = RenameState::Editing(RenameSession {
            index,
            original: original.to_string(),
            field: EditField::new(original),
        });
        Ok(())
    }

    pub fn session(&self) -> Option<&RenameSession> {
        match &self.state {
            RenameState::Editing(session) => Some(session),
            _ => None,
        }
    }

    pub fn session_mut(&mut self) -> Option<&mut RenameSession> {
        match &mut self.state {
            RenameState::Editing(session) => Some(session),
            _ => None,
        }
    }

    /// Leave editing, returning the finished session.
    pub fn finish(&mut self) -> Option<RenameSession> {
        match std::mem::take(&mut self.state) {
            RenameState::Editing(session) => Some(session),
            other => {
                self.state = other;
                None
            }
        }
    }
}

//! Row registry: one interaction record per visible entry.
//!
//! Rows mirror the model's sorted entries position for position. Rendering
//! reads the flags; nothing writes flags back from the rendered output.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use log::trace;

use crate::model::{Entry, EntryKind, Session};

/// Interaction flags carried by a row.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RowFlags {
    pub selected: bool,
    pub cut: bool,
    pub drop_target: bool,
    pub running: bool,
}

/// Controller-owned record for one listed entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowHandle {
    /// Displayed name. Replaced optimistically while a rename commits.
    pub name: String,
    /// Relative path of the entry.
    pub path: String,
    /// Visual classification.
    pub kind: EntryKind,
    /// Relative modification time ("3 hours ago").
    pub modified_text: String,
    /// Absolute modification time for tooltips.
    pub modified_title: String,
    /// Label of the session running for this entry.
    pub running_label: Option<String>,
    pub flags: RowFlags,
}

impl RowHandle {
    fn blank() -> Self {
        Self {
            name: String::new(),
            path: String::new(),
            kind: EntryKind::File,
            modified_text: String::new(),
            modified_title: String::new(),
            running_label: None,
            flags: RowFlags::default(),
        }
    }

    /// Returns `true` if the row represents a directory.
    pub fn is_dir(&self) -> bool {
        self.kind == EntryKind::Directory
    }

    /// Absolute path of the row's entry.
    pub fn absolute_path(&self) -> String {
        format!("/{}", self.path.trim_start_matches('/'))
    }
}

/// Ordered rows matching the model's sorted entries.
#[derive(Debug, Default)]
pub struct RowRegistry {
    rows: Vec<RowHandle>,
    /// Directory of the previous pass, to tell a refresh from a navigation.
    prev_dir: Option<String>,
}

impl RowRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&RowHandle> {
        self.rows.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut RowHandle> {
        self.rows.get_mut(index)
    }

    pub fn rows(&self) -> &[RowHandle] {
        &self.rows
    }

    pub(crate) fn rows_mut(&mut self) -> &mut [RowHandle] {
        &mut self.rows
    }

    // -------------------------------------------------------------------------
    // Reconciliation
    // -------------------------------------------------------------------------

    /// Bring the rows in line with a fresh model snapshot.
    ///
    /// Rows are truncated or extended to `entries.len()`, their visuals are
    /// rewritten from the entries, and running state is overlaid from
    /// `sessions`. Selected names survive when `dir` is the directory of the
    /// previous pass and are dropped otherwise. Cut flags are cleared; the
    /// caller re-applies them from its clipboard.
    pub fn reconcile(
        &mut self,
        dir: &str,
        entries: &[Entry],
        sessions: &[Session],
        now: DateTime<Utc>,
        modified_format: &str,
    ) {
        let same_dir = self.prev_dir.as_deref() == Some(dir);
        let keep: HashSet<String> = if same_dir {
            self.selected_names().into_iter().collect()
        } else {
            HashSet::new()
        };

        self.rows.truncate(entries.len());
        while self.rows.len() < entries.len() {
            self.rows.push(RowHandle::blank());
        }

        for (row, entry) in self.rows.iter_mut().zip(entries) {
            row.name = entry.name.clone();
            row.path = entry.path.clone();
            row.kind = entry.kind;
            match entry.last_modified {
                Some(at) => {
                    row.modified_text = relative_time(at, now);
                    row.modified_title = at.format(modified_format).to_string();
                }
                None => {
                    row.modified_text.clear();
                    row.modified_title.clear();
                }
            }
            row.running_label = None;
            row.flags = RowFlags {
                selected: keep.contains(&entry.name),
                ..RowFlags::default()
            };
        }

        for session in sessions {
            // Sessions for entries outside this directory have no row.
            let Some(row) = self.rows.iter_mut().find(|r| r.path == session.path) else {
                trace!("No row for session {} ({})", session.id, session.path);
                continue;
            };
            row.flags.running = true;
            row.running_label = Some(session.label.clone());
        }

        self.prev_dir = Some(dir.to_string());
    }

    // -------------------------------------------------------------------------
    // Flag queries and bulk updates
    // -------------------------------------------------------------------------

    /// Indices of selected rows, ascending.
    pub fn selected_indices(&self) -> Vec<usize> {
        self.rows
            .iter()
            .enumerate()
            .filter(|(_, r)| r.flags.selected)
            .map(|(i, _)| i)
            .collect()
    }

    /// Names of selected rows in row order.
    pub fn selected_names(&self) -> Vec<String> {
        self.rows
            .iter()
            .filter(|r| r.flags.selected)
            .map(|r| r.name.clone())
            .collect()
    }

    pub fn selected_count(&self) -> usize {
        self.rows.iter().filter(|r| r.flags.selected).count()
    }

    pub fn is_selected(&self, index: usize) -> bool {
        self.rows.get(index).is_some_and(|r| r.flags.selected)
    }

    pub fn clear_selected(&mut self) {
        for row in &mut self.rows {
            row.flags.selected = false;
        }
    }

    pub fn clear_cut(&mut self) {
        for row in &mut self.rows {
            row.flags.cut = false;
        }
    }

    /// Flag every row whose absolute path is in `paths` as cut.
    pub fn mark_cut(&mut self, paths: &[String]) {
        for row in &mut self.rows {
            let path = row.absolute_path();
            row.flags.cut = paths.iter().any(|p| *p == path);
        }
    }

    /// Row currently highlighted as drop target.
    pub fn drop_target(&self) -> Option<usize> {
        self.rows.iter().position(|r| r.flags.drop_target)
    }

    /// Move the drop-target highlight to `index`.
    pub fn set_drop_target(&mut self, index: usize) {
        for (i, row) in self.rows.iter_mut().enumerate() {
            row.flags.drop_target = i == index;
        }
    }

    pub fn clear_drop_target(&mut self) {
        for row in &mut self.rows {
            row.flags.drop_target = false;
        }
    }
}

/// Human friendly distance between `then` and `now`.
pub fn relative_time(then: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let secs = (now - then).num_seconds().max(0);
    let minutes = (secs as f64 / 60.0).round() as i64;
    let hours = (secs as f64 / 3600.0).round() as i64;
    let days = (secs as f64 / 86400.0).round() as i64;

    match secs {
        s if s < 45 => "seconds ago".to_string(),
        s if s < 90 => "a minute ago".to_string(),
        s if s < 45 * 60 => format!("{minutes} minutes ago"),
        s if s < 90 * 60 => "an hour ago".to_string(),
        s if s < 22 * 3600 => format!("{hours} hours ago"),
        s if s < 36 * 3600 => "a day ago".to_string(),
        s if s < 26 * 86400 => format!("{days} days ago"),
        s if s < 45 * 86400 => "a month ago".to_string(),
        s if s < 320 * 86400 => format!("{} months ago", (days as f64 / 30.4).round() as i64),
        s if s < 548 * 86400 => "a year ago".to_string(),
        _ => format!("{} years ago", (days as f64 / 365.0).round() as i64),
    }
}

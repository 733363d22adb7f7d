//! Selection engine.
//!
//! Pure operations over the row registry's `selected` flags. The listing
//! controller calls [`sync_model_selection`] after every gesture so the
//! model's index set mirrors the flags.

use crate::events::Modifiers;
use crate::model::Entry;
use crate::rows::RowRegistry;

/// How a click changes the selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickKind {
    /// Select only the clicked row.
    Single,
    /// Flip the clicked row (Ctrl/Cmd).
    Toggle,
    /// Select the span to the nearest selected row (Shift).
    Range,
}

impl ClickKind {
    /// Classify a click by its modifiers. Toggle wins over range.
    pub fn from_modifiers(modifiers: Modifiers) -> Self {
        if modifiers.toggle() {
            Self::Toggle
        } else if modifiers.shift {
            Self::Range
        } else {
            Self::Single
        }
    }
}

/// Select only `index`, clearing every other row.
pub fn select_only(rows: &mut RowRegistry, index: usize) {
    if index >= rows.len() {
        return;
    }
    rows.clear_selected();
    if let Some(row) = rows.get_mut(index) {
        row.flags.selected = true;
    }
}

/// Flip the selected flag of `index` only.
pub fn toggle(rows: &mut RowRegistry, index: usize) {
    if let Some(row) = rows.get_mut(index) {
        row.flags.selected = !row.flags.selected;
    }
}

/// Index of the selected row closest to `index`, other than `index` itself.
///
/// Ties go to the first row in scan order. With no other row selected the
/// nearest row is 0.
pub fn nearest_selected(rows: &RowRegistry, index: usize) -> usize {
    let mut nearest: Option<usize> = None;
    for i in rows.selected_indices().into_iter().filter(|&i| i != index) {
        match nearest {
            Some(n) if index.abs_diff(i) >= index.abs_diff(n) => {}
            _ => nearest = Some(i),
        }
    }
    nearest.unwrap_or(0)
}

/// Select every row between `index` and the nearest selected row, inclusive.
///
/// Rows outside the span keep their state.
pub fn extend_range(rows: &mut RowRegistry, index: usize) {
    if index >= rows.len() {
        return;
    }
    let nearest = nearest_selected(rows, index);
    let (start, end) = if nearest <= index {
        (nearest, index)
    } else {
        (index, nearest)
    };
    for row in &mut rows.rows_mut()[start..=end] {
        row.flags.selected = true;
    }
}

/// Apply a click of the given kind.
pub fn apply_click(rows: &mut RowRegistry, index: usize, kind: ClickKind) {
    match kind {
        ClickKind::Single => select_only(rows, index),
        ClickKind::Toggle => toggle(rows, index),
        ClickKind::Range => extend_range(rows, index),
    }
}

/// Target row for "select next".
///
/// One selected row (or `extend`) advances past the last selected row,
/// wrapping to the first. No selection jumps to the first row. A
/// multi-row selection collapses onto its last row.
pub fn next_target(selected: &[usize], len: usize, extend: bool) -> Option<usize> {
    if len == 0 {
        return None;
    }
    match selected.iter().max() {
        Some(&last) if selected.len() == 1 || extend => Some((last + 1) % len),
        Some(&last) => Some(last.min(len - 1)),
        None => Some(0),
    }
}

/// Target row for "select previous".
///
/// Mirror image of [`next_target`]: steps before the first selected row,
/// wrapping to the last.
pub fn previous_target(selected: &[usize], len: usize, extend: bool) -> Option<usize> {
    if len == 0 {
        return None;
    }
    match selected.iter().min() {
        Some(&first) if selected.len() == 1 || extend => {
            Some(if first == 0 { len - 1 } else { (first - 1).min(len - 1) })
        }
        Some(&first) => Some(first.min(len - 1)),
        None => Some(len - 1),
    }
}

/// Select `index`, keeping the existing selection when `extend` is set.
pub fn select_target(rows: &mut RowRegistry, index: usize, extend: bool) {
    if !extend {
        rows.clear_selected();
    }
    if let Some(row) = rows.get_mut(index) {
        row.flags.selected = true;
    }
}

/// Model selection derived from row flags.
///
/// Rows are matched to entries by name rather than by position, so a row
/// list that lags behind the model still maps onto the right entries.
/// Names no longer present are skipped.
pub fn sync_model_selection(rows: &RowRegistry, entries: &[Entry]) -> Vec<usize> {
    let mut selected: Vec<usize> = rows
        .rows()
        .iter()
        .filter(|r| r.flags.selected)
        .filter_map(|r| entries.iter().position(|e| e.name == r.name))
        .collect();
    selected.sort_unstable();
    selected.dedup();
    selected
}

//! Hit-testing and the row viewport.

use crate::events::Position;

/// Maps a pointer position to a row index.
///
/// Supplied by whatever lays the rows out. Indices past the end of the
/// listing are discarded by the controller.
pub trait RowLocator: Send + Sync {
    /// Row under `position`, given the first visible row `scroll_offset`.
    fn row_at(&self, position: Position, scroll_offset: usize) -> Option<usize>;
}

impl<F> RowLocator for F
where
    F: Fn(Position) -> Option<usize> + Send + Sync,
{
    fn row_at(&self, position: Position, _scroll_offset: usize) -> Option<usize> {
        self(position)
    }
}

/// Locator for rows of uniform height stacked below `top`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedRowLocator {
    /// Y coordinate of the first visible row.
    pub top: i32,
    /// Height of each row. Zero disables hit-testing.
    pub row_height: u16,
}

impl FixedRowLocator {
    pub fn new(top: i32, row_height: u16) -> Self {
        Self { top, row_height }
    }
}

impl Default for FixedRowLocator {
    fn default() -> Self {
        Self::new(0, 1)
    }
}

impl RowLocator for FixedRowLocator {
    fn row_at(&self, position: Position, scroll_offset: usize) -> Option<usize> {
        if self.row_height == 0 || position.y < self.top {
            return None;
        }
        let visible = (position.y - self.top) as usize / usize::from(self.row_height);
        Some(scroll_offset + visible)
    }
}

/// Window of visible rows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Viewport {
    /// First visible row.
    pub offset: usize,
    /// Number of visible rows. Zero means unknown; scrolling is skipped.
    pub height: usize,
}

impl Viewport {
    /// Adjust the offset so `index` is visible.
    ///
    /// Index 0 always scrolls to the very top.
    pub fn scroll_to(&mut self, index: usize) {
        if index == 0 {
            self.offset = 0;
            return;
        }
        if self.height == 0 {
            return;
        }
        if index < self.offset {
            self.offset = index;
        } else if index >= self.offset + self.height {
            self.offset = index + 1 - self.height;
        }
    }

    /// Keep the offset valid for a listing of `len` rows.
    pub fn clamp(&mut self, len: usize) {
        let max = len.saturating_sub(self.height.max(1));
        self.offset = self.offset.min(max);
    }
}

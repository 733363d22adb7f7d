//! Sort header controller.
//!
//! Headers only store sort state on the model; ordering is the model's job.

use crate::events::Header;
use crate::model::{SortKey, SortState};

impl Header {
    /// Sort key a header controls.
    pub fn sort_key(self) -> SortKey {
        match self {
            Header::Name => SortKey::Name,
            Header::Modified => SortKey::LastModified,
        }
    }
}

/// Visual state of one header cell.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HeaderIndicator {
    /// The header is the active sort key.
    pub active: bool,
    /// The active sort runs descending.
    pub descending: bool,
}

/// Sort state after clicking `header`.
///
/// Clicking the active header flips the direction; clicking another header
/// makes it active and ascending.
pub fn toggle_sort(current: SortState, header: Header) -> SortState {
    let key = header.sort_key();
    if current.key == key {
        SortState {
            key,
            ascending: !current.ascending,
        }
    } else {
        SortState {
            key,
            ascending: true,
        }
    }
}

/// Indicator for `header` under `sort`. Inactive headers are always cleared.
pub fn header_indicator(sort: SortState, header: Header) -> HeaderIndicator {
    if sort.key == header.sort_key() {
        HeaderIndicator {
            active: true,
            descending: !sort.ascending,
        }
    } else {
        HeaderIndicator::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toggle_same_key_flips() {
        let sort = toggle_sort(SortState::default(), Header::Name);
        assert_eq!(sort.key, SortKey::Name);
        assert!(!sort.ascending);
    }

    #[test]
    fn test_switch_key_resets_ascending() {
        let descending = SortState {
            key: SortKey::Name,
            ascending: false,
        };
        let sort = toggle_sort(descending, Header::Modified);
        assert_eq!(sort.key, SortKey::LastModified);
        assert!(sort.ascending);
    }

    #[test]
    fn test_indicator_clears_inactive() {
        let sort = SortState {
            key: SortKey::LastModified,
            ascending: false,
        };
        assert_eq!(header_indicator(sort, Header::Name), HeaderIndicator::default());
        let modified = header_indicator(sort, Header::Modified);
        assert!(modified.active);
        assert!(modified.descending);
    }
}

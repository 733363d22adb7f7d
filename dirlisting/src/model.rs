//! Entries and the backing model contract.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::error::ModelError;

/// Kind of a listed entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntryKind {
    /// A directory that can be entered and dropped onto.
    Directory,
    /// A notebook document.
    Notebook,
    /// Any other file.
    File,
}

/// Snapshot of one listed item, as served by the model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    /// Base name.
    pub name: String,
    /// Path relative to the root of the backing store (no leading `/`).
    pub path: String,
    /// Entry kind.
    pub kind: EntryKind,
    /// Last modification time, if the store reports one.
    pub last_modified: Option<DateTime<Utc>>,
}

impl Entry {
    /// Create an entry without a modification time.
    pub fn new(name: impl Into<String>, path: impl Into<String>, kind: EntryKind) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            kind,
            last_modified: None,
        }
    }

    /// Returns `true` for directories.
    pub fn is_dir(&self) -> bool {
        self.kind == EntryKind::Directory
    }

    /// Absolute path (`/` + relative path).
    pub fn absolute_path(&self) -> String {
        format!("/{}", self.path.trim_start_matches('/'))
    }
}

/// Column the model sorts by.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum SortKey {
    #[default]
    Name,
    LastModified,
}

/// Active sort key and direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortState {
    pub key: SortKey,
    pub ascending: bool,
}

impl Default for SortState {
    fn default() -> Self {
        Self {
            key: SortKey::Name,
            ascending: true,
        }
    }
}

/// A live compute session attached to an entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    /// Session identifier.
    pub id: String,
    /// Relative path of the entry the session runs for.
    pub path: String,
    /// Human readable label, such as the kernel name.
    pub label: String,
}

/// Backing model for a listing.
///
/// Synchronous accessors read the model's current view; mutating requests are
/// asynchronous and may fail. Names passed to `rename` and `delete` are
/// resolved against the current directory unless they start with `/`.
#[async_trait]
pub trait ModelAdapter: Send + Sync {
    /// Current directory, relative to the root (empty for the root).
    fn path(&self) -> String;

    /// Entries of the current directory in display order.
    fn sorted_entries(&self) -> Vec<Entry>;

    /// Selected indices into [`sorted_entries`](Self::sorted_entries).
    fn selected(&self) -> Vec<usize>;

    /// Replace the selected index set.
    fn set_selected(&self, selected: Vec<usize>);

    /// Current sort state.
    fn sort(&self) -> SortState;

    /// Change the sort state. Ordering is applied by the model.
    fn set_sort(&self, sort: SortState);

    /// Active sessions.
    fn sessions(&self) -> Vec<Session>;

    /// Reload the current directory.
    async fn refresh(&self) -> Result<(), ModelError>;

    /// Enter a child directory.
    async fn cd(&self, name: &str) -> Result<(), ModelError>;

    /// Rename or move an entry.
    async fn rename(&self, old: &str, new: &str) -> Result<Entry, ModelError>;

    /// Copy an entry into a directory.
    async fn copy(&self, path: &str, destination: &str) -> Result<Entry, ModelError>;

    /// Delete an entry.
    async fn delete(&self, name: &str) -> Result<(), ModelError>;

    /// Download an entry.
    async fn download(&self, path: &str) -> Result<(), ModelError>;

    /// Shut down a session.
    async fn shutdown(&self, session: &Session) -> Result<(), ModelError>;
}

/// Last segment of a `/`-separated path.
pub fn base_name(path: &str) -> &str {
    path.trim_end_matches('/')
        .rsplit('/')
        .next()
        .unwrap_or(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absolute_path() {
        let entry = Entry::new("a.txt", "docs/a.txt", EntryKind::File);
        assert_eq!(entry.absolute_path(), "/docs/a.txt");
    }

    #[test]
    fn test_base_name() {
        assert_eq!(base_name("/docs/a.txt"), "a.txt");
        assert_eq!(base_name("a.txt"), "a.txt");
        assert_eq!(base_name("docs/sub/"), "sub");
    }
}

//! In-memory model adapter.
//!
//! Keeps a flat map of relative paths to nodes. The listed entries are a
//! snapshot taken by `refresh`/`cd`, so mutations only show up once the
//! listing refreshes, like a remote store would behave. Every request is
//! recorded in an operation log and failures can be queued per request kind.

use std::collections::{BTreeMap, HashMap, VecDeque};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use log::debug;

use crate::error::ModelError;
use crate::model::{Entry, EntryKind, ModelAdapter, Session, SortKey, SortState, base_name};

/// A request received by the model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operation {
    Refresh,
    Cd(String),
    Rename { old: String, new: String },
    Copy { path: String, destination: String },
    Delete(String),
    Download(String),
    Shutdown(String),
}

impl Operation {
    pub fn kind(&self) -> OpKind {
        match self {
            Self::Refresh => OpKind::Refresh,
            Self::Cd(_) => OpKind::Cd,
            Self::Rename { .. } => OpKind::Rename,
            Self::Copy { .. } => OpKind::Copy,
            Self::Delete(_) => OpKind::Delete,
            Self::Download(_) => OpKind::Download,
            Self::Shutdown(_) => OpKind::Shutdown,
        }
    }
}

/// Request kinds, for failure injection and log filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OpKind {
    Refresh,
    Cd,
    Rename,
    Copy,
    Delete,
    Download,
    Shutdown,
}

#[derive(Debug, Clone)]
struct Node {
    kind: EntryKind,
    modified: Option<DateTime<Utc>>,
}

#[derive(Debug, Default)]
struct Inner {
    nodes: BTreeMap<String, Node>,
    cwd: String,
    items: Vec<Entry>,
    sort: SortState,
    selected: Vec<usize>,
    sessions: Vec<Session>,
    log: Vec<Operation>,
    failures: HashMap<OpKind, VecDeque<ModelError>>,
}

impl Inner {
    /// Resolve `name` against the current directory; `/` makes it absolute.
    fn resolve(&self, name: &str) -> String {
        let joined = match name.strip_prefix('/') {
            Some(absolute) => absolute.to_string(),
            None if self.cwd.is_empty() => name.to_string(),
            None => format!("{}/{}", self.cwd, name),
        };
        normalize(&joined)
    }

    fn is_dir(&self, path: &str) -> bool {
        path.is_empty()
            || self
                .nodes
                .get(path)
                .is_some_and(|n| n.kind == EntryKind::Directory)
    }

    fn entry(&self, path: &str) -> Option<Entry> {
        self.nodes.get(path).map(|node| Entry {
            name: base_name(path).to_string(),
            path: path.to_string(),
            kind: node.kind,
            last_modified: node.modified,
        })
    }

    fn reload(&mut self) {
        let cwd = self.cwd.clone();
        self.items = self
            .nodes
            .keys()
            .filter(|path| parent_of(path) == cwd)
            .filter_map(|path| self.entry(path))
            .collect();
    }

    fn record(&mut self, op: Operation) -> Result<(), ModelError> {
        let kind = op.kind();
        debug!("Model request: {:?}", op);
        self.log.push(op);
        match self.failures.get_mut(&kind).and_then(VecDeque::pop_front) {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    /// Move `from` and everything below it to `to`.
    fn move_tree(&mut self, from: &str, to: &str) {
        let prefix = format!("{from}/");
        let moved: Vec<String> = self
            .nodes
            .keys()
            .filter(|p| *p == from || p.starts_with(&prefix))
            .cloned()
            .collect();
        for path in moved {
            if let Some(node) = self.nodes.remove(&path) {
                let new_path = format!("{}{}", to, &path[from.len()..]);
                self.nodes.insert(new_path, node);
            }
        }
    }

    fn remove_tree(&mut self, path: &str) {
        let prefix = format!("{path}/");
        self.nodes
            .retain(|p, _| p != path && !p.starts_with(&prefix));
    }
}

fn parent_of(path: &str) -> &str {
    path.rsplit_once('/').map(|(parent, _)| parent).unwrap_or("")
}

/// Collapse `.`/`..` segments and empty segments.
fn normalize(path: &str) -> String {
    let mut parts: Vec<&str> = Vec::new();
    for part in path.split('/') {
        match part {
            "" | "." => {}
            ".." => {
                parts.pop();
            }
            _ => parts.push(part),
        }
    }
    parts.join("/")
}

/// Name for a copy of `name` that does not collide in `dir`.
fn copy_name(inner: &Inner, dir: &str, name: &str) -> String {
    let join = |n: &str| {
        if dir.is_empty() {
            n.to_string()
        } else {
            format!("{dir}/{n}")
        }
    };
    if !inner.nodes.contains_key(&join(name)) {
        return join(name);
    }
    let (stem, ext) = match name.rfind('.') {
        Some(i) if i > 0 => (&name[..i], &name[i..]),
        _ => (name, ""),
    };
    (1..)
        .map(|n| join(&format!("{stem}-Copy{n}{ext}")))
        .find(|candidate| !inner.nodes.contains_key(candidate))
        .unwrap_or_else(|| join(name))
}

/// Model adapter over an in-memory tree.
///
/// # Example
///
/// ```
/// use dirlisting::memory::MemoryModel;
///
/// let model = MemoryModel::new()
///     .with_dir("work")
///     .with_file("work/a.txt");
/// assert!(model.exists("/work/a.txt"));
/// ```
#[derive(Debug, Default)]
pub struct MemoryModel {
    inner: RwLock<Inner>,
}

impl MemoryModel {
    /// Create an empty model rooted at `/`.
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> RwLockReadGuard<'_, Inner> {
        self.inner.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, Inner> {
        self.inner.write().unwrap_or_else(|e| e.into_inner())
    }

    // -------------------------------------------------------------------------
    // Seeding
    // -------------------------------------------------------------------------

    /// Add a node. Paths are relative to the root.
    pub fn with_entry(self, path: &str, kind: EntryKind, modified: Option<DateTime<Utc>>) -> Self {
        {
            let mut inner = self.write();
            inner.nodes.insert(normalize(path), Node { kind, modified });
            inner.reload();
        }
        self
    }

    pub fn with_dir(self, path: &str) -> Self {
        self.with_entry(path, EntryKind::Directory, None)
    }

    pub fn with_file(self, path: &str) -> Self {
        self.with_entry(path, EntryKind::File, None)
    }

    pub fn with_notebook(self, path: &str) -> Self {
        self.with_entry(path, EntryKind::Notebook, None)
    }

    pub fn with_session(self, id: &str, path: &str, label: &str) -> Self {
        self.write().sessions.push(Session {
            id: id.to_string(),
            path: path.to_string(),
            label: label.to_string(),
        });
        self
    }

    /// Start in `dir` instead of the root.
    pub fn with_cwd(self, dir: &str) -> Self {
        {
            let mut inner = self.write();
            inner.cwd = normalize(dir);
            inner.reload();
        }
        self
    }

    // -------------------------------------------------------------------------
    // Inspection and failure injection
    // -------------------------------------------------------------------------

    /// Check whether a path exists. Resolved like a request name.
    pub fn exists(&self, path: &str) -> bool {
        let inner = self.read();
        let resolved = inner.resolve(path);
        inner.nodes.contains_key(&resolved)
    }

    /// All requests received so far.
    pub fn operations(&self) -> Vec<Operation> {
        self.read().log.clone()
    }

    /// Requests of one kind.
    pub fn operations_of(&self, kind: OpKind) -> Vec<Operation> {
        self.read()
            .log
            .iter()
            .filter(|op| op.kind() == kind)
            .cloned()
            .collect()
    }

    /// Requests other than refreshes.
    pub fn mutations(&self) -> Vec<Operation> {
        self.read()
            .log
            .iter()
            .filter(|op| !matches!(op, Operation::Refresh | Operation::Cd(_)))
            .cloned()
            .collect()
    }

    /// Make the next request of `kind` fail with `error`.
    pub fn fail_next(&self, kind: OpKind, error: ModelError) {
        self.write()
            .failures
            .entry(kind)
            .or_default()
            .push_back(error);
    }

    /// Replace the active sessions.
    pub fn set_sessions(&self, sessions: Vec<Session>) {
        self.write().sessions = sessions;
    }
}

fn sort_entries(entries: &mut [Entry], sort: SortState) {
    match sort.key {
        SortKey::Name => entries.sort_by(|a, b| a.name.cmp(&b.name)),
        SortKey::LastModified => entries.sort_by(|a, b| {
            a.last_modified
                .cmp(&b.last_modified)
                .then_with(|| a.name.cmp(&b.name))
        }),
    }
    if !sort.ascending {
        entries.reverse();
    }
}

#[async_trait]
impl ModelAdapter for MemoryModel {
    fn path(&self) -> String {
        self.read().cwd.clone()
    }

    fn sorted_entries(&self) -> Vec<Entry> {
        let inner = self.read();
        let mut entries = inner.items.clone();
        sort_entries(&mut entries, inner.sort);
        entries
    }

    fn selected(&self) -> Vec<usize> {
        self.read().selected.clone()
    }

    fn set_selected(&self, selected: Vec<usize>) {
        self.write().selected = selected;
    }

    fn sort(&self) -> SortState {
        self.read().sort
    }

    fn set_sort(&self, sort: SortState) {
        self.write().sort = sort;
    }

    fn sessions(&self) -> Vec<Session> {
        self.read().sessions.clone()
    }

    async fn refresh(&self) -> Result<(), ModelError> {
        let mut inner = self.write();
        inner.record(Operation::Refresh)?;
        inner.reload();
        Ok(())
    }

    async fn cd(&self, name: &str) -> Result<(), ModelError> {
        let mut inner = self.write();
        inner.record(Operation::Cd(name.to_string()))?;
        let target = inner.resolve(name);
        if !inner.is_dir(&target) {
            return Err(ModelError::NotFound(name.to_string()));
        }
        inner.cwd = target;
        inner.selected.clear();
        inner.reload();
        Ok(())
    }

    async fn rename(&self, old: &str, new: &str) -> Result<Entry, ModelError> {
        let mut inner = self.write();
        inner.record(Operation::Rename {
            old: old.to_string(),
            new: new.to_string(),
        })?;
        let from = inner.resolve(old);
        let to = inner.resolve(new);
        if !inner.nodes.contains_key(&from) {
            return Err(ModelError::NotFound(old.to_string()));
        }
        if inner.nodes.contains_key(&to) {
            return Err(ModelError::http(409, format!("{new} already exists")));
        }
        if !inner.is_dir(parent_of(&to)) {
            return Err(ModelError::NotFound(parent_of(&to).to_string()));
        }
        inner.move_tree(&from, &to);
        inner
            .entry(&to)
            .ok_or_else(|| ModelError::NotFound(new.to_string()))
    }

    async fn copy(&self, path: &str, destination: &str) -> Result<Entry, ModelError> {
        let mut inner = self.write();
        inner.record(Operation::Copy {
            path: path.to_string(),
            destination: destination.to_string(),
        })?;
        let from = inner.resolve(path);
        let dir = inner.resolve(destination);
        let node = match inner.nodes.get(&from) {
            Some(node) if node.kind == EntryKind::Directory => {
                return Err(ModelError::Other(format!("cannot copy directory {path}")));
            }
            Some(node) => node.clone(),
            None => return Err(ModelError::NotFound(path.to_string())),
        };
        if !inner.is_dir(&dir) {
            return Err(ModelError::NotFound(destination.to_string()));
        }
        let to = copy_name(&inner, &dir, base_name(&from));
        inner.nodes.insert(
            to.clone(),
            Node {
                kind: node.kind,
                modified: Some(Utc::now()),
            },
        );
        inner
            .entry(&to)
            .ok_or_else(|| ModelError::NotFound(to.clone()))
    }

    async fn delete(&self, name: &str) -> Result<(), ModelError> {
        let mut inner = self.write();
        inner.record(Operation::Delete(name.to_string()))?;
        let path = inner.resolve(name);
        if !inner.nodes.contains_key(&path) {
            return Err(ModelError::NotFound(name.to_string()));
        }
        inner.remove_tree(&path);
        Ok(())
    }

    async fn download(&self, path: &str) -> Result<(), ModelError> {
        let mut inner = self.write();
        inner.record(Operation::Download(path.to_string()))?;
        let resolved = inner.resolve(path);
        if !inner.nodes.contains_key(&resolved) {
            return Err(ModelError::NotFound(path.to_string()));
        }
        Ok(())
    }

    async fn shutdown(&self, session: &Session) -> Result<(), ModelError> {
        let mut inner = self.write();
        inner.record(Operation::Shutdown(session.id.clone()))?;
        let before = inner.sessions.len();
        inner.sessions.retain(|s| s.id != session.id);
        if inner.sessions.len() == before {
            return Err(ModelError::NotFound(session.id.clone()));
        }
        Ok(())
    }
}

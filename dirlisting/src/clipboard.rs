//! Cut/copy buffer.

use crate::model::{Entry, base_name};

/// Operation a paste performs for one buffered path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PasteOp {
    /// Move `from` into the current directory under `name`.
    Move { from: String, name: String },
    /// Copy `from` into the current directory.
    Copy { from: String },
}

/// Absolute paths captured by the last cut or copy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Clipboard {
    paths: Vec<String>,
    is_cut: bool,
}

impl Clipboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the buffer with the non-directory entries among `entries`.
    ///
    /// Returns the captured absolute paths.
    pub fn capture<'a>(&mut self, entries: impl IntoIterator<Item = &'a Entry>, is_cut: bool) -> &[String] {
        self.is_cut = is_cut;
        self.paths = entries
            .into_iter()
            .filter(|e| !e.is_dir())
            .map(Entry::absolute_path)
            .collect();
        &self.paths
    }

    pub fn paths(&self) -> &[String] {
        &self.paths
    }

    pub fn is_cut(&self) -> bool {
        self.is_cut
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    /// Drain the buffer into the operations a paste issues.
    pub fn take_ops(&mut self) -> Vec<PasteOp> {
        let is_cut = std::mem::take(&mut self.is_cut);
        std::mem::take(&mut self.paths)
            .into_iter()
            .map(|from| {
                if is_cut {
                    let name = base_name(&from).to_string();
                    PasteOp::Move { from, name }
                } else {
                    PasteOp::Copy { from }
                }
            })
            .collect()
    }
}

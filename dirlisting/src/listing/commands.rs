//! Requests issued on behalf of the user: rename, clipboard and the
//! selection commands.

use std::sync::Arc;

use futures::future::join_all;
use log::{debug, info};

use super::DirListing;
use crate::clipboard::PasteOp;
use crate::dialogs::Dialogs;
use crate::error::{ListingError, ModelError};
use crate::model::{ModelAdapter, Session};
use crate::rename::{RenameOutcome, Resolution};

/// Rename `old` to `new`, offering to overwrite an existing target.
///
/// On a conflict the user is asked; if they agree the target is deleted and
/// the rename retried once.
pub(crate) async fn rename_with_overwrite(
    model: &dyn ModelAdapter,
    dialogs: &dyn Dialogs,
    title: &str,
    old: &str,
    new: &str,
) -> Result<RenameOutcome, ModelError> {
    match model.rename(old, new).await {
        Ok(_) => Ok(RenameOutcome::Renamed(new.to_string())),
        Err(err) if err.is_conflict() => {
            debug!("'{}' exists, asking to overwrite", new);
            let body = format!("\"{new}\" already exists, overwrite?");
            if !dialogs.confirm(title, &body).await {
                return Ok(RenameOutcome::Declined);
            }
            model.delete(new).await?;
            model.rename(old, new).await?;
            Ok(RenameOutcome::Overwritten(new.to_string()))
        }
        Err(err) => Err(err),
    }
}

/// First failure of a batch, if any.
fn first_failure<T>(results: Vec<Result<T, ModelError>>) -> Option<ModelError> {
    results.into_iter().find_map(Result::err)
}

impl DirListing {
    // -------------------------------------------------------------------------
    // Rename
    // -------------------------------------------------------------------------

    /// End the active edit session.
    ///
    /// A changed value is committed through the model; the row shows the new
    /// name until the request settles and gets its original name back if the
    /// request fails or the user declines to overwrite. The model is
    /// refreshed whenever a request was issued.
    pub async fn finish_rename(&mut self, resolution: Resolution) -> RenameOutcome {
        let Some(session) = self.rename.finish() else {
            return RenameOutcome::Unchanged;
        };
        let Some(new_name) = session.changed_name(resolution) else {
            debug!("Rename of '{}' left unchanged", session.original);
            return RenameOutcome::Unchanged;
        };

        if let Some(row) = self.rows.get_mut(session.index) {
            row.name = new_name.clone();
        }
        let result = rename_with_overwrite(
            self.model.as_ref(),
            self.dialogs.as_ref(),
            &self.config.overwrite_title,
            &session.original,
            &new_name,
        )
        .await;
        let outcome = match result {
            Ok(outcome) => outcome,
            Err(err) => {
                self.report("Rename Error", err.into());
                RenameOutcome::Failed
            }
        };
        match &outcome {
            RenameOutcome::Renamed(name) | RenameOutcome::Overwritten(name) => {
                info!("Renamed '{}' to '{}'", session.original, name);
            }
            _ => {
                if let Some(row) = self.rows.get_mut(session.index) {
                    row.name = session.original.clone();
                }
            }
        }
        self.settle().await;
        outcome
    }

    // -------------------------------------------------------------------------
    // Clipboard
    // -------------------------------------------------------------------------

    /// Put the selected files on the clipboard for moving.
    pub fn cut(&mut self) {
        let entries = self.selected_entries();
        self.rows.clear_cut();
        let paths = self.clipboard.capture(&entries, true);
        self.rows.mark_cut(paths);
        debug!("Cut {} entries", self.clipboard.paths().len());
    }

    /// Put the selected files on the clipboard for copying.
    pub fn copy(&mut self) {
        let entries = self.selected_entries();
        self.rows.clear_cut();
        self.clipboard.capture(&entries, false);
        debug!("Copied {} entries", self.clipboard.paths().len());
    }

    /// Move or copy the clipboard contents into the current directory.
    ///
    /// All requests run concurrently. The clipboard is emptied and the model
    /// refreshed whatever the outcome; the first failure is reported as a
    /// paste error. Items that succeeded stay where they went.
    pub async fn paste(&mut self) -> Result<(), ListingError> {
        if self.clipboard.is_empty() {
            return Ok(());
        }
        let destination = format!("/{}", self.model.path());
        let ops = self.clipboard.take_ops();
        info!("Pasting {} entries into '{}'", ops.len(), destination);

        let model = Arc::clone(&self.model);
        let requests = ops.iter().map(|op| {
            let model = model.as_ref();
            let destination = destination.as_str();
            async move {
                match op {
                    PasteOp::Move { from, name } => model.rename(from, name).await.map(|_| ()),
                    PasteOp::Copy { from } => model.copy(from, destination).await.map(|_| ()),
                }
            }
        });
        let failure = first_failure(join_all(requests).await);

        self.rows.clear_cut();
        self.finish_batch("Paste Error", failure).await
    }

    // -------------------------------------------------------------------------
    // Selection commands
    // -------------------------------------------------------------------------

    /// Delete every selected entry.
    pub async fn delete(&mut self) -> Result<(), ListingError> {
        let names: Vec<String> = self
            .selected_entries()
            .into_iter()
            .map(|entry| entry.name)
            .collect();
        if names.is_empty() {
            return Ok(());
        }
        info!("Deleting {:?}", names);
        let model = Arc::clone(&self.model);
        let failure = first_failure(join_all(names.iter().map(|name| model.delete(name))).await);
        self.finish_batch("Delete Error", failure).await
    }

    /// Copy every selected file into the current directory.
    pub async fn duplicate(&mut self) -> Result<(), ListingError> {
        let paths: Vec<String> = self
            .selected_entries()
            .into_iter()
            .filter(|entry| !entry.is_dir())
            .map(|entry| entry.absolute_path())
            .collect();
        if paths.is_empty() {
            return Ok(());
        }
        let destination = format!("/{}", self.model.path());
        let model = Arc::clone(&self.model);
        let requests = paths.iter().map(|path| model.copy(path, &destination));
        let failure = first_failure(join_all(requests).await);
        self.finish_batch("Duplicate Error", failure).await
    }

    /// Download the first selected file.
    pub async fn download(&mut self) -> Result<(), ListingError> {
        let Some(entry) = self.selected_entries().into_iter().find(|e| !e.is_dir()) else {
            return Ok(());
        };
        match self.model.download(&entry.absolute_path()).await {
            Ok(()) => Ok(()),
            Err(err) => Err(self.report("Download Error", err.into())),
        }
    }

    /// Shut down the sessions running for selected rows.
    pub async fn shutdown_sessions(&mut self) -> Result<(), ListingError> {
        let sessions: Vec<Session> = self
            .model
            .sessions()
            .into_iter()
            .filter(|session| {
                self.rows
                    .rows()
                    .iter()
                    .any(|row| row.flags.selected && row.path == session.path)
            })
            .collect();
        if sessions.is_empty() {
            return Ok(());
        }
        info!("Shutting down {} sessions", sessions.len());
        let model = Arc::clone(&self.model);
        let failure = first_failure(join_all(sessions.iter().map(|s| model.shutdown(s))).await);
        self.finish_batch("Shutdown Error", failure).await
    }

    pub(super) async fn finish_batch(
        &mut self,
        title: &str,
        failure: Option<ModelError>,
    ) -> Result<(), ListingError> {
        self.settle().await;
        match failure {
            Some(err) => Err(self.report(title, err.into())),
            None => Ok(()),
        }
    }
}

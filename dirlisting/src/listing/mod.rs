//! The listing controller.
//!
//! [`DirListing`] owns the row registry and every gesture state machine and
//! talks to the backing model through a [`ModelAdapter`]. Hosts feed it
//! [`ListingEvent`](crate::ListingEvent)s, poll its timers and render from
//! [`rows`](DirListing::rows).

mod commands;
mod dispatch;
mod locate;

use std::sync::Arc;
use std::time::Instant;

use chrono::Utc;
use log::{debug, info, warn};

pub use locate::{FixedRowLocator, RowLocator, Viewport};

use crate::clipboard::Clipboard;
use crate::config::ListingConfig;
use crate::dialogs::Dialogs;
use crate::drag::{DragController, DragSession, ViewerFactory};
use crate::error::ListingError;
use crate::events::{Header, Position};
use crate::model::{Entry, ModelAdapter};
use crate::observer::{OpenObservers, SubscriptionId};
use crate::rename::{RenameController, RenameSession};
use crate::rows::RowRegistry;
use crate::selection::{self, ClickKind};
use crate::sort::{HeaderIndicator, header_indicator, toggle_sort};

/// Widget-level state derived from the rows and the clipboard.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ListingIndicators {
    /// At least one row is selected.
    pub has_selection: bool,
    /// More than one row is selected.
    pub multi_selected: bool,
    /// The clipboard holds paths to paste.
    pub has_clipboard: bool,
}

/// Interactive controller for one directory listing.
pub struct DirListing {
    model: Arc<dyn ModelAdapter>,
    dialogs: Arc<dyn Dialogs>,
    config: ListingConfig,
    rows: RowRegistry,
    clipboard: Clipboard,
    rename: RenameController,
    drag: DragController,
    observers: OpenObservers,
    viewer_factory: Option<ViewerFactory>,
    locator: Box<dyn RowLocator>,
    viewport: Viewport,
}

impl DirListing {
    /// Create a listing over `model` and reconcile it with the model's
    /// current entries.
    pub fn new(model: Arc<dyn ModelAdapter>, dialogs: Arc<dyn Dialogs>, config: ListingConfig) -> Self {
        let mut listing = Self {
            model,
            dialogs,
            config,
            rows: RowRegistry::new(),
            clipboard: Clipboard::new(),
            rename: RenameController::new(),
            drag: DragController::new(),
            observers: OpenObservers::new(),
            viewer_factory: None,
            locator: Box::new(FixedRowLocator::default()),
            viewport: Viewport::default(),
        };
        listing.on_model_refreshed();
        listing
    }

    /// Use `locator` for pointer hit-testing.
    pub fn with_locator(mut self, locator: impl RowLocator + 'static) -> Self {
        self.locator = Box::new(locator);
        self
    }

    /// Register the capability used to offer "open as a new view" for
    /// single-document drags.
    pub fn set_viewer_factory(&mut self, factory: Option<ViewerFactory>) {
        self.viewer_factory = factory;
    }

    // -------------------------------------------------------------------------
    // Accessors
    // -------------------------------------------------------------------------

    pub fn model(&self) -> &Arc<dyn ModelAdapter> {
        &self.model
    }

    pub fn config(&self) -> &ListingConfig {
        &self.config
    }

    pub fn rows(&self) -> &RowRegistry {
        &self.rows
    }

    pub fn clipboard(&self) -> &Clipboard {
        &self.clipboard
    }

    /// The active rename session, if a row is being edited.
    pub fn rename_session(&self) -> Option<&RenameSession> {
        self.rename.session()
    }

    /// `true` while a delayed rename is waiting for its deadline.
    pub fn rename_armed(&self) -> bool {
        self.rename.is_armed()
    }

    /// The transfer started by this listing, if any.
    pub fn drag_session(&self) -> Option<&DragSession> {
        self.drag.session()
    }

    pub fn indicators(&self) -> ListingIndicators {
        let count = self.rows.selected_count();
        ListingIndicators {
            has_selection: count > 0,
            multi_selected: count > 1,
            has_clipboard: !self.clipboard.is_empty(),
        }
    }

    pub fn header_indicator(&self, header: Header) -> HeaderIndicator {
        header_indicator(self.model.sort(), header)
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn set_viewport_height(&mut self, height: usize) {
        self.viewport.height = height;
        self.viewport.clamp(self.rows.len());
    }

    // -------------------------------------------------------------------------
    // Open-requested subscriptions
    // -------------------------------------------------------------------------

    /// Be told when a non-directory entry is opened.
    pub fn subscribe_open(&mut self, callback: impl Fn(&Entry) + Send + Sync + 'static) -> SubscriptionId {
        self.observers.subscribe(callback)
    }

    pub fn unsubscribe_open(&mut self, id: SubscriptionId) -> bool {
        self.observers.unsubscribe(id)
    }

    // -------------------------------------------------------------------------
    // Reconciliation
    // -------------------------------------------------------------------------

    /// Rebuild the rows from the model's current view.
    ///
    /// Call after the model reloads outside of the listing's own requests.
    pub fn on_model_refreshed(&mut self) {
        let dir = self.model.path();
        let entries = self.model.sorted_entries();
        let sessions = self.model.sessions();
        self.rows.reconcile(
            &dir,
            &entries,
            &sessions,
            Utc::now(),
            &self.config.modified_format,
        );
        if self.clipboard.is_cut() {
            self.rows.mark_cut(self.clipboard.paths());
        }
        self.viewport.clamp(self.rows.len());
        self.relocate_rename();
        self.model
            .set_selected(selection::sync_model_selection(&self.rows, &entries));
        debug!("Reconciled {} rows in '{}'", self.rows.len(), dir);
    }

    /// Point an active edit at the row now holding its entry, or drop the
    /// edit if the entry is gone.
    fn relocate_rename(&mut self) {
        let Some(original) = self.rename.session().map(|s| s.original.clone()) else {
            return;
        };
        let found = self.rows.rows().iter().position(|row| row.name == original);
        match found {
            Some(index) => {
                if let Some(session) = self.rename.session_mut() {
                    session.index = index;
                }
            }
            None => {
                debug!("'{}' left the listing, cancelling rename", original);
                self.rename.finish();
            }
        }
    }

    /// Ask the model to reload, then reconcile.
    pub async fn refresh(&mut self) -> Result<(), ListingError> {
        self.model.refresh().await?;
        self.on_model_refreshed();
        Ok(())
    }

    /// Refresh after a request; failures are logged only.
    async fn settle(&mut self) {
        if let Err(err) = self.refresh().await {
            warn!("Refresh failed: {}", err);
        }
    }

    /// Surface `err` to the user under `title` and hand it back.
    fn report(&self, title: &str, err: ListingError) -> ListingError {
        warn!("{}: {}", title, err);
        self.dialogs.show_error(title, &err);
        err
    }

    /// Mirror the row flags into the model's selection set.
    fn sync_selection(&mut self) {
        let entries = self.model.sorted_entries();
        self.model
            .set_selected(selection::sync_model_selection(&self.rows, &entries));
    }

    fn selected_entries(&self) -> Vec<Entry> {
        let entries = self.model.sorted_entries();
        self.model
            .selected()
            .into_iter()
            .filter_map(|i| entries.get(i).cloned())
            .collect()
    }

    /// Row under `position`, if it exists.
    pub fn row_at(&self, position: Position) -> Option<usize> {
        self.locator
            .row_at(position, self.viewport.offset)
            .filter(|&index| index < self.rows.len())
    }

    // -------------------------------------------------------------------------
    // Selection
    // -------------------------------------------------------------------------

    /// Plain click on row `index`.
    ///
    /// A click on the sole selected row arms the delayed rename instead of
    /// changing the selection.
    pub fn handle_click(&mut self, index: usize) {
        if index >= self.rows.len() {
            return;
        }
        let sole = self.rows.selected_count() == 1 && self.rows.is_selected(index);
        selection::apply_click(&mut self.rows, index, ClickKind::Single);
        if sole {
            self.rename
                .arm(index, Instant::now(), self.config.rename_delay_duration());
        } else {
            self.rename.disarm();
        }
        self.sync_selection();
    }

    /// Shift click on row `index`.
    pub fn handle_range_extend(&mut self, index: usize) {
        if index >= self.rows.len() {
            return;
        }
        self.rename.disarm();
        selection::apply_click(&mut self.rows, index, ClickKind::Range);
        self.sync_selection();
    }

    /// Ctrl/Cmd click on row `index`.
    pub fn handle_toggle(&mut self, index: usize) {
        if index >= self.rows.len() {
            return;
        }
        self.rename.disarm();
        selection::apply_click(&mut self.rows, index, ClickKind::Toggle);
        self.sync_selection();
    }

    fn click(&mut self, index: usize, kind: ClickKind) {
        match kind {
            ClickKind::Single => self.handle_click(index),
            ClickKind::Toggle => self.handle_toggle(index),
            ClickKind::Range => self.handle_range_extend(index),
        }
    }

    pub fn select_next(&mut self, extend: bool) {
        let target = selection::next_target(&self.rows.selected_indices(), self.rows.len(), extend);
        self.select_and_reveal(target, extend);
    }

    pub fn select_previous(&mut self, extend: bool) {
        let target =
            selection::previous_target(&self.rows.selected_indices(), self.rows.len(), extend);
        self.select_and_reveal(target, extend);
    }

    fn select_and_reveal(&mut self, target: Option<usize>, extend: bool) {
        let Some(index) = target else {
            return;
        };
        self.rename.disarm();
        selection::select_target(&mut self.rows, index, extend);
        self.viewport.scroll_to(index);
        self.sync_selection();
    }

    // -------------------------------------------------------------------------
    // Timers and rename entry
    // -------------------------------------------------------------------------

    /// Fire due timers. Returns `true` if a row entered editing.
    ///
    /// The delayed rename only starts if the armed row is still the sole
    /// selection.
    pub fn poll_timers(&mut self, now: Instant) -> bool {
        let Some(index) = self.rename.poll(now) else {
            return false;
        };
        if self.rows.selected_count() != 1 || !self.rows.is_selected(index) {
            debug!("Selection moved on, dropping rename of row {}", index);
            return false;
        }
        match self.begin_rename(index) {
            Ok(()) => true,
            Err(err) => {
                debug!("Rename not started: {}", err);
                false
            }
        }
    }

    /// Edit the first selected row right away.
    pub fn start_rename(&mut self) -> Result<(), ListingError> {
        let index = self
            .rows
            .selected_indices()
            .first()
            .copied()
            .ok_or(ListingError::NoSelection)?;
        self.rename.disarm();
        self.begin_rename(index)
    }

    fn begin_rename(&mut self, index: usize) -> Result<(), ListingError> {
        if self.drag.is_dragging() {
            return Err(ListingError::DragInProgress);
        }
        let name = self
            .rows
            .get(index)
            .map(|row| row.name.clone())
            .ok_or(ListingError::NoSelection)?;
        self.rename.begin(index, &name)?;
        self.viewport.scroll_to(index);
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Sorting and navigation
    // -------------------------------------------------------------------------

    /// Toggle the sort on `header`. Clears the selection.
    pub fn handle_header_click(&mut self, header: Header) {
        let sort = toggle_sort(self.model.sort(), header);
        debug!("Sort by {:?}, ascending: {}", sort.key, sort.ascending);
        self.model.set_sort(sort);
        self.rename.disarm();
        self.rows.clear_selected();
        self.on_model_refreshed();
    }

    /// Open row `index`: enter it if it is a directory, otherwise tell the
    /// open-requested subscribers.
    pub async fn open(&mut self, index: usize) -> Result<(), ListingError> {
        let entry = self
            .model
            .sorted_entries()
            .get(index)
            .cloned()
            .ok_or(ListingError::NoSelection)?;
        if !entry.is_dir() {
            info!("Open requested for '{}'", entry.path);
            self.observers.emit(&entry);
            return Ok(());
        }
        match self.model.cd(&entry.name).await {
            Ok(()) => {
                info!("Entered '{}'", entry.path);
                self.viewport.offset = 0;
                self.on_model_refreshed();
                Ok(())
            }
            Err(err) => Err(self.report("Change Directory Error", err.into())),
        }
    }
}

impl std::fmt::Debug for DirListing {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DirListing")
            .field("config", &self.config)
            .field("rows", &self.rows)
            .field("clipboard", &self.clipboard)
            .field("rename", &self.rename)
            .field("drag", &self.drag)
            .field("observers", &self.observers)
            .field("viewport", &self.viewport)
            .finish_non_exhaustive()
    }
}

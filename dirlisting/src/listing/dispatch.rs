//! Event dispatch: pointer gestures, keys and transfer notifications.

use std::sync::Arc;
use std::time::Instant;

use futures::future::join_all;
use log::{debug, info, trace};

use super::DirListing;
use super::commands::rename_with_overwrite;
use crate::drag::{
    DragEvent, DragProxy, DragSession, DropAction, FACTORY_MIME, MimeValue, Press,
    TransferPayload,
};
use crate::events::{EventResult, Key, KeyCombo, ListingEvent, MouseButton, Position};
use crate::model::{Entry, base_name};
use crate::rename::{EditResult, Resolution};
use crate::selection::{self, ClickKind};

impl DirListing {
    /// Handle one input event.
    pub async fn handle_event(&mut self, event: ListingEvent) -> EventResult {
        trace!("Listing event: {:?}", event);
        match event {
            ListingEvent::PointerDown {
                position,
                button,
                modifiers,
            } => {
                if !self.blur_editor_outside(position).await {
                    return EventResult::Consumed;
                }
                // A new press supersedes one whose release never arrived.
                self.drag.release();
                if button != MouseButton::Left {
                    self.rename.disarm();
                }
                let Some(index) = self.row_at(position) else {
                    return EventResult::Ignored;
                };
                match button {
                    MouseButton::Left => {
                        self.drag.press(Press {
                            origin: position,
                            index,
                            modifiers,
                        });
                        EventResult::Consumed
                    }
                    MouseButton::Right => {
                        // Context menus act on the row under the pointer.
                        if !self.rows.is_selected(index) {
                            selection::select_only(&mut self.rows, index);
                            self.sync_selection();
                        }
                        EventResult::Consumed
                    }
                    MouseButton::Middle => EventResult::Ignored,
                }
            }
            ListingEvent::PointerMove { position } => self.handle_pointer_move(position),
            ListingEvent::PointerUp { button, .. } => {
                if button != MouseButton::Left {
                    return EventResult::Ignored;
                }
                match self.drag.release() {
                    Some(press) => {
                        self.click(press.index, ClickKind::from_modifiers(press.modifiers));
                        EventResult::Consumed
                    }
                    None => EventResult::Ignored,
                }
            }
            ListingEvent::DoubleClick { position, button } => {
                if button != MouseButton::Left {
                    return EventResult::Ignored;
                }
                self.handle_double_click(position).await
            }
            ListingEvent::Key(combo) => self.handle_key(combo).await,
            ListingEvent::HeaderClick(header) => {
                self.handle_header_click(header);
                EventResult::Consumed
            }
            ListingEvent::DragEnter(event) => self.handle_drag_enter(&event),
            ListingEvent::DragOver(event) => self.handle_drag_over(&event),
            ListingEvent::DragLeave => {
                self.rows.clear_drop_target();
                EventResult::Consumed
            }
            ListingEvent::Drop(event) => self.handle_drop(event).await,
            ListingEvent::DragEnded(action) => self.handle_drag_ended(action),
            ListingEvent::Blur => {
                self.rename.disarm();
                if self.rename.is_editing() {
                    self.finish_rename(Resolution::Commit).await;
                }
                EventResult::Consumed
            }
        }
    }

    /// Commit an active edit when the pointer goes down outside its row.
    ///
    /// Returns `false` if the press landed on the edit field itself.
    async fn blur_editor_outside(&mut self, position: Position) -> bool {
        let Some(editing) = self.rename.session().map(|s| s.index) else {
            return true;
        };
        if self.row_at(position) == Some(editing) {
            return false;
        }
        self.finish_rename(Resolution::Commit).await;
        true
    }

    async fn handle_key(&mut self, combo: KeyCombo) -> EventResult {
        if let Some(session) = self.rename.session_mut() {
            return match session.field.handle_key(combo) {
                EditResult::Commit => {
                    self.finish_rename(Resolution::Commit).await;
                    EventResult::Consumed
                }
                EditResult::Cancel => {
                    self.finish_rename(Resolution::Cancel).await;
                    EventResult::Consumed
                }
                EditResult::Ignored => EventResult::Ignored,
                EditResult::Changed | EditResult::Handled => EventResult::Consumed,
            };
        }
        match combo.key {
            Key::Down => {
                self.select_next(combo.modifiers.shift);
                EventResult::Consumed
            }
            Key::Up => {
                self.select_previous(combo.modifiers.shift);
                EventResult::Consumed
            }
            _ => EventResult::Ignored,
        }
    }

    async fn handle_double_click(&mut self, position: Position) -> EventResult {
        self.rename
            .suppress(Instant::now(), self.config.rename_delay_duration());
        if self.rename.is_editing() {
            self.finish_rename(Resolution::Commit).await;
        }
        let Some(index) = self.row_at(position) else {
            return EventResult::Ignored;
        };
        // Errors are already on the error surface.
        let _ = self.open(index).await;
        EventResult::Consumed
    }

    // -------------------------------------------------------------------------
    // Drag source
    // -------------------------------------------------------------------------

    fn handle_pointer_move(&mut self, position: Position) -> EventResult {
        if self.drag.is_dragging() {
            return EventResult::Consumed;
        }
        match self.drag.moved(position, self.config.drag_threshold) {
            Some(press) => self.start_drag(press),
            None if self.drag.pressed().is_some() => EventResult::Consumed,
            None => EventResult::Ignored,
        }
    }

    /// Turn a press into a drag session.
    ///
    /// The pressed row drags the whole selection if it is part of it and
    /// drags alone otherwise.
    fn start_drag(&mut self, press: Press) -> EventResult {
        self.rename.disarm();
        let entries = self.model.sorted_entries();
        let indices = if self.rows.is_selected(press.index) {
            self.model.selected()
        } else {
            vec![press.index]
        };
        let dragged: Vec<&Entry> = indices.iter().filter_map(|&i| entries.get(i)).collect();
        let Some(row) = self.rows.get(press.index) else {
            return EventResult::Ignored;
        };

        let proxy = DragProxy::new(row.kind, &row.name, dragged.len());
        let mut payload =
            TransferPayload::contents(dragged.iter().map(|e| e.absolute_path()).collect());
        if let [entry] = dragged.as_slice()
            && !entry.is_dir()
            && let Some(factory) = &self.viewer_factory
        {
            let factory = Arc::clone(factory);
            let entry = (*entry).clone();
            payload.set_data(
                FACTORY_MIME,
                MimeValue::Factory(Arc::new(move || factory(&entry))),
            );
        }

        debug!("Drag started with {} entries", dragged.len());
        self.drag.begin(DragSession {
            indices,
            origin: press.origin,
            proxy,
            payload,
            supported_actions: vec![DropAction::Move],
            proposed_action: DropAction::Move,
        });
        EventResult::StartDrag
    }

    fn handle_drag_ended(&mut self, action: DropAction) -> EventResult {
        self.rows.clear_drop_target();
        match self.drag.end() {
            Some(session) => {
                debug!(
                    "Drag of {} entries ended with {:?}",
                    session.indices.len(),
                    action
                );
                EventResult::Consumed
            }
            None => EventResult::Ignored,
        }
    }

    // -------------------------------------------------------------------------
    // Drop target
    // -------------------------------------------------------------------------

    /// Row under the transfer that may receive it: a directory that is not
    /// itself being transferred.
    fn drop_target_at(&self, event: &DragEvent) -> Option<usize> {
        let paths = event.payload.paths()?;
        let index = self.row_at(event.position)?;
        let row = self.rows.get(index)?;
        let dragged = paths.contains(&row.absolute_path());
        (row.is_dir() && !dragged).then_some(index)
    }

    fn handle_drag_enter(&mut self, event: &DragEvent) -> EventResult {
        match self.drop_target_at(event) {
            Some(index) => {
                self.rows.set_drop_target(index);
                EventResult::Accept(event.proposed_action)
            }
            None => EventResult::Ignored,
        }
    }

    fn handle_drag_over(&mut self, event: &DragEvent) -> EventResult {
        if event.payload.paths().is_none() {
            return EventResult::Ignored;
        }
        match self.drop_target_at(event) {
            Some(index) => self.rows.set_drop_target(index),
            None => self.rows.clear_drop_target(),
        }
        EventResult::Accept(event.proposed_action)
    }

    /// Move the transferred entries into the directory under the pointer.
    ///
    /// Every move is issued before any is awaited. Conflicts go through the
    /// overwrite prompt; the first other failure is reported once all moves
    /// have settled.
    async fn handle_drop(&mut self, event: DragEvent) -> EventResult {
        if event.proposed_action == DropAction::None {
            self.rows.clear_drop_target();
            return EventResult::Accept(DropAction::None);
        }
        let Some(paths) = event.payload.paths() else {
            return EventResult::Ignored;
        };
        let target = self.drop_target_at(&event);
        self.rows.clear_drop_target();
        let Some(dir) = target.and_then(|i| self.rows.get(i)).map(|row| row.name.clone()) else {
            debug!("Drop rejected: no directory under the pointer");
            return EventResult::Accept(DropAction::None);
        };

        let moves: Vec<(&str, String)> = paths
            .iter()
            .map(|path| (path.as_str(), format!("{}/{}", dir, base_name(path))))
            .collect();
        info!("Moving {} entries into '{}'", moves.len(), dir);

        let model = Arc::clone(&self.model);
        let dialogs = Arc::clone(&self.dialogs);
        let title = self.config.overwrite_title.clone();
        let requests = moves.iter().map(|(old, new)| {
            rename_with_overwrite(model.as_ref(), dialogs.as_ref(), &title, old, new)
        });
        let failure = join_all(requests).await.into_iter().find_map(Result::err);

        // The drop itself succeeded; a failed move is reported separately.
        let _ = self.finish_batch("Move Error", failure).await;
        EventResult::Accept(event.proposed_action)
    }
}

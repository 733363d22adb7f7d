//! Drag-and-drop: press tracking, drag sessions and the transfer payload.
//!
//! State machine: `Idle -> Pressed -> Dragging -> Idle`. A primary press
//! records its origin; movement past the threshold on either axis starts a
//! session. Release before that is a plain click. The transfer itself runs in
//! the host, which reports back with drag enter/over/leave/drop events and
//! finally with the completed action.

use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::events::{Modifiers, Position};
use crate::model::{Entry, EntryKind};

/// Payload key marking a transfer that originated in a listing.
pub const CONTENTS_MIME: &str = "application/x-dirlisting-contents";

/// Payload key for the "open as a new view" factory.
pub const FACTORY_MIME: &str = "application/x-dirlisting-viewer-factory";

/// Action performed (or proposed) by a transfer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum DropAction {
    #[default]
    None,
    Copy,
    Link,
    Move,
}

/// Builds a viewer for a document entry.
pub type ViewerFactory = Arc<dyn Fn(&Entry) -> Box<dyn Any + Send> + Send + Sync>;

/// Deferred viewer construction carried by a payload.
pub type DeferredViewer = Arc<dyn Fn() -> Box<dyn Any + Send> + Send + Sync>;

/// One value in a transfer payload.
#[derive(Clone)]
pub enum MimeValue {
    /// Absolute paths of the dragged entries.
    Contents(Vec<String>),
    /// Opens the dragged document as a new view.
    Factory(DeferredViewer),
}

impl fmt::Debug for MimeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Contents(paths) => f.debug_tuple("Contents").field(paths).finish(),
            Self::Factory(_) => f.write_str("Factory(..)"),
        }
    }
}

/// Typed bag carried by a transfer.
#[derive(Debug, Clone, Default)]
pub struct TransferPayload {
    data: HashMap<String, MimeValue>,
}

impl TransferPayload {
    pub fn new() -> Self {
        Self::default()
    }

    /// Payload carrying the listing contents marker for `paths`.
    pub fn contents(paths: Vec<String>) -> Self {
        let mut payload = Self::new();
        payload.set_data(CONTENTS_MIME, MimeValue::Contents(paths));
        payload
    }

    pub fn set_data(&mut self, mime: impl Into<String>, value: MimeValue) {
        self.data.insert(mime.into(), value);
    }

    pub fn has_data(&self, mime: &str) -> bool {
        self.data.contains_key(mime)
    }

    pub fn get_data(&self, mime: &str) -> Option<&MimeValue> {
        self.data.get(mime)
    }

    /// Paths carried under [`CONTENTS_MIME`].
    pub fn paths(&self) -> Option<&[String]> {
        match self.get_data(CONTENTS_MIME) {
            Some(MimeValue::Contents(paths)) => Some(paths),
            _ => None,
        }
    }

    /// Build the viewer offered under [`FACTORY_MIME`], if any.
    pub fn open_viewer(&self) -> Option<Box<dyn Any + Send>> {
        match self.get_data(FACTORY_MIME) {
            Some(MimeValue::Factory(factory)) => Some(factory()),
            _ => None,
        }
    }
}

/// A transfer event delivered by the host.
#[derive(Debug, Clone)]
pub struct DragEvent {
    /// Pointer position.
    pub position: Position,
    /// Action the source proposes.
    pub proposed_action: DropAction,
    /// Transferred data.
    pub payload: TransferPayload,
}

impl DragEvent {
    pub fn new(position: Position, proposed_action: DropAction, payload: TransferPayload) -> Self {
        Self {
            position,
            proposed_action,
            payload,
        }
    }
}

/// Visual stand-in shown under the pointer while dragging.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DragProxy {
    /// Icon classification of the pressed row.
    pub kind: EntryKind,
    /// Name of the pressed row, or `(n)` when several entries move.
    pub text: String,
    /// Count badge for multi-entry drags.
    pub badge: Option<usize>,
}

impl DragProxy {
    /// Proxy for a drag of `count` entries started on a row.
    pub fn new(kind: EntryKind, name: &str, count: usize) -> Self {
        if count > 1 {
            Self {
                kind,
                text: format!("({count})"),
                badge: Some(count),
            }
        } else {
            Self {
                kind,
                text: name.to_string(),
                badge: None,
            }
        }
    }
}

/// An in-progress transfer started by this listing.
#[derive(Debug, Clone)]
pub struct DragSession {
    /// Row indices being dragged.
    pub indices: Vec<usize>,
    /// Pointer position where the drag started.
    pub origin: Position,
    pub proxy: DragProxy,
    pub payload: TransferPayload,
    /// Actions the source allows.
    pub supported_actions: Vec<DropAction>,
    pub proposed_action: DropAction,
}

/// Whether pointer travel from `origin` to `position` starts a drag.
pub fn exceeds_threshold(origin: Position, position: Position, threshold: u16) -> bool {
    let dx = (position.x - origin.x).unsigned_abs();
    let dy = (position.y - origin.y).unsigned_abs();
    let threshold = u32::from(threshold);
    dx >= threshold || dy >= threshold
}

/// A primary press waiting to become a click or a drag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Press {
    pub origin: Position,
    pub index: usize,
    pub modifiers: Modifiers,
}

#[derive(Debug, Default)]
enum DragState {
    #[default]
    Idle,
    Pressed(Press),
    Dragging(DragSession),
}

/// Tracks the press/drag gesture.
#[derive(Debug, Default)]
pub struct DragController {
    state: DragState,
}

impl DragController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a primary press on row `index`. Ignored while dragging.
    pub fn press(&mut self, press: Press) {
        if !self.is_dragging() {
            self.state = DragState::Pressed(press);
        }
    }

    /// The pending press, if any.
    pub fn pressed(&self) -> Option<Press> {
        match self.state {
            DragState::Pressed(press) => Some(press),
            _ => None,
        }
    }

    /// Check a move against the pending press.
    ///
    /// Returns the press when the threshold is exceeded; the caller then
    /// builds a session and hands it to [`begin`](Self::begin).
    pub fn moved(&self, position: Position, threshold: u16) -> Option<Press> {
        self.pressed()
            .filter(|press| exceeds_threshold(press.origin, position, threshold))
    }

    pub fn begin(&mut self, session: DragSession) {
        self.state = DragState::Dragging(session);
    }

    /// Release of the primary button. Returns the press if it never became
    /// a drag, i.e. it should be handled as a click.
    pub fn release(&mut self) -> Option<Press> {
        match std::mem::take(&mut self.state) {
            DragState::Pressed(press) => Some(press),
            DragState::Dragging(session) => {
                // The host ends the transfer; keep the session until then.
                self.state = DragState::Dragging(session);
                None
            }
            DragState::Idle => None,
        }
    }

    /// Tear the session down.
    pub fn end(&mut self) -> Option<DragSession> {
        match std::mem::take(&mut self.state) {
            DragState::Dragging(session) => Some(session),
            _ => None,
        }
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.state, DragState::Dragging(_))
    }

    pub fn session(&self) -> Option<&DragSession> {
        match &self.state {
            DragState::Dragging(session) => Some(session),
            _ => None,
        }
    }
}

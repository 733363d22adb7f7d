//! Interactive directory listing controller
//!
//! Selection, in-place rename, clipboard, drag-and-drop and sort headers over
//! an asynchronous backing model. Rendering and dialogs belong to the host.

pub mod clipboard;
pub mod config;
pub mod dialogs;
pub mod drag;
pub mod error;
pub mod events;
pub mod listing;
pub mod memory;
pub mod model;
pub mod observer;
pub mod rename;
pub mod rows;
pub mod selection;
pub mod sort;

pub use config::ListingConfig;
pub use error::{ListingError, ModelError};
pub use events::{EventResult, ListingEvent};
pub use listing::{DirListing, ListingIndicators};
pub use model::{Entry, EntryKind, ModelAdapter};

pub mod prelude {
    pub use crate::clipboard::Clipboard;
    pub use crate::config::ListingConfig;
    pub use crate::dialogs::{AutoDialogs, ChannelDialogs, DialogRequest, Dialogs};
    pub use crate::drag::{
        CONTENTS_MIME, DragEvent, DragSession, DropAction, FACTORY_MIME, MimeValue,
        TransferPayload, ViewerFactory,
    };
    pub use crate::error::{ListingError, ModelError};
    pub use crate::events::{
        EventResult, Header, Key, KeyCombo, ListingEvent, Modifiers, MouseButton, Position,
    };
    pub use crate::listing::{DirListing, FixedRowLocator, ListingIndicators, RowLocator, Viewport};
    pub use crate::memory::{MemoryModel, OpKind, Operation};
    pub use crate::model::{Entry, EntryKind, ModelAdapter, Session, SortKey, SortState};
    pub use crate::observer::SubscriptionId;
    pub use crate::rename::{RenameOutcome, Resolution};
    pub use crate::sort::HeaderIndicator;
}

//! Input events delivered to a listing and the results of handling them.
//!
//! The host translates its toolkit's pointer, key and drag notifications into
//! [`ListingEvent`]s and hands them to
//! [`DirListing::handle_event`](crate::DirListing::handle_event).

use crate::drag::{DragEvent, DropAction};

/// Pointer position in host coordinates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Pointer button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    Left,
    Middle,
    Right,
}

/// Modifier keys held during an event.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    /// Cmd on macOS. Treated like ctrl for toggle selection.
    pub meta: bool,
}

impl Modifiers {
    pub const NONE: Self = Self {
        shift: false,
        ctrl: false,
        alt: false,
        meta: false,
    };

    pub const SHIFT: Self = Self {
        shift: true,
        ..Self::NONE
    };

    pub const CTRL: Self = Self {
        ctrl: true,
        ..Self::NONE
    };

    /// Ctrl or Cmd: the toggle-selection modifier.
    pub fn toggle(&self) -> bool {
        self.ctrl || self.meta
    }
}

/// Key codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    /// Character key
    Char(char),
    Enter,
    Escape,
    Backspace,
    Delete,
    Up,
    Down,
    Left,
    Right,
    Home,
    End,
}

/// A key combination (key + modifiers)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyCombo {
    pub key: Key,
    pub modifiers: Modifiers,
}

impl KeyCombo {
    /// Create a key combo without modifiers
    pub const fn key(key: Key) -> Self {
        Self {
            key,
            modifiers: Modifiers::NONE,
        }
    }

    /// Add ctrl modifier
    pub const fn ctrl(mut self) -> Self {
        self.modifiers.ctrl = true;
        self
    }

    /// Add shift modifier
    pub const fn shift(mut self) -> Self {
        self.modifiers.shift = true;
        self
    }
}

/// Sortable column headers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Header {
    Name,
    Modified,
}

/// An input event for the listing.
#[derive(Debug, Clone)]
pub enum ListingEvent {
    /// A pointer button went down.
    PointerDown {
        position: Position,
        button: MouseButton,
        modifiers: Modifiers,
    },
    /// The pointer moved while a button is held.
    PointerMove { position: Position },
    /// A pointer button was released.
    PointerUp {
        position: Position,
        button: MouseButton,
    },
    /// Two clicks in quick succession, as reported by the host.
    DoubleClick {
        position: Position,
        button: MouseButton,
    },
    /// A key press while the listing has focus.
    Key(KeyCombo),
    /// A column header was clicked.
    HeaderClick(Header),
    /// A transfer entered the listing.
    DragEnter(DragEvent),
    /// A transfer moved over the listing.
    DragOver(DragEvent),
    /// A transfer left the listing.
    DragLeave,
    /// A transfer was dropped on the listing.
    Drop(DragEvent),
    /// The transfer started by this listing finished with the given action.
    DragEnded(DropAction),
    /// The listing lost focus.
    Blur,
}

/// Result of handling an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventResult {
    /// Event was ignored, try other handlers.
    Ignored,
    /// Event was consumed, stop propagation.
    Consumed,
    /// A drag session was started; the host should run the transfer.
    StartDrag,
    /// A transfer event was accepted with the given action.
    Accept(DropAction),
}

impl EventResult {
    /// Check if the event was handled.
    pub fn is_handled(&self) -> bool {
        !matches!(self, EventResult::Ignored)
    }
}

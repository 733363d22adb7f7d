//! Error types

use thiserror::Error;

/// HTTP status used by backends to signal that a destination already exists.
pub const CONFLICT_STATUS: u16 = 409;

/// Errors returned by a [`ModelAdapter`](crate::ModelAdapter) operation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelError {
    /// HTTP-like error response from the backing store.
    #[error("{status}: {message}")]
    Http {
        /// Status code.
        status: u16,
        /// Error message.
        message: String,
    },

    /// The destination of a rename, copy or move is taken.
    #[error("{0} already exists")]
    AlreadyExists(String),

    /// The source of an operation does not exist.
    #[error("{0} not found")]
    NotFound(String),

    /// Any other backend failure.
    #[error("{0}")]
    Other(String),
}

impl ModelError {
    /// Creates a new HTTP-like error.
    pub fn http(status: u16, message: impl Into<String>) -> Self {
        Self::Http {
            status,
            message: message.into(),
        }
    }

    /// Creates a new conflict error for `path`.
    pub fn conflict(path: impl Into<String>) -> Self {
        Self::AlreadyExists(path.into())
    }

    /// Returns the status code if this is an HTTP-like error.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } => Some(*status),
            Self::AlreadyExists(_) => Some(CONFLICT_STATUS),
            _ => None,
        }
    }

    /// Returns `true` if the destination name is already taken.
    ///
    /// Backends disagree on how they report this, so a 409 status, the
    /// dedicated variant and an "already exists" message all count.
    pub fn is_conflict(&self) -> bool {
        match self {
            Self::Http { status, message } => {
                *status == CONFLICT_STATUS || message.contains("already exists")
            }
            Self::AlreadyExists(_) => true,
            Self::NotFound(_) => false,
            Self::Other(message) => message.contains("already exists"),
        }
    }
}

/// Errors raised by the listing controller.
#[derive(Debug, Error)]
pub enum ListingError {
    /// A model request failed.
    #[error(transparent)]
    Model(#[from] ModelError),

    /// Configuration could not be read or parsed.
    #[error("config error: {0}")]
    Config(String),

    /// The command needs a selected entry.
    #[error("no entry is selected")]
    NoSelection,

    /// A rename session is already active.
    #[error("a rename is already in progress")]
    RenameInProgress,

    /// A drag session is already active.
    #[error("a drag is already in progress")]
    DragInProgress,
}

impl From<toml::de::Error> for ListingError {
    fn from(err: toml::de::Error) -> Self {
        Self::Config(err.to_string())
    }
}

impl From<std::io::Error> for ListingError {
    fn from(err: std::io::Error) -> Self {
        Self::Config(err.to_string())
    }
}

impl ListingError {
    /// Returns `true` if this wraps a model conflict.
    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::Model(err) if err.is_conflict())
    }
}

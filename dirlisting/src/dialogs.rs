//! User confirmation and error surfaces.
//!
//! The listing never renders dialogs itself. It asks a [`Dialogs`]
//! implementation to confirm overwrites and to report failed requests.

use async_trait::async_trait;
use log::{info, warn};
use tokio::sync::{mpsc, oneshot};

use crate::error::ListingError;

/// Confirmation prompt and non-blocking error surface.
#[async_trait]
pub trait Dialogs: Send + Sync {
    /// Ask the user a yes/no question. `true` means the affirmative button.
    async fn confirm(&self, title: &str, body: &str) -> bool;

    /// Report a failed operation. Must not block.
    fn show_error(&self, title: &str, error: &ListingError);
}

/// Dialogs that answer every prompt the same way and log errors.
///
/// Useful for headless hosts and scripted runs.
#[derive(Debug, Clone, Copy)]
pub struct AutoDialogs {
    answer: bool,
}

impl AutoDialogs {
    pub fn new(answer: bool) -> Self {
        Self { answer }
    }
}

#[async_trait]
impl Dialogs for AutoDialogs {
    async fn confirm(&self, title: &str, body: &str) -> bool {
        info!("{}: {} -> {}", title, body, self.answer);
        self.answer
    }

    fn show_error(&self, title: &str, error: &ListingError) {
        warn!("{}: {}", title, error);
    }
}

/// A dialog request forwarded to the host UI.
#[derive(Debug)]
pub enum DialogRequest {
    /// Show a prompt and send the user's choice through `reply`.
    Confirm {
        title: String,
        body: String,
        reply: oneshot::Sender<bool>,
    },
    /// Show an error notification.
    Error { title: String, message: String },
}

/// Dialogs forwarded over a channel to whatever renders them.
///
/// A prompt whose reply sender is dropped counts as declined.
#[derive(Debug, Clone)]
pub struct ChannelDialogs {
    tx: mpsc::UnboundedSender<DialogRequest>,
}

impl ChannelDialogs {
    /// Create the dialogs and the receiver the host reads requests from.
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<DialogRequest>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

#[async_trait]
impl Dialogs for ChannelDialogs {
    async fn confirm(&self, title: &str, body: &str) -> bool {
        let (reply, answer) = oneshot::channel();
        let request = DialogRequest::Confirm {
            title: title.to_string(),
            body: body.to_string(),
            reply,
        };
        if self.tx.send(request).is_err() {
            warn!("Dialog host is gone, declining '{}'", title);
            return false;
        }
        answer.await.unwrap_or(false)
    }

    fn show_error(&self, title: &str, error: &ListingError) {
        warn!("{}: {}", title, error);
        let _ = self.tx.send(DialogRequest::Error {
            title: title.to_string(),
            message: error.to_string(),
        });
    }
}

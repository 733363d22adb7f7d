//! Open-requested subscriptions.

use std::sync::atomic::{AtomicUsize, Ordering};

use crate::model::Entry;

/// Handle returned by [`OpenObservers::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(usize);

impl SubscriptionId {
    fn new() -> Self {
        static COUNTER: AtomicUsize = AtomicUsize::new(0);
        Self(COUNTER.fetch_add(1, Ordering::SeqCst))
    }
}

type OpenCallback = Box<dyn Fn(&Entry) + Send + Sync>;

/// Callbacks told when a non-directory entry should be opened.
#[derive(Default)]
pub struct OpenObservers {
    callbacks: Vec<(SubscriptionId, OpenCallback)>,
}

impl OpenObservers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self, callback: impl Fn(&Entry) + Send + Sync + 'static) -> SubscriptionId {
        let id = SubscriptionId::new();
        self.callbacks.push((id, Box::new(callback)));
        id
    }

    /// Remove a subscription. Returns `false` if it was already gone.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.callbacks.len();
        self.callbacks.retain(|(sub, _)| *sub != id);
        self.callbacks.len() != before
    }

    /// Deliver `entry` to every subscriber in subscription order.
    pub fn emit(&self, entry: &Entry) {
        for (_, callback) in &self.callbacks {
            callback(entry);
        }
    }
}

impl std::fmt::Debug for OpenObservers {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenObservers")
            .field("subscribers", &self.callbacks.len())
            .finish()
    }
}

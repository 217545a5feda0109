//! Session state shared by the components of one running client. There is a
//! single writer path (login and logout through the gateway) and any number of
//! readers. Subscribers see the latest identity at subscription time first, so
//! a reader created after login still observes the logged-in user.

use crate::session::token::Identity;
use std::sync::Arc;
use tokio::sync::watch;

/// Holder of the currently authenticated identity. Clones are handles to the
/// same state.
#[derive(Clone, Debug)]
pub struct SessionState {
    sender: Arc<watch::Sender<Option<Identity>>>,
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionState {
    #[must_use]
    pub fn new() -> Self {
        let (sender, _) = watch::channel(None);
        Self {
            sender: Arc::new(sender),
        }
    }

    /// Replaces the current identity; `None` means logged out.
    pub fn set_user(&self, identity: Option<Identity>) {
        self.sender.send_replace(identity);
    }

    #[must_use]
    pub fn current_user(&self) -> Option<Identity> {
        self.sender.borrow().clone()
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.sender.borrow().is_some()
    }

    /// Returns a receiver whose first value is the current identity, followed by
    /// every later change.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Option<Identity>> {
        let mut receiver = self.sender.subscribe();
        receiver.mark_changed();
        receiver
    }
}

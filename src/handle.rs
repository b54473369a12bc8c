//! Disposer handles returned by `listen` and `block`.
//!
//! A handle remembers which history created it and the identity of what it
//! installed. [`ListenerHandle::dispose`] and [`BlockHandle::dispose`] are
//! idempotent, and do nothing once the history itself is gone.

use crate::transition::{ListenerId, PromptId};
use std::cell::Cell;
use std::fmt;
use std::rc::Weak;

/// Implemented by each history's shared state so handles can undo their
/// registration.
pub(crate) trait Release {
    fn release_listener(&self, id: ListenerId);
    fn release_block(&self, id: PromptId);
}

/// Subscription returned by `listen`.
#[must_use = "dropping the handle keeps the listener subscribed; call dispose() to unsubscribe"]
pub struct ListenerHandle {
    owner: Weak<dyn Release>,
    id: ListenerId,
    disposed: Cell<bool>,
}

impl ListenerHandle {
    pub(crate) fn new(owner: Weak<dyn Release>, id: ListenerId) -> Self {
        Self {
            owner,
            id,
            disposed: Cell::new(false),
        }
    }

    pub fn id(&self) -> ListenerId {
        self.id
    }

    /// Unsubscribe the listener.
    pub fn dispose(&self) {
        if self.disposed.replace(true) {
            return;
        }
        if let Some(owner) = self.owner.upgrade() {
            owner.release_listener(self.id);
        }
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed.get()
    }
}

impl fmt::Debug for ListenerHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListenerHandle")
            .field("id", &self.id)
            .field("disposed", &self.disposed.get())
            .finish()
    }
}

/// Prompt installation returned by `block`.
#[must_use = "dropping the handle keeps the prompt installed; call dispose() to unblock"]
pub struct BlockHandle {
    owner: Weak<dyn Release>,
    id: PromptId,
    disposed: Cell<bool>,
}

impl BlockHandle {
    pub(crate) fn new(owner: Weak<dyn Release>, id: PromptId) -> Self {
        Self {
            owner,
            id,
            disposed: Cell::new(false),
        }
    }

    pub fn id(&self) -> PromptId {
        self.id
    }

    /// Remove the prompt, unless another `block` has replaced it since.
    pub fn dispose(&self) {
        if self.disposed.replace(true) {
            return;
        }
        if let Some(owner) = self.owner.upgrade() {
            owner.release_block(self.id);
        }
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed.get()
    }
}

impl fmt::Debug for BlockHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BlockHandle")
            .field("id", &self.id)
            .field("disposed", &self.disposed.get())
            .finish()
    }
}

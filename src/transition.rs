//! Transition manager.
//!
//! Holds the single active [`Prompt`] and the ordered listener set, and is
//! the one chokepoint every navigation passes through before it commits:
//! [`TransitionManager::confirm_transition_to`].
//!
//! Listeners are notified in subscription order. A listener removed while a
//! notification is running is skipped for the rest of that notification and
//! never called again.

use crate::confirm::{ConfirmReply, UserConfirmation};
use crate::location::Location;
use crate::prompt::{Prompt, PromptResult};
use crate::{soft_warning, trace_log, Action};
use std::cell::{Cell, RefCell};
use std::rc::Rc;

/// Subscriber callback.
pub type Listener = Rc<dyn Fn(&Location, Action)>;

/// Identity of an installed prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PromptId(u64);

/// Identity of a subscribed listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

struct ListenerSlot {
    id: ListenerId,
    active: Rc<Cell<bool>>,
    callback: Listener,
}

/// Prompt and listener bookkeeping shared by every history adapter.
#[derive(Default)]
pub struct TransitionManager {
    prompt: RefCell<Option<(PromptId, Prompt)>>,
    listeners: RefCell<Vec<ListenerSlot>>,
    awaiting_reply: Rc<Cell<bool>>,
    next_id: Cell<u64>,
}

impl TransitionManager {
    pub fn new() -> Self {
        Self::default()
    }

    fn next_id(&self) -> u64 {
        let id = self.next_id.get() + 1;
        self.next_id.set(id);
        id
    }

    // ========================================================================
    // Prompt
    // ========================================================================

    /// Install `prompt`, replacing any prompt already installed.
    pub fn set_prompt(&self, prompt: Prompt) -> PromptId {
        let id = PromptId(self.next_id());
        let previous = self.prompt.replace(Some((id, prompt)));
        if previous.is_some() {
            soft_warning!("A history supports only one prompt at a time");
        }
        id
    }

    /// Clear the prompt if `id` is still the installed one.
    ///
    /// Returns `false` when the prompt was already cleared or superseded.
    pub fn clear_prompt(&self, id: PromptId) -> bool {
        let mut prompt = self.prompt.borrow_mut();
        if matches!(&*prompt, Some((current, _)) if *current == id) {
            *prompt = None;
            true
        } else {
            false
        }
    }

    pub fn has_prompt(&self) -> bool {
        self.prompt.borrow().is_some()
    }

    /// Whether a confirmation has been handed to the host and not answered.
    pub fn is_awaiting_confirmation(&self) -> bool {
        self.awaiting_reply.get()
    }

    /// Ask the installed prompt whether `location` may become current.
    ///
    /// `callback` runs synchronously unless the prompt produced a message
    /// and `confirmation` is present, in which case it runs whenever the host
    /// answers the [`ConfirmReply`].
    pub fn confirm_transition_to<F>(
        &self,
        location: &Location,
        action: Action,
        confirmation: Option<&dyn UserConfirmation>,
        callback: F,
    ) where
        F: FnOnce(bool) + 'static,
    {
        // Cloned out so the prompt may call back into the history.
        let prompt = self.prompt.borrow().as_ref().map(|(_, prompt)| prompt.clone());
        let Some(prompt) = prompt else {
            callback(true);
            return;
        };

        match prompt.evaluate(location, action) {
            PromptResult::Allow => callback(true),
            PromptResult::Deny => {
                trace_log!("Prompt denied {} to '{}'", action, location.path());
                callback(false);
            }
            PromptResult::Confirm(message) => match confirmation {
                Some(confirmation) => {
                    trace_log!("Asking for confirmation: {}", message);
                    self.awaiting_reply.set(true);
                    let awaiting = Rc::clone(&self.awaiting_reply);
                    confirmation.confirm(
                        &message,
                        ConfirmReply::new(move |ok| {
                            awaiting.set(false);
                            callback(ok);
                        }),
                    );
                }
                None => {
                    soft_warning!(
                        "A history needs a getUserConfirmation function in order to use a prompt message"
                    );
                    callback(true);
                }
            },
        }
    }

    // ========================================================================
    // Listeners
    // ========================================================================

    /// Subscribe a listener; it is called after every committed transition.
    pub fn append_listener(&self, listener: Listener) -> ListenerId {
        let id = ListenerId(self.next_id());
        self.listeners.borrow_mut().push(ListenerSlot {
            id,
            active: Rc::new(Cell::new(true)),
            callback: listener,
        });
        id
    }

    /// Unsubscribe a listener. Returns `false` if it was already removed.
    pub fn remove_listener(&self, id: ListenerId) -> bool {
        let mut listeners = self.listeners.borrow_mut();
        let Some(position) = listeners.iter().position(|slot| slot.id == id) else {
            return false;
        };
        let slot = listeners.remove(position);
        slot.active.set(false);
        true
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.borrow().len()
    }

    /// Call every active listener in subscription order.
    pub fn notify_listeners(&self, location: &Location, action: Action) {
        let snapshot: Vec<(Rc<Cell<bool>>, Listener)> = self
            .listeners
            .borrow()
            .iter()
            .map(|slot| (Rc::clone(&slot.active), Rc::clone(&slot.callback)))
            .collect();

        for (active, callback) in snapshot {
            if active.get() {
                callback(location, action);
            }
        }
    }
}

impl std::fmt::Debug for TransitionManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TransitionManager")
            .field("prompt", &self.prompt.borrow().as_ref().map(|(_, p)| p.clone()))
            .field("listeners", &self.listener_count())
            .field("awaiting_reply", &self.awaiting_reply.get())
            .finish()
    }
}

// ============================================================================
// Tests
// ============================================================================

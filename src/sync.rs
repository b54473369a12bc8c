//! Stack synchronizer.
//!
//! Shared machinery for histories backed by an external store that can move
//! on its own (the browser's back and forward buttons). [`Synchronizer`]
//! owns the committed state, the internal [`NavigationStack`], and the
//! reference count of the environment subscription, and runs every
//! navigation through the [`TransitionManager`].
//!
//! # POP reconciliation
//!
//! By the time a POP is observed the external store has already moved. If
//! the prompt rejects it, the synchronizer looks up the committed location
//! and the candidate in its token stack and issues `go(delta)` to move the
//! store back. The change event caused by that revert is absorbed by a
//! one-shot flag instead of being confirmed again.
//!
//! While a POP waits for the user, the store sits on that POP's candidate
//! rather than on the committed location. Any further POP is reverted to the
//! candidate, so the pending answer still describes where the store is.

use crate::confirm::{PendingNavigation, UserConfirmation};
use crate::env::{Environment, SubscriptionId};
use crate::error::NavigationResult;
use crate::handle::Release;
use crate::location::Location;
use crate::prompt::Prompt;
use crate::stack::{NavigationStack, TokenLookup};
use crate::transition::{Listener, ListenerId, PromptId, TransitionManager};
use crate::{debug_log, trace_log, Action};
use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};

// ============================================================================
// Transition driver
// ============================================================================

/// Run `location` through the transition manager and apply it on approval.
///
/// A navigation requested while another one is waiting for the user resolves
/// to [`NavigationResult::Busy`] without consulting the prompt.
pub(crate) fn run_transition<O, F>(
    owner: Weak<O>,
    transitions: &TransitionManager,
    confirmation: Option<&dyn UserConfirmation>,
    location: Location,
    action: Action,
    apply: F,
) -> PendingNavigation
where
    O: 'static,
    F: FnOnce(&O, Location) -> NavigationResult + 'static,
{
    let (settle, pending) = PendingNavigation::channel();

    if transitions.is_awaiting_confirmation() {
        debug_log!(
            "{} to '{}' refused: another navigation is awaiting confirmation",
            action,
            location.path()
        );
        settle.send(NavigationResult::Busy);
        return pending;
    }

    let candidate = location.clone();
    transitions.confirm_transition_to(&location, action, confirmation, move |ok| {
        let result = match owner.upgrade() {
            Some(owner) if ok => apply(&*owner, candidate),
            Some(_) => {
                debug_log!("{} to '{}' cancelled", action, candidate.path());
                NavigationResult::Cancelled
            }
            None => NavigationResult::Cancelled,
        };
        settle.send(result);
    });

    pending
}

// ============================================================================
// External store
// ============================================================================

/// The adapter-specific half of a synchronizer.
pub(crate) trait ExternalStore: Sized + 'static {
    /// Stack token identifying an entry.
    type Token: Clone + PartialEq + fmt::Debug + 'static;

    fn token(location: &Location) -> Self::Token;

    fn env(&self) -> &dyn Environment;

    /// Read the store after a change notification. `None` means the change
    /// is not a navigation (or is our own echo) and must be ignored.
    fn observe(sync: &Synchronizer<Self>) -> Option<Location>;
}

/// Committed navigation state.
#[derive(Debug, Clone)]
pub(crate) struct Current {
    pub action: Action,
    pub location: Location,
    pub length: usize,
}

#[derive(Debug, Default)]
struct Listening {
    count: Cell<usize>,
    blocked: Cell<bool>,
    subscription: Cell<Option<SubscriptionId>>,
}

// ============================================================================
// Synchronizer
// ============================================================================

pub(crate) struct Synchronizer<S: ExternalStore> {
    pub(crate) store: S,
    pub(crate) transitions: TransitionManager,
    confirmation: Option<Rc<dyn UserConfirmation>>,
    current: RefCell<Current>,
    stack: RefCell<NavigationStack<S::Token>>,
    force_next_pop: Cell<bool>,
    /// Candidate of a POP that is waiting for the user.
    pending_pop: RefCell<Option<Location>>,
    listening: Listening,
    this: Weak<Self>,
}

impl<S: ExternalStore> Synchronizer<S> {
    pub(crate) fn new(
        store: S,
        initial: Location,
        lookup: TokenLookup,
        confirmation: Option<Rc<dyn UserConfirmation>>,
    ) -> Rc<Self> {
        let length = store.env().length();
        let stack = NavigationStack::new(S::token(&initial), lookup);
        Rc::new_cyclic(|this| Self {
            store,
            transitions: TransitionManager::new(),
            confirmation,
            current: RefCell::new(Current {
                action: Action::Pop,
                location: initial,
                length,
            }),
            stack: RefCell::new(stack),
            force_next_pop: Cell::new(false),
            pending_pop: RefCell::new(None),
            listening: Listening::default(),
            this: this.clone(),
        })
    }

    pub(crate) fn location(&self) -> Location {
        self.current.borrow().location.clone()
    }

    pub(crate) fn action(&self) -> Action {
        self.current.borrow().action
    }

    pub(crate) fn length(&self) -> usize {
        self.current.borrow().length
    }

    /// Where the external store is expected to be: the candidate of a
    /// pending POP, otherwise the committed location.
    pub(crate) fn store_location(&self) -> Location {
        match &*self.pending_pop.borrow() {
            Some(candidate) => candidate.clone(),
            None => self.location(),
        }
    }

    /// A revert is in flight and its change event has not arrived yet.
    pub(crate) fn is_forcing_pop(&self) -> bool {
        self.force_next_pop.get()
    }

    pub(crate) fn stack_tokens(&self) -> Vec<S::Token> {
        self.stack.borrow().tokens().to_vec()
    }

    pub(crate) fn listening_count(&self) -> usize {
        self.listening.count.get()
    }

    pub(crate) fn owner(&self) -> Weak<dyn Release> {
        self.this.clone()
    }

    // ========================================================================
    // Navigation
    // ========================================================================

    pub(crate) fn navigate<F>(&self, location: Location, action: Action, apply: F) -> PendingNavigation
    where
        F: FnOnce(&Self, Location) -> NavigationResult + 'static,
    {
        run_transition(
            self.this.clone(),
            &self.transitions,
            self.confirmation.as_deref(),
            location,
            action,
            apply,
        )
    }

    /// Truncate the stack after the committed entry and append `location`.
    pub(crate) fn record_push(&self, location: &Location) {
        let current = S::token(&self.current.borrow().location);
        self.stack.borrow_mut().push(&current, S::token(location));
    }

    /// Overwrite the committed entry's token with `location`'s.
    pub(crate) fn record_replace(&self, location: &Location) {
        let current = S::token(&self.current.borrow().location);
        self.stack.borrow_mut().replace(&current, S::token(location));
    }

    /// Make `next` current (or keep the current state when `None`), refresh
    /// the length, and notify listeners.
    pub(crate) fn commit(&self, next: Option<(Action, Location)>) {
        let (location, action) = {
            let mut current = self.current.borrow_mut();
            if let Some((action, location)) = next {
                debug_log!("{} committed: {}", action, location.path());
                current.action = action;
                current.location = location;
            }
            current.length = self.store.env().length();
            (current.location.clone(), current.action)
        };
        self.transitions.notify_listeners(&location, action);
    }

    // ========================================================================
    // POP handling
    // ========================================================================

    fn on_external_change(&self) {
        if let Some(location) = S::observe(self) {
            self.handle_pop(location);
        }
    }

    pub(crate) fn handle_pop(&self, location: Location) {
        if self.force_next_pop.replace(false) {
            trace_log!("Absorbing revert echo at '{}'", location.path());
            self.commit(None);
            return;
        }

        if self.transitions.is_awaiting_confirmation() {
            debug_log!(
                "POP to '{}' while a confirmation is pending; reverting",
                location.path()
            );
            self.revert_pop(&location, &self.store_location());
            return;
        }

        let this = self.this.clone();
        let candidate = location.clone();
        *self.pending_pop.borrow_mut() = Some(location.clone());
        self.transitions.confirm_transition_to(
            &location,
            Action::Pop,
            self.confirmation.as_deref(),
            move |ok| {
                let Some(this) = this.upgrade() else {
                    return;
                };
                this.pending_pop.borrow_mut().take();
                if ok {
                    this.commit(Some((Action::Pop, candidate)));
                } else {
                    this.revert_pop(&candidate, &this.location());
                }
            },
        );
    }

    /// Move the external store from `from` back to `to`.
    fn revert_pop(&self, from: &Location, to: &Location) {
        let delta = self.stack.borrow().revert_delta(&S::token(to), &S::token(from));

        if delta == 0 {
            trace_log!("Cancelled POP needs no revert");
            return;
        }

        debug_log!("Reverting cancelled POP with go({})", delta);
        self.force_next_pop.set(true);
        self.store.env().go_by(delta);
    }

    // ========================================================================
    // Listening
    // ========================================================================

    /// Adjust the subscription reference count, subscribing on 0 → 1 and
    /// unsubscribing on 1 → 0.
    fn adjust_listening(&self, delta: isize) {
        let count = self.listening.count.get().saturating_add_signed(delta);
        self.listening.count.set(count);

        if count == 1 && delta == 1 {
            let this = self.this.clone();
            let id = self.store.env().subscribe(Rc::new(move || {
                if let Some(this) = this.upgrade() {
                    this.on_external_change();
                }
            }));
            self.listening.subscription.set(Some(id));
            debug_log!("Subscribed to external navigation events");
        } else if count == 0 {
            if let Some(id) = self.listening.subscription.take() {
                self.store.env().unsubscribe(id);
                debug_log!("Unsubscribed from external navigation events");
            }
        }
    }

    pub(crate) fn block(&self, prompt: Prompt) -> PromptId {
        let id = self.transitions.set_prompt(prompt);
        if !self.listening.blocked.replace(true) {
            self.adjust_listening(1);
        }
        id
    }

    pub(crate) fn listen(&self, listener: Listener) -> ListenerId {
        let id = self.transitions.append_listener(listener);
        self.adjust_listening(1);
        id
    }
}

impl<S: ExternalStore> Drop for Synchronizer<S> {
    fn drop(&mut self) {
        if let Some(id) = self.listening.subscription.take() {
            self.store.env().unsubscribe(id);
            debug_log!("Unsubscribed from external navigation events on drop");
        }
    }
}

impl<S: ExternalStore> Release for Synchronizer<S> {
    fn release_listener(&self, id: ListenerId) {
        if self.transitions.remove_listener(id) {
            self.adjust_listening(-1);
        }
    }

    fn release_block(&self, id: PromptId) {
        // A superseded prompt no longer owns the blocking subscription.
        if self.transitions.clear_prompt(id) && self.listening.blocked.replace(false) {
            self.adjust_listening(-1);
        }
    }
}

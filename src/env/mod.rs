//! Environment adapters.
//!
//! The history types never touch a DOM directly. They talk to an
//! environment through these traits:
//!
//! | Trait | Used by | Backing store |
//! |-------|---------|---------------|
//! | [`Environment`] | both | relative navigation, length, change subscription |
//! | [`BrowserEnvironment`] | [`BrowserHistory`](crate::BrowserHistory) | `pushState` / `replaceState` + `popstate` |
//! | [`HashEnvironment`] | [`HashHistory`](crate::HashHistory) | URL fragment + `hashchange` |
//!
//! A web host implements them over `web_sys::Window`; [`SimulatedWindow`]
//! implements both in-process for non-DOM hosts and tests.
//!
//! # Change delivery
//!
//! Environments must deliver change notifications from their own event loop,
//! never from inside a call made by the history (`go_by`, `write`, ...).
//! Browsers behave this way: `history.go()` fires `popstate` later.

mod simulated;

pub use simulated::SimulatedWindow;

use crate::state::StateValue;
use std::rc::Rc;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Callback the history registers for out-of-band changes.
pub type ChangeCallback = Rc<dyn Fn()>;

/// Handle for a change subscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(pub u64);

/// Whether a write adds an entry or overwrites the current one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteKind {
    Push,
    Replace,
}

/// What browser history stores in a native entry's state slot.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct EntryState {
    pub key: Option<String>,
    pub state: Option<StateValue>,
}

/// Capabilities shared by every external-store environment.
pub trait Environment {
    /// `false` when the environment cannot host a history at all (no DOM).
    fn is_available(&self) -> bool {
        true
    }

    /// Number of entries in the external stack.
    fn length(&self) -> usize;

    /// Move through the external stack; a change notification follows.
    fn go_by(&self, delta: isize);

    /// Register for out-of-band changes (`popstate`, `hashchange`).
    fn subscribe(&self, on_change: ChangeCallback) -> SubscriptionId;

    fn unsubscribe(&self, id: SubscriptionId);
}

/// Native history API.
pub trait BrowserEnvironment: Environment {
    /// Current `pathname + search + hash` and the native entry state.
    fn read_current(&self) -> (String, EntryState);

    /// `pushState` / `replaceState`. Does not notify subscribers.
    fn write(&self, kind: WriteKind, href: &str, entry: EntryState);

    /// Full page navigation: `location.assign` / `location.replace`.
    fn navigate(&self, kind: WriteKind, href: &str);

    /// Whether `pushState` is available.
    fn supports_history(&self) -> bool {
        true
    }
}

/// URL fragment.
pub trait HashEnvironment: Environment {
    /// Everything after the first `#` of the raw URL, undecoded.
    fn read_hash_path(&self) -> String;

    /// Assign (push) or replace the fragment.
    fn write_hash_path(&self, kind: WriteKind, path: &str);

    /// Document URL without its fragment when the page has a `<base href>`.
    fn base_href(&self) -> Option<String> {
        None
    }

    /// Whether `go(n)` works without reloading the page.
    fn can_go_without_reload(&self) -> bool {
        true
    }
}

impl<T: Environment + ?Sized> Environment for Rc<T> {
    fn is_available(&self) -> bool {
        (**self).is_available()
    }

    fn length(&self) -> usize {
        (**self).length()
    }

    fn go_by(&self, delta: isize) {
        (**self).go_by(delta);
    }

    fn subscribe(&self, on_change: ChangeCallback) -> SubscriptionId {
        (**self).subscribe(on_change)
    }

    fn unsubscribe(&self, id: SubscriptionId) {
        (**self).unsubscribe(id);
    }
}

impl<T: BrowserEnvironment + ?Sized> BrowserEnvironment for Rc<T> {
    fn read_current(&self) -> (String, EntryState) {
        (**self).read_current()
    }

    fn write(&self, kind: WriteKind, href: &str, entry: EntryState) {
        (**self).write(kind, href, entry);
    }

    fn navigate(&self, kind: WriteKind, href: &str) {
        (**self).navigate(kind, href);
    }

    fn supports_history(&self) -> bool {
        (**self).supports_history()
    }
}

impl<T: HashEnvironment + ?Sized> HashEnvironment for Rc<T> {
    fn read_hash_path(&self) -> String {
        (**self).read_hash_path()
    }

    fn write_hash_path(&self, kind: WriteKind, path: &str) {
        (**self).write_hash_path(kind, path);
    }

    fn base_href(&self) -> Option<String> {
        (**self).base_href()
    }

    fn can_go_without_reload(&self) -> bool {
        (**self).can_go_without_reload()
    }
}

//! The history interface shared by every adapter.

use crate::confirm::PendingNavigation;
use crate::error::HistoryError;
use crate::handle::{BlockHandle, ListenerHandle};
use crate::location::{Location, PathInput};
use crate::prompt::Prompt;
use crate::state::StateValue;
use crate::Action;

/// A navigation history.
///
/// Object safe, so routers can hold a `Box<dyn History>` and stay agnostic
/// of the backing store.
///
/// ```
/// use navigator_history::{History, MemoryHistory, MemoryHistoryOptions, StateValue};
///
/// let history: Box<dyn History> = Box::new(MemoryHistory::new(MemoryHistoryOptions::new()).unwrap());
///
/// let _ = history.push("/users/7?tab=posts".into(), Some(StateValue::from("from-list"))).unwrap();
/// assert_eq!(history.location().pathname(), "/users/7");
/// assert_eq!(history.location().search(), "?tab=posts");
/// assert_eq!(history.length(), 2);
///
/// history.go_back();
/// assert_eq!(history.location().pathname(), "/");
/// ```
pub trait History {
    /// Number of entries in the underlying stack.
    fn length(&self) -> usize;

    /// Action that produced the current location.
    fn action(&self) -> Action;

    fn location(&self) -> Location;

    /// Href to render in links for `location`.
    fn create_href(&self, location: &Location) -> String;

    /// Add an entry. Fails only when the path cannot be decoded.
    fn push(&self, path: PathInput, state: Option<StateValue>) -> Result<PendingNavigation, HistoryError>;

    /// Overwrite the current entry.
    fn replace(&self, path: PathInput, state: Option<StateValue>) -> Result<PendingNavigation, HistoryError>;

    /// Move `delta` entries through the stack.
    fn go(&self, delta: isize);

    fn go_back(&self) {
        self.go(-1);
    }

    fn go_forward(&self) {
        self.go(1);
    }

    /// Install `prompt`, replacing any prompt already installed.
    fn block(&self, prompt: Prompt) -> BlockHandle;

    /// Subscribe `listener` to committed transitions.
    fn listen_boxed(&self, listener: Box<dyn Fn(&Location, Action)>) -> ListenerHandle;

    fn listen<F>(&self, listener: F) -> ListenerHandle
    where
        Self: Sized,
        F: Fn(&Location, Action) + 'static,
    {
        self.listen_boxed(Box::new(listener))
    }
}

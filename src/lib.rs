//! # navigator-history
//!
//! Session history for client-side routers: one [`History`] interface over
//! three backing stores.
//!
//! | Adapter | Store | Keys | State |
//! |---------|-------|------|-------|
//! | [`BrowserHistory`] | native history API | yes | yes |
//! | [`HashHistory`] | URL fragment | no | no |
//! | [`MemoryHistory`] | in-process stack | yes | yes |
//!
//! Every navigation passes through a [`TransitionManager`], which consults
//! the active [`Prompt`] (installed with [`History::block`]) and, when the
//! prompt produces a message, the host's [`UserConfirmation`]. Listeners
//! are notified only after a transition commits.
//!
//! Browser and hash histories also react to out-of-band moves (the back and
//! forward buttons). Such a POP has already happened by the time it is seen,
//! so a rejected POP is undone by moving the native stack back.
//!
//! ```
//! use navigator_history::{
//!     prompt_fn, Action, ConfirmReply, History, MemoryHistory, MemoryHistoryOptions, PromptResult,
//! };
//!
//! let history = MemoryHistory::new(
//!     MemoryHistoryOptions::new().confirmation(|_message: &str, reply: ConfirmReply| reply.deny()),
//! )
//! .unwrap();
//!
//! let _listener = history.listen(|location, action| {
//!     println!("{} {}", action, location.path());
//! });
//! let blocker = history.block(prompt_fn(|location, _action| {
//!     if location.pathname() == "/checkout" {
//!         PromptResult::confirm("Leave the cart?")
//!     } else {
//!         PromptResult::Allow
//!     }
//! }));
//!
//! let _ = history.push("/catalog".into(), None).unwrap();
//! let _ = history.push("/checkout".into(), None).unwrap();
//! assert_eq!(history.location().pathname(), "/catalog");
//! assert_eq!(history.action(), Action::Push);
//!
//! blocker.dispose();
//! ```
//!
//! ## Features
//!
//! - `log` (default): log through the `log` crate.
//! - `tracing`: log through the `tracing` crate instead.
//! - `serde` (default): `Serialize`/`Deserialize` for locations and state.

#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod logging;

pub mod browser;
pub mod confirm;
pub mod env;
pub mod error;
mod handle;
pub mod hash;
pub mod history;
pub mod key;
pub mod location;
pub mod memory;
pub mod options;
pub mod path;
pub mod prompt;
pub mod stack;
pub mod state;
mod sync;
pub mod transition;

pub use browser::BrowserHistory;
pub use confirm::{ConfirmReply, PendingNavigation, UserConfirmation};
pub use env::{
    BrowserEnvironment, ChangeCallback, EntryState, Environment, HashEnvironment,
    SimulatedWindow, SubscriptionId, WriteKind,
};
pub use error::{HistoryError, NavigationResult};
pub use handle::{BlockHandle, ListenerHandle};
pub use hash::{HashHistory, HashType};
pub use history::History;
pub use key::{create_key, DEFAULT_KEY_LENGTH};
pub use location::{create_location, locations_are_equal, Location, PartialLocation, PathInput};
pub use memory::MemoryHistory;
pub use options::{BrowserHistoryOptions, HashHistoryOptions, MemoryHistoryOptions};
pub use path::{create_path, parse_path, PathComponents, PathParts};
pub use prompt::{prompt_fn, Prompt, PromptFn, PromptResult};
pub use stack::{NavigationStack, TokenLookup};
pub use state::StateValue;
pub use transition::{Listener, ListenerId, PromptId, TransitionManager};

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// How the current location was reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "UPPERCASE"))]
pub enum Action {
    /// A new entry was added.
    Push,
    /// The current entry was overwritten.
    Replace,
    /// The stack cursor moved (initial load, back/forward, `go`).
    Pop,
}

impl Action {
    /// Method name used in advisory messages.
    pub(crate) fn verb(self) -> &'static str {
        match self {
            Action::Push => "push",
            Action::Replace => "replace",
            Action::Pop => "go",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Action::Push => "PUSH",
            Action::Replace => "REPLACE",
            Action::Pop => "POP",
        })
    }
}

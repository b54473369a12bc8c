//! Block prompts.
//!
//! A [`Prompt`] is the single guard a history consults before every
//! transition (PUSH, REPLACE and POP). It is installed with `block` and
//! evaluates to a [`PromptResult`]:
//!
//! | Result | Effect |
//! |--------|--------|
//! | [`PromptResult::Allow`] | Navigation proceeds |
//! | [`PromptResult::Deny`] | Navigation is cancelled |
//! | [`PromptResult::Confirm`] | The message goes to the host's [`UserConfirmation`](crate::UserConfirmation) |
//!
//! # Example
//!
//! ```
//! use navigator_history::{prompt_fn, Action, PromptResult};
//!
//! let guard = prompt_fn(|location, action| {
//!     if action == Action::Pop && location.pathname() == "/checkout" {
//!         PromptResult::confirm("Leave checkout?")
//!     } else {
//!         PromptResult::Allow
//!     }
//! });
//! # let _ = guard;
//! ```

use crate::location::Location;
use crate::Action;
use std::fmt;
use std::rc::Rc;

/// What a prompt decided for one transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptResult {
    /// Let the navigation through.
    Allow,
    /// Cancel the navigation.
    Deny,
    /// Ask the user, showing this message.
    Confirm(String),
}

impl PromptResult {
    pub fn confirm(message: impl Into<String>) -> Self {
        Self::Confirm(message.into())
    }
}

impl From<bool> for PromptResult {
    fn from(allow: bool) -> Self {
        if allow {
            Self::Allow
        } else {
            Self::Deny
        }
    }
}

impl From<&str> for PromptResult {
    fn from(message: &str) -> Self {
        Self::Confirm(message.to_string())
    }
}

impl From<String> for PromptResult {
    fn from(message: String) -> Self {
        Self::Confirm(message)
    }
}

/// Function form of a prompt.
pub type PromptFn = Rc<dyn Fn(&Location, Action) -> PromptResult>;

/// A guard installed by `block`.
#[derive(Clone)]
pub enum Prompt {
    /// The same answer for every transition.
    Fixed(PromptResult),
    /// Decided per transition from the candidate location and action.
    Guard(PromptFn),
}

impl Prompt {
    /// Evaluate the prompt for a candidate transition.
    pub fn evaluate(&self, location: &Location, action: Action) -> PromptResult {
        match self {
            Prompt::Fixed(result) => result.clone(),
            Prompt::Guard(f) => f(location, action),
        }
    }
}

/// Blocks every transition.
impl Default for Prompt {
    fn default() -> Self {
        Prompt::Fixed(PromptResult::Deny)
    }
}

impl fmt::Debug for Prompt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Prompt::Fixed(result) => f.debug_tuple("Prompt::Fixed").field(result).finish(),
            Prompt::Guard(_) => f.write_str("Prompt::Guard(..)"),
        }
    }
}

impl From<PromptResult> for Prompt {
    fn from(result: PromptResult) -> Self {
        Prompt::Fixed(result)
    }
}

impl From<bool> for Prompt {
    fn from(allow: bool) -> Self {
        Prompt::Fixed(allow.into())
    }
}

impl From<&str> for Prompt {
    fn from(message: &str) -> Self {
        Prompt::Fixed(message.into())
    }
}

impl From<String> for Prompt {
    fn from(message: String) -> Self {
        Prompt::Fixed(message.into())
    }
}

/// Create a prompt from a function or closure.
pub fn prompt_fn<F>(f: F) -> Prompt
where
    F: Fn(&Location, Action) -> PromptResult + 'static,
{
    Prompt::Guard(Rc::new(f))
}

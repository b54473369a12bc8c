//! Errors and navigation outcomes.
//!
//! Two kinds of result come out of a history:
//!
//! - [`HistoryError`] — a true error. Raised synchronously to the caller of
//!   `push`/`replace` or of an adapter constructor, never recovered
//!   internally.
//! - [`NavigationResult`] — the outcome of a navigation that was accepted for
//!   processing (`Committed`, `Cancelled`, `Busy`, `Unchanged`,
//!   `FullReload`). A cancelled navigation is a normal outcome, not an error.
//!
//! # Examples
//!
//! ```
//! use navigator_history::error::{HistoryError, NavigationResult};
//!
//! let err = HistoryError::InvalidPath { pathname: "/%E0%A4%A".into() };
//! assert!(err.to_string().contains("could not be decoded"));
//!
//! assert!(NavigationResult::Cancelled.is_cancelled());
//! ```

use crate::location::Location;
use crate::Action;
use std::fmt;

// ============================================================================
// Navigation Result Types
// ============================================================================

/// Outcome of a navigation once it has passed through the transition manager.
///
/// Every [`PendingNavigation`](crate::PendingNavigation) resolves to one of
/// these.
#[derive(Debug, Clone, PartialEq)]
pub enum NavigationResult {
    /// The navigation was confirmed and is now the current location.
    Committed { action: Action, location: Location },
    /// The active prompt (or the user) rejected the navigation.
    Cancelled,
    /// Another navigation is still waiting for user confirmation.
    Busy,
    /// Confirmed, but the backing store could not move (hash history pushing
    /// the path it already shows). Listeners are re-notified with the
    /// unchanged location.
    Unchanged,
    /// The environment performed a full page navigation to `href` instead of
    /// an in-place history update.
    FullReload { href: String },
}

impl NavigationResult {
    /// Check if the navigation was committed
    pub fn is_committed(&self) -> bool {
        matches!(self, NavigationResult::Committed { .. })
    }

    /// Check if the navigation was cancelled
    pub fn is_cancelled(&self) -> bool {
        matches!(self, NavigationResult::Cancelled)
    }

    /// Check if the navigation was refused because a confirmation is pending
    pub fn is_busy(&self) -> bool {
        matches!(self, NavigationResult::Busy)
    }

    /// Check if the navigation left the store unchanged
    pub fn is_unchanged(&self) -> bool {
        matches!(self, NavigationResult::Unchanged)
    }

    /// Location that became current, if the navigation was committed
    pub fn location(&self) -> Option<&Location> {
        match self {
            NavigationResult::Committed { location, .. } => Some(location),
            _ => None,
        }
    }
}

// ============================================================================
// History Errors
// ============================================================================

/// Fatal errors raised by history construction and location building.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HistoryError {
    /// A pathname contained a malformed percent-escape.
    InvalidPath { pathname: String },

    /// The adapter's environment cannot host it (e.g. no DOM).
    EnvironmentUnavailable { adapter: &'static str },
}

impl fmt::Display for HistoryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HistoryError::InvalidPath { pathname } => write!(
                f,
                "Pathname \"{}\" could not be decoded. This is likely caused by an invalid percent-encoding.",
                pathname
            ),
            HistoryError::EnvironmentUnavailable { adapter } => {
                write!(f, "{} history needs a DOM", adapter)
            }
        }
    }
}

impl std::error::Error for HistoryError {}

// ============================================================================
// Tests
// ============================================================================

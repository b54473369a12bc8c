//! Asynchronous user confirmation.
//!
//! When a prompt answers with a message, the history hands the message to
//! the host's [`UserConfirmation`] along with a [`ConfirmReply`]. The reply is
//! a one-shot responder: it is consumed by [`ConfirmReply::send`], so a
//! confirmation can be answered at most once, now or later. Dropping the
//! reply unanswered counts as a rejection.
//!
//! The caller of `push`/`replace` gets a [`PendingNavigation`], a future
//! that resolves once the confirmation (if any) has been answered and the
//! navigation has been applied or abandoned.
//!
//! ```
//! use navigator_history::{ConfirmReply, UserConfirmation};
//!
//! // Accept every message, synchronously.
//! let confirm = |_message: &str, reply: ConfirmReply| reply.send(true);
//! # fn takes(_: impl UserConfirmation) {}
//! # takes(confirm);
//! ```

use crate::error::NavigationResult;
use crate::trace_log;
use futures::channel::oneshot;
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

// ============================================================================
// UserConfirmation
// ============================================================================

/// Host hook that asks the user to confirm a navigation.
///
/// In a browser this is typically `window.confirm`; a UI toolkit would open a
/// modal and answer the reply from its button handlers.
pub trait UserConfirmation {
    fn confirm(&self, message: &str, reply: ConfirmReply);
}

impl<F> UserConfirmation for F
where
    F: Fn(&str, ConfirmReply),
{
    fn confirm(&self, message: &str, reply: ConfirmReply) {
        self(message, reply);
    }
}

/// One-shot answer to a confirmation request.
pub struct ConfirmReply {
    respond: Option<Box<dyn FnOnce(bool)>>,
}

impl ConfirmReply {
    pub(crate) fn new(respond: impl FnOnce(bool) + 'static) -> Self {
        Self {
            respond: Some(Box::new(respond)),
        }
    }

    /// Answer the confirmation.
    pub fn send(mut self, confirmed: bool) {
        if let Some(respond) = self.respond.take() {
            respond(confirmed);
        }
    }

    pub fn allow(self) {
        self.send(true);
    }

    pub fn deny(self) {
        self.send(false);
    }
}

impl Drop for ConfirmReply {
    fn drop(&mut self) {
        if let Some(respond) = self.respond.take() {
            trace_log!("Confirmation reply dropped unanswered; treating as rejected");
            respond(false);
        }
    }
}

impl fmt::Debug for ConfirmReply {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConfirmReply")
            .field("answered", &self.respond.is_none())
            .finish()
    }
}

// ============================================================================
// PendingNavigation
// ============================================================================

/// Sending half of a [`PendingNavigation`].
pub(crate) struct Settle(oneshot::Sender<NavigationResult>);

impl Settle {
    pub(crate) fn send(self, result: NavigationResult) {
        // The caller may have dropped the pending navigation; nothing to do.
        let _ = self.0.send(result);
    }
}

/// The eventual outcome of a `push` or `replace`.
///
/// Resolves immediately when no confirmation was needed. Dropping it does not
/// cancel the navigation.
#[must_use = "a navigation may still be waiting for confirmation"]
#[derive(Debug)]
pub struct PendingNavigation {
    receiver: oneshot::Receiver<NavigationResult>,
    settled: Option<NavigationResult>,
}

impl PendingNavigation {
    pub(crate) fn channel() -> (Settle, Self) {
        let (sender, receiver) = oneshot::channel();
        (
            Settle(sender),
            Self {
                receiver,
                settled: None,
            },
        )
    }

    /// The outcome, if the navigation has already been decided.
    pub fn try_result(&mut self) -> Option<&NavigationResult> {
        if self.settled.is_none() {
            match self.receiver.try_recv() {
                Ok(Some(result)) => self.settled = Some(result),
                Ok(None) => {}
                Err(oneshot::Canceled) => self.settled = Some(NavigationResult::Cancelled),
            }
        }
        self.settled.as_ref()
    }

    /// Whether the navigation has been decided.
    pub fn is_settled(&mut self) -> bool {
        self.try_result().is_some()
    }
}

impl Future for PendingNavigation {
    type Output = NavigationResult;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        if let Some(result) = self.settled.take() {
            return Poll::Ready(result);
        }
        Pin::new(&mut self.receiver)
            .poll(cx)
            .map(|result| result.unwrap_or(NavigationResult::Cancelled))
    }
}

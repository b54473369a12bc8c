//! Internal mirror of an external navigation stack.
//!
//! The browser keeps its own entry list that we cannot read. A
//! [`NavigationStack`] records one token per entry we have seen (the entry
//! key for browser history, the serialized path for hash history) so that a
//! rejected POP can be undone by moving the external stack back by the
//! right number of steps.
//!
//! The stack is speculative: after an out-of-band change it is only trusted
//! as far as its tokens can be found.

use crate::trace_log;
use std::fmt;

/// Which occurrence of a token identifies an entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenLookup {
    /// Tokens are unique (entry keys).
    First,
    /// Tokens may repeat (paths); the most recent occurrence wins.
    Last,
}

/// Ordered entry tokens, index-aligned with the external stack.
#[derive(Debug, Clone)]
pub struct NavigationStack<T> {
    tokens: Vec<T>,
    lookup: TokenLookup,
}

impl<T: PartialEq + fmt::Debug> NavigationStack<T> {
    /// A stack holding only the entry we started on.
    pub fn new(initial: T, lookup: TokenLookup) -> Self {
        Self {
            tokens: vec![initial],
            lookup,
        }
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn tokens(&self) -> &[T] {
        &self.tokens
    }

    /// Index of `token`, if it has been seen.
    pub fn position(&self, token: &T) -> Option<usize> {
        match self.lookup {
            TokenLookup::First => self.tokens.iter().position(|t| t == token),
            TokenLookup::Last => self.tokens.iter().rposition(|t| t == token),
        }
    }

    /// Drop every entry after `current` and append `token`.
    ///
    /// An unknown `current` truncates the whole stack.
    pub fn push(&mut self, current: &T, token: T) {
        let keep = self.position(current).map_or(0, |index| index + 1);
        self.tokens.truncate(keep);
        self.tokens.push(token);
    }

    /// Overwrite `current` with `token`. Unknown tokens are left alone.
    pub fn replace(&mut self, current: &T, token: T) {
        if let Some(index) = self.position(current) {
            self.tokens[index] = token;
        }
    }

    /// Steps needed to move the external stack from `from` back to `to`.
    ///
    /// Unknown tokens count as index 0.
    pub fn revert_delta(&self, to: &T, from: &T) -> isize {
        let to_index = self.position(to).unwrap_or(0);
        let from_index = self.position(from).unwrap_or(0);
        trace_log!(
            "Revert lookup: to {:?} at {}, from {:?} at {}",
            to,
            to_index,
            from,
            from_index
        );
        to_index as isize - from_index as isize
    }
}

//! History configuration.
//!
//! Each adapter takes a builder-style options value:
//!
//! ```
//! use navigator_history::{BrowserHistoryOptions, ConfirmReply, HashHistoryOptions, HashType};
//!
//! let browser = BrowserHistoryOptions::new()
//!     .basename("/app/")
//!     .key_length(8)
//!     .confirmation(|_message: &str, reply: ConfirmReply| reply.allow());
//!
//! let hash = HashHistoryOptions::new().hash_type(HashType::HashBang);
//! # let _ = (browser, hash);
//! ```

use crate::confirm::UserConfirmation;
use crate::hash::HashType;
use crate::key::DEFAULT_KEY_LENGTH;
use crate::location::PathInput;
use crate::path::{add_leading_slash, strip_trailing_slash};
use std::fmt;
use std::rc::Rc;

/// `"/app/"` and `"app"` both become `"/app"`; empty stays empty.
pub(crate) fn normalize_basename(basename: &str) -> String {
    if basename.is_empty() {
        String::new()
    } else {
        strip_trailing_slash(&add_leading_slash(basename)).to_string()
    }
}

// ============================================================================
// Browser
// ============================================================================

/// Options for [`BrowserHistory`](crate::BrowserHistory).
#[derive(Clone)]
pub struct BrowserHistoryOptions {
    pub(crate) basename: String,
    pub(crate) force_refresh: bool,
    pub(crate) key_length: usize,
    pub(crate) confirmation: Option<Rc<dyn UserConfirmation>>,
}

impl BrowserHistoryOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Path prefix the application is mounted under.
    pub fn basename(mut self, basename: impl Into<String>) -> Self {
        self.basename = basename.into();
        self
    }

    /// Reload the page on every push/replace instead of updating in place.
    pub fn force_refresh(mut self, force_refresh: bool) -> Self {
        self.force_refresh = force_refresh;
        self
    }

    /// Length of generated entry keys.
    pub fn key_length(mut self, key_length: usize) -> Self {
        self.key_length = key_length;
        self
    }

    /// Host hook for prompt messages.
    pub fn confirmation(mut self, confirmation: impl UserConfirmation + 'static) -> Self {
        self.confirmation = Some(Rc::new(confirmation));
        self
    }
}

impl Default for BrowserHistoryOptions {
    fn default() -> Self {
        Self {
            basename: String::new(),
            force_refresh: false,
            key_length: DEFAULT_KEY_LENGTH,
            confirmation: None,
        }
    }
}

impl fmt::Debug for BrowserHistoryOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BrowserHistoryOptions")
            .field("basename", &self.basename)
            .field("force_refresh", &self.force_refresh)
            .field("key_length", &self.key_length)
            .field("confirmation", &self.confirmation.is_some())
            .finish()
    }
}

// ============================================================================
// Hash
// ============================================================================

/// Options for [`HashHistory`](crate::HashHistory).
#[derive(Clone, Default)]
pub struct HashHistoryOptions {
    pub(crate) basename: String,
    pub(crate) hash_type: HashType,
    pub(crate) confirmation: Option<Rc<dyn UserConfirmation>>,
}

impl HashHistoryOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn basename(mut self, basename: impl Into<String>) -> Self {
        self.basename = basename.into();
        self
    }

    /// How paths are written into the fragment.
    pub fn hash_type(mut self, hash_type: HashType) -> Self {
        self.hash_type = hash_type;
        self
    }

    pub fn confirmation(mut self, confirmation: impl UserConfirmation + 'static) -> Self {
        self.confirmation = Some(Rc::new(confirmation));
        self
    }
}

impl fmt::Debug for HashHistoryOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HashHistoryOptions")
            .field("basename", &self.basename)
            .field("hash_type", &self.hash_type)
            .field("confirmation", &self.confirmation.is_some())
            .finish()
    }
}

// ============================================================================
// Memory
// ============================================================================

/// Options for [`MemoryHistory`](crate::MemoryHistory).
#[derive(Clone)]
pub struct MemoryHistoryOptions {
    pub(crate) initial_entries: Vec<PathInput>,
    pub(crate) initial_index: isize,
    pub(crate) key_length: usize,
    pub(crate) confirmation: Option<Rc<dyn UserConfirmation>>,
}

impl MemoryHistoryOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starting stack. Partial locations may carry their own keys.
    pub fn initial_entries<I, P>(mut self, entries: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathInput>,
    {
        self.initial_entries = entries.into_iter().map(Into::into).collect();
        self
    }

    /// Starting position; clamped into the entry list.
    pub fn initial_index(mut self, index: isize) -> Self {
        self.initial_index = index;
        self
    }

    pub fn key_length(mut self, key_length: usize) -> Self {
        self.key_length = key_length;
        self
    }

    pub fn confirmation(mut self, confirmation: impl UserConfirmation + 'static) -> Self {
        self.confirmation = Some(Rc::new(confirmation));
        self
    }
}

impl Default for MemoryHistoryOptions {
    fn default() -> Self {
        Self {
            initial_entries: vec![PathInput::from("/")],
            initial_index: 0,
            key_length: DEFAULT_KEY_LENGTH,
            confirmation: None,
        }
    }
}

impl fmt::Debug for MemoryHistoryOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemoryHistoryOptions")
            .field("initial_entries", &self.initial_entries)
            .field("initial_index", &self.initial_index)
            .field("key_length", &self.key_length)
            .field("confirmation", &self.confirmation.is_some())
            .finish()
    }
}

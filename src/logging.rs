//! Logging abstraction layer.
//!
//! History adapters report commits, cancellations, reverts and listener
//! activation through these macros. They dispatch to either the
//! [`log`](https://docs.rs/log) or [`tracing`](https://docs.rs/tracing) crate
//! depending on which feature is enabled. Enable at most one of the two; with
//! neither, the macros expand to nothing.
//!
//! | Feature    | Backend         | Default |
//! |------------|-----------------|---------|
//! | `log`      | `log` crate     | yes     |
//! | `tracing`  | `tracing` crate | no      |
//!
//! # Available macros
//!
//! - `trace_log!` — per-event detail (token lookups, suppressed echoes).
//! - `debug_log!` — commits, cancellations, reverts.
//! - `info_log!` — adapter construction.
//! - `warn_log!` — unexpected but recoverable conditions.
//! - `error_log!` — failures swallowed inside environment callbacks.
//! - `soft_warning!` — advisory misuse warnings (duplicate state, second
//!   prompt, missing confirmation). Emitted at warn level under the
//!   `navigator_history::warning` target so hosts can filter them separately.
//!
//! ```ignore
//! use navigator_history::{debug_log, soft_warning};
//!
//! debug_log!("PUSH committed: {}", path);
//! soft_warning!("A history supports only one prompt at a time");
//! ```

/// Target used by [`soft_warning!`] so advisory messages can be filtered.
pub const WARNING_TARGET: &str = "navigator_history::warning";

/// Emit a **trace**-level log message.
#[macro_export]
macro_rules! trace_log {
    ($($arg:tt)*) => {
        #[cfg(feature = "tracing")]
        ::tracing::trace!($($arg)*);
        #[cfg(feature = "log")]
        ::log::trace!($($arg)*);
    };
}

/// Emit a **debug**-level log message.
#[macro_export]
macro_rules! debug_log {
    ($($arg:tt)*) => {
        #[cfg(feature = "tracing")]
        ::tracing::debug!($($arg)*);
        #[cfg(feature = "log")]
        ::log::debug!($($arg)*);
    };
}

/// Emit an **info**-level log message.
#[macro_export]
macro_rules! info_log {
    ($($arg:tt)*) => {
        #[cfg(feature = "tracing")]
        ::tracing::info!($($arg)*);
        #[cfg(feature = "log")]
        ::log::info!($($arg)*);
    };
}

/// Emit a **warn**-level log message.
#[macro_export]
macro_rules! warn_log {
    ($($arg:tt)*) => {
        #[cfg(feature = "tracing")]
        ::tracing::warn!($($arg)*);
        #[cfg(feature = "log")]
        ::log::warn!($($arg)*);
    };
}

/// Emit an **error**-level log message.
#[macro_export]
macro_rules! error_log {
    ($($arg:tt)*) => {
        #[cfg(feature = "tracing")]
        ::tracing::error!($($arg)*);
        #[cfg(feature = "log")]
        ::log::error!($($arg)*);
    };
}

/// Report a non-fatal misuse of the history API.
///
/// Soft warnings never change control flow. They go to the warn level under
/// [`WARNING_TARGET`].
#[macro_export]
macro_rules! soft_warning {
    ($($arg:tt)*) => {
        #[cfg(feature = "tracing")]
        ::tracing::warn!(target: "navigator_history::warning", $($arg)*);
        #[cfg(feature = "log")]
        ::log::warn!(target: "navigator_history::warning", $($arg)*);
    };
}

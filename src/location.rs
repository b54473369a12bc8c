//! Location model.
//!
//! A [`Location`] is the canonical, immutable description of one navigable
//! position: `pathname`, `search`, `hash`, caller `state`, and an optional
//! `key` identifying the history entry. Locations are built by
//! [`create_location`] from a [`PathInput`], either a raw path string or a
//! [`PartialLocation`].
//!
//! # Examples
//!
//! ```
//! use navigator_history::{create_location, Location, PartialLocation, PathInput};
//!
//! let current = create_location("/company/team".into(), None, None, None).unwrap();
//! let next = create_location(
//!     PartialLocation::new().pathname("jobs").search("page=2").into(),
//!     None,
//!     None,
//!     Some(&current),
//! )
//! .unwrap();
//!
//! assert_eq!(next.pathname(), "/company/jobs");
//! assert_eq!(next.search(), "?page=2");
//! ```

use crate::error::HistoryError;
use crate::path::{create_path, parse_path, PathComponents};
use crate::state::StateValue;
use crate::{soft_warning, Action};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

// ============================================================================
// Location
// ============================================================================

/// One navigable position.
///
/// Invariants: `pathname` is never empty once a location has been created
/// without a base; `search` is empty or starts with `?`; `hash` is empty or
/// starts with `#`. Equality compares all five fields, with deep equality on
/// `state`.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Location {
    pathname: String,
    search: String,
    hash: String,
    state: Option<StateValue>,
    key: Option<String>,
}

impl Location {
    /// The `/` location with no state and no key.
    pub fn root() -> Self {
        Self {
            pathname: "/".to_string(),
            search: String::new(),
            hash: String::new(),
            state: None,
            key: None,
        }
    }

    pub fn pathname(&self) -> &str {
        &self.pathname
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    pub fn hash(&self) -> &str {
        &self.hash
    }

    pub fn state(&self) -> Option<&StateValue> {
        self.state.as_ref()
    }

    /// Entry key. Absent for hash history.
    pub fn key(&self) -> Option<&str> {
        self.key.as_deref()
    }

    /// `pathname + search + hash`
    pub fn path(&self) -> String {
        create_path(self)
    }

    /// Compare only pathname, search and hash.
    pub fn same_path(&self, other: &Location) -> bool {
        self.pathname == other.pathname && self.search == other.search && self.hash == other.hash
    }

    /// Drop key and state, keeping only the path components.
    pub(crate) fn into_path_only(self) -> Self {
        Self {
            state: None,
            key: None,
            ..self
        }
    }
}

impl PathComponents for Location {
    fn pathname(&self) -> &str {
        &self.pathname
    }

    fn search(&self) -> &str {
        &self.search
    }

    fn hash(&self) -> &str {
        &self.hash
    }
}

impl Default for Location {
    fn default() -> Self {
        Self::root()
    }
}

/// Structural equality on pathname, search, hash and key, deep equality on
/// state.
pub fn locations_are_equal(a: &Location, b: &Location) -> bool {
    a == b
}

// ============================================================================
// Path input
// ============================================================================

/// A location-like value where every field is optional.
///
/// Missing fields are filled in by [`create_location`]; a relative
/// `pathname` resolves against the current location.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PartialLocation {
    pub pathname: Option<String>,
    pub search: Option<String>,
    pub hash: Option<String>,
    pub state: Option<StateValue>,
    pub key: Option<String>,
}

impl PartialLocation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pathname(mut self, pathname: impl Into<String>) -> Self {
        self.pathname = Some(pathname.into());
        self
    }

    /// Query string, with or without the leading `?`.
    pub fn search(mut self, search: impl Into<String>) -> Self {
        self.search = Some(search.into());
        self
    }

    /// Fragment, with or without the leading `#`.
    pub fn hash(mut self, hash: impl Into<String>) -> Self {
        self.hash = Some(hash.into());
        self
    }

    pub fn state(mut self, state: impl Into<StateValue>) -> Self {
        self.state = Some(state.into());
        self
    }

    /// Explicit entry key. Only honored for memory history initial entries.
    pub fn key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }
}

/// What `push`, `replace` and [`create_location`] accept as a destination.
#[derive(Debug, Clone, PartialEq)]
pub enum PathInput {
    /// A raw path such as `/users?page=2#top`.
    Path(String),
    /// A location-like object.
    Partial(PartialLocation),
}

impl PathInput {
    /// Whether the input already carries its own state.
    pub fn has_state(&self) -> bool {
        matches!(self, PathInput::Partial(partial) if partial.state.is_some())
    }

    /// Entry key carried by a partial location.
    pub fn key(&self) -> Option<&str> {
        match self {
            PathInput::Partial(partial) => partial.key.as_deref(),
            PathInput::Path(_) => None,
        }
    }
}

impl From<&str> for PathInput {
    fn from(path: &str) -> Self {
        PathInput::Path(path.to_string())
    }
}

impl From<String> for PathInput {
    fn from(path: String) -> Self {
        PathInput::Path(path)
    }
}

impl From<&String> for PathInput {
    fn from(path: &String) -> Self {
        PathInput::Path(path.clone())
    }
}

impl From<PartialLocation> for PathInput {
    fn from(partial: PartialLocation) -> Self {
        PathInput::Partial(partial)
    }
}

impl From<&Location> for PathInput {
    fn from(location: &Location) -> Self {
        PathInput::Partial(PartialLocation {
            pathname: Some(location.pathname.clone()),
            search: Some(location.search.clone()),
            hash: Some(location.hash.clone()),
            state: location.state.clone(),
            key: location.key.clone(),
        })
    }
}

/// Warn when an explicit state argument will be ignored because the path
/// object already has one.
pub(crate) fn warn_if_state_ignored(path: &PathInput, state: Option<&StateValue>, action: Action) {
    if path.has_state() && state.is_some() {
        soft_warning!(
            "You should avoid providing a 2nd state argument to {} when the 1st \
             argument is a location-like object that already has state; it is ignored",
            action.verb()
        );
    }
}

// ============================================================================
// Construction
// ============================================================================

fn with_prefix(value: Option<String>, prefix: char) -> String {
    match value {
        Some(value) if !value.is_empty() => {
            if value.starts_with(prefix) {
                value
            } else {
                format!("{}{}", prefix, value)
            }
        }
        _ => String::new(),
    }
}

/// Build a canonical [`Location`].
///
/// - A string path is parsed and `state` attached.
/// - A partial location has its `search`/`hash` prefixed; `state` is only
///   attached when the partial has none of its own.
/// - The pathname is percent-decoded; a malformed escape fails with
///   [`HistoryError::InvalidPath`].
/// - `key`, when given and non-empty, overrides any key on the input.
/// - With `current`, an empty pathname inherits the current one and a
///   relative pathname resolves against it. Without `current`, an empty
///   pathname becomes `/`.
pub fn create_location(
    path: PathInput,
    state: Option<StateValue>,
    key: Option<String>,
    current: Option<&Location>,
) -> Result<Location, HistoryError> {
    let mut location = match path {
        PathInput::Path(raw) => {
            let parts = parse_path(&raw);
            Location {
                pathname: parts.pathname,
                search: parts.search,
                hash: parts.hash,
                state,
                key: None,
            }
        }
        PathInput::Partial(partial) => Location {
            pathname: partial.pathname.unwrap_or_default(),
            search: with_prefix(partial.search, '?'),
            hash: with_prefix(partial.hash, '#'),
            state: partial.state.or(state),
            key: partial.key,
        },
    };

    location.pathname = decode_uri(&location.pathname)?;

    if let Some(key) = key.filter(|key| !key.is_empty()) {
        location.key = Some(key);
    }

    match current {
        Some(current) => {
            if location.pathname.is_empty() {
                location.pathname = current.pathname.clone();
            } else if !location.pathname.starts_with('/') {
                location.pathname = resolve_pathname(&location.pathname, &current.pathname);
            }
        }
        None => {
            if location.pathname.is_empty() {
                location.pathname = "/".to_string();
            }
        }
    }

    Ok(location)
}

// ============================================================================
// Relative resolution
// ============================================================================

/// Resolve `to` against `from` the way a browser resolves a relative URL
/// path: the last segment of `from` is replaced, `.` segments vanish and
/// `..` segments remove their parent.
///
/// ```
/// use navigator_history::location::resolve_pathname;
///
/// assert_eq!(resolve_pathname("about", "/company/jobs"), "/company/about");
/// assert_eq!(resolve_pathname("../jobs", "/company/team/ceo"), "/company/jobs");
/// assert_eq!(resolve_pathname("/x", "/company"), "/x");
/// ```
pub fn resolve_pathname(to: &str, from: &str) -> String {
    let to_parts: Vec<&str> = if to.is_empty() { Vec::new() } else { to.split('/').collect() };
    let mut parts: Vec<&str> = if from.is_empty() { Vec::new() } else { from.split('/').collect() };

    let to_is_absolute = to.starts_with('/');
    let must_end_absolute = to_is_absolute || from.starts_with('/');

    if to_is_absolute {
        parts = to_parts;
    } else if !to_parts.is_empty() {
        parts.pop();
        parts.extend(to_parts);
    }

    if parts.is_empty() {
        return "/".to_string();
    }

    let has_trailing_slash = matches!(parts.last(), Some(&("." | ".." | "")));

    let mut up = 0usize;
    for i in (0..parts.len()).rev() {
        match parts[i] {
            "." => {
                parts.remove(i);
            }
            ".." => {
                parts.remove(i);
                up += 1;
            }
            _ if up > 0 => {
                parts.remove(i);
                up -= 1;
            }
            _ => {}
        }
    }

    if !must_end_absolute {
        for _ in 0..up {
            parts.insert(0, "..");
        }
    }

    if must_end_absolute && parts.first() != Some(&"") {
        parts.insert(0, "");
    }

    let mut result = parts.join("/");
    if has_trailing_slash && !result.ends_with('/') {
        result.push('/');
    }
    result
}

// ============================================================================
// Percent decoding
// ============================================================================

/// Characters whose escapes stay encoded, because decoding them would change
/// how the URL splits.
const RESERVED: &[u8] = b";/?:@&=+$,#";

fn hex_value(byte: u8) -> Option<u8> {
    match byte {
        b'0'..=b'9' => Some(byte - b'0'),
        b'a'..=b'f' => Some(byte - b'a' + 10),
        b'A'..=b'F' => Some(byte - b'A' + 10),
        _ => None,
    }
}

fn escaped_byte(bytes: &[u8], at: usize) -> Option<u8> {
    if bytes.get(at) != Some(&b'%') {
        return None;
    }
    let high = hex_value(*bytes.get(at + 1)?)?;
    let low = hex_value(*bytes.get(at + 2)?)?;
    Some(high << 4 | low)
}

/// Percent-decode a URI path.
///
/// Escapes of reserved characters (`;/?:@&=+$,#`) are left as written. A `%`
/// not followed by two hex digits, or escapes that do not form valid UTF-8,
/// fail with [`HistoryError::InvalidPath`].
pub fn decode_uri(input: &str) -> Result<String, HistoryError> {
    let invalid = || HistoryError::InvalidPath {
        pathname: input.to_string(),
    };

    if !input.contains('%') {
        return Ok(input.to_string());
    }

    let bytes = input.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;

    while i < bytes.len() {
        if bytes[i] != b'%' {
            out.push(bytes[i]);
            i += 1;
            continue;
        }

        let lead = escaped_byte(bytes, i).ok_or_else(invalid)?;

        if lead < 0x80 {
            if RESERVED.contains(&lead) {
                out.extend_from_slice(&bytes[i..i + 3]);
            } else {
                out.push(lead);
            }
            i += 3;
            continue;
        }

        let width = match lead {
            0xC0..=0xDF => 2,
            0xE0..=0xEF => 3,
            0xF0..=0xF7 => 4,
            _ => return Err(invalid()),
        };

        let mut sequence = vec![lead];
        for n in 1..width {
            let byte = escaped_byte(bytes, i + 3 * n).ok_or_else(invalid)?;
            if byte & 0xC0 != 0x80 {
                return Err(invalid());
            }
            sequence.push(byte);
        }

        if std::str::from_utf8(&sequence).is_err() {
            return Err(invalid());
        }

        out.extend_from_slice(&sequence);
        i += 3 * width;
    }

    String::from_utf8(out).map_err(|_| invalid())
}

// ============================================================================
// Tests
// ============================================================================

//! Path codec.
//!
//! Splits a raw path string into its `(pathname, search, hash)` parts and
//! joins them back, plus the slash and basename trimming helpers used at the
//! adapter boundary.
//!
//! ```
//! use navigator_history::path::{create_path, parse_path};
//!
//! let parts = parse_path("/users?page=2#top");
//! assert_eq!(parts.pathname, "/users");
//! assert_eq!(parts.search, "?page=2");
//! assert_eq!(parts.hash, "#top");
//! assert_eq!(create_path(&parts), "/users?page=2#top");
//! ```

use std::borrow::Cow;

/// Read access to the three components of a path.
///
/// Implemented by [`PathParts`] and [`Location`](crate::Location) so both can
/// be serialized with [`create_path`].
pub trait PathComponents {
    fn pathname(&self) -> &str;
    fn search(&self) -> &str;
    fn hash(&self) -> &str;
}

/// The result of [`parse_path`].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PathParts {
    /// Everything before the first `?` or `#`
    pub pathname: String,
    /// Empty, or starting with `?`
    pub search: String,
    /// Empty, or starting with `#`
    pub hash: String,
}

impl PathComponents for PathParts {
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

/// Parse a raw path into pathname, search and hash.
///
/// The hash starts at the first `#`; the search starts at the first `?`
/// before it. A lone `?` or `#` normalizes to an empty component. An empty
/// input yields pathname `/`.
pub fn parse_path(path: &str) -> PathParts {
    let mut pathname = if path.is_empty() { "/" } else { path };
    let mut search = "";
    let mut hash = "";

    if let Some(index) = pathname.find('#') {
        hash = &pathname[index..];
        pathname = &pathname[..index];
    }

    if let Some(index) = pathname.find('?') {
        search = &pathname[index..];
        pathname = &pathname[..index];
    }

    PathParts {
        pathname: pathname.to_string(),
        search: (if search == "?" { "" } else { search }).to_string(),
        hash: (if hash == "#" { "" } else { hash }).to_string(),
    }
}

/// Join a location's components back into a single path string.
///
/// A missing pathname becomes `/`; `search` and `hash` get their prefix
/// character added when it is missing and are dropped when they hold only
/// the prefix.
pub fn create_path<P: PathComponents + ?Sized>(location: &P) -> String {
    let pathname = location.pathname();
    let mut path = if pathname.is_empty() {
        String::from("/")
    } else {
        pathname.to_string()
    };

    let search = location.search();
    if !search.is_empty() && search != "?" {
        if !search.starts_with('?') {
            path.push('?');
        }
        path.push_str(search);
    }

    let hash = location.hash();
    if !hash.is_empty() && hash != "#" {
        if !hash.starts_with('#') {
            path.push('#');
        }
        path.push_str(hash);
    }

    path
}

/// Prefix `path` with `/` unless it already starts with one.
pub fn add_leading_slash(path: &str) -> Cow<'_, str> {
    if path.starts_with('/') {
        Cow::Borrowed(path)
    } else {
        Cow::Owned(format!("/{}", path))
    }
}

/// Remove a single leading `/`.
pub fn strip_leading_slash(path: &str) -> &str {
    path.strip_prefix('/').unwrap_or(path)
}

/// Remove a single trailing `/`.
pub fn strip_trailing_slash(path: &str) -> &str {
    path.strip_suffix('/').unwrap_or(path)
}

/// Check whether `path` is mounted under `prefix`.
///
/// The comparison is case-insensitive and the prefix must end on a segment
/// boundary: the next character has to be `/`, `?`, `#`, or the end of the
/// string, so `/app` does not match `/application`.
pub fn has_basename(path: &str, prefix: &str) -> bool {
    let (Some(head), Some(rest)) = (path.get(..prefix.len()), path.get(prefix.len()..)) else {
        return false;
    };

    head.to_lowercase() == prefix.to_lowercase()
        && matches!(rest.chars().next(), None | Some('/' | '?' | '#'))
}

/// Remove `prefix` from `path` when [`has_basename`] holds.
pub fn strip_basename<'a>(path: &'a str, prefix: &str) -> &'a str {
    if has_basename(path, prefix) {
        &path[prefix.len()..]
    } else {
        path
    }
}

/// Remove everything from the first `#` onward.
pub fn strip_hash(url: &str) -> &str {
    url.find('#').map_or(url, |index| &url[..index])
}

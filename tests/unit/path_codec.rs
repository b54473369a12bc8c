//! Unit tests for path parsing, joining, basename handling and resolution.

use navigator_history::location::{decode_uri, resolve_pathname};
use navigator_history::path::*;
use navigator_history::HistoryError;

#[test]
fn test_parse_then_create_preserves_path() {
    for path in ["/", "/users", "/users?page=2", "/users#top", "/a/b?c=d&e=f#g?h"] {
        assert_eq!(create_path(&parse_path(path)), path);
    }
}

#[test]
fn test_parse_splits_on_first_separators() {
    let parts = parse_path("/a?b?c#d#e");
    assert_eq!(parts.pathname, "/a");
    assert_eq!(parts.search, "?b?c");
    assert_eq!(parts.hash, "#d#e");
}

#[test]
fn test_create_path_adds_missing_prefixes() {
    let parts = PathParts {
        pathname: String::new(),
        search: "q=1".to_string(),
        hash: "top".to_string(),
    };
    assert_eq!(create_path(&parts), "/?q=1#top");
}

#[test]
fn test_basename_matches_on_segment_boundary() {
    assert!(has_basename("/app", "/app"));
    assert!(has_basename("/APP/users", "/app"));
    assert!(has_basename("/app?x", "/app"));
    assert!(!has_basename("/application", "/app"));
    assert!(!has_basename("/ap", "/app"));

    assert_eq!(strip_basename("/app/users", "/app"), "/users");
    assert_eq!(strip_basename("/other", "/app"), "/other");
}

#[test]
fn test_resolve_relative_paths() {
    assert_eq!(resolve_pathname("c", "/a/b"), "/a/c");
    assert_eq!(resolve_pathname("./c", "/a/b"), "/a/c");
    assert_eq!(resolve_pathname("..", "/a/b/"), "/a/");
    assert_eq!(resolve_pathname("../../../x", "/a/b"), "/x");
    assert_eq!(resolve_pathname("", "/a/b"), "/a/b");
    assert_eq!(resolve_pathname("c", "a/b"), "a/c");
}

#[test]
fn test_decode_uri() {
    assert_eq!(decode_uri("/caf%C3%A9").unwrap(), "/café");
    assert_eq!(decode_uri("/with%20space").unwrap(), "/with space");
    assert_eq!(decode_uri("/a%2Fb%3Fc").unwrap(), "/a%2Fb%3Fc");
    assert_eq!(decode_uri("/plain").unwrap(), "/plain");
}

#[test]
fn test_decode_uri_rejects_malformed_escapes() {
    for bad in ["/%", "/%zz", "/%E0%A4%A", "/%C3", "/%FF"] {
        assert!(
            matches!(decode_uri(bad), Err(HistoryError::InvalidPath { .. })),
            "expected '{}' to be rejected",
            bad
        );
    }
}

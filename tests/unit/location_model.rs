//! Unit tests for location construction and equality.

use navigator_history::*;

fn current() -> Location {
    create_location("/users/7?tab=posts#bio".into(), None, Some("cur".to_string()), None).unwrap()
}

#[test]
fn test_equality_compares_every_field() {
    let a = create_location("/a?b#c".into(), Some(StateValue::from(1)), Some("k".into()), None).unwrap();
    let b = create_location("/a?b#c".into(), Some(StateValue::from(1.0)), Some("k".into()), None).unwrap();
    assert!(locations_are_equal(&a, &b));

    let other_key = create_location("/a?b#c".into(), Some(StateValue::from(1)), Some("j".into()), None).unwrap();
    assert!(!locations_are_equal(&a, &other_key));
    assert!(a.same_path(&other_key));

    let other_state = create_location("/a?b#c".into(), Some(StateValue::from(2)), Some("k".into()), None).unwrap();
    assert!(!locations_are_equal(&a, &other_state));
}

#[test]
fn test_partial_with_only_hash_keeps_current_path() {
    let location = create_location(PartialLocation::new().hash("top").into(), None, None, Some(&current())).unwrap();

    assert_eq!(location.pathname(), "/users/7");
    assert_eq!(location.search(), "");
    assert_eq!(location.hash(), "#top");
    assert_eq!(location.key(), None);
}

#[test]
fn test_relative_push_target() {
    let location = create_location("../8".into(), None, None, Some(&current())).unwrap();
    assert_eq!(location.pathname(), "/8");
}

#[test]
fn test_explicit_key_overrides_partial_key() {
    let partial = PartialLocation::new().pathname("/x").key("mine");
    let location = create_location(partial.clone().into(), None, None, None).unwrap();
    assert_eq!(location.key(), Some("mine"));

    let location = create_location(partial.into(), None, Some("forced".into()), None).unwrap();
    assert_eq!(location.key(), Some("forced"));
}

#[test]
fn test_location_converts_back_into_input() {
    let original = current();
    let copy = create_location(PathInput::from(&original), None, None, None).unwrap();
    assert_eq!(copy, original);
}

#[test]
fn test_state_values_compare_deeply() {
    let a = StateValue::map([("list", StateValue::from(vec![1, 2])), ("nan", StateValue::from(f64::NAN))]);
    let b = StateValue::map([("nan", StateValue::from(f64::NAN)), ("list", StateValue::from(vec![1, 2]))]);
    assert_eq!(a, b);
    assert_eq!(a.get("list"), Some(&StateValue::from(vec![1, 2])));
    assert_ne!(a, StateValue::map([("list", StateValue::from(vec![2, 1]))]));
}

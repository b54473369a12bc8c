//! Asynchronous confirmation, busy handling, and state serialization.

mod common;

use common::*;
use navigator_history::*;
use std::rc::Rc;

fn confirmed_memory(parked: &ParkedConfirmation, entries: &[&str]) -> MemoryHistory {
    MemoryHistory::new(
        MemoryHistoryOptions::new()
            .initial_entries(entries.iter().copied())
            .initial_index(entries.len() as isize - 1)
            .confirmation(parked.hook()),
    )
    .unwrap()
}

#[test]
fn test_message_waits_for_reply() {
    init_logging();
    let parked = ParkedConfirmation::new();
    let history = confirmed_memory(&parked, &["/"]);
    let blocker = history.block("Discard changes?".into());

    let mut pending = history.push("/x".into(), None).unwrap();
    assert!(!pending.is_settled());
    assert_eq!(parked.messages(), vec!["Discard changes?"]);
    assert_eq!(history.location().pathname(), "/");

    parked.answer(true);

    assert!(pending.try_result().is_some_and(NavigationResult::is_committed));
    assert_eq!(history.location().pathname(), "/x");

    blocker.dispose();
}

#[test]
fn test_rejected_reply_cancels() {
    let parked = ParkedConfirmation::new();
    let history = confirmed_memory(&parked, &["/"]);
    let blocker = history.block("Leave?".into());

    let pending = history.push("/x".into(), None).unwrap();
    parked.answer(false);

    assert_eq!(pollster::block_on(pending), NavigationResult::Cancelled);
    assert_eq!(history.location().pathname(), "/");

    blocker.dispose();
}

#[test]
fn test_dropped_reply_counts_as_rejection() {
    let history = MemoryHistory::new(
        MemoryHistoryOptions::new().confirmation(|_message: &str, reply: ConfirmReply| drop(reply)),
    )
    .unwrap();
    let blocker = history.block("Leave?".into());

    let result = pollster::block_on(history.push("/x".into(), None).unwrap());
    assert!(result.is_cancelled());

    blocker.dispose();
}

#[test]
fn test_message_without_confirmation_hook_allows() {
    let history = memory(&["/"]);
    let blocker = history.block("Leave?".into());

    let result = pollster::block_on(history.push("/x".into(), None).unwrap());
    assert!(result.is_committed());

    blocker.dispose();
}

#[test]
fn test_navigation_while_awaiting_is_busy() {
    let parked = ParkedConfirmation::new();
    let history = confirmed_memory(&parked, &["/"]);
    let blocker = history.block("Leave?".into());

    let first = history.push("/first".into(), None).unwrap();
    let second = history.push("/second".into(), None).unwrap();

    assert_eq!(pollster::block_on(second), NavigationResult::Busy);
    assert_eq!(parked.waiting(), 1);

    parked.answer(true);
    assert!(pollster::block_on(first).is_committed());
    assert_eq!(history.location().pathname(), "/first");

    blocker.dispose();
}

#[test]
fn test_memory_go_while_awaiting_is_ignored() {
    let parked = ParkedConfirmation::new();
    let history = confirmed_memory(&parked, &["/a", "/b"]);
    let blocker = history.block("Leave?".into());

    let pending = history.replace("/c".into(), None).unwrap();
    history.go_back();
    assert_eq!(history.index(), 1);
    assert_eq!(parked.waiting(), 1);

    parked.answer(true);
    assert!(pollster::block_on(pending).is_committed());
    assert_eq!(history.location().pathname(), "/c");

    blocker.dispose();
}

#[test]
fn test_confirmed_pop_in_memory() {
    let parked = ParkedConfirmation::new();
    let history = confirmed_memory(&parked, &["/a", "/b"]);
    let blocker = history.block("Leave?".into());

    history.go_back();
    assert_eq!(history.index(), 1);

    parked.answer(true);
    assert_eq!(history.index(), 0);
    assert_eq!(history.action(), Action::Pop);

    blocker.dispose();
}

#[test]
fn test_browser_pop_while_awaiting_is_reverted() {
    init_logging();
    let parked = ParkedConfirmation::new();
    let window = window("/a");
    let history = BrowserHistory::new(
        Rc::clone(&window),
        BrowserHistoryOptions::new().confirmation(parked.hook()),
    )
    .unwrap();
    let listener = history.listen(|_, _| {});
    let _ = history.push("/b".into(), None).unwrap();
    let blocker = history.block("Leave?".into());

    let pending = history.push("/c".into(), None).unwrap();
    window.back();
    window.dispatch_pending();

    assert_eq!(window.index(), 1);
    assert_eq!(history.location().pathname(), "/b");
    assert_eq!(parked.waiting(), 1);

    parked.answer(true);
    assert!(pollster::block_on(pending).is_committed());
    assert_eq!(window.urls(), vec!["/a", "/b", "/c"]);

    blocker.dispose();
    listener.dispose();
}

#[test]
fn test_browser_pop_confirmed_later() {
    let parked = ParkedConfirmation::new();
    let window = window("/a");
    let history = BrowserHistory::new(
        Rc::clone(&window),
        BrowserHistoryOptions::new().confirmation(parked.hook()),
    )
    .unwrap();
    let recorder = Recorder::new();
    let listener = history.listen(recorder.listener());
    let _ = history.push("/b".into(), None).unwrap();
    let blocker = history.block("Leave?".into());

    window.back();
    window.dispatch_pending();
    assert_eq!(history.location().pathname(), "/b");

    parked.answer(false);
    window.dispatch_pending();

    assert_eq!(window.url(), "/b");
    assert_eq!(history.location().pathname(), "/b");
    assert!(recorder.events().iter().all(|(action, _)| *action != Action::Pop));

    blocker.dispose();
    listener.dispose();
}

#[tokio::test(flavor = "current_thread")]
async fn test_pending_navigation_is_awaitable() {
    let parked = ParkedConfirmation::new();
    let history = confirmed_memory(&parked, &["/"]);
    let blocker = history.block("Leave?".into());

    let pending = history.push("/x".into(), None).unwrap();
    let (result, ()) = futures::join!(pending, async { parked.answer(true) });

    assert_eq!(
        result.location().map(Location::pathname),
        Some("/x")
    );
    blocker.dispose();
}

#[cfg(feature = "serde")]
#[test]
fn test_state_round_trips_through_json() {
    let state = StateValue::map([
        ("id", StateValue::from(7)),
        ("tags", StateValue::from(vec!["a", "b"])),
        ("draft", StateValue::Null),
    ]);

    let json = serde_json::to_string(&state).unwrap();
    assert_eq!(json, r#"{"draft":null,"id":7,"tags":["a","b"]}"#);

    let back: StateValue = serde_json::from_str(&json).unwrap();
    assert_eq!(back, state);
}

#[cfg(feature = "serde")]
#[test]
fn test_location_and_action_serialize() {
    let location = create_location(
        "/users?page=2".into(),
        Some(StateValue::from(true)),
        Some("k1".to_string()),
        None,
    )
    .unwrap();

    let json = serde_json::to_value(&location).unwrap();
    assert_eq!(json["pathname"], "/users");
    assert_eq!(json["search"], "?page=2");
    assert_eq!(json["key"], "k1");

    let back: Location = serde_json::from_value(json).unwrap();
    assert_eq!(back, location);

    assert_eq!(serde_json::to_string(&Action::Replace).unwrap(), r#""REPLACE""#);
}

fn parked_browser(parked: &ParkedConfirmation, window: &Rc<SimulatedWindow>) -> BrowserHistory<Rc<SimulatedWindow>> {
    BrowserHistory::new(Rc::clone(window), BrowserHistoryOptions::new().confirmation(parked.hook())).unwrap()
}

fn parked_hash(parked: &ParkedConfirmation, window: &Rc<SimulatedWindow>) -> HashHistory<Rc<SimulatedWindow>> {
    HashHistory::new(Rc::clone(window), HashHistoryOptions::new().confirmation(parked.hook())).unwrap()
}

#[test]
fn test_browser_second_pop_while_awaiting_then_approved() {
    init_logging();
    let parked = ParkedConfirmation::new();
    let window = window("/a");
    let history = parked_browser(&parked, &window);
    let listener = history.listen(|_, _| {});
    let _ = history.push("/b".into(), None).unwrap();
    let _ = history.push("/c".into(), None).unwrap();
    let blocker = history.block("Leave?".into());

    window.back();
    window.dispatch_pending();
    window.back();
    window.dispatch_pending();

    // The second POP is undone back to the entry still being confirmed.
    assert_eq!(window.url(), "/b");
    assert_eq!(history.location().pathname(), "/c");
    assert_eq!(parked.waiting(), 1);

    parked.answer(true);
    window.dispatch_pending();

    assert_eq!(window.url(), "/b");
    assert_eq!(history.location().pathname(), "/b");
    assert_eq!(history.action(), Action::Pop);

    blocker.dispose();
    listener.dispose();
}

#[test]
fn test_browser_second_pop_while_awaiting_then_rejected() {
    let parked = ParkedConfirmation::new();
    let window = window("/a");
    let history = parked_browser(&parked, &window);
    let recorder = Recorder::new();
    let listener = history.listen(recorder.listener());
    let _ = history.push("/b".into(), None).unwrap();
    let _ = history.push("/c".into(), None).unwrap();
    let blocker = history.block("Leave?".into());

    window.back();
    window.dispatch_pending();
    window.back();
    window.dispatch_pending();

    parked.answer(false);
    window.dispatch_pending();

    assert_eq!(window.url(), "/c");
    assert_eq!(history.location().pathname(), "/c");
    assert!(recorder.events().iter().all(|(action, _)| *action != Action::Pop));

    // The next back press is confirmed like any other.
    window.back();
    window.dispatch_pending();
    assert_eq!(parked.waiting(), 1);
    assert_eq!(history.location().pathname(), "/c");

    parked.answer(true);
    assert_eq!(history.location().pathname(), "/b");

    blocker.dispose();
    listener.dispose();
}

#[test]
fn test_hash_second_pop_while_awaiting_then_approved() {
    let parked = ParkedConfirmation::new();
    let window = window("/#/a");
    let history = parked_hash(&parked, &window);
    let listener = history.listen(|_, _| {});
    let _ = history.push("/b".into(), None).unwrap();
    let _ = history.push("/c".into(), None).unwrap();
    window.dispatch_pending();
    let blocker = history.block("Leave?".into());

    window.back();
    window.dispatch_pending();
    window.back();
    window.dispatch_pending();

    assert_eq!(window.url(), "/#/b");
    assert_eq!(history.location().pathname(), "/c");
    assert_eq!(parked.waiting(), 1);

    parked.answer(true);
    window.dispatch_pending();

    assert_eq!(window.url(), "/#/b");
    assert_eq!(history.location().pathname(), "/b");
    assert_eq!(history.action(), Action::Pop);

    blocker.dispose();
    listener.dispose();
}

#[test]
fn test_hash_second_pop_while_awaiting_then_rejected() {
    let parked = ParkedConfirmation::new();
    let window = window("/#/a");
    let history = parked_hash(&parked, &window);
    let listener = history.listen(|_, _| {});
    let _ = history.push("/b".into(), None).unwrap();
    let _ = history.push("/c".into(), None).unwrap();
    window.dispatch_pending();
    let blocker = history.block("Leave?".into());

    window.back();
    window.dispatch_pending();
    window.back();
    window.dispatch_pending();

    parked.answer(false);
    window.dispatch_pending();

    assert_eq!(window.url(), "/#/c");
    assert_eq!(history.location().pathname(), "/c");

    window.back();
    window.dispatch_pending();
    assert_eq!(parked.waiting(), 1);

    parked.answer(true);
    assert_eq!(history.location().pathname(), "/b");

    blocker.dispose();
    listener.dispose();
}

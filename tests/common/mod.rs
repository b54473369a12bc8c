//! Test utilities for history tests
//!
//! Provides logger setup, a recording listener, and a confirmation hook that
//! parks replies so tests can answer them later.

#![allow(dead_code)]

use navigator_history::*;
use std::cell::RefCell;
use std::rc::Rc;

/// Route crate logs to the test output. Safe to call from every test.
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Every `(action, path)` pair a listener has seen.
#[derive(Clone, Default)]
pub struct Recorder {
    seen: Rc<RefCell<Vec<(Action, String)>>>,
}

impl Recorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Listener closure feeding this recorder.
    pub fn listener(&self) -> impl Fn(&Location, Action) + 'static {
        let seen = Rc::clone(&self.seen);
        move |location: &Location, action: Action| seen.borrow_mut().push((action, location.path()))
    }

    pub fn events(&self) -> Vec<(Action, String)> {
        self.seen.borrow().clone()
    }

    pub fn count(&self) -> usize {
        self.seen.borrow().len()
    }

    pub fn last(&self) -> Option<(Action, String)> {
        self.seen.borrow().last().cloned()
    }

    pub fn clear(&self) {
        self.seen.borrow_mut().clear();
    }
}

/// Confirmation hook that keeps every reply until the test answers it.
#[derive(Clone, Default)]
pub struct ParkedConfirmation {
    parked: Rc<RefCell<Vec<(String, ConfirmReply)>>>,
}

impl ParkedConfirmation {
    pub fn new() -> Self {
        Self::default()
    }

    /// Hook to pass to the options builder.
    pub fn hook(&self) -> impl UserConfirmation + 'static {
        let parked = Rc::clone(&self.parked);
        move |message: &str, reply: ConfirmReply| {
            parked.borrow_mut().push((message.to_string(), reply));
        }
    }

    pub fn waiting(&self) -> usize {
        self.parked.borrow().len()
    }

    /// Messages of the replies still waiting.
    pub fn messages(&self) -> Vec<String> {
        self.parked.borrow().iter().map(|(message, _)| message.clone()).collect()
    }

    /// Answer the oldest parked reply.
    pub fn answer(&self, confirmed: bool) {
        let (_, reply) = self.parked.borrow_mut().remove(0);
        reply.send(confirmed);
    }
}

/// A browser window opened on `url`.
pub fn window(url: &str) -> Rc<SimulatedWindow> {
    Rc::new(SimulatedWindow::new(url))
}

/// Browser history over `window` with default options.
pub fn browser(window: &Rc<SimulatedWindow>) -> BrowserHistory<Rc<SimulatedWindow>> {
    BrowserHistory::new(Rc::clone(window), BrowserHistoryOptions::new()).unwrap()
}

/// Hash history over `window` with default options.
pub fn hash(window: &Rc<SimulatedWindow>) -> HashHistory<Rc<SimulatedWindow>> {
    HashHistory::new(Rc::clone(window), HashHistoryOptions::new()).unwrap()
}

/// Memory history over `entries`, positioned on the last one.
pub fn memory(entries: &[&str]) -> MemoryHistory {
    MemoryHistory::new(
        MemoryHistoryOptions::new()
            .initial_entries(entries.iter().copied())
            .initial_index(entries.len() as isize - 1),
    )
    .unwrap()
}

//! In-process browser window.
//!
//! [`SimulatedWindow`] models a tab: an entry list with a cursor, a URL per
//! entry, native entry state, and a queue of change events. Calls made by a
//! history (`write`, `go_by`, ...) only queue events; the host delivers them
//! with [`SimulatedWindow::dispatch_pending`], the way a browser fires
//! `popstate` after `history.go()` returns.
//!
//! ```
//! use navigator_history::{BrowserHistory, BrowserHistoryOptions, History, SimulatedWindow};
//! use std::rc::Rc;
//!
//! let window = Rc::new(SimulatedWindow::new("/home"));
//! let history = BrowserHistory::new(Rc::clone(&window), BrowserHistoryOptions::new()).unwrap();
//! let _listener = history.listen(|_, _| {});
//!
//! let _ = history.push("/about".into(), None).unwrap();
//! window.back();
//! window.dispatch_pending();
//! assert_eq!(history.location().pathname(), "/home");
//! ```

use super::{
    BrowserEnvironment, ChangeCallback, EntryState, Environment, HashEnvironment, SubscriptionId,
    WriteKind,
};
use crate::path::strip_hash;
use crate::trace_log;
use std::cell::{Cell, RefCell};

#[derive(Debug, Clone)]
struct Entry {
    url: String,
    state: EntryState,
}

#[derive(Debug)]
struct Tab {
    entries: Vec<Entry>,
    index: usize,
    pending_events: usize,
    reloads: usize,
}

impl Tab {
    fn current(&self) -> &Entry {
        &self.entries[self.index]
    }

    fn push(&mut self, entry: Entry) {
        self.entries.truncate(self.index + 1);
        self.entries.push(entry);
        self.index = self.entries.len() - 1;
    }

    fn replace(&mut self, entry: Entry) {
        self.entries[self.index] = entry;
    }
}

/// Browser tab simulation implementing both [`BrowserEnvironment`] and
/// [`HashEnvironment`].
pub struct SimulatedWindow {
    tab: RefCell<Tab>,
    subscribers: RefCell<Vec<(SubscriptionId, ChangeCallback)>>,
    next_subscription: Cell<u64>,
    available: bool,
    supports_history: bool,
    go_reloads: bool,
    base_href: bool,
}

impl SimulatedWindow {
    /// A tab whose only entry is `url` (path, search and hash; no origin).
    pub fn new(url: impl Into<String>) -> Self {
        Self::with_entry_state(url, EntryState::default())
    }

    /// A tab opened on `url` with native entry state already present, as
    /// after a page reload.
    pub fn with_entry_state(url: impl Into<String>, state: EntryState) -> Self {
        Self {
            tab: RefCell::new(Tab {
                entries: vec![Entry {
                    url: url.into(),
                    state,
                }],
                index: 0,
                pending_events: 0,
                reloads: 0,
            }),
            subscribers: RefCell::new(Vec::new()),
            next_subscription: Cell::new(0),
            available: true,
            supports_history: true,
            go_reloads: false,
            base_href: false,
        }
    }

    /// Simulate a host with no DOM.
    pub fn unavailable(mut self) -> Self {
        self.available = false;
        self
    }

    /// Simulate a browser without `pushState`.
    pub fn without_history_support(mut self) -> Self {
        self.supports_history = false;
        self
    }

    /// Simulate a browser that reloads on hash `go(n)`.
    pub fn with_reloading_hash_go(mut self) -> Self {
        self.go_reloads = true;
        self
    }

    /// Simulate a document carrying a `<base href>` tag.
    pub fn with_base_tag(mut self) -> Self {
        self.base_href = true;
        self
    }

    // ========================================================================
    // Inspection
    // ========================================================================

    /// Current URL.
    pub fn url(&self) -> String {
        self.tab.borrow().current().url.clone()
    }

    /// Native state of the current entry.
    pub fn entry_state(&self) -> EntryState {
        self.tab.borrow().current().state.clone()
    }

    /// Cursor position in the entry list.
    pub fn index(&self) -> usize {
        self.tab.borrow().index
    }

    /// URLs of every entry.
    pub fn urls(&self) -> Vec<String> {
        self.tab.borrow().entries.iter().map(|e| e.url.clone()).collect()
    }

    /// Full page navigations performed so far.
    pub fn reload_count(&self) -> usize {
        self.tab.borrow().reloads
    }

    pub fn pending_events(&self) -> usize {
        self.tab.borrow().pending_events
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.borrow().len()
    }

    // ========================================================================
    // User actions
    // ========================================================================

    /// The back button.
    pub fn back(&self) {
        self.go_by(-1);
    }

    /// The forward button.
    pub fn forward(&self) {
        self.go_by(1);
    }

    /// Typing a URL that only differs in its fragment into the address bar.
    pub fn enter_url(&self, url: impl Into<String>) {
        let mut tab = self.tab.borrow_mut();
        tab.push(Entry {
            url: url.into(),
            state: EntryState::default(),
        });
        tab.pending_events += 1;
    }

    /// Deliver queued change events to subscribers. Returns how many were
    /// delivered, including events raised while dispatching.
    pub fn dispatch_pending(&self) -> usize {
        let mut delivered = 0;
        loop {
            {
                let mut tab = self.tab.borrow_mut();
                if tab.pending_events == 0 {
                    break;
                }
                tab.pending_events -= 1;
            }

            let subscribers: Vec<ChangeCallback> = self
                .subscribers
                .borrow()
                .iter()
                .map(|(_, callback)| ChangeCallback::clone(callback))
                .collect();

            trace_log!("Dispatching change event to {} subscriber(s)", subscribers.len());
            for callback in subscribers {
                callback();
            }
            delivered += 1;
        }
        delivered
    }

    fn fragment(&self) -> String {
        let url = self.url();
        url.find('#').map_or_else(String::new, |index| url[index + 1..].to_string())
    }
}

impl Environment for SimulatedWindow {
    fn is_available(&self) -> bool {
        self.available
    }

    fn length(&self) -> usize {
        self.tab.borrow().entries.len()
    }

    fn go_by(&self, delta: isize) {
        let mut tab = self.tab.borrow_mut();
        let target = (tab.index as isize).saturating_add(delta);
        if delta == 0 || target < 0 || target >= tab.entries.len() as isize {
            return;
        }
        tab.index = target as usize;
        tab.pending_events += 1;
    }

    fn subscribe(&self, on_change: ChangeCallback) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription.get() + 1);
        self.next_subscription.set(id.0);
        self.subscribers.borrow_mut().push((id, on_change));
        id
    }

    fn unsubscribe(&self, id: SubscriptionId) {
        self.subscribers.borrow_mut().retain(|(sub, _)| *sub != id);
    }
}

impl BrowserEnvironment for SimulatedWindow {
    fn read_current(&self) -> (String, EntryState) {
        let tab = self.tab.borrow();
        let entry = tab.current();
        (entry.url.clone(), entry.state.clone())
    }

    fn write(&self, kind: WriteKind, href: &str, state: EntryState) {
        let entry = Entry {
            url: href.to_string(),
            state,
        };
        let mut tab = self.tab.borrow_mut();
        match kind {
            WriteKind::Push => tab.push(entry),
            WriteKind::Replace => tab.replace(entry),
        }
    }

    fn navigate(&self, kind: WriteKind, href: &str) {
        self.write(kind, href, EntryState::default());
        self.tab.borrow_mut().reloads += 1;
    }

    fn supports_history(&self) -> bool {
        self.supports_history
    }
}

impl HashEnvironment for SimulatedWindow {
    fn read_hash_path(&self) -> String {
        self.fragment()
    }

    fn write_hash_path(&self, kind: WriteKind, path: &str) {
        if self.fragment() == path {
            // Assigning the same fragment neither adds an entry nor fires.
            return;
        }
        let url = format!("{}#{}", strip_hash(&self.url()), path);
        let entry = Entry {
            url,
            state: EntryState::default(),
        };
        let mut tab = self.tab.borrow_mut();
        match kind {
            WriteKind::Push => tab.push(entry),
            WriteKind::Replace => tab.replace(entry),
        }
        tab.pending_events += 1;
    }

    fn base_href(&self) -> Option<String> {
        self.base_href.then(|| strip_hash(&self.url()).to_string())
    }

    fn can_go_without_reload(&self) -> bool {
        !self.go_reloads
    }
}

impl std::fmt::Debug for SimulatedWindow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SimulatedWindow")
            .field("tab", &*self.tab.borrow())
            .field("subscribers", &self.subscriber_count())
            .finish()
    }
}

//! Memory history.
//!
//! [`MemoryHistory`] owns its whole stack, so it has no environment to
//! reconcile with: `go(n)` is confirmed before it moves, and a rejected POP
//! simply re-notifies listeners with the unchanged location, the way the DOM
//! adapters re-render after reverting.
//!
//! ```
//! use navigator_history::{History, MemoryHistory, MemoryHistoryOptions};
//!
//! let history = MemoryHistory::new(
//!     MemoryHistoryOptions::new().initial_entries(["/", "/users", "/users/7"]).initial_index(2),
//! )
//! .unwrap();
//!
//! history.go(-5);
//! assert_eq!(history.index(), 0);
//! assert!(history.can_go(2));
//! assert!(!history.can_go(3));
//! ```

use crate::confirm::{PendingNavigation, UserConfirmation};
use crate::error::{HistoryError, NavigationResult};
use crate::handle::{BlockHandle, ListenerHandle, Release};
use crate::history::History;
use crate::key::create_key;
use crate::location::{create_location, warn_if_state_ignored, Location, PathInput};
use crate::options::MemoryHistoryOptions;
use crate::path::create_path;
use crate::prompt::Prompt;
use crate::state::StateValue;
use crate::sync::run_transition;
use crate::transition::{ListenerId, PromptId, TransitionManager};
use crate::{debug_log, info_log, Action};
use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

#[derive(Debug, Clone)]
struct MemoryState {
    action: Action,
    index: usize,
    entries: Vec<Location>,
}

struct MemoryShared {
    transitions: TransitionManager,
    confirmation: Option<Rc<dyn UserConfirmation>>,
    key_length: usize,
    state: RefCell<MemoryState>,
}

impl MemoryShared {
    /// Update the state, then notify listeners with the result.
    fn commit(&self, update: impl FnOnce(&mut MemoryState)) {
        let (location, action) = {
            let mut state = self.state.borrow_mut();
            update(&mut state);
            (state.entries[state.index].clone(), state.action)
        };
        self.transitions.notify_listeners(&location, action);
    }

    fn push(&self, location: Location) -> NavigationResult {
        self.commit(|state| {
            let next = state.index + 1;
            state.entries.truncate(next);
            state.entries.push(location.clone());
            state.index = next;
            state.action = Action::Push;
        });
        debug_log!("PUSH committed: {}", location.path());
        NavigationResult::Committed {
            action: Action::Push,
            location,
        }
    }

    fn replace(&self, location: Location) -> NavigationResult {
        self.commit(|state| {
            let index = state.index;
            state.entries[index] = location.clone();
            state.action = Action::Replace;
        });
        debug_log!("REPLACE committed: {}", location.path());
        NavigationResult::Committed {
            action: Action::Replace,
            location,
        }
    }
}

impl Release for MemoryShared {
    fn release_listener(&self, id: ListenerId) {
        self.transitions.remove_listener(id);
    }

    fn release_block(&self, id: PromptId) {
        self.transitions.clear_prompt(id);
    }
}

fn clamp_index(index: isize, len: usize) -> usize {
    index.clamp(0, len.saturating_sub(1) as isize) as usize
}

/// History kept entirely in memory, for tests and non-DOM hosts.
pub struct MemoryHistory {
    shared: Rc<MemoryShared>,
}

impl MemoryHistory {
    /// Build the stack from `options.initial_entries`. Entries without a key
    /// get a generated one.
    pub fn new(options: MemoryHistoryOptions) -> Result<Self, HistoryError> {
        let MemoryHistoryOptions {
            mut initial_entries,
            initial_index,
            key_length,
            confirmation,
        } = options;

        if initial_entries.is_empty() {
            initial_entries.push(PathInput::from("/"));
        }

        let entries = initial_entries
            .into_iter()
            .map(|entry| {
                let key = entry.key().map_or_else(|| create_key(key_length), str::to_owned);
                create_location(entry, None, Some(key), None)
            })
            .collect::<Result<Vec<_>, _>>()?;

        let index = clamp_index(initial_index, entries.len());
        info_log!(
            "Memory history starting at '{}' ({} of {})",
            entries[index].path(),
            index,
            entries.len()
        );

        Ok(Self {
            shared: Rc::new(MemoryShared {
                transitions: TransitionManager::new(),
                confirmation,
                key_length,
                state: RefCell::new(MemoryState {
                    action: Action::Pop,
                    index,
                    entries,
                }),
            }),
        })
    }

    /// Position of the current entry.
    pub fn index(&self) -> usize {
        self.shared.state.borrow().index
    }

    pub fn entries(&self) -> Vec<Location> {
        self.shared.state.borrow().entries.clone()
    }

    /// Whether `go(delta)` would land inside the stack without clamping.
    pub fn can_go(&self, delta: isize) -> bool {
        let state = self.shared.state.borrow();
        let next = (state.index as isize).saturating_add(delta);
        next >= 0 && next < state.entries.len() as isize
    }

    fn owner(&self) -> Weak<dyn Release> {
        let weak: Weak<MemoryShared> = Rc::downgrade(&self.shared);
        weak
    }

    fn change(
        &self,
        path: PathInput,
        state: Option<StateValue>,
        action: Action,
    ) -> Result<PendingNavigation, HistoryError> {
        warn_if_state_ignored(&path, state.as_ref(), action);

        let key = create_key(self.shared.key_length);
        let location = create_location(path, state, Some(key), Some(&self.location()))?;

        Ok(run_transition(
            Rc::downgrade(&self.shared),
            &self.shared.transitions,
            self.shared.confirmation.as_deref(),
            location,
            action,
            move |shared: &MemoryShared, location| match action {
                Action::Replace => shared.replace(location),
                _ => shared.push(location),
            },
        ))
    }
}

impl History for MemoryHistory {
    fn length(&self) -> usize {
        self.shared.state.borrow().entries.len()
    }

    fn action(&self) -> Action {
        self.shared.state.borrow().action
    }

    fn location(&self) -> Location {
        let state = self.shared.state.borrow();
        state.entries[state.index].clone()
    }

    fn create_href(&self, location: &Location) -> String {
        create_path(location)
    }

    fn push(&self, path: PathInput, state: Option<StateValue>) -> Result<PendingNavigation, HistoryError> {
        self.change(path, state, Action::Push)
    }

    fn replace(&self, path: PathInput, state: Option<StateValue>) -> Result<PendingNavigation, HistoryError> {
        self.change(path, state, Action::Replace)
    }

    /// Move by `delta`, clamped to the stack bounds.
    fn go(&self, delta: isize) {
        let shared = &self.shared;
        let (next, location) = {
            let state = shared.state.borrow();
            let next = clamp_index((state.index as isize).saturating_add(delta), state.entries.len());
            (next, state.entries[next].clone())
        };

        if shared.transitions.is_awaiting_confirmation() {
            debug_log!("go({}) ignored: another navigation is awaiting confirmation", delta);
            return;
        }

        let weak = Rc::downgrade(shared);
        let candidate = location.clone();
        shared.transitions.confirm_transition_to(
            &location,
            Action::Pop,
            shared.confirmation.as_deref(),
            move |ok| {
                let Some(shared) = weak.upgrade() else {
                    return;
                };
                if ok {
                    debug_log!("POP committed: {}", candidate.path());
                    shared.commit(|state| {
                        state.index = next;
                        state.action = Action::Pop;
                    });
                } else {
                    debug_log!("POP to '{}' cancelled", candidate.path());
                    shared.commit(|_| {});
                }
            },
        );
    }

    fn block(&self, prompt: Prompt) -> BlockHandle {
        BlockHandle::new(self.owner(), self.shared.transitions.set_prompt(prompt))
    }

    fn listen_boxed(&self, listener: Box<dyn Fn(&Location, Action)>) -> ListenerHandle {
        ListenerHandle::new(
            self.owner(),
            self.shared.transitions.append_listener(Rc::from(listener)),
        )
    }
}

impl fmt::Debug for MemoryHistory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.shared.state.borrow();
        f.debug_struct("MemoryHistory")
            .field("action", &state.action)
            .field("index", &state.index)
            .field("entries", &state.entries)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    fn paths(history: &MemoryHistory) -> Vec<String> {
        history.entries().iter().map(Location::path).collect()
    }

    #[test]
    fn test_default_starts_at_root() {
        let history = MemoryHistory::new(MemoryHistoryOptions::new()).unwrap();
        assert_eq!(history.location().pathname(), "/");
        assert_eq!(history.action(), Action::Pop);
        assert_eq!(history.length(), 1);
        assert!(history.location().key().is_some());
    }

    #[test]
    fn test_empty_initial_entries_fall_back_to_root() {
        let history =
            MemoryHistory::new(MemoryHistoryOptions::new().initial_entries(Vec::<&str>::new())).unwrap();
        assert_eq!(paths(&history), vec!["/"]);
    }

    #[test]
    fn test_initial_index_is_clamped() {
        let history = MemoryHistory::new(
            MemoryHistoryOptions::new().initial_entries(["/a", "/b"]).initial_index(9),
        )
        .unwrap();
        assert_eq!(history.index(), 1);
        assert_eq!(history.location().pathname(), "/b");
    }

    #[test]
    fn test_push_truncates_forward_entries() {
        let history = MemoryHistory::new(
            MemoryHistoryOptions::new().initial_entries(["/a", "/b", "/c"]).initial_index(0),
        )
        .unwrap();

        let result = pollster::block_on(history.push("/d".into(), None).unwrap());
        assert!(result.is_committed());
        assert_eq!(paths(&history), vec!["/a", "/d"]);
        assert_eq!(history.index(), 1);
    }

    #[test]
    fn test_replace_keeps_length() {
        let history = MemoryHistory::new(MemoryHistoryOptions::new()).unwrap();
        let _ = history.replace("/x".into(), None).unwrap();
        assert_eq!(paths(&history), vec!["/x"]);
        assert_eq!(history.action(), Action::Replace);
    }

    #[test]
    fn test_rejected_pop_renotifies() {
        let history = MemoryHistory::new(
            MemoryHistoryOptions::new().initial_entries(["/a", "/b"]).initial_index(1),
        )
        .unwrap();
        let calls = Rc::new(Cell::new(0));
        let counter = Rc::clone(&calls);
        let listener = history.listen(move |location, action| {
            assert_eq!(location.pathname(), "/b");
            assert_eq!(action, Action::Pop);
            counter.set(counter.get() + 1);
        });
        let blocker = history.block(false.into());

        history.go_back();
        assert_eq!(history.index(), 1);
        assert_eq!(calls.get(), 1);

        blocker.dispose();
        listener.dispose();
    }

    #[test]
    fn test_extreme_deltas_saturate() {
        let history = MemoryHistory::new(
            MemoryHistoryOptions::new().initial_entries(["/a", "/b", "/c"]).initial_index(1),
        )
        .unwrap();

        assert!(!history.can_go(isize::MAX));
        assert!(!history.can_go(isize::MIN));

        history.go(isize::MAX);
        assert_eq!(history.index(), 2);

        history.go(isize::MIN);
        assert_eq!(history.index(), 0);
    }
}

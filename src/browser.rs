//! Browser history.
//!
//! [`BrowserHistory`] is backed by the native history API: `pushState` and
//! `replaceState` for writes, `popstate` for out-of-band moves. Every entry
//! it creates carries a random key in its native state, and the internal
//! stack is indexed by those keys.

use crate::confirm::PendingNavigation;
use crate::env::{BrowserEnvironment, EntryState, Environment, WriteKind};
use crate::error::{HistoryError, NavigationResult};
use crate::handle::{BlockHandle, ListenerHandle};
use crate::history::History;
use crate::key::create_key;
use crate::location::{create_location, warn_if_state_ignored, Location, PathInput};
use crate::options::{normalize_basename, BrowserHistoryOptions};
use crate::path::{create_path, has_basename, strip_basename};
use crate::prompt::Prompt;
use crate::stack::TokenLookup;
use crate::state::StateValue;
use crate::sync::{ExternalStore, Synchronizer};
use crate::{debug_log, error_log, info_log, soft_warning, Action};
use std::fmt;
use std::rc::Rc;

pub(crate) struct BrowserStore<E> {
    env: E,
    basename: String,
    force_refresh: bool,
    key_length: usize,
}

impl<E: BrowserEnvironment> BrowserStore<E> {
    /// Location currently shown by the environment.
    fn dom_location(&self) -> Result<Location, HistoryError> {
        let (mut path, entry) = self.env.read_current();

        if !self.basename.is_empty() {
            if !has_basename(&path, &self.basename) {
                soft_warning!(
                    "You are attempting to use a basename on a page whose URL path does not begin \
                     with the basename. Expected path \"{}\" to begin with \"{}\".",
                    path,
                    self.basename
                );
            }
            path = strip_basename(&path, &self.basename).to_string();
        }

        create_location(PathInput::Path(path), entry.state, entry.key, None)
    }

    fn create_href(&self, location: &Location) -> String {
        format!("{}{}", self.basename, create_path(location))
    }
}

impl<E: BrowserEnvironment + 'static> ExternalStore for BrowserStore<E> {
    type Token = Option<String>;

    fn token(location: &Location) -> Self::Token {
        location.key().map(str::to_owned)
    }

    fn env(&self) -> &dyn Environment {
        &self.env
    }

    fn observe(sync: &Synchronizer<Self>) -> Option<Location> {
        match sync.store.dom_location() {
            Ok(location) => Some(location),
            Err(err) => {
                error_log!("Ignoring popstate: {}", err);
                None
            }
        }
    }
}

/// Apply a confirmed PUSH or REPLACE to the native history.
fn apply<E: BrowserEnvironment + 'static>(
    sync: &Synchronizer<BrowserStore<E>>,
    location: Location,
    action: Action,
) -> NavigationResult {
    let store = &sync.store;
    let kind = match action {
        Action::Replace => WriteKind::Replace,
        _ => WriteKind::Push,
    };
    let href = store.create_href(&location);

    if !store.env.supports_history() {
        if location.state().is_some() {
            soft_warning!(
                "Browser history cannot {} state in browsers that do not support HTML5 history",
                action.verb()
            );
        }
        store.env.navigate(kind, &href);
        return NavigationResult::FullReload { href };
    }

    if store.force_refresh {
        debug_log!("Forcing full navigation to '{}'", href);
        store.env.navigate(kind, &href);
        return NavigationResult::FullReload { href };
    }

    store.env.write(
        kind,
        &href,
        EntryState {
            key: location.key().map(str::to_owned),
            state: location.state().cloned(),
        },
    );

    match action {
        Action::Replace => sync.record_replace(&location),
        _ => sync.record_push(&location),
    }
    sync.commit(Some((action, location.clone())));
    NavigationResult::Committed { action, location }
}

/// History backed by the native history API.
pub struct BrowserHistory<E: BrowserEnvironment + 'static> {
    sync: Rc<Synchronizer<BrowserStore<E>>>,
}

impl<E: BrowserEnvironment + 'static> BrowserHistory<E> {
    /// Attach to `env`, reading the initial location from it.
    pub fn new(env: E, options: BrowserHistoryOptions) -> Result<Self, HistoryError> {
        if !env.is_available() {
            return Err(HistoryError::EnvironmentUnavailable { adapter: "Browser" });
        }

        let store = BrowserStore {
            env,
            basename: normalize_basename(&options.basename),
            force_refresh: options.force_refresh,
            key_length: options.key_length,
        };
        let initial = store.dom_location()?;
        info_log!("Browser history starting at '{}'", initial.path());

        Ok(Self {
            sync: Synchronizer::new(store, initial, TokenLookup::First, options.confirmation),
        })
    }

    /// The environment this history writes to.
    pub fn env(&self) -> &E {
        &self.sync.store.env
    }

    /// Current reference count of the environment subscription.
    pub fn listening_count(&self) -> usize {
        self.sync.listening_count()
    }

    /// Keys of the entries the history believes are on the native stack.
    pub fn stack_keys(&self) -> Vec<Option<String>> {
        self.sync.stack_tokens()
    }

    fn change(
        &self,
        path: PathInput,
        state: Option<StateValue>,
        action: Action,
    ) -> Result<PendingNavigation, HistoryError> {
        warn_if_state_ignored(&path, state.as_ref(), action);

        let key = create_key(self.sync.store.key_length);
        let location = create_location(path, state, Some(key), Some(&self.sync.location()))?;

        Ok(self
            .sync
            .navigate(location, action, move |sync, location| apply(sync, location, action)))
    }
}

impl<E: BrowserEnvironment + 'static> History for BrowserHistory<E> {
    fn length(&self) -> usize {
        self.sync.length()
    }

    fn action(&self) -> Action {
        self.sync.action()
    }

    fn location(&self) -> Location {
        self.sync.location()
    }

    fn create_href(&self, location: &Location) -> String {
        self.sync.store.create_href(location)
    }

    fn push(&self, path: PathInput, state: Option<StateValue>) -> Result<PendingNavigation, HistoryError> {
        self.change(path, state, Action::Push)
    }

    fn replace(&self, path: PathInput, state: Option<StateValue>) -> Result<PendingNavigation, HistoryError> {
        self.change(path, state, Action::Replace)
    }

    fn go(&self, delta: isize) {
        self.sync.store.env.go_by(delta);
    }

    fn block(&self, prompt: Prompt) -> BlockHandle {
        BlockHandle::new(self.sync.owner(), self.sync.block(prompt))
    }

    fn listen_boxed(&self, listener: Box<dyn Fn(&Location, Action)>) -> ListenerHandle {
        ListenerHandle::new(self.sync.owner(), self.sync.listen(Rc::from(listener)))
    }
}

impl<E: BrowserEnvironment + 'static> fmt::Debug for BrowserHistory<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BrowserHistory")
            .field("location", &self.sync.location())
            .field("action", &self.sync.action())
            .field("basename", &self.sync.store.basename)
            .field("listening", &self.sync.listening_count())
            .finish()
    }
}

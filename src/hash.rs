//! Hash history.
//!
//! [`HashHistory`] keeps the application path in the URL fragment, which
//! works on servers that only ever serve one document. Fragment entries have
//! no native state slot, so hash locations carry neither a key nor state,
//! and the internal stack is indexed by serialized paths.

use crate::confirm::PendingNavigation;
use crate::env::{Environment, HashEnvironment, WriteKind};
use crate::error::{HistoryError, NavigationResult};
use crate::handle::{BlockHandle, ListenerHandle};
use crate::history::History;
use crate::location::{create_location, Location, PathInput};
use crate::options::{normalize_basename, HashHistoryOptions};
use crate::path::{add_leading_slash, create_path, has_basename, strip_basename, strip_leading_slash};
use crate::prompt::Prompt;
use crate::stack::TokenLookup;
use crate::state::StateValue;
use crate::sync::{ExternalStore, Synchronizer};
use crate::{debug_log, error_log, info_log, soft_warning, trace_log, Action};
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

/// How a path is written into the fragment.
///
/// | Variant | `/home` is stored as |
/// |---------|----------------------|
/// | `Slash` | `#/home` |
/// | `NoSlash` | `#home` |
/// | `HashBang` | `#!/home` |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HashType {
    #[default]
    Slash,
    NoSlash,
    HashBang,
}

impl HashType {
    /// Path to fragment text.
    pub fn encode_path(self, path: &str) -> String {
        match self {
            HashType::Slash => add_leading_slash(path).into_owned(),
            HashType::NoSlash => strip_leading_slash(path).to_string(),
            HashType::HashBang => {
                if path.starts_with('!') {
                    path.to_string()
                } else {
                    format!("!/{}", strip_leading_slash(path))
                }
            }
        }
    }

    /// Fragment text to path.
    pub fn decode_path(self, fragment: &str) -> String {
        match self {
            HashType::Slash | HashType::NoSlash => add_leading_slash(fragment).into_owned(),
            HashType::HashBang => fragment.strip_prefix('!').unwrap_or(fragment).to_string(),
        }
    }
}

pub(crate) struct HashStore<E> {
    env: E,
    basename: String,
    hash_type: HashType,
    /// Path of our own write whose `hashchange` echo must be skipped.
    ignore_path: RefCell<Option<String>>,
}

impl<E: HashEnvironment> HashStore<E> {
    fn dom_location(&self) -> Result<Location, HistoryError> {
        let mut path = self.hash_type.decode_path(&self.env.read_hash_path());

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

        create_location(PathInput::Path(path), None, None, None)
    }

    /// Rewrite the fragment in canonical form. Returns `true` when it had to.
    fn normalize_fragment(&self) -> bool {
        let fragment = self.env.read_hash_path();
        let encoded = self.hash_type.encode_path(&fragment);
        if fragment == encoded {
            return false;
        }
        debug_log!("Normalizing fragment '{}' to '{}'", fragment, encoded);
        self.env.write_hash_path(WriteKind::Replace, &encoded);
        true
    }

    fn encoded(&self, location: &Location) -> String {
        self.hash_type
            .encode_path(&format!("{}{}", self.basename, create_path(location)))
    }
}

impl<E: HashEnvironment + 'static> ExternalStore for HashStore<E> {
    type Token = String;

    fn token(location: &Location) -> Self::Token {
        create_path(location)
    }

    fn env(&self) -> &dyn Environment {
        &self.env
    }

    fn observe(sync: &Synchronizer<Self>) -> Option<Location> {
        let store = &sync.store;

        // The rewrite fires its own hashchange, handled on the next round.
        if store.normalize_fragment() {
            return None;
        }

        let location = match store.dom_location() {
            Ok(location) => location,
            Err(err) => {
                error_log!("Ignoring hashchange: {}", err);
                return None;
            }
        };

        if !sync.is_forcing_pop() && sync.store_location().same_path(&location) {
            trace_log!("hashchange without a location change");
            return None;
        }

        let path = create_path(&location);
        let mut ignore_path = store.ignore_path.borrow_mut();
        if ignore_path.as_deref() == Some(path.as_str()) {
            trace_log!("Skipping echo of our own write to '{}'", path);
            return None;
        }
        *ignore_path = None;

        Some(location)
    }
}

fn apply<E: HashEnvironment + 'static>(
    sync: &Synchronizer<HashStore<E>>,
    location: Location,
    action: Action,
) -> NavigationResult {
    let store = &sync.store;
    let path = create_path(&location);
    let encoded = store.encoded(&location);
    let hash_changed = store.env.read_hash_path() != encoded;

    match action {
        Action::Replace => {
            if hash_changed {
                *store.ignore_path.borrow_mut() = Some(path);
                store.env.write_hash_path(WriteKind::Replace, &encoded);
            }
            sync.record_replace(&location);
        }
        _ => {
            if !hash_changed {
                soft_warning!(
                    "Hash history cannot PUSH the same path; a new entry will not be added to the history stack"
                );
                sync.commit(None);
                return NavigationResult::Unchanged;
            }
            *store.ignore_path.borrow_mut() = Some(path);
            store.env.write_hash_path(WriteKind::Push, &encoded);
            sync.record_push(&location);
        }
    }

    sync.commit(Some((action, location.clone())));
    NavigationResult::Committed { action, location }
}

/// History stored in the URL fragment.
pub struct HashHistory<E: HashEnvironment + 'static> {
    sync: Rc<Synchronizer<HashStore<E>>>,
}

impl<E: HashEnvironment + 'static> HashHistory<E> {
    /// Attach to `env`. A fragment not in `hash_type`'s canonical form is
    /// rewritten first.
    pub fn new(env: E, options: HashHistoryOptions) -> Result<Self, HistoryError> {
        if !env.is_available() {
            return Err(HistoryError::EnvironmentUnavailable { adapter: "Hash" });
        }

        let store = HashStore {
            env,
            basename: normalize_basename(&options.basename),
            hash_type: options.hash_type,
            ignore_path: RefCell::new(None),
        };
        store.normalize_fragment();
        let initial = store.dom_location()?;
        info_log!("Hash history starting at '{}'", initial.path());

        Ok(Self {
            sync: Synchronizer::new(store, initial, TokenLookup::Last, options.confirmation),
        })
    }

    pub fn env(&self) -> &E {
        &self.sync.store.env
    }

    pub fn hash_type(&self) -> HashType {
        self.sync.store.hash_type
    }

    pub fn listening_count(&self) -> usize {
        self.sync.listening_count()
    }

    /// Paths the history believes are on the native stack.
    pub fn stack_paths(&self) -> Vec<String> {
        self.sync.stack_tokens()
    }

    fn change(
        &self,
        path: PathInput,
        state: Option<StateValue>,
        action: Action,
    ) -> Result<PendingNavigation, HistoryError> {
        if state.is_some() || path.has_state() {
            soft_warning!("Hash history cannot {} state; it is ignored", action.verb());
        }

        let location =
            create_location(path, None, None, Some(&self.sync.location()))?.into_path_only();

        Ok(self
            .sync
            .navigate(location, action, move |sync, location| apply(sync, location, action)))
    }
}

impl<E: HashEnvironment + 'static> History for HashHistory<E> {
    fn length(&self) -> usize {
        self.sync.length()
    }

    fn action(&self) -> Action {
        self.sync.action()
    }

    fn location(&self) -> Location {
        self.sync.location()
    }

    /// `#` plus the encoded path, prefixed with the document URL when the
    /// page has a `<base href>`.
    fn create_href(&self, location: &Location) -> String {
        let store = &self.sync.store;
        let base = store.env.base_href().unwrap_or_default();
        format!("{}#{}", base, store.encoded(location))
    }

    fn push(&self, path: PathInput, state: Option<StateValue>) -> Result<PendingNavigation, HistoryError> {
        self.change(path, state, Action::Push)
    }

    fn replace(&self, path: PathInput, state: Option<StateValue>) -> Result<PendingNavigation, HistoryError> {
        self.change(path, state, Action::Replace)
    }

    fn go(&self, delta: isize) {
        let env = &self.sync.store.env;
        if !env.can_go_without_reload() {
            soft_warning!("Hash history go(n) causes a full page reload in this browser");
        }
        env.go_by(delta);
    }

    fn block(&self, prompt: Prompt) -> BlockHandle {
        BlockHandle::new(self.sync.owner(), self.sync.block(prompt))
    }

    fn listen_boxed(&self, listener: Box<dyn Fn(&Location, Action)>) -> ListenerHandle {
        ListenerHandle::new(self.sync.owner(), self.sync.listen(Rc::from(listener)))
    }
}

impl<E: HashEnvironment + 'static> fmt::Debug for HashHistory<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HashHistory")
            .field("location", &self.sync.location())
            .field("action", &self.sync.action())
            .field("hash_type", &self.sync.store.hash_type)
            .field("listening", &self.sync.listening_count())
            .finish()
    }
}

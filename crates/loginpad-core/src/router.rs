//! Path-based view routing.
//!
//! Two paths are known: `/login` and `/home`. Everything else, `/` included,
//! resolves to no view. History works like a browser's: `navigate` pushes or
//! replaces the current entry and `back` pops one.
//!
//! `/home` is open to anyone by default. A router built with
//! [`Router::with_guard`] sends unauthenticated visits to `/login` instead,
//! remembering where they were headed.

use tracing::{debug, info};

use crate::auth::SessionStore;

pub const LOGIN_PATH: &str = "/login";
pub const HOME_PATH: &str = "/home";
pub const ROOT_PATH: &str = "/";

/// Views the router can show
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Login,
    Home,
}

impl Route {
    pub fn from_path(path: &str) -> Option<Self> {
        match path {
            LOGIN_PATH => Some(Route::Login),
            HOME_PATH => Some(Route::Home),
            _ => None,
        }
    }

    pub fn path(&self) -> &'static str {
        match self {
            Route::Login => LOGIN_PATH,
            Route::Home => HOME_PATH,
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Route::Login => "Login",
            Route::Home => "Home",
        }
    }
}

/// State carried along with a history entry
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LocationState {
    /// Where the user was going before being sent to the login view
    pub from: Option<String>,
}

/// One history entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    pub path: String,
    pub state: LocationState,
}

impl Location {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            state: LocationState::default(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct NavigateOptions {
    /// Overwrite the current entry instead of pushing a new one
    pub replace: bool,
    pub state: LocationState,
}

impl NavigateOptions {
    pub fn replace() -> Self {
        Self {
            replace: true,
            ..Self::default()
        }
    }
}

pub struct Router {
    history: Vec<Location>,
    guard: Option<SessionStore>,
}

impl Router {
    /// Unguarded router starting at `initial_path`
    pub fn new(initial_path: &str) -> Self {
        Self {
            history: vec![Location::new(initial_path)],
            guard: None,
        }
    }

    /// Router that only lets authenticated sessions reach `/home`
    pub fn with_guard(initial_path: &str, session: SessionStore) -> Self {
        let mut router = Self {
            history: vec![Location::new(ROOT_PATH)],
            guard: Some(session),
        };
        router.navigate(initial_path, NavigateOptions::replace());
        router
    }

    pub fn is_guarded(&self) -> bool {
        self.guard.is_some()
    }

    pub fn current(&self) -> &Location {
        // history is never empty: `back` keeps the first entry
        &self.history[self.history.len() - 1]
    }

    /// The view for the current path, if any
    pub fn view(&self) -> Option<Route> {
        Route::from_path(&self.current().path)
    }

    pub fn navigate(&mut self, path: &str, options: NavigateOptions) {
        let location = match self.redirect_for(path) {
            Some(redirect) => {
                info!(requested = %path, to = %redirect.path, "Redirecting unauthenticated visit");
                redirect
            }
            None => Location {
                path: path.to_string(),
                state: options.state,
            },
        };

        debug!(path = %location.path, replace = options.replace, "Navigating");
        if options.replace {
            let last = self.history.len() - 1;
            self.history[last] = location;
        } else {
            self.history.push(location);
        }
    }

    /// Go to the previous entry. Returns false when there is none.
    pub fn back(&mut self) -> bool {
        if self.history.len() > 1 {
            self.history.pop();
            debug!(path = %self.current().path, "Navigated back");
            true
        } else {
            false
        }
    }

    pub fn can_go_back(&self) -> bool {
        self.history.len() > 1
    }

    /// Number of entries in history
    pub fn depth(&self) -> usize {
        self.history.len()
    }

    /// Drop entries pushed after the first `depth` ones.
    /// The first entry is always kept.
    pub fn truncate(&mut self, depth: usize) {
        self.history.truncate(depth.max(1));
    }

    fn redirect_for(&self, path: &str) -> Option<Location> {
        let session = self.guard.as_ref()?;
        if path == HOME_PATH && !session.is_authenticated() {
            return Some(Location {
                path: LOGIN_PATH.to_string(),
                state: LocationState {
                    from: Some(path.to_string()),
                },
            });
        }
        None
    }
}

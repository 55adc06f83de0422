use std::fmt;
use std::sync::Arc;

use tokio::sync::watch;
use tracing::debug;

/// The authentication record for the running process.
///
/// Starts empty and is overwritten in full on every successful login.
/// There is no logout, so nothing ever resets it back to empty.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Session {
    pub user: String,
    pub password: String,
    pub access_token: Option<String>,
}

impl Session {
    pub fn is_authenticated(&self) -> bool {
        self.access_token.is_some()
    }

    /// Get the bearer token if a login has succeeded
    pub fn token(&self) -> Option<&str> {
        self.access_token.as_deref()
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("user", &self.user)
            .field("password", &"<redacted>")
            .field("access_token", &self.access_token.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

/// Shared handle to the in-memory session.
///
/// Clone is cheap - all clones point at the same watch channel, so a write
/// through any handle is seen by every reader and subscriber.
#[derive(Clone)]
pub struct SessionStore {
    tx: Arc<watch::Sender<Session>>,
}

impl SessionStore {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(Session::default());
        Self { tx: Arc::new(tx) }
    }

    /// Snapshot of the current session
    pub fn read(&self) -> Session {
        self.tx.borrow().clone()
    }

    /// Replace the whole session and wake every subscriber
    pub fn write(&self, session: Session) {
        debug!(
            user = %session.user,
            authenticated = session.is_authenticated(),
            "Session replaced"
        );
        self.tx.send_replace(session);
    }

    /// Receiver that is marked changed on each write
    pub fn subscribe(&self) -> watch::Receiver<Session> {
        self.tx.subscribe()
    }

    pub fn is_authenticated(&self) -> bool {
        self.tx.borrow().is_authenticated()
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("SessionStore").field(&*self.tx.borrow()).finish()
    }
}

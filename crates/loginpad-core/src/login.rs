//! The login form and the flow that drives it.
//!
//! A submission goes `Idle -> Validating -> Submitting` and ends in
//! `Succeeded` or `Failed`. Validation failures go straight back to `Idle`
//! without touching the network. `Failed` accepts a new submit just like
//! `Idle`, and keeps its message until that happens.
//!
//! The two halves of a submission are exposed separately so a UI can run the
//! request in the background: [`LoginForm::begin_submit`] validates and hands
//! back the credentials to send, [`LoginForm::finish`] applies the result.
//! [`LoginFlow::submit`] does both in one call.

use std::fmt;

use thiserror::Error;
use tracing::{info, warn};

use crate::api::{AuthClient, LoginError};
use crate::auth::{Credentials, FieldErrors, Session, SessionStore};
use crate::router::{NavigateOptions, Router, ROOT_PATH};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoginState {
    #[default]
    Idle,
    Validating,
    Submitting,
    Succeeded,
    Failed,
}

/// Why `begin_submit` did not produce credentials
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SubmitBlocked {
    #[error("invalid form input")]
    Invalid(FieldErrors),

    #[error("a login request is already in flight")]
    InFlight,
}

/// What a completed submission did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginOutcome {
    /// Session written; router now at `redirected_to`
    Succeeded { redirected_to: String },
    Failed(LoginError),
    Blocked(SubmitBlocked),
}

/// Form fields plus the messages shown around them
#[derive(Default)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
    pub field_errors: FieldErrors,
    error: Option<LoginError>,
    state: LoginState,
    redirect: Option<PendingRedirect>,
}

/// Where to go once the in-flight request succeeds, captured at submit time
#[derive(Debug, Clone, PartialEq, Eq)]
struct PendingRedirect {
    target: String,
    /// History depth with the login entry on top
    depth: usize,
}

impl PendingRedirect {
    fn from_router(router: &Router) -> Self {
        Self {
            target: router
                .current()
                .state
                .from
                .clone()
                .unwrap_or_else(|| ROOT_PATH.to_string()),
            depth: router.depth(),
        }
    }

    /// Replace the login entry with the target, dropping anything
    /// visited while the request was in flight.
    fn apply(self, router: &mut Router) {
        if router.depth() >= self.depth {
            router.truncate(self.depth);
            router.navigate(&self.target, NavigateOptions::replace());
        } else {
            // login entry already popped by `back`
            router.navigate(&self.target, NavigateOptions::default());
        }
    }
}

impl LoginForm {
    pub fn new() -> Self {
        Self::default()
    }

    /// Form with the email prefilled (e.g. the last address used)
    pub fn with_email(email: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            ..Self::default()
        }
    }

    pub fn state(&self) -> LoginState {
        self.state
    }

    pub fn is_submitting(&self) -> bool {
        self.state == LoginState::Submitting
    }

    /// The message from the last failed request
    pub fn error(&self) -> Option<LoginError> {
        self.error
    }

    /// Validate the fields and move to `Submitting`.
    ///
    /// The redirect target is read from `router` now, so navigation while
    /// the request is in flight does not change it. On invalid input the
    /// field messages are stored on the form, the previous failure message
    /// stays, and the state returns to `Idle`.
    pub fn begin_submit(&mut self, router: &Router) -> Result<Credentials, SubmitBlocked> {
        if self.state == LoginState::Submitting {
            warn!("Submit ignored, login already in flight");
            return Err(SubmitBlocked::InFlight);
        }

        self.state = LoginState::Validating;

        let credentials = Credentials::new(self.email.clone(), self.password.clone());
        if let Err(errors) = credentials.check() {
            self.field_errors = errors.clone();
            self.state = LoginState::Idle;
            return Err(SubmitBlocked::Invalid(errors));
        }

        self.field_errors = FieldErrors::default();
        self.error = None;
        self.redirect = Some(PendingRedirect::from_router(router));
        self.state = LoginState::Submitting;
        Ok(credentials)
    }

    /// Apply the result of the request started by `begin_submit`.
    ///
    /// On success the session is replaced, both fields are cleared and the
    /// router replaces the login entry with the target captured by
    /// `begin_submit` (the pre-redirect path, or `/`). On failure the error
    /// is kept for display and the session is left untouched.
    pub fn finish(
        &mut self,
        credentials: Credentials,
        result: Result<String, LoginError>,
        session: &SessionStore,
        router: &mut Router,
    ) -> LoginOutcome {
        match result {
            Ok(access_token) => {
                session.write(Session {
                    user: credentials.email,
                    password: credentials.password,
                    access_token: Some(access_token),
                });

                self.email.clear();
                self.password.clear();
                self.state = LoginState::Succeeded;

                let redirect = self
                    .redirect
                    .take()
                    .unwrap_or_else(|| PendingRedirect::from_router(router));
                info!(to = %redirect.target, "Login successful");
                redirect.apply(router);

                LoginOutcome::Succeeded {
                    redirected_to: router.current().path.clone(),
                }
            }
            Err(error) => {
                warn!(%error, "Login failed");
                self.redirect = None;
                self.error = Some(error);
                self.state = LoginState::Failed;
                LoginOutcome::Failed(error)
            }
        }
    }
}

impl fmt::Debug for LoginForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginForm")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .field("field_errors", &self.field_errors)
            .field("error", &self.error)
            .field("state", &self.state)
            .field("redirect", &self.redirect)
            .finish()
    }
}

/// Runs a complete submission against the auth service
#[derive(Clone)]
pub struct LoginFlow {
    client: AuthClient,
    session: SessionStore,
}

impl LoginFlow {
    pub fn new(client: AuthClient, session: SessionStore) -> Self {
        Self { client, session }
    }

    pub fn client(&self) -> &AuthClient {
        &self.client
    }

    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    /// Validate, send, and apply the result to the form, session and router
    pub async fn submit(&self, form: &mut LoginForm, router: &mut Router) -> LoginOutcome {
        let credentials = match form.begin_submit(router) {
            Ok(credentials) => credentials,
            Err(blocked) => return LoginOutcome::Blocked(blocked),
        };

        let result = self.client.login(&credentials).await;
        form.finish(credentials, result, &self.session, router)
    }
}

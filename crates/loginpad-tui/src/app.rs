//! Application state management for loginpad.
//!
//! This module contains the `App` struct that ties the core pieces together:
//! the shared session store, the router, the login form, and the background
//! login task.

use std::path::PathBuf;

use anyhow::Result;
use tokio::sync::{mpsc, watch};
use tracing::{debug, info, warn};

use loginpad_core::{
    AuthClient, Config, Credentials, EnvOverrides, LoginError, LoginFlow, LoginForm, LoginOutcome,
    NavigateOptions, Route, Router, Session, SessionStore, SubmitBlocked,
};

// ============================================================================
// Constants
// ============================================================================

/// Buffer size for the background task message channel.
/// Only one login is in flight at a time, so a small buffer is plenty.
const CHANNEL_BUFFER_SIZE: usize = 4;

/// Maximum length for email input.
const MAX_EMAIL_LENGTH: usize = 254;

/// Maximum length for password input.
/// 128 chars accommodates password managers and passphrases.
const MAX_PASSWORD_LENGTH: usize = 128;

/// Maximum length for a path typed into the address prompt.
const MAX_PATH_LENGTH: usize = 128;

// ============================================================================
// UI State Types
// ============================================================================

/// Overall application state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppState {
    Normal,
    EnteringPath,
    Quitting,
}

/// Login form focus state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginFocus {
    Email,
    Password,
    Button,
}

impl LoginFocus {
    pub fn next(&self) -> Self {
        match self {
            LoginFocus::Email => LoginFocus::Password,
            LoginFocus::Password => LoginFocus::Button,
            LoginFocus::Button => LoginFocus::Email,
        }
    }

    pub fn prev(&self) -> Self {
        match self {
            LoginFocus::Email => LoginFocus::Button,
            LoginFocus::Password => LoginFocus::Email,
            LoginFocus::Button => LoginFocus::Password,
        }
    }
}

/// Result of the background login request
struct LoginResult {
    credentials: Credentials,
    result: Result<String, LoginError>,
}

/// Main application state container
pub struct App {
    // Core services
    pub config: Config,
    /// Where `config` is saved; `None` leaves the file alone
    config_path: Option<PathBuf>,
    pub session: SessionStore,
    session_rx: watch::Receiver<Session>,
    flow: LoginFlow,
    pub router: Router,

    // UI State
    pub state: AppState,
    pub path_input: String,
    pub status_message: Option<String>,

    // Login form state
    pub login: LoginForm,
    pub login_focus: LoginFocus,

    // Background task channel
    login_rx: mpsc::Receiver<LoginResult>,
    login_tx: mpsc::Sender<LoginResult>,
}

impl App {
    /// Create a new application instance
    pub fn new(config: Config, config_path: Option<PathBuf>) -> Result<Self> {
        let session = SessionStore::new();
        let client = AuthClient::new(config.effective_base_url(), config.request_timeout())?;
        debug!(base_url = %client.base_url(), "Auth client configured");

        let router = if config.guard_home {
            Router::with_guard(&config.initial_path, session.clone())
        } else {
            Router::new(&config.initial_path)
        };

        let login = match config.prefill_email() {
            Some(email) => LoginForm::with_email(email),
            None => LoginForm::new(),
        };
        let login_focus = if login.email.is_empty() {
            LoginFocus::Email
        } else {
            LoginFocus::Password
        };

        let (tx, rx) = mpsc::channel(CHANNEL_BUFFER_SIZE);

        Ok(Self {
            session_rx: session.subscribe(),
            flow: LoginFlow::new(client, session.clone()),
            session,
            router,
            config,
            config_path,

            state: AppState::Normal,
            path_input: String::new(),
            status_message: None,

            login,
            login_focus,

            login_rx: rx,
            login_tx: tx,
        })
    }

    pub fn current_view(&self) -> Option<Route> {
        self.router.view()
    }

    // =========================================================================
    // Authentication
    // =========================================================================

    /// Validate the form and start the login request in the background.
    /// The result is applied by `check_background_tasks`.
    pub fn submit_login(&mut self) {
        let credentials = match self.login.begin_submit(&self.router) {
            Ok(credentials) => credentials,
            Err(SubmitBlocked::Invalid(errors)) => {
                debug!(?errors, "Login form invalid");
                self.login_focus = if errors.email.is_some() {
                    LoginFocus::Email
                } else {
                    LoginFocus::Password
                };
                return;
            }
            Err(SubmitBlocked::InFlight) => return,
        };

        self.status_message = Some("Signing in...".to_string());

        let client = self.flow.client().clone();
        let tx = self.login_tx.clone();
        tokio::spawn(async move {
            let result = client.login(&credentials).await;
            if tx.send(LoginResult { credentials, result }).await.is_err() {
                warn!("App closed before login finished");
            }
        });
    }

    /// Check for completed background tasks
    pub fn check_background_tasks(&mut self) {
        while let Ok(LoginResult { credentials, result }) = self.login_rx.try_recv() {
            let email = credentials.email.clone();
            let outcome = self
                .login
                .finish(credentials, result, self.flow.session(), &mut self.router);
            self.status_message = None;

            if let LoginOutcome::Succeeded { redirected_to } = outcome {
                self.login_focus = LoginFocus::Email;
                self.status_message = Some(format!("Signed in as {}", email));
                debug!(to = %redirected_to, "Redirected after login");
                self.remember_email(email);
            }
        }

        if self.session_rx.has_changed().unwrap_or(false) {
            let session = self.session_rx.borrow_and_update();
            info!(user = %session.user, "Session updated");
        }
    }

    fn remember_email(&mut self, email: String) {
        if self.config.last_email.as_deref() == Some(email.as_str()) {
            return;
        }
        self.config.last_email = Some(email);
        let Some(path) = self.config_path.as_deref() else {
            debug!("Config not writable this run, last email kept in memory");
            return;
        };
        if let Err(e) = self.config.save_to(path) {
            warn!(error = %e, "Failed to save config");
        }
    }

    // =========================================================================
    // Navigation
    // =========================================================================

    pub fn start_path_prompt(&mut self) {
        self.path_input = self.router.current().path.clone();
        self.state = AppState::EnteringPath;
    }

    pub fn cancel_path_prompt(&mut self) {
        self.path_input.clear();
        self.state = AppState::Normal;
    }

    /// Navigate to the path typed into the prompt
    pub fn confirm_path_prompt(&mut self) {
        let path = normalize_path(&self.path_input);
        self.path_input.clear();
        self.state = AppState::Normal;
        self.router.navigate(&path, NavigateOptions::default());
        self.status_message = None;
    }

    pub fn go_back(&mut self) {
        if !self.router.back() {
            self.status_message = Some("No previous page".to_string());
        }
    }
}

/// Load the config file at `path` and apply `overrides`.
///
/// Returns the path to save back to. A file that cannot be read or parsed
/// falls back to defaults and yields no path, so it is never overwritten.
pub fn load_config(path: Option<PathBuf>, overrides: EnvOverrides) -> (Config, Option<PathBuf>) {
    let Some(path) = path else {
        return (Config::default().with_overrides(overrides), None);
    };
    match Config::load_from(&path) {
        Ok(config) => (config.with_overrides(overrides), Some(path)),
        Err(e) => {
            warn!(error = %e, path = %path.display(), "Failed to load config, using defaults");
            (Config::default().with_overrides(overrides), None)
        }
    }
}

/// Trim whitespace and make sure the path starts with `/`
pub fn normalize_path(input: &str) -> String {
    let trimmed = input.trim();
    if trimmed.starts_with('/') {
        trimmed.to_string()
    } else {
        format!("/{}", trimmed)
    }
}

// ============================================================================
// Input validation helpers (exported for use in input.rs)
// ============================================================================

/// Check if a character is valid for input (no control characters)
fn is_valid_input_char(c: char) -> bool {
    !c.is_control()
}

/// Check if an email character should be accepted
pub fn can_add_email_char(current_len: usize, c: char) -> bool {
    current_len < MAX_EMAIL_LENGTH && is_valid_input_char(c)
}

/// Check if a password character should be accepted
pub fn can_add_password_char(current_len: usize, c: char) -> bool {
    current_len < MAX_PASSWORD_LENGTH && is_valid_input_char(c)
}

/// Check if a path character should be accepted
pub fn can_add_path_char(current_len: usize, c: char) -> bool {
    current_len < MAX_PATH_LENGTH && is_valid_input_char(c) && !c.is_whitespace()
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_app() -> App {
        App::new(
            Config {
                base_url: "http://127.0.0.1:1".to_string(),
                ..Config::default()
            },
            None,
        )
        .unwrap()
    }

    #[test]
    fn test_login_focus_cycles() {
        assert_eq!(LoginFocus::Email.next(), LoginFocus::Password);
        assert_eq!(LoginFocus::Button.next(), LoginFocus::Email);
        assert_eq!(LoginFocus::Email.prev(), LoginFocus::Button);
        assert_eq!(LoginFocus::Password.prev(), LoginFocus::Email);
    }

    #[test]
    fn test_normalize_path() {
        assert_eq!(normalize_path("home"), "/home");
        assert_eq!(normalize_path("  /login "), "/login");
        assert_eq!(normalize_path(""), "/");
    }

    #[test]
    fn test_can_add_email_char() {
        assert!(can_add_email_char(0, 'a'));
        assert!(can_add_email_char(0, '@'));
        assert!(!can_add_email_char(MAX_EMAIL_LENGTH, 'a'));
        assert!(!can_add_email_char(0, '\n'));
    }

    #[test]
    fn test_can_add_password_char() {
        assert!(can_add_password_char(0, 'a'));
        assert!(can_add_password_char(127, '!'));
        assert!(!can_add_password_char(128, 'a'));
        assert!(!can_add_password_char(0, '\x00'));
        assert!(!can_add_password_char(0, '\r'));
    }

    #[test]
    fn test_can_add_path_char() {
        assert!(can_add_path_char(0, '/'));
        assert!(!can_add_path_char(0, ' '));
        assert!(!can_add_path_char(MAX_PATH_LENGTH, 'a'));
    }

    #[test]
    fn test_new_app_starts_at_login() {
        let app = test_app();
        assert_eq!(app.current_view(), Some(Route::Login));
        assert_eq!(app.login_focus, LoginFocus::Email);
        assert!(!app.session.is_authenticated());
    }

    #[test]
    fn test_prefilled_email_focuses_password() {
        let app = App::new(
            Config {
                last_email: Some("ada@example.com".to_string()),
                ..Config::default()
            },
            None,
        )
        .unwrap();
        assert_eq!(app.login.email, "ada@example.com");
        assert_eq!(app.login_focus, LoginFocus::Password);
    }

    #[test]
    fn test_invalid_submit_moves_focus_to_field() {
        let mut app = test_app();
        app.login_focus = LoginFocus::Button;
        app.submit_login();
        assert_eq!(app.login_focus, LoginFocus::Email);
        assert!(app.login.field_errors.email.is_some());
        assert!(!app.login.is_submitting());
    }

    #[test]
    fn test_path_prompt_navigates() {
        let mut app = test_app();
        app.start_path_prompt();
        assert_eq!(app.state, AppState::EnteringPath);
        assert_eq!(app.path_input, "/login");

        app.path_input = "home".to_string();
        app.confirm_path_prompt();
        assert_eq!(app.state, AppState::Normal);
        assert_eq!(app.current_view(), Some(Route::Home));

        app.go_back();
        assert_eq!(app.current_view(), Some(Route::Login));
        app.go_back();
        assert_eq!(app.status_message.as_deref(), Some("No previous page"));
    }

    #[test]
    fn test_guarded_config_redirects_home() {
        let app = App::new(
            Config {
                initial_path: "/home".to_string(),
                guard_home: true,
                ..Config::default()
            },
            None,
        )
        .unwrap();
        assert_eq!(app.current_view(), Some(Route::Login));
    }

    async fn auth_server(token: &str) -> MockServer {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/auth"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "accessToken": token })))
            .expect(1)
            .mount(&server)
            .await;
        server
    }

    /// Poll the channel the way the event loop does until the request lands
    async fn wait_for_login(app: &mut App) {
        for _ in 0..250 {
            app.check_background_tasks();
            if !app.login.is_submitting() {
                return;
            }
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
        panic!("login did not finish");
    }

    #[tokio::test]
    async fn test_background_login_signs_in_and_remembers_email() {
        let server = auth_server("tok123").await;
        let dir = tempfile::tempdir().unwrap();
        let config_file = dir.path().join("config.json");
        let config = Config {
            base_url: server.uri(),
            ..Config::default()
        };
        let mut app = App::new(config, Some(config_file.clone())).unwrap();

        app.login.email = "ada@example.com".to_string();
        app.login.password = "secret".to_string();
        app.submit_login();
        assert!(app.login.is_submitting());
        assert_eq!(app.status_message.as_deref(), Some("Signing in..."));

        wait_for_login(&mut app).await;

        assert_eq!(app.router.current().path, "/");
        assert!(!app.router.can_go_back());
        assert_eq!(app.status_message.as_deref(), Some("Signed in as ada@example.com"));
        assert_eq!(app.session.read().token(), Some("tok123"));
        assert_eq!(app.login.email, "");
        assert_eq!(app.login.password, "");
        assert_eq!(app.login_focus, LoginFocus::Email);

        let saved = Config::load_from(&config_file).unwrap();
        assert_eq!(saved.last_email.as_deref(), Some("ada@example.com"));
        assert_eq!(saved.base_url, server.uri());
    }

    #[tokio::test]
    async fn test_background_login_failure_shows_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/auth"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;
        let dir = tempfile::tempdir().unwrap();
        let config_file = dir.path().join("config.json");
        let config = Config {
            base_url: server.uri(),
            ..Config::default()
        };
        let mut app = App::new(config, Some(config_file.clone())).unwrap();

        app.login.email = "ada@example.com".to_string();
        app.login.password = "wrong".to_string();
        app.submit_login();
        wait_for_login(&mut app).await;

        assert_eq!(app.login.error(), Some(LoginError::Unauthorized));
        assert_eq!(app.status_message, None);
        assert_eq!(app.current_view(), Some(Route::Login));
        assert!(!app.session.is_authenticated());
        assert!(!config_file.exists());
    }

    #[tokio::test]
    async fn test_unreadable_config_is_not_overwritten() {
        let server = auth_server("tok").await;
        let dir = tempfile::tempdir().unwrap();
        let config_file = dir.path().join("config.json");
        std::fs::write(&config_file, "{ not json").unwrap();

        let (config, config_path) = load_config(
            Some(config_file.clone()),
            EnvOverrides::new(Some(server.uri()), None),
        );
        assert_eq!(config_path, None);
        assert_eq!(config.effective_base_url(), server.uri());

        let mut app = App::new(config, config_path).unwrap();
        app.login.email = "ada@example.com".to_string();
        app.login.password = "secret".to_string();
        app.submit_login();
        wait_for_login(&mut app).await;

        assert!(app.session.is_authenticated());
        assert_eq!(app.config.last_email.as_deref(), Some("ada@example.com"));
        assert_eq!(std::fs::read_to_string(&config_file).unwrap(), "{ not json");
    }

    #[test]
    fn test_load_config_keeps_path_for_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let config_file = dir.path().join("config.json");

        let (config, config_path) = load_config(Some(config_file.clone()), EnvOverrides::default());

        assert_eq!(config, Config::default());
        assert_eq!(config_path, Some(config_file));
    }

    #[test]
    fn test_env_email_prefills_form() {
        let config = Config {
            last_email: Some("ada@example.com".to_string()),
            ..Config::default()
        }
        .with_overrides(EnvOverrides::new(None, Some("grace@example.com".to_string())));
        let app = App::new(config, None).unwrap();
        assert_eq!(app.login.email, "grace@example.com");
        assert_eq!(app.config.last_email.as_deref(), Some("ada@example.com"));
    }
}

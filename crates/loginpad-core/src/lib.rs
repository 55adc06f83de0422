//! Core library for loginpad.
//!
//! - `auth`: Session record, the shared `SessionStore`, login credentials
//! - `api`: HTTP client for the authentication endpoint
//! - `login`: Login form state machine and the submit flow
//! - `router`: Path to view mapping with browser-style history
//! - `config`: Configuration file and environment overrides

pub mod api;
pub mod auth;
pub mod config;
pub mod login;
pub mod router;

pub use api::{AuthClient, LoginError};
pub use auth::{Credentials, FieldErrors, Session, SessionStore};
pub use config::{Config, EnvOverrides};
pub use login::{LoginFlow, LoginForm, LoginOutcome, LoginState, SubmitBlocked};
pub use router::{Location, LocationState, NavigateOptions, Route, Router};

//! Authentication state and login credentials.
//!
//! This module provides:
//! - `Session`: The in-memory authentication record (user, token)
//! - `SessionStore`: Shared handle to the session, passed to every component
//! - `Credentials`: Form input for one login attempt, with format validation
//!
//! Sessions live only for the lifetime of the process; nothing is written to disk.

pub mod credentials;
pub mod session;

pub use credentials::{Credentials, FieldErrors};
pub use session::{Session, SessionStore};

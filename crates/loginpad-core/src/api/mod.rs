//! REST client module for the authentication service.
//!
//! This module provides the `AuthClient` for posting credentials to the
//! login endpoint, and `LoginError` for the ways a login can fail.

pub mod client;
pub mod error;

pub use client::AuthClient;
pub use error::LoginError;

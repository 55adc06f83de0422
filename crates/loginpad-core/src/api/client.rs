//! HTTP client for the authentication endpoint.
//!
//! This module provides the `AuthClient` struct which posts credentials to
//! `{base_url}/auth` and turns the reply into an access token or a
//! [`LoginError`].

use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::{header, Client};
use serde::Deserialize;
use tracing::{debug, warn};

use crate::auth::Credentials;

use super::LoginError;

// ============================================================================
// Constants
// ============================================================================

/// Path of the login endpoint, relative to the configured base URL
const LOGIN_PATH: &str = "/auth";

#[derive(Debug, Deserialize)]
struct AuthResponse {
    #[serde(rename = "accessToken")]
    access_token: Option<String>,
}

/// Client for the authentication service.
/// Clone is cheap - reqwest::Client uses Arc internally for connection pooling.
#[derive(Clone)]
pub struct AuthClient {
    client: Client,
    base_url: String,
}

impl AuthClient {
    /// Create a client for `base_url`.
    ///
    /// Cookies set by the server are kept for the life of the client so later
    /// requests go out credentialed. `timeout` of `None` keeps the transport
    /// default.
    pub fn new(base_url: &str, timeout: Option<Duration>) -> Result<Self> {
        let mut builder = Client::builder().cookie_store(true);
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn login_url(&self) -> String {
        format!("{}{}", self.base_url, LOGIN_PATH)
    }

    /// Post the credentials and return the access token on success
    pub async fn login(&self, credentials: &Credentials) -> Result<String, LoginError> {
        let url = self.login_url();
        debug!(%url, email = %credentials.email, "Sending login request");

        let response = self
            .client
            .post(&url)
            .header(header::ACCEPT, "application/json")
            .json(credentials)
            .send()
            .await
            .map_err(|e| {
                warn!(error = %e, "Login request got no response");
                LoginError::from_transport(&e)
            })?;

        let status = response.status();
        if !status.is_success() {
            debug!(%status, "Login rejected");
            return Err(LoginError::from_status(status));
        }

        let auth: AuthResponse = response.json().await.map_err(|e| {
            warn!(error = %e, "Failed to parse login response");
            LoginError::Unknown
        })?;

        match auth.access_token {
            Some(token) => {
                debug!(%status, "Login accepted");
                Ok(token)
            }
            None => {
                warn!("Login response has no accessToken");
                Err(LoginError::Unknown)
            }
        }
    }
}

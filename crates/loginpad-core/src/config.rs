//! Application configuration management.
//!
//! This module handles loading and saving the application configuration,
//! which includes the auth service URL, the starting path, whether `/home`
//! is guarded, and the last email used to sign in.
//!
//! Configuration is stored at `~/.config/loginpad/config.json`.
//! `LOGINPAD_BASE_URL` and `LOGINPAD_EMAIL` override the file when set.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Application name used for config/cache directory paths
const APP_NAME: &str = "loginpad";

/// Config file name
const CONFIG_FILE: &str = "config.json";

/// Auth service used when nothing is configured
pub const DEFAULT_BASE_URL: &str = "http://localhost:3500";

pub const BASE_URL_ENV: &str = "LOGINPAD_BASE_URL";
pub const EMAIL_ENV: &str = "LOGINPAD_EMAIL";

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_initial_path() -> String {
    crate::router::LOGIN_PATH.to_string()
}

/// Values taken from the environment for this run only. Never saved.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvOverrides {
    pub base_url: Option<String>,
    pub email: Option<String>,
}

impl EnvOverrides {
    pub fn from_env() -> Self {
        Self::new(std::env::var(BASE_URL_ENV).ok(), std::env::var(EMAIL_ENV).ok())
    }

    /// Empty values count as unset
    pub fn new(base_url: Option<String>, email: Option<String>) -> Self {
        Self {
            base_url: base_url.filter(|u| !u.is_empty()),
            email: email.filter(|e| !e.is_empty()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_initial_path")]
    pub initial_path: String,
    /// Send unauthenticated visits to `/home` back to `/login`
    #[serde(default)]
    pub guard_home: bool,
    /// HTTP timeout; unset keeps the transport default
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,
    #[serde(default)]
    pub last_email: Option<String>,
    #[serde(skip)]
    pub overrides: EnvOverrides,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            initial_path: default_initial_path(),
            guard_home: false,
            request_timeout_secs: None,
            last_email: None,
            overrides: EnvOverrides::default(),
        }
    }
}

impl Config {
    /// Load from the default location, then pick up environment overrides
    pub fn load() -> Result<Self> {
        Ok(Self::load_from(&Self::default_path()?)?.with_overrides(EnvOverrides::from_env()))
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let contents = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file {}", path.display()))?;
            serde_json::from_str(&contents).context("Failed to parse config file")
        } else {
            Ok(Self::default())
        }
    }

    pub fn with_overrides(mut self, overrides: EnvOverrides) -> Self {
        self.overrides = overrides;
        self
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::default_path()?)
    }

    /// Write the file-backed settings. Environment overrides are not written.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(path, contents)
            .with_context(|| format!("Failed to write config file {}", path.display()))?;
        Ok(())
    }

    /// Auth service for this run: `LOGINPAD_BASE_URL` wins over the file
    pub fn effective_base_url(&self) -> &str {
        self.overrides.base_url.as_deref().unwrap_or(&self.base_url)
    }

    /// Email to prefill the form with: `LOGINPAD_EMAIL`, else the last one used
    pub fn prefill_email(&self) -> Option<&str> {
        self.overrides.email.as_deref().or(self.last_email.as_deref())
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }

    pub fn default_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?;
        Ok(config_dir.join(APP_NAME).join(CONFIG_FILE))
    }

    /// Directory for log files
    pub fn cache_dir(&self) -> Result<PathBuf> {
        let cache_dir = dirs::cache_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find cache directory"))?;
        Ok(cache_dir.join(APP_NAME))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_from(&dir.path().join("config.json")).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.initial_path, "/login");
        assert!(!config.guard_home);
        assert_eq!(config.request_timeout(), None);
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.json");
        let config = Config {
            base_url: "https://auth.example.com".to_string(),
            guard_home: true,
            request_timeout_secs: Some(5),
            last_email: Some("ada@example.com".to_string()),
            ..Config::default()
        };

        config.save_to(&path).unwrap();
        let loaded = Config::load_from(&path).unwrap();

        assert_eq!(loaded, config);
        assert_eq!(loaded.request_timeout(), Some(Duration::from_secs(5)));
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"guard_home": true}"#).unwrap();

        let config = Config::load_from(&path).unwrap();
        assert!(config.guard_home);
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
    }

    #[test]
    fn test_overrides_ignore_empty_values() {
        let config = Config::default().with_overrides(EnvOverrides::new(
            Some(String::new()),
            Some("grace@example.com".to_string()),
        ));
        assert_eq!(config.effective_base_url(), DEFAULT_BASE_URL);
        assert_eq!(config.prefill_email(), Some("grace@example.com"));

        let config = config.with_overrides(EnvOverrides::new(Some("http://10.0.0.2:9000".to_string()), None));
        assert_eq!(config.effective_base_url(), "http://10.0.0.2:9000");
        assert_eq!(config.prefill_email(), None);
    }

    #[test]
    fn test_prefill_falls_back_to_last_email() {
        let config = Config {
            last_email: Some("ada@example.com".to_string()),
            ..Config::default()
        };
        assert_eq!(config.prefill_email(), Some("ada@example.com"));
    }

    #[test]
    fn test_overrides_are_not_saved() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        let mut config = Config::default().with_overrides(EnvOverrides::new(
            Some("http://env-only:9999".to_string()),
            Some("env@example.com".to_string()),
        ));
        config.last_email = Some("ada@example.com".to_string());

        config.save_to(&path).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        assert!(!contents.contains("env-only"));
        assert!(!contents.contains("env@example.com"));
        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.effective_base_url(), DEFAULT_BASE_URL);
        assert_eq!(loaded.prefill_email(), Some("ada@example.com"));
    }

    // Only this test touches the process environment
    #[cfg(target_os = "linux")]
    #[test]
    fn test_env_override_does_not_persist_through_default_path() {
        let dir = tempfile::tempdir().unwrap();
        std::env::set_var("XDG_CONFIG_HOME", dir.path());
        std::env::set_var(BASE_URL_ENV, "http://env-only:9999");

        let mut config = Config::load().unwrap();
        assert_eq!(config.effective_base_url(), "http://env-only:9999");
        config.last_email = Some("ada@example.com".to_string());
        config.save().unwrap();
        let saved = dir.path().join(APP_NAME).join(CONFIG_FILE);
        assert!(!std::fs::read_to_string(&saved).unwrap().contains("env-only"));

        std::env::remove_var(BASE_URL_ENV);
        let reloaded = Config::load().unwrap();
        std::env::remove_var("XDG_CONFIG_HOME");

        assert_eq!(reloaded.base_url, DEFAULT_BASE_URL);
        assert_eq!(reloaded.effective_base_url(), DEFAULT_BASE_URL);
        assert_eq!(reloaded.last_email.as_deref(), Some("ada@example.com"));
    }
}

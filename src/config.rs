//! Client configuration resolved once at startup.
//!
//! The binary's argument parser reads `TODO_ENV`, `TODO_API_URL` and the
//! timeout variables; this module turns those values into an `ApiConfig`.
//! Nothing downstream re-reads the environment.

use std::path::PathBuf;
use std::str::FromStr;

pub const DEFAULT_DEVELOPMENT_BASE_URL: &str = "http://localhost:8000";
pub const DEFAULT_PRODUCTION_BASE_URL: &str = "http://localhost/api";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;

const PREFS_FILE_NAME: &str = "preferences.json";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("unknown TODO_ENV '{0}' (expected 'development' or 'production')")]
    UnknownEnvironment(String),
    #[error("base URL must start with http:// or https:// (got '{0}')")]
    InvalidBaseUrl(String),
}

/// Deployment environment the client runs against.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Environment {
    #[default]
    Development,
    Production,
}

impl Environment {
    #[must_use]
    pub fn default_base_url(self) -> &'static str {
        match self {
            Self::Development => DEFAULT_DEVELOPMENT_BASE_URL,
            Self::Production => DEFAULT_PRODUCTION_BASE_URL,
        }
    }
}

impl FromStr for Environment {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "development" | "dev" | "local" => Ok(Self::Development),
            "production" | "prod" => Ok(Self::Production),
            other => Err(ConfigError::UnknownEnvironment(other.to_owned())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timeouts {
    pub request_secs: u64,
    pub connect_secs: u64,
}

impl Default for Timeouts {
    fn default() -> Self {
        Self { request_secs: DEFAULT_REQUEST_TIMEOUT_SECS, connect_secs: DEFAULT_CONNECT_TIMEOUT_SECS }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    pub base_url: String,
    pub timeouts: Timeouts,
}

impl ApiConfig {
    /// Resolve the base URL: an explicit override wins, otherwise the
    /// environment's default.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidBaseUrl`] when the URL has no HTTP scheme.
    pub fn resolve(environment: Environment, base_url: Option<&str>, timeouts: Timeouts) -> Result<Self, ConfigError> {
        let base_url = base_url
            .map(str::trim)
            .filter(|url| !url.is_empty())
            .unwrap_or(environment.default_base_url())
            .trim_end_matches('/')
            .to_string();
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(ConfigError::InvalidBaseUrl(base_url));
        }
        Ok(Self { base_url, timeouts })
    }
}

/// Default location of the preferences file: `TODO_PREFS_PATH`, else
/// `$HOME/.config/todo-sync/preferences.json`, else the working directory.
#[must_use]
pub fn default_prefs_path() -> PathBuf {
    prefs_path_from_lookup(|key| std::env::var(key).ok())
}

fn prefs_path_from_lookup(lookup: impl Fn(&str) -> Option<String>) -> PathBuf {
    if let Some(path) = lookup("TODO_PREFS_PATH").filter(|p| !p.trim().is_empty()) {
        return PathBuf::from(path);
    }
    match lookup("HOME").filter(|h| !h.trim().is_empty()) {
        Some(home) => PathBuf::from(home).join(".config").join("todo-sync").join(PREFS_FILE_NAME),
        None => PathBuf::from(PREFS_FILE_NAME),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;

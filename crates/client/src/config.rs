//! Client configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `TOOLCRIB_API_URL` - Base URL of the equipment backend (e.g.,
//!   `https://toolcrib.internal/api`)
//!
//! ## Optional
//! - `TOOLCRIB_STATE_DIR` - Directory for durable client state
//!   (default: `.toolcrib` under the home directory, else the working
//!   directory)
//! - `TOOLCRIB_HTTP_TIMEOUT_SECS` - Request timeout in seconds (default: 30)

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;
use url::Url;

const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;
const STATE_DIR_NAME: &str = ".toolcrib";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Client configuration.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the equipment backend.
    pub api_url: Url,
    /// Directory holding the durable state blobs.
    pub state_dir: PathBuf,
    /// Timeout applied to every outbound request.
    pub http_timeout: Duration,
}

impl ClientConfig {
    /// Build a configuration directly, bypassing the environment.
    ///
    /// Used by tests and by callers that already resolved their settings.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidEnvVar` if `api_url` is not a valid URL
    /// with a host.
    pub fn new(api_url: &str, state_dir: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        Ok(Self {
            api_url: parse_api_url(api_url)?,
            state_dir: state_dir.into(),
            http_timeout: Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS),
        })
    }

    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let api_url = parse_api_url(&get_required_env("TOOLCRIB_API_URL")?)?;

        let state_dir = std::env::var("TOOLCRIB_STATE_DIR")
            .map_or_else(|_| default_state_dir(), PathBuf::from);

        let timeout_secs = match std::env::var("TOOLCRIB_HTTP_TIMEOUT_SECS") {
            Ok(raw) => raw.parse::<u64>().map_err(|e| {
                ConfigError::InvalidEnvVar("TOOLCRIB_HTTP_TIMEOUT_SECS".to_owned(), e.to_string())
            })?,
            Err(_) => DEFAULT_HTTP_TIMEOUT_SECS,
        };

        Ok(Self {
            api_url,
            state_dir,
            http_timeout: Duration::from_secs(timeout_secs),
        })
    }
}

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_owned()))
}

/// Parse and validate the backend base URL.
fn parse_api_url(raw: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(raw)
        .map_err(|e| ConfigError::InvalidEnvVar("TOOLCRIB_API_URL".to_owned(), e.to_string()))?;

    if url.host_str().is_none() {
        return Err(ConfigError::InvalidEnvVar(
            "TOOLCRIB_API_URL".to_owned(),
            "URL must have a host".to_owned(),
        ));
    }

    Ok(url)
}

/// Default state directory: `.toolcrib` under the home directory when one is
/// set, else under the working directory.
fn default_state_dir() -> PathBuf {
    std::env::var("HOME").map_or_else(
        |_| PathBuf::from(STATE_DIR_NAME),
        |home| PathBuf::from(home).join(STATE_DIR_NAME),
    )
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_api_url_valid() {
        let url = parse_api_url("https://toolcrib.internal/api").unwrap();
        assert_eq!(url.host_str(), Some("toolcrib.internal"));
    }

    #[test]
    fn test_parse_api_url_rejects_garbage() {
        assert!(matches!(
            parse_api_url("not a url"),
            Err(ConfigError::InvalidEnvVar(_, _))
        ));
    }

    #[test]
    fn test_parse_api_url_rejects_hostless() {
        assert!(matches!(
            parse_api_url("file:///tmp/api"),
            Err(ConfigError::InvalidEnvVar(_, _))
        ));
    }

    #[test]
    fn test_new_uses_default_timeout() {
        let config = ClientConfig::new("http://localhost:8080/api", "/tmp/state").unwrap();
        assert_eq!(config.http_timeout, Duration::from_secs(30));
        assert_eq!(config.state_dir, PathBuf::from("/tmp/state"));
    }
}

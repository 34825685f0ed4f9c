//! Runtime configuration for the live API client.
//!
//! Values come either from code or from the environment (the `feed_probe`
//! binary loads a `.env` file first via dotenvy):
//!
//! - `GATHERLY_API_URL`: base URL of the events backend (required)
//! - `GATHERLY_API_TOKEN`: optional bearer token
//! - `GATHERLY_HTTP_TIMEOUT_MS`: per-request timeout, default 10000

use std::time::Duration;

use thiserror::Error;

const DEFAULT_TIMEOUT: Duration = Duration::from_millis(10_000);

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing environment variable {0}")]
    MissingVar(&'static str),
    #[error("invalid value for {name}: {message}")]
    Invalid { name: &'static str, message: String },
}

#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub base_url: String,
    pub auth_token: Option<String>,
    pub timeout: Duration,
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            auth_token: None,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_auth_token(mut self, token: impl Into<String>) -> Self {
        self.auth_token = Some(token.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Read the configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        let base_url =
            std::env::var("GATHERLY_API_URL").map_err(|_| ConfigError::MissingVar("GATHERLY_API_URL"))?;
        let auth_token = std::env::var("GATHERLY_API_TOKEN").ok().filter(|t| !t.is_empty());

        let timeout = match std::env::var("GATHERLY_HTTP_TIMEOUT_MS") {
            Ok(raw) => {
                let millis: u64 = raw.parse().map_err(|_| ConfigError::Invalid {
                    name: "GATHERLY_HTTP_TIMEOUT_MS",
                    message: format!("expected milliseconds, got '{raw}'"),
                })?;
                Duration::from_millis(millis)
            }
            Err(_) => DEFAULT_TIMEOUT,
        };

        Ok(Self {
            base_url,
            auth_token,
            timeout,
        })
    }
}

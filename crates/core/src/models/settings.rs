use serde::{Deserialize, Serialize};

use crate::errors::CoreError;

pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Connection settings for the Carteira API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiSettings {
    /// Base URL without trailing slash (e.g., "https://api.example.com").
    pub base_url: String,

    /// Bearer token attached to every request, if any.
    /// The host reads it from wherever it keeps the session (cookie, keychain).
    #[serde(default)]
    pub token: Option<String>,

    /// Request timeout in seconds (ignored on wasm32).
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

fn default_timeout() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

impl ApiSettings {
    /// Read settings from `CARTEIRA_API_URL`, `CARTEIRA_API_TOKEN`
    /// and `CARTEIRA_API_TIMEOUT_SECS`, falling back to defaults.
    pub fn from_env() -> Result<Self, CoreError> {
        let defaults = Self::default();
        let timeout_secs = match std::env::var("CARTEIRA_API_TIMEOUT_SECS") {
            Ok(raw) => raw.trim().parse().map_err(|_| {
                CoreError::Config(format!("CARTEIRA_API_TIMEOUT_SECS is not a number: '{raw}'"))
            })?,
            Err(_) => defaults.timeout_secs,
        };

        Ok(Self {
            base_url: std::env::var("CARTEIRA_API_URL").unwrap_or(defaults.base_url),
            token: std::env::var("CARTEIRA_API_TOKEN")
                .ok()
                .filter(|t| !t.trim().is_empty()),
            timeout_secs,
        })
    }

    /// Builder-style token setter.
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            token: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

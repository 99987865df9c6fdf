/// Configuration for the HotTake API client
///
/// Loads configuration from environment variables.
use std::time::Duration;

use resilience::TimeoutConfig;

use crate::error::{ApiError, Result};

pub const BASE_URL_ENV: &str = "HOTTAKE_API_BASE_URL";
pub const REQUEST_TIMEOUT_ENV: &str = "HOTTAKE_REQUEST_TIMEOUT_MS";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    /// Base URL of the API, without trailing slash
    pub base_url: String,
    /// Deadline applied to every request
    pub request_timeout: TimeoutConfig,
}

impl ApiConfig {
    pub fn new(base_url: &str) -> Result<Self> {
        let base_url = base_url.trim().trim_end_matches('/');
        if base_url.is_empty() {
            return Err(ApiError::Config("API base URL is empty".to_string()));
        }
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(ApiError::Config(format!(
                "API base URL must be http(s): {}",
                base_url
            )));
        }

        Ok(Self {
            base_url: base_url.to_string(),
            request_timeout: TimeoutConfig::default(),
        })
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = TimeoutConfig { duration: timeout };
        self
    }

    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        let base_url = std::env::var(BASE_URL_ENV)
            .map_err(|_| ApiError::Config(format!("{} environment variable not set", BASE_URL_ENV)))?;

        let request_timeout = std::env::var(REQUEST_TIMEOUT_ENV)
            .ok()
            .and_then(|s| s.parse().ok())
            .map(TimeoutConfig::from_millis)
            .unwrap_or_default();

        let mut config = Self::new(&base_url)?;
        config.request_timeout = request_timeout;
        Ok(config)
    }

    pub(crate) fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

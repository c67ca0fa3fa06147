use std::time::Duration;

use reqwest::Url;
use sinker_client::ClientConfig;

use crate::error::ConfigError;

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:2112";
pub const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 10_000;
pub const DEFAULT_STATUS_INTERVAL_MS: u64 = 5_000;
pub const DEFAULT_OVERVIEW_INTERVAL_MS: u64 = 30_000;

#[derive(Debug, Clone)]
pub struct ConsoleConfig {
    pub base_url: String,
    pub request_timeout_ms: u64,
    /// Period of the per-task status poll while a task is open.
    pub status_interval_ms: u64,
    /// Period of the process-info refresh on the overview tab.
    pub overview_interval_ms: u64,
}

impl ConsoleConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let url = Url::parse(&self.base_url).map_err(|e| ConfigError::InvalidBaseUrl {
            url: self.base_url.clone(),
            reason: e.to_string(),
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ConfigError::InvalidBaseUrl {
                url: self.base_url.clone(),
                reason: format!("unsupported scheme {}", url.scheme()),
            });
        }
        if self.request_timeout_ms == 0 {
            return Err(ConfigError::ZeroDuration("request_timeout_ms"));
        }
        if self.status_interval_ms == 0 {
            return Err(ConfigError::ZeroDuration("status_interval_ms"));
        }
        if self.overview_interval_ms == 0 {
            return Err(ConfigError::ZeroDuration("overview_interval_ms"));
        }
        Ok(())
    }

    pub fn client(&self) -> ClientConfig {
        ClientConfig {
            base_url: self.base_url.clone(),
            timeout_ms: self.request_timeout_ms,
        }
    }

    pub fn status_interval(&self) -> Duration {
        Duration::from_millis(self.status_interval_ms)
    }

    pub fn overview_interval(&self) -> Duration {
        Duration::from_millis(self.overview_interval_ms)
    }
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            request_timeout_ms: DEFAULT_REQUEST_TIMEOUT_MS,
            status_interval_ms: DEFAULT_STATUS_INTERVAL_MS,
            overview_interval_ms: DEFAULT_OVERVIEW_INTERVAL_MS,
        }
    }
}

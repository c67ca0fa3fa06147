use std::time::Duration;

#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Sinker HTTP root, e.g. `http://127.0.0.1:2112`.
    pub base_url: String,
    pub timeout_ms: u64,
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:2112".to_string(),
            timeout_ms: 10_000,
        }
    }
}

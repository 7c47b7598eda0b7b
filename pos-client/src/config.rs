//! Client configuration

use std::time::Duration;

/// Client configuration for connecting to the POS server
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Server base URL (e.g., "http://localhost:3000")
    pub base_url: String,

    /// JWT token for authentication
    pub token: Option<String>,

    /// Request timeout in seconds
    pub timeout: u64,

    /// Kitchen display refresh interval; `None` follows the server's advertised value
    pub kitchen_poll_interval: Option<Duration>,
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            token: None,
            timeout: 30,
            kitchen_poll_interval: None,
        }
    }

    /// Set the JWT token
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Set the request timeout
    pub fn with_timeout(mut self, seconds: u64) -> Self {
        self.timeout = seconds;
        self
    }

    /// Pin the kitchen refresh interval
    pub fn with_kitchen_poll_interval(mut self, interval: Duration) -> Self {
        self.kitchen_poll_interval = Some(interval);
        self
    }

    /// Create an HTTP client from this configuration
    pub fn build_client(&self) -> crate::ClientResult<crate::PosClient> {
        crate::PosClient::new(self)
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new("http://localhost:3000")
    }
}

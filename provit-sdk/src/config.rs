//! Client configuration
//!
//! The SDK is configured programmatically by the host application; there is
//! no config file. Only `api_key` is required, everything else has a
//! production default.

use std::time::Duration;

use crate::error::{Error, Result};

/// Default collector base URL
pub const DEFAULT_API_URL: &str = "https://api.provit.ai";

/// Events endpoint path, appended to the base URL
pub const EVENTS_PATH: &str = "/v1/events";

/// Hard per-request timeout covering connection + response
pub const TRANSMIT_TIMEOUT: Duration = Duration::from_secs(2);

/// Default bound on the shutdown drain
pub const DEFAULT_DRAIN_TIMEOUT: Duration = Duration::from_secs(5);

/// User-Agent sent with every event
pub fn user_agent() -> String {
    format!("provit-sdk-rust/{}", env!("CARGO_PKG_VERSION"))
}

/// Configuration for a [`ProvitClient`](crate::ProvitClient)
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// API key for Bearer authentication (required)
    pub api_key: String,

    /// Collector base URL
    pub api_url: String,

    /// When true, encoding and transmission failures are logged via
    /// `tracing`; when false (the default) they are fully silent
    pub debug: bool,

    /// When true (the default), labels are lower-cased and trimmed
    /// before transmission
    pub normalize_labels: bool,

    /// Bound on how long `shutdown()` / `Drop` waits for pending events
    pub drain_timeout: Duration,
}

impl ClientConfig {
    /// Create a configuration with the given API key and default settings
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            api_url: DEFAULT_API_URL.to_string(),
            debug: false,
            normalize_labels: true,
            drain_timeout: DEFAULT_DRAIN_TIMEOUT,
        }
    }

    /// Point the client at a different collector
    pub fn api_url(mut self, url: impl Into<String>) -> Self {
        self.api_url = url.into();
        self
    }

    /// Enable or disable diagnostic logging of dropped events
    pub fn debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    /// Enable or disable label normalization (lowercase + trim)
    pub fn normalize_labels(mut self, normalize: bool) -> Self {
        self.normalize_labels = normalize;
        self
    }

    /// Override the shutdown drain bound
    pub fn drain_timeout(mut self, timeout: Duration) -> Self {
        self.drain_timeout = timeout;
        self
    }

    /// Full events endpoint URL, with trailing slashes on the base trimmed
    pub fn endpoint(&self) -> String {
        format!("{}{}", self.api_url.trim_end_matches('/'), EVENTS_PATH)
    }

    /// Validate configuration, returning an error message if invalid
    pub fn validate(&self) -> Result<()> {
        if self.api_key.is_empty() {
            return Err(Error::Config("api_key is required".to_string()));
        }
        if self.api_url.is_empty() {
            return Err(Error::Config("api_url must not be empty".to_string()));
        }
        Ok(())
    }
}

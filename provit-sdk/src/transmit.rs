//! HTTP transmission to the ProVit collector
//!
//! One event, one POST, one attempt. Every request carries the same headers
//! (installed once on the underlying client) and is bounded by a hard
//! 2-second timeout covering connection and response. Failures of any kind
//! become [`Error::Transport`] for the worker to swallow; nothing here
//! retries or propagates to the host.

use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE, USER_AGENT};

use crate::config::{self, ClientConfig};
use crate::error::{Error, Result};
use crate::event::DecisionEvent;

/// HTTP transmitter for decision events
#[derive(Debug)]
pub(crate) struct Transmitter {
    http_client: reqwest::Client,
    endpoint: String,
}

impl Transmitter {
    /// Build a transmitter from client configuration.
    ///
    /// Returns an error if the API key contains bytes unusable in an HTTP
    /// header or the HTTP client cannot be constructed.
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let auth_value = format!("Bearer {}", config.api_key);
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&auth_value)
                .map_err(|e| Error::Config(format!("invalid api_key: {}", e)))?,
        );

        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(&config::user_agent())
                .map_err(|e| Error::Config(format!("invalid user agent: {}", e)))?,
        );

        let http_client = reqwest::Client::builder()
            .timeout(config::TRANSMIT_TIMEOUT)
            .default_headers(headers)
            .build()
            .map_err(|e| Error::Config(format!("failed to create HTTP client: {}", e)))?;

        Ok(Self {
            http_client,
            endpoint: config.endpoint(),
        })
    }

    /// POST one event to the collector.
    ///
    /// Reads and discards the response body so the connection is released
    /// cleanly. Any 2xx is success; everything else (including connect
    /// errors, DNS failures, and timeouts) is [`Error::Transport`].
    pub async fn send(&self, event: &DecisionEvent) -> Result<()> {
        let response = self
            .http_client
            .post(&self.endpoint)
            .json(event)
            .send()
            .await
            .map_err(|e| Error::Transport(format!("HTTP request failed: {}", e)))?;

        let status = response.status();

        // Drain the body regardless of status; the content is not inspected
        let _ = response.bytes().await;

        if status.is_success() {
            Ok(())
        } else {
            Err(Error::Transport(format!(
                "collector returned {}",
                status
            )))
        }
    }

    #[cfg(test)]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

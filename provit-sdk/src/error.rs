//! Error types for provit-sdk
//!
//! These errors stay inside the SDK: `capture()` never surfaces any of them
//! to the host application. They exist so the internal components can report
//! failure precisely and the facade can decide to drop-and-optionally-log.

use thiserror::Error;

/// Main error type for the provit-sdk library
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration error (bad URL, unusable API key, missing field)
    #[error("configuration error: {0}")]
    Config(String),

    /// Event could not be encoded (non-numeric confidence score)
    #[error("encode error: {0}")]
    Encode(String),

    /// Transmission failure (connect, DNS, timeout, non-2xx status)
    #[error("transport error: {0}")]
    Transport(String),
}

/// Result type alias for provit-sdk
pub type Result<T> = std::result::Result<T, Error>;

//! # provit-sdk
//!
//! ProVit AI Runtime SDK - fire-and-forget evidence capture for AI decisions.
//!
//! Host applications that make automated decisions call
//! [`ProvitClient::capture`] to record a decision event. The call returns in
//! microseconds; a background worker owned by the client transmits the event
//! to the ProVit collector over HTTP. The SDK never blocks, slows, or
//! crashes the host: encoding and network failures are absorbed internally
//! and surface only as optional diagnostic logs.
//!
//! ## Delivery model
//!
//! - `capture()` encodes the event and pushes it to an unbounded in-process
//!   queue; this is the entire synchronous cost.
//! - A single background worker drains the queue in FIFO order and POSTs
//!   each event once, with a hard 2-second timeout. No retries, no
//!   persistence, no batching.
//! - Dropping the client (or calling [`ProvitClient::shutdown`]) drains
//!   pending events, bounded by a timeout; whatever is left is abandoned.
//!
//! ## Example
//!
//! ```rust,no_run
//! use provit_sdk::{ClientConfig, ProvitClient};
//!
//! let client = ProvitClient::new(
//!     ClientConfig::new("pv_live_xxx").debug(true),
//! )?;
//!
//! // ... AI inference happens here ...
//! client.capture("txn-1042", "fraud-detector", "v2.3.1", "legitimate", 0.985);
//!
//! // At orderly exit, flush what's still pending
//! client.shutdown();
//! # Ok::<(), provit_sdk::Error>(())
//! ```

// Re-export commonly used items at the crate root
pub use client::ProvitClient;
pub use config::ClientConfig;
pub use error::{Error, Result};
pub use event::{DecisionEvent, ScoreValue, EVENT_TYPE};

// Public modules
pub mod client;
pub mod config;
pub mod error;
pub mod event;

// Internal delivery machinery
mod queue;
mod transmit;
mod worker;

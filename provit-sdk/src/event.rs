//! Decision event encoding
//!
//! Builds the canonical wire representation of one captured AI decision.
//! The contract here is coercion, not validation: any printable label
//! becomes a string, and any numeric-ish confidence value becomes an `f64`.
//! The single thing that can fail is a confidence value that does not parse
//! as a number, in which case the event is dropped before it ever reaches
//! the delivery queue.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{Error, Result};

/// Schema tag carried by every event
pub const EVENT_TYPE: &str = "ai.runtime";

/// One captured AI decision, immutable once constructed.
///
/// `event_id` and `timestamp` are always generated at encode time and never
/// supplied by the caller. This struct matches the schema expected by the
/// collector's `/v1/events` API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecisionEvent {
    /// Unique ID for this specific evidence event
    pub event_id: String,

    /// Schema tag, always [`EVENT_TYPE`]
    pub event_type: String,

    /// Caller-supplied business decision ID (free-form, not validated)
    pub decision_id: String,

    /// Capture instant, UTC (serialized as RFC3339 with `Z` suffix)
    pub timestamp: DateTime<Utc>,

    /// Informational SDK/runtime identification
    pub meta: SdkMeta,

    /// The decision itself
    pub payload: EventPayload,
}

/// Informational metadata attached to every event
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SdkMeta {
    /// SDK crate version
    pub sdk_version: String,
    /// Source runtime identifier
    pub language: String,
    /// Source runtime version
    pub runtime_version: String,
}

impl SdkMeta {
    fn current() -> Self {
        Self {
            sdk_version: env!("CARGO_PKG_VERSION").to_string(),
            language: "rust".to_string(),
            runtime_version: env!("CARGO_PKG_RUST_VERSION").to_string(),
        }
    }
}

/// Type-specific payload for `ai.runtime` events
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventPayload {
    /// The model that made the decision, stored verbatim
    pub model: ModelInfo,
    /// The model's output
    pub recommendation: Recommendation,
}

/// Identifies the decision-making model
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelInfo {
    pub name: String,
    pub version: String,
}

/// The model's recommendation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recommendation {
    /// Output label (e.g. "approve", "fraud"), coerced to a string
    pub label: String,
    /// Model confidence, coerced to a number; out-of-range values are
    /// passed through unchanged (range enforcement is collector-side)
    pub confidence_score: f64,
}

/// Confidence input accepted by [`capture`](crate::ProvitClient::capture).
///
/// Converts from floats, integers, and strings. Strings are parsed at encode
/// time; a non-numeric string is the one input that fails a capture.
#[derive(Debug, Clone)]
pub enum ScoreValue {
    Number(f64),
    Text(String),
}

impl ScoreValue {
    /// Coerce to a float, or fail with [`Error::Encode`]
    pub fn to_f64(&self) -> Result<f64> {
        match self {
            ScoreValue::Number(n) => Ok(*n),
            ScoreValue::Text(s) => s
                .trim()
                .parse::<f64>()
                .map_err(|_| Error::Encode(format!("confidence score is not numeric: {:?}", s))),
        }
    }
}

impl From<f64> for ScoreValue {
    fn from(v: f64) -> Self {
        ScoreValue::Number(v)
    }
}

impl From<f32> for ScoreValue {
    fn from(v: f32) -> Self {
        ScoreValue::Number(v as f64)
    }
}

impl From<i32> for ScoreValue {
    fn from(v: i32) -> Self {
        ScoreValue::Number(v as f64)
    }
}

impl From<i64> for ScoreValue {
    fn from(v: i64) -> Self {
        ScoreValue::Number(v as f64)
    }
}

impl From<u32> for ScoreValue {
    fn from(v: u32) -> Self {
        ScoreValue::Number(v as f64)
    }
}

impl From<&str> for ScoreValue {
    fn from(v: &str) -> Self {
        ScoreValue::Text(v.to_string())
    }
}

impl From<String> for ScoreValue {
    fn from(v: String) -> Self {
        ScoreValue::Text(v)
    }
}

impl DecisionEvent {
    /// Encode one decision into its wire representation.
    ///
    /// Generates a fresh `event_id` and `timestamp` on every call. Labels
    /// are stringified and, when `normalize_labels` is set, lower-cased and
    /// trimmed. Fails only if `confidence_score` cannot be coerced to a
    /// number.
    pub fn encode(
        decision_id: &str,
        model_name: &str,
        model_version: &str,
        label: impl ToString,
        confidence_score: ScoreValue,
        normalize_labels: bool,
    ) -> Result<Self> {
        let confidence_score = confidence_score.to_f64()?;

        let mut label = label.to_string();
        if normalize_labels {
            label = label.trim().to_lowercase();
        }

        Ok(DecisionEvent {
            event_id: Uuid::new_v4().to_string(),
            event_type: EVENT_TYPE.to_string(),
            decision_id: decision_id.to_string(),
            timestamp: Utc::now(),
            meta: SdkMeta::current(),
            payload: EventPayload {
                model: ModelInfo {
                    name: model_name.to_string(),
                    version: model_version.to_string(),
                },
                recommendation: Recommendation {
                    label,
                    confidence_score,
                },
            },
        })
    }
}

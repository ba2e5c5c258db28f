use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Where the executed command came from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "source", rename_all = "snake_case")]
pub enum ResolutionSource {
    /// Matched a known question in the corpus.
    Dataset { matched_question: String, score: f64 },
    /// Synthesized by the completion service.
    Model,
}

/// Full trace of one answered question.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnswerReport {
    /// Unique request ID (UUIDv7 for time-sortability).
    pub request_id: Uuid,
    /// Question as asked by the user.
    pub question: String,
    /// Command that was run on the device.
    pub command: String,
    /// How the command was resolved.
    pub resolution: ResolutionSource,
    /// Raw device output, possibly truncated.
    pub raw_output: String,
    /// Human-readable interpretation of the output.
    pub summary: String,
    /// End-to-end processing time in milliseconds.
    pub latency_ms: u64,
    pub answered_at: DateTime<Utc>,
}

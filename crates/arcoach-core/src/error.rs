//! Error taxonomy for the scenario engine.
//!
//! Anomalies are absorbed at the boundary where they occur; nothing in
//! here ever reaches the trainee as anything other than a log line.

use thiserror::Error;

/// Top-level error type for the arcoach engine.
#[derive(Debug, Error)]
pub enum ScenarioError {
    /// A detection arrived with the wrong number of corner points.
    /// The recognizer contract is a full quad; anything else is dropped.
    #[error("malformed detection: expected 4 corners, got {got}")]
    MalformedDetection {
        /// Number of corners actually delivered.
        got: usize,
    },

    /// A configuration value was outside its valid range.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

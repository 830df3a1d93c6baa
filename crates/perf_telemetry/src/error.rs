//! Error types for performance reporting.

use thiserror::Error;

/// Errors that can occur while formatting or shipping a report.
#[derive(Debug, Error)]
pub enum TelemetryError {
    /// Failed to serialize a report
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Failed to hand a report to its sink
    #[error("Sink error: {0}")]
    Sink(String),

    /// Network error while shipping queued reports
    #[error("Network error: {0}")]
    Network(String),

    /// Report queue is full
    #[error("Report queue is full")]
    QueueFull,

    /// Transport is in offline mode
    #[error("Transport is offline")]
    Offline,
}

/// Result type for reporting operations.
pub type TelemetryResult<T> = Result<T, TelemetryError>;

//! Error types for performance timers.

use thiserror::Error;

/// Errors raised by timers, their backend and their configuration.
#[derive(Debug, Error)]
pub enum PerfError {
    /// Timer name is empty or contains characters other than letters, digits and spaces
    #[error("{0:?} invalid. Performance timer name may contain letters, numbers and spaces only")]
    InvalidTimerName(String),

    /// Marker name is empty or contains characters other than letters, digits and spaces
    #[error("{0:?} invalid. Performance timer marker may contain letters, numbers and spaces only")]
    InvalidMarkerName(String),

    /// A measure referenced a mark the backend has never recorded
    #[error("The mark {0:?} does not exist")]
    UnknownMark(String),

    /// A duration was requested for a measure the backend does not hold
    #[error("The measure {0:?} does not exist")]
    UnknownMeasure(String),

    /// Failed to read a configuration file
    #[error("Config I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to parse configuration
    #[error("Config parse error: {0}")]
    ConfigParse(#[from] serde_json::Error),
}

impl PerfError {
    /// Whether this error comes from the naming rules.
    pub fn is_naming_error(&self) -> bool {
        matches!(self, Self::InvalidTimerName(_) | Self::InvalidMarkerName(_))
    }
}

/// Result type for timer operations.
pub type PerfResult<T> = Result<T, PerfError>;

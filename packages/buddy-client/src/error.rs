//! Error types for the Walking Buddy client.

use thiserror::Error;

/// Result type for Walking Buddy client operations.
pub type Result<T> = std::result::Result<T, BuddyClientError>;

/// Walking Buddy client errors.
#[derive(Debug, Error)]
pub enum BuddyClientError {
    /// Configuration error (invalid base URL, client builder failure)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Transport failure (no response, connection refused, timeout)
    #[error("Connection error: {0}")]
    Connection(String),

    /// Non-2xx response; `message` is the service's `detail` or a generic fallback
    #[error("{message}")]
    Server { status: u16, message: String },

    /// 2xx response whose body could not be trusted
    #[error("Malformed response: {0}")]
    MalformedResponse(String),
}

/// A coordinate that failed validation.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum CoordinateError {
    #[error("coordinate components must be finite")]
    NotFinite,

    #[error("latitude {0} is outside [-90, 90]")]
    LatitudeOutOfRange(f64),

    #[error("longitude {0} is outside [-180, 180]")]
    LongitudeOutOfRange(f64),
}

//! Error types for the zonewatch system
//!
//! The taxonomy separates fatal operator errors (configuration, invalid
//! record-type arguments) from per-cycle recoverable ones (fetch failures)
//! and store failures, which the caller decides how to treat: the one-shot
//! tool exits on them, the polling service logs and keeps going.

use thiserror::Error;

/// Result type alias for zonewatch operations
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for the zonewatch system
#[derive(Error, Debug)]
pub enum Error {
    /// Missing or malformed startup configuration
    #[error("configuration error: {0}")]
    Config(String),

    /// A record-type filter outside the supported set (A, AAAA, CNAME, MX, TXT)
    #[error("invalid record type: {0}")]
    InvalidRecordType(String),

    /// The provider answered with a non-success status
    #[error("failed to retrieve DNS records: {status} - {message}")]
    Fetch {
        /// HTTP status code of the provider response
        status: u16,
        /// Response body or provider error text
        message: String,
    },

    /// The provider response could not be parsed
    #[error("invalid provider response: {0}")]
    InvalidResponse(String),

    /// Transport-level HTTP failure before any status was received
    #[error("HTTP error: {0}")]
    Http(String),

    /// Snapshot store connectivity or persistence failure
    #[error("store error: {0}")]
    Store(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create an invalid record type error
    pub fn invalid_record_type(msg: impl Into<String>) -> Self {
        Self::InvalidRecordType(msg.into())
    }

    /// Create a fetch error from a provider status and message
    pub fn fetch(status: u16, message: impl Into<String>) -> Self {
        Self::Fetch {
            status,
            message: message.into(),
        }
    }

    /// Create an invalid response error
    pub fn invalid_response(msg: impl Into<String>) -> Self {
        Self::InvalidResponse(msg.into())
    }

    /// Create an HTTP transport error
    pub fn http(msg: impl Into<String>) -> Self {
        Self::Http(msg.into())
    }

    /// Create a store error
    pub fn store(msg: impl Into<String>) -> Self {
        Self::Store(msg.into())
    }

    /// Whether this error is expected to clear up on a later polling cycle.
    ///
    /// The engine logs recoverable errors and continues; everything else is
    /// surfaced to the binary entry point.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::Fetch { .. } | Self::InvalidResponse(_) | Self::Http(_)
        )
    }
}

//! Error types for the yadisk core crate.
//!
//! Every asynchronous operation settles its promise with a `Failed`-tagged
//! outcome carrying one of these values; errors never cross the async
//! boundary as panics. All variants are cloneable so a single error can
//! settle a promise observed by several waiters.

use thiserror::Error;

/// Errors produced while issuing API requests and decoding their replies.
#[derive(Error, Debug, Clone)]
pub enum DiskError {
    /// The underlying network call failed outright (DNS, TLS, connection
    /// reset). Propagated unchanged from the transport.
    #[error("Transport error: {0}")]
    Transport(String),

    /// The response body was present but not parseable as the expected JSON
    /// shape. Carries the raw body text for diagnostics.
    #[error("Decode error: {reason}")]
    Decode { reason: String, body: String },

    /// The API answered with an error status code (400..=599). The decoded
    /// JSON body is attached when the server sent one.
    #[error("API error: status {status}")]
    Api {
        status: u16,
        body: Option<serde_json::Value>,
    },

    /// A local file operation failed during an up- or download.
    #[error("I/O error: {0}")]
    Io(String),

    /// Client construction failed (invalid token or header values).
    #[error("Config error: {0}")]
    Config(String),
}

impl DiskError {
    pub(crate) fn api(status: u16, body: Option<serde_json::Value>) -> Self {
        Self::Api { status, body }
    }

    pub(crate) fn decode(reason: impl Into<String>, body: impl Into<String>) -> Self {
        Self::Decode {
            reason: reason.into(),
            body: body.into(),
        }
    }

    /// Status code of an [`DiskError::Api`] error, `None` otherwise.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<std::io::Error> for DiskError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

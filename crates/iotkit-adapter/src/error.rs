//! Client error type.

/// Errors that can occur with the IoTKit client.
///
/// Apart from `Init`, every variant is a remote or transport failure. The
/// remote service's error body is carried verbatim in `Api::message`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ClientError {
    /// Client initialization failed
    #[error("client init error: {0}")]
    Init(String),
    /// Request payload could not be encoded
    #[error("serialize error: {0}")]
    Serialize(String),
    /// HTTP request failed before a response arrived
    #[error("request error: {0}")]
    Request(String),
    /// API returned a non-success status
    #[error("API error (status {status}): {message}")]
    Api {
        /// HTTP status code
        status: u16,
        /// Response body
        message: String,
    },
    /// Response body was not valid JSON of the expected shape
    #[error("parse error: {0}")]
    Parse(String),
}

impl ClientError {
    /// HTTP status of an `Api` error.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}

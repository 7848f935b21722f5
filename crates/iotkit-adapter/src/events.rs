//! Client notifications.

use crate::error::ClientError;
use serde_json::Value;

/// Outcome of a request nobody awaited, or of a failed `connect`.
#[derive(Debug, Clone, PartialEq)]
pub enum ClientEvent {
    /// The request succeeded with this response body
    Success(Value),
    /// The request failed
    Error(ClientError),
}

impl ClientEvent {
    /// Event name as seen by event-style hosts: `"success"` or `"error"`.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Success(_) => "success",
            Self::Error(_) => "error",
        }
    }

    /// Whether this is an error notification.
    #[must_use]
    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error(_))
    }
}

impl From<Result<Value, ClientError>> for ClientEvent {
    fn from(outcome: Result<Value, ClientError>) -> Self {
        match outcome {
            Ok(value) => Self::Success(value),
            Err(err) => Self::Error(err),
        }
    }
}

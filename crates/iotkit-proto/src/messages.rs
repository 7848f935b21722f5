//! JSON messages exchanged with the API.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Login body for `POST /auth/token`.
#[derive(Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Credentials {
    /// Dashboard user name
    pub username: String,
    /// Dashboard password
    pub password: String,
}

impl Credentials {
    /// Create credentials from a user name and password.
    #[must_use]
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Successful response of `POST /auth/token`.
#[derive(Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TokenResponse {
    /// Session bearer token
    pub token: String,
}

impl fmt::Debug for TokenResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenResponse")
            .field("token", &"<redacted>")
            .finish()
    }
}

/// Body of `PUT /accounts/{a}/devices/{d}/activation`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ActivationRequest {
    /// Account activation code
    pub activation_code: String,
}

impl ActivationRequest {
    /// Wrap an activation code.
    #[must_use]
    pub fn new(activation_code: impl Into<String>) -> Self {
        Self {
            activation_code: activation_code.into(),
        }
    }
}

/// Envelope for `POST /data/{deviceId}`.
///
/// `data` is the caller's array of observations, passed through untouched.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DataSubmission {
    /// Submission time in milliseconds since the Unix epoch
    pub on: i64,
    /// Account the device belongs to
    pub account_id: String,
    /// Observations
    pub data: Value,
}

impl DataSubmission {
    /// Create a submission stamped with the current time.
    #[must_use]
    pub fn new(account_id: impl Into<String>, data: Value) -> Self {
        Self::at(Utc::now().timestamp_millis(), account_id, data)
    }

    /// Create a submission stamped with an explicit time.
    #[must_use]
    pub fn at(on: i64, account_id: impl Into<String>, data: Value) -> Self {
        Self {
            on,
            account_id: account_id.into(),
            data,
        }
    }
}

/// Query for component catalog reads.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct CatalogQuery {
    /// Return full component type definitions instead of summaries
    pub full: bool,
}

impl CatalogQuery {
    /// Query asking for full definitions.
    #[must_use]
    pub fn full() -> Self {
        Self { full: true }
    }
}

//! # IoTKit Protocol
//!
//! REST route builders and JSON message types for the Intel IoT Analytics
//! API.
//!
//! ## Routes
//!
//! Paths are relative to the API base URL (default
//! [`DEFAULT_BASE_URL`]), e.g. `/accounts/{accountId}/devices/{deviceId}`.
//! Identifiers are substituted verbatim.
//!
//! ## Messages
//!
//! - `Credentials` / `TokenResponse`: session authentication
//! - `ActivationRequest`: device activation body
//! - `DataSubmission`: envelope for device data submission
//! - `CatalogQuery`: query for component catalog reads
//!
//! Domain resources (devices, components, data points) are opaque
//! `serde_json::Value` payloads and are not modelled here.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod messages;
pub mod routes;

pub use messages::{ActivationRequest, CatalogQuery, Credentials, DataSubmission, TokenResponse};

/// Base URL of the hosted Intel IoT Analytics API.
pub const DEFAULT_BASE_URL: &str = "https://dashboard.us.enableiot.com/v1/api";

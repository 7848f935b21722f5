//! # IoTKit Adapter
//!
//! HTTP client for the Intel IoT Analytics REST API.
//!
//! ## Request model
//!
//! Each operation builds a [`RestRequest`] (base URL + route, fixed
//! `content-type: application/json` header, bearer token, query pairs, body)
//! and sends it through a [`Transport`]. The bearer is the session token
//! from `connect` unless the operation is device-scoped (`add_component`,
//! `submit_data`), which authenticate with the caller's device token.
//!
//! ## Outcomes
//!
//! Every request yields one `Result<serde_json::Value, ClientError>`.
//! Callers that do not await an outcome pass it to [`IotClient::notify`],
//! which broadcasts it as a [`ClientEvent`].

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod client;
pub mod error;
pub mod events;
pub mod transport;

pub use client::{ClientConfig, IotClient};
pub use error::ClientError;
pub use events::ClientEvent;
pub use iotkit_core::Connectable;
pub use transport::{HttpTransport, RestRequest, RestVerb, Transport};

//! Request descriptors and the HTTP transport that executes them.
//!
//! The client describes each call as a [`RestRequest`] and hands it to a
//! [`Transport`]. [`HttpTransport`] is the reqwest-backed implementation;
//! tests substitute their own.

use crate::error::ClientError;
use async_trait::async_trait;
use reqwest::{Client, Method};
use serde_json::Value;
use std::fmt;
use std::time::Duration;

/// HTTP verb variants understood by the dispatcher.
///
/// `Post` and `Put` form-encode an object body; `PostJson` and `PutJson`
/// send it as JSON. `Get` and `Delete` never carry a body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RestVerb {
    /// GET
    Get,
    /// POST with a form-encoded body
    Post,
    /// PUT with a form-encoded body
    Put,
    /// DELETE
    Delete,
    /// POST with a JSON body
    PostJson,
    /// PUT with a JSON body
    PutJson,
}

impl RestVerb {
    /// HTTP method sent on the wire.
    #[must_use]
    pub fn method(self) -> Method {
        match self {
            Self::Get => Method::GET,
            Self::Post | Self::PostJson => Method::POST,
            Self::Put | Self::PutJson => Method::PUT,
            Self::Delete => Method::DELETE,
        }
    }

    /// Whether the body is serialized as JSON.
    #[must_use]
    pub fn is_json(self) -> bool {
        matches!(self, Self::PostJson | Self::PutJson)
    }

    /// Whether the verb carries a body at all.
    #[must_use]
    pub fn has_body(self) -> bool {
        !matches!(self, Self::Get | Self::Delete)
    }

    /// Short name used in logs.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Get => "get",
            Self::Post => "post",
            Self::Put => "put",
            Self::Delete => "del",
            Self::PostJson => "postJson",
            Self::PutJson => "putJson",
        }
    }
}

impl fmt::Display for RestVerb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A fully described API call. Built fresh for every request.
#[derive(Clone, PartialEq)]
pub struct RestRequest {
    /// Verb variant
    pub verb: RestVerb,
    /// Absolute URL (base URL + route)
    pub url: String,
    /// Extra headers
    pub headers: Vec<(String, String)>,
    /// Bearer token, if any
    pub bearer: Option<String>,
    /// Query string pairs
    pub query: Vec<(String, String)>,
    /// Body payload
    pub body: Option<Value>,
}

impl fmt::Debug for RestRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RestRequest")
            .field("verb", &self.verb)
            .field("url", &self.url)
            .field("headers", &self.headers)
            .field("bearer", &self.bearer.as_ref().map(|_| "<redacted>"))
            .field("query", &self.query)
            .field("body", &self.body)
            .finish()
    }
}

/// Executes request descriptors.
///
/// Implementations yield exactly one outcome per request: the parsed JSON
/// body, or the error that prevented it.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Execute a request and parse its response body.
    async fn execute(&self, request: RestRequest) -> Result<Value, ClientError>;
}

/// Flatten a JSON object into `key=value` pairs.
///
/// Strings are used verbatim, other scalars in their JSON text form,
/// arrays and objects as JSON text. `null` members are skipped, as is any
/// value that is not an object.
#[must_use]
pub fn flatten_pairs(value: &Value) -> Vec<(String, String)> {
    let Some(object) = value.as_object() else {
        return Vec::new();
    };

    object
        .iter()
        .filter_map(|(key, value)| {
            let text = match value {
                Value::Null => return None,
                Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            Some((key.clone(), text))
        })
        .collect()
}

/// reqwest-backed transport.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    /// Create a transport. `None` keeps reqwest's default timeout behaviour.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client cannot be created.
    pub fn new(timeout: Option<Duration>) -> Result<Self, ClientError> {
        let mut builder = Client::builder().use_rustls_tls();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        let client = builder
            .build()
            .map_err(|e| ClientError::Init(e.to_string()))?;

        Ok(Self { client })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn execute(&self, request: RestRequest) -> Result<Value, ClientError> {
        let mut builder = self.client.request(request.verb.method(), &request.url);

        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(token) = &request.bearer {
            builder = builder.bearer_auth(token);
        }
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }

        if request.verb.has_body() {
            if let Some(body) = &request.body {
                builder = if request.verb.is_json() {
                    builder.json(body)
                } else if body.is_object() {
                    builder.form(&flatten_pairs(body))
                } else {
                    builder.body(body.to_string())
                };
            }
        }

        let response = builder
            .send()
            .await
            .map_err(|e| ClientError::Request(e.to_string()))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| ClientError::Request(e.to_string()))?;

        if !status.is_success() {
            return Err(ClientError::Api {
                status: status.as_u16(),
                message: text,
            });
        }

        if text.trim().is_empty() {
            return Ok(Value::Null);
        }

        serde_json::from_str(&text).map_err(|e| ClientError::Parse(e.to_string()))
    }
}

//! HTTP client for the Intel IoT Analytics REST API.
//!
//! Every operation maps to exactly one request. The client never validates
//! identifiers or payloads and never retries; the only failures are the
//! remote or transport errors in [`ClientError`].

use crate::error::ClientError;
use crate::events::ClientEvent;
use crate::transport::{flatten_pairs, HttpTransport, RestRequest, RestVerb, Transport};
use async_trait::async_trait;
use iotkit_core::{Connectable, EventBus};
use iotkit_proto::{
    routes, ActivationRequest, CatalogQuery, Credentials, DataSubmission, TokenResponse,
    DEFAULT_BASE_URL,
};
use serde::Serialize;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{broadcast, RwLock};
use url::Url;

/// IoTKit client configuration.
#[derive(Clone)]
pub struct ClientConfig {
    /// Dashboard user name
    pub username: String,
    /// Dashboard password
    pub password: String,
    /// API base URL, including the version prefix
    pub base_url: String,
    /// Request timeout; `None` leaves the transport default in place
    pub timeout: Option<Duration>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            username: String::new(),
            password: String::new(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: None,
        }
    }
}

impl ClientConfig {
    /// Configuration for the hosted API with the given credentials.
    #[must_use]
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
            ..Default::default()
        }
    }

    /// Point the client at a different API deployment or version.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Bound every request by `timeout`.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    fn credentials(&self) -> Credentials {
        Credentials::new(&self.username, &self.password)
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// API client (adaptor) for Intel IoT Analytics.
///
/// Holds the credentials and the session token obtained by
/// [`Connectable::connect`]. Share it between drivers behind an `Arc`.
pub struct IotClient {
    config: ClientConfig,
    transport: Arc<dyn Transport>,
    token: RwLock<Option<String>>,
    events: EventBus<ClientEvent>,
}

impl IotClient {
    /// Create a client backed by [`HttpTransport`].
    ///
    /// # Errors
    ///
    /// Returns error if the base URL is invalid or the HTTP client cannot be
    /// created.
    pub fn new(config: ClientConfig) -> Result<Self, ClientError> {
        let transport = HttpTransport::new(config.timeout)?;
        Self::with_transport(config, Arc::new(transport))
    }

    /// Create a client that sends requests through `transport`.
    ///
    /// # Errors
    ///
    /// Returns error if the base URL is invalid.
    pub fn with_transport(
        mut config: ClientConfig,
        transport: Arc<dyn Transport>,
    ) -> Result<Self, ClientError> {
        Url::parse(&config.base_url)
            .map_err(|e| ClientError::Init(format!("invalid base URL {}: {e}", config.base_url)))?;
        config.base_url = config.base_url.trim_end_matches('/').to_string();

        Ok(Self {
            config,
            transport,
            token: RwLock::new(None),
            events: EventBus::default(),
        })
    }

    /// API base URL, without a trailing slash.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    /// Dashboard user name.
    #[must_use]
    pub fn username(&self) -> &str {
        &self.config.username
    }

    /// Current session token, if `connect` has succeeded.
    pub async fn token(&self) -> Option<String> {
        self.token.read().await.clone()
    }

    /// Subscribe to `success` / `error` notifications.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<ClientEvent> {
        self.events.subscribe()
    }

    /// Publish the outcome of a request nobody is awaiting.
    ///
    /// Returns the number of subscribers notified.
    pub fn notify(&self, outcome: Result<Value, ClientError>) -> usize {
        self.events.emit(ClientEvent::from(outcome))
    }

    /// Describe a request against `path` without sending it.
    #[must_use]
    pub fn request(
        &self,
        verb: RestVerb,
        path: &str,
        body: Option<Value>,
        query: Option<&Value>,
        bearer: Option<String>,
    ) -> RestRequest {
        RestRequest {
            verb,
            url: format!("{}{path}", self.config.base_url),
            headers: vec![("content-type".to_string(), "application/json".to_string())],
            bearer,
            query: query.map(flatten_pairs).unwrap_or_default(),
            body,
        }
    }

    /// Send one request and normalize its outcome.
    ///
    /// The bearer is `token` when given, otherwise the session token.
    ///
    /// # Errors
    ///
    /// Returns error on network or API errors.
    pub async fn dispatch(
        &self,
        verb: RestVerb,
        path: &str,
        body: Option<Value>,
        query: Option<&Value>,
        token: Option<&str>,
    ) -> Result<Value, ClientError> {
        let bearer = match token {
            Some(token) => Some(token.to_string()),
            None => self.token().await,
        };
        let request = self.request(verb, path, body, query, bearer);

        tracing::debug!(verb = %verb, url = %request.url, "Dispatching request");

        let outcome = self.transport.execute(request).await;
        if let Err(e) = &outcome {
            tracing::warn!(verb = %verb, path, error = %e, "Request failed");
        }
        outcome
    }

    /// Get account details.
    ///
    /// # Errors
    ///
    /// Returns error on network or API errors.
    pub async fn get_account_info(&self, account_id: &str) -> Result<Value, ClientError> {
        self.dispatch(RestVerb::Get, &routes::account(account_id), None, None, None)
            .await
    }

    /// Retrieve the account activation code.
    ///
    /// # Errors
    ///
    /// Returns error on network or API errors.
    pub async fn get_activation_code(&self, account_id: &str) -> Result<Value, ClientError> {
        let path = routes::activation_code(account_id);
        self.dispatch(RestVerb::Get, &path, None, None, None).await
    }

    /// Force renewal of the account activation code.
    ///
    /// # Errors
    ///
    /// Returns error on network or API errors.
    pub async fn refresh_activation_code(&self, account_id: &str) -> Result<Value, ClientError> {
        let path = routes::refresh_activation_code(account_id);
        self.dispatch(RestVerb::Put, &path, None, None, None).await
    }

    /// List the devices of an account, optionally filtered.
    ///
    /// # Errors
    ///
    /// Returns error on network or API errors.
    pub async fn list_devices(
        &self,
        account_id: &str,
        filters: Option<&Value>,
    ) -> Result<Value, ClientError> {
        let path = routes::devices(account_id);
        self.dispatch(RestVerb::Get, &path, None, filters, None).await
    }

    /// Get device details.
    ///
    /// # Errors
    ///
    /// Returns error on network or API errors.
    pub async fn get_device(&self, account_id: &str, device_id: &str) -> Result<Value, ClientError> {
        let path = routes::device(account_id, device_id);
        self.dispatch(RestVerb::Get, &path, None, None, None).await
    }

    /// Register a new device.
    ///
    /// # Errors
    ///
    /// Returns error on network or API errors.
    pub async fn create_device(&self, account_id: &str, device: Value) -> Result<Value, ClientError> {
        let path = routes::devices(account_id);
        self.dispatch(RestVerb::PostJson, &path, Some(device), None, None)
            .await
    }

    /// Update an existing device.
    ///
    /// # Errors
    ///
    /// Returns error on network or API errors.
    pub async fn update_device(
        &self,
        account_id: &str,
        device_id: &str,
        device: Value,
    ) -> Result<Value, ClientError> {
        let path = routes::device(account_id, device_id);
        self.dispatch(RestVerb::PutJson, &path, Some(device), None, None)
            .await
    }

    /// Activate a device with an account activation code.
    ///
    /// # Errors
    ///
    /// Returns error on network or API errors.
    pub async fn activate_device(
        &self,
        account_id: &str,
        device_id: &str,
        activation_code: &str,
    ) -> Result<Value, ClientError> {
        let path = routes::device_activation(account_id, device_id);
        let body = encode(&ActivationRequest::new(activation_code))?;
        self.dispatch(RestVerb::PutJson, &path, Some(body), None, None)
            .await
    }

    /// Delete a device.
    ///
    /// # Errors
    ///
    /// Returns error on network or API errors.
    pub async fn delete_device(&self, account_id: &str, device_id: &str) -> Result<Value, ClientError> {
        let path = routes::device(account_id, device_id);
        self.dispatch(RestVerb::Delete, &path, None, None, None).await
    }

    /// Attach a component to a device, authenticating as the device.
    ///
    /// # Errors
    ///
    /// Returns error on network or API errors.
    pub async fn add_component(
        &self,
        account_id: &str,
        device_id: &str,
        device_token: &str,
        component: Value,
    ) -> Result<Value, ClientError> {
        let path = routes::device_components(account_id, device_id);
        self.dispatch(
            RestVerb::PostJson,
            &path,
            Some(component),
            None,
            Some(device_token),
        )
        .await
    }

    /// Detach a component from a device.
    ///
    /// # Errors
    ///
    /// Returns error on network or API errors.
    pub async fn remove_component(
        &self,
        account_id: &str,
        device_id: &str,
        component_id: &str,
    ) -> Result<Value, ClientError> {
        let path = routes::device_component(account_id, device_id, component_id);
        self.dispatch(RestVerb::Delete, &path, None, None, None).await
    }

    /// List every device tag in the account.
    ///
    /// # Errors
    ///
    /// Returns error on network or API errors.
    pub async fn list_all_tags(&self, account_id: &str) -> Result<Value, ClientError> {
        let path = routes::device_tags(account_id);
        self.dispatch(RestVerb::Get, &path, None, None, None).await
    }

    /// List every device attribute in the account.
    ///
    /// # Errors
    ///
    /// Returns error on network or API errors.
    pub async fn list_all_attributes(&self, account_id: &str) -> Result<Value, ClientError> {
        let path = routes::device_attributes(account_id);
        self.dispatch(RestVerb::Get, &path, None, None, None).await
    }

    /// List the full component type catalog.
    ///
    /// # Errors
    ///
    /// Returns error on network or API errors.
    pub async fn list_all_component_types(&self, account_id: &str) -> Result<Value, ClientError> {
        let path = routes::component_catalog(account_id);
        let query = encode(&CatalogQuery::full())?;
        self.dispatch(RestVerb::Get, &path, None, Some(&query), None)
            .await
    }

    /// Get one component type definition.
    ///
    /// # Errors
    ///
    /// Returns error on network or API errors.
    pub async fn get_component_type(
        &self,
        account_id: &str,
        component_id: &str,
    ) -> Result<Value, ClientError> {
        let path = routes::component_type(account_id, component_id);
        let query = encode(&CatalogQuery::full())?;
        self.dispatch(RestVerb::Get, &path, None, Some(&query), None)
            .await
    }

    /// Add a component type to the catalog.
    ///
    /// # Errors
    ///
    /// Returns error on network or API errors.
    pub async fn create_component_type(
        &self,
        account_id: &str,
        component: Value,
    ) -> Result<Value, ClientError> {
        let path = routes::component_catalog(account_id);
        self.dispatch(RestVerb::PostJson, &path, Some(component), None, None)
            .await
    }

    /// Update a component type in the catalog.
    ///
    /// # Errors
    ///
    /// Returns error on network or API errors.
    pub async fn update_component_type(
        &self,
        account_id: &str,
        component_id: &str,
        component: Value,
    ) -> Result<Value, ClientError> {
        let path = routes::component_type(account_id, component_id);
        self.dispatch(RestVerb::PutJson, &path, Some(component), None, None)
            .await
    }

    /// Submit observations for a device, authenticating as the device.
    ///
    /// `data` is wrapped as `{on: <now, epoch ms>, accountId, data}`.
    ///
    /// # Errors
    ///
    /// Returns error on network or API errors.
    pub async fn submit_data(
        &self,
        account_id: &str,
        device_id: &str,
        device_token: &str,
        data: Value,
    ) -> Result<Value, ClientError> {
        let path = routes::device_data(device_id);
        let body = encode(&DataSubmission::new(account_id, data))?;
        self.dispatch(
            RestVerb::PostJson,
            &path,
            Some(body),
            None,
            Some(device_token),
        )
        .await
    }

    /// Search stored observations.
    ///
    /// # Errors
    ///
    /// Returns error on network or API errors.
    pub async fn retrieve_data(&self, account_id: &str, search: Value) -> Result<Value, ClientError> {
        let path = routes::data_search(account_id);
        self.dispatch(RestVerb::PostJson, &path, Some(search), None, None)
            .await
    }
}

#[async_trait]
impl Connectable for IotClient {
    type Error = ClientError;

    /// Request a session token with the stored credentials.
    ///
    /// The login request never carries a bearer, even when reconnecting.
    ///
    /// On failure no token is stored, an `error` notification is emitted and
    /// the error is returned.
    async fn connect(&self) -> Result<(), ClientError> {
        let outcome = match encode(&self.config.credentials()) {
            Ok(body) => {
                let request =
                    self.request(RestVerb::PostJson, routes::AUTH_TOKEN, Some(body), None, None);
                tracing::debug!(url = %request.url, "Requesting access token");
                self.transport.execute(request).await
            }
            Err(e) => Err(e),
        }
        .and_then(|value| {
            serde_json::from_value::<TokenResponse>(value)
                .map_err(|e| ClientError::Parse(e.to_string()))
        });

        match outcome {
            Ok(response) => {
                *self.token.write().await = Some(response.token);
                tracing::info!(username = %self.config.username, "Access token retrieved");
                Ok(())
            }
            Err(e) => {
                tracing::warn!(
                    username = %self.config.username,
                    error = %e,
                    "Access token could not be retrieved"
                );
                self.events.emit(ClientEvent::Error(e.clone()));
                Err(e)
            }
        }
    }

    async fn disconnect(&self) -> Result<(), ClientError> {
        tracing::debug!(base_url = %self.config.base_url, "Disconnected");
        Ok(())
    }
}

impl fmt::Debug for IotClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IotClient")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

fn encode<T: Serialize>(message: &T) -> Result<Value, ClientError> {
    serde_json::to_value(message).map_err(|e| ClientError::Serialize(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::collections::VecDeque;
    use std::sync::Mutex;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn now_millis() -> i64 {
        let elapsed = SystemTime::now().duration_since(UNIX_EPOCH).unwrap();
        i64::try_from(elapsed.as_millis()).unwrap()
    }

    #[derive(Default)]
    struct RecordingTransport {
        requests: Mutex<Vec<RestRequest>>,
        responses: Mutex<VecDeque<Result<Value, ClientError>>>,
    }

    impl RecordingTransport {
        fn respond(&self, outcome: Result<Value, ClientError>) {
            self.responses.lock().unwrap().push_back(outcome);
        }

        fn requests(&self) -> Vec<RestRequest> {
            self.requests.lock().unwrap().clone()
        }

        fn last(&self) -> RestRequest {
            self.requests().pop().expect("no request was sent")
        }
    }

    #[async_trait]
    impl Transport for RecordingTransport {
        async fn execute(&self, request: RestRequest) -> Result<Value, ClientError> {
            self.requests.lock().unwrap().push(request);
            self.responses
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Ok(json!({"status": "ok"})))
        }
    }

    const BASE: &str = "https://iot.example.com/v1/api";

    fn client() -> (IotClient, Arc<RecordingTransport>) {
        let transport = Arc::new(RecordingTransport::default());
        let config = ClientConfig::new("user1", "passwd").with_base_url(BASE);
        let client = IotClient::with_transport(config, transport.clone()).unwrap();
        (client, transport)
    }

    async fn connected_client() -> (IotClient, Arc<RecordingTransport>) {
        let (client, transport) = client();
        transport.respond(Ok(json!({"token": "session-token"})));
        client.connect().await.unwrap();
        (client, transport)
    }

    fn api_error() -> ClientError {
        ClientError::Api {
            status: 401,
            message: "LOGIN INCORRECT!".to_string(),
        }
    }

    #[test]
    fn config_default() {
        let config = ClientConfig::default();
        assert_eq!(config.base_url, "https://dashboard.us.enableiot.com/v1/api");
        assert!(config.timeout.is_none());
    }

    #[test]
    fn config_debug_hides_password() {
        let config = ClientConfig::new("user1", "passwd");
        let debug = format!("{config:?}");
        assert!(debug.contains("user1"));
        assert!(!debug.contains("passwd"));
    }

    #[test]
    fn client_creation() {
        let client = IotClient::new(ClientConfig::new("user1", "passwd")).unwrap();
        assert_eq!(client.base_url(), DEFAULT_BASE_URL);
        assert_eq!(client.username(), "user1");
    }

    #[test]
    fn client_creation_with_invalid_base_url_fails() {
        let config = ClientConfig::new("user1", "passwd").with_base_url("not a url");
        let err = IotClient::new(config).unwrap_err();
        assert!(matches!(err, ClientError::Init(_)));
        assert!(err.to_string().contains("client init error"));
    }

    #[test]
    fn trailing_slash_is_stripped() {
        let config = ClientConfig::new("u", "p").with_base_url("http://localhost:3000/v1/api/");
        let client = IotClient::new(config).unwrap();
        let request = client.request(RestVerb::Get, "/accounts", None, None, None);
        assert_eq!(request.url, "http://localhost:3000/v1/api/accounts");
    }

    #[test]
    fn request_descriptor() {
        let (client, _) = client();
        let request = client.request(
            RestVerb::Post,
            "/account",
            Some(json!({"value": 10})),
            Some(&json!({"value": 20})),
            Some("123456".to_string()),
        );

        assert_eq!(request.url, format!("{BASE}/account"));
        assert_eq!(
            request.headers,
            vec![("content-type".to_string(), "application/json".to_string())]
        );
        assert_eq!(request.query, vec![("value".to_string(), "20".to_string())]);
        assert_eq!(request.body, Some(json!({"value": 10})));
        assert_eq!(request.bearer.as_deref(), Some("123456"));
    }

    #[tokio::test]
    async fn dispatch_uses_session_token_by_default() {
        let (client, transport) = connected_client().await;
        client
            .dispatch(RestVerb::Get, "/accounts", None, None, None)
            .await
            .unwrap();
        assert_eq!(transport.last().bearer.as_deref(), Some("session-token"));
    }

    #[tokio::test]
    async fn dispatch_without_token_sends_no_bearer() {
        let (client, transport) = client();
        client
            .dispatch(RestVerb::Get, "/accounts", None, None, None)
            .await
            .unwrap();
        assert!(transport.last().bearer.is_none());
    }

    #[tokio::test]
    async fn dispatch_normalizes_outcomes() {
        let (client, transport) = client();

        transport.respond(Ok(json!({"data": "success"})));
        let ok = client
            .dispatch(RestVerb::Get, "/accounts", None, None, None)
            .await;
        assert_eq!(ok, Ok(json!({"data": "success"})));

        let err = ClientError::Request("Can't reach API".to_string());
        transport.respond(Err(err.clone()));
        let failed = client
            .dispatch(RestVerb::Get, "/accounts", None, None, None)
            .await;
        assert_eq!(failed, Err(err));
    }

    #[tokio::test]
    async fn connect_stores_token() {
        let (client, transport) = client();
        transport.respond(Ok(json!({"token": "123456"})));

        client.connect().await.unwrap();

        assert_eq!(client.token().await.as_deref(), Some("123456"));
        let request = transport.last();
        assert_eq!(request.verb, RestVerb::PostJson);
        assert_eq!(request.url, format!("{BASE}/auth/token"));
        assert_eq!(
            request.body,
            Some(json!({"username": "user1", "password": "passwd"}))
        );
        assert_eq!(transport.requests().len(), 1);
    }

    #[tokio::test]
    async fn reconnect_sends_no_stale_bearer() {
        let (client, transport) = connected_client().await;
        transport.respond(Ok(json!({"token": "second-token"})));

        client.connect().await.unwrap();

        let request = transport.last();
        assert_eq!(request.url, format!("{BASE}/auth/token"));
        assert_eq!(request.bearer, None);
        assert_eq!(client.token().await.as_deref(), Some("second-token"));
    }

    // A failed login is propagated to the caller and also published, and the
    // client stays without a token.
    #[tokio::test]
    async fn connect_failure_propagates_and_notifies() {
        let (client, transport) = client();
        let mut events = client.subscribe();
        transport.respond(Err(api_error()));

        let result = client.connect().await;

        assert_eq!(result, Err(api_error()));
        assert!(client.token().await.is_none());
        assert_eq!(events.try_recv().unwrap(), ClientEvent::Error(api_error()));
    }

    #[tokio::test]
    async fn connect_rejects_response_without_token() {
        let (client, transport) = client();
        transport.respond(Ok(json!({"status": "ok"})));

        let err = client.connect().await.unwrap_err();

        assert!(matches!(err, ClientError::Parse(_)));
        assert!(client.token().await.is_none());
    }

    #[tokio::test]
    async fn disconnect_makes_no_request() {
        let (client, transport) = client();
        client.disconnect().await.unwrap();
        assert!(transport.requests().is_empty());
    }

    #[tokio::test]
    async fn notify_publishes_same_value() {
        let (client, _) = client();
        let mut events = client.subscribe();

        assert_eq!(client.notify(Ok(json!({"data": "success"}))), 1);
        assert_eq!(
            events.try_recv().unwrap(),
            ClientEvent::Success(json!({"data": "success"}))
        );

        let err = ClientError::Request("Can't reach API".to_string());
        client.notify(Err(err.clone()));
        let event = events.try_recv().unwrap();
        assert_eq!(event.name(), "error");
        assert_eq!(event, ClientEvent::Error(err));
    }

    #[tokio::test]
    async fn account_operations() {
        let (client, transport) = connected_client().await;

        client.get_account_info("123456").await.unwrap();
        let request = transport.last();
        assert_eq!(request.verb, RestVerb::Get);
        assert_eq!(request.url, format!("{BASE}/accounts/123456"));

        client.get_activation_code("123456").await.unwrap();
        let request = transport.last();
        assert_eq!(request.verb, RestVerb::Get);
        assert_eq!(request.url, format!("{BASE}/accounts/123456/activationcode"));

        client.refresh_activation_code("123456").await.unwrap();
        let request = transport.last();
        assert_eq!(request.verb, RestVerb::Put);
        assert_eq!(
            request.url,
            format!("{BASE}/accounts/123456/activationcode/refresh")
        );
        assert!(request.body.is_none());
    }

    #[tokio::test]
    async fn list_devices_passes_filters_as_query() {
        let (client, transport) = connected_client().await;

        client.list_devices("A1", None).await.unwrap();
        let request = transport.last();
        assert_eq!(request.url, format!("{BASE}/accounts/A1/devices"));
        assert!(request.query.is_empty());

        let filters = json!({"sort": "name", "order": "asc", "limit": 5});
        client.list_devices("A1", Some(&filters)).await.unwrap();
        let request = transport.last();
        assert_eq!(request.verb, RestVerb::Get);
        assert!(request.query.contains(&("sort".into(), "name".into())));
        assert!(request.query.contains(&("order".into(), "asc".into())));
        assert!(request.query.contains(&("limit".into(), "5".into())));
    }

    #[tokio::test]
    async fn device_operations() {
        let (client, transport) = connected_client().await;
        let device = json!({"id": "abc123", "desc": "MyDevice"});

        client.get_device("A1", "D1").await.unwrap();
        let request = transport.last();
        assert_eq!(request.verb, RestVerb::Get);
        assert_eq!(request.url, format!("{BASE}/accounts/A1/devices/D1"));

        client.update_device("A1", "D1", device.clone()).await.unwrap();
        let request = transport.last();
        assert_eq!(request.verb, RestVerb::PutJson);
        assert_eq!(request.url, format!("{BASE}/accounts/A1/devices/D1"));
        assert_eq!(request.body, Some(device));

        client.activate_device("A1", "D1", "A7x9").await.unwrap();
        let request = transport.last();
        assert_eq!(request.verb, RestVerb::PutJson);
        assert_eq!(request.url, format!("{BASE}/accounts/A1/devices/D1/activation"));
        assert_eq!(request.body, Some(json!({"activationCode": "A7x9"})));

        client.delete_device("A1", "D1").await.unwrap();
        let request = transport.last();
        assert_eq!(request.verb, RestVerb::Delete);
        assert_eq!(request.url, format!("{BASE}/accounts/A1/devices/D1"));
        assert!(request.body.is_none());
    }

    #[tokio::test]
    async fn create_device_end_to_end() {
        let (client, transport) = connected_client().await;
        let device = json!({"deviceId": "raspi-01", "name": "Pi"});
        transport.respond(Ok(json!({"deviceId": "raspi-01", "status": "created"})));

        let result = client.create_device("A1", device.clone()).await;

        assert_eq!(result, Ok(json!({"deviceId": "raspi-01", "status": "created"})));
        let request = transport.last();
        assert_eq!(request.verb, RestVerb::PostJson);
        assert_eq!(request.url, format!("{BASE}/accounts/A1/devices"));
        assert_eq!(request.body, Some(device));
        assert_eq!(request.bearer.as_deref(), Some("session-token"));
    }

    #[tokio::test]
    async fn add_component_uses_device_token_once() {
        let (client, transport) = connected_client().await;
        let component = json!({"cid": "C1", "name": "temp", "type": "temperature.v1.0"});

        client
            .add_component("A1", "D1", "device-token", component.clone())
            .await
            .unwrap();
        let request = transport.last();
        assert_eq!(request.verb, RestVerb::PostJson);
        assert_eq!(request.url, format!("{BASE}/accounts/A1/devices/D1/components"));
        assert_eq!(request.bearer.as_deref(), Some("device-token"));
        assert_eq!(request.body, Some(component));

        client.get_device("A1", "D1").await.unwrap();
        assert_eq!(transport.last().bearer.as_deref(), Some("session-token"));
        assert_eq!(client.token().await.as_deref(), Some("session-token"));
    }

    #[tokio::test]
    async fn remove_component_uses_session_token() {
        let (client, transport) = connected_client().await;

        client.remove_component("A1", "D1", "C1").await.unwrap();
        let request = transport.last();
        assert_eq!(request.verb, RestVerb::Delete);
        assert_eq!(
            request.url,
            format!("{BASE}/accounts/A1/devices/D1/components/C1")
        );
        assert_eq!(request.bearer.as_deref(), Some("session-token"));
    }

    #[tokio::test]
    async fn tag_and_attribute_listings() {
        let (client, transport) = connected_client().await;

        client.list_all_tags("A1").await.unwrap();
        assert_eq!(transport.last().url, format!("{BASE}/accounts/A1/devices/tags"));

        client.list_all_attributes("A1").await.unwrap();
        assert_eq!(
            transport.last().url,
            format!("{BASE}/accounts/A1/devices/attributes")
        );
    }

    #[tokio::test]
    async fn component_catalog_operations() {
        let (client, transport) = connected_client().await;
        let full = vec![("full".to_string(), "true".to_string())];
        let definition = json!({"dimension": "temperature", "version": "1.0", "type": "sensor"});

        client.list_all_component_types("A1").await.unwrap();
        let request = transport.last();
        assert_eq!(request.verb, RestVerb::Get);
        assert_eq!(request.url, format!("{BASE}/accounts/A1/cmpcatalog"));
        assert_eq!(request.query, full);

        client.get_component_type("A1", "temperature.v1.0").await.unwrap();
        let request = transport.last();
        assert_eq!(
            request.url,
            format!("{BASE}/accounts/A1/cmpcatalog/temperature.v1.0")
        );
        assert_eq!(request.query, full);

        client
            .create_component_type("A1", definition.clone())
            .await
            .unwrap();
        let request = transport.last();
        assert_eq!(request.verb, RestVerb::PostJson);
        assert_eq!(request.url, format!("{BASE}/accounts/A1/cmpcatalog"));
        assert_eq!(request.body, Some(definition.clone()));

        client
            .update_component_type("A1", "temperature.v1.0", definition.clone())
            .await
            .unwrap();
        let request = transport.last();
        assert_eq!(request.verb, RestVerb::PutJson);
        assert_eq!(
            request.url,
            format!("{BASE}/accounts/A1/cmpcatalog/temperature.v1.0")
        );
        assert_eq!(request.body, Some(definition));
    }

    #[tokio::test]
    async fn submit_data_wraps_payload_and_uses_device_token() {
        let (client, transport) = connected_client().await;
        let data = json!([
            {"componentId": "arduino-uno-id1-dist.v1.0", "on": 1, "value": "10.7"},
        ]);

        let before = now_millis();
        client
            .submit_data("A1", "arduino-uno-id1", "device-token", data.clone())
            .await
            .unwrap();
        let after = now_millis();

        let request = transport.last();
        assert_eq!(request.verb, RestVerb::PostJson);
        assert_eq!(request.url, format!("{BASE}/data/arduino-uno-id1"));
        assert_eq!(request.bearer.as_deref(), Some("device-token"));

        let body = request.body.unwrap();
        assert_eq!(body["accountId"], "A1");
        assert_eq!(body["data"], data);
        let on = body["on"].as_i64().unwrap();
        assert!(on >= before && on <= after);
        assert_eq!(body.as_object().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn retrieve_data_posts_search() {
        let (client, transport) = connected_client().await;
        let search = json!({
            "from": -3600,
            "targetFilter": {"deviceList": ["arduino-uno-id1"]},
            "metrics": [{"id": "arduino-uno-id1-dist.v1.0"}],
        });

        client.retrieve_data("A1", search.clone()).await.unwrap();
        let request = transport.last();
        assert_eq!(request.verb, RestVerb::PostJson);
        assert_eq!(request.url, format!("{BASE}/accounts/A1/data/search"));
        assert_eq!(request.body, Some(search));
        assert_eq!(request.bearer.as_deref(), Some("session-token"));
    }

    #[tokio::test]
    async fn operation_errors_reach_the_caller() {
        let (client, transport) = connected_client().await;
        let err = ClientError::Api {
            status: 404,
            message: "device not found".to_string(),
        };
        transport.respond(Err(err.clone()));

        assert_eq!(client.get_device("A1", "missing").await, Err(err));
        // Requests are never retried.
        assert_eq!(transport.requests().len(), 2);
    }
}

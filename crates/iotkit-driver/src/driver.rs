//! Command facade over an [`IotClient`] connection.

use crate::command::{Command, CommandError, COMMANDS};
use async_trait::async_trait;
use iotkit_adapter::{ClientError, IotClient};
use iotkit_core::{CommandSource, Lifecycle};
use serde_json::Value;
use std::convert::Infallible;
use std::sync::Arc;
use tokio::task::JoinHandle;

/// Driver exposing the IoTKit operations as host commands.
///
/// Every method forwards its arguments unchanged to the injected
/// connection. Nothing is transformed, buffered or retried here.
#[derive(Debug, Clone)]
pub struct IotDriver {
    connection: Arc<IotClient>,
}

impl IotDriver {
    /// Create a driver bound to `connection`.
    #[must_use]
    pub fn new(connection: Arc<IotClient>) -> Self {
        Self { connection }
    }

    /// The client this driver forwards to.
    #[must_use]
    pub fn connection(&self) -> &Arc<IotClient> {
        &self.connection
    }

    /// Run a parsed command and return its outcome.
    ///
    /// # Errors
    ///
    /// Returns error on network or API errors.
    pub async fn execute(&self, command: Command) -> Result<Value, ClientError> {
        tracing::debug!(command = command.name(), "Executing command");

        match command {
            Command::GetAccountInfo { account_id } => self.get_account_info(&account_id).await,
            Command::GetActivationCode { account_id } => {
                self.get_activation_code(&account_id).await
            }
            Command::RefreshActivationCode { account_id } => {
                self.refresh_activation_code(&account_id).await
            }
            Command::ListDevices {
                account_id,
                filters,
            } => self.list_devices(&account_id, filters.as_ref()).await,
            Command::GetDevice {
                account_id,
                device_id,
            } => self.get_device(&account_id, &device_id).await,
            Command::CreateDevice { account_id, device } => {
                self.create_device(&account_id, device).await
            }
            Command::UpdateDevice {
                account_id,
                device_id,
                device,
            } => self.update_device(&account_id, &device_id, device).await,
            Command::ActivateDevice {
                account_id,
                device_id,
                activation_code,
            } => {
                self.activate_device(&account_id, &device_id, &activation_code)
                    .await
            }
            Command::DeleteDevice {
                account_id,
                device_id,
            } => self.delete_device(&account_id, &device_id).await,
            Command::AddComponent {
                account_id,
                device_id,
                device_token,
                component,
            } => {
                self.add_component(&account_id, &device_id, &device_token, component)
                    .await
            }
            Command::RemoveComponent {
                account_id,
                device_id,
                component_id,
            } => {
                self.remove_component(&account_id, &device_id, &component_id)
                    .await
            }
            Command::ListAllTags { account_id } => self.list_all_tags(&account_id).await,
            Command::ListAllAttributes { account_id } => {
                self.list_all_attributes(&account_id).await
            }
            Command::ListAllComponentTypes { account_id } => {
                self.list_all_component_types(&account_id).await
            }
            Command::GetComponentType {
                account_id,
                component_id,
            } => self.get_component_type(&account_id, &component_id).await,
            Command::CreateComponentType {
                account_id,
                component,
            } => self.create_component_type(&account_id, component).await,
            Command::UpdateComponentType {
                account_id,
                component_id,
                component,
            } => {
                self.update_component_type(&account_id, &component_id, component)
                    .await
            }
            Command::SubmitData {
                account_id,
                device_id,
                device_token,
                data,
            } => {
                self.submit_data(&account_id, &device_id, &device_token, data)
                    .await
            }
            Command::RetrieveData { account_id, search } => {
                self.retrieve_data(&account_id, search).await
            }
        }
    }

    /// Parse and run a command by registry name.
    ///
    /// # Errors
    ///
    /// Returns error if the command cannot be parsed or the request fails.
    pub async fn invoke(&self, name: &str, args: &[Value]) -> Result<Value, CommandError> {
        let command = Command::parse(name, args)?;
        Ok(self.execute(command).await?)
    }

    /// Run a command in the background.
    ///
    /// Nobody awaits the outcome; it is published through
    /// [`IotClient::notify`] as a `success` or `error` event.
    ///
    /// Must be called from within a tokio runtime.
    pub fn spawn(&self, command: Command) -> JoinHandle<()> {
        let driver = self.clone();
        tokio::spawn(async move {
            let outcome = driver.execute(command).await;
            driver.connection.notify(outcome);
        })
    }

    /// Get account details.
    ///
    /// # Errors
    ///
    /// Returns error on network or API errors.
    pub async fn get_account_info(&self, account_id: &str) -> Result<Value, ClientError> {
        self.connection.get_account_info(account_id).await
    }

    /// Retrieve the account activation code.
    ///
    /// # Errors
    ///
    /// Returns error on network or API errors.
    pub async fn get_activation_code(&self, account_id: &str) -> Result<Value, ClientError> {
        self.connection.get_activation_code(account_id).await
    }

    /// Refresh the account activation code.
    ///
    /// # Errors
    ///
    /// Returns error on network or API errors.
    pub async fn refresh_activation_code(&self, account_id: &str) -> Result<Value, ClientError> {
        self.connection.refresh_activation_code(account_id).await
    }

    /// List devices, optionally filtered.
    ///
    /// # Errors
    ///
    /// Returns error on network or API errors.
    pub async fn list_devices(
        &self,
        account_id: &str,
        filters: Option<&Value>,
    ) -> Result<Value, ClientError> {
        self.connection.list_devices(account_id, filters).await
    }

    /// Get device details.
    ///
    /// # Errors
    ///
    /// Returns error on network or API errors.
    pub async fn get_device(&self, account_id: &str, device_id: &str) -> Result<Value, ClientError> {
        self.connection.get_device(account_id, device_id).await
    }

    /// Create a new device.
    ///
    /// # Errors
    ///
    /// Returns error on network or API errors.
    pub async fn create_device(&self, account_id: &str, device: Value) -> Result<Value, ClientError> {
        self.connection.create_device(account_id, device).await
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
        self.connection
            .update_device(account_id, device_id, device)
            .await
    }

    /// Activate an existing device.
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
        self.connection
            .activate_device(account_id, device_id, activation_code)
            .await
    }

    /// Delete a device.
    ///
    /// # Errors
    ///
    /// Returns error on network or API errors.
    pub async fn delete_device(&self, account_id: &str, device_id: &str) -> Result<Value, ClientError> {
        self.connection.delete_device(account_id, device_id).await
    }

    /// Add a component to a device.
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
        self.connection
            .add_component(account_id, device_id, device_token, component)
            .await
    }

    /// Delete a component from a device.
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
        self.connection
            .remove_component(account_id, device_id, component_id)
            .await
    }

    /// List all device tags.
    ///
    /// # Errors
    ///
    /// Returns error on network or API errors.
    pub async fn list_all_tags(&self, account_id: &str) -> Result<Value, ClientError> {
        self.connection.list_all_tags(account_id).await
    }

    /// List all device attributes.
    ///
    /// # Errors
    ///
    /// Returns error on network or API errors.
    pub async fn list_all_attributes(&self, account_id: &str) -> Result<Value, ClientError> {
        self.connection.list_all_attributes(account_id).await
    }

    /// List all component types of the account.
    ///
    /// # Errors
    ///
    /// Returns error on network or API errors.
    pub async fn list_all_component_types(&self, account_id: &str) -> Result<Value, ClientError> {
        self.connection.list_all_component_types(account_id).await
    }

    /// Get component type details.
    ///
    /// # Errors
    ///
    /// Returns error on network or API errors.
    pub async fn get_component_type(
        &self,
        account_id: &str,
        component_id: &str,
    ) -> Result<Value, ClientError> {
        self.connection
            .get_component_type(account_id, component_id)
            .await
    }

    /// Create a new component type.
    ///
    /// # Errors
    ///
    /// Returns error on network or API errors.
    pub async fn create_component_type(
        &self,
        account_id: &str,
        component: Value,
    ) -> Result<Value, ClientError> {
        self.connection
            .create_component_type(account_id, component)
            .await
    }

    /// Update a component type.
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
        self.connection
            .update_component_type(account_id, component_id, component)
            .await
    }

    /// Submit data to a device component.
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
        self.connection
            .submit_data(account_id, device_id, device_token, data)
            .await
    }

    /// Retrieve data matching a search.
    ///
    /// # Errors
    ///
    /// Returns error on network or API errors.
    pub async fn retrieve_data(&self, account_id: &str, search: Value) -> Result<Value, ClientError> {
        self.connection.retrieve_data(account_id, search).await
    }
}

#[async_trait]
impl Lifecycle for IotDriver {
    type Error = Infallible;

    async fn start(&self) -> Result<(), Infallible> {
        tracing::debug!("Driver started");
        Ok(())
    }

    async fn halt(&self) -> Result<(), Infallible> {
        tracing::debug!("Driver halted");
        Ok(())
    }
}

impl CommandSource for IotDriver {
    fn commands(&self) -> &'static [&'static str] {
        COMMANDS
    }
}

//! Plugin registration: manifest and factories the host calls by name.

use crate::IotDriver;
use iotkit_adapter::{ClientConfig, ClientError, IotClient};
use iotkit_core::PluginManifest;
use std::sync::Arc;

/// Name of the connection this plugin provides.
pub const ADAPTOR_NAME: &str = "intel-iot-analytics";

/// Name of the driver this plugin provides.
pub const DRIVER_NAME: &str = "iot";

/// What the plugin registers with the host.
pub const MANIFEST: PluginManifest = PluginManifest {
    adaptors: &[ADAPTOR_NAME],
    drivers: &[DRIVER_NAME],
    dependencies: &[],
};

/// Build the API client connection.
///
/// # Errors
///
/// Returns error if the configured base URL is invalid or the HTTP
/// client cannot be built.
pub fn adaptor(config: ClientConfig) -> Result<IotClient, ClientError> {
    tracing::debug!(adaptor = ADAPTOR_NAME, "Building adaptor");
    IotClient::new(config)
}

/// Build a driver by name; `None` for names this plugin does not provide.
#[must_use]
pub fn driver(name: &str, connection: Arc<IotClient>) -> Option<IotDriver> {
    if !MANIFEST.provides_driver(name) {
        tracing::debug!(driver = name, "Unknown driver requested");
        return None;
    }
    Some(IotDriver::new(connection))
}

//! REST route scheme.
//!
//! Route structure: `/accounts/{accountId}/{resource}[/{id}][/{action}]`,
//! plus the account-less `/auth/token` and `/data/{deviceId}` endpoints.

/// Session token endpoint.
pub const AUTH_TOKEN: &str = "/auth/token";

/// Account root.
#[must_use]
pub fn account(account_id: &str) -> String {
    format!("/accounts/{account_id}")
}

/// Current account activation code.
#[must_use]
pub fn activation_code(account_id: &str) -> String {
    format!("{}/activationcode", account(account_id))
}

/// Forces renewal of the account activation code.
#[must_use]
pub fn refresh_activation_code(account_id: &str) -> String {
    format!("{}/refresh", activation_code(account_id))
}

/// Device collection of an account.
#[must_use]
pub fn devices(account_id: &str) -> String {
    format!("{}/devices", account(account_id))
}

/// A single device.
#[must_use]
pub fn device(account_id: &str, device_id: &str) -> String {
    format!("{}/{device_id}", devices(account_id))
}

/// Device activation action.
#[must_use]
pub fn device_activation(account_id: &str, device_id: &str) -> String {
    format!("{}/activation", device(account_id, device_id))
}

/// Components attached to a device.
#[must_use]
pub fn device_components(account_id: &str, device_id: &str) -> String {
    format!("{}/components", device(account_id, device_id))
}

/// A single component attached to a device.
#[must_use]
pub fn device_component(account_id: &str, device_id: &str, component_id: &str) -> String {
    format!("{}/{component_id}", device_components(account_id, device_id))
}

/// All device tags in an account.
#[must_use]
pub fn device_tags(account_id: &str) -> String {
    format!("{}/tags", devices(account_id))
}

/// All device attributes in an account.
#[must_use]
pub fn device_attributes(account_id: &str) -> String {
    format!("{}/attributes", devices(account_id))
}

/// Component type catalog of an account.
#[must_use]
pub fn component_catalog(account_id: &str) -> String {
    format!("{}/cmpcatalog", account(account_id))
}

/// A single component type in the catalog.
#[must_use]
pub fn component_type(account_id: &str, component_id: &str) -> String {
    format!("{}/{component_id}", component_catalog(account_id))
}

/// Data submission endpoint of a device.
#[must_use]
pub fn device_data(device_id: &str) -> String {
    format!("/data/{device_id}")
}

/// Data search endpoint of an account.
#[must_use]
pub fn data_search(account_id: &str) -> String {
    format!("{}/data/search", account(account_id))
}

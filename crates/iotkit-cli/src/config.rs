//! Connection settings from flags and environment.

use anyhow::{Context, Result};
use clap::Args;
use iotkit_adapter::ClientConfig;
use serde_json::Value;
use std::time::Duration;

/// Dashboard account and endpoint.
#[derive(Debug, Clone, Args)]
pub struct ConnectionArgs {
    /// Dashboard user name
    #[arg(long, env = "IOTKIT_USERNAME")]
    pub username: String,

    /// Dashboard password
    #[arg(long, env = "IOTKIT_PASSWORD", hide_env_values = true)]
    pub password: String,

    /// API base URL
    #[arg(long, env = "IOTKIT_BASE_URL", default_value = iotkit_proto::DEFAULT_BASE_URL)]
    pub base_url: String,

    /// Request timeout in seconds
    #[arg(long, env = "IOTKIT_TIMEOUT_SECS")]
    pub timeout_secs: Option<u64>,
}

impl ConnectionArgs {
    /// Client configuration for these settings.
    #[must_use]
    pub fn client_config(&self) -> ClientConfig {
        let config = ClientConfig::new(&self.username, &self.password).with_base_url(&self.base_url);
        match self.timeout_secs {
            Some(secs) => config.with_timeout(Duration::from_secs(secs)),
            None => config,
        }
    }
}

/// Parse positional command arguments.
///
/// Each argument is read as JSON; anything that is not valid JSON is taken
/// as a plain string. Numeric identifiers parse as JSON numbers and are
/// turned back into text when the command is built.
pub fn parse_args(raw: &[String]) -> Vec<Value> {
    raw.iter()
        .map(|arg| serde_json::from_str(arg).unwrap_or_else(|_| Value::String(arg.clone())))
        .collect()
}

/// Read a JSON argument from a file when prefixed with `@`.
///
/// # Errors
///
/// Returns error if the file cannot be read or does not hold JSON.
pub fn expand_file_arg(arg: &str) -> Result<String> {
    let Some(path) = arg.strip_prefix('@') else {
        return Ok(arg.to_string());
    };
    let contents =
        std::fs::read_to_string(path).with_context(|| format!("Failed to read {path}"))?;
    serde_json::from_str::<Value>(&contents).with_context(|| format!("{path} is not JSON"))?;
    Ok(contents)
}

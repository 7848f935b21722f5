//! # IoTKit CLI
//!
//! Runs one IoTKit command against the Intel IoT Analytics API and prints
//! the JSON result.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use iotkit_adapter::{Connectable, IotClient};
use iotkit_core::{CommandSource, Lifecycle};
use iotkit_driver::{plugin, COMMANDS};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

mod config;

use config::{expand_file_arg, parse_args, ConnectionArgs};

#[derive(Parser)]
#[command(name = "iotkit")]
#[command(version)]
#[command(about = "Intel IoT Analytics command runner", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List available commands
    Commands,

    /// Connect and run one command
    Run {
        #[command(flatten)]
        connection: ConnectionArgs,

        /// Command name, e.g. listDevices
        name: String,

        /// Positional arguments as JSON; `@file` reads JSON from a file
        args: Vec<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Commands => {
            for name in COMMANDS {
                println!("{name}");
            }
        }
        Commands::Run {
            connection,
            name,
            args,
        } => run(&connection, &name, &args).await?,
    }

    Ok(())
}

async fn run(connection: &ConnectionArgs, name: &str, raw: &[String]) -> Result<()> {
    let raw = raw
        .iter()
        .map(String::as_str)
        .map(expand_file_arg)
        .collect::<Result<Vec<_>>>()?;
    let args = parse_args(&raw);

    let client = plugin::adaptor(connection.client_config()).context("Failed to build client")?;
    let client = Arc::new(client);
    let driver = plugin::driver(plugin::DRIVER_NAME, client.clone())
        .context("Driver not provided by plugin")?;

    if !driver.has_command(name) {
        anyhow::bail!("Unknown command: {name} (see `iotkit commands`)");
    }

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        base_url = client.base_url(),
        "Connecting"
    );
    client.connect().await.context("Failed to connect")?;
    driver.start().await?;

    let outcome = driver.invoke(name, &args).await;

    driver.halt().await?;
    disconnect(&client).await;

    let result = outcome.with_context(|| format!("{name} failed"))?;
    println!("{}", serde_json::to_string_pretty(&result)?);

    Ok(())
}

async fn disconnect(client: &IotClient) {
    if let Err(e) = client.disconnect().await {
        tracing::warn!(error = %e, "Disconnect failed");
    }
}

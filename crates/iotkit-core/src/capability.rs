//! Capability traits implemented by plugin objects.
//!
//! The host never inherits from plugin types. It holds connections as
//! [`Connectable`] and drivers as [`Lifecycle`] + [`CommandSource`], and
//! calls into them only through these traits.

use async_trait::async_trait;

/// A connection the host opens before any driver runs and closes on teardown.
#[async_trait]
pub trait Connectable: Send + Sync {
    /// Error produced when the connection cannot be established.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Establish the connection.
    async fn connect(&self) -> Result<(), Self::Error>;

    /// Release the connection.
    async fn disconnect(&self) -> Result<(), Self::Error>;
}

/// Start/halt hooks the host calls around a driver's working life.
#[async_trait]
pub trait Lifecycle: Send + Sync {
    /// Error produced when the driver cannot start or stop.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Called once the driver's connection is up.
    async fn start(&self) -> Result<(), Self::Error>;

    /// Called when the host shuts the driver down.
    async fn halt(&self) -> Result<(), Self::Error>;
}

/// Declares the command names a driver exposes to the host's dispatch registry.
pub trait CommandSource {
    /// Every invocable command name.
    fn commands(&self) -> &'static [&'static str];

    /// Whether `name` is one of [`CommandSource::commands`].
    fn has_command(&self, name: &str) -> bool {
        self.commands().iter().any(|c| *c == name)
    }
}

//! # IoTKit Driver
//!
//! Command facade over the IoTKit API client.
//!
//! [`IotDriver`] exposes every client operation as a named command. Calls
//! are forwarded unchanged to the shared [`IotClient`](iotkit_adapter::IotClient)
//! connection, and outcomes come back untouched. Hosts that dispatch by
//! name use [`Command::parse`] with the names in [`COMMANDS`].

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod command;
pub mod driver;
pub mod plugin;

pub use command::{Command, CommandError, COMMANDS};
pub use driver::IotDriver;
pub use plugin::MANIFEST;

//! # IoTKit Core
//!
//! The contract between the IoTKit plugin and the robotics host that runs it.
//!
//! This crate provides:
//! - Capability traits the host drives: [`Connectable`] for connections,
//!   [`Lifecycle`] for drivers and [`CommandSource`] for the command registry
//! - [`EventBus`], a broadcast channel for event-style notifications
//! - [`PluginManifest`], the names a plugin registers with the host

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod capability;
pub mod event;
pub mod manifest;

pub use capability::{CommandSource, Connectable, Lifecycle};
pub use event::EventBus;
pub use manifest::PluginManifest;

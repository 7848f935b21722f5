//! Plugin registration data.

/// Names a plugin registers with the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PluginManifest {
    /// Adaptor (connection) names the plugin provides
    pub adaptors: &'static [&'static str],
    /// Driver (device) names the plugin provides
    pub drivers: &'static [&'static str],
    /// Other plugins this one is meant to be used with
    pub dependencies: &'static [&'static str],
}

impl PluginManifest {
    /// Whether the plugin provides an adaptor called `name`.
    #[must_use]
    pub fn provides_adaptor(&self, name: &str) -> bool {
        self.adaptors.contains(&name)
    }

    /// Whether the plugin provides a driver called `name`.
    #[must_use]
    pub fn provides_driver(&self, name: &str) -> bool {
        self.drivers.contains(&name)
    }
}

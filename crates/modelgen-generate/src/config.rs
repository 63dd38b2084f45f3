use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use modelgen_introspect::ConnectOptions;

use crate::errors::ConfigError;
use crate::registry::{Catalog, PluginEntry, RegistryConfig};

/// Default config file looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "modelgen.toml";

/// Generator used when none is requested.
pub const DEFAULT_GENERATOR: &str = "declarative";

/// Contents of `modelgen.toml`. Every section is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ModelgenConfig {
    pub defaults: Defaults,
    pub connection: ConnectionSettings,
    pub plugins: Vec<PluginEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Defaults {
    pub generator: String,
    pub include_views: bool,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            generator: DEFAULT_GENERATOR.to_string(),
            include_views: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConnectionSettings {
    pub max_connections: u32,
    pub acquire_timeout_secs: u64,
}

impl Default for ConnectionSettings {
    fn default() -> Self {
        let options = ConnectOptions::default();
        Self {
            max_connections: options.max_connections,
            acquire_timeout_secs: options.acquire_timeout.as_secs(),
        }
    }
}

impl ConnectionSettings {
    pub fn connect_options(&self) -> ConnectOptions {
        ConnectOptions {
            max_connections: self.max_connections,
            acquire_timeout: Duration::from_secs(self.acquire_timeout_secs),
        }
    }
}

impl ModelgenConfig {
    /// Read and validate a config file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config: ModelgenConfig =
            toml::from_str(&content).map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        config.validate()?;
        Ok(config)
    }

    /// Like [`ModelgenConfig::load`], but a missing file yields the defaults.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.connection.max_connections == 0 {
            return Err(ConfigError::Invalid(
                "connection.max_connections must be at least 1".to_string(),
            ));
        }
        if self.defaults.generator.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "defaults.generator must not be empty".to_string(),
            ));
        }
        for plugin in &self.plugins {
            if plugin.name.trim().is_empty() || plugin.target.trim().is_empty() {
                return Err(ConfigError::Invalid(format!(
                    "plugin entries need a name and a target (group {})",
                    plugin.group
                )));
            }
        }
        Ok(())
    }

    /// Installed generators first, then the configured plugins, so that a
    /// configured name replaces a built-in one.
    pub fn registry_config(&self, catalog: &Catalog) -> RegistryConfig {
        let mut config = RegistryConfig::builtin_for(catalog);
        config.plugins.extend(self.plugins.iter().cloned());
        config
    }
}

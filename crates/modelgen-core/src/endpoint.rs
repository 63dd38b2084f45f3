use serde::{Deserialize, Serialize};

/// Driver-specific construction options for an endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Let the driver infer bound parameter sizes before executing.
    ///
    /// Some ODBC bridges misreport sizes and truncate values unless this is
    /// turned off.
    pub use_input_sizes: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            use_input_sizes: true,
        }
    }
}

/// Description of a live endpoint, handed to generators for dialect-aware output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EndpointInfo {
    /// Dialect name (e.g. `postgresql`).
    pub dialect: String,
    /// Full driver identifier the endpoint was built for.
    pub driver: String,
    /// Schema that unqualified names resolve to, when known.
    pub default_schema: Option<String>,
    pub config: EngineConfig,
}

impl EndpointInfo {
    pub fn new(dialect: impl Into<String>, driver: impl Into<String>, config: EngineConfig) -> Self {
        Self {
            dialect: dialect.into(),
            driver: driver.into(),
            default_schema: None,
            config,
        }
    }
}

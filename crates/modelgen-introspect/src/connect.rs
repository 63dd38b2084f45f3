use std::time::Duration;

use async_trait::async_trait;

use modelgen_core::{ConnectionDescriptor, EngineConfig};

use crate::endpoint::Endpoint;
use crate::errors::ConnectionError;
use crate::postgres::PostgresEndpoint;

/// ODBC bridge whose parameter binder misreports input sizes.
pub const ODBC_BRIDGE_DRIVER: &str = "mssql+pyodbc";

/// Engine configuration for a driver.
///
/// Only the ODBC bridge deviates from the defaults: automatic input-size
/// inference is turned off because that driver truncates bound values
/// otherwise.
pub fn engine_config_for(descriptor: &ConnectionDescriptor) -> EngineConfig {
    if descriptor.driver_id().eq_ignore_ascii_case(ODBC_BRIDGE_DRIVER) {
        EngineConfig {
            use_input_sizes: false,
        }
    } else {
        EngineConfig::default()
    }
}

/// Opens endpoints for the drivers it knows about.
#[async_trait]
pub trait Connector: Send + Sync {
    async fn connect(
        &self,
        descriptor: &ConnectionDescriptor,
        config: EngineConfig,
    ) -> Result<Box<dyn Endpoint>, ConnectionError>;
}

/// Pool settings used by [`SqlxConnector`].
#[derive(Debug, Clone)]
pub struct ConnectOptions {
    pub max_connections: u32,
    pub acquire_timeout: Duration,
}

impl Default for ConnectOptions {
    fn default() -> Self {
        Self {
            max_connections: 1,
            acquire_timeout: Duration::from_secs(10),
        }
    }
}

/// Connector backed by `sqlx` pools.
#[derive(Debug, Clone, Default)]
pub struct SqlxConnector {
    options: ConnectOptions,
}

impl SqlxConnector {
    pub fn new(options: ConnectOptions) -> Self {
        Self { options }
    }
}

#[async_trait]
impl Connector for SqlxConnector {
    async fn connect(
        &self,
        descriptor: &ConnectionDescriptor,
        config: EngineConfig,
    ) -> Result<Box<dyn Endpoint>, ConnectionError> {
        match descriptor.backend().to_ascii_lowercase().as_str() {
            "postgres" | "postgresql" => {
                let endpoint = PostgresEndpoint::connect(descriptor, config, &self.options).await?;
                Ok(Box::new(endpoint))
            }
            _ => Err(ConnectionError::UnsupportedDriver(descriptor.driver_id())),
        }
    }
}

/// Builds endpoints from descriptors, applying per-driver engine configuration.
///
/// Connection failures are returned as-is; nothing is retried.
#[derive(Debug, Clone, Default)]
pub struct ConnectionFactory<C> {
    connector: C,
}

impl<C: Connector> ConnectionFactory<C> {
    pub fn new(connector: C) -> Self {
        Self { connector }
    }

    pub async fn connect(
        &self,
        descriptor: &ConnectionDescriptor,
    ) -> Result<Box<dyn Endpoint>, ConnectionError> {
        let config = engine_config_for(descriptor);
        tracing::info!(
            event = "connecting",
            driver = %descriptor.driver_id(),
            target = %descriptor.redacted(),
            use_input_sizes = config.use_input_sizes
        );
        let endpoint = self.connector.connect(descriptor, config).await?;
        tracing::info!(event = "connected", dialect = %endpoint.info().dialect);
        Ok(endpoint)
    }
}

//! Database reflection: endpoints, the connection factory and the metadata
//! reflector that merges per-schema results into one model.

pub mod connect;
pub mod endpoint;
pub mod errors;
pub mod postgres;
pub mod reflect;

pub use connect::{
    ConnectOptions, ConnectionFactory, Connector, ODBC_BRIDGE_DRIVER, SqlxConnector,
    engine_config_for,
};
pub use endpoint::{Endpoint, ReflectRequest};
pub use errors::{ConnectionError, EndpointError, ReflectionError};
pub use postgres::PostgresEndpoint;
pub use reflect::{MetadataReflector, TableFilter, reflect};

pub use modelgen_core::MetadataModel;

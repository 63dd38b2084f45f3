use thiserror::Error;

/// Failures while turning a connection descriptor into a live endpoint.
#[derive(Debug, Error)]
pub enum ConnectionError {
    /// No connector is available for the driver identifier.
    #[error("unsupported driver: {0}")]
    UnsupportedDriver(String),
    /// The transport could not be established.
    #[error("could not connect to {target}: {message}")]
    Transport { target: String, message: String },
}

/// Failures reported by an endpoint while answering a structural query.
#[derive(Debug, Error)]
pub enum EndpointError {
    /// The connection dropped or could not be acquired.
    #[error("transport error: {0}")]
    Transport(String),
    /// The catalog query itself failed.
    #[error("query error: {0}")]
    Query(String),
}

impl From<sqlx::Error> for EndpointError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::Io(_)
            | sqlx::Error::Tls(_)
            | sqlx::Error::PoolTimedOut
            | sqlx::Error::PoolClosed
            | sqlx::Error::WorkerCrashed => EndpointError::Transport(err.to_string()),
            other => EndpointError::Query(other.to_string()),
        }
    }
}

/// Failures of a reflection run. No partial model accompanies any of them.
#[derive(Debug, Error)]
pub enum ReflectionError {
    /// The endpoint lost its transport while reflecting a schema.
    #[error("connection lost while reflecting schema {schema}: {source}")]
    Connection {
        schema: String,
        #[source]
        source: EndpointError,
    },
    /// A schema's structural query failed.
    #[error("reflection of schema {schema} failed: {source}")]
    Schema {
        schema: String,
        #[source]
        source: EndpointError,
    },
    /// The merged model is internally inconsistent.
    #[error(transparent)]
    InvalidModel(#[from] modelgen_core::Error),
}

impl ReflectionError {
    pub(crate) fn from_endpoint(schema: String, source: EndpointError) -> Self {
        match source {
            EndpointError::Transport(_) => ReflectionError::Connection { schema, source },
            EndpointError::Query(_) => ReflectionError::Schema { schema, source },
        }
    }
}

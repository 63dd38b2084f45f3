use thiserror::Error;

/// Core error type shared across modelgen crates.
#[derive(Debug, Error)]
pub enum Error {
    /// The connection string cannot be decomposed into driver and target.
    #[error("malformed connection string: {0}")]
    MalformedConnectionString(String),
    /// The reflected model violates internal invariants.
    #[error("invalid model: {0}")]
    InvalidModel(String),
}

/// Convenience alias for results returned by modelgen crates.
pub type Result<T> = std::result::Result<T, Error>;

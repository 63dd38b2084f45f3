use std::io;
use std::path::PathBuf;

use thiserror::Error;

use modelgen_core::GenerationError;
use modelgen_introspect::{ConnectionError, ReflectionError};

/// Failures looking up or loading a generator.
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("unknown generator {name:?}; available: {}", available.join(", "))]
    UnknownGenerator { name: String, available: Vec<String> },
    #[error("generator {name:?} cannot be loaded from {target:?}")]
    Unloadable { name: String, target: String },
}

/// Failures of the output sink.
#[derive(Debug, Error)]
pub enum SinkError {
    #[error("cannot open output file {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to write output: {0}")]
    Write(#[source] io::Error),
    #[error("failed to release output: {0}")]
    Release(#[source] io::Error),
}

/// Failures loading `modelgen.toml`.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("invalid config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Failure of a generation run, tagged by the stage that produced it.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Descriptor(#[from] modelgen_core::Error),
    #[error(transparent)]
    Registry(#[from] RegistryError),
    #[error(transparent)]
    Connection(#[from] ConnectionError),
    #[error(transparent)]
    Reflection(#[from] ReflectionError),
    #[error(transparent)]
    Generation(#[from] GenerationError),
    #[error(transparent)]
    Sink(#[from] SinkError),
    #[error("pipeline already finished")]
    AlreadyFinished,
}

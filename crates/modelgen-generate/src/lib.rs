//! Orchestration of a generation run: registry lookup, reflection,
//! generation and output.

pub mod config;
pub mod errors;
pub mod pipeline;
pub mod registry;
pub mod sink;

pub use config::{
    ConnectionSettings, DEFAULT_CONFIG_FILE, DEFAULT_GENERATOR, Defaults, ModelgenConfig,
};
pub use errors::{ConfigError, PipelineError, RegistryError, SinkError};
pub use pipeline::{
    GenerateRequest, Pipeline, RunState, RunSummary, builtin_registry, generate_models,
    generate_models_with,
};
pub use registry::{
    BUILTIN_TARGET, Catalog, GENERATOR_GROUP, GeneratorRegistry, LazyGenerator, PluginEntry,
    RegistryConfig,
};
pub use sink::{OutputSink, Sink, emit, emit_with};

pub use modelgen_core::GeneratorOptions;

use std::fmt;
use std::path::PathBuf;

use modelgen_core::{ConnectionDescriptor, GeneratorOptions};
use modelgen_introspect::{
    ConnectionFactory, Connector, MetadataReflector, SqlxConnector, TableFilter,
};

use crate::config::{DEFAULT_GENERATOR, ModelgenConfig};
use crate::errors::PipelineError;
use crate::registry::{Catalog, GeneratorRegistry, RegistryConfig};
use crate::sink::{OutputSink, emit_with};

/// Stage of a generation run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunState {
    Idle,
    Resolving,
    Connecting,
    Reflecting,
    GeneratorResolved,
    Generating,
    Writing,
    Done,
    Failed(String),
}

impl RunState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, RunState::Done | RunState::Failed(_))
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RunState::Idle => "idle",
            RunState::Resolving => "resolving",
            RunState::Connecting => "connecting",
            RunState::Reflecting => "reflecting",
            RunState::GeneratorResolved => "generator_resolved",
            RunState::Generating => "generating",
            RunState::Writing => "writing",
            RunState::Done => "done",
            RunState::Failed(_) => "failed",
        }
    }
}

impl fmt::Display for RunState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Everything one run needs to know.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerateRequest {
    pub url: String,
    pub generator: String,
    /// Schemas in reflection order; empty means the default schema.
    pub schemas: Vec<String>,
    /// Table allow-list; empty means every table.
    pub tables: Vec<String>,
    pub include_views: bool,
    pub options: GeneratorOptions,
    /// Output file; `None` writes to stdout.
    pub outfile: Option<PathBuf>,
}

impl GenerateRequest {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            generator: DEFAULT_GENERATOR.to_string(),
            schemas: Vec::new(),
            tables: Vec::new(),
            include_views: true,
            options: GeneratorOptions::new(),
            outfile: None,
        }
    }
}

/// Outcome of a successful run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub generator: String,
    pub dialect: String,
    pub tables: usize,
    pub bytes_written: usize,
    pub outfile: Option<PathBuf>,
}

/// One-shot run of resolve, connect, reflect, generate and write.
pub struct Pipeline<'r, C> {
    registry: &'r GeneratorRegistry,
    connections: ConnectionFactory<C>,
    state: RunState,
}

impl<'r, C: Connector> Pipeline<'r, C> {
    pub fn new(registry: &'r GeneratorRegistry, connector: C) -> Self {
        Self {
            registry,
            connections: ConnectionFactory::new(connector),
            state: RunState::Idle,
        }
    }

    pub fn state(&self) -> &RunState {
        &self.state
    }

    /// Drive the run to `Done` or `Failed`. A pipeline runs at most once.
    pub async fn run(&mut self, request: &GenerateRequest) -> Result<RunSummary, PipelineError> {
        if self.state.is_terminal() {
            return Err(PipelineError::AlreadyFinished);
        }

        match self.execute(request).await {
            Ok(summary) => {
                self.transition(RunState::Done);
                tracing::info!(
                    event = "run_finished",
                    generator = %summary.generator,
                    tables = summary.tables,
                    bytes = summary.bytes_written
                );
                Ok(summary)
            }
            Err(err) => {
                tracing::error!(event = "run_failed", stage = %self.state, error = %err);
                self.transition(RunState::Failed(err.to_string()));
                Err(err)
            }
        }
    }

    async fn execute(&mut self, request: &GenerateRequest) -> Result<RunSummary, PipelineError> {
        self.transition(RunState::Resolving);
        let descriptor = ConnectionDescriptor::parse(&request.url)?;
        let registry = self.registry;
        let lazy = registry.resolve(&request.generator)?;

        self.transition(RunState::Connecting);
        let endpoint = self.connections.connect(&descriptor).await?;

        self.transition(RunState::Reflecting);
        let schemas = request.schemas.iter().cloned().map(Some).collect();
        let model = MetadataReflector::new()
            .schemas(schemas)
            .tables(TableFilter::only(request.tables.iter().cloned()))
            .include_views(request.include_views)
            .reflect(endpoint.as_ref())
            .await?;

        let factory = lazy.load()?;
        let generator = factory.create(&model, endpoint.info(), request.options.clone())?;
        self.transition(RunState::GeneratorResolved);

        self.transition(RunState::Generating);
        let mut sink = OutputSink::acquire(request.outfile.as_deref())?;
        let bytes_written = emit_with(generator.as_ref(), &mut sink, |_| {
            self.transition(RunState::Writing)
        })?;

        Ok(RunSummary {
            generator: lazy.name().to_string(),
            dialect: endpoint.info().dialect.clone(),
            tables: model.len(),
            bytes_written,
            outfile: request.outfile.clone(),
        })
    }

    fn transition(&mut self, next: RunState) {
        let from = std::mem::replace(&mut self.state, next);
        tracing::info!(event = "state_changed", from = %from, to = %self.state);
    }
}

/// Run one generation against a live database with the installed
/// generators and default settings.
pub async fn generate_models(request: GenerateRequest) -> Result<RunSummary, PipelineError> {
    generate_models_with(request, &ModelgenConfig::default()).await
}

/// [`generate_models`] with explicit configuration.
pub async fn generate_models_with(
    request: GenerateRequest,
    config: &ModelgenConfig,
) -> Result<RunSummary, PipelineError> {
    let catalog = Catalog::installed();
    let registry = GeneratorRegistry::discover(&config.registry_config(&catalog), &catalog);
    let connector = SqlxConnector::new(config.connection.connect_options());
    Pipeline::new(&registry, connector).run(&request).await
}

/// Registry over the installed generators only.
pub fn builtin_registry() -> GeneratorRegistry {
    GeneratorRegistry::discover(&RegistryConfig::builtin(), &Catalog::installed())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn terminal_states() {
        assert!(RunState::Done.is_terminal());
        assert!(RunState::Failed("x".to_string()).is_terminal());
        assert!(!RunState::Writing.is_terminal());
        assert_eq!(RunState::GeneratorResolved.to_string(), "generator_resolved");
    }

    #[test]
    fn request_defaults_match_cli_defaults() {
        let request = GenerateRequest::new("postgresql://localhost/app");
        assert_eq!(request.generator, "declarative");
        assert!(request.include_views);
        assert!(request.schemas.is_empty());
        assert!(request.outfile.is_none());
    }
}

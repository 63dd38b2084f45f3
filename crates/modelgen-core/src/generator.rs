use thiserror::Error;

use crate::endpoint::EndpointInfo;
use crate::model::MetadataModel;
use crate::options::GeneratorOptions;

/// Errors raised while constructing or running a generator.
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("invalid generator option: {0}")]
    InvalidOption(String),
    #[error("serialization error: {0}")]
    Serialization(String),
    #[error("generation failed: {0}")]
    Failed(String),
}

/// A generator bound to one model; produces the generated text once.
pub trait Generator {
    fn generate(&self) -> Result<String, GenerationError>;
}

/// Builds generators from a reflected model, the endpoint that produced it,
/// and the user's options.
pub trait GeneratorFactory: Send + Sync {
    /// Name the factory is installed under.
    fn name(&self) -> &'static str;

    fn create<'a>(
        &self,
        model: &'a MetadataModel,
        endpoint: &'a EndpointInfo,
        options: GeneratorOptions,
    ) -> Result<Box<dyn Generator + 'a>, GenerationError>;
}

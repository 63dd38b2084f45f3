//! Passthrough generator: the reflected model as JSON.

use modelgen_core::{
    EndpointInfo, GenerationError, Generator, GeneratorFactory, GeneratorOptions, MetadataModel,
};

use crate::check_options;

#[derive(Debug, Clone, Copy, Default)]
pub struct JsonFactory;

impl JsonFactory {
    pub const NAME: &'static str = "json";
    const OPTIONS: &'static [&'static str] = &["compact"];
}

impl GeneratorFactory for JsonFactory {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn create<'a>(
        &self,
        model: &'a MetadataModel,
        _endpoint: &'a EndpointInfo,
        options: GeneratorOptions,
    ) -> Result<Box<dyn Generator + 'a>, GenerationError> {
        check_options(Self::NAME, &options, Self::OPTIONS)?;
        Ok(Box::new(JsonGenerator {
            model,
            compact: options.contains("compact"),
        }))
    }
}

/// Serializes the model unchanged, pretty-printed unless `compact` is set.
pub struct JsonGenerator<'a> {
    model: &'a MetadataModel,
    compact: bool,
}

impl Generator for JsonGenerator<'_> {
    fn generate(&self) -> Result<String, GenerationError> {
        let mut text = if self.compact {
            serde_json::to_string(self.model)
        } else {
            serde_json::to_string_pretty(self.model)
        }
        .map_err(|err| GenerationError::Serialization(err.to_string()))?;
        text.push('\n');
        Ok(text)
    }
}

//! Built-in code generators.
//!
//! Each generator lives in its own module and is exposed to the registry
//! only through [`installed`], which hands out constructors so that nothing
//! is instantiated until a generator is actually selected.

pub mod code_builder;
pub mod declarative;
pub mod json;
pub mod naming;
pub mod tables;
pub mod type_map;

use modelgen_core::{GenerationError, GeneratorFactory, GeneratorOptions};

pub use declarative::DeclarativeFactory;
pub use json::JsonFactory;
pub use tables::TablesFactory;

/// Constructor for an installed generator factory.
pub type FactoryLoader = fn() -> Box<dyn GeneratorFactory>;

/// Installed generators as `(id, loader)` pairs, in a fixed order.
pub fn installed() -> Vec<(&'static str, FactoryLoader)> {
    vec![
        (DeclarativeFactory::NAME, load_declarative as FactoryLoader),
        (TablesFactory::NAME, load_tables as FactoryLoader),
        (JsonFactory::NAME, load_json as FactoryLoader),
    ]
}

fn load_declarative() -> Box<dyn GeneratorFactory> {
    Box::new(DeclarativeFactory)
}

fn load_tables() -> Box<dyn GeneratorFactory> {
    Box::new(TablesFactory)
}

fn load_json() -> Box<dyn GeneratorFactory> {
    Box::new(JsonFactory)
}

/// Reject options a generator does not understand.
///
/// `key=value` entries are checked by key.
pub(crate) fn check_options(
    generator: &str,
    options: &GeneratorOptions,
    valid: &[&str],
) -> Result<(), GenerationError> {
    let unknown: Vec<&str> = options
        .iter()
        .filter(|option| {
            let key = option.split_once('=').map_or(*option, |(key, _)| key);
            !valid.contains(&key)
        })
        .collect();

    if unknown.is_empty() {
        Ok(())
    } else {
        Err(GenerationError::InvalidOption(format!(
            "{generator} does not recognize: {}",
            unknown.join(", ")
        )))
    }
}

/// Header line shared by the text generators.
pub(crate) fn header(prefix: &str, dialect: &str) -> String {
    format!("{prefix} Generated by modelgen from a {dialect} database. Do not edit.")
}

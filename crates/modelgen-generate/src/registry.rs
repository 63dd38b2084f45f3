use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use modelgen_core::GeneratorFactory;
use modelgen_generators::FactoryLoader;

use crate::errors::RegistryError;

/// Plugin group every generator registration must belong to.
pub const GENERATOR_GROUP: &str = "modelgen.generators.v1";

/// Target prefix for generators compiled into this binary.
pub const BUILTIN_TARGET: &str = "builtin:";

/// One registration: `name` resolves to the generator module at `target`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PluginEntry {
    pub group: String,
    pub name: String,
    pub target: String,
}

impl PluginEntry {
    pub fn builtin(name: &str, id: &str) -> Self {
        Self {
            group: GENERATOR_GROUP.to_string(),
            name: name.to_string(),
            target: format!("{BUILTIN_TARGET}{id}"),
        }
    }
}

/// Registrations in the order they were declared.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegistryConfig {
    pub plugins: Vec<PluginEntry>,
}

impl RegistryConfig {
    /// Every installed generator under its own name.
    pub fn builtin() -> Self {
        Self::builtin_for(&Catalog::installed())
    }

    pub fn builtin_for(catalog: &Catalog) -> Self {
        Self {
            plugins: catalog
                .ids()
                .map(|id| PluginEntry::builtin(id, id))
                .collect(),
        }
    }
}

/// Generator modules compiled into this binary, by id.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    loaders: BTreeMap<&'static str, FactoryLoader>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn installed() -> Self {
        modelgen_generators::installed()
            .into_iter()
            .fold(Self::new(), |catalog, (id, loader)| catalog.with(id, loader))
    }

    pub fn with(mut self, id: &'static str, loader: FactoryLoader) -> Self {
        self.loaders.insert(id, loader);
        self
    }

    pub fn ids(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.loaders.keys().copied()
    }

    fn loader(&self, target: &str) -> Option<FactoryLoader> {
        let id = target.strip_prefix(BUILTIN_TARGET)?;
        self.loaders.get(id).copied()
    }
}

/// Name to generator table, built once per run.
#[derive(Debug, Clone)]
pub struct GeneratorRegistry {
    targets: BTreeMap<String, String>,
    catalog: Catalog,
}

impl GeneratorRegistry {
    /// Build the table from `config`, ignoring entries outside
    /// [`GENERATOR_GROUP`]. A later entry replaces an earlier one of the same
    /// name. Nothing is loaded here.
    pub fn discover(config: &RegistryConfig, catalog: &Catalog) -> Self {
        let mut targets = BTreeMap::new();
        for entry in &config.plugins {
            if entry.group != GENERATOR_GROUP {
                tracing::debug!(
                    event = "plugin_skipped",
                    name = %entry.name,
                    group = %entry.group
                );
                continue;
            }
            if let Some(previous) = targets.insert(entry.name.clone(), entry.target.clone()) {
                tracing::debug!(
                    event = "plugin_replaced",
                    name = %entry.name,
                    previous = %previous,
                    target = %entry.target
                );
            }
        }

        Self {
            targets,
            catalog: catalog.clone(),
        }
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<String> {
        self.targets.keys().cloned().collect()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.targets.contains_key(name)
    }

    pub fn resolve(&self, name: &str) -> Result<LazyGenerator<'_>, RegistryError> {
        match self.targets.get_key_value(name) {
            Some((name, target)) => Ok(LazyGenerator {
                name,
                target,
                catalog: &self.catalog,
            }),
            None => Err(RegistryError::UnknownGenerator {
                name: name.to_string(),
                available: self.names(),
            }),
        }
    }
}

/// A registered generator whose module has not been loaded yet.
#[derive(Debug, Clone, Copy)]
pub struct LazyGenerator<'r> {
    name: &'r str,
    target: &'r str,
    catalog: &'r Catalog,
}

impl LazyGenerator<'_> {
    pub fn name(&self) -> &str {
        self.name
    }

    pub fn target(&self) -> &str {
        self.target
    }

    pub fn load(&self) -> Result<Box<dyn GeneratorFactory>, RegistryError> {
        let loader = self
            .catalog
            .loader(self.target)
            .ok_or_else(|| RegistryError::Unloadable {
                name: self.name.to_string(),
                target: self.target.to_string(),
            })?;
        Ok(loader())
    }
}

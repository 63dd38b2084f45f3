use std::collections::BTreeSet;

use tracing::Instrument;

use modelgen_core::{MetadataModel, validate_model};

use crate::endpoint::{Endpoint, ReflectRequest};
use crate::errors::ReflectionError;

/// Allow-list of table names. Empty means every object; blank names are
/// ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TableFilter {
    names: BTreeSet<String>,
}

impl TableFilter {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn only<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            names: names
                .into_iter()
                .map(Into::into)
                .filter(|name: &String| !name.trim().is_empty())
                .collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn allows(&self, name: &str) -> bool {
        self.names.is_empty() || self.names.contains(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }
}

/// Populates one [`MetadataModel`] from an endpoint, one schema at a time.
#[derive(Debug, Clone)]
pub struct MetadataReflector {
    schemas: Vec<Option<String>>,
    tables: TableFilter,
    include_views: bool,
}

impl Default for MetadataReflector {
    fn default() -> Self {
        Self {
            schemas: vec![None],
            tables: TableFilter::all(),
            include_views: true,
        }
    }
}

impl MetadataReflector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schemas to reflect, in order. `None` is the default namespace; blank
    /// names are dropped and an empty list means the default namespace only.
    pub fn schemas(mut self, schemas: Vec<Option<String>>) -> Self {
        let schemas: Vec<Option<String>> = schemas
            .into_iter()
            .filter(|schema| !schema.as_deref().is_some_and(|name| name.trim().is_empty()))
            .collect();
        self.schemas = if schemas.is_empty() { vec![None] } else { schemas };
        self
    }

    pub fn tables(mut self, tables: TableFilter) -> Self {
        self.tables = tables;
        self
    }

    pub fn include_views(mut self, include_views: bool) -> Self {
        self.include_views = include_views;
        self
    }

    /// Reflect every configured schema into a fresh model.
    ///
    /// The first failing schema aborts the whole run; the partially filled
    /// model is dropped.
    pub async fn reflect(&self, endpoint: &dyn Endpoint) -> Result<MetadataModel, ReflectionError> {
        let mut model = MetadataModel::new();

        for schema in &self.schemas {
            let label = schema.as_deref().unwrap_or("<default>").to_string();
            let request = ReflectRequest {
                schema: schema.clone(),
                tables: self.tables.clone(),
                include_views: self.include_views,
            };

            let span = tracing::info_span!("reflect_schema", schema = %label);
            let tables = endpoint
                .reflect_schema(&request)
                .instrument(span)
                .await
                .map_err(|err| ReflectionError::from_endpoint(label.clone(), err))?;

            let discovered = tables.len();
            let mut added = 0usize;
            for mut table in tables {
                if !self.tables.allows(&table.name) {
                    continue;
                }
                if !self.include_views && table.kind.is_view() {
                    continue;
                }
                table.schema = schema.clone();
                if model.insert_if_absent(table) {
                    added += 1;
                }
            }

            tracing::info!(
                event = "schema_reflected",
                schema = %label,
                discovered = discovered,
                added = added
            );
        }

        validate_model(&model)?;
        Ok(model)
    }
}

/// Reflect `schemas` in order into a single model.
pub async fn reflect(
    endpoint: &dyn Endpoint,
    schemas: &[Option<String>],
    table_filter: &TableFilter,
    include_views: bool,
) -> Result<MetadataModel, ReflectionError> {
    MetadataReflector::new()
        .schemas(schemas.to_vec())
        .tables(table_filter.clone())
        .include_views(include_views)
        .reflect(endpoint)
        .await
}

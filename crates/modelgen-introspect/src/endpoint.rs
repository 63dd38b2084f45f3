use async_trait::async_trait;

use modelgen_core::{EndpointInfo, Table};

use crate::errors::EndpointError;
use crate::reflect::TableFilter;

/// One structural query against one schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReflectRequest {
    /// Schema to reflect; `None` means the endpoint's default namespace.
    pub schema: Option<String>,
    /// Tables to return; an empty filter means every object in the schema.
    pub tables: TableFilter,
    pub include_views: bool,
}

/// Live handle to a database that can describe its own structure.
///
/// An endpoint is reused for every schema pass of a run and never shared
/// between runs.
#[async_trait]
pub trait Endpoint: Send + Sync {
    fn info(&self) -> &EndpointInfo;

    /// Return the tables (and views, when requested) of a single schema,
    /// with columns, constraints and indexes populated.
    async fn reflect_schema(&self, request: &ReflectRequest) -> Result<Vec<Table>, EndpointError>;
}

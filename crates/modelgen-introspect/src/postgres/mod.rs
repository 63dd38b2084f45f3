use async_trait::async_trait;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;

use modelgen_core::{ConnectionDescriptor, EndpointInfo, EngineConfig, Table};

use crate::connect::ConnectOptions;
use crate::endpoint::{Endpoint, ReflectRequest};
use crate::errors::{ConnectionError, EndpointError};

mod mapper;
mod queries;

/// Endpoint for PostgreSQL databases.
#[derive(Debug, Clone)]
pub struct PostgresEndpoint {
    pool: PgPool,
    info: EndpointInfo,
}

impl PostgresEndpoint {
    /// Create an endpoint over a pre-configured pool.
    pub async fn new(pool: PgPool, info: EndpointInfo) -> Result<Self, EndpointError> {
        let mut info = info;
        if info.default_schema.is_none() {
            info.default_schema = queries::fetch_current_schema(&pool).await?;
        }
        Ok(Self { pool, info })
    }

    /// Open a pool for `descriptor` and resolve the default schema.
    pub async fn connect(
        descriptor: &ConnectionDescriptor,
        config: EngineConfig,
        options: &ConnectOptions,
    ) -> Result<Self, ConnectionError> {
        let transport = |message: String| ConnectionError::Transport {
            target: descriptor.redacted(),
            message,
        };

        let pool = PgPoolOptions::new()
            .max_connections(options.max_connections)
            .acquire_timeout(options.acquire_timeout)
            .connect(&descriptor.to_backend_url())
            .await
            .map_err(|err| transport(err.to_string()))?;

        let info = EndpointInfo::new("postgresql", descriptor.driver_id(), config);
        Self::new(pool, info)
            .await
            .map_err(|err| transport(err.to_string()))
    }

    async fn reflect_table(&self, schema: &str, mut table: Table) -> Result<Table, EndpointError> {
        let raw_columns = queries::list_columns(&self.pool, schema, &table.name).await?;
        table.columns = mapper::map_columns(raw_columns);

        let raw_constraints = queries::list_constraints(&self.pool, schema, &table.name).await?;
        let raw_fks = queries::list_foreign_keys(&self.pool, schema, &table.name).await?;

        let unqualified = if table.schema.is_none() {
            self.info.default_schema.as_deref()
        } else {
            None
        };

        let mut constraints = mapper::map_constraints(raw_constraints);
        constraints.extend(mapper::map_foreign_keys(raw_fks, unqualified));
        mapper::sort_constraints(&mut constraints);
        table.constraints = constraints;

        let raw_indexes = queries::list_indexes(&self.pool, schema, &table.name).await?;
        table.indexes = mapper::map_indexes(raw_indexes);

        Ok(table)
    }
}

#[async_trait]
impl Endpoint for PostgresEndpoint {
    fn info(&self) -> &EndpointInfo {
        &self.info
    }

    async fn reflect_schema(&self, request: &ReflectRequest) -> Result<Vec<Table>, EndpointError> {
        let schema_name = match (&request.schema, &self.info.default_schema) {
            (Some(schema), _) => schema.clone(),
            (None, Some(default)) => default.clone(),
            (None, None) => {
                return Err(EndpointError::Query(
                    "no schema requested and the search path has no default schema".to_string(),
                ));
            }
        };

        let relkinds = mapper::relkinds(request.include_views);
        let raw_tables = queries::list_tables_in_schema(&self.pool, &schema_name, &relkinds).await?;

        let mut tables = Vec::new();
        for raw in raw_tables {
            if !request.tables.allows(&raw.name) {
                continue;
            }
            let table = mapper::map_table(raw, request.schema.as_deref());
            tables.push(self.reflect_table(&schema_name, table).await?);
        }

        Ok(tables)
    }
}

use sqlx::PgPool;

use crate::errors::EndpointError;

pub async fn fetch_current_schema(pool: &PgPool) -> Result<Option<String>, EndpointError> {
    let name = sqlx::query_scalar::<_, Option<String>>("select current_schema()::text")
        .fetch_one(pool)
        .await?;
    Ok(name)
}

#[derive(Debug, sqlx::FromRow)]
pub struct RawTable {
    pub name: String,
    pub relkind: String,
    pub comment: Option<String>,
}

pub async fn list_tables_in_schema(
    pool: &PgPool,
    schema: &str,
    relkinds: &[&str],
) -> Result<Vec<RawTable>, EndpointError> {
    let relkinds: Vec<String> = relkinds.iter().map(|kind| kind.to_string()).collect();
    let rows = sqlx::query_as::<_, RawTable>(
        r#"
        select
          c.relname::text as name,
          c.relkind::text as relkind,
          pg_catalog.obj_description(c.oid, 'pg_class') as comment
        from pg_class c
        join pg_namespace n on n.oid = c.relnamespace
        where n.nspname = $1
          and c.relkind::text = any($2)
          and not c.relispartition
        order by c.relname
        "#,
    )
    .bind(schema)
    .bind(relkinds)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

#[derive(Debug, sqlx::FromRow)]
pub struct RawColumn {
    pub name: String,
    pub data_type: String,
    pub udt_name: String,
    pub is_nullable: bool,
    pub default: Option<String>,
    pub identity_generation: Option<String>,
    pub character_max_length: Option<i32>,
    pub numeric_precision: Option<i32>,
    pub numeric_scale: Option<i32>,
    pub comment: Option<String>,
}

pub async fn list_columns(
    pool: &PgPool,
    schema: &str,
    table: &str,
) -> Result<Vec<RawColumn>, EndpointError> {
    let rows = sqlx::query_as::<_, RawColumn>(
        r#"
        select
          a.attname::text as name,
          pg_catalog.format_type(a.atttypid, a.atttypmod) as data_type,
          t.typname::text as udt_name,
          (not a.attnotnull) as is_nullable,
          pg_get_expr(ad.adbin, ad.adrelid) as "default",
          case
            when a.attidentity = 'a' then 'ALWAYS'
            when a.attidentity = 'd' then 'BY DEFAULT'
            else null
          end as identity_generation,
          ic.character_maximum_length::int4 as character_max_length,
          ic.numeric_precision::int4 as numeric_precision,
          ic.numeric_scale::int4 as numeric_scale,
          pg_catalog.col_description(a.attrelid, a.attnum) as comment
        from pg_attribute a
        join pg_class c on c.oid = a.attrelid
        join pg_namespace n on n.oid = c.relnamespace
        join pg_type t on t.oid = a.atttypid
        left join pg_attrdef ad on ad.adrelid = a.attrelid and ad.adnum = a.attnum
        left join information_schema.columns ic
          on ic.table_schema = n.nspname and ic.table_name = c.relname and ic.column_name = a.attname
        where n.nspname = $1
          and c.relname = $2
          and a.attnum > 0
          and not a.attisdropped
        order by a.attnum
        "#,
    )
    .bind(schema)
    .bind(table)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// Primary key, unique and check constraints share one shape.
#[derive(Debug, sqlx::FromRow)]
pub struct RawConstraint {
    pub name: String,
    pub contype: String,
    pub columns: Vec<String>,
    pub expression: Option<String>,
}

pub async fn list_constraints(
    pool: &PgPool,
    schema: &str,
    table: &str,
) -> Result<Vec<RawConstraint>, EndpointError> {
    let rows = sqlx::query_as::<_, RawConstraint>(
        r#"
        select
          con.conname::text as name,
          con.contype::text as contype,
          coalesce(
            array(
              select att.attname::text
              from unnest(con.conkey) with ordinality as ord(attnum, ordinality)
              join pg_attribute att on att.attrelid = con.conrelid and att.attnum = ord.attnum
              order by ord.ordinality
            ),
            '{}'::text[]
          ) as columns,
          case
            when con.contype = 'c' then pg_get_constraintdef(con.oid, true)
            else null
          end as expression
        from pg_constraint con
        join pg_class rel on rel.oid = con.conrelid
        join pg_namespace nsp on nsp.oid = rel.relnamespace
        where nsp.nspname = $1
          and rel.relname = $2
          and con.contype in ('p', 'u', 'c')
        order by con.contype, con.conname
        "#,
    )
    .bind(schema)
    .bind(table)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

#[derive(Debug, sqlx::FromRow)]
pub struct RawForeignKey {
    pub name: String,
    pub columns: Vec<String>,
    pub referenced_schema: String,
    pub referenced_table: String,
    pub referenced_columns: Vec<String>,
    pub on_update_code: String,
    pub on_delete_code: String,
    pub match_type_code: String,
}

pub async fn list_foreign_keys(
    pool: &PgPool,
    schema: &str,
    table: &str,
) -> Result<Vec<RawForeignKey>, EndpointError> {
    let rows = sqlx::query_as::<_, RawForeignKey>(
        r#"
        select
          con.conname::text as name,
          array(
            select att.attname::text
            from unnest(con.conkey) with ordinality as ord(attnum, ordinality)
            join pg_attribute att on att.attrelid = con.conrelid and att.attnum = ord.attnum
            order by ord.ordinality
          ) as columns,
          ref_nsp.nspname::text as referenced_schema,
          ref_rel.relname::text as referenced_table,
          array(
            select att.attname::text
            from unnest(con.confkey) with ordinality as ord(attnum, ordinality)
            join pg_attribute att on att.attrelid = con.confrelid and att.attnum = ord.attnum
            order by ord.ordinality
          ) as referenced_columns,
          con.confupdtype::text as on_update_code,
          con.confdeltype::text as on_delete_code,
          con.confmatchtype::text as match_type_code
        from pg_constraint con
        join pg_class src_rel on src_rel.oid = con.conrelid
        join pg_namespace src_nsp on src_nsp.oid = src_rel.relnamespace
        join pg_class ref_rel on ref_rel.oid = con.confrelid
        join pg_namespace ref_nsp on ref_nsp.oid = ref_rel.relnamespace
        where src_nsp.nspname = $1
          and src_rel.relname = $2
          and con.contype = 'f'
        order by con.conname
        "#,
    )
    .bind(schema)
    .bind(table)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

#[derive(Debug, sqlx::FromRow)]
pub struct RawIndex {
    pub name: String,
    pub columns: Vec<String>,
    pub is_unique: bool,
    pub definition: String,
}

/// Indexes that do not back a constraint; constraint indexes are already
/// represented by the constraint itself.
pub async fn list_indexes(
    pool: &PgPool,
    schema: &str,
    table: &str,
) -> Result<Vec<RawIndex>, EndpointError> {
    let rows = sqlx::query_as::<_, RawIndex>(
        r#"
        select
          idx.relname::text as name,
          array(
            select att.attname::text
            from unnest(i.indkey::int2[]) with ordinality as ord(attnum, ordinality)
            join pg_attribute att on att.attrelid = i.indrelid and att.attnum = ord.attnum
            order by ord.ordinality
          ) as columns,
          i.indisunique as is_unique,
          pg_get_indexdef(i.indexrelid) as definition
        from pg_index i
        join pg_class tbl on tbl.oid = i.indrelid
        join pg_namespace nsp on nsp.oid = tbl.relnamespace
        join pg_class idx on idx.oid = i.indexrelid
        where nsp.nspname = $1
          and tbl.relname = $2
          and not exists (
            select 1
            from pg_constraint con
            where con.conindid = i.indexrelid
              and con.conrelid = i.indrelid
              and con.contype in ('p', 'u', 'x')
          )
        order by idx.relname
        "#,
    )
    .bind(schema)
    .bind(table)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

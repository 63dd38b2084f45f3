//! SQL column types to Rust field types.

use modelgen_core::{Column, ColumnType};

/// Maps reflected column types to Rust type syntax for one dialect.
#[derive(Debug, Clone, Copy)]
pub struct RustTypeMapper<'a> {
    dialect: &'a str,
}

impl<'a> RustTypeMapper<'a> {
    pub fn new(dialect: &'a str) -> Self {
        Self { dialect }
    }

    /// Field type for `column`, wrapped in `Option` when nullable.
    pub fn map_column(&self, column: &Column) -> String {
        let inner = self.map_type(&column.column_type);
        if column.is_nullable {
            self.map_optional(&inner)
        } else {
            inner
        }
    }

    pub fn map_type(&self, column_type: &ColumnType) -> String {
        let scalar = self.map_scalar(&column_type.base_name()).to_string();
        if column_type.is_array() {
            self.map_array(&scalar)
        } else {
            scalar
        }
    }

    fn map_scalar(&self, base: &str) -> &'static str {
        // SQLite stores every INTEGER affinity column as a 64-bit value.
        if self.dialect == "sqlite" && base.contains("int") {
            return "i64";
        }

        match base {
            "bool" | "boolean" => "bool",
            "int2" | "smallint" | "smallserial" | "tinyint" => "i16",
            "int4" | "int" | "integer" | "serial" | "mediumint" => "i32",
            "int8" | "bigint" | "bigserial" => "i64",
            "float4" | "real" => "f32",
            "float8" | "double" | "double precision" | "float" => "f64",
            "numeric" | "decimal" | "money" => "rust_decimal::Decimal",
            "text" | "varchar" | "character varying" | "bpchar" | "char" | "character" | "name"
            | "citext" | "nvarchar" | "nchar" | "clob" => "String",
            "bytea" | "blob" | "binary" | "varbinary" => "Vec<u8>",
            "uuid" | "uniqueidentifier" => "uuid::Uuid",
            "json" | "jsonb" => "serde_json::Value",
            "date" => "chrono::NaiveDate",
            "time" | "timetz" => "chrono::NaiveTime",
            "timestamp" | "datetime" => "chrono::NaiveDateTime",
            "timestamptz" => "chrono::DateTime<chrono::Utc>",
            "interval" => "std::time::Duration",
            "inet" | "cidr" => "std::net::IpAddr",
            _ => "String",
        }
    }

    fn map_optional(&self, inner: &str) -> String {
        format!("Option<{inner}>")
    }

    fn map_array(&self, inner: &str) -> String {
        format!("Vec<{inner}>")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn column(udt: &str, nullable: bool) -> Column {
        Column::new("c", ColumnType::named(udt), nullable)
    }

    #[test]
    fn maps_postgres_types() {
        let mapper = RustTypeMapper::new("postgresql");
        assert_eq!(mapper.map_column(&column("int4", false)), "i32");
        assert_eq!(mapper.map_column(&column("text", true)), "Option<String>");
        assert_eq!(mapper.map_column(&column("timestamptz", false)), "chrono::DateTime<chrono::Utc>");
        assert_eq!(mapper.map_column(&column("_int8", false)), "Vec<i64>");
        assert_eq!(mapper.map_column(&column("tsvector", false)), "String");
    }

    #[test]
    fn sqlite_integers_are_64_bit() {
        let mapper = RustTypeMapper::new("sqlite");
        assert_eq!(mapper.map_column(&column("INTEGER", false)), "i64");
        assert_eq!(mapper.map_column(&column("TEXT", true)), "Option<String>");
    }
}

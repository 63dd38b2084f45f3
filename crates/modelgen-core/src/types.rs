use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Formatted and raw type metadata for a column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ColumnType {
    /// User-friendly formatted type (e.g. `character varying(255)`).
    pub data_type: String,
    /// Name of the underlying type (e.g. `varchar`, `int4`).
    pub udt_name: String,
    pub character_max_length: Option<i32>,
    pub numeric_precision: Option<i32>,
    pub numeric_scale: Option<i32>,
}

impl ColumnType {
    /// Build a type whose formatted and underlying names coincide.
    pub fn named(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            data_type: name.clone(),
            udt_name: name,
            character_max_length: None,
            numeric_precision: None,
            numeric_scale: None,
        }
    }

    /// Lower-cased underlying type name with array markers stripped.
    pub fn base_name(&self) -> String {
        let name = self.udt_name.trim_start_matches('_');
        name.to_ascii_lowercase()
    }

    /// Postgres reports array types with a leading underscore in `udt_name`.
    pub fn is_array(&self) -> bool {
        self.udt_name.starts_with('_') || self.data_type.ends_with("[]")
    }
}

/// Identity generation strategy for columns using `GENERATED ... AS IDENTITY`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum IdentityGeneration {
    Always,
    ByDefault,
}

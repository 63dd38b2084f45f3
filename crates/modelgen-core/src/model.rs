use std::fmt;

use indexmap::IndexMap;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::MODEL_VERSION;
use crate::constraints::{ColumnConstraint, Constraint, Index};
use crate::types::{ColumnType, IdentityGeneration};

/// Unified structural model assembled from one or more schema passes.
///
/// Tables keep the order in which reflection discovered them. The model is
/// append-only: [`MetadataModel::insert_if_absent`] never replaces a table
/// whose name is already present, whichever schema it came from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct MetadataModel {
    /// Contract version for this model format.
    pub model_version: String,
    /// Tables and views keyed by their qualified name (`schema.table`).
    pub tables: IndexMap<String, Table>,
}

impl Default for MetadataModel {
    fn default() -> Self {
        Self {
            model_version: MODEL_VERSION.to_string(),
            tables: IndexMap::new(),
        }
    }
}

impl MetadataModel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    /// Whether any table of this name is present, regardless of schema.
    pub fn contains_name(&self, name: &str) -> bool {
        self.tables.values().any(|table| table.name == name)
    }

    /// Insert `table` unless a table with the same name already exists.
    ///
    /// Returns `true` when the table was added.
    pub fn insert_if_absent(&mut self, table: Table) -> bool {
        if self.contains_name(&table.name) {
            return false;
        }
        self.tables.insert(table.key().to_string(), table);
        true
    }

    pub fn get(&self, key: &TableKey) -> Option<&Table> {
        self.tables.get(&key.to_string())
    }

    /// Find a table by bare name.
    pub fn find(&self, name: &str) -> Option<&Table> {
        self.tables.values().find(|table| table.name == name)
    }

    pub fn tables(&self) -> impl Iterator<Item = &Table> {
        self.tables.values()
    }
}

/// Identity of a table inside a [`MetadataModel`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TableKey {
    pub schema: Option<String>,
    pub name: String,
}

impl TableKey {
    pub fn new(schema: Option<&str>, name: &str) -> Self {
        Self {
            schema: schema.map(str::to_string),
            name: name.to_string(),
        }
    }
}

impl fmt::Display for TableKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.schema {
            Some(schema) => write!(f, "{schema}.{}", self.name),
            None => f.write_str(&self.name),
        }
    }
}

/// A table-like object (table, view, materialized view, foreign table, partitioned table).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Table {
    /// Schema the table was reflected from; `None` for the default namespace.
    pub schema: Option<String>,
    pub name: String,
    pub kind: TableKind,
    pub comment: Option<String>,
    pub columns: Vec<Column>,
    pub constraints: Vec<Constraint>,
    pub indexes: Vec<Index>,
}

impl Table {
    /// An empty base table, handy for adapters and tests.
    pub fn new(schema: Option<&str>, name: impl Into<String>) -> Self {
        Self {
            schema: schema.map(str::to_string),
            name: name.into(),
            kind: TableKind::Table,
            comment: None,
            columns: Vec::new(),
            constraints: Vec::new(),
            indexes: Vec::new(),
        }
    }

    pub fn key(&self) -> TableKey {
        TableKey::new(self.schema.as_deref(), &self.name)
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|column| column.name == name)
    }

    pub fn primary_key_columns(&self) -> &[String] {
        self.constraints
            .iter()
            .find_map(|constraint| match constraint {
                Constraint::PrimaryKey(pk) => Some(pk.columns.as_slice()),
                _ => None,
            })
            .unwrap_or(&[])
    }

    /// Constraint memberships of a single column, in constraint order.
    ///
    /// Only single-column unique constraints count as column-level uniqueness.
    pub fn column_constraints(&self, column: &str) -> Vec<ColumnConstraint> {
        let mut memberships = Vec::new();
        for constraint in &self.constraints {
            match constraint {
                Constraint::PrimaryKey(pk) => {
                    if pk.columns.iter().any(|name| name == column) {
                        memberships.push(ColumnConstraint::PrimaryKey);
                    }
                }
                Constraint::ForeignKey(fk) => {
                    if let Some(position) = fk.columns.iter().position(|name| name == column) {
                        if let Some(target) = fk.referenced_columns.get(position) {
                            memberships.push(ColumnConstraint::ForeignKey {
                                schema: fk.referenced_schema.clone(),
                                table: fk.referenced_table.clone(),
                                column: target.clone(),
                            });
                        }
                    }
                }
                Constraint::Unique(unique) => {
                    if unique.columns.len() == 1 && unique.columns[0] == column {
                        memberships.push(ColumnConstraint::Unique);
                    }
                }
                Constraint::Check(check) => {
                    if check.columns.iter().any(|name| name == column) {
                        memberships.push(ColumnConstraint::Check(check.expression.clone()));
                    }
                }
            }
        }
        memberships
    }
}

/// Kind of table represented in the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum TableKind {
    Table,
    PartitionedTable,
    View,
    MaterializedView,
    ForeignTable,
    Other(String),
}

impl TableKind {
    pub fn is_view(&self) -> bool {
        matches!(self, TableKind::View | TableKind::MaterializedView)
    }
}

/// Column metadata for a table-like object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Column {
    pub name: String,
    pub column_type: ColumnType,
    pub is_nullable: bool,
    pub default: Option<String>,
    pub identity: Option<IdentityGeneration>,
    pub comment: Option<String>,
}

impl Column {
    pub fn new(name: impl Into<String>, column_type: ColumnType, is_nullable: bool) -> Self {
        Self {
            name: name.into(),
            column_type,
            is_nullable,
            default: None,
            identity: None,
            comment: None,
        }
    }
}

use std::collections::BTreeSet;

use crate::constraints::Constraint;
use crate::error::{Error, Result};
use crate::model::MetadataModel;

/// Validate internal consistency of a reflected model.
///
/// This checks:
/// - table keys match the tables they index
/// - duplicate columns within a table
/// - primary key, unique, check and foreign key columns exist on their table
/// - foreign keys pair every local column with a referenced column
///
/// FK targets outside the model are allowed; reflection may be restricted
/// to a subset of tables.
pub fn validate_model(model: &MetadataModel) -> Result<()> {
    for (key, table) in &model.tables {
        let expected = table.key().to_string();
        if key != &expected {
            return Err(Error::InvalidModel(format!(
                "table {expected} stored under key {key}"
            )));
        }

        let mut columns = BTreeSet::new();
        for column in &table.columns {
            if !columns.insert(column.name.as_str()) {
                return Err(Error::InvalidModel(format!(
                    "duplicate column name: {key}.{}",
                    column.name
                )));
            }
        }

        for constraint in &table.constraints {
            let label = constraint_label(constraint);
            for column in constraint.columns() {
                if !columns.contains(column.as_str()) {
                    return Err(Error::InvalidModel(format!(
                        "{label} column not found: {key}.{column}"
                    )));
                }
            }

            if let Constraint::ForeignKey(fk) = constraint {
                if fk.columns.len() != fk.referenced_columns.len() {
                    return Err(Error::InvalidModel(format!(
                        "foreign key {} on {key} pairs {} columns with {} referenced columns",
                        fk.name.as_deref().unwrap_or("<unnamed>"),
                        fk.columns.len(),
                        fk.referenced_columns.len()
                    )));
                }
            }
        }

        for index in &table.indexes {
            for column in &index.columns {
                if !columns.contains(column.as_str()) {
                    return Err(Error::InvalidModel(format!(
                        "index column not found: {key}.{column}"
                    )));
                }
            }
        }
    }

    Ok(())
}

fn constraint_label(constraint: &Constraint) -> &'static str {
    match constraint {
        Constraint::PrimaryKey(_) => "primary key",
        Constraint::ForeignKey(_) => "foreign key",
        Constraint::Unique(_) => "unique",
        Constraint::Check(_) => "check",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constraints::{FkAction, FkMatchType, ForeignKey, PrimaryKey};
    use crate::model::{Column, Table};
    use crate::types::ColumnType;

    fn users() -> Table {
        let mut table = Table::new(None, "users");
        table.columns = vec![
            Column::new("id", ColumnType::named("int4"), false),
            Column::new("name", ColumnType::named("text"), true),
        ];
        table.constraints = vec![Constraint::PrimaryKey(PrimaryKey {
            name: None,
            columns: vec!["id".to_string()],
        })];
        table
    }

    #[test]
    fn accepts_consistent_model() {
        let mut model = MetadataModel::new();
        model.insert_if_absent(users());
        validate_model(&model).expect("valid model");
    }

    #[test]
    fn rejects_duplicate_columns() {
        let mut table = users();
        table
            .columns
            .push(Column::new("name", ColumnType::named("text"), true));
        let mut model = MetadataModel::new();
        model.insert_if_absent(table);

        let err = validate_model(&model).expect_err("duplicate column");
        assert!(err.to_string().contains("duplicate column name: users.name"));
    }

    #[test]
    fn rejects_missing_constraint_columns() {
        let mut table = users();
        table.constraints.push(Constraint::ForeignKey(ForeignKey {
            name: Some("fk_org".to_string()),
            columns: vec!["org_id".to_string()],
            referenced_schema: None,
            referenced_table: "orgs".to_string(),
            referenced_columns: vec!["id".to_string()],
            on_update: FkAction::NoAction,
            on_delete: FkAction::NoAction,
            match_type: FkMatchType::Simple,
        }));
        let mut model = MetadataModel::new();
        model.insert_if_absent(table);

        let err = validate_model(&model).expect_err("missing fk column");
        assert!(err.to_string().contains("foreign key column not found: users.org_id"));
    }
}

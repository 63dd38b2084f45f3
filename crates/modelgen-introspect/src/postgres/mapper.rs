use modelgen_core::{
    CheckConstraint, Column, ColumnType, Constraint, FkAction, FkMatchType, ForeignKey,
    IdentityGeneration, Index, PrimaryKey, Table, TableKind, UniqueConstraint,
};

use super::queries::{RawColumn, RawConstraint, RawForeignKey, RawIndex, RawTable};

/// `relkind` codes requested for a schema pass.
pub fn relkinds(include_views: bool) -> Vec<&'static str> {
    let mut kinds = vec!["r", "p", "f"];
    if include_views {
        kinds.extend(["v", "m"]);
    }
    kinds
}

pub fn map_table(raw: RawTable, schema: Option<&str>) -> Table {
    let mut table = Table::new(schema, raw.name);
    table.kind = relkind_to_table_kind(&raw.relkind);
    table.comment = raw.comment;
    table
}

pub fn map_columns(raw: Vec<RawColumn>) -> Vec<Column> {
    raw.into_iter()
        .map(|col| Column {
            name: col.name,
            column_type: ColumnType {
                data_type: col.data_type,
                udt_name: col.udt_name,
                character_max_length: col.character_max_length,
                numeric_precision: col.numeric_precision,
                numeric_scale: col.numeric_scale,
            },
            is_nullable: col.is_nullable,
            default: col.default,
            identity: identity_from_text(col.identity_generation.as_deref()),
            comment: col.comment,
        })
        .collect()
}

pub fn map_constraints(raw: Vec<RawConstraint>) -> Vec<Constraint> {
    raw.into_iter()
        .filter_map(|con| match con.contype.as_str() {
            "p" => Some(Constraint::PrimaryKey(PrimaryKey {
                name: Some(con.name),
                columns: con.columns,
            })),
            "u" => Some(Constraint::Unique(UniqueConstraint {
                name: Some(con.name),
                columns: con.columns,
            })),
            "c" => Some(Constraint::Check(CheckConstraint {
                name: Some(con.name),
                columns: con.columns,
                expression: con.expression.map(strip_check).unwrap_or_default(),
            })),
            _ => None,
        })
        .collect()
}

/// Map foreign keys, leaving targets in the default schema unqualified when
/// the table itself was reflected from the default namespace.
pub fn map_foreign_keys(raw: Vec<RawForeignKey>, unqualified_schema: Option<&str>) -> Vec<Constraint> {
    raw.into_iter()
        .map(|fk| {
            let referenced_schema = if unqualified_schema == Some(fk.referenced_schema.as_str()) {
                None
            } else {
                Some(fk.referenced_schema)
            };
            Constraint::ForeignKey(ForeignKey {
                name: Some(fk.name),
                columns: fk.columns,
                referenced_schema,
                referenced_table: fk.referenced_table,
                referenced_columns: fk.referenced_columns,
                on_update: fk_action_from_code(&fk.on_update_code),
                on_delete: fk_action_from_code(&fk.on_delete_code),
                match_type: fk_match_from_code(&fk.match_type_code),
            })
        })
        .collect()
}

pub fn map_indexes(raw: Vec<RawIndex>) -> Vec<Index> {
    raw.into_iter()
        .map(|idx| Index {
            name: idx.name,
            columns: idx.columns,
            is_unique: idx.is_unique,
            definition: Some(idx.definition),
        })
        .collect()
}

pub fn sort_constraints(constraints: &mut [Constraint]) {
    constraints.sort_by(|left, right| constraint_key(left).cmp(&constraint_key(right)));
}

fn constraint_key(constraint: &Constraint) -> (u8, String, String) {
    let rank = match constraint {
        Constraint::PrimaryKey(_) => 0,
        Constraint::Unique(_) => 1,
        Constraint::Check(_) => 2,
        Constraint::ForeignKey(_) => 3,
    };
    (
        rank,
        constraint.name().unwrap_or_default().to_string(),
        constraint.columns().join("|"),
    )
}

/// `pg_get_constraintdef` renders checks as `CHECK ((expr))`; keep only `expr`.
fn strip_check(definition: String) -> String {
    let trimmed = definition.trim();
    let Some(inner) = trimmed
        .strip_prefix("CHECK")
        .map(str::trim)
        .and_then(|rest| rest.strip_prefix('('))
        .and_then(|rest| rest.strip_suffix(')'))
    else {
        return definition;
    };
    let inner = inner.trim();
    match inner.strip_prefix('(').and_then(|rest| rest.strip_suffix(')')) {
        Some(unwrapped) if balanced(unwrapped) => unwrapped.to_string(),
        _ => inner.to_string(),
    }
}

fn balanced(expr: &str) -> bool {
    let mut depth = 0i32;
    for ch in expr.chars() {
        match ch {
            '(' => depth += 1,
            ')' => {
                depth -= 1;
                if depth < 0 {
                    return false;
                }
            }
            _ => {}
        }
    }
    depth == 0
}

/// Convert Postgres `relkind` code to a typed table kind.
pub fn relkind_to_table_kind(code: &str) -> TableKind {
    match code {
        "r" => TableKind::Table,
        "p" => TableKind::PartitionedTable,
        "v" => TableKind::View,
        "m" => TableKind::MaterializedView,
        "f" => TableKind::ForeignTable,
        other => TableKind::Other(other.to_string()),
    }
}

/// Convert FK action code to a descriptive enum.
pub fn fk_action_from_code(code: &str) -> FkAction {
    match code {
        "a" => FkAction::NoAction,
        "r" => FkAction::Restrict,
        "c" => FkAction::Cascade,
        "n" => FkAction::SetNull,
        "d" => FkAction::SetDefault,
        _ => FkAction::Unknown,
    }
}

/// Convert FK match type code to enum.
pub fn fk_match_from_code(code: &str) -> FkMatchType {
    match code {
        "f" => FkMatchType::Full,
        "p" => FkMatchType::Partial,
        "s" => FkMatchType::Simple,
        _ => FkMatchType::Unknown,
    }
}

fn identity_from_text(identity: Option<&str>) -> Option<IdentityGeneration> {
    match identity {
        Some("ALWAYS") => Some(IdentityGeneration::Always),
        Some("BY DEFAULT") => Some(IdentityGeneration::ByDefault),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_check_wrappers() {
        assert_eq!(strip_check("CHECK ((price > 0))".to_string()), "price > 0");
        assert_eq!(
            strip_check("CHECK ((a > 0) AND (b > 0))".to_string()),
            "(a > 0) AND (b > 0)"
        );
        assert_eq!(strip_check("price > 0".to_string()), "price > 0");
    }

    #[test]
    fn maps_relkinds_and_codes() {
        assert_eq!(relkind_to_table_kind("v"), TableKind::View);
        assert_eq!(relkind_to_table_kind("x"), TableKind::Other("x".to_string()));
        assert_eq!(fk_action_from_code("c"), FkAction::Cascade);
        assert_eq!(fk_match_from_code("s"), FkMatchType::Simple);
        assert_eq!(relkinds(false), vec!["r", "p", "f"]);
        assert_eq!(relkinds(true), vec!["r", "p", "f", "v", "m"]);
    }

    #[test]
    fn foreign_keys_into_default_schema_stay_unqualified() {
        let raw = |schema: &str| RawForeignKey {
            name: "fk".to_string(),
            columns: vec!["user_id".to_string()],
            referenced_schema: schema.to_string(),
            referenced_table: "users".to_string(),
            referenced_columns: vec!["id".to_string()],
            on_update_code: "a".to_string(),
            on_delete_code: "c".to_string(),
            match_type_code: "s".to_string(),
        };

        let mapped = map_foreign_keys(vec![raw("public"), raw("auth")], Some("public"));
        let schemas: Vec<Option<String>> = mapped
            .iter()
            .map(|constraint| match constraint {
                Constraint::ForeignKey(fk) => fk.referenced_schema.clone(),
                _ => unreachable!(),
            })
            .collect();
        assert_eq!(schemas, vec![None, Some("auth".to_string())]);
    }
}

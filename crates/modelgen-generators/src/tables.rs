//! DDL-style listing of the model, referenced tables first.

use modelgen_core::{
    Column, Constraint, EndpointInfo, GenerationError, Generator, GeneratorFactory,
    GeneratorOptions, IdentityGeneration, Index, MetadataModel, Table, TableKind,
    dependency_order,
};

use crate::code_builder::CodeBuilder;
use crate::naming::quote_ident;
use crate::{check_options, header};

#[derive(Debug, Clone, Copy, Default)]
pub struct TablesFactory;

impl TablesFactory {
    pub const NAME: &'static str = "tables";
    const OPTIONS: &'static [&'static str] = &["noindexes", "noconstraints", "nocomments"];
}

impl GeneratorFactory for TablesFactory {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn create<'a>(
        &self,
        model: &'a MetadataModel,
        endpoint: &'a EndpointInfo,
        options: GeneratorOptions,
    ) -> Result<Box<dyn Generator + 'a>, GenerationError> {
        check_options(Self::NAME, &options, Self::OPTIONS)?;
        Ok(Box::new(TablesGenerator {
            model,
            endpoint,
            indexes: !options.contains("noindexes"),
            constraints: !options.contains("noconstraints"),
            comments: !options.contains("nocomments"),
        }))
    }
}

pub struct TablesGenerator<'a> {
    model: &'a MetadataModel,
    endpoint: &'a EndpointInfo,
    indexes: bool,
    constraints: bool,
    comments: bool,
}

impl Generator for TablesGenerator<'_> {
    fn generate(&self) -> Result<String, GenerationError> {
        let order = dependency_order(self.model);
        let mut out = CodeBuilder::spaces().line(&header("--", &self.endpoint.dialect));

        if let Some(cycle) = &order.cycle {
            out = out.line(&format!(
                "-- Foreign keys form a cycle between: {}",
                cycle.join(", ")
            ));
        }

        for key in &order.order {
            let table = self.model.tables.get(key).ok_or_else(|| {
                GenerationError::Failed(format!("dependency order names unknown table {key}"))
            })?;
            out = out.blank();
            out = if table.kind.is_view() {
                self.write_view(out, table)
            } else {
                self.write_table(out, table)
            };
        }

        Ok(out.build())
    }
}

impl TablesGenerator<'_> {
    fn write_table(&self, out: CodeBuilder, table: &Table) -> CodeBuilder {
        let name = qualified_name(table);
        let mut body: Vec<String> = table.columns.iter().map(column_definition).collect();
        if self.constraints {
            body.extend(table.constraints.iter().map(constraint_definition));
        }

        let last = body.len().saturating_sub(1);
        let out = out
            .block_with_close(&format!("CREATE TABLE {name} ("), ");", |b| {
                b.each(body.iter().enumerate(), |b, (position, line)| {
                    if position == last {
                        b.line(line)
                    } else {
                        b.line(&format!("{line},"))
                    }
                })
            })
            .when(self.indexes, |b| {
                b.each(&table.indexes, |b, index| b.line(&index_definition(&name, index)))
            });

        self.write_comments(out, table, &name)
    }

    fn write_view(&self, out: CodeBuilder, table: &Table) -> CodeBuilder {
        let name = qualified_name(table);
        let columns: Vec<String> = table.columns.iter().map(column_definition).collect();
        let out = out
            .line(&format!("-- {} {name}", view_label(table)))
            .each(columns, |b, column| b.line(&format!("--     {column}")));
        self.write_comments(out, table, &name)
    }

    fn write_comments(&self, out: CodeBuilder, table: &Table, name: &str) -> CodeBuilder {
        if !self.comments {
            return out;
        }
        let object = if table.kind.is_view() { "VIEW" } else { "TABLE" };
        out.when(table.comment.is_some(), |b| {
            let comment = table.comment.as_deref().unwrap_or_default();
            b.line(&format!(
                "COMMENT ON {object} {name} IS {};",
                quote_literal(comment)
            ))
        })
        .each(&table.columns, |b, column| match &column.comment {
            Some(comment) => b.line(&format!(
                "COMMENT ON COLUMN {name}.{} IS {};",
                quote_ident(&column.name),
                quote_literal(comment)
            )),
            None => b,
        })
    }
}

fn view_label(table: &Table) -> &'static str {
    match table.kind {
        TableKind::MaterializedView => "materialized view",
        _ => "view",
    }
}

fn qualified_name(table: &Table) -> String {
    match &table.schema {
        Some(schema) => format!("{}.{}", quote_ident(schema), quote_ident(&table.name)),
        None => quote_ident(&table.name),
    }
}

fn column_definition(column: &Column) -> String {
    let mut definition = format!("{} {}", quote_ident(&column.name), column.column_type.data_type);
    if !column.is_nullable {
        definition.push_str(" NOT NULL");
    }
    match column.identity {
        Some(IdentityGeneration::Always) => definition.push_str(" GENERATED ALWAYS AS IDENTITY"),
        Some(IdentityGeneration::ByDefault) => {
            definition.push_str(" GENERATED BY DEFAULT AS IDENTITY")
        }
        None => {
            if let Some(default) = &column.default {
                definition.push_str(" DEFAULT ");
                definition.push_str(default);
            }
        }
    }
    definition
}

fn column_list(columns: &[String]) -> String {
    columns
        .iter()
        .map(|column| quote_ident(column))
        .collect::<Vec<_>>()
        .join(", ")
}

fn constraint_definition(constraint: &Constraint) -> String {
    let prefix = constraint
        .name()
        .map(|name| format!("CONSTRAINT {} ", quote_ident(name)))
        .unwrap_or_default();

    let body = match constraint {
        Constraint::PrimaryKey(pk) => format!("PRIMARY KEY ({})", column_list(&pk.columns)),
        Constraint::Unique(unique) => format!("UNIQUE ({})", column_list(&unique.columns)),
        Constraint::Check(check) => format!("CHECK ({})", check.expression),
        Constraint::ForeignKey(fk) => {
            let target = match &fk.referenced_schema {
                Some(schema) => format!(
                    "{}.{}",
                    quote_ident(schema),
                    quote_ident(&fk.referenced_table)
                ),
                None => quote_ident(&fk.referenced_table),
            };
            let mut text = format!(
                "FOREIGN KEY ({}) REFERENCES {target} ({})",
                column_list(&fk.columns),
                column_list(&fk.referenced_columns)
            );
            if let Some(action) = fk.on_update.as_sql() {
                text.push_str(" ON UPDATE ");
                text.push_str(action);
            }
            if let Some(action) = fk.on_delete.as_sql() {
                text.push_str(" ON DELETE ");
                text.push_str(action);
            }
            text
        }
    };

    format!("{prefix}{body}")
}

fn index_definition(table: &str, index: &Index) -> String {
    let unique = if index.is_unique { "UNIQUE " } else { "" };
    format!(
        "CREATE {unique}INDEX {} ON {table} ({});",
        quote_ident(&index.name),
        column_list(&index.columns)
    )
}

fn quote_literal(text: &str) -> String {
    format!("'{}'", text.replace('\'', "''"))
}

#[cfg(test)]
mod tests {
    use modelgen_core::{ColumnType, EngineConfig, FkAction, FkMatchType, ForeignKey, PrimaryKey};

    use super::*;

    fn endpoint() -> EndpointInfo {
        EndpointInfo::new("postgresql", "postgresql", EngineConfig::default())
    }

    fn pk(name: &str) -> Constraint {
        Constraint::PrimaryKey(PrimaryKey {
            name: Some(format!("{name}_pkey")),
            columns: vec!["id".to_string()],
        })
    }

    fn model() -> MetadataModel {
        let mut orders = Table::new(None, "orders");
        orders.columns = vec![
            Column::new("id", ColumnType::named("int4"), false),
            Column::new("user_id", ColumnType::named("int4"), false),
        ];
        orders.constraints = vec![
            pk("orders"),
            Constraint::ForeignKey(ForeignKey {
                name: Some("orders_user_id_fkey".to_string()),
                columns: vec!["user_id".to_string()],
                referenced_schema: None,
                referenced_table: "users".to_string(),
                referenced_columns: vec!["id".to_string()],
                on_update: FkAction::NoAction,
                on_delete: FkAction::Cascade,
                match_type: FkMatchType::Simple,
            }),
        ];
        orders.indexes = vec![Index {
            name: "orders_user_idx".to_string(),
            columns: vec!["user_id".to_string()],
            is_unique: false,
            definition: None,
        }];

        let mut users = Table::new(None, "users");
        users.comment = Some("People's accounts".to_string());
        users.columns = vec![
            Column::new("id", ColumnType::named("int4"), false),
            Column::new("name", ColumnType::named("text"), true),
        ];
        users.constraints = vec![pk("users")];

        let mut active = Table::new(None, "active_users");
        active.kind = TableKind::View;
        active.columns = vec![Column::new("id", ColumnType::named("int4"), true)];

        let mut model = MetadataModel::new();
        model.insert_if_absent(orders);
        model.insert_if_absent(users);
        model.insert_if_absent(active);
        model
    }

    fn render(options: &[&str]) -> String {
        let model = model();
        let endpoint = endpoint();
        TablesFactory
            .create(&model, &endpoint, options.iter().copied().collect())
            .expect("create")
            .generate()
            .expect("generate")
    }

    #[test]
    fn renders_referenced_tables_first() {
        let text = render(&[]);
        let expected = "\
-- Generated by modelgen from a postgresql database. Do not edit.

-- view active_users
--     id int4

CREATE TABLE users (
    id int4 NOT NULL,
    name text,
    CONSTRAINT users_pkey PRIMARY KEY (id)
);
COMMENT ON TABLE users IS 'People''s accounts';

CREATE TABLE orders (
    id int4 NOT NULL,
    user_id int4 NOT NULL,
    CONSTRAINT orders_pkey PRIMARY KEY (id),
    CONSTRAINT orders_user_id_fkey FOREIGN KEY (user_id) REFERENCES users (id) ON DELETE CASCADE
);
CREATE INDEX orders_user_idx ON orders (user_id);
";
        assert_eq!(text, expected);
    }

    #[test]
    fn options_drop_sections() {
        let text = render(&["noindexes", "noconstraints", "nocomments"]);
        assert!(!text.contains("CREATE INDEX"));
        assert!(!text.contains("PRIMARY KEY"));
        assert!(!text.contains("COMMENT ON"));
        assert!(text.contains("    user_id int4 NOT NULL\n);"));
    }

    #[test]
    fn rejects_unknown_options() {
        let model = model();
        let endpoint = endpoint();
        let err = TablesFactory
            .create(&model, &endpoint, ["nojoined"].into_iter().collect())
            .err()
            .expect("invalid option");
        assert!(matches!(err, GenerationError::InvalidOption(_)));
    }
}

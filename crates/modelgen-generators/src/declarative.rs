//! Rust struct definitions, one per reflected table or view.

use std::collections::BTreeSet;

use modelgen_core::{
    Column, ColumnConstraint, Constraint, EndpointInfo, GenerationError, Generator,
    GeneratorFactory, GeneratorOptions, MetadataModel, Table, TableKind,
};

use crate::code_builder::CodeBuilder;
use crate::naming::{field_name, type_name};
use crate::type_map::RustTypeMapper;
use crate::{check_options, header};

/// Names the generated file already refers to; a table struct must not
/// shadow them.
const TAKEN_TYPE_NAMES: &[&str] = &["Self", "String", "Option", "Vec", "Some", "None"];

/// Default generator.
#[derive(Debug, Clone, Copy, Default)]
pub struct DeclarativeFactory;

impl DeclarativeFactory {
    pub const NAME: &'static str = "declarative";
    const OPTIONS: &'static [&'static str] = &["nocomments", "noconstraints", "noindexes"];
}

impl GeneratorFactory for DeclarativeFactory {
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
        Ok(Box::new(DeclarativeGenerator {
            model,
            endpoint,
            comments: !options.contains("nocomments"),
            constraints: !options.contains("noconstraints"),
            indexes: !options.contains("noindexes"),
        }))
    }
}

pub struct DeclarativeGenerator<'a> {
    model: &'a MetadataModel,
    endpoint: &'a EndpointInfo,
    comments: bool,
    constraints: bool,
    indexes: bool,
}

impl Generator for DeclarativeGenerator<'_> {
    fn generate(&self) -> Result<String, GenerationError> {
        let mapper = RustTypeMapper::new(&self.endpoint.dialect);
        let mut used: BTreeSet<String> =
            TAKEN_TYPE_NAMES.iter().map(|name| name.to_string()).collect();
        let mut out = CodeBuilder::spaces().line(&header("//!", &self.endpoint.dialect));

        for table in self.model.tables() {
            let type_name = unique_name(&mut used, type_name(&table.name));
            out = self.write_struct(out.blank(), table, &type_name, &mapper);
            out = write_impl(out.blank(), table, &type_name);
        }

        Ok(out.build())
    }
}

impl DeclarativeGenerator<'_> {
    fn write_struct(
        &self,
        out: CodeBuilder,
        table: &Table,
        type_name: &str,
        mapper: &RustTypeMapper<'_>,
    ) -> CodeBuilder {
        let docs = self.table_docs(table);
        let mut fields = BTreeSet::new();

        out.each(docs, |b, doc| b.comment("///", &doc))
            .line("#[derive(Debug, Clone, PartialEq)]")
            .block_with_close(&format!("pub struct {type_name} {{"), "}", |mut b| {
                for column in &table.columns {
                    let field = unique_name(&mut fields, field_name(&column.name));
                    for doc in self.column_docs(table, column, &field) {
                        b = b.comment("///", &doc);
                    }
                    b = b.line(&format!("pub {field}: {},", mapper.map_column(column)));
                }
                b
            })
    }

    fn table_docs(&self, table: &Table) -> Vec<String> {
        let mut docs = Vec::new();
        if let Some(comment) = table.comment.as_deref().filter(|_| self.comments) {
            docs.push(comment.to_string());
        }
        match &table.kind {
            TableKind::View => docs.push(format!("View `{}`.", table.key())),
            TableKind::MaterializedView => docs.push(format!("Materialized view `{}`.", table.key())),
            _ => {}
        }

        if self.constraints {
            for constraint in &table.constraints {
                if let Some(line) = table_constraint_doc(constraint) {
                    docs.push(line);
                }
            }
        }

        if self.indexes && !table.indexes.is_empty() {
            let mut block = String::from("Indexes:");
            for index in &table.indexes {
                let unique = if index.is_unique { "unique " } else { "" };
                block.push_str(&format!(
                    "\n- `{}`: {unique}on {}",
                    index.name,
                    backticked(&index.columns)
                ));
            }
            docs.push(block);
        }

        // Blank doc line between paragraphs.
        let mut spaced = Vec::with_capacity(docs.len() * 2);
        for (position, doc) in docs.into_iter().enumerate() {
            if position > 0 {
                spaced.push(String::new());
            }
            spaced.push(doc);
        }
        spaced
    }

    fn column_docs(&self, table: &Table, column: &Column, field: &str) -> Vec<String> {
        let mut docs = Vec::new();
        if let Some(comment) = column.comment.as_deref().filter(|_| self.comments) {
            docs.push(comment.to_string());
        }
        if field.trim_start_matches("r#") != column.name {
            docs.push(format!("Column `{}`.", column.name));
        }
        if self.constraints {
            for membership in table.column_constraints(&column.name) {
                docs.push(match membership {
                    ColumnConstraint::PrimaryKey => "Primary key.".to_string(),
                    ColumnConstraint::Unique => "Unique.".to_string(),
                    ColumnConstraint::Check(expression) => format!("Check `{expression}`."),
                    ColumnConstraint::ForeignKey {
                        schema,
                        table,
                        column,
                    } => match schema {
                        Some(schema) => format!("References `{schema}.{table}.{column}`."),
                        None => format!("References `{table}.{column}`."),
                    },
                });
            }
        }
        docs
    }
}

fn write_impl(out: CodeBuilder, table: &Table, type_name: &str) -> CodeBuilder {
    let schema = match &table.schema {
        Some(schema) => format!("Some({schema:?})"),
        None => "None".to_string(),
    };
    let columns: Vec<String> = table.columns.iter().map(|c| format!("{:?}", c.name)).collect();

    out.block_with_close(&format!("impl {type_name} {{"), "}", |b| {
        b.line(&format!("pub const TABLE: &'static str = {:?};", table.name))
            .line(&format!("pub const SCHEMA: Option<&'static str> = {schema};"))
            .line(&format!(
                "pub const COLUMNS: &'static [&'static str] = &[{}];",
                columns.join(", ")
            ))
    })
}

/// Table-level constraints that do not fit on a single field.
fn table_constraint_doc(constraint: &Constraint) -> Option<String> {
    match constraint {
        Constraint::PrimaryKey(pk) if pk.columns.len() > 1 => {
            Some(format!("Primary key on {}.", backticked(&pk.columns)))
        }
        Constraint::Unique(unique) if unique.columns.len() > 1 => {
            Some(format!("Unique on {}.", backticked(&unique.columns)))
        }
        Constraint::Check(check) if check.columns.is_empty() => {
            Some(format!("Check `{}`.", check.expression))
        }
        _ => None,
    }
}

fn backticked(columns: &[String]) -> String {
    let names: Vec<String> = columns.iter().map(|name| format!("`{name}`")).collect();
    format!("({})", names.join(", "))
}

fn unique_name(used: &mut BTreeSet<String>, base: String) -> String {
    let mut candidate = base.clone();
    let mut suffix = 1;
    while !used.insert(candidate.clone()) {
        suffix += 1;
        candidate = format!("{base}{suffix}");
    }
    candidate
}

#[cfg(test)]
mod tests {
    use modelgen_core::{
        CheckConstraint, ColumnType, EngineConfig, FkAction, FkMatchType, ForeignKey, Index,
        PrimaryKey,
    };

    use super::*;

    fn users() -> Table {
        let mut users = Table::new(None, "users");
        users.comment = Some("Registered accounts".to_string());
        let mut id = Column::new("id", ColumnType::named("int4"), false);
        id.comment = Some("Surrogate key".to_string());
        users.columns = vec![
            id,
            Column::new("name", ColumnType::named("text"), true),
            Column::new("type", ColumnType::named("varchar"), false),
        ];
        users.constraints = vec![
            Constraint::PrimaryKey(PrimaryKey {
                name: Some("users_pkey".to_string()),
                columns: vec!["id".to_string()],
            }),
            Constraint::Check(CheckConstraint {
                name: Some("users_type_check".to_string()),
                columns: vec!["type".to_string()],
                expression: "type <> ''".to_string(),
            }),
        ];
        users.indexes = vec![Index {
            name: "users_name_idx".to_string(),
            columns: vec!["name".to_string()],
            is_unique: false,
            definition: None,
        }];
        users
    }

    fn orders() -> Table {
        let mut orders = Table::new(Some("sales"), "order_items");
        orders.columns = vec![Column::new("user_id", ColumnType::named("int8"), false)];
        orders.constraints = vec![Constraint::ForeignKey(ForeignKey {
            name: None,
            columns: vec!["user_id".to_string()],
            referenced_schema: None,
            referenced_table: "users".to_string(),
            referenced_columns: vec!["id".to_string()],
            on_update: FkAction::NoAction,
            on_delete: FkAction::NoAction,
            match_type: FkMatchType::Simple,
        })];
        orders
    }

    fn render(tables: Vec<Table>, options: &[&str]) -> Result<String, GenerationError> {
        let mut model = MetadataModel::new();
        for table in tables {
            model.insert_if_absent(table);
        }
        let endpoint = EndpointInfo::new("postgresql", "postgresql", EngineConfig::default());
        DeclarativeFactory
            .create(&model, &endpoint, options.iter().copied().collect())?
            .generate()
    }

    #[test]
    fn renders_struct_with_docs() {
        let text = render(vec![users()], &[]).expect("generate");
        let expected = r#"//! Generated by modelgen from a postgresql database. Do not edit.

/// Registered accounts
///
/// Indexes:
/// - `users_name_idx`: on (`name`)
#[derive(Debug, Clone, PartialEq)]
pub struct Users {
    /// Surrogate key
    /// Primary key.
    pub id: i32,
    pub name: Option<String>,
    /// Check `type <> ''`.
    pub r#type: String,
}

impl Users {
    pub const TABLE: &'static str = "users";
    pub const SCHEMA: Option<&'static str> = None;
    pub const COLUMNS: &'static [&'static str] = &["id", "name", "type"];
}
"#;
        assert_eq!(text, expected);
    }

    #[test]
    fn options_strip_docs() {
        let text = render(vec![users()], &["nocomments", "noconstraints", "noindexes"])
            .expect("generate");
        assert!(!text.contains("///"));
        assert!(text.contains("pub struct Users {\n    pub id: i32,"));
    }

    #[test]
    fn qualified_tables_keep_their_schema() {
        let text = render(vec![users(), orders()], &[]).expect("generate");
        assert!(text.contains("pub struct OrderItems {"));
        assert!(text.contains("    /// References `users.id`.\n    pub user_id: i64,"));
        assert!(text.contains("pub const SCHEMA: Option<&'static str> = Some(\"sales\");"));
    }

    #[test]
    fn empty_tables_render_empty_structs() {
        let text = render(vec![Table::new(None, "audit")], &[]).expect("generate");
        assert!(text.contains("pub struct Audit {\n}\n"));
        assert!(text.contains("pub const COLUMNS: &'static [&'static str] = &[];"));
    }

    #[test]
    fn table_names_never_shadow_emitted_types() {
        let mut text_table = Table::new(None, "string");
        text_table.columns = vec![Column::new("body", ColumnType::named("text"), false)];
        let tables = vec![Table::new(None, "self"), Table::new(None, "!!"), text_table];

        let text = render(tables, &[]).expect("generate");
        assert!(text.contains("pub struct Self2 {"));
        assert!(text.contains("pub struct Table {"));
        assert!(text.contains("pub struct String2 {\n    pub body: String,\n}"));
        assert!(text.contains("impl String2 {"));
        assert!(!text.contains("pub struct Self {"));
        assert!(!text.contains("pub struct  {"));
        assert!(!text.contains("pub struct String {"));
    }

    #[test]
    fn colliding_type_names_get_suffixes() {
        let mut upper = users();
        upper.name = "Users".to_string();
        let text = render(vec![users(), upper], &["nocomments"]).expect("generate");
        assert!(text.contains("pub struct Users {"));
        assert!(text.contains("pub struct Users2 {"));
    }
}

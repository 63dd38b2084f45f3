use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use modelgen_core::{
    Column, ColumnType, Constraint, EndpointInfo, EngineConfig, PrimaryKey, Table, TableKind,
};
use modelgen_introspect::{
    Endpoint, EndpointError, ReflectRequest, ReflectionError, TableFilter, reflect,
};

/// Endpoint answering from fixed per-schema fixtures and recording requests.
struct FixtureEndpoint {
    info: EndpointInfo,
    schemas: HashMap<Option<String>, Vec<Table>>,
    failing: Option<String>,
    requests: Mutex<Vec<ReflectRequest>>,
}

impl FixtureEndpoint {
    fn new() -> Self {
        Self {
            info: EndpointInfo::new("fixture", "fixture", EngineConfig::default()),
            schemas: HashMap::new(),
            failing: None,
            requests: Mutex::new(Vec::new()),
        }
    }

    fn with_schema(mut self, schema: Option<&str>, tables: Vec<Table>) -> Self {
        self.schemas.insert(schema.map(str::to_string), tables);
        self
    }

    fn failing_on(mut self, schema: &str) -> Self {
        self.failing = Some(schema.to_string());
        self
    }

    fn requests(&self) -> Vec<ReflectRequest> {
        self.requests.lock().expect("lock").clone()
    }
}

#[async_trait]
impl Endpoint for FixtureEndpoint {
    fn info(&self) -> &EndpointInfo {
        &self.info
    }

    async fn reflect_schema(&self, request: &ReflectRequest) -> Result<Vec<Table>, EndpointError> {
        self.requests.lock().expect("lock").push(request.clone());
        if request.schema.is_some() && request.schema == self.failing {
            return Err(EndpointError::Query("relation does not exist".to_string()));
        }
        let tables = self.schemas.get(&request.schema).cloned().unwrap_or_default();
        Ok(tables
            .into_iter()
            .filter(|table| request.tables.allows(&table.name))
            .filter(|table| request.include_views || !table.kind.is_view())
            .collect())
    }
}

fn table(schema: Option<&str>, name: &str, columns: &[&str]) -> Table {
    let mut table = Table::new(schema, name);
    table.columns = columns
        .iter()
        .map(|column| Column::new(*column, ColumnType::named("text"), true))
        .collect();
    table.constraints = vec![Constraint::PrimaryKey(PrimaryKey {
        name: Some(format!("{name}_pkey")),
        columns: vec![columns[0].to_string()],
    })];
    table
}

fn view(schema: Option<&str>, name: &str) -> Table {
    let mut view = Table::new(schema, name);
    view.kind = TableKind::View;
    view.columns = vec![Column::new("id", ColumnType::named("int4"), true)];
    view
}

fn two_schema_endpoint() -> FixtureEndpoint {
    FixtureEndpoint::new()
        .with_schema(
            Some("s1"),
            vec![
                table(Some("s1"), "users", &["id", "email"]),
                table(Some("s1"), "orders", &["id", "user_id"]),
            ],
        )
        .with_schema(
            Some("s2"),
            vec![
                table(Some("s2"), "users", &["uid", "nickname", "bio"]),
                table(Some("s2"), "invoices", &["id"]),
                view(Some("s2"), "active_users"),
            ],
        )
}

fn schemas(names: &[&str]) -> Vec<Option<String>> {
    names.iter().map(|name| Some(name.to_string())).collect()
}

#[tokio::test]
async fn reflecting_twice_yields_identical_models() {
    let endpoint = two_schema_endpoint();
    let order = schemas(&["s1", "s2"]);

    let first = reflect(&endpoint, &order, &TableFilter::all(), true)
        .await
        .expect("first reflection");
    let second = reflect(&endpoint, &order, &TableFilter::all(), true)
        .await
        .expect("second reflection");

    assert_eq!(first, second);
    assert_eq!(
        serde_json::to_string(&first).expect("serialize"),
        serde_json::to_string(&second).expect("serialize")
    );
}

#[tokio::test]
async fn duplicate_table_name_is_attributed_to_first_schema() {
    let endpoint = two_schema_endpoint();

    let model = reflect(&endpoint, &schemas(&["s1", "s2"]), &TableFilter::all(), true)
        .await
        .expect("reflection");

    let users: Vec<&Table> = model.tables().filter(|table| table.name == "users").collect();
    assert_eq!(users.len(), 1);
    assert_eq!(users[0].schema.as_deref(), Some("s1"));
    let columns: Vec<&str> = users[0].columns.iter().map(|col| col.name.as_str()).collect();
    assert_eq!(columns, vec!["id", "email"]);

    let keys: Vec<&str> = model.tables.keys().map(String::as_str).collect();
    assert_eq!(
        keys,
        vec!["s1.users", "s1.orders", "s2.invoices", "s2.active_users"]
    );
}

#[tokio::test]
async fn reversed_schema_order_changes_attribution() {
    let endpoint = two_schema_endpoint();

    let model = reflect(&endpoint, &schemas(&["s2", "s1"]), &TableFilter::all(), true)
        .await
        .expect("reflection");

    let users = model.find("users").expect("users");
    assert_eq!(users.schema.as_deref(), Some("s2"));
    assert_eq!(users.columns.len(), 3);
}

#[tokio::test]
async fn issues_one_request_per_schema_in_order() {
    let endpoint = two_schema_endpoint();
    let filter = TableFilter::only(["users", "invoices"]);

    reflect(&endpoint, &schemas(&["s2", "s1"]), &filter, false)
        .await
        .expect("reflection");

    let requests = endpoint.requests();
    assert_eq!(requests.len(), 2);
    assert_eq!(requests[0].schema.as_deref(), Some("s2"));
    assert_eq!(requests[1].schema.as_deref(), Some("s1"));
    assert!(requests.iter().all(|request| !request.include_views));
    assert!(requests.iter().all(|request| request.tables == filter));
}

#[tokio::test]
async fn empty_schema_list_reflects_default_namespace() {
    let endpoint = FixtureEndpoint::new().with_schema(None, vec![table(None, "notes", &["id"])]);

    let model = reflect(&endpoint, &[], &TableFilter::all(), true)
        .await
        .expect("reflection");

    let requests = endpoint.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].schema, None);
    assert!(requests[0].tables.is_empty());
    assert_eq!(model.tables.keys().collect::<Vec<_>>(), vec!["notes"]);
}

#[tokio::test]
async fn blank_schema_and_table_names_mean_everything_in_default_namespace() {
    let endpoint = FixtureEndpoint::new().with_schema(
        None,
        vec![table(None, "notes", &["id"]), table(None, "tags", &["id"])],
    );

    let model = reflect(
        &endpoint,
        &[Some(String::new())],
        &TableFilter::only([""]),
        true,
    )
    .await
    .expect("reflection");

    let requests = endpoint.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].schema, None);
    assert!(requests[0].tables.is_empty());
    assert_eq!(model.len(), 2);
}

#[tokio::test]
async fn table_filter_and_view_flag_restrict_results() {
    let endpoint = two_schema_endpoint();

    let model = reflect(
        &endpoint,
        &schemas(&["s2"]),
        &TableFilter::only(["invoices", "active_users"]),
        false,
    )
    .await
    .expect("reflection");
    assert_eq!(model.tables.keys().collect::<Vec<_>>(), vec!["s2.invoices"]);

    let with_views = reflect(
        &endpoint,
        &schemas(&["s2"]),
        &TableFilter::only(["invoices", "active_users"]),
        true,
    )
    .await
    .expect("reflection");
    assert_eq!(
        with_views.tables.keys().collect::<Vec<_>>(),
        vec!["s2.invoices", "s2.active_users"]
    );
}

#[tokio::test]
async fn failing_schema_aborts_without_a_model() {
    let endpoint = two_schema_endpoint().failing_on("s2");

    let err = reflect(&endpoint, &schemas(&["s1", "s2", "s3"]), &TableFilter::all(), true)
        .await
        .expect_err("s2 fails");

    match err {
        ReflectionError::Schema { schema, .. } => assert_eq!(schema, "s2"),
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(endpoint.requests().len(), 2);
}

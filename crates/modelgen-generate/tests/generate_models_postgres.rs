use std::env;

use anyhow::{Context, Result};
use modelgen_generate::{GenerateRequest, generate_models};

const FIXTURE: &[&str] = &[
    "drop schema if exists modelgen_gen_a cascade",
    "drop schema if exists modelgen_gen_b cascade",
    "create schema modelgen_gen_a",
    "create schema modelgen_gen_b",
    "create table modelgen_gen_a.accounts (id integer primary key, name text)",
    "create table modelgen_gen_b.accounts (id integer primary key, legacy boolean)",
    "create table modelgen_gen_b.invoices (
        id integer primary key,
        account_id integer references modelgen_gen_b.accounts(id)
    )",
];

async fn load_fixture(url: &str) -> Result<()> {
    let pool = sqlx::postgres::PgPoolOptions::new()
        .max_connections(1)
        .connect(url)
        .await
        .context("connecting to Postgres")?;
    for statement in FIXTURE {
        sqlx::query(statement)
            .execute(&pool)
            .await
            .with_context(|| format!("executing fixture statement: {statement}"))?;
    }
    pool.close().await;
    Ok(())
}

#[tokio::test]
async fn first_schema_wins_in_generated_output() -> Result<()> {
    let Ok(url) = env::var("TEST_DATABASE_URL") else {
        eprintln!("TEST_DATABASE_URL not set; skipping generate_models test");
        return Ok(());
    };
    load_fixture(&url).await?;

    let dir = tempfile::tempdir()?;
    let out = dir.path().join("models.json");
    let mut request = GenerateRequest::new(url);
    request.generator = "json".to_string();
    request.schemas = vec!["modelgen_gen_a".to_string(), "modelgen_gen_b".to_string()];
    request.outfile = Some(out.clone());

    let summary = generate_models(request).await?;
    assert_eq!(summary.dialect, "postgresql");
    assert_eq!(summary.tables, 2);

    let model: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(&out)?)?;
    let tables = model["tables"].as_object().context("tables object")?;
    let keys: Vec<&String> = tables.keys().collect();
    assert_eq!(keys, vec!["modelgen_gen_a.accounts", "modelgen_gen_b.invoices"]);
    assert!(
        tables["modelgen_gen_a.accounts"]["columns"]
            .as_array()
            .context("columns")?
            .iter()
            .any(|column| column["name"] == "name")
    );
    Ok(())
}

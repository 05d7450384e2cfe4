//! Tests against a running MongoDB server, named by `RULEDB_TEST_URL`.
//!
//! Run with `--ignored`; every test works in its own collection, which
//! is dropped on success.

use mongodb::{
    bson::{
        doc,
        Document,
    },
    Client,
};
use rulecore::{
    error::BackendError,
    filter::RuleFilter,
    platform::ConnectorOption,
    rule::CasbinRule,
    traits::RuleBackend,
};
use ruledb_mongo::MongoBackend;
use std::collections::HashSet;
use test_rule::fixture::rbac_rules;

fn test_url() -> String {
    std::env::var("RULEDB_TEST_URL")
        .unwrap_or_else(|_| "mongodb://localhost:27017/".to_string())
}

fn test_opts(collection: &str) -> ConnectorOption {
    ConnectorOption::from(test_url())
        .database("ruledb_test")
        .collection(collection)
}

fn rule(ptype: &str, values: &[&str]) -> CasbinRule {
    CasbinRule::new(ptype, values)
}

#[tokio::test]
#[ignore]
async fn crud() -> anyhow::Result<()> {
    let backend = MongoBackend::connect(test_opts("casbin_rule_crud")).await?;
    assert!(backend.owns_connection());
    backend.clear_rules().await?;
    assert!(backend.find_rules(&[]).await?.is_empty());

    backend.insert_rules(rbac_rules()).await?;
    let stored = backend.find_rules(&[]).await?
        .into_iter()
        .collect::<HashSet<_>>();
    assert_eq!(stored, rbac_rules().into_iter().collect::<HashSet<_>>());

    // an empty batch is accepted
    backend.insert_rules(vec![]).await?;

    backend.insert_rule(rule("p", &["alice", "data1"])).await?;
    assert_eq!(
        backend.delete_rule(&RuleFilter::exact(&rule("p", &["alice", "data1"]))).await?,
        1,
    );
    assert_eq!(
        backend.delete_rule(&RuleFilter::exact(&rule("p", &["alice", "data1"]))).await?,
        0,
    );
    // the longer rule sharing the prefix is untouched
    assert_eq!(backend.find_rules(&[RuleFilter::new().ptype("p").value(0, "alice")]).await?, [
        rule("p", &["alice", "data1", "read"]),
    ]);

    assert_eq!(
        backend.delete_rules(&RuleFilter::field_window("p", 1, &["data2"])).await?,
        3,
    );
    let remaining = backend.find_rules(&[RuleFilter::new().section("g")]).await?;
    assert_eq!(remaining.len(), 2);

    backend.clear_rules().await?;
    assert!(backend.find_rules(&[]).await?.is_empty());
    backend.close().await;
    Ok(())
}

#[tokio::test]
#[ignore]
async fn filtered_find() -> anyhow::Result<()> {
    let backend = MongoBackend::connect(test_opts("casbin_rule_find")).await?;
    backend.clear_rules().await?;
    backend.insert_rules(rbac_rules()).await?;

    let found = backend.find_rules(&[
        RuleFilter::section_values("p", &["", "data2", "write"]),
        RuleFilter::section_values("g", &["cathy"]),
    ]).await?
        .into_iter()
        .collect::<HashSet<_>>();
    assert_eq!(found, HashSet::from([
        rule("p", &["bob", "data2", "write"]),
        rule("p", &["data2_admin", "data2", "write"]),
        rule("g2", &["cathy", "data2_admin"]),
    ]));

    // regex metacharacters in a section are matched literally
    assert!(backend.find_rules(&[RuleFilter::new().section(".")]).await?.is_empty());

    backend.clear_rules().await?;
    backend.close().await;
    Ok(())
}

#[tokio::test]
#[ignore]
async fn reinit_is_idempotent() -> anyhow::Result<()> {
    let first = MongoBackend::connect(test_opts("casbin_rule_reinit")).await?;
    first.insert_rule(rule("p", &["alice", "data1", "read"])).await?;
    let second = MongoBackend::connect(test_opts("casbin_rule_reinit")).await?;
    assert_eq!(second.find_rules(&[]).await?.len(), first.find_rules(&[]).await?.len());
    first.clear_rules().await?;
    first.close().await;
    second.close().await;
    Ok(())
}

#[tokio::test]
#[ignore]
async fn borrowed_database() -> anyhow::Result<()> {
    let client = Client::with_uri_str(test_url()).await?;
    let database = client.database("ruledb_test");
    let backend = MongoBackend::with_database(
        database.clone(),
        ConnectorOption::new().collection("casbin_rule_borrowed"),
    ).await?;
    assert!(!backend.owns_connection());
    backend.insert_rule(rule("g", &["alice", "admin"])).await?;
    backend.close().await;

    // the caller's client remains usable after the backend is closed
    let names = database.list_collection_names().await?;
    assert!(names.iter().any(|name| name == "casbin_rule_borrowed"));
    database.collection::<CasbinRule>("casbin_rule_borrowed").drop().await?;
    drop(database);
    client.shutdown().await;
    Ok(())
}

#[tokio::test]
#[ignore]
async fn malformed_document_aborts_find() -> anyhow::Result<()> {
    let client = Client::with_uri_str(test_url()).await?;
    let raw = client.database("ruledb_test")
        .collection::<Document>("casbin_rule_malformed");
    raw.drop().await.ok();
    let backend = MongoBackend::with_database(
        client.database("ruledb_test"),
        ConnectorOption::new().collection("casbin_rule_malformed"),
    ).await?;

    backend.insert_rule(rule("p", &["alice", "data1", "read"])).await?;
    raw.insert_one(doc! { "v0": "bob" }).await?;
    assert!(matches!(
        backend.find_rules(&[]).await,
        Err(BackendError::Decode(_)),
    ));

    backend.clear_rules().await?;
    raw.insert_one(doc! { "ptype": 5, "v0": "bob" }).await?;
    assert!(matches!(
        backend.find_rules(&[]).await,
        Err(BackendError::Decode(_)),
    ));

    backend.clear_rules().await?;
    backend.close().await;
    drop(raw);
    client.shutdown().await;
    Ok(())
}

#[tokio::test]
#[ignore]
async fn clear_missing_collection() -> anyhow::Result<()> {
    let backend = MongoBackend::connect(test_opts("casbin_rule_clear")).await?;
    backend.clear_rules().await?;
    // the first clear recreated only the indexes; drop those too so the
    // next clear finds no collection at all
    let client = Client::with_uri_str(test_url()).await?;
    client.database("ruledb_test")
        .collection::<Document>("casbin_rule_clear")
        .drop()
        .await?;
    backend.clear_rules().await?;
    backend.clear_rules().await?;
    assert!(backend.find_rules(&[]).await?.is_empty());
    backend.close().await;
    client.shutdown().await;
    Ok(())
}

#[tokio::test]
#[ignore]
async fn connect_rejects_empty_collection() -> anyhow::Result<()> {
    let result = MongoBackend::connect(test_opts("")).await;
    assert!(matches!(result, Err(BackendError::AppInvariantViolation(_))));
    Ok(())
}

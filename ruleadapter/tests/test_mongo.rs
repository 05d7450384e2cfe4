//! Tests against a running MongoDB server, named by `RULEDB_TEST_URL`.
#![cfg(feature = "mongodb")]

use casbin::{
    Adapter,
    CoreApi,
    Enforcer,
    MgmtApi,
};
use mongodb::Client;
use ruleadapter::MongoAdapter;
use rulecore::{
    platform::ConnectorOption,
    traits::RuleBackend,
};
use test_rule::fixture::{
    rbac_model,
    rbac_model_with_policy,
};

fn test_url() -> String {
    std::env::var("RULEDB_TEST_URL")
        .unwrap_or_else(|_| "mongodb://localhost:27017/".to_string())
}

#[tokio::test]
#[ignore]
async fn enforcer_over_connect() -> anyhow::Result<()> {
    let opts = ConnectorOption::from(test_url())
        .database("ruledb_test")
        .collection("casbin_rule_adapter");
    let mut adapter = MongoAdapter::connect(opts.clone()).await?;
    adapter.save_policy(&mut rbac_model_with_policy().await?).await?;

    let mut e = Enforcer::new(rbac_model().await?, adapter).await?;
    assert!(e.enforce(("alice", "data2", "write"))?);
    assert!(e.add_policy(vec![
        "bob".to_string(),
        "data1".to_string(),
        "read".to_string(),
    ]).await?);
    drop(e);

    // a second adapter sees what the enforcer persisted
    let adapter = MongoAdapter::connect(opts.clone()).await?;
    let e = Enforcer::new(rbac_model().await?, adapter).await?;
    assert!(e.enforce(("bob", "data1", "read"))?);
    drop(e);

    let mut adapter = MongoAdapter::connect(opts).await?;
    adapter.clear_policy().await?;
    adapter.close().await;
    Ok(())
}

#[tokio::test]
#[ignore]
async fn borrowed_database() -> anyhow::Result<()> {
    let client = Client::with_uri_str(test_url()).await?;
    let database = client.database("ruledb_test");

    let mut adapter = MongoAdapter::with_database_options(
        database.clone(),
        ConnectorOption::new().collection("casbin_rule_adapter_borrowed"),
    ).await?;
    adapter.save_policy(&mut rbac_model_with_policy().await?).await?;
    adapter.close().await;

    let adapter = MongoAdapter::with_database_options(
        database.clone(),
        ConnectorOption::new().collection("casbin_rule_adapter_borrowed"),
    ).await?;
    let backend = adapter.into_inner();
    assert!(!backend.owns_connection());
    assert_eq!(backend.find_rules(&[]).await?.len(), 6);
    backend.clear_rules().await?;
    backend.close().await;

    // default options name the collection casbin_rule
    let adapter = MongoAdapter::with_database(database.clone()).await?;
    adapter.close().await;
    let names = database.list_collection_names().await?;
    assert!(names.iter().any(|name| name == "casbin_rule"));
    database.collection::<rulecore::rule::CasbinRule>("casbin_rule").drop().await?;

    drop(database);
    client.shutdown().await;
    Ok(())
}

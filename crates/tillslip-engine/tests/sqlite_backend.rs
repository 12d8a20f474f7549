//! Engine wired from configuration against an in-memory SQLite catalog.

mod common;

use tillslip_db::{Database, DbConfig};
use tillslip_engine::{EngineConfig, GenerationCoordinator, StoreBackend};

async fn seeded_database() -> Database {
    let db = Database::new(DbConfig::in_memory()).await.unwrap();
    db.seller_profile().upsert(&common::seller()).await.unwrap();
    db.customers().upsert(&common::customer()).await.unwrap();
    for product in common::catalog() {
        db.products().upsert(&product).await.unwrap();
    }
    db
}

fn config(dir: &std::path::Path, store: StoreBackend) -> EngineConfig {
    EngineConfig {
        data_dir: dir.to_path_buf(),
        store,
        ..EngineConfig::default()
    }
}

#[tokio::test]
async fn test_sqlite_store_records_receipts() {
    let tmp = tempfile::tempdir().unwrap();
    let db = seeded_database().await;
    let engine = GenerationCoordinator::from_database(&config(tmp.path(), StoreBackend::Sqlite), &db);

    let outcome = engine
        .create_receipt(&common::request(&[("p-10000-gst", 1)], true, false))
        .await;
    assert!(outcome.success, "{:?}", outcome.error_message);
    let receipt = outcome.receipt.unwrap();

    assert_eq!(db.receipts().count().await.unwrap(), 1);
    assert_eq!(engine.list_receipts().await.unwrap(), vec![receipt.clone()]);
    assert!(tmp
        .path()
        .join("documents")
        .join(format!("{}.pdf", receipt.id))
        .is_file());
    assert!(!tmp.path().join("receipts.json").exists());
}

#[tokio::test]
async fn test_json_store_with_sqlite_catalog() {
    let tmp = tempfile::tempdir().unwrap();
    let db = seeded_database().await;
    let engine = GenerationCoordinator::from_database(&config(tmp.path(), StoreBackend::Json), &db);

    let outcome = engine
        .create_receipt(&common::request(&[("p-700", 3)], true, false))
        .await;
    assert!(outcome.success, "{:?}", outcome.error_message);

    assert!(tmp.path().join("receipts.json").is_file());
    assert_eq!(db.receipts().count().await.unwrap(), 0);
    assert_eq!(engine.list_receipts().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_sqlite_catalog_misses_are_not_found() {
    let tmp = tempfile::tempdir().unwrap();
    let db = seeded_database().await;
    let engine = GenerationCoordinator::from_database(&config(tmp.path(), StoreBackend::Sqlite), &db);

    let outcome = engine
        .create_receipt(&common::request(&[("p-missing", 1), ("p-gone", 1)], true, false))
        .await;

    assert!(!outcome.success);
    let message = outcome.error_message.unwrap();
    assert!(message.contains("p-missing") && message.contains("p-gone"));
    assert_eq!(db.receipts().count().await.unwrap(), 0);
}

//! Integration tests for `SqliteKeyValueStore`.

use std::sync::Arc;

use casefile_core::clock::Clock;
use casefile_core::store::KeyValueStore;
use casefile_store::sqlite_store::SqliteKeyValueStore;
use casefile_test_support::{FixedClock, fixed_now};

fn clock() -> Arc<dyn Clock> {
    Arc::new(FixedClock(fixed_now()))
}

async fn memory_store() -> SqliteKeyValueStore {
    SqliteKeyValueStore::connect("sqlite::memory:", clock()).await.unwrap()
}

async fn saved_at(store: &SqliteKeyValueStore, key: &str) -> String {
    sqlx::query_scalar::<_, String>("SELECT saved_at FROM progress_records WHERE record_key = ?")
        .bind(key)
        .fetch_one(store.pool())
        .await
        .unwrap()
}

#[tokio::test]
async fn test_get_returns_none_for_missing_key() {
    let store = memory_store().await;

    assert!(store.get("puzzle_game_progress_psycho").await.unwrap().is_none());
}

#[tokio::test]
async fn test_put_then_get_round_trips() {
    let store = memory_store().await;
    let value = r#"{"missionId":"psycho","totalMistakes":3}"#;

    store.put("puzzle_game_progress_psycho", value).await.unwrap();

    assert_eq!(
        store.get("puzzle_game_progress_psycho").await.unwrap().as_deref(),
        Some(value)
    );
}

#[tokio::test]
async fn test_put_upserts_existing_key() {
    let store = memory_store().await;

    store.put("k", "first").await.unwrap();
    store.put("k", "second").await.unwrap();

    assert_eq!(store.get("k").await.unwrap().as_deref(), Some("second"));
}

#[tokio::test]
async fn test_migrate_is_idempotent() {
    let store = memory_store().await;

    store.migrate().await.unwrap();
    store.put("k", "v").await.unwrap();
    store.migrate().await.unwrap();

    assert_eq!(store.get("k").await.unwrap().as_deref(), Some("v"));
}

#[tokio::test]
async fn test_file_database_persists_across_connections() {
    // Arrange
    let dir = tempfile::tempdir().unwrap();
    let url = format!("sqlite://{}?mode=rwc", dir.path().join("casefile.db").display());

    // Act
    {
        let store = SqliteKeyValueStore::connect(&url, clock()).await.unwrap();
        store.put("k", "durable").await.unwrap();
    }
    let reopened = SqliteKeyValueStore::connect(&url, clock()).await.unwrap();

    // Assert
    assert_eq!(reopened.get("k").await.unwrap().as_deref(), Some("durable"));
}

#[tokio::test]
async fn test_saved_at_comes_from_injected_clock() {
    // Arrange
    let store = memory_store().await;

    // Act
    store.put("k", "v").await.unwrap();

    // Assert
    assert_eq!(saved_at(&store, "k").await, fixed_now().to_rfc3339());
}

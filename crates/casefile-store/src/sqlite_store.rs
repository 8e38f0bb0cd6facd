//! `SQLite` implementation of the `KeyValueStore` trait.

use std::sync::Arc;

use async_trait::async_trait;
use casefile_core::clock::Clock;
use casefile_core::error::MissionError;
use casefile_core::store::KeyValueStore;
use sqlx::SqlitePool;
use sqlx::sqlite::SqlitePoolOptions;

use crate::schema::CREATE_PROGRESS_RECORDS_TABLE;

fn db_error(e: &sqlx::Error) -> MissionError {
    MissionError::Infrastructure(format!("database error: {e}"))
}

/// SQLite-backed key-value store; one row per key.
///
/// Each row records when it was last written, taken from the injected clock.
#[derive(Clone)]
pub struct SqliteKeyValueStore {
    pool: SqlitePool,
    clock: Arc<dyn Clock>,
}

impl std::fmt::Debug for SqliteKeyValueStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SqliteKeyValueStore")
            .field("pool", &self.pool)
            .finish_non_exhaustive()
    }
}

impl SqliteKeyValueStore {
    /// Wraps an existing pool. Call [`Self::migrate`] before first use.
    #[must_use]
    pub fn new(pool: SqlitePool, clock: Arc<dyn Clock>) -> Self {
        Self { pool, clock }
    }

    /// The underlying pool.
    #[must_use]
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Connects to `url`, creating the schema if needed.
    ///
    /// # Errors
    ///
    /// Returns `MissionError::Infrastructure` if the connection or schema
    /// creation fails.
    pub async fn connect(url: &str, clock: Arc<dyn Clock>) -> Result<Self, MissionError> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect(url)
            .await
            .map_err(|e| db_error(&e))?;
        let store = Self::new(pool, clock);
        store.migrate().await?;
        Ok(store)
    }

    /// Creates the `progress_records` table if it does not exist.
    ///
    /// # Errors
    ///
    /// Returns `MissionError::Infrastructure` if the statement fails.
    pub async fn migrate(&self) -> Result<(), MissionError> {
        sqlx::query(CREATE_PROGRESS_RECORDS_TABLE)
            .execute(&self.pool)
            .await
            .map_err(|e| db_error(&e))?;
        Ok(())
    }
}

#[async_trait]
impl KeyValueStore for SqliteKeyValueStore {
    async fn get(&self, key: &str) -> Result<Option<String>, MissionError> {
        sqlx::query_scalar::<_, String>("SELECT payload FROM progress_records WHERE record_key = ?")
            .bind(key)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| db_error(&e))
    }

    async fn put(&self, key: &str, value: &str) -> Result<(), MissionError> {
        sqlx::query(
            "INSERT INTO progress_records (record_key, payload, saved_at) VALUES (?, ?, ?) \
             ON CONFLICT(record_key) DO UPDATE SET payload = excluded.payload, saved_at = excluded.saved_at",
        )
        .bind(key)
        .bind(value)
        .bind(self.clock.now().to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(|e| db_error(&e))?;
        Ok(())
    }
}

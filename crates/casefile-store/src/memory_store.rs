//! In-memory `KeyValueStore`.

use std::collections::HashMap;

use async_trait::async_trait;
use casefile_core::error::MissionError;
use casefile_core::store::KeyValueStore;
use tokio::sync::RwLock;

/// Keeps values for the life of the process only.
#[derive(Debug, Default)]
pub struct MemoryKeyValueStore {
    values: RwLock<HashMap<String, String>>,
}

impl MemoryKeyValueStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl KeyValueStore for MemoryKeyValueStore {
    async fn get(&self, key: &str) -> Result<Option<String>, MissionError> {
        Ok(self.values.read().await.get(key).cloned())
    }

    async fn put(&self, key: &str, value: &str) -> Result<(), MissionError> {
        self.values
            .write()
            .await
            .insert(key.to_owned(), value.to_owned());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_put_overwrites_and_get_reads_back() {
        let store = MemoryKeyValueStore::new();
        assert!(store.get("k").await.unwrap().is_none());

        store.put("k", "one").await.unwrap();
        store.put("k", "two").await.unwrap();

        assert_eq!(store.get("k").await.unwrap().as_deref(), Some("two"));
    }
}

//! Test stores: mock `KeyValueStore` implementations for tests.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use casefile_core::error::MissionError;
use casefile_core::store::KeyValueStore;

/// An in-memory store that records every `put` in order, alongside keeping
/// the latest value per key.
#[derive(Debug, Default)]
pub struct RecordingKeyValueStore {
    values: Mutex<HashMap<String, String>>,
    puts: Mutex<Vec<(String, String)>>,
}

impl RecordingKeyValueStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store pre-seeded with one value.
    #[must_use]
    pub fn with_value(key: &str, value: &str) -> Self {
        let store = Self::default();
        store
            .values
            .lock()
            .unwrap()
            .insert(key.to_owned(), value.to_owned());
        store
    }

    /// Returns every `(key, value)` pair written, oldest first.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn puts(&self) -> Vec<(String, String)> {
        self.puts.lock().unwrap().clone()
    }

    /// Returns the current value for `key`.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn value(&self, key: &str) -> Option<String> {
        self.values.lock().unwrap().get(key).cloned()
    }
}

#[async_trait]
impl KeyValueStore for RecordingKeyValueStore {
    async fn get(&self, key: &str) -> Result<Option<String>, MissionError> {
        Ok(self.values.lock().unwrap().get(key).cloned())
    }

    async fn put(&self, key: &str, value: &str) -> Result<(), MissionError> {
        self.values
            .lock()
            .unwrap()
            .insert(key.to_owned(), value.to_owned());
        self.puts
            .lock()
            .unwrap()
            .push((key.to_owned(), value.to_owned()));
        Ok(())
    }
}

/// A store that always returns an infrastructure error. Useful for testing
/// that storage failures never reach gameplay.
#[derive(Debug)]
pub struct FailingKeyValueStore;

#[async_trait]
impl KeyValueStore for FailingKeyValueStore {
    async fn get(&self, _key: &str) -> Result<Option<String>, MissionError> {
        Err(MissionError::Infrastructure("storage unavailable".into()))
    }

    async fn put(&self, _key: &str, _value: &str) -> Result<(), MissionError> {
        Err(MissionError::Infrastructure("storage unavailable".into()))
    }
}

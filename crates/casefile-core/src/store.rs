//! Key-value storage abstraction.

use async_trait::async_trait;

use crate::error::MissionError;

/// Durable, device-local key-value storage.
///
/// Values are opaque strings; encoding is the caller's concern. Every `put`
/// replaces the previous value for the key in full. Implementations make no
/// cross-process guarantees: two writers racing on one key resolve as
/// last-write-wins.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Returns the value stored under `key`, or `None` if there is none.
    async fn get(&self, key: &str) -> Result<Option<String>, MissionError>;

    /// Stores `value` under `key`, overwriting any previous value.
    async fn put(&self, key: &str, value: &str) -> Result<(), MissionError>;
}

//! Progress Store: snapshot encoding on top of a `KeyValueStore`.

use std::fmt;
use std::sync::Arc;

use casefile_core::error::MissionError;
use casefile_core::store::KeyValueStore;

use crate::domain::snapshot::ProgressSnapshot;

/// Prefix for every persisted progress key.
pub const STORAGE_KEY_PREFIX: &str = "puzzle_game_progress_";

/// The key a mission's snapshot is stored under.
#[must_use]
pub fn storage_key(mission_id: &str) -> String {
    format!("{STORAGE_KEY_PREFIX}{mission_id}")
}

/// Loads and saves whole progress snapshots, one per mission.
///
/// Every save replaces the stored snapshot in full. There is no coordination
/// between processes sharing a back-end; the last write wins.
#[derive(Clone)]
pub struct ProgressStore {
    backend: Arc<dyn KeyValueStore>,
}

impl fmt::Debug for ProgressStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProgressStore").finish_non_exhaustive()
    }
}

impl ProgressStore {
    /// Wraps a key-value back-end.
    #[must_use]
    pub fn new(backend: Arc<dyn KeyValueStore>) -> Self {
        Self { backend }
    }

    /// Returns the stored snapshot for `mission_id`.
    ///
    /// A missing record, an unreadable back-end and a record that does not
    /// decode are all reported as `None`.
    pub async fn load(&self, mission_id: &str) -> Option<ProgressSnapshot> {
        let key = storage_key(mission_id);
        let raw = match self.backend.get(&key).await {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(e) => {
                tracing::warn!(%mission_id, error = %e, "progress read failed; treating as absent");
                return None;
            }
        };
        match serde_json::from_str(&raw) {
            Ok(snapshot) => Some(snapshot),
            Err(e) => {
                tracing::warn!(%mission_id, error = %e, "stored progress is corrupt; treating as absent");
                None
            }
        }
    }

    /// Writes `snapshot` under its mission's key.
    ///
    /// # Errors
    ///
    /// Returns `MissionError::Infrastructure` if encoding or the back-end write fails.
    pub async fn save(&self, snapshot: &ProgressSnapshot) -> Result<(), MissionError> {
        let raw = serde_json::to_string(snapshot)
            .map_err(|e| MissionError::Infrastructure(format!("snapshot encoding failed: {e}")))?;
        self.backend
            .put(&storage_key(&snapshot.mission_id), &raw)
            .await
    }
}

//! Background snapshot writer.
//!
//! Gameplay updates the in-memory snapshot synchronously and hands a copy
//! here. A single task drains the queue in order, so durable state always
//! converges on the newest snapshot. When several saves are queued only the
//! newest is written.

use tokio::sync::{mpsc, oneshot};

use super::store::ProgressStore;
use crate::domain::snapshot::ProgressSnapshot;

enum WriteRequest {
    Save(Box<ProgressSnapshot>),
    Flush(oneshot::Sender<()>),
}

/// Handle to the background writer task.
///
/// The task exits once every handle has been dropped and the queue is empty.
#[derive(Debug, Clone)]
pub struct SnapshotWriter {
    tx: mpsc::UnboundedSender<WriteRequest>,
}

impl SnapshotWriter {
    /// Spawns the writer task on the current tokio runtime.
    ///
    /// # Panics
    ///
    /// Panics if called outside a tokio runtime.
    #[must_use]
    pub fn spawn(store: ProgressStore) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        tokio::spawn(run(store, rx));
        Self { tx }
    }

    /// Queues `snapshot` for writing. Never blocks.
    pub fn submit(&self, snapshot: ProgressSnapshot) {
        if self.tx.send(WriteRequest::Save(Box::new(snapshot))).is_err() {
            tracing::warn!("snapshot writer has stopped; progress will not be persisted");
        }
    }

    /// Resolves once every snapshot submitted before this call has been
    /// written or has failed.
    pub async fn flush(&self) {
        let (done_tx, done_rx) = oneshot::channel();
        if self.tx.send(WriteRequest::Flush(done_tx)).is_ok() {
            let _ = done_rx.await;
        }
    }
}

async fn run(store: ProgressStore, mut rx: mpsc::UnboundedReceiver<WriteRequest>) {
    while let Some(first) = rx.recv().await {
        let mut pending = None;
        let mut waiters = Vec::new();
        absorb(first, &mut pending, &mut waiters);
        while let Ok(next) = rx.try_recv() {
            absorb(next, &mut pending, &mut waiters);
        }

        if let Some(snapshot) = pending {
            match store.save(&snapshot).await {
                Ok(()) => tracing::trace!(mission_id = %snapshot.mission_id, "progress saved"),
                Err(e) => tracing::warn!(
                    mission_id = %snapshot.mission_id,
                    error = %e,
                    "progress write failed; in-memory state remains authoritative"
                ),
            }
        }
        for waiter in waiters {
            let _ = waiter.send(());
        }
    }
}

fn absorb(
    request: WriteRequest,
    pending: &mut Option<Box<ProgressSnapshot>>,
    waiters: &mut Vec<oneshot::Sender<()>>,
) {
    match request {
        WriteRequest::Save(snapshot) => *pending = Some(snapshot),
        WriteRequest::Flush(done) => waiters.push(done),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::domain::synthesis::initial_snapshot;
    use casefile_test_support::{
        FailingKeyValueStore, MissionBuilder, RecordingKeyValueStore, fixed_now,
    };

    fn snapshot() -> ProgressSnapshot {
        let mission = MissionBuilder::new().scene("s1", 1, &[]).build();
        initial_snapshot(&mission, fixed_now())
    }

    #[tokio::test]
    async fn test_flush_waits_for_submitted_snapshot() {
        // Arrange
        let backend = Arc::new(RecordingKeyValueStore::new());
        let writer = SnapshotWriter::spawn(ProgressStore::new(backend.clone()));

        // Act
        writer.submit(snapshot());
        writer.flush().await;

        // Assert
        let stored = backend.value("puzzle_game_progress_test-mission").unwrap();
        let decoded: ProgressSnapshot = serde_json::from_str(&stored).unwrap();
        assert_eq!(decoded, snapshot());
    }

    #[tokio::test]
    async fn test_newest_snapshot_wins() {
        let backend = Arc::new(RecordingKeyValueStore::new());
        let writer = SnapshotWriter::spawn(ProgressStore::new(backend.clone()));
        let mut last = snapshot();

        for mistakes in 1..=5 {
            last.record_mistake("s1", fixed_now());
            assert_eq!(last.total_mistakes, mistakes);
            writer.submit(last.clone());
        }
        writer.flush().await;

        let stored = backend.value("puzzle_game_progress_test-mission").unwrap();
        let decoded: ProgressSnapshot = serde_json::from_str(&stored).unwrap();
        assert_eq!(decoded.total_mistakes, 5);
        assert!(!backend.puts().is_empty());
        assert!(backend.puts().len() <= 5);
    }

    #[tokio::test]
    async fn test_failed_write_does_not_stop_writer() {
        let writer = SnapshotWriter::spawn(ProgressStore::new(Arc::new(FailingKeyValueStore)));

        writer.submit(snapshot());
        writer.flush().await;
        writer.submit(snapshot());
        writer.flush().await;
    }

    #[tokio::test]
    async fn test_flush_with_nothing_queued_returns() {
        let writer =
            SnapshotWriter::spawn(ProgressStore::new(Arc::new(RecordingKeyValueStore::new())));

        writer.flush().await;
    }
}

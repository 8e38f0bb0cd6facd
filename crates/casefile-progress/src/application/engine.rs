//! The Progress Engine.
//!
//! One engine instance is built at application start and handed by
//! reference to every consumer. It is the only writer of progress: each
//! mutation updates the in-memory snapshot synchronously, then queues the
//! new snapshot with the background writer.

use std::sync::Arc;

use casefile_content::application::sources::{LoadedMission, MissionSource};
use casefile_content::domain::mission::{
    Evidence, LexiconTerm, MissionDefinition, Scene, SceneUnlock,
};
use casefile_core::clock::Clock;
use casefile_core::error::MissionError;

use super::store::ProgressStore;
use super::writer::SnapshotWriter;
use crate::domain::outcome::OperationOutcome;
use crate::domain::restore::check_restorable;
use crate::domain::snapshot::{ProgressSnapshot, SceneStatus};
use crate::domain::synthesis::initial_snapshot;

/// A fetched definition plus whatever progress was stored for it.
#[derive(Debug, Clone)]
pub struct FetchedMission {
    /// The validated definition.
    pub mission: LoadedMission,
    /// The persisted snapshot, if one decoded.
    pub persisted: Option<ProgressSnapshot>,
}

/// Fetches a definition from `source` and reads any stored progress for it.
///
/// # Errors
///
/// Returns the source's error if the definition cannot be fetched.
pub async fn fetch_mission(
    source: &dyn MissionSource,
    store: &ProgressStore,
) -> Result<FetchedMission, MissionError> {
    let mission = source.fetch().await?;
    let persisted = store.load(&mission.definition.mission_id).await;
    Ok(FetchedMission { mission, persisted })
}

/// Identifies one load attempt. Only the newest ticket may complete.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadTicket {
    generation: u64,
}

/// A loaded mission with its live snapshot.
#[derive(Debug)]
pub(crate) struct ActiveMission {
    pub(crate) definition: MissionDefinition,
    pub(crate) content_hash: String,
    pub(crate) snapshot: ProgressSnapshot,
}

#[derive(Debug)]
enum EngineState {
    Loading,
    Ready(Box<ActiveMission>),
    Failed(MissionError),
}

/// Authoritative play state for one mission.
pub struct ProgressEngine {
    clock: Arc<dyn Clock>,
    store: ProgressStore,
    writer: SnapshotWriter,
    state: EngineState,
    generation: u64,
}

impl std::fmt::Debug for ProgressEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProgressEngine")
            .field("state", &self.state)
            .field("generation", &self.generation)
            .finish_non_exhaustive()
    }
}

impl ProgressEngine {
    /// Creates an engine in the loading state and starts its writer task.
    ///
    /// # Panics
    ///
    /// Panics if called outside a tokio runtime.
    #[must_use]
    pub fn new(clock: Arc<dyn Clock>, store: ProgressStore) -> Self {
        let writer = SnapshotWriter::spawn(store.clone());
        Self {
            clock,
            store,
            writer,
            state: EngineState::Loading,
            generation: 0,
        }
    }

    /// The store this engine persists to.
    #[must_use]
    pub fn store(&self) -> &ProgressStore {
        &self.store
    }

    // ------------------------------------------------------------------
    // Loading
    // ------------------------------------------------------------------

    /// Starts a new load, superseding any load still in flight.
    ///
    /// Until the returned ticket completes, every operation is a no-op.
    pub fn begin_load(&mut self) -> LoadTicket {
        self.generation += 1;
        self.state = EngineState::Loading;
        tracing::debug!(generation = self.generation, "mission load started");
        LoadTicket {
            generation: self.generation,
        }
    }

    /// Completes the load identified by `ticket`.
    ///
    /// Returns `false` and changes nothing if a newer load has started since.
    /// On success a valid persisted snapshot is resumed; an invalid or missing
    /// one is replaced with a fresh snapshot, which is persisted. On failure
    /// the engine enters the failed state and storage is left untouched.
    pub fn finish_load(
        &mut self,
        ticket: LoadTicket,
        result: Result<FetchedMission, MissionError>,
    ) -> bool {
        if ticket.generation != self.generation {
            tracing::warn!(
                generation = ticket.generation,
                current = self.generation,
                "discarding superseded mission load"
            );
            return false;
        }

        let fetched = match result {
            Ok(fetched) => fetched,
            Err(e) => {
                tracing::error!(error = %e, "mission load failed");
                self.state = EngineState::Failed(e);
                return true;
            }
        };

        let LoadedMission {
            definition,
            content_hash,
        } = fetched.mission;
        let restored = fetched
            .persisted
            .and_then(|snapshot| match check_restorable(&snapshot, &definition) {
                Ok(()) => Some(snapshot),
                Err(reason) => {
                    tracing::warn!(
                        mission_id = %definition.mission_id,
                        %reason,
                        "discarding stored progress"
                    );
                    None
                }
            });
        let resumed = restored.is_some();
        let snapshot = match restored {
            Some(snapshot) => snapshot,
            None => {
                let fresh = initial_snapshot(&definition, self.clock.now());
                self.writer.submit(fresh.clone());
                fresh
            }
        };

        tracing::info!(
            mission_id = %definition.mission_id,
            %content_hash,
            resumed,
            "mission ready"
        );
        self.state = EngineState::Ready(Box::new(ActiveMission {
            definition,
            content_hash,
            snapshot,
        }));
        true
    }

    /// Fetches from `source` and completes the load in one step.
    ///
    /// # Errors
    ///
    /// Returns the load failure, which is also kept as the engine's error state.
    pub async fn load(&mut self, source: &dyn MissionSource) -> Result<(), MissionError> {
        tracing::info!(source = %source.locator(), "loading mission");
        let ticket = self.begin_load();
        let store = self.store.clone();
        let result = fetch_mission(source, &store).await;
        let failure = result.as_ref().err().cloned();
        self.finish_load(ticket, result);
        failure.map_or(Ok(()), Err)
    }

    /// Waits until every queued snapshot has been written.
    pub async fn flush(&self) {
        self.writer.flush().await;
    }

    // ------------------------------------------------------------------
    // Read-only state
    // ------------------------------------------------------------------

    /// Whether a load is in progress.
    #[must_use]
    pub fn is_loading(&self) -> bool {
        matches!(self.state, EngineState::Loading)
    }

    /// The error from the most recent load, if it failed.
    #[must_use]
    pub fn load_error(&self) -> Option<&MissionError> {
        match &self.state {
            EngineState::Failed(e) => Some(e),
            _ => None,
        }
    }

    /// The loaded definition.
    #[must_use]
    pub fn definition(&self) -> Option<&MissionDefinition> {
        self.active().map(|a| &a.definition)
    }

    /// Hash of the document the definition was loaded from.
    #[must_use]
    pub fn content_hash(&self) -> Option<&str> {
        self.active().map(|a| a.content_hash.as_str())
    }

    /// The current snapshot, read-only.
    #[must_use]
    pub fn snapshot(&self) -> Option<&ProgressSnapshot> {
        self.active().map(|a| &a.snapshot)
    }

    /// Looks up a scene in the definition.
    #[must_use]
    pub fn get_scene(&self, scene_id: &str) -> Option<&Scene> {
        self.active()?.definition.scene(scene_id)
    }

    /// A scene's status; `Locked` for unknown scenes or before loading.
    #[must_use]
    pub fn scene_status(&self, scene_id: &str) -> SceneStatus {
        self.snapshot()
            .map_or(SceneStatus::Locked, |s| s.status(scene_id))
    }

    /// Whether a scene is anything other than `Locked`.
    #[must_use]
    pub fn is_scene_unlocked(&self, scene_id: &str) -> bool {
        self.scene_status(scene_id).is_unlocked()
    }

    /// Case-insensitive lexicon lookup.
    #[must_use]
    pub fn get_term(&self, term: &str) -> Option<&LexiconTerm> {
        self.active()?.definition.term(term)
    }

    pub(crate) fn active(&self) -> Option<&ActiveMission> {
        match &self.state {
            EngineState::Ready(active) => Some(active),
            _ => None,
        }
    }

    // ------------------------------------------------------------------
    // Gameplay
    // ------------------------------------------------------------------

    /// Marks a scene as being played.
    pub fn start_scene(&mut self, scene_id: &str) -> OperationOutcome {
        let EngineState::Ready(active) = &mut self.state else {
            return OperationOutcome::NotReady;
        };
        let outcome = active.snapshot.start_scene(scene_id, self.clock.now());
        self.commit("start_scene", scene_id, outcome)
    }

    /// Records the puzzle at `puzzle_index` as solved.
    pub fn complete_puzzle(&mut self, scene_id: &str, puzzle_index: u32) -> OperationOutcome {
        let EngineState::Ready(active) = &mut self.state else {
            return OperationOutcome::NotReady;
        };
        let outcome = active
            .snapshot
            .complete_puzzle(scene_id, puzzle_index, self.clock.now());
        self.commit("complete_puzzle", scene_id, outcome)
    }

    /// Counts a wrong answer in a scene.
    ///
    /// There is no cap here; `mistakes_allowed_per_scene` is advisory.
    pub fn record_mistake(&mut self, scene_id: &str) -> OperationOutcome {
        let EngineState::Ready(active) = &mut self.state else {
            return OperationOutcome::NotReady;
        };
        let outcome = active.snapshot.record_mistake(scene_id, self.clock.now());
        self.commit("record_mistake", scene_id, outcome)
    }

    /// Asks for a hint. Returns whether the mission's hint policy grants it;
    /// a granted hint is counted against the scene.
    pub fn use_hint(&mut self, scene_id: &str) -> bool {
        let EngineState::Ready(active) = &mut self.state else {
            return false;
        };
        let policy = active.definition.difficulty.hint_policy;
        let granted = active.snapshot.use_hint(scene_id, policy, self.clock.now());
        let outcome = if granted {
            OperationOutcome::Applied
        } else {
            OperationOutcome::Unchanged
        };
        self.commit("use_hint", scene_id, outcome);
        granted
    }

    /// Completes a scene and applies the mission's unlock rule.
    pub fn complete_scene(&mut self, scene_id: &str) -> OperationOutcome {
        let EngineState::Ready(active) = &mut self.state else {
            return OperationOutcome::NotReady;
        };
        let ActiveMission {
            definition,
            snapshot,
            ..
        } = &mut **active;

        let next_scene_id = match definition.unlock_rules.scene_unlock {
            SceneUnlock::Linear => definition
                .scene_index(scene_id)
                .and_then(|index| definition.scenes.get(index + 1))
                .map(|next| next.id.as_str()),
            rule @ (SceneUnlock::Branching | SceneUnlock::Free) => {
                tracing::warn!(?rule, %scene_id, "unlock rule has no transitions; nothing unlocked");
                None
            }
        };
        let outcome = snapshot.complete_scene(scene_id, next_scene_id, self.clock.now());
        self.commit("complete_scene", scene_id, outcome)
    }

    /// Collects a reward evidence item; collecting it again is a no-op.
    pub fn collect_evidence(&mut self, scene_id: &str, evidence: &Evidence) -> OperationOutcome {
        let EngineState::Ready(active) = &mut self.state else {
            return OperationOutcome::NotReady;
        };
        let outcome =
            active
                .snapshot
                .collect_evidence(scene_id, &evidence.title, self.clock.now());
        self.commit("collect_evidence", scene_id, outcome)
    }

    /// Throws away all progress and starts the mission over. Irreversible.
    pub fn reset_progress(&mut self) -> OperationOutcome {
        let EngineState::Ready(active) = &mut self.state else {
            return OperationOutcome::NotReady;
        };
        active.snapshot = initial_snapshot(&active.definition, self.clock.now());
        tracing::info!(mission_id = %active.definition.mission_id, "progress reset");
        self.writer.submit(active.snapshot.clone());
        OperationOutcome::Applied
    }

    fn commit(
        &self,
        operation: &'static str,
        scene_id: &str,
        outcome: OperationOutcome,
    ) -> OperationOutcome {
        tracing::debug!(operation, %scene_id, ?outcome, "progress operation");
        if outcome.is_applied() {
            if let Some(snapshot) = self.snapshot() {
                self.writer.submit(snapshot.clone());
            }
        }
        outcome
    }
}

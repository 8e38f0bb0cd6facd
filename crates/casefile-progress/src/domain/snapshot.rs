//! The progress snapshot and its state transitions.
//!
//! Every method that mutates a snapshot lives here and takes the current
//! time as a parameter, so the rules stay deterministic under test. The
//! engine decides *which* transition to apply; this module decides *how*.

use std::collections::BTreeMap;

use casefile_content::domain::mission::HintPolicy;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::outcome::OperationOutcome;

/// Lifecycle of a scene.
///
/// `Locked → Unlocked → InProgress → Completed`. No transition leads back to
/// `Locked`, and `Completed` is terminal.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SceneStatus {
    /// Not yet reachable.
    #[default]
    Locked,
    /// Reachable, not started.
    Unlocked,
    /// Started, not completed.
    InProgress,
    /// Finished.
    Completed,
}

impl SceneStatus {
    /// Any status other than `Locked`.
    #[must_use]
    pub fn is_unlocked(self) -> bool {
        self != Self::Locked
    }

    /// Part of the frontier: `Unlocked` or `InProgress`.
    #[must_use]
    pub fn is_playable(self) -> bool {
        matches!(self, Self::Unlocked | Self::InProgress)
    }

    /// The persisted spelling of the status.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Locked => "locked",
            Self::Unlocked => "unlocked",
            Self::InProgress => "in_progress",
            Self::Completed => "completed",
        }
    }
}

impl std::fmt::Display for SceneStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Progress within one scene.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SceneProgress {
    /// The scene this entry tracks.
    pub scene_id: String,
    /// Lifecycle status.
    pub status: SceneStatus,
    /// Puzzles solved so far; never exceeds `total_puzzles`.
    pub puzzles_solved: u32,
    /// Puzzle count, copied from the definition at creation.
    pub total_puzzles: u32,
    /// Wrong answers recorded in this scene.
    pub mistakes: u32,
    /// Hints granted in this scene.
    pub hints_used: u32,
    /// When the scene was completed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
}

impl SceneProgress {
    /// A fresh entry with zeroed counters.
    #[must_use]
    pub fn new(scene_id: impl Into<String>, status: SceneStatus, total_puzzles: u32) -> Self {
        Self {
            scene_id: scene_id.into(),
            status,
            puzzles_solved: 0,
            total_puzzles,
            mistakes: 0,
            hints_used: 0,
            completed_at: None,
        }
    }
}

/// One collected piece of evidence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectedEvidence {
    pub scene_id: String,
    pub evidence_title: String,
    pub collected_at: DateTime<Utc>,
}

/// The complete, serializable progress state for a mission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressSnapshot {
    /// Must match the loaded mission's id.
    pub mission_id: String,
    /// When this snapshot was synthesized.
    pub started_at: DateTime<Utc>,
    /// Last time the player did something.
    pub last_played_at: DateTime<Utc>,
    /// Scene currently being played, if any.
    pub current_scene_id: Option<String>,
    /// One entry per scene in the mission.
    pub scenes: BTreeMap<String, SceneProgress>,
    /// Collected evidence in collection order, unique per `(scene, title)`.
    pub collected_evidence: Vec<CollectedEvidence>,
    /// Always equal to the sum of every scene's `mistakes`.
    pub total_mistakes: u32,
}

impl ProgressSnapshot {
    /// Progress for one scene.
    #[must_use]
    pub fn scene(&self, scene_id: &str) -> Option<&SceneProgress> {
        self.scenes.get(scene_id)
    }

    /// Status for one scene; `Locked` when there is no entry.
    #[must_use]
    pub fn status(&self, scene_id: &str) -> SceneStatus {
        self.scenes
            .get(scene_id)
            .map_or(SceneStatus::Locked, |s| s.status)
    }

    /// Whether `(scene_id, title)` has been collected.
    #[must_use]
    pub fn has_evidence(&self, scene_id: &str, title: &str) -> bool {
        self.collected_evidence
            .iter()
            .any(|e| e.scene_id == scene_id && e.evidence_title == title)
    }

    /// Number of completed scenes.
    #[must_use]
    pub fn completed_count(&self) -> usize {
        self.scenes
            .values()
            .filter(|s| s.status == SceneStatus::Completed)
            .count()
    }

    /// Marks a scene as being played.
    ///
    /// A completed scene keeps its status; the current scene and the
    /// last-played time are updated regardless.
    pub fn start_scene(&mut self, scene_id: &str, now: DateTime<Utc>) -> OperationOutcome {
        let Some(scene) = self.scenes.get_mut(scene_id) else {
            return OperationOutcome::UnknownScene;
        };
        if scene.status != SceneStatus::Completed {
            scene.status = SceneStatus::InProgress;
        }
        self.current_scene_id = Some(scene_id.to_owned());
        self.last_played_at = now;
        OperationOutcome::Applied
    }

    /// Records that the puzzle at `puzzle_index` was solved.
    ///
    /// `puzzles_solved` only ever grows to `puzzle_index + 1`; repeating a
    /// call or reporting an earlier index changes nothing.
    pub fn complete_puzzle(
        &mut self,
        scene_id: &str,
        puzzle_index: u32,
        now: DateTime<Utc>,
    ) -> OperationOutcome {
        let Some(scene) = self.scenes.get_mut(scene_id) else {
            return OperationOutcome::UnknownScene;
        };
        if puzzle_index >= scene.total_puzzles {
            return OperationOutcome::PuzzleOutOfRange;
        }
        let solved = puzzle_index + 1;
        if solved <= scene.puzzles_solved {
            return OperationOutcome::Unchanged;
        }
        scene.puzzles_solved = solved;
        self.last_played_at = now;
        OperationOutcome::Applied
    }

    /// Counts a wrong answer against the scene and the mission total together.
    ///
    /// The total bounds every scene count, so once it would overflow nothing
    /// is counted and the two stay equal.
    pub fn record_mistake(&mut self, scene_id: &str, now: DateTime<Utc>) -> OperationOutcome {
        let Some(scene) = self.scenes.get_mut(scene_id) else {
            return OperationOutcome::UnknownScene;
        };
        let Some(total) = self.total_mistakes.checked_add(1) else {
            return OperationOutcome::Unchanged;
        };
        scene.mistakes += 1;
        self.total_mistakes = total;
        self.last_played_at = now;
        OperationOutcome::Applied
    }

    /// Grants a hint if `policy` allows one, counting it when granted.
    pub fn use_hint(&mut self, scene_id: &str, policy: HintPolicy, now: DateTime<Utc>) -> bool {
        let Some(scene) = self.scenes.get_mut(scene_id) else {
            return false;
        };
        if !policy.permits(scene.hints_used) {
            return false;
        }
        scene.hints_used = scene.hints_used.saturating_add(1);
        self.last_played_at = now;
        true
    }

    /// Completes a scene and unlocks `next_scene_id` if it is still locked.
    ///
    /// Completion fills `puzzles_solved`, stamps `completed_at` and clears the
    /// current scene. Completing an already completed scene changes nothing.
    pub fn complete_scene(
        &mut self,
        scene_id: &str,
        next_scene_id: Option<&str>,
        now: DateTime<Utc>,
    ) -> OperationOutcome {
        let Some(scene) = self.scenes.get_mut(scene_id) else {
            return OperationOutcome::UnknownScene;
        };
        if scene.status == SceneStatus::Completed {
            return OperationOutcome::Unchanged;
        }
        scene.status = SceneStatus::Completed;
        scene.puzzles_solved = scene.total_puzzles;
        scene.completed_at = Some(now);

        if let Some(next) = next_scene_id.and_then(|id| self.scenes.get_mut(id)) {
            if next.status == SceneStatus::Locked {
                next.status = SceneStatus::Unlocked;
            }
        }

        self.current_scene_id = None;
        self.last_played_at = now;
        OperationOutcome::Applied
    }

    /// Appends evidence unless `(scene_id, title)` is already collected.
    pub fn collect_evidence(
        &mut self,
        scene_id: &str,
        title: &str,
        now: DateTime<Utc>,
    ) -> OperationOutcome {
        if !self.scenes.contains_key(scene_id) {
            return OperationOutcome::UnknownScene;
        }
        if self.has_evidence(scene_id, title) {
            return OperationOutcome::Unchanged;
        }
        self.collected_evidence.push(CollectedEvidence {
            scene_id: scene_id.to_owned(),
            evidence_title: title.to_owned(),
            collected_at: now,
        });
        self.last_played_at = now;
        OperationOutcome::Applied
    }
}

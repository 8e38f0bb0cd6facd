//! Validation of persisted snapshots against the loaded mission.
//!
//! A snapshot that fails any check here is discarded and replaced with a
//! freshly synthesized one.

use std::collections::HashSet;

use casefile_content::domain::mission::MissionDefinition;
use thiserror::Error;

use super::snapshot::{ProgressSnapshot, SceneStatus};

/// Why a persisted snapshot cannot be resumed.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SnapshotRejected {
    #[error("snapshot belongs to mission {found}, expected {expected}")]
    MissionMismatch { expected: String, found: String },

    #[error("snapshot has {found} scene entries, mission defines {expected}")]
    SceneCountMismatch { expected: usize, found: usize },

    #[error("snapshot has no entry for scene {0}")]
    MissingScene(String),

    #[error("scene {scene_id} expects {expected} puzzles, snapshot records {found}")]
    PuzzleCountMismatch {
        scene_id: String,
        expected: usize,
        found: u32,
    },

    #[error("scene {0} has inconsistent puzzle counters")]
    InconsistentPuzzles(String),

    #[error("total mistakes {recorded} does not match per-scene sum {summed}")]
    MistakeTotalMismatch { recorded: u32, summed: u64 },

    #[error("evidence {title:?} for scene {scene_id} is recorded twice")]
    DuplicateEvidence { scene_id: String, title: String },
}

/// Checks that `snapshot` can be resumed against `mission`.
///
/// # Errors
///
/// Returns the first `SnapshotRejected` reason found.
pub fn check_restorable(
    snapshot: &ProgressSnapshot,
    mission: &MissionDefinition,
) -> Result<(), SnapshotRejected> {
    if snapshot.mission_id != mission.mission_id {
        return Err(SnapshotRejected::MissionMismatch {
            expected: mission.mission_id.clone(),
            found: snapshot.mission_id.clone(),
        });
    }
    if snapshot.scenes.len() != mission.scenes.len() {
        return Err(SnapshotRejected::SceneCountMismatch {
            expected: mission.scenes.len(),
            found: snapshot.scenes.len(),
        });
    }

    for scene in &mission.scenes {
        let Some(progress) = snapshot.scenes.get(&scene.id) else {
            return Err(SnapshotRejected::MissingScene(scene.id.clone()));
        };
        if usize::try_from(progress.total_puzzles).ok() != Some(scene.puzzles.len()) {
            return Err(SnapshotRejected::PuzzleCountMismatch {
                scene_id: scene.id.clone(),
                expected: scene.puzzles.len(),
                found: progress.total_puzzles,
            });
        }
        let overflowed = progress.puzzles_solved > progress.total_puzzles;
        let unfinished_completion = progress.status == SceneStatus::Completed
            && progress.puzzles_solved != progress.total_puzzles;
        if overflowed || unfinished_completion || progress.scene_id != scene.id {
            return Err(SnapshotRejected::InconsistentPuzzles(scene.id.clone()));
        }
    }

    let summed: u64 = snapshot.scenes.values().map(|s| u64::from(s.mistakes)).sum();
    if summed != u64::from(snapshot.total_mistakes) {
        return Err(SnapshotRejected::MistakeTotalMismatch {
            recorded: snapshot.total_mistakes,
            summed,
        });
    }

    let mut seen = HashSet::new();
    for item in &snapshot.collected_evidence {
        if !seen.insert((item.scene_id.as_str(), item.evidence_title.as_str())) {
            return Err(SnapshotRejected::DuplicateEvidence {
                scene_id: item.scene_id.clone(),
                title: item.evidence_title.clone(),
            });
        }
    }

    Ok(())
}

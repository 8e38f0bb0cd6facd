//! Initial-state synthesis.

use casefile_content::domain::mission::MissionDefinition;
use chrono::{DateTime, Utc};

use super::snapshot::{ProgressSnapshot, SceneProgress, SceneStatus};

/// Builds the canonical starting snapshot for a mission: the first scene
/// unlocked, every other scene locked, all counters at zero, no evidence.
#[must_use]
pub fn initial_snapshot(mission: &MissionDefinition, now: DateTime<Utc>) -> ProgressSnapshot {
    let scenes = mission
        .scenes
        .iter()
        .enumerate()
        .map(|(index, scene)| {
            let status = if index == 0 {
                SceneStatus::Unlocked
            } else {
                SceneStatus::Locked
            };
            let total = u32::try_from(scene.puzzles.len()).unwrap_or(u32::MAX);
            (scene.id.clone(), SceneProgress::new(&scene.id, status, total))
        })
        .collect();

    ProgressSnapshot {
        mission_id: mission.mission_id.clone(),
        started_at: now,
        last_played_at: now,
        current_scene_id: None,
        scenes,
        collected_evidence: Vec::new(),
        total_mistakes: 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use casefile_test_support::{MissionBuilder, fixed_now};

    #[test]
    fn test_initial_snapshot_unlocks_only_first_scene() {
        // Arrange
        let mission = MissionBuilder::new()
            .scene("s1", 2, &["Recibo"])
            .scene("s2", 3, &[])
            .scene("s3", 0, &[])
            .build();

        // Act
        let snap = initial_snapshot(&mission, fixed_now());

        // Assert
        assert_eq!(snap.mission_id, "test-mission");
        assert_eq!(snap.scenes.len(), 3);
        assert_eq!(snap.status("s1"), SceneStatus::Unlocked);
        assert_eq!(snap.status("s2"), SceneStatus::Locked);
        assert_eq!(snap.status("s3"), SceneStatus::Locked);
        assert_eq!(snap.scene("s2").unwrap().total_puzzles, 3);
        assert_eq!(snap.started_at, fixed_now());
        assert_eq!(snap.last_played_at, fixed_now());
        assert!(snap.current_scene_id.is_none());
        assert!(snap.collected_evidence.is_empty());
        assert_eq!(snap.total_mistakes, 0);
    }

    #[test]
    fn test_initial_snapshot_counters_start_at_zero() {
        let mission = MissionBuilder::new().scene("s1", 4, &[]).build();

        let snap = initial_snapshot(&mission, fixed_now());

        let s1 = snap.scene("s1").unwrap();
        assert_eq!(
            (s1.puzzles_solved, s1.mistakes, s1.hints_used, s1.completed_at),
            (0, 0, 0, None)
        );
        assert_eq!(s1.scene_id, "s1");
    }
}

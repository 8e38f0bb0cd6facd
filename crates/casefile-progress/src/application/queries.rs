//! Read-only views over the engine's state.
//!
//! These combine the definition and the snapshot into what a presentation
//! layer needs to draw a map, a scene or the evidence board. None of them
//! mutate anything.

use casefile_content::domain::mission::LexiconTerm;
use serde::Serialize;

use super::engine::ProgressEngine;
use crate::domain::snapshot::SceneStatus;

/// Mission-wide counters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MissionSummary {
    pub mission_id: String,
    pub title: String,
    pub scenes_completed: usize,
    pub scenes_total: usize,
    pub evidence_collected: usize,
    pub evidence_total: usize,
    pub total_mistakes: u32,
}

impl MissionSummary {
    /// Completed scenes as a percentage of all scenes.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn completion_percent(&self) -> f64 {
        if self.scenes_total == 0 {
            0.0
        } else {
            self.scenes_completed as f64 / self.scenes_total as f64 * 100.0
        }
    }
}

/// One evidence slot on the evidence board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EvidenceEntry {
    pub title: String,
    pub tags: Vec<String>,
    pub note_es: String,
    pub collected: bool,
}

/// A scene's evidence slots.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SceneEvidence {
    pub scene_id: String,
    pub label: String,
    pub icon: String,
    pub evidence: Vec<EvidenceEntry>,
}

/// Where a player re-entering a scene should land.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "phase", content = "puzzle_index")]
pub enum ResumePoint {
    /// Nothing solved yet: show the story.
    Story,
    /// Resume at this puzzle.
    Puzzle(u32),
    /// Every puzzle solved, or the scene is completed.
    Conclusion,
}

impl ProgressEngine {
    /// Mission-wide counters, or `None` before loading.
    #[must_use]
    pub fn summary(&self) -> Option<MissionSummary> {
        let active = self.active()?;
        Some(MissionSummary {
            mission_id: active.definition.mission_id.clone(),
            title: active.definition.title.clone(),
            scenes_completed: active.snapshot.completed_count(),
            scenes_total: active.definition.scenes.len(),
            evidence_collected: active.snapshot.collected_evidence.len(),
            evidence_total: active.definition.total_evidence(),
            total_mistakes: active.snapshot.total_mistakes,
        })
    }

    /// Every scene's reward evidence with its collected flag, in scene order.
    #[must_use]
    pub fn evidence_catalog(&self) -> Vec<SceneEvidence> {
        let Some(active) = self.active() else {
            return Vec::new();
        };
        active
            .definition
            .scenes
            .iter()
            .map(|scene| SceneEvidence {
                scene_id: scene.id.clone(),
                label: scene.node.label.clone(),
                icon: scene.node.icon.clone(),
                evidence: scene
                    .reward_evidence
                    .iter()
                    .map(|e| EvidenceEntry {
                        title: e.title.clone(),
                        tags: e.tags.clone(),
                        note_es: e.note_es.clone(),
                        collected: active.snapshot.has_evidence(&scene.id, &e.title),
                    })
                    .collect(),
            })
            .collect()
    }

    /// Where to resume a scene.
    #[must_use]
    pub fn resume_point(&self, scene_id: &str) -> Option<ResumePoint> {
        let progress = self.snapshot()?.scene(scene_id)?;
        let point = if progress.status == SceneStatus::Completed {
            ResumePoint::Conclusion
        } else if progress.puzzles_solved == 0 {
            ResumePoint::Story
        } else if progress.puzzles_solved >= progress.total_puzzles {
            ResumePoint::Conclusion
        } else {
            ResumePoint::Puzzle(progress.puzzles_solved)
        };
        Some(point)
    }

    /// Whether `use_hint` would grant a hint right now. Consumes nothing.
    #[must_use]
    pub fn hint_available(&self, scene_id: &str) -> bool {
        let Some(active) = self.active() else {
            return false;
        };
        active.snapshot.scene(scene_id).is_some_and(|progress| {
            active
                .definition
                .difficulty
                .hint_policy
                .permits(progress.hints_used)
        })
    }

    /// Mistakes left before the mission's advisory allowance is used up.
    #[must_use]
    pub fn mistakes_remaining(&self, scene_id: &str) -> Option<u32> {
        let active = self.active()?;
        let progress = active.snapshot.scene(scene_id)?;
        Some(
            active
                .definition
                .difficulty
                .mistakes_allowed_per_scene
                .saturating_sub(progress.mistakes),
        )
    }

    /// Ids of scenes currently unlocked or in progress, in mission order.
    #[must_use]
    pub fn frontier(&self) -> Vec<&str> {
        let Some(active) = self.active() else {
            return Vec::new();
        };
        active
            .definition
            .scenes
            .iter()
            .filter(|scene| active.snapshot.status(&scene.id).is_playable())
            .map(|scene| scene.id.as_str())
            .collect()
    }

    /// Lexicon entries for a scene's focus terms, skipping terms the lexicon lacks.
    #[must_use]
    pub fn scene_terms(&self, scene_id: &str) -> Vec<&LexiconTerm> {
        let Some(active) = self.active() else {
            return Vec::new();
        };
        let Some(scene) = active.definition.scene(scene_id) else {
            return Vec::new();
        };
        scene
            .focus_terms
            .iter()
            .filter_map(|term| active.definition.term(term))
            .collect()
    }
}

//! Mission fixtures: small, valid definitions built in code.

use casefile_content::domain::mission::{
    BilingualText, ConclusionUnlock, DifficultyConfig, Evidence, HintPolicy, LexiconTerm,
    MissionDefinition, Puzzle, Scene, SceneNode, SceneUnlock, UiConfig, UnlockRequirements,
    UnlockRules,
};

/// A single-answer translation puzzle whose answer is `"correct"`.
#[must_use]
pub fn mcq_puzzle(term: &str) -> Puzzle {
    Puzzle::McqTranslation {
        prompt: format!("¿Qué significa «{term}»?"),
        term: term.to_owned(),
        choices: vec!["correct".to_owned(), "wrong".to_owned()],
        answer: "correct".to_owned(),
    }
}

/// A reward evidence item with the given title.
#[must_use]
pub fn evidence(title: &str) -> Evidence {
    Evidence {
        title: title.to_owned(),
        tags: vec!["test".to_owned()],
        note_es: format!("Nota sobre {title}."),
    }
}

/// Builds valid `MissionDefinition`s for tests.
///
/// Defaults: mission id `"test-mission"`, linear unlocking, one free hint per
/// scene, three mistakes allowed, and a small lexicon.
#[derive(Debug, Clone)]
pub struct MissionBuilder {
    mission_id: String,
    hint_policy: HintPolicy,
    scene_unlock: SceneUnlock,
    mistakes_allowed: u32,
    scenes: Vec<Scene>,
    lexicon: Vec<LexiconTerm>,
}

impl Default for MissionBuilder {
    fn default() -> Self {
        Self {
            mission_id: "test-mission".to_owned(),
            hint_policy: HintPolicy::OneFreeHintPerScene,
            scene_unlock: SceneUnlock::Linear,
            mistakes_allowed: 3,
            scenes: Vec::new(),
            lexicon: vec![
                LexiconTerm {
                    term: "Coartada".to_owned(),
                    translation: "alibi".to_owned(),
                    note: None,
                },
                LexiconTerm {
                    term: "sospechoso".to_owned(),
                    translation: "suspect".to_owned(),
                    note: Some("también adjetivo".to_owned()),
                },
            ],
        }
    }
}

impl MissionBuilder {
    /// Starts a builder with the defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Overrides the mission id.
    #[must_use]
    pub fn mission_id(mut self, mission_id: &str) -> Self {
        self.mission_id = mission_id.to_owned();
        self
    }

    /// Overrides the hint policy.
    #[must_use]
    pub fn hint_policy(mut self, policy: HintPolicy) -> Self {
        self.hint_policy = policy;
        self
    }

    /// Overrides the unlock strategy.
    #[must_use]
    pub fn scene_unlock(mut self, rule: SceneUnlock) -> Self {
        self.scene_unlock = rule;
        self
    }

    /// Overrides the per-scene mistake allowance.
    #[must_use]
    pub fn mistakes_allowed(mut self, allowed: u32) -> Self {
        self.mistakes_allowed = allowed;
        self
    }

    /// Appends a scene with `puzzle_count` puzzles and the given evidence titles.
    /// The scene focuses on every lexicon term.
    #[must_use]
    pub fn scene(mut self, id: &str, puzzle_count: usize, evidence_titles: &[&str]) -> Self {
        let focus_terms: Vec<String> = self.lexicon.iter().map(|l| l.term.to_lowercase()).collect();
        self.scenes.push(Scene {
            id: id.to_owned(),
            node: SceneNode {
                icon: "🔍".to_owned(),
                label: format!("Escena {id}"),
            },
            story: BilingualText {
                en: format!("Scene {id} begins."),
                es: format!("Empieza la escena {id}."),
            },
            focus_terms,
            puzzles: (0..puzzle_count)
                .map(|i| mcq_puzzle(&format!("term{i}")))
                .collect(),
            conclusion_unlock: ConclusionUnlock {
                text_es: format!("Escena {id} resuelta."),
            },
            reward_evidence: evidence_titles.iter().copied().map(evidence).collect(),
        });
        self
    }

    /// Finishes the definition.
    #[must_use]
    pub fn build(self) -> MissionDefinition {
        MissionDefinition {
            mission_id: self.mission_id,
            version: "1.0.0".to_owned(),
            language: "es".to_owned(),
            title: "Caso de prueba".to_owned(),
            subtitle: "Fixture".to_owned(),
            ui: UiConfig::default(),
            story_premise: "Alguien miente.".to_owned(),
            difficulty: DifficultyConfig {
                recommended_level: "B1".to_owned(),
                mistakes_allowed_per_scene: self.mistakes_allowed,
                hint_policy: self.hint_policy,
            },
            unlock_rules: UnlockRules {
                scene_unlock: self.scene_unlock,
                requires: UnlockRequirements {
                    solve_puzzle: true,
                    confirm_conclusion: true,
                },
            },
            lexicon: self.lexicon,
            scenes: self.scenes,
            bonus_terms_coverage: None,
        }
    }
}

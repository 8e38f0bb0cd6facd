//! Mission definition schema.
//!
//! A mission is authored as a single structured document and loaded once.
//! Nothing in this module mutates after deserialization; progress lives in
//! `casefile-progress`.

use serde::{Deserialize, Serialize};

/// The full, immutable description of a mission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MissionDefinition {
    /// Mission identifier; also keys persisted progress.
    pub mission_id: String,
    /// Content version string, informational.
    pub version: String,
    /// Primary language of the content.
    pub language: String,
    /// Mission title.
    pub title: String,
    /// Mission subtitle.
    pub subtitle: String,
    /// Presentation hints. Opaque to the engine.
    #[serde(default)]
    pub ui: UiConfig,
    /// Story premise shown before the first scene.
    pub story_premise: String,
    /// Difficulty settings, including the hint policy.
    pub difficulty: DifficultyConfig,
    /// Rules governing how scenes unlock.
    pub unlock_rules: UnlockRules,
    /// Vocabulary available across all scenes.
    pub lexicon: Vec<LexiconTerm>,
    /// Scenes in unlock order.
    pub scenes: Vec<Scene>,
    /// Optional authoring note about lexicon coverage.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bonus_terms_coverage: Option<BonusTermsCoverage>,
}

impl MissionDefinition {
    /// Looks up a scene by identifier.
    #[must_use]
    pub fn scene(&self, scene_id: &str) -> Option<&Scene> {
        self.scenes.iter().find(|s| s.id == scene_id)
    }

    /// Returns the position of a scene in unlock order.
    #[must_use]
    pub fn scene_index(&self, scene_id: &str) -> Option<usize> {
        self.scenes.iter().position(|s| s.id == scene_id)
    }

    /// Case-insensitive exact-match lookup into the lexicon.
    ///
    /// The first matching entry wins when the lexicon repeats a term.
    #[must_use]
    pub fn term(&self, term: &str) -> Option<&LexiconTerm> {
        let needle = term.to_lowercase();
        self.lexicon.iter().find(|l| l.term.to_lowercase() == needle)
    }

    /// Total number of reward evidence items across all scenes.
    #[must_use]
    pub fn total_evidence(&self) -> usize {
        self.scenes.iter().map(|s| s.reward_evidence.len()).sum()
    }
}

/// Presentation configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UiConfig {
    /// Visual theme.
    #[serde(default)]
    pub theme: ThemeConfig,
    /// Scene map layout.
    #[serde(default)]
    pub map: MapConfig,
}

/// Visual theme settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThemeConfig {
    #[serde(default)]
    pub accent: String,
    #[serde(default)]
    pub background: String,
    #[serde(default)]
    pub node_style: String,
    #[serde(default)]
    pub icon_set: String,
}

/// Scene map settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MapConfig {
    #[serde(default)]
    pub layout: String,
    #[serde(default)]
    pub columns_mobile: u32,
    #[serde(default)]
    pub show_progress: bool,
}

/// Difficulty settings applied mission-wide.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DifficultyConfig {
    /// Suggested learner level, e.g. `"B1"`.
    pub recommended_level: String,
    /// Mistakes a scene tolerates. Informational: the engine never fails a scene.
    pub mistakes_allowed_per_scene: u32,
    /// Hint gating policy.
    pub hint_policy: HintPolicy,
}

/// How hints are granted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HintPolicy {
    /// Hints are never granted.
    #[serde(rename = "none")]
    None,
    /// One hint per scene.
    #[serde(rename = "oneFreeHintPerScene")]
    OneFreeHintPerScene,
    /// Hints are always granted.
    #[serde(rename = "unlimited")]
    Unlimited,
}

impl HintPolicy {
    /// Returns whether a hint may be granted given how many the scene has used.
    #[must_use]
    pub fn permits(self, hints_used: u32) -> bool {
        match self {
            Self::None => false,
            Self::OneFreeHintPerScene => hints_used < 1,
            Self::Unlimited => true,
        }
    }
}

/// Unlock rules for the mission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnlockRules {
    /// Scene unlock strategy.
    pub scene_unlock: SceneUnlock,
    /// What a scene requires before it counts as done.
    pub requires: UnlockRequirements,
}

/// Scene unlock strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SceneUnlock {
    /// Completing scene N unlocks scene N+1.
    Linear,
    /// Declared by the schema; no transitions are defined yet.
    Branching,
    /// Declared by the schema; no transitions are defined yet.
    Free,
}

/// Requirements for completing a scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnlockRequirements {
    pub solve_puzzle: bool,
    pub confirm_conclusion: bool,
}

/// A vocabulary entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LexiconTerm {
    /// The term as it appears in story text.
    pub term: String,
    /// Its translation.
    pub translation: String,
    /// Optional usage note.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

/// One story and puzzle unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Scene {
    /// Scene identifier, unique within the mission.
    pub id: String,
    /// Map node presentation.
    pub node: SceneNode,
    /// Bilingual story text.
    pub story: BilingualText,
    /// Lexicon terms this scene highlights.
    #[serde(default)]
    pub focus_terms: Vec<String>,
    /// Puzzles in play order.
    pub puzzles: Vec<Puzzle>,
    /// Conclusion revealed once the puzzles are solved.
    pub conclusion_unlock: ConclusionUnlock,
    /// Evidence granted on completion.
    #[serde(default)]
    pub reward_evidence: Vec<Evidence>,
}

/// Map node presentation for a scene.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SceneNode {
    pub icon: String,
    pub label: String,
}

/// Text in both content languages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BilingualText {
    pub en: String,
    pub es: String,
}

/// Conclusion text for a scene.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConclusionUnlock {
    pub text_es: String,
}

/// A collectible reward item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Evidence {
    /// Title; unique per scene for collection purposes.
    pub title: String,
    /// Free-form tags.
    #[serde(default)]
    pub tags: Vec<String>,
    /// Note shown on the evidence card.
    pub note_es: String,
}

/// A gradeable exercise, tagged by `type` in the document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Puzzle {
    /// Pick the translation of a single term.
    McqTranslation {
        prompt: String,
        term: String,
        choices: Vec<String>,
        answer: String,
    },
    /// Match several terms to their translations.
    MatchPairs { prompt: String, pairs: Vec<ChoiceItem> },
    /// Fill the blank in a sentence.
    FillBlank {
        prompt: String,
        options: Vec<String>,
        answer: String,
    },
    /// Choose the connector that completes each sentence.
    LogicConnectors {
        prompt: String,
        items: Vec<ConnectorItem>,
    },
    /// Mixed review of several terms.
    BossMix { prompt: String, items: Vec<ChoiceItem> },
}

impl Puzzle {
    /// The puzzle's prompt.
    #[must_use]
    pub fn prompt(&self) -> &str {
        match self {
            Self::McqTranslation { prompt, .. }
            | Self::MatchPairs { prompt, .. }
            | Self::FillBlank { prompt, .. }
            | Self::LogicConnectors { prompt, .. }
            | Self::BossMix { prompt, .. } => prompt,
        }
    }

    /// The `type` tag used in documents.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::McqTranslation { .. } => "mcq_translation",
            Self::MatchPairs { .. } => "match_pairs",
            Self::FillBlank { .. } => "fill_blank",
            Self::LogicConnectors { .. } => "logic_connectors",
            Self::BossMix { .. } => "boss_mix",
        }
    }
}

/// A term with candidate translations, used by `match_pairs` and `boss_mix`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChoiceItem {
    pub term: String,
    pub choices: Vec<String>,
    pub answer: String,
}

/// A sentence with candidate connectors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectorItem {
    pub sentence: String,
    pub choices: Vec<String>,
    pub answer: String,
}

/// Authoring note about terms outside any scene's focus.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BonusTermsCoverage {
    pub terms_not_in_focus_but_in_lexicon: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOCUMENT: &str = r#"{
        "missionId": "psycho",
        "version": "1.0.0",
        "language": "es",
        "title": "El caso",
        "subtitle": "Una investigación",
        "storyPremise": "Alguien miente.",
        "difficulty": {
            "recommendedLevel": "B1",
            "mistakesAllowedPerScene": 3,
            "hintPolicy": "oneFreeHintPerScene"
        },
        "unlockRules": {
            "sceneUnlock": "linear",
            "requires": { "solvePuzzle": true, "confirmConclusion": true }
        },
        "lexicon": [
            { "term": "Coartada", "translation": "alibi" },
            { "term": "sospechoso", "translation": "suspect", "note": "noun" }
        ],
        "scenes": [{
            "id": "s1",
            "node": { "icon": "🔍", "label": "Inicio" },
            "story": { "en": "It begins.", "es": "Empieza." },
            "focusTerms": ["coartada"],
            "puzzles": [
                { "type": "mcq_translation", "prompt": "Traduce", "term": "coartada",
                  "choices": ["alibi", "weapon"], "answer": "alibi" },
                { "type": "logic_connectors", "prompt": "Conecta",
                  "items": [{ "sentence": "Llovía ___ salió.", "choices": ["pero", "y"], "answer": "pero" }] }
            ],
            "conclusionUnlock": { "textEs": "Resuelto." },
            "rewardEvidence": [{ "title": "Recibo", "tags": ["papel"], "noteEs": "Un recibo." }]
        }]
    }"#;

    #[test]
    fn test_definition_deserializes_from_camel_case_document() {
        // Act
        let mission: MissionDefinition = serde_json::from_str(DOCUMENT).unwrap();

        // Assert
        assert_eq!(mission.mission_id, "psycho");
        assert_eq!(mission.difficulty.hint_policy, HintPolicy::OneFreeHintPerScene);
        assert_eq!(mission.unlock_rules.scene_unlock, SceneUnlock::Linear);
        assert_eq!(mission.scenes[0].puzzles.len(), 2);
        assert_eq!(mission.scenes[0].puzzles[1].kind(), "logic_connectors");
        assert_eq!(mission.ui, UiConfig::default());
        assert_eq!(mission.total_evidence(), 1);
    }

    #[test]
    fn test_term_lookup_is_case_insensitive() {
        let mission: MissionDefinition = serde_json::from_str(DOCUMENT).unwrap();

        assert_eq!(mission.term("coartada").unwrap().translation, "alibi");
        assert_eq!(mission.term("SOSPECHOSO").unwrap().note.as_deref(), Some("noun"));
        assert!(mission.term("arma").is_none());
    }

    #[test]
    fn test_scene_lookup_and_index() {
        let mission: MissionDefinition = serde_json::from_str(DOCUMENT).unwrap();

        assert_eq!(mission.scene("s1").unwrap().node.label, "Inicio");
        assert_eq!(mission.scene_index("s1"), Some(0));
        assert!(mission.scene("s9").is_none());
    }

    #[test]
    fn test_hint_policy_permits() {
        assert!(!HintPolicy::None.permits(0));
        assert!(HintPolicy::OneFreeHintPerScene.permits(0));
        assert!(!HintPolicy::OneFreeHintPerScene.permits(1));
        assert!(HintPolicy::Unlimited.permits(42));
    }

    #[test]
    fn test_unknown_unlock_rule_is_rejected() {
        let document = DOCUMENT.replace("\"linear\"", "\"random\"");

        let result = serde_json::from_str::<MissionDefinition>(&document);

        assert!(result.is_err());
    }
}

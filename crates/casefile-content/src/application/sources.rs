//! Mission sources.
//!
//! A source turns a locator into a validated `MissionDefinition`. Fetching is
//! the only asynchronous step in bringing a mission up; everything after it
//! is synchronous.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use casefile_core::error::MissionError;
use sha2::{Digest, Sha256};

use crate::domain::mission::MissionDefinition;
use crate::domain::validation::validate;

/// Encoding of a mission document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    /// JSON document.
    Json,
    /// YAML document.
    Yaml,
}

impl DocumentFormat {
    /// Picks a format from a path's extension: `.yaml`/`.yml` is YAML,
    /// anything else JSON.
    #[must_use]
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml") => {
                Self::Yaml
            }
            _ => Self::Json,
        }
    }
}

/// A definition together with the hash of the document it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedMission {
    /// The validated definition.
    pub definition: MissionDefinition,
    /// Lowercase hex SHA-256 of the raw document.
    pub content_hash: String,
}

/// Parses and validates a raw mission document.
///
/// # Errors
///
/// Returns `MissionError::DefinitionLoad` if the document does not decode,
/// or `MissionError::Validation` if it decodes but breaks a structural rule.
pub fn parse_document(raw: &str, format: DocumentFormat) -> Result<LoadedMission, MissionError> {
    let definition: MissionDefinition = match format {
        DocumentFormat::Json => serde_json::from_str(raw)
            .map_err(|e| MissionError::DefinitionLoad(format!("invalid JSON document: {e}")))?,
        DocumentFormat::Yaml => serde_yaml::from_str(raw)
            .map_err(|e| MissionError::DefinitionLoad(format!("invalid YAML document: {e}")))?,
    };
    validate(&definition)?;

    Ok(LoadedMission {
        definition,
        content_hash: format!("{:x}", Sha256::digest(raw.as_bytes())),
    })
}

/// Anything that can produce a mission definition.
#[async_trait]
pub trait MissionSource: Send + Sync {
    /// Human-readable description of where the definition comes from.
    fn locator(&self) -> String;

    /// Fetches, parses and validates the definition.
    async fn fetch(&self) -> Result<LoadedMission, MissionError>;
}

/// Reads a mission document from the local filesystem.
#[derive(Debug, Clone)]
pub struct FileMissionSource {
    path: PathBuf,
}

impl FileMissionSource {
    /// Creates a source for the document at `path`.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl MissionSource for FileMissionSource {
    fn locator(&self) -> String {
        self.path.display().to_string()
    }

    async fn fetch(&self) -> Result<LoadedMission, MissionError> {
        let raw = tokio::fs::read_to_string(&self.path).await.map_err(|e| {
            MissionError::DefinitionLoad(format!("failed to read {}: {e}", self.path.display()))
        })?;
        let loaded = parse_document(&raw, DocumentFormat::from_path(&self.path))?;
        tracing::debug!(
            path = %self.path.display(),
            mission_id = %loaded.definition.mission_id,
            content_hash = %loaded.content_hash,
            "mission document read"
        );
        Ok(loaded)
    }
}

/// Serves a mission document held in memory.
#[derive(Debug, Clone)]
pub struct InlineMissionSource {
    name: String,
    document: String,
    format: DocumentFormat,
}

impl InlineMissionSource {
    /// Creates a source serving `document` under the given display name.
    #[must_use]
    pub fn new(name: impl Into<String>, document: impl Into<String>, format: DocumentFormat) -> Self {
        Self {
            name: name.into(),
            document: document.into(),
            format,
        }
    }

    /// Creates a JSON source from an already-built definition.
    ///
    /// # Errors
    ///
    /// Returns `MissionError::DefinitionLoad` if the definition cannot be encoded.
    pub fn from_definition(definition: &MissionDefinition) -> Result<Self, MissionError> {
        let document = serde_json::to_string(definition)
            .map_err(|e| MissionError::DefinitionLoad(format!("failed to encode mission: {e}")))?;
        Ok(Self::new(
            format!("inline:{}", definition.mission_id),
            document,
            DocumentFormat::Json,
        ))
    }
}

#[async_trait]
impl MissionSource for InlineMissionSource {
    fn locator(&self) -> String {
        self.name.clone()
    }

    async fn fetch(&self) -> Result<LoadedMission, MissionError> {
        parse_document(&self.document, self.format)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const JSON: &str = r#"{
        "missionId": "inline",
        "version": "1",
        "language": "es",
        "title": "T",
        "subtitle": "S",
        "storyPremise": "P",
        "difficulty": { "recommendedLevel": "A2", "mistakesAllowedPerScene": 2, "hintPolicy": "none" },
        "unlockRules": { "sceneUnlock": "linear", "requires": { "solvePuzzle": true, "confirmConclusion": false } },
        "lexicon": [],
        "scenes": [{
            "id": "s1",
            "node": { "icon": "x", "label": "One" },
            "story": { "en": "e", "es": "s" },
            "puzzles": [],
            "conclusionUnlock": { "textEs": "fin" }
        }]
    }"#;

    const YAML: &str = "
missionId: inline
version: '1'
language: es
title: T
subtitle: S
storyPremise: P
difficulty:
  recommendedLevel: A2
  mistakesAllowedPerScene: 2
  hintPolicy: unlimited
unlockRules:
  sceneUnlock: free
  requires:
    solvePuzzle: true
    confirmConclusion: true
lexicon:
  - term: pista
    translation: clue
scenes:
  - id: s1
    node: { icon: x, label: One }
    story: { en: e, es: s }
    puzzles:
      - type: fill_blank
        prompt: Completa
        options: [pista, arma]
        answer: pista
    conclusionUnlock: { textEs: fin }
";

    #[test]
    fn test_format_from_path() {
        assert_eq!(DocumentFormat::from_path(Path::new("a/b.yaml")), DocumentFormat::Yaml);
        assert_eq!(DocumentFormat::from_path(Path::new("a/b.YML")), DocumentFormat::Yaml);
        assert_eq!(DocumentFormat::from_path(Path::new("a/b.json")), DocumentFormat::Json);
        assert_eq!(DocumentFormat::from_path(Path::new("story")), DocumentFormat::Json);
    }

    #[test]
    fn test_parse_json_document_computes_hash() {
        let loaded = parse_document(JSON, DocumentFormat::Json).unwrap();

        assert_eq!(loaded.definition.mission_id, "inline");
        assert_eq!(loaded.content_hash.len(), 64);
        assert_eq!(
            loaded.content_hash,
            parse_document(JSON, DocumentFormat::Json).unwrap().content_hash
        );
    }

    #[test]
    fn test_parse_yaml_document() {
        let loaded = parse_document(YAML, DocumentFormat::Yaml).unwrap();

        assert_eq!(loaded.definition.lexicon[0].term, "pista");
        assert_eq!(loaded.definition.scenes[0].puzzles[0].kind(), "fill_blank");
    }

    #[test]
    fn test_malformed_document_is_a_load_error() {
        let err = parse_document("{ not json", DocumentFormat::Json).unwrap_err();

        assert!(matches!(err, MissionError::DefinitionLoad(_)));
    }

    #[test]
    fn test_missing_required_field_is_a_load_error() {
        let document = JSON.replace("\"missionId\": \"inline\",", "");

        let err = parse_document(&document, DocumentFormat::Json).unwrap_err();

        assert!(matches!(err, MissionError::DefinitionLoad(msg) if msg.contains("missionId")));
    }

    #[tokio::test]
    async fn test_file_source_reads_document() {
        // Arrange
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mission.yaml");
        tokio::fs::write(&path, YAML).await.unwrap();
        let source = FileMissionSource::new(&path);

        // Act
        let loaded = source.fetch().await.unwrap();

        // Assert
        assert_eq!(loaded.definition.mission_id, "inline");
        assert_eq!(source.locator(), path.display().to_string());
    }

    #[tokio::test]
    async fn test_file_source_missing_file_is_a_load_error() {
        let source = FileMissionSource::new("/definitely/not/here.json");

        let err = source.fetch().await.unwrap_err();

        assert!(matches!(err, MissionError::DefinitionLoad(_)));
    }

    #[tokio::test]
    async fn test_inline_source_round_trips_definition() {
        let original = parse_document(JSON, DocumentFormat::Json).unwrap().definition;
        let source = InlineMissionSource::from_definition(&original).unwrap();

        let loaded = source.fetch().await.unwrap();

        assert_eq!(loaded.definition, original);
        assert_eq!(source.locator(), "inline:inline");
    }
}

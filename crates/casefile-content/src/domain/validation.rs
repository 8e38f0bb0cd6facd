//! Structural validation of mission definitions.

use std::collections::HashSet;

use casefile_core::error::MissionError;

use super::mission::{MissionDefinition, Puzzle};

/// Checks the structural rules a definition must satisfy before the engine
/// will build progress from it.
///
/// # Errors
///
/// Returns `MissionError::Validation` describing the first violation found.
pub fn validate(mission: &MissionDefinition) -> Result<(), MissionError> {
    if mission.mission_id.trim().is_empty() {
        return Err(MissionError::Validation("missionId must not be empty".to_owned()));
    }
    if mission.scenes.is_empty() {
        return Err(MissionError::Validation(
            "mission must define at least one scene".to_owned(),
        ));
    }

    let mut seen = HashSet::new();
    for scene in &mission.scenes {
        if scene.id.trim().is_empty() {
            return Err(MissionError::Validation("scene id must not be empty".to_owned()));
        }
        if !seen.insert(scene.id.as_str()) {
            return Err(MissionError::Validation(format!(
                "duplicate scene id: {}",
                scene.id
            )));
        }
        for (index, puzzle) in scene.puzzles.iter().enumerate() {
            validate_puzzle(puzzle).map_err(|reason| {
                MissionError::Validation(format!("scene {} puzzle {index}: {reason}", scene.id))
            })?;
        }
    }

    Ok(())
}

fn validate_puzzle(puzzle: &Puzzle) -> Result<(), String> {
    match puzzle {
        Puzzle::McqTranslation {
            choices, answer, ..
        } => require_answer(choices, answer),
        Puzzle::FillBlank {
            options, answer, ..
        } => require_answer(options, answer),
        Puzzle::MatchPairs { pairs: items, .. } | Puzzle::BossMix { items, .. } => items
            .iter()
            .try_for_each(|item| require_answer(&item.choices, &item.answer)),
        Puzzle::LogicConnectors { items, .. } => items
            .iter()
            .try_for_each(|item| require_answer(&item.choices, &item.answer)),
    }
}

fn require_answer(choices: &[String], answer: &str) -> Result<(), String> {
    if choices.iter().any(|c| c == answer) {
        Ok(())
    } else {
        Err(format!("answer {answer:?} is not among the choices"))
    }
}

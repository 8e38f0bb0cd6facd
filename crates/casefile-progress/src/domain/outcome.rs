//! Result of a gameplay operation.

use serde::Serialize;

/// What a mutating operation did.
///
/// Gameplay never fails with an error: missing scenes, repeated calls and a
/// mission that is not loaded yet are all ordinary outcomes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OperationOutcome {
    /// The snapshot changed and a write was queued.
    Applied,
    /// The target exists but the call had nothing to change.
    Unchanged,
    /// No scene with that id exists in the mission.
    UnknownScene,
    /// The puzzle index is past the end of the scene's puzzles.
    PuzzleOutOfRange,
    /// No mission is loaded.
    NotReady,
}

impl OperationOutcome {
    /// Returns `true` for `Applied`.
    #[must_use]
    pub fn is_applied(self) -> bool {
        self == Self::Applied
    }

    /// The serialized spelling of the outcome.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Applied => "applied",
            Self::Unchanged => "unchanged",
            Self::UnknownScene => "unknown_scene",
            Self::PuzzleOutOfRange => "puzzle_out_of_range",
            Self::NotReady => "not_ready",
        }
    }
}

impl std::fmt::Display for OperationOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

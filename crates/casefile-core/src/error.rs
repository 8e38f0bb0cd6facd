//! Mission error types.

use thiserror::Error;

/// Top-level error type for loading missions and talking to storage.
///
/// Gameplay operations never produce this type; they report missing scenes,
/// exhausted hints and similar conditions through their return values.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MissionError {
    /// The mission definition could not be fetched or decoded.
    #[error("mission definition could not be loaded: {0}")]
    DefinitionLoad(String),

    /// The mission definition decoded but is structurally invalid.
    #[error("validation error: {0}")]
    Validation(String),

    /// A storage back-end failed.
    #[error("infrastructure error: {0}")]
    Infrastructure(String),
}

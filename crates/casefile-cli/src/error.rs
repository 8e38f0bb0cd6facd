//! Casefile CLI: error types.

use casefile_core::error::MissionError;
use thiserror::Error;

/// Startup and runtime errors for the CLI.
#[derive(Debug, Error)]
pub enum AppError {
    /// A flag or environment variable is missing or invalid.
    #[error("configuration error: {0}")]
    Config(String),

    /// The mission could not be loaded or the store could not be opened.
    #[error(transparent)]
    Mission(#[from] MissionError),

    /// Writing the report failed.
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mission_error_message_passes_through() {
        let err = AppError::from(MissionError::Validation("duplicate scene id: s1".into()));

        assert_eq!(err.to_string(), "validation error: duplicate scene id: s1");
    }

    #[test]
    fn test_config_error_is_prefixed() {
        let err = AppError::Config("mission path is empty".into());

        assert_eq!(err.to_string(), "configuration error: mission path is empty");
    }
}

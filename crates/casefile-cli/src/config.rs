//! Command-line arguments and the validated configuration built from them.
//!
//! Every flag falls back to an environment variable, then to a default.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

use crate::error::AppError;

/// Casefile - play a bilingual detective mission one step at a time.
#[derive(Parser, Debug, Clone)]
#[command(name = "casefile", version)]
#[command(about = "Play a bilingual detective mission one step at a time")]
pub struct Cli {
    /// Path to the mission definition (`.json`, `.yaml` or `.yml`)
    #[arg(
        long,
        env = "CASEFILE_MISSION",
        default_value = "stories/psycho.json",
        global = true
    )]
    pub mission: PathBuf,

    /// Where progress is kept
    #[arg(
        long,
        env = "CASEFILE_STORE",
        value_enum,
        default_value_t = StoreKind::File,
        global = true
    )]
    pub store: StoreKind,

    /// Directory for the file store
    #[arg(long, env = "CASEFILE_DATA_DIR", default_value = ".casefile", global = true)]
    pub data_dir: PathBuf,

    /// SQLite URL for the sqlite store
    #[arg(
        long,
        env = "DATABASE_URL",
        default_value = "sqlite://casefile.db?mode=rwc",
        global = true
    )]
    pub database_url: String,

    /// Log output format (written to stderr)
    #[arg(
        long,
        env = "CASEFILE_LOG_FORMAT",
        value_enum,
        default_value_t = LogFormat::Text,
        global = true
    )]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub command: Command,
}

/// Progress back-end selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StoreKind {
    /// One JSON file per mission under the data directory.
    File,
    /// A single `SQLite` table.
    Sqlite,
    /// Nothing survives the process.
    Memory,
}

/// Log line format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    Text,
    Json,
}

/// One operation per invocation.
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Mission counters and every scene's status
    Status,
    /// A scene's story, focus terms and resume point
    Scene { scene_id: String },
    /// Enter a scene
    Start { scene_id: String },
    /// Record a solved puzzle (zero-based index)
    Solve { scene_id: String, puzzle_index: u32 },
    /// Record a wrong answer
    Mistake { scene_id: String },
    /// Ask for a hint
    Hint { scene_id: String },
    /// Confirm the conclusion: collect the scene's evidence and complete it
    Complete { scene_id: String },
    /// The evidence board
    Evidence,
    /// Look up a lexicon term
    Term { word: String },
    /// Discard all progress for the mission
    Reset,
}

/// Resolved back-end settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreConfig {
    File { dir: PathBuf },
    Sqlite { url: String },
    Memory,
}

/// Validated configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub mission: PathBuf,
    pub store: StoreConfig,
    pub log_format: LogFormat,
}

impl Config {
    /// Validates parsed arguments. Performs no I/O.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` when the mission path or the selected
    /// back-end's setting is unusable.
    pub fn from_cli(cli: &Cli) -> Result<Self, AppError> {
        if cli.mission.as_os_str().is_empty() {
            return Err(AppError::Config("mission path is empty".into()));
        }

        let store = match cli.store {
            StoreKind::File => {
                if cli.data_dir.as_os_str().is_empty() {
                    return Err(AppError::Config("data directory is empty".into()));
                }
                StoreConfig::File {
                    dir: cli.data_dir.clone(),
                }
            }
            StoreKind::Sqlite => {
                if !cli.database_url.starts_with("sqlite:") {
                    return Err(AppError::Config(format!(
                        "DATABASE_URL must be a sqlite: URL, got {:?}",
                        cli.database_url
                    )));
                }
                StoreConfig::Sqlite {
                    url: cli.database_url.clone(),
                }
            }
            StoreKind::Memory => StoreConfig::Memory,
        };

        Ok(Self {
            mission: cli.mission.clone(),
            store,
            log_format: cli.log_format,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("casefile").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_flags_override_defaults() {
        // Arrange
        let cli = parse(&[
            "--mission",
            "stories/other.yaml",
            "--store",
            "sqlite",
            "--database-url",
            "sqlite::memory:",
            "status",
        ]);

        // Act
        let config = Config::from_cli(&cli).unwrap();

        // Assert
        assert_eq!(config.mission, PathBuf::from("stories/other.yaml"));
        assert_eq!(
            config.store,
            StoreConfig::Sqlite {
                url: "sqlite::memory:".into()
            }
        );
        assert_eq!(cli.command, Command::Status);
    }

    #[test]
    fn test_solve_parses_scene_and_index() {
        let cli = parse(&["--store", "memory", "solve", "s2", "1"]);

        assert_eq!(
            cli.command,
            Command::Solve {
                scene_id: "s2".into(),
                puzzle_index: 1
            }
        );
        assert_eq!(Config::from_cli(&cli).unwrap().store, StoreConfig::Memory);
    }

    #[test]
    fn test_global_flags_accepted_after_subcommand() {
        let cli = parse(&["hint", "s1", "--data-dir", "/tmp/casefile"]);

        assert_eq!(
            Config::from_cli(&cli).unwrap().store,
            StoreConfig::File {
                dir: PathBuf::from("/tmp/casefile")
            }
        );
    }

    #[test]
    fn test_negative_puzzle_index_is_rejected() {
        let result = Cli::try_parse_from(["casefile", "solve", "s1", "-1"]);

        assert!(result.is_err());
    }

    #[test]
    fn test_unknown_store_kind_is_rejected() {
        let result = Cli::try_parse_from(["casefile", "--store", "redis", "status"]);

        assert!(result.is_err());
    }

    #[test]
    fn test_non_sqlite_database_url_is_config_error() {
        let cli = parse(&[
            "--store",
            "sqlite",
            "--database-url",
            "postgres://localhost/casefile",
            "status",
        ]);

        let err = Config::from_cli(&cli).unwrap_err();

        assert!(matches!(err, AppError::Config(_)));
    }

    #[test]
    fn test_empty_mission_path_is_config_error() {
        let mut cli = parse(&["status"]);
        cli.mission = PathBuf::new();

        assert!(matches!(Config::from_cli(&cli), Err(AppError::Config(_))));
    }
}

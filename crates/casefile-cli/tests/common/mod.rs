//! Shared test helpers for CLI integration tests.
#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::Arc;

use casefile_cli::commands;
use casefile_cli::config::{Command, Config, LogFormat, StoreConfig};
use casefile_cli::error::AppError;
use casefile_content::domain::mission::MissionDefinition;
use casefile_core::clock::Clock;
use casefile_test_support::{FixedClock, MissionBuilder, fixed_now};
use tempfile::TempDir;

/// A temporary directory holding a mission document and a file store.
pub struct Workspace {
    pub dir: TempDir,
    pub config: Config,
}

impl Workspace {
    /// Writes `mission` as JSON and points a file-store config at it.
    pub fn new(mission: &MissionDefinition) -> Self {
        let dir = tempfile::tempdir().unwrap();
        let mission_path = dir.path().join("mission.json");
        std::fs::write(&mission_path, serde_json::to_string_pretty(mission).unwrap()).unwrap();
        let config = Config {
            mission: mission_path,
            store: StoreConfig::File {
                dir: dir.path().join("progress"),
            },
            log_format: LogFormat::Text,
        };
        Self { dir, config }
    }

    /// The two-scene mission most tests play through.
    pub fn two_scenes() -> Self {
        Self::new(
            &MissionBuilder::new()
                .scene("s1", 2, &["Cuchillo", "Nota"])
                .scene("s2", 1, &["Diario"])
                .build(),
        )
    }

    /// Path of the persisted progress file for `mission_id`.
    pub fn progress_file(&self, mission_id: &str) -> PathBuf {
        self.dir
            .path()
            .join("progress")
            .join(format!("puzzle_game_progress_{mission_id}.json"))
    }

    /// Parsed contents of the persisted progress file.
    pub fn progress_json(&self, mission_id: &str) -> serde_json::Value {
        let raw = std::fs::read_to_string(self.progress_file(mission_id)).unwrap();
        serde_json::from_str(&raw).unwrap()
    }

    /// Runs one command the way the binary does, with a fixed clock.
    pub async fn run(&self, command: Command) -> Result<String, AppError> {
        commands::run(&self.config, &command, fixed_clock()).await
    }

    /// Runs one command and unwraps the report.
    pub async fn ok(&self, command: Command) -> String {
        self.run(command).await.unwrap()
    }

    /// Starts a scene, solves each of its `puzzles` in order and completes it.
    /// Returns the completion report.
    pub async fn play_through(&self, scene_id: &str, puzzles: u32) -> String {
        self.ok(start(scene_id)).await;
        for index in 0..puzzles {
            self.ok(solve(scene_id, index)).await;
        }
        self.ok(complete(scene_id)).await
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }
}

pub fn fixed_clock() -> Arc<dyn Clock> {
    Arc::new(FixedClock(fixed_now()))
}

pub fn start(scene_id: &str) -> Command {
    Command::Start {
        scene_id: scene_id.into(),
    }
}

pub fn solve(scene_id: &str, puzzle_index: u32) -> Command {
    Command::Solve {
        scene_id: scene_id.into(),
        puzzle_index,
    }
}

pub fn complete(scene_id: &str) -> Command {
    Command::Complete {
        scene_id: scene_id.into(),
    }
}

pub fn hint(scene_id: &str) -> Command {
    Command::Hint {
        scene_id: scene_id.into(),
    }
}

pub fn mistake(scene_id: &str) -> Command {
    Command::Mistake {
        scene_id: scene_id.into(),
    }
}

//! One invocation: open the store, load the mission, apply one command.

use std::io::Write;
use std::sync::Arc;

use casefile_content::application::sources::FileMissionSource;
use casefile_core::clock::Clock;
use casefile_core::store::KeyValueStore;
use casefile_progress::application::store::ProgressStore;
use casefile_progress::application::queries::ResumePoint;
use casefile_progress::{ProgressEngine, SceneStatus};
use casefile_store::file_store::FileKeyValueStore;
use casefile_store::memory_store::MemoryKeyValueStore;
use casefile_store::sqlite_store::SqliteKeyValueStore;

use crate::config::{Command, Config, StoreConfig};
use crate::error::AppError;
use crate::report;

/// Opens the configured back-end.
///
/// # Errors
///
/// Returns `AppError::Mission` if the `SQLite` database cannot be opened.
pub async fn open_backend(
    store: &StoreConfig,
    clock: Arc<dyn Clock>,
) -> Result<Arc<dyn KeyValueStore>, AppError> {
    let backend: Arc<dyn KeyValueStore> = match store {
        StoreConfig::File { dir } => Arc::new(FileKeyValueStore::new(dir.clone())),
        StoreConfig::Sqlite { url } => Arc::new(SqliteKeyValueStore::connect(url, clock).await?),
        StoreConfig::Memory => Arc::new(MemoryKeyValueStore::new()),
    };
    Ok(backend)
}

/// Builds an engine over `backend` and loads the configured mission into it.
///
/// # Errors
///
/// Returns `AppError::Mission` if the definition cannot be fetched or is invalid.
pub async fn open_engine(
    config: &Config,
    backend: Arc<dyn KeyValueStore>,
    clock: Arc<dyn Clock>,
) -> Result<ProgressEngine, AppError> {
    let mut engine = ProgressEngine::new(clock, ProgressStore::new(backend));
    engine.load(&FileMissionSource::new(&config.mission)).await?;
    Ok(engine)
}

/// Reports a scene the player has not reached yet. Unknown scenes pass
/// through so the engine can report them.
fn refuse_locked(engine: &ProgressEngine, action: &str, scene_id: &str) -> Option<String> {
    let locked = engine.get_scene(scene_id).is_some() && !engine.is_scene_unlocked(scene_id);
    locked.then(|| format!("{action} {scene_id}: locked"))
}

/// Applies `command` to a loaded engine and renders the result.
///
/// Commands that play a scene are refused while the scene is locked.
pub fn execute(engine: &mut ProgressEngine, command: &Command) -> String {
    let gated = match command {
        Command::Start { scene_id } => refuse_locked(engine, "start", scene_id),
        Command::Solve { scene_id, .. } => refuse_locked(engine, "solve", scene_id),
        Command::Mistake { scene_id } => refuse_locked(engine, "mistake", scene_id),
        Command::Hint { scene_id } => refuse_locked(engine, "hint", scene_id),
        Command::Complete { scene_id } => refuse_locked(engine, "complete", scene_id),
        _ => None,
    };
    if let Some(refusal) = gated {
        return refusal;
    }

    match command {
        Command::Status => report::status(engine),
        Command::Scene { scene_id } => report::scene(engine, scene_id),
        Command::Start { scene_id } => {
            let outcome = engine.start_scene(scene_id);
            report::outcome(engine, "start", scene_id, outcome)
        }
        Command::Solve {
            scene_id,
            puzzle_index,
        } => {
            let outcome = engine.complete_puzzle(scene_id, *puzzle_index);
            report::outcome(engine, "solve", scene_id, outcome)
        }
        Command::Mistake { scene_id } => {
            let outcome = engine.record_mistake(scene_id);
            report::outcome(engine, "mistake", scene_id, outcome)
        }
        Command::Hint { scene_id } => {
            if engine.use_hint(scene_id) {
                let used = engine
                    .snapshot()
                    .and_then(|s| s.scene(scene_id))
                    .map_or(0, |p| p.hints_used);
                format!("hint granted for {scene_id} ({used} used)")
            } else {
                format!("no hint available for {scene_id}")
            }
        }
        Command::Complete { scene_id } => complete(engine, scene_id),
        Command::Evidence => report::evidence(engine),
        Command::Term { word } => report::term(engine, word),
        Command::Reset => {
            let outcome = engine.reset_progress();
            format!("reset: {outcome}")
        }
    }
}

/// Confirms a scene's conclusion: its reward evidence is collected, then the
/// scene is completed.
fn complete(engine: &mut ProgressEngine, scene_id: &str) -> String {
    let Some(scene) = engine.get_scene(scene_id).cloned() else {
        return format!("complete {scene_id}: unknown_scene");
    };
    if engine.resume_point(scene_id) != Some(ResumePoint::Conclusion) {
        let (solved, total) = engine
            .snapshot()
            .and_then(|s| s.scene(scene_id))
            .map_or((0, 0), |p| (p.puzzles_solved, p.total_puzzles));
        return format!("complete {scene_id}: puzzles remaining ({solved}/{total} solved)");
    }
    let locked_before: Vec<String> = engine
        .definition()
        .map(|d| {
            d.scenes
                .iter()
                .filter(|s| engine.scene_status(&s.id) == SceneStatus::Locked)
                .map(|s| s.id.clone())
                .collect()
        })
        .unwrap_or_default();

    let mut lines = Vec::new();
    for item in &scene.reward_evidence {
        if engine.collect_evidence(scene_id, item).is_applied() {
            lines.push(format!("collected: {}", item.title));
        }
    }

    let outcome = engine.complete_scene(scene_id);
    lines.push(report::outcome(engine, "complete", scene_id, outcome));

    let newly_unlocked: Vec<&str> = locked_before
        .iter()
        .filter(|id| engine.scene_status(id).is_unlocked())
        .map(String::as_str)
        .collect();
    if !newly_unlocked.is_empty() {
        lines.push(format!("unlocked: {}", newly_unlocked.join(", ")));
    }
    let closed = engine
        .summary()
        .is_some_and(|s| s.scenes_completed == s.scenes_total);
    if outcome.is_applied() && closed {
        lines.push("case closed".to_owned());
    }
    lines.join("\n")
}

/// Runs one command end to end and waits for its writes to land.
///
/// # Errors
///
/// Returns `AppError::Mission` if the store cannot be opened or the mission
/// cannot be loaded.
pub async fn run(
    config: &Config,
    command: &Command,
    clock: Arc<dyn Clock>,
) -> Result<String, AppError> {
    let backend = open_backend(&config.store, clock.clone()).await?;
    let mut engine = open_engine(config, backend, clock).await?;
    let rendered = execute(&mut engine, command);
    engine.flush().await;
    Ok(rendered)
}

/// Writes a rendered report followed by a newline and flushes `out`.
///
/// # Errors
///
/// Returns `AppError::Io` if the write or the flush fails.
pub fn write_report(out: &mut impl Write, rendered: &str) -> Result<(), AppError> {
    writeln!(out, "{rendered}")?;
    out.flush()?;
    Ok(())
}

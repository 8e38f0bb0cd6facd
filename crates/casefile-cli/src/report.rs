//! Plain-text renderings of engine state.

use casefile_progress::application::queries::ResumePoint;
use casefile_progress::{OperationOutcome, ProgressEngine};

/// Mission counters, then one line per scene, then the playable frontier.
#[must_use]
pub fn status(engine: &ProgressEngine) -> String {
    let (Some(summary), Some(definition)) = (engine.summary(), engine.definition()) else {
        return "no mission loaded".to_owned();
    };

    let mut lines = vec![
        format!("{} ({})", summary.title, summary.mission_id),
        format!(
            "scenes {}/{} completed ({:.0}%), evidence {}/{}, mistakes {}",
            summary.scenes_completed,
            summary.scenes_total,
            summary.completion_percent(),
            summary.evidence_collected,
            summary.evidence_total,
            summary.total_mistakes,
        ),
    ];
    for scene in &definition.scenes {
        let status = engine.scene_status(&scene.id).as_str();
        let line = match engine.snapshot().and_then(|s| s.scene(&scene.id)) {
            Some(p) => format!(
                "  [{status:<11}] {:<8} {:<24} {}/{} solved  mistakes {}  hints {}",
                scene.id, scene.node.label, p.puzzles_solved, p.total_puzzles, p.mistakes, p.hints_used,
            ),
            None => format!("  [{status:<11}] {:<8} {}", scene.id, scene.node.label),
        };
        lines.push(line);
    }

    let frontier = engine.frontier();
    if frontier.is_empty() {
        lines.push("next: none".to_owned());
    } else {
        lines.push(format!("next: {}", frontier.join(", ")));
    }
    lines.join("\n")
}

/// A scene's story, counters, resume point, focus terms and evidence.
#[must_use]
pub fn scene(engine: &ProgressEngine, scene_id: &str) -> String {
    let Some(scene) = engine.get_scene(scene_id) else {
        return format!("unknown scene: {scene_id}");
    };

    let mut lines = vec![
        format!("{} {} [{}]", scene.id, scene.node.label, engine.scene_status(scene_id)),
        format!("EN: {}", scene.story.en),
        format!("ES: {}", scene.story.es),
    ];

    if let Some(progress) = engine.snapshot().and_then(|s| s.scene(scene_id)) {
        lines.push(format!(
            "puzzles {}/{} solved, mistakes {}, hints {}",
            progress.puzzles_solved, progress.total_puzzles, progress.mistakes, progress.hints_used
        ));
    }
    match engine.resume_point(scene_id) {
        Some(ResumePoint::Story) => lines.push("resume: story".to_owned()),
        Some(ResumePoint::Puzzle(index)) => {
            let detail = usize::try_from(index)
                .ok()
                .and_then(|i| scene.puzzles.get(i))
                .map(|p| format!(" ({}): {}", p.kind(), p.prompt()))
                .unwrap_or_default();
            lines.push(format!("resume: puzzle {index}{detail}"));
        }
        Some(ResumePoint::Conclusion) => {
            lines.push(format!("resume: conclusion: {}", scene.conclusion_unlock.text_es));
        }
        None => {}
    }
    if let Some(left) = engine.mistakes_remaining(scene_id) {
        lines.push(format!("mistakes left: {left}"));
    }
    lines.push(format!(
        "hint available: {}",
        if engine.hint_available(scene_id) { "yes" } else { "no" }
    ));

    let terms = engine.scene_terms(scene_id);
    if !terms.is_empty() {
        lines.push("terms:".to_owned());
        lines.extend(terms.into_iter().map(|t| match &t.note {
            Some(note) => format!("  {} = {} ({note})", t.term, t.translation),
            None => format!("  {} = {}", t.term, t.translation),
        }));
    }

    if !scene.reward_evidence.is_empty() {
        lines.push("evidence:".to_owned());
        let snapshot = engine.snapshot();
        lines.extend(scene.reward_evidence.iter().map(|e| {
            let collected = snapshot.is_some_and(|s| s.has_evidence(scene_id, &e.title));
            format!("  [{}] {}", if collected { "x" } else { " " }, e.title)
        }));
    }
    lines.join("\n")
}

/// One line for a mutation, plus the scene's counters when it exists.
#[must_use]
pub fn outcome(engine: &ProgressEngine, action: &str, scene_id: &str, outcome: OperationOutcome) -> String {
    let head = format!("{action} {scene_id}: {outcome}");
    match engine.snapshot().and_then(|s| s.scene(scene_id)) {
        Some(p) => format!(
            "{head}\n  status {}, puzzles {}/{}, mistakes {}, hints {}",
            p.status, p.puzzles_solved, p.total_puzzles, p.mistakes, p.hints_used
        ),
        None => head,
    }
}

/// The evidence board, grouped by scene.
#[must_use]
pub fn evidence(engine: &ProgressEngine) -> String {
    let catalog = engine.evidence_catalog();
    if catalog.is_empty() {
        return "no mission loaded".to_owned();
    }
    let mut lines = Vec::new();
    for scene in catalog {
        lines.push(format!("{} {}", scene.scene_id, scene.label));
        for entry in scene.evidence {
            let mark = if entry.collected { "x" } else { " " };
            if entry.tags.is_empty() {
                lines.push(format!("  [{mark}] {}", entry.title));
            } else {
                lines.push(format!("  [{mark}] {} #{}", entry.title, entry.tags.join(" #")));
            }
        }
    }
    lines.join("\n")
}

/// A lexicon lookup.
#[must_use]
pub fn term(engine: &ProgressEngine, word: &str) -> String {
    match engine.get_term(word) {
        Some(entry) => match &entry.note {
            Some(note) => format!("{}: {}\n  {note}", entry.term, entry.translation),
            None => format!("{}: {}", entry.term, entry.translation),
        },
        None => format!("no lexicon entry for {word:?}"),
    }
}

//! Casefile: Progress.
//!
//! Owns play state for a loaded mission: the scene lifecycle, puzzle and
//! mistake counters, hint gating, evidence collection, and durable snapshots
//! with resume semantics. The `ProgressEngine` is the only writer of
//! progress; everything else reads through it.

pub mod application;
pub mod domain;

pub use application::engine::{LoadTicket, ProgressEngine};
pub use domain::outcome::OperationOutcome;
pub use domain::snapshot::{CollectedEvidence, ProgressSnapshot, SceneProgress, SceneStatus};

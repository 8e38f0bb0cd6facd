//! Casefile: Mission Definition.
//!
//! Responsible for the read-only description of a mission: scenes,
//! puzzles, lexicon and unlock policy, plus parsing, structural validation
//! and fetching from a locator.

pub mod application;
pub mod domain;

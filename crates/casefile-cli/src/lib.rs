//! Casefile CLI: library half of the `casefile` binary.
//!
//! Split from `main.rs` so integration tests can drive the same command
//! path the binary uses.

pub mod commands;
pub mod config;
pub mod error;
pub mod report;

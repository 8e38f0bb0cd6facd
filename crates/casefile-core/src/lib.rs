//! Casefile Core: shared abstractions.
//!
//! This crate defines the traits and types that the content, progress and
//! storage crates all depend on. It contains no infrastructure code.

pub mod clock;
pub mod error;
pub mod store;

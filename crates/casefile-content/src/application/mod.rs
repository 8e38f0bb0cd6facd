//! Application layer for mission definitions.

pub mod sources;

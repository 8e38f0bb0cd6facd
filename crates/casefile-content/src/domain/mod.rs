//! Domain layer for mission definitions.

pub mod mission;
pub mod validation;

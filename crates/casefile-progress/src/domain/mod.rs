//! Domain layer: the snapshot and the rules that move it.

pub mod outcome;
pub mod restore;
pub mod snapshot;
pub mod synthesis;

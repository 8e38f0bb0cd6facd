//! Shared test mocks and fixtures for the Casefile mission engine.

mod clock;
mod fixtures;
mod store;

pub use clock::{FixedClock, SteppingClock, fixed_now};
pub use fixtures::{MissionBuilder, evidence, mcq_puzzle};
pub use store::{FailingKeyValueStore, RecordingKeyValueStore};

//! Application layer: the engine, its persistence path and its queries.

pub mod engine;
pub mod queries;
pub mod store;
pub mod writer;

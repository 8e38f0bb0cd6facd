//! Casefile Store: durable `KeyValueStore` back-ends.
//!
//! All back-ends are local to the device. None coordinates with other
//! processes; concurrent writers to one key resolve as last-write-wins.

pub mod file_store;
pub mod memory_store;
pub mod schema;
pub mod sqlite_store;

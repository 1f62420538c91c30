//! Dataset loading and the in-memory index
//!
//! The unified monthly CSV is parsed once per process into a [`DatasetIndex`];
//! every other component is a pure function over snapshots and series pulled
//! from it.

pub mod index;
pub mod loader;
pub mod schema;

pub use index::DatasetIndex;
pub use schema::Column;

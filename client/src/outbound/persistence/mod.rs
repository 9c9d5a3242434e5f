//! Durable key-value persistence adapters.

mod dir_store;
mod memory;

pub use dir_store::DirKeyValueStore;
pub use memory::MemoryKeyValueStore;

pub mod backend;
pub mod json_store;
pub mod schema;

pub use backend::{DirBackend, MemoryBackend, StorageBackend};
pub use json_store::GameStore;

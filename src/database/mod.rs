pub mod connection;
pub mod entities;
pub mod json_store;
pub mod memory_store;
pub mod store;

pub use connection::*;
pub use entities::*;
pub use json_store::JsonFileStore;
pub use memory_store::MemoryStore;
pub use store::{RecordStore, Sequences, Snapshot};

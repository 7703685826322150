mod file_storage;

pub use file_storage::{JsonFileStore, MemoryStore, SnapshotStore, StorageError};

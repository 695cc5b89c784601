//! Storage layer
//!
//! Key-value persistence for the catalog blobs.
//!
//! ## Backends
//!
//! - **File**: one JSON file per key, atomic writes
//! - **SQLite**: one `kv_store` table in a single database file
//! - **Memory**: nothing persisted, for tests
//!
//! The store never reads or writes partial values; each key holds a whole
//! JSON document that is replaced on every change.

pub mod backend;
pub mod error;
pub mod file;
pub mod sqlite;

pub use backend::{validate_key, KeyValueBackend, MemoryBackend};
pub use error::{StorageError, StorageResult};
pub use file::FileBackend;
pub use sqlite::SqliteBackend;

use crate::config::{BackendKind, Config};

/// Open the backend selected by the configuration
pub fn open_backend(config: &Config) -> StorageResult<Box<dyn KeyValueBackend>> {
    match config.backend {
        BackendKind::File => Ok(Box::new(FileBackend::open(config.storage_dir())?)),
        BackendKind::Sqlite => Ok(Box::new(SqliteBackend::open(&config.sqlite_path())?)),
    }
}

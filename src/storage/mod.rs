pub mod database;
pub mod file;
pub mod kv;
pub mod store;

use anyhow::Result;

use crate::config::{StorageBackend, StorageConfig};
use crate::utils::paths::{get_data_dir, get_database_path};

pub use database::SqliteStore;
pub use file::JsonFileStore;
pub use kv::{KeyValueStore, MemoryStore};
pub use store::{DEFAULT_STORAGE_KEY, DateTodoStore};

/// Open the configured durable backend.
pub fn open_backend(config: &StorageConfig) -> Result<Box<dyn KeyValueStore>> {
    let backend: Box<dyn KeyValueStore> = match config.backend {
        StorageBackend::Json => Box::new(JsonFileStore::new(get_data_dir()?)),
        StorageBackend::Sqlite => Box::new(SqliteStore::open(&get_database_path()?)?),
    };
    Ok(backend)
}

/// Load the todo store described by `config`.
pub fn open_store(config: &StorageConfig) -> Result<DateTodoStore<Box<dyn KeyValueStore>>> {
    let backend = open_backend(config)?;
    Ok(DateTodoStore::load(backend, config.key.clone()))
}

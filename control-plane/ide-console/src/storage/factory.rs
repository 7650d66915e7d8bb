use crate::config::{StorageConfig, StorageType};
use anyhow::Result;
use ide_storage::memory::MemoryStorageFactory;
use tracing::debug;

pub async fn create_storage_factory(
    config: &StorageConfig,
) -> Result<MemoryStorageFactory> {
    match config.storage_type {
        StorageType::Memory => {
            debug!("Using in-memory storage");
            Ok(MemoryStorageFactory)
        }
    }
}

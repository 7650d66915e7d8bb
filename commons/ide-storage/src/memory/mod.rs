use crate::traits::*;
use async_trait::async_trait;
use ide_models::{CloudConnector, Runner, VmImage};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

type MemoryStore<T> = Arc<RwLock<HashMap<String, T>>>;

fn new_store<T>() -> MemoryStore<T> {
    Arc::new(RwLock::new(HashMap::new()))
}

#[derive(Clone, Default)]
pub struct MemoryConnectorStorage {
    store: MemoryStore<CloudConnector>,
}

#[derive(Clone, Default)]
pub struct MemoryImageStorage {
    store: MemoryStore<VmImage>,
}

#[derive(Clone, Default)]
pub struct MemoryRunnerStorage {
    store: MemoryStore<Runner>,
}

impl MemoryConnectorStorage {
    pub fn new() -> Self {
        Self { store: new_store() }
    }
}

impl MemoryImageStorage {
    pub fn new() -> Self {
        Self { store: new_store() }
    }
}

impl MemoryRunnerStorage {
    pub fn new() -> Self {
        Self { store: new_store() }
    }
}

#[async_trait]
impl StorageHealth for MemoryConnectorStorage {
    async fn health(&self) -> StorageResult<()> {
        Ok(())
    }
}

#[async_trait]
impl StorageHealth for MemoryImageStorage {
    async fn health(&self) -> StorageResult<()> {
        Ok(())
    }
}

#[async_trait]
impl StorageHealth for MemoryRunnerStorage {
    async fn health(&self) -> StorageResult<()> {
        Ok(())
    }
}

#[async_trait]
impl ConnectorStorage for MemoryConnectorStorage {
    async fn store_connector(
        &self,
        connector: &CloudConnector,
    ) -> StorageResult<()> {
        let mut store = self.store.write().await;
        store.insert(connector.id.clone(), connector.clone());
        Ok(())
    }

    async fn get_connector(
        &self,
        id: &str,
    ) -> StorageResult<Option<CloudConnector>> {
        let store = self.store.read().await;
        Ok(store.get(id).cloned())
    }

    async fn list_connectors(
        &self,
        filter: ConnectorFilter,
    ) -> StorageResult<Vec<CloudConnector>> {
        let store = self.store.read().await;
        Ok(store
            .values()
            .filter(|connector| filter.matches(connector))
            .cloned()
            .collect())
    }

    async fn delete_connector(&self, id: &str) -> StorageResult<()> {
        let mut store = self.store.write().await;
        store.remove(id);
        Ok(())
    }

    async fn connector_exists(&self, id: &str) -> StorageResult<bool> {
        let store = self.store.read().await;
        Ok(store.contains_key(id))
    }
}

#[async_trait]
impl ImageStorage for MemoryImageStorage {
    async fn store_image(&self, image: &VmImage) -> StorageResult<()> {
        let mut store = self.store.write().await;
        store.insert(image.identifier.clone(), image.clone());
        Ok(())
    }

    async fn get_image(
        &self,
        identifier: &str,
    ) -> StorageResult<Option<VmImage>> {
        let store = self.store.read().await;
        Ok(store.get(identifier).cloned())
    }

    async fn list_images(
        &self,
        filter: ImageFilter,
    ) -> StorageResult<Vec<VmImage>> {
        let store = self.store.read().await;
        Ok(store
            .values()
            .filter(|image| filter.matches(image))
            .cloned()
            .collect())
    }

    async fn delete_image(&self, identifier: &str) -> StorageResult<()> {
        let mut store = self.store.write().await;
        store.remove(identifier);
        Ok(())
    }

    async fn image_exists(&self, identifier: &str) -> StorageResult<bool> {
        let store = self.store.read().await;
        Ok(store.contains_key(identifier))
    }
}

#[async_trait]
impl RunnerStorage for MemoryRunnerStorage {
    async fn store_runner(&self, runner: &Runner) -> StorageResult<()> {
        let mut store = self.store.write().await;
        store.insert(runner.id.clone(), runner.clone());
        Ok(())
    }

    async fn get_runner(&self, id: &str) -> StorageResult<Option<Runner>> {
        let store = self.store.read().await;
        Ok(store.get(id).cloned())
    }

    async fn list_runners(
        &self,
        filter: RunnerFilter,
    ) -> StorageResult<Vec<Runner>> {
        let store = self.store.read().await;
        Ok(store
            .values()
            .filter(|runner| filter.matches(runner))
            .cloned()
            .collect())
    }

    async fn delete_runner(&self, id: &str) -> StorageResult<()> {
        let mut store = self.store.write().await;
        store.remove(id);
        Ok(())
    }

    async fn runner_exists(&self, id: &str) -> StorageResult<bool> {
        let store = self.store.read().await;
        Ok(store.contains_key(id))
    }
}

pub struct MemoryStorageFactory;

impl StorageFactory for MemoryStorageFactory {
    type ConnectorStorage = MemoryConnectorStorage;
    type ImageStorage = MemoryImageStorage;
    type RunnerStorage = MemoryRunnerStorage;

    fn create_connector_storage(&self) -> Self::ConnectorStorage {
        MemoryConnectorStorage::new()
    }

    fn create_image_storage(&self) -> Self::ImageStorage {
        MemoryImageStorage::new()
    }

    fn create_runner_storage(&self) -> Self::RunnerStorage {
        MemoryRunnerStorage::new()
    }
}

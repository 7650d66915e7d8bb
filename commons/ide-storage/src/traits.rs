use crate::error::StorageError;
use async_trait::async_trait;
use ide_models::{CloudConnector, Runner, RunnerState, VmImage};

pub type StorageResult<T> = Result<T, StorageError>;

#[async_trait]
pub trait StorageHealth: Send + Sync {
    /// Lightweight connectivity check to the backing store.
    /// Should return Ok(()) if the backend is reachable and responding.
    async fn health(&self) -> StorageResult<()>;
}

#[derive(Debug, Clone, Default)]
pub struct ConnectorFilter {
    pub provider: Option<String>,
    pub active: Option<bool>,
}

impl ConnectorFilter {
    pub fn matches(&self, connector: &CloudConnector) -> bool {
        if let Some(ref provider) = self.provider {
            if connector.provider != *provider {
                return false;
            }
        }
        if let Some(active) = self.active {
            if connector.active != active {
                return false;
            }
        }
        true
    }
}

#[derive(Debug, Clone, Default)]
pub struct ImageFilter {
    pub active: Option<bool>,
    pub connector_id: Option<String>,
}

impl ImageFilter {
    pub fn matches(&self, image: &VmImage) -> bool {
        if let Some(active) = self.active {
            if image.active != active {
                return false;
            }
        }
        if let Some(ref connector_id) = self.connector_id {
            let owner = image.cloud_connector.as_ref().map(|c| &c.id);
            if owner != Some(connector_id) {
                return false;
            }
        }
        true
    }
}

#[derive(Debug, Clone, Default)]
pub struct RunnerFilter {
    pub state: Option<RunnerState>,
    /// Identifier of the image the runner was launched from.
    pub image_id: Option<String>,
    pub user: Option<String>,
}

impl RunnerFilter {
    pub fn matches(&self, runner: &Runner) -> bool {
        if let Some(state) = self.state {
            if runner.state != state {
                return false;
            }
        }
        if let Some(ref image_id) = self.image_id {
            if runner.image.identifier != *image_id {
                return false;
            }
        }
        if let Some(ref user) = self.user {
            if runner.user.as_ref() != Some(user) {
                return false;
            }
        }
        true
    }
}

#[async_trait]
pub trait ConnectorStorage: Send + Sync + StorageHealth {
    async fn store_connector(
        &self,
        connector: &CloudConnector,
    ) -> StorageResult<()>;
    async fn get_connector(
        &self,
        id: &str,
    ) -> StorageResult<Option<CloudConnector>>;
    async fn list_connectors(
        &self,
        filter: ConnectorFilter,
    ) -> StorageResult<Vec<CloudConnector>>;
    async fn delete_connector(&self, id: &str) -> StorageResult<()>;
    async fn connector_exists(&self, id: &str) -> StorageResult<bool>;
}

#[async_trait]
pub trait ImageStorage: Send + Sync + StorageHealth {
    async fn store_image(&self, image: &VmImage) -> StorageResult<()>;
    async fn get_image(&self, identifier: &str)
    -> StorageResult<Option<VmImage>>;
    async fn list_images(
        &self,
        filter: ImageFilter,
    ) -> StorageResult<Vec<VmImage>>;
    async fn delete_image(&self, identifier: &str) -> StorageResult<()>;
    async fn image_exists(&self, identifier: &str) -> StorageResult<bool>;
}

#[async_trait]
pub trait RunnerStorage: Send + Sync + StorageHealth {
    async fn store_runner(&self, runner: &Runner) -> StorageResult<()>;
    async fn get_runner(&self, id: &str) -> StorageResult<Option<Runner>>;
    async fn list_runners(
        &self,
        filter: RunnerFilter,
    ) -> StorageResult<Vec<Runner>>;
    async fn delete_runner(&self, id: &str) -> StorageResult<()>;
    async fn runner_exists(&self, id: &str) -> StorageResult<bool>;
}

pub trait StorageFactory {
    type ConnectorStorage: ConnectorStorage;
    type ImageStorage: ImageStorage;
    type RunnerStorage: RunnerStorage;

    fn create_connector_storage(&self) -> Self::ConnectorStorage;
    fn create_image_storage(&self) -> Self::ImageStorage;
    fn create_runner_storage(&self) -> Self::RunnerStorage;
}

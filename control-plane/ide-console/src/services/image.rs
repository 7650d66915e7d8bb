use std::sync::Arc;

use chrono::Utc;
use ide_models::{
    CloudConnector, ImagePatch, Machine, NewVmImage, VmImage, find_machine,
};
use ide_storage::{ConnectorStorage, ImageStorage};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};
use validator::Validate;

use crate::{
    config::ViewConfig,
    errors::{ConsoleError, EntityKind},
    models::{BuildLog, BuildPreviewRequest, ImageQuery, Page, search_page},
    services::build_log::{BuildDraft, render_build_log},
};

pub struct ImageService {
    storage: Arc<dyn ImageStorage>,
    connectors: Arc<dyn ConnectorStorage>,
    write_lock: Mutex<()>,
    views: ViewConfig,
}

impl ImageService {
    pub fn new(
        storage: Arc<dyn ImageStorage>,
        connectors: Arc<dyn ConnectorStorage>,
        views: ViewConfig,
    ) -> Self {
        Self {
            storage,
            connectors,
            write_lock: Mutex::new(()),
            views,
        }
    }

    pub async fn health(&self) -> Result<(), ConsoleError> {
        self.storage.health().await.map_err(Into::into)
    }

    pub async fn add_image(
        &self,
        input: NewVmImage,
    ) -> Result<VmImage, ConsoleError> {
        input.validate()?;
        let machine = resolve_machine(&input.machine_identifier)?;
        let connector =
            self.active_connector(input.connector_id.as_deref()).await?;

        let image = VmImage::create(
            input.name,
            input.description,
            machine,
            input.active,
            Some(connector.summary()),
            Utc::now(),
        );
        info!(
            image = %image.identifier,
            connector = %connector.id,
            machine = %image.machine.identifier,
            "Adding VM image"
        );
        self.storage.store_image(&image).await?;
        Ok(image)
    }

    pub async fn get_image(&self, id: &str) -> Result<VmImage, ConsoleError> {
        debug!(image = %id, "Getting VM image");
        self.storage
            .get_image(id)
            .await?
            .ok_or_else(|| ConsoleError::not_found(EntityKind::Image, id))
    }

    pub async fn list_images(
        &self,
        query: ImageQuery,
    ) -> Result<Page<VmImage>, ConsoleError> {
        info!("Listing VM images with query: {:?}", query);
        let images = self.storage.list_images(query.storage_filter()).await?;
        Ok(search_page(
            images,
            query.q.as_deref(),
            query.page_request(self.views.page_size),
        ))
    }

    pub async fn update_image_status(
        &self,
        id: &str,
        active: bool,
    ) -> Result<VmImage, ConsoleError> {
        let _guard = self.write_lock.lock().await;

        let mut image = self.get_image(id).await?;
        image.set_active(active, Utc::now());
        self.storage.store_image(&image).await?;
        info!(image = %id, active, "Updated VM image status");
        Ok(image)
    }

    pub async fn update_image(
        &self,
        id: &str,
        patch: ImagePatch,
    ) -> Result<VmImage, ConsoleError> {
        patch.validate()?;
        let machine = patch
            .machine_identifier
            .as_deref()
            .map(resolve_machine)
            .transpose()?;
        let _guard = self.write_lock.lock().await;

        let mut image = self.get_image(id).await?;
        image.apply_patch(patch, machine, Utc::now());
        self.storage.store_image(&image).await?;
        info!(image = %id, "Updated VM image");
        Ok(image)
    }

    /// Transcript of what building `request` would print. Nothing is stored.
    pub async fn build_preview(
        &self,
        request: BuildPreviewRequest,
    ) -> Result<BuildLog, ConsoleError> {
        if request.name.trim().is_empty() {
            return Err(ConsoleError::Validation(
                "Image name cannot be empty".to_string(),
            ));
        }
        let machine = resolve_machine(&request.machine_identifier)?;
        let connector = self
            .active_connector(request.connector_id.as_deref())
            .await?
            .summary();

        debug!(connector = %connector.id, "Rendering image build preview");
        let lines = render_build_log(
            &BuildDraft {
                name: &request.name,
                description: &request.description,
                machine: &machine,
                connector: &connector,
            },
            Utc::now(),
        );
        Ok(BuildLog { lines })
    }

    async fn active_connector(
        &self,
        connector_id: Option<&str>,
    ) -> Result<CloudConnector, ConsoleError> {
        let Some(connector_id) = connector_id.filter(|id| !id.is_empty())
        else {
            return Err(ConsoleError::Validation(
                "A cloud connector is required".to_string(),
            ));
        };
        let connector = self
            .connectors
            .get_connector(connector_id)
            .await?
            .ok_or_else(|| {
                ConsoleError::not_found(EntityKind::Connector, connector_id)
            })?;
        if !connector.active {
            warn!(connector = %connector_id, "Rejected inactive connector");
            return Err(ConsoleError::Validation(format!(
                "Cloud connector {} is inactive",
                connector_id
            )));
        }
        Ok(connector)
    }
}

fn resolve_machine(identifier: &str) -> Result<Machine, ConsoleError> {
    find_machine(identifier).ok_or_else(|| {
        ConsoleError::Validation(format!("Unknown machine: {}", identifier))
    })
}

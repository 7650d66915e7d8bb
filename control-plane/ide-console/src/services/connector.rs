use std::sync::Arc;

use chrono::Utc;
use ide_models::{CloudConnector, ConnectorPatch, NewCloudConnector};
use ide_storage::ConnectorStorage;
use tokio::sync::Mutex;
use tracing::{debug, info};
use validator::Validate;

use crate::{
    config::ViewConfig,
    errors::{ConsoleError, EntityKind},
    models::{ConnectorQuery, Page, search_page},
};

pub struct ConnectorService {
    storage: Arc<dyn ConnectorStorage>,
    write_lock: Mutex<()>,
    views: ViewConfig,
}

impl ConnectorService {
    pub fn new(storage: Arc<dyn ConnectorStorage>, views: ViewConfig) -> Self {
        Self {
            storage,
            write_lock: Mutex::new(()),
            views,
        }
    }

    pub async fn health(&self) -> Result<(), ConsoleError> {
        self.storage.health().await.map_err(Into::into)
    }

    pub async fn add_connector(
        &self,
        input: NewCloudConnector,
    ) -> Result<CloudConnector, ConsoleError> {
        input.validate()?;
        let connector = CloudConnector::create(input, Utc::now());
        info!(
            connector = %connector.id,
            provider = %connector.provider,
            region = %connector.region,
            "Adding cloud connector"
        );
        self.storage.store_connector(&connector).await?;
        Ok(connector)
    }

    pub async fn get_connector(
        &self,
        id: &str,
    ) -> Result<CloudConnector, ConsoleError> {
        debug!(connector = %id, "Getting cloud connector");
        self.storage
            .get_connector(id)
            .await?
            .ok_or_else(|| ConsoleError::not_found(EntityKind::Connector, id))
    }

    pub async fn list_connectors(
        &self,
        query: ConnectorQuery,
    ) -> Result<Page<CloudConnector>, ConsoleError> {
        info!("Listing cloud connectors with query: {:?}", query);
        let connectors =
            self.storage.list_connectors(query.storage_filter()).await?;
        Ok(search_page(
            connectors,
            query.q.as_deref(),
            query.page_request(self.views.page_size),
        ))
    }

    pub async fn update_connector_status(
        &self,
        id: &str,
        active: bool,
    ) -> Result<CloudConnector, ConsoleError> {
        self.update_connector(
            id,
            ConnectorPatch {
                active: Some(active),
                ..Default::default()
            },
        )
        .await
    }

    pub async fn update_connector(
        &self,
        id: &str,
        patch: ConnectorPatch,
    ) -> Result<CloudConnector, ConsoleError> {
        patch.validate()?;
        let _guard = self.write_lock.lock().await;

        let mut connector = self.get_connector(id).await?;
        connector.apply_patch(patch);
        self.storage.store_connector(&connector).await?;
        info!(
            connector = %id,
            active = connector.active,
            "Updated cloud connector"
        );
        Ok(connector)
    }
}

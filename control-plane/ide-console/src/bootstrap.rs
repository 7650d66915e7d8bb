use anyhow::Result;
use std::sync::Arc;
use tracing::info;

use crate::{
    config::AppConfig,
    seed::seed_sample_data,
    server::{ApiServer, AppState},
    services::{ConnectorService, ImageService, RunnerService},
    storage::create_storage_factory,
};
use ide_storage::traits::StorageFactory;

/// Wires storages and services from `config`. Sample data is loaded when
/// enabled, and runners found in `starting` get their provisioning
/// scheduled.
pub async fn build_app_state(config: &AppConfig) -> Result<AppState> {
    let storage_factory = create_storage_factory(&config.storage()).await?;
    let connector_storage =
        Arc::new(storage_factory.create_connector_storage());
    let image_storage = Arc::new(storage_factory.create_image_storage());
    let runner_storage = Arc::new(storage_factory.create_runner_storage());

    let views = config.views();
    let lifecycle = config.lifecycle();

    if views.seed_sample_data {
        info!("Loading sample data");
        seed_sample_data(
            connector_storage.as_ref(),
            image_storage.as_ref(),
            runner_storage.as_ref(),
            &lifecycle,
        )
        .await?;
    }

    let connector_service = Arc::new(ConnectorService::new(
        connector_storage.clone(),
        views.clone(),
    ));
    let image_service = Arc::new(ImageService::new(
        image_storage.clone(),
        connector_storage,
        views.clone(),
    ));
    let runner_service = Arc::new(RunnerService::new(
        runner_storage,
        image_storage,
        lifecycle,
        views,
    ));
    runner_service.resume_provisioning().await?;

    Ok(AppState {
        connector_service,
        image_service,
        runner_service,
    })
}

pub async fn build_api_server(config: &AppConfig) -> Result<ApiServer> {
    let state = build_app_state(config).await?;
    Ok(ApiServer::new(state, config.server()))
}

/// Build a fully-wired ApiServer from environment variables.
/// Mirrors the logic in bin/main and is useful for tests and embedding.
pub async fn build_api_server_from_env() -> Result<ApiServer> {
    let config = AppConfig::load_from_env()?;
    build_api_server(&config).await
}

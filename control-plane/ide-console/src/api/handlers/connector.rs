use crate::{
    api::handlers::api_error,
    errors::ApiError,
    models::{ConnectorQuery, Page, StatusUpdate},
    server::AppState,
};
use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use ide_models::{CloudConnector, ConnectorPatch, NewCloudConnector};
use tracing::info;

pub async fn create_connector(
    State(state): State<AppState>,
    Json(input): Json<NewCloudConnector>,
) -> Result<(StatusCode, Json<CloudConnector>), ApiError> {
    info!(
        "API: Adding cloud connector: {} ({})",
        input.provider, input.region
    );

    let connector = state
        .connector_service
        .add_connector(input)
        .await
        .map_err(|e| api_error("Failed to add cloud connector", e))?;
    Ok((StatusCode::CREATED, Json(connector.redacted())))
}

pub async fn get_connector(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<CloudConnector>, ApiError> {
    info!("API: Getting cloud connector: {}", id);

    let connector = state
        .connector_service
        .get_connector(&id)
        .await
        .map_err(|e| api_error("Failed to get cloud connector", e))?;
    Ok(Json(connector.redacted()))
}

pub async fn list_connectors(
    State(state): State<AppState>,
    Query(query): Query<ConnectorQuery>,
) -> Result<Json<Page<CloudConnector>>, ApiError> {
    info!("API: Listing cloud connectors with query: {:?}", query);

    let page = state
        .connector_service
        .list_connectors(query)
        .await
        .map_err(|e| api_error("Failed to list cloud connectors", e))?;
    Ok(Json(page.map(|c| c.redacted())))
}

pub async fn update_connector(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(patch): Json<ConnectorPatch>,
) -> Result<Json<CloudConnector>, ApiError> {
    info!("API: Updating cloud connector: {}", id);

    let connector = state
        .connector_service
        .update_connector(&id, patch)
        .await
        .map_err(|e| api_error("Failed to update cloud connector", e))?;
    Ok(Json(connector.redacted()))
}

pub async fn update_connector_status(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(update): Json<StatusUpdate>,
) -> Result<Json<CloudConnector>, ApiError> {
    info!(
        "API: Setting cloud connector {} active={}",
        id, update.active
    );

    let connector = state
        .connector_service
        .update_connector_status(&id, update.active)
        .await
        .map_err(|e| api_error("Failed to update cloud connector status", e))?;
    Ok(Json(connector.redacted()))
}

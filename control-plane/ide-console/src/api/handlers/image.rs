use crate::{
    api::handlers::api_error,
    errors::ApiError,
    models::{BuildLog, BuildPreviewRequest, ImageQuery, Page, StatusUpdate},
    server::AppState,
};
use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use ide_models::{ImagePatch, NewVmImage, VmImage};
use tracing::info;

pub async fn create_image(
    State(state): State<AppState>,
    Json(input): Json<NewVmImage>,
) -> Result<(StatusCode, Json<VmImage>), ApiError> {
    info!("API: Adding VM image: {}", input.name);

    let image = state
        .image_service
        .add_image(input)
        .await
        .map_err(|e| api_error("Failed to add VM image", e))?;
    Ok((StatusCode::CREATED, Json(image)))
}

pub async fn get_image(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<VmImage>, ApiError> {
    info!("API: Getting VM image: {}", id);

    state
        .image_service
        .get_image(&id)
        .await
        .map(Json)
        .map_err(|e| api_error("Failed to get VM image", e))
}

pub async fn list_images(
    State(state): State<AppState>,
    Query(query): Query<ImageQuery>,
) -> Result<Json<Page<VmImage>>, ApiError> {
    info!("API: Listing VM images with query: {:?}", query);

    state
        .image_service
        .list_images(query)
        .await
        .map(Json)
        .map_err(|e| api_error("Failed to list VM images", e))
}

pub async fn update_image(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(patch): Json<ImagePatch>,
) -> Result<Json<VmImage>, ApiError> {
    info!("API: Updating VM image: {}", id);

    state
        .image_service
        .update_image(&id, patch)
        .await
        .map(Json)
        .map_err(|e| api_error("Failed to update VM image", e))
}

pub async fn update_image_status(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(update): Json<StatusUpdate>,
) -> Result<Json<VmImage>, ApiError> {
    info!("API: Setting VM image {} active={}", id, update.active);

    state
        .image_service
        .update_image_status(&id, update.active)
        .await
        .map(Json)
        .map_err(|e| api_error("Failed to update VM image status", e))
}

pub async fn build_image_preview(
    State(state): State<AppState>,
    Json(request): Json<BuildPreviewRequest>,
) -> Result<Json<BuildLog>, ApiError> {
    info!("API: Rendering build preview for image: {}", request.name);

    state
        .image_service
        .build_preview(request)
        .await
        .map(Json)
        .map_err(|e| api_error("Failed to render build preview", e))
}

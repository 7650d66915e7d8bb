use crate::{
    api::handlers::api_error,
    errors::ApiError,
    models::{AssignRequest, ConnectInfo, Page, RunnerQuery, RunnerView},
    server::AppState,
};
use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use chrono::Utc;
use ide_models::NewRunner;
use tracing::info;

pub async fn create_runner(
    State(state): State<AppState>,
    Json(input): Json<NewRunner>,
) -> Result<(StatusCode, Json<RunnerView>), ApiError> {
    info!("API: Launching runner from image: {}", input.image_id);

    let runner = state
        .runner_service
        .add_runner(input)
        .await
        .map_err(|e| api_error("Failed to launch runner", e))?;
    Ok((StatusCode::CREATED, Json(RunnerView::new(runner, Utc::now()))))
}

pub async fn get_runner(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<RunnerView>, ApiError> {
    info!("API: Getting runner: {}", id);

    let runner = state
        .runner_service
        .get_runner(&id)
        .await
        .map_err(|e| api_error("Failed to get runner", e))?;
    Ok(Json(RunnerView::new(runner, Utc::now())))
}

pub async fn list_runners(
    State(state): State<AppState>,
    Query(query): Query<RunnerQuery>,
) -> Result<Json<Page<RunnerView>>, ApiError> {
    info!("API: Listing runners with query: {:?}", query);

    let page = state
        .runner_service
        .list_runners(query)
        .await
        .map_err(|e| api_error("Failed to list runners", e))?;
    let now = Utc::now();
    Ok(Json(page.map(|runner| RunnerView::new(runner, now))))
}

pub async fn assign_runner(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<AssignRequest>,
) -> Result<Json<RunnerView>, ApiError> {
    info!("API: Assigning runner {} to {}", id, request.user);

    let runner = state
        .runner_service
        .assign_runner(&id, &request.user)
        .await
        .map_err(|e| api_error("Failed to assign runner", e))?;
    Ok(Json(RunnerView::new(runner, Utc::now())))
}

pub async fn activate_runner(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<RunnerView>, ApiError> {
    info!("API: Activating runner: {}", id);

    let runner = state
        .runner_service
        .activate_runner(&id)
        .await
        .map_err(|e| api_error("Failed to activate runner", e))?;
    Ok(Json(RunnerView::new(runner, Utc::now())))
}

pub async fn terminate_runner(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<RunnerView>, ApiError> {
    info!("API: Terminating runner: {}", id);

    let runner = state
        .runner_service
        .terminate_runner(&id)
        .await
        .map_err(|e| api_error("Failed to terminate runner", e))?;
    Ok(Json(RunnerView::new(runner, Utc::now())))
}

pub async fn connect_runner(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ConnectInfo>, ApiError> {
    info!("API: Connecting to runner: {}", id);

    state
        .runner_service
        .connect(&id)
        .await
        .map(Json)
        .map_err(|e| api_error("Failed to connect to runner", e))
}

use axum::Json;
use ide_models::{Machine, machine_catalog};
use tracing::info;

pub async fn list_machines() -> Json<Vec<Machine>> {
    info!("API: Listing machine catalog");
    Json(machine_catalog())
}

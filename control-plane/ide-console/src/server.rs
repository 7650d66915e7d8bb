use crate::{
    api::{create_middleware_stack, handlers},
    config::ServerConfig,
    services::{ConnectorService, ImageService, RunnerService},
};
use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    routing::{get, patch, post, put},
};
use ide_observability::HealthReport;
use std::{net::SocketAddr, sync::Arc};
use tracing::{info, warn};

pub const SERVICE_NAME: &str = "ide-console";

#[derive(Clone)]
pub struct AppState {
    pub connector_service: Arc<ConnectorService>,
    pub image_service: Arc<ImageService>,
    pub runner_service: Arc<RunnerService>,
}

pub struct ApiServer {
    app: Router,
    config: ServerConfig,
    runner_service: Arc<RunnerService>,
}

impl ApiServer {
    pub fn new(state: AppState, config: ServerConfig) -> Self {
        let runner_service = state.runner_service.clone();

        let app = Router::new()
            // Machine catalog
            .route("/api/v1/machines", get(handlers::list_machines))
            // Cloud connectors
            .route("/api/v1/connectors", get(handlers::list_connectors))
            .route("/api/v1/connectors", post(handlers::create_connector))
            .route("/api/v1/connectors/{id}", get(handlers::get_connector))
            .route(
                "/api/v1/connectors/{id}",
                patch(handlers::update_connector),
            )
            .route(
                "/api/v1/connectors/{id}/status",
                put(handlers::update_connector_status),
            )
            // VM images
            .route("/api/v1/images", get(handlers::list_images))
            .route("/api/v1/images", post(handlers::create_image))
            .route(
                "/api/v1/images/build-preview",
                post(handlers::build_image_preview),
            )
            .route("/api/v1/images/{id}", get(handlers::get_image))
            .route("/api/v1/images/{id}", patch(handlers::update_image))
            .route(
                "/api/v1/images/{id}/status",
                put(handlers::update_image_status),
            )
            // Runners
            .route("/api/v1/runners", get(handlers::list_runners))
            .route("/api/v1/runners", post(handlers::create_runner))
            .route("/api/v1/runners/{id}", get(handlers::get_runner))
            .route(
                "/api/v1/runners/{id}/assign",
                post(handlers::assign_runner),
            )
            .route(
                "/api/v1/runners/{id}/activate",
                post(handlers::activate_runner),
            )
            .route(
                "/api/v1/runners/{id}/terminate",
                post(handlers::terminate_runner),
            )
            .route(
                "/api/v1/runners/{id}/connect",
                get(handlers::connect_runner),
            )
            // Health check endpoint
            .route("/health", get(health_check))
            .layer(create_middleware_stack(&config))
            .with_state(state);

        Self {
            app,
            config,
            runner_service,
        }
    }

    pub async fn serve(self) -> anyhow::Result<()> {
        let addr: SocketAddr =
            format!("{}:{}", self.config.host, self.config.port).parse()?;
        let listener = tokio::net::TcpListener::bind(addr).await?;

        info!("Cloud IDE console API listening on {}", addr);
        info!("Health check available at: http://{}/health", addr);

        let runner_service = self.runner_service;
        axum::serve(listener, self.app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        runner_service.shutdown();
        info!("Cloud IDE console API stopped");
        Ok(())
    }

    /// Consume and return the underlying Axum Router so callers can serve it
    /// themselves or drive it with `oneshot` in tests.
    pub fn into_router(self) -> Router {
        self.app
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}

async fn health_check(
    State(state): State<AppState>,
) -> (StatusCode, Json<HealthReport>) {
    let mut report = HealthReport::new(SERVICE_NAME, env!("CARGO_PKG_VERSION"));

    let checks = [
        ("connector_storage", state.connector_service.health().await),
        ("image_storage", state.image_service.health().await),
        ("runner_storage", state.runner_service.health().await),
    ];
    for (component, result) in checks {
        match result {
            Ok(()) => report = report.component_ok(component),
            Err(e) => {
                warn!("Health check failed for {}: {}", component, e);
                report = report.component_failed(component, e.to_string());
            }
        }
    }

    let status = if report.is_healthy() {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    (status, Json(report))
}

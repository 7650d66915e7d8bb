use axum::http::HeaderValue;
use tower::ServiceBuilder;
use tower::layer::util::{Identity, Stack};
use tower_http::{
    classify::{ServerErrorsAsFailures, SharedClassifier},
    cors::{AllowOrigin, Any, CorsLayer},
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::{Level, warn};

use crate::config::ServerConfig;

pub type ConsoleMiddleware = ServiceBuilder<
    Stack<
        CorsLayer,
        Stack<TraceLayer<SharedClassifier<ServerErrorsAsFailures>>, Identity>,
    >,
>;

/// Request tracing at `info` plus CORS for the console UI origins.
pub fn create_middleware_stack(config: &ServerConfig) -> ConsoleMiddleware {
    let trace = TraceLayer::new_for_http()
        .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
        .on_response(DefaultOnResponse::new().level(Level::INFO));

    ServiceBuilder::new()
        .layer(trace)
        .layer(cors_layer(&config.cors_allowed_origins))
}

/// No origins configured means any origin may call the API.
fn cors_layer(origins: &[String]) -> CorsLayer {
    if origins.is_empty() {
        return CorsLayer::permissive();
    }
    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(e) => {
                warn!("Ignoring invalid CORS origin '{}': {}", origin, e);
                None
            }
        })
        .collect();
    CorsLayer::new()
        .allow_origin(AllowOrigin::list(allowed))
        .allow_methods(Any)
        .allow_headers(Any)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        Router,
        body::Body,
        http::{Request, header},
        routing::get,
    };
    use tower::ServiceExt;

    fn router(origins: &[&str]) -> Router {
        let config = ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
            cors_allowed_origins: origins
                .iter()
                .map(|o| o.to_string())
                .collect(),
        };
        Router::new()
            .route("/api/v1/machines", get(|| async { "[]" }))
            .layer(create_middleware_stack(&config))
    }

    async fn allow_origin(app: Router, origin: &str) -> Option<String> {
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/v1/machines")
                    .header(header::ORIGIN, origin)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        response
            .headers()
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .map(|v| v.to_str().unwrap().to_string())
    }

    #[tokio::test]
    async fn any_origin_when_unconfigured() {
        let allowed = allow_origin(router(&[]), "https://elsewhere.dev").await;
        assert_eq!(allowed.as_deref(), Some("*"));
    }

    #[tokio::test]
    async fn only_listed_origins_when_configured() {
        let origins = ["https://console.ide.example", "not a\nheader"];
        let allowed =
            allow_origin(router(&origins), "https://console.ide.example").await;
        assert_eq!(allowed.as_deref(), Some("https://console.ide.example"));

        let denied =
            allow_origin(router(&origins), "https://elsewhere.dev").await;
        assert!(denied.is_none());
    }
}

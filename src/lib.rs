//! Breathing gas depth limits for open- and closed-circuit diving.
//!
//! The calculator lives in [`gas`]; [`app`] wraps it in an HTTP/JSON router.

use std::sync::Arc;

use axum::{response::Json, routing::get, Router};
use tower_http::trace::TraceLayer;

pub mod config;
pub mod error;
pub mod gas;

use config::Config;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
}

/// Build the full HTTP application.
pub fn app(config: Config) -> Router {
    let state = AppState {
        config: Arc::new(config),
    };

    Router::new()
        .route("/health", get(health_check))
        .nest("/api/gas", gas::router())
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

/// Health check endpoint
async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "healthy",
        "service": "gas-limits"
    }))
}

#[cfg(test)]
mod tests {
    use axum::{
        body::{to_bytes, Body},
        http::{header, Request, StatusCode},
    };
    use tower::ServiceExt;

    use super::*;

    #[tokio::test]
    async fn test_health_check() {
        let response = app(Config::default())
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(json["status"], "healthy");
    }

    #[tokio::test]
    async fn test_nested_limits_route_uses_config() {
        let config = Config {
            targets: config::Targets {
                po2: vec![1.4],
                density: vec![],
                set_points: vec![],
            },
            ..Config::default()
        };

        let response = app(config)
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/gas/limits")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(r#"{"mix": "21"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(json["po2"].as_array().unwrap().len(), 1);
        assert!(json["density"].as_array().unwrap().is_empty());
    }
}

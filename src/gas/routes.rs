//! HTTP route handlers for the gas limits API.

use axum::{
    extract::State,
    http::StatusCode,
    response::Json,
    routing::{get, post},
    Router,
};

use crate::AppState;

use super::models::{GasReport, LimitsRequest};
use super::report::{self, TOOL, TOOL_VERSION};

/// Create the gas router with all endpoints.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route("/limits", post(limits))
}

/// Health check for the gas calculator.
async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "service": "gas-limits",
        "version": TOOL_VERSION,
    }))
}

/// Compute depth limits for a mix.
///
/// The density searches are CPU-bound, so the report is built on the
/// blocking pool rather than a runtime worker.
async fn limits(
    State(state): State<AppState>,
    Json(request): Json<LimitsRequest>,
) -> Result<Json<GasReport>, (StatusCode, Json<serde_json::Value>)> {
    let mix = request.mix.clone();
    let config = state.config.clone();
    let result = tokio::task::spawn_blocking(move || {
        report::build_report(&request, &config.targets, config.limits)
    })
    .await;

    match result {
        Ok(Ok(report)) => Ok(Json(report)),
        Ok(Err(e)) => {
            tracing::warn!("Rejected limits request for '{}': {}", mix, e);
            Err((
                StatusCode::BAD_REQUEST,
                Json(serde_json::json!({
                    "error": e.to_string(),
                    "error_type": e.kind(),
                    "tool": TOOL,
                    "tool_version": TOOL_VERSION
                })),
            ))
        }
        Err(e) => {
            tracing::error!("Limits calculation for '{}' failed: {}", mix, e);
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(serde_json::json!({
                    "error": "calculation failed",
                    "error_type": "internal_error",
                    "tool": TOOL,
                    "tool_version": TOOL_VERSION
                })),
            ))
        }
    }
}

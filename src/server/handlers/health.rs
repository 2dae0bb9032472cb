use axum::{extract::State, http::StatusCode, response::Json};
use serde_json::{json, Value};
use tracing::error;

use crate::server::app::AppState;

/// Liveness plus a store round-trip; 503 when the store cannot be read.
pub async fn health_check(State(state): State<AppState>) -> (StatusCode, Json<Value>) {
    match state.db.read(|snapshot| snapshot.journey_plans.len()).await {
        Ok(_) => (
            StatusCode::OK,
            Json(json!({
                "status": "healthy",
                "service": "fieldops",
                "version": env!("CARGO_PKG_VERSION"),
            })),
        ),
        Err(err) => {
            error!("Health check failed: {}", err);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({ "status": "unavailable", "service": "fieldops" })),
            )
        }
    }
}

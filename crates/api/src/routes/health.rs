use axum::extract::State;
use axum::{routing::get, Json, Router};
use serde::Serialize;

use crate::state::AppState;

/// Health check response payload.
#[derive(Serialize)]
pub struct HealthResponse {
    /// Overall service status.
    pub status: &'static str,
    pub message: &'static str,
    /// `connected` or `unavailable`.
    pub database: &'static str,
}

/// GET /api/health -- the server answers even when the store is down.
async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let database = match atelier_db::health_check(state.store()).await {
        Ok(()) => "connected",
        Err(e) => {
            tracing::warn!(error = %e, "Store health check failed");
            "unavailable"
        }
    };

    Json(HealthResponse {
        status: "OK",
        message: "Server is running",
        database,
    })
}

/// Mount health check routes (at the root, with the full `/api/health` path).
pub fn router() -> Router<AppState> {
    Router::new().route("/api/health", get(health_check))
}

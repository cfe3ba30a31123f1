//! Health check handler

use axum::{extract::State, Json};
use serde::Serialize;

use crate::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    status: &'static str,
    version: &'static str,
    timestamp: i64,
    model_loaded: bool,
}

pub async fn check(State(state): State<AppState>) -> Json<HealthResponse> {
    let model_loaded = state.artifacts.is_some();

    Json(HealthResponse {
        status: if model_loaded { "healthy" } else { "degraded" },
        version: env!("CARGO_PKG_VERSION"),
        timestamp: chrono::Utc::now().timestamp(),
        model_loaded,
    })
}

//! Health, liveness, and readiness endpoints.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde_json::{json, Value};

use super::AppState;
use crate::network::HealthState;

/// Detailed health JSON. Always 200; `state` carries the lifecycle state
/// and `request_timeout_secs` the configured per-request limit.
pub async fn health_handler(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "state": state.shutdown.health_state().as_str(),
        "in_flight": state.shutdown.in_flight_count(),
        "uptime_secs": state.start_time.elapsed().as_secs(),
        "request_timeout_secs": state.config.request_timeout.as_secs(),
    }))
}

/// `GET /healthz`: the process is up.
pub async fn liveness_handler() -> Json<Value> {
    Json(json!({ "status": "OK" }))
}

/// `GET /ready`: 200 while serving, 503 while starting or shutting down.
pub async fn readiness_handler(State(state): State<AppState>) -> (StatusCode, Json<Value>) {
    match state.shutdown.health_state() {
        HealthState::Ready => (StatusCode::OK, Json(json!({ "status": "OK" }))),
        other => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({ "status": other.as_str() })),
        ),
    }
}

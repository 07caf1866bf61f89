//! HTTP handlers of the tile info service.
//!
//! Defines `AppState` (the shared state carried through axum extractors)
//! and the request-level error type shared by all handlers.

pub mod health;
pub mod objinfo;
pub mod stylesheet;

pub use health::{health_handler, liveness_handler, readiness_handler};
pub use objinfo::objinfo_handler;
pub use stylesheet::stylesheet_handler;

use std::sync::Arc;
use std::time::Instant;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use super::tenant::QueryArgs;
use super::{NetworkConfig, ShutdownController, TenantResolver};
use crate::service::{ServiceError, TenantConfigLoader};

/// Shared application state passed to all handlers via `State` extraction.
#[derive(Clone)]
pub struct AppState {
    /// Maps requests to tenants.
    pub tenants: Arc<TenantResolver>,
    /// Reads per-tenant service configuration.
    pub configs: Arc<TenantConfigLoader>,
    /// Health state and in-flight tracking.
    pub shutdown: Arc<ShutdownController>,
    /// Network settings reported by `/health`.
    pub config: Arc<NetworkConfig>,
    /// Server process start time, used for uptime calculation.
    pub start_time: Instant,
}

/// Error returned by request handlers.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("missing required parameter '{0}'")]
    MissingParameter(&'static str),
    #[error(transparent)]
    Service(#[from] ServiceError),
}

impl ApiError {
    #[must_use]
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::MissingParameter(_) => StatusCode::BAD_REQUEST,
            Self::Service(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = self.to_string();
        match self {
            Self::MissingParameter(_) => (status, Json(json!({ "error": message }))).into_response(),
            Self::Service(err) => err.into_response(),
        }
    }
}

/// Looks up a required query argument.
pub(crate) fn required<'a>(args: &'a QueryArgs, name: &'static str) -> Result<&'a str, ApiError> {
    args.get(name).ok_or(ApiError::MissingParameter(name))
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::path::Path;
    use std::sync::Arc;
    use std::time::Instant;

    use axum::body::to_bytes;
    use axum::response::{IntoResponse, Response};

    use super::AppState;
    use crate::network::{NetworkConfig, ShutdownController, TenantResolver};
    use crate::service::TenantConfigLoader;

    pub(crate) fn state(config_root: &Path) -> AppState {
        AppState {
            tenants: Arc::new(TenantResolver::default()),
            configs: Arc::new(TenantConfigLoader::new(config_root)),
            shutdown: Arc::new(ShutdownController::new()),
            config: Arc::new(NetworkConfig::default()),
            start_time: Instant::now(),
        }
    }

    pub(crate) async fn json_body(response: impl IntoResponse) -> (u16, serde_json::Value) {
        let response: Response = response.into_response();
        let status = response.status().as_u16();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }
}

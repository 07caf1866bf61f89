//! Request-level failures of the tile info service.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use tileinfo_core::SldError;
use tracing::error;

use crate::service::config::ConfigError;
use crate::storage::BackendError;

/// A failure that aborts a request with an internal error.
///
/// "Not found" conditions never end up here; they resolve to empty payloads.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error(transparent)]
    Backend(#[from] BackendError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("invalid stylesheet: {0}")]
    Style(#[from] SldError),
}

impl ServiceError {
    /// Short machine-readable category used in the response body.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Backend(_) => "backend",
            Self::Config(_) => "config",
            Self::Style(_) => "style",
        }
    }
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        // Details can carry paths and connection targets, keep them in the log.
        error!(kind = self.kind(), error = %self, "Request failed");
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": "Internal server error", "kind": self.kind() })),
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_to_internal_server_error() {
        let err = ServiceError::from(BackendError::UnsupportedKind {
            kind: "wms".into(),
        });
        assert_eq!(err.kind(), "backend");
        assert_eq!(
            err.into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn style_errors_name_the_stylesheet() {
        let err = ServiceError::from(SldError::Empty);
        assert!(err.to_string().starts_with("invalid stylesheet"));
    }
}

//! `GET /stylesheet`: a tileset style as 3D Tiles styling conditions.

use axum::extract::{Query, State};
use axum::http::HeaderMap;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use super::{required, ApiError, AppState};
use crate::network::tenant::QueryArgs;
use crate::service::{resolve_stylesheet, ServiceError, DEFAULT_STYLE};

/// Returns `{"defines": {}, "color": {"conditions": [...]}}`, or `{}` when
/// no stylesheet is available. `stylename` defaults to `"default"`.
///
/// # Errors
///
/// 400 if `tileset` is missing; 500 if the tenant config cannot be read or
/// the stylesheet is not well-formed XML.
pub async fn stylesheet_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Result<Response, ApiError> {
    let args = QueryArgs::from(pairs);
    let tileset = required(&args, "tileset")?;
    let style_name = args
        .get("stylename")
        .filter(|name| !name.is_empty())
        .unwrap_or(DEFAULT_STYLE);

    let _in_flight = state.shutdown.in_flight_guard();
    let tenant = state.tenants.resolve(&headers);
    let config = state
        .configs
        .load(&tenant)
        .await
        .map_err(ServiceError::from)?;

    let sheet = resolve_stylesheet(config.dataset(tileset), style_name)
        .await
        .map_err(ServiceError::from)?;
    Ok(match sheet {
        Some(sheet) => Json(sheet).into_response(),
        None => Json(json!({})).into_response(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::network::handlers::test_support::{json_body, state};
    use crate::testing::tenant_config;

    async fn call(root: &std::path::Path, pairs: &[(&str, &str)]) -> (u16, serde_json::Value) {
        let pairs = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        json_body(stylesheet_handler(State(state(root)), HeaderMap::new(), Query(pairs)).await)
            .await
    }

    #[tokio::test]
    async fn default_style_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let root = tenant_config(dir.path(), "default");

        let (status, body) = call(&root, &[("tileset", "buildings")]).await;
        assert_eq!(status, 200);
        assert_eq!(
            body,
            json!({"defines": {}, "color": {"conditions": [["true", "color('#00ff00')"]]}})
        );
    }

    #[tokio::test]
    async fn empty_stylename_means_default() {
        let dir = tempfile::tempdir().unwrap();
        let root = tenant_config(dir.path(), "default");
        let (_, body) = call(&root, &[("tileset", "buildings"), ("stylename", "")]).await;
        assert_eq!(body["color"]["conditions"][0][0], "true");
    }

    #[tokio::test]
    async fn style_from_database_query() {
        let dir = tempfile::tempdir().unwrap();
        let root = tenant_config(dir.path(), "default");
        let (_, body) = call(&root, &[("TileSet", "buildings"), ("StyleName", "fromdb")]).await;
        assert_eq!(body["color"]["conditions"][0][1], "color('#00ff00')");
    }

    #[tokio::test]
    async fn unavailable_style_is_empty_object() {
        let dir = tempfile::tempdir().unwrap();
        let root = tenant_config(dir.path(), "default");

        for pairs in [
            [("tileset", "buildings"), ("stylename", "broken")],
            [("tileset", "buildings"), ("stylename", "otherstyle")],
            [("tileset", "nonexistent"), ("stylename", "default")],
        ] {
            let (status, body) = call(&root, &pairs).await;
            assert_eq!(status, 200);
            assert_eq!(body, json!({}));
        }
    }

    #[tokio::test]
    async fn missing_tileset_is_bad_request() {
        let dir = tempfile::tempdir().unwrap();
        let (status, _) = call(dir.path(), &[("stylename", "default")]).await;
        assert_eq!(status, 400);
    }
}

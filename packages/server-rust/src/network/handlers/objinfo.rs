//! `GET /objinfo`: attributes of one object in a tileset.

use axum::extract::{Query, State};
use axum::http::HeaderMap;
use axum::Json;
use tileinfo_core::Attribute;
use tracing::debug;

use super::{required, ApiError, AppState};
use crate::network::tenant::QueryArgs;
use crate::service::{resolve_attributes, ServiceError};

/// Returns the attribute list of `objectid` in `tileset`.
///
/// Unknown tilesets and unmatched ids give an empty list.
///
/// # Errors
///
/// 400 if `tileset` or `objectid` is missing; 500 if the tenant config or
/// the dataset backend fails.
pub async fn objinfo_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Result<Json<Vec<Attribute>>, ApiError> {
    let args = QueryArgs::from(pairs);
    let tileset = required(&args, "tileset")?;
    let object_id = required(&args, "objectid")?;

    let _in_flight = state.shutdown.in_flight_guard();
    let tenant = state.tenants.resolve(&headers);
    let config = state
        .configs
        .load(&tenant)
        .await
        .map_err(ServiceError::from)?;

    let dataset = config.dataset(tileset);
    if dataset.is_none() {
        debug!(tenant = %tenant, tileset, "No info dataset for tileset");
    }
    let attributes = resolve_attributes(dataset, object_id)
        .await
        .map_err(ServiceError::from)?;
    Ok(Json(attributes))
}

//! Style loading and translation.
//!
//! Every absence on this path is fail-soft: a missing style entry, an
//! unsupported query backend, a failing query or an unreadable file all
//! end in "no stylesheet" with a warning, never in a request error. Only a
//! document that is not XML at all is reported, since that is a broken
//! configuration.

use tileinfo_core::{translate, DatasetConfig, DatasetKind, SldError, StyleSheet, StyleSource};
use tracing::{debug, warn};

use crate::storage::DatasetBackend;
use crate::traits::RecordSource;

/// Style name used when a request names none.
pub const DEFAULT_STYLE: &str = "default";

/// Loads the SLD text of `style_name` for `dataset`.
///
/// A configured query runs against the dataset's own backend; otherwise the
/// configured file is read. Returns `None` whenever no text can be obtained.
pub async fn load_style_xml(dataset: &DatasetConfig, style_name: &str) -> Option<String> {
    let Some(style) = dataset.style(style_name) else {
        debug!(style = style_name, "No style with this name configured");
        return None;
    };

    match style.source()? {
        StyleSource::Query(sql) => {
            if matches!(dataset.kind, DatasetKind::Unsupported(_)) {
                warn!(
                    style = style_name,
                    kind = %dataset.kind,
                    "Querying style via SQL only supported for gpkg/postgres"
                );
                return None;
            }
            let result = match DatasetBackend::for_dataset(dataset) {
                Ok(backend) => backend.query_text(sql).await,
                Err(e) => Err(e),
            };
            result
                .inspect_err(|e| {
                    warn!(style = style_name, query = sql, error = %e, "Failed to query stylesheet");
                })
                .ok()
                .flatten()
        }
        StyleSource::File(path) => tokio::fs::read_to_string(path)
            .await
            .inspect_err(|e| {
                warn!(style = style_name, filename = path, error = %e, "Failed to read stylesheet");
            })
            .ok(),
    }
}

/// Loads and translates `style_name` of `dataset`.
///
/// Returns `Ok(None)` when the dataset or style is not configured or its
/// source yields nothing.
///
/// # Errors
///
/// Returns [`SldError`] if the loaded document is not well-formed XML.
pub async fn resolve_stylesheet(
    dataset: Option<&DatasetConfig>,
    style_name: &str,
) -> Result<Option<StyleSheet>, SldError> {
    let Some(dataset) = dataset else {
        debug!(style = style_name, "No dataset configured");
        return Ok(None);
    };
    let Some(xml) = load_style_xml(dataset, style_name).await else {
        debug!(
            style = style_name,
            dataset = %dataset.location,
            "No stylesheet found"
        );
        return Ok(None);
    };
    translate(&xml).map(Some)
}

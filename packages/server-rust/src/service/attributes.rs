//! Dataset attribute resolution.
//!
//! Looks up one object by id in the dataset's backend and turns its raw
//! fields into display attributes: blacklisted fields and the geometry
//! column are dropped, the rest get their configured alias.

use tileinfo_core::{Attribute, DatasetConfig};
use tracing::debug;

use crate::storage::{BackendError, DatasetBackend, Record};
use crate::traits::RecordSource;

/// Resolves the attributes of `object_id` in `dataset`.
///
/// An unconfigured dataset (`None`) and an unmatched id both yield an empty
/// list.
///
/// # Errors
///
/// Returns [`BackendError`] if the dataset kind is unsupported or its
/// backend cannot be opened or queried.
pub async fn resolve_attributes(
    dataset: Option<&DatasetConfig>,
    object_id: &str,
) -> Result<Vec<Attribute>, BackendError> {
    let Some(dataset) = dataset else {
        debug!(object_id, "No dataset configured");
        return Ok(Vec::new());
    };
    let backend = DatasetBackend::for_dataset(dataset)?;
    resolve_from(&backend, dataset, object_id).await
}

/// Resolves `object_id` against an already selected `source`.
///
/// # Errors
///
/// Propagates the source's [`BackendError`].
pub async fn resolve_from(
    source: &dyn RecordSource,
    dataset: &DatasetConfig,
    object_id: &str,
) -> Result<Vec<Attribute>, BackendError> {
    match source.fetch_record(&dataset.id_field, object_id).await? {
        Some(record) => Ok(apply_field_policy(dataset, record)),
        None => {
            debug!(
                dataset = %dataset.location,
                layer = %dataset.layer_or_table,
                object_id,
                "No matches"
            );
            Ok(Vec::new())
        }
    }
}

/// Applies the dataset's blacklist and aliases to a raw record.
#[must_use]
pub fn apply_field_policy(dataset: &DatasetConfig, record: Record) -> Vec<Attribute> {
    let geometry_column = record.geometry_column.as_deref();
    record
        .fields
        .into_iter()
        .filter(|(name, _)| {
            !dataset.is_blacklisted(name) && geometry_column != Some(name.as_str())
        })
        .map(|(name, value)| Attribute {
            alias: dataset.alias_for(&name).to_string(),
            name,
            value,
        })
        .collect()
}

use async_trait::async_trait;

use crate::storage::{BackendError, Record};

/// Narrow read interface a dataset backend exposes to the services.
/// Implementations: GeoPackage (`rusqlite`), `PostgreSQL` (`sqlx`).
///
/// Every call acquires its own file handle or connection and releases it
/// before returning, on success and on error.
#[async_trait]
pub trait RecordSource: Send + Sync {
    /// Fetch the first record whose `id_field` equals `object_id`.
    /// Returns `Ok(None)` when nothing matches.
    async fn fetch_record(
        &self,
        id_field: &str,
        object_id: &str,
    ) -> Result<Option<Record>, BackendError>;

    /// Run `sql` without parameters and return the first column of the
    /// first row as text. `Ok(None)` for an empty result or a NULL value.
    async fn query_text(&self, sql: &str) -> Result<Option<String>, BackendError>;
}

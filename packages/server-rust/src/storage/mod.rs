//! Dataset backends behind the [`RecordSource`](crate::traits::RecordSource) seam.
//!
//! [`DatasetBackend`] is the closed set of supported storage kinds. It is
//! picked from a [`DatasetConfig`] with a plain `match` on
//! [`DatasetKind`]; adding a backend means adding a variant here.

pub mod datastores;

use async_trait::async_trait;
use tileinfo_core::{DatasetConfig, DatasetKind, Value};

use crate::traits::RecordSource;
use datastores::{GeoPackageSource, PostgresSource};

/// Raw fields of one backend record, in schema declaration order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Record {
    /// `(field name, value)` pairs.
    pub fields: Vec<(String, Value)>,
    /// Spatial column detected for the table, if the backend reports one.
    /// Never part of the attribute output.
    pub geometry_column: Option<String>,
}

/// Failures reaching or reading a dataset backend.
#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    #[error("failed to open dataset '{location}': {reason}")]
    Open { location: String, reason: String },
    #[error("cannot find layer '{layer}' in dataset '{location}'")]
    LayerNotFound { layer: String, location: String },
    #[error("no id field configured for dataset '{location}'")]
    NoIdField { location: String },
    #[error("layer '{layer}' has no field '{field}'")]
    UnknownField { field: String, layer: String },
    #[error("unsupported dataset type '{kind}'")]
    UnsupportedKind { kind: String },
    #[error("query failed: {0}")]
    Query(String),
    #[error("backend worker failed: {0}")]
    Task(String),
}

/// The backend serving one dataset.
#[derive(Debug, Clone)]
pub enum DatasetBackend {
    GeoPackage(GeoPackageSource),
    Postgres(PostgresSource),
}

impl DatasetBackend {
    /// Selects the backend for `config`.
    ///
    /// # Errors
    ///
    /// Returns [`BackendError::UnsupportedKind`] for any kind other than
    /// GeoPackage and `PostgreSQL`.
    pub fn for_dataset(config: &DatasetConfig) -> Result<Self, BackendError> {
        match &config.kind {
            DatasetKind::GeoPackage => Ok(Self::GeoPackage(GeoPackageSource::new(
                &config.location,
                &config.layer_or_table,
            ))),
            DatasetKind::Relational => Ok(Self::Postgres(PostgresSource::new(
                &config.location,
                &config.layer_or_table,
            ))),
            DatasetKind::Unsupported(kind) => Err(BackendError::UnsupportedKind {
                kind: kind.clone(),
            }),
        }
    }
}

#[async_trait]
impl RecordSource for DatasetBackend {
    async fn fetch_record(
        &self,
        id_field: &str,
        object_id: &str,
    ) -> Result<Option<Record>, BackendError> {
        match self {
            Self::GeoPackage(source) => source.fetch_record(id_field, object_id).await,
            Self::Postgres(source) => source.fetch_record(id_field, object_id).await,
        }
    }

    async fn query_text(&self, sql: &str) -> Result<Option<String>, BackendError> {
        match self {
            Self::GeoPackage(source) => source.query_text(sql).await,
            Self::Postgres(source) => source.query_text(sql).await,
        }
    }
}

/// Double-quotes an SQL identifier, doubling embedded quotes.
#[must_use]
pub fn quote_ident(ident: &str) -> String {
    format!("\"{}\"", ident.replace('"', "\"\""))
}

//! GeoPackage [`RecordSource`] over `rusqlite`.
//!
//! Mirrors how OGR exposes a GeoPackage layer: the layer must be registered
//! in `gpkg_contents`, and neither the integer feature id nor the geometry
//! column count as attribute fields. `rusqlite` is blocking, so every call
//! runs on the blocking pool and opens (and drops) its own read-only
//! connection.

use std::path::PathBuf;

use async_trait::async_trait;
use rusqlite::types::ValueRef;
use rusqlite::{Connection, OpenFlags, OptionalExtension};
use tileinfo_core::Value;
use tracing::debug;

use crate::storage::{quote_ident, BackendError, Record};
use crate::traits::RecordSource;

/// A layer of a GeoPackage file.
#[derive(Debug, Clone)]
pub struct GeoPackageSource {
    path: PathBuf,
    layer: String,
}

/// Column layout of a resolved layer.
#[derive(Debug)]
struct LayerSchema {
    /// Table name as registered in `gpkg_contents`.
    table: String,
    /// Every column name, including the feature id and geometry.
    columns: Vec<String>,
    /// Attribute columns in declaration order.
    fields: Vec<String>,
    geometry_column: Option<String>,
}

impl GeoPackageSource {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>, layer: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            layer: layer.into(),
        }
    }

    fn location(&self) -> String {
        self.path.display().to_string()
    }

    fn open(&self) -> Result<Connection, BackendError> {
        Connection::open_with_flags(
            &self.path,
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )
        .map_err(|e| BackendError::Open {
            location: self.location(),
            reason: e.to_string(),
        })
    }

    /// Resolves the configured layer name (case-insensitively, as OGR does)
    /// and reads its column layout.
    fn layer_schema(&self, conn: &Connection) -> Result<LayerSchema, BackendError> {
        let table: Option<String> = conn
            .query_row(
                "SELECT table_name FROM gpkg_contents \
                 WHERE lower(table_name) = lower(?1) \
                 ORDER BY table_name = ?1 DESC LIMIT 1",
                [&self.layer],
                |row| row.get(0),
            )
            .optional()
            .map_err(|e| BackendError::Open {
                location: self.location(),
                reason: format!("not a readable GeoPackage: {e}"),
            })?;
        let table = table.ok_or_else(|| BackendError::LayerNotFound {
            layer: self.layer.clone(),
            location: self.location(),
        })?;

        // Attribute-only GeoPackages may lack gpkg_geometry_columns entirely.
        let geometry_column: Option<String> = conn
            .query_row(
                "SELECT column_name FROM gpkg_geometry_columns WHERE table_name = ?1",
                [&table],
                |row| row.get(0),
            )
            .optional()
            .ok()
            .flatten();

        let mut stmt = conn
            .prepare(&format!("PRAGMA table_info({})", quote_ident(&table)))
            .map_err(query_error)?;
        let columns = stmt
            .query_map([], |row| {
                let name: String = row.get("name")?;
                let decl_type: String = row.get("type")?;
                let pk: i64 = row.get("pk")?;
                Ok((name, decl_type, pk))
            })
            .map_err(query_error)?
            .collect::<Result<Vec<_>, _>>()
            .map_err(query_error)?;

        let fields = columns
            .iter()
            .filter(|(name, decl_type, pk)| {
                let is_fid = *pk > 0 && decl_type.eq_ignore_ascii_case("INTEGER");
                !is_fid && geometry_column.as_deref() != Some(name.as_str())
            })
            .map(|(name, _, _)| name.clone())
            .collect();

        Ok(LayerSchema {
            table,
            columns: columns.into_iter().map(|(name, _, _)| name).collect(),
            fields,
            geometry_column,
        })
    }

    fn fetch_blocking(
        &self,
        id_field: &str,
        object_id: &str,
    ) -> Result<Option<Record>, BackendError> {
        let conn = self.open()?;
        let schema = self.layer_schema(&conn)?;
        if id_field.is_empty() {
            return Err(BackendError::NoIdField {
                location: self.location(),
            });
        }
        // SQLite reads an unknown double-quoted identifier as a string
        // literal, so the filter column must exist.
        if !schema
            .columns
            .iter()
            .any(|column| column.eq_ignore_ascii_case(id_field))
        {
            return Err(BackendError::UnknownField {
                field: id_field.to_string(),
                layer: schema.table,
            });
        }

        let columns = if schema.fields.is_empty() {
            "NULL".to_string()
        } else {
            schema
                .fields
                .iter()
                .map(|f| quote_ident(f))
                .collect::<Vec<_>>()
                .join(", ")
        };
        let sql = format!(
            "SELECT {columns} FROM {} WHERE {} = ?1 LIMIT 1",
            quote_ident(&schema.table),
            quote_ident(id_field)
        );

        let values = conn
            .query_row(&sql, [object_id], |row| {
                (0..schema.fields.len())
                    .map(|i| row.get_ref(i).map(to_value))
                    .collect::<Result<Vec<_>, _>>()
            })
            .optional()
            .map_err(query_error)?;

        let Some(values) = values else {
            debug!(layer = %schema.table, id_field, object_id, "No matching feature");
            return Ok(None);
        };

        Ok(Some(Record {
            fields: schema.fields.into_iter().zip(values).collect(),
            geometry_column: schema.geometry_column,
        }))
    }

    fn query_text_blocking(&self, sql: &str) -> Result<Option<String>, BackendError> {
        let conn = self.open()?;
        conn.query_row(sql, [], |row| {
            Ok(match row.get_ref(0)? {
                ValueRef::Null => None,
                ValueRef::Text(t) | ValueRef::Blob(t) => Some(String::from_utf8_lossy(t).into_owned()),
                ValueRef::Integer(i) => Some(i.to_string()),
                ValueRef::Real(f) => Some(f.to_string()),
            })
        })
        .optional()
        .map(Option::flatten)
        .map_err(query_error)
    }
}

#[async_trait]
impl RecordSource for GeoPackageSource {
    async fn fetch_record(
        &self,
        id_field: &str,
        object_id: &str,
    ) -> Result<Option<Record>, BackendError> {
        let source = self.clone();
        let id_field = id_field.to_string();
        let object_id = object_id.to_string();
        tokio::task::spawn_blocking(move || source.fetch_blocking(&id_field, &object_id))
            .await
            .map_err(|e| BackendError::Task(e.to_string()))?
    }

    async fn query_text(&self, sql: &str) -> Result<Option<String>, BackendError> {
        let source = self.clone();
        let sql = sql.to_string();
        tokio::task::spawn_blocking(move || source.query_text_blocking(&sql))
            .await
            .map_err(|e| BackendError::Task(e.to_string()))?
    }
}

fn to_value(value: ValueRef<'_>) -> Value {
    match value {
        ValueRef::Null => Value::Null,
        ValueRef::Integer(i) => Value::Int(i),
        ValueRef::Real(f) => Value::Float(f),
        ValueRef::Text(t) => Value::String(String::from_utf8_lossy(t).into_owned()),
        ValueRef::Blob(b) => Value::Bytes(b.to_vec()),
    }
}

fn query_error(e: rusqlite::Error) -> BackendError {
    BackendError::Query(e.to_string())
}

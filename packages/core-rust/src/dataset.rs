//! Dataset configuration model consumed from the tenant config.
//!
//! A [`DatasetConfig`] describes where the attributes of one tileset live and
//! how their fields are presented. It is read-only input: the server loads it
//! per request and passes it down by reference.

use std::collections::{HashMap, HashSet};
use std::fmt;

use serde::Deserialize;

/// Storage backend of a dataset, from the config's `type` key.
///
/// Only `"gpkg"` and `"postgres"` are backends. Any other tag is kept in
/// [`DatasetKind::Unsupported`] so the request can fail with a message
/// naming it.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "String")]
pub enum DatasetKind {
    /// File-based GeoPackage (`"gpkg"`).
    GeoPackage,
    /// PostgreSQL / PostGIS database (`"postgres"`).
    Relational,
    /// Any other configured tag.
    Unsupported(String),
}

impl DatasetKind {
    /// Returns the configuration tag for this kind.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::GeoPackage => "gpkg",
            Self::Relational => "postgres",
            Self::Unsupported(tag) => tag,
        }
    }
}

impl From<String> for DatasetKind {
    fn from(tag: String) -> Self {
        match tag.as_str() {
            "gpkg" => Self::GeoPackage,
            "postgres" => Self::Relational,
            _ => Self::Unsupported(tag),
        }
    }
}

impl Default for DatasetKind {
    fn default() -> Self {
        Self::Unsupported(String::new())
    }
}

impl fmt::Display for DatasetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Attribute source and presentation policy for one tileset.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DatasetConfig {
    /// Backend kind (`type`).
    #[serde(rename = "type", default)]
    pub kind: DatasetKind,
    /// GeoPackage path or PostgreSQL connection string (`dataset`).
    #[serde(rename = "dataset", default)]
    pub location: String,
    /// GeoPackage layer name, or `table` / `schema.table` (`layername`).
    #[serde(rename = "layername", default)]
    pub layer_or_table: String,
    /// Field holding the object identifier (`idfield`).
    #[serde(rename = "idfield", default)]
    pub id_field: String,
    /// Display names by field name.
    #[serde(default)]
    pub attribute_aliases: HashMap<String, String>,
    /// Fields never returned to clients.
    #[serde(default)]
    pub attribute_blacklist: HashSet<String>,
    /// Named SLD styles.
    #[serde(default)]
    pub styles: HashMap<String, StyleConfig>,
}

impl DatasetConfig {
    /// Display name of `field`, falling back to the field name itself.
    #[must_use]
    pub fn alias_for<'a>(&'a self, field: &'a str) -> &'a str {
        self.attribute_aliases
            .get(field)
            .map_or(field, String::as_str)
    }

    /// Whether `field` must be dropped from results.
    #[must_use]
    pub fn is_blacklisted(&self, field: &str) -> bool {
        self.attribute_blacklist.contains(field)
    }

    /// Style configured under `name`, if any.
    #[must_use]
    pub fn style(&self, name: &str) -> Option<&StyleConfig> {
        self.styles.get(name)
    }
}

/// Where the SLD document of a style is read from.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct StyleConfig {
    /// SQL returning the SLD text in the first column of the first row.
    #[serde(default)]
    pub query: Option<String>,
    /// Path of an SLD file.
    #[serde(default)]
    pub filename: Option<String>,
}

/// Resolved source of a style document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StyleSource<'a> {
    /// Run this query against the dataset's backend.
    Query(&'a str),
    /// Read this file.
    File(&'a str),
}

impl StyleConfig {
    /// Picks the style source. A query wins over a filename; empty strings
    /// count as unset.
    #[must_use]
    pub fn source(&self) -> Option<StyleSource<'_>> {
        fn non_empty(s: &Option<String>) -> Option<&str> {
            s.as_deref().filter(|s| !s.is_empty())
        }

        non_empty(&self.query)
            .map(StyleSource::Query)
            .or_else(|| non_empty(&self.filename).map(StyleSource::File))
    }
}

//! [`RecordSource`](crate::traits::RecordSource) implementations.
//!
//! - [`GeoPackageSource`]: read-only `SQLite` access to a GeoPackage file
//! - [`PostgresSource`]: one `sqlx` connection per call to a `PostGIS` database

mod geopackage;
mod postgres;

pub use geopackage::GeoPackageSource;
pub use postgres::PostgresSource;

//! Tile info server: object attributes and stylesheets for 3D tilesets,
//! backed by GeoPackage files or `PostgreSQL` tables.

pub mod network;
pub mod service;
pub mod storage;
pub mod traits;

#[cfg(test)]
mod testing;

pub use network::NetworkModule;
pub use storage::{BackendError, DatasetBackend, Record};
pub use traits::RecordSource;

//! Tile info domain services: tenant configuration, attribute resolution
//! and stylesheet translation.

pub mod attributes;
pub mod config;
pub mod error;
pub mod stylesheet;

pub use attributes::{apply_field_policy, resolve_attributes, resolve_from};
pub use config::{ConfigError, TenantConfigLoader, TileInfoConfig, CONFIG_FILE_NAME};
pub use error::ServiceError;
pub use stylesheet::{load_style_xml, resolve_stylesheet, DEFAULT_STYLE};

//! HTTP surface: configuration, middleware, handlers, and shutdown control.

pub mod config;
pub mod handlers;
pub mod middleware;
pub mod module;
pub mod shutdown;
pub mod tenant;

pub use config::*;
pub use handlers::{ApiError, AppState};
pub use module::NetworkModule;
pub use shutdown::*;
pub use tenant::{QueryArgs, TenantResolver};

//! Request context extraction: tenant selection and query arguments.

use std::collections::HashMap;

use axum::http::header::HeaderName;
use axum::http::HeaderMap;

/// Picks the tenant whose configuration serves a request.
#[derive(Debug, Clone)]
pub struct TenantResolver {
    header: Option<HeaderName>,
    default_tenant: String,
}

impl TenantResolver {
    #[must_use]
    pub fn new(header: Option<HeaderName>, default_tenant: impl Into<String>) -> Self {
        Self {
            header,
            default_tenant: default_tenant.into(),
        }
    }

    /// The configured header's value if present and non-empty, else the
    /// default tenant.
    #[must_use]
    pub fn resolve(&self, headers: &HeaderMap) -> String {
        self.header
            .as_ref()
            .and_then(|name| headers.get(name))
            .and_then(|value| value.to_str().ok())
            .map(str::trim)
            .filter(|tenant| !tenant.is_empty())
            .unwrap_or(&self.default_tenant)
            .to_string()
    }
}

impl Default for TenantResolver {
    fn default() -> Self {
        Self::new(None, "default")
    }
}

/// Query arguments with case-insensitive names. The first occurrence of a
/// repeated name wins.
#[derive(Debug, Clone, Default)]
pub struct QueryArgs(HashMap<String, String>);

impl QueryArgs {
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(&name.to_ascii_lowercase()).map(String::as_str)
    }
}

impl From<Vec<(String, String)>> for QueryArgs {
    fn from(pairs: Vec<(String, String)>) -> Self {
        let mut args = HashMap::with_capacity(pairs.len());
        for (name, value) in pairs {
            args.entry(name.to_ascii_lowercase()).or_insert(value);
        }
        Self(args)
    }
}

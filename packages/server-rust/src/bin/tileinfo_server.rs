use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use axum::http::header::HeaderName;
use clap::Parser;
use tileinfo_server::network::{NetworkConfig, NetworkModule, TenantResolver, DEFAULT_PORT};
use tileinfo_server::service::TenantConfigLoader;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Attribute and stylesheet service for 3D tilesets.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    #[arg(long, env = "TILEINFO_HOST", default_value = "0.0.0.0")]
    host: String,
    #[arg(long, env = "TILEINFO_PORT", default_value_t = DEFAULT_PORT)]
    port: u16,
    /// Directory holding `<tenant>/tileinfoConfig.json`.
    #[arg(long, env = "CONFIG_PATH", default_value = "config")]
    config_path: PathBuf,
    /// Request header naming the tenant.
    #[arg(long, env = "TENANT_HEADER")]
    tenant_header: Option<String>,
    #[arg(long, env = "DEFAULT_TENANT", default_value = "default")]
    default_tenant: String,
    /// Allowed CORS origin, repeatable.
    #[arg(long = "cors-origin", default_value = "*")]
    cors_origins: Vec<String>,
    #[arg(long, default_value_t = 30)]
    request_timeout_secs: u64,
    /// Emit logs as JSON lines.
    #[arg(long)]
    log_json: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    setup_logging(args.log_json);

    let tenant_header = args
        .tenant_header
        .as_deref()
        .filter(|name| !name.is_empty())
        .map(|name| HeaderName::from_bytes(name.as_bytes()))
        .transpose()
        .context("invalid tenant header name")?;

    let config = NetworkConfig {
        host: args.host,
        port: args.port,
        cors_origins: args.cors_origins,
        request_timeout: Duration::from_secs(args.request_timeout_secs),
    };
    info!(
        config_path = %args.config_path.display(),
        default_tenant = %args.default_tenant,
        "Starting tile info service"
    );

    let mut module = NetworkModule::new(
        config,
        TenantResolver::new(tenant_header, args.default_tenant),
        TenantConfigLoader::new(args.config_path),
    );
    module.start().await?;
    module.serve(shutdown_signal()).await?;

    info!("Tile info service stopped");
    Ok(())
}

fn setup_logging(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

/// Resolves on Ctrl-C or, on Unix, SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }
    info!("Shutdown signal received");
}

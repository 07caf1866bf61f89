//! Network module with deferred startup lifecycle.
//!
//! `new()` allocates shared state, `start()` binds the TCP listener, and
//! `serve()` accepts requests until the shutdown future resolves.

use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::routing::get;
use axum::Router;
use tokio::net::TcpListener;
use tracing::{info, warn};

use super::config::NetworkConfig;
use super::handlers::{
    health_handler, liveness_handler, objinfo_handler, readiness_handler, stylesheet_handler,
    AppState,
};
use super::middleware::build_http_layers;
use super::shutdown::ShutdownController;
use super::tenant::TenantResolver;
use crate::service::TenantConfigLoader;

/// Upper bound on waiting for in-flight requests after the server returned.
const DRAIN_TIMEOUT: Duration = Duration::from_secs(30);

/// Owns the HTTP server lifecycle of the tile info service.
pub struct NetworkModule {
    config: NetworkConfig,
    listener: Option<TcpListener>,
    tenants: Arc<TenantResolver>,
    configs: Arc<TenantConfigLoader>,
    shutdown: Arc<ShutdownController>,
    start_time: Instant,
}

impl NetworkModule {
    /// Creates the module without binding any port.
    #[must_use]
    pub fn new(config: NetworkConfig, tenants: TenantResolver, configs: TenantConfigLoader) -> Self {
        Self {
            config,
            listener: None,
            tenants: Arc::new(tenants),
            configs: Arc::new(configs),
            shutdown: Arc::new(ShutdownController::new()),
            start_time: Instant::now(),
        }
    }

    #[must_use]
    pub fn shutdown_controller(&self) -> Arc<ShutdownController> {
        Arc::clone(&self.shutdown)
    }

    /// Assembles the router with all routes and middleware.
    ///
    /// Routes:
    /// - `GET /objinfo` -- object attributes
    /// - `GET /stylesheet` -- translated tileset style
    /// - `GET /health` -- detailed health JSON
    /// - `GET /healthz` -- liveness probe
    /// - `GET /ready` -- readiness probe
    pub fn build_router(&self) -> Router {
        let state = AppState {
            tenants: Arc::clone(&self.tenants),
            configs: Arc::clone(&self.configs),
            shutdown: Arc::clone(&self.shutdown),
            config: Arc::new(self.config.clone()),
            start_time: self.start_time,
        };

        Router::new()
            .route("/objinfo", get(objinfo_handler))
            .route("/stylesheet", get(stylesheet_handler))
            .route("/health", get(health_handler))
            .route("/healthz", get(liveness_handler))
            .route("/ready", get(readiness_handler))
            .layer(build_http_layers(&self.config))
            .with_state(state)
    }

    /// Binds the listener and returns the bound port, which differs from
    /// the configured one when port 0 is used.
    ///
    /// # Errors
    ///
    /// Returns an error if the address cannot be bound.
    pub async fn start(&mut self) -> anyhow::Result<u16> {
        let addr = format!("{}:{}", self.config.host, self.config.port);
        let listener = TcpListener::bind(&addr).await?;
        let port = listener.local_addr()?.port();

        info!(host = %self.config.host, port, "TCP listener bound");

        self.listener = Some(listener);
        Ok(port)
    }

    /// Serves requests until `shutdown` resolves, then moves the controller
    /// through `Draining` to `Stopped`.
    ///
    /// axum's graceful shutdown already waits for open connections to
    /// finish, so the in-flight count is normally zero once it returns. The
    /// drain check below only marks the controller `Stopped`, or logs
    /// requests still counted after 30 seconds. In-flight guards otherwise
    /// feed the `/health` report.
    ///
    /// # Errors
    ///
    /// Returns an error if `start()` was not called or the server hits a
    /// fatal I/O error.
    pub async fn serve(
        mut self,
        shutdown: impl Future<Output = ()> + Send + 'static,
    ) -> anyhow::Result<()> {
        let listener = self
            .listener
            .take()
            .ok_or_else(|| anyhow::anyhow!("start() must be called before serve()"))?;
        let router = self.build_router();
        let controller = Arc::clone(&self.shutdown);

        controller.set_ready();
        info!("Serving tile info requests");

        let signal_ctrl = Arc::clone(&controller);
        axum::serve(listener, router)
            .with_graceful_shutdown(async move {
                shutdown.await;
                signal_ctrl.trigger_shutdown();
            })
            .await?;

        if controller.wait_for_drain(DRAIN_TIMEOUT).await {
            info!("All in-flight requests drained");
        } else {
            warn!(
                in_flight = controller.in_flight_count(),
                "Drain timeout expired with in-flight requests remaining"
            );
        }
        Ok(())
    }
}

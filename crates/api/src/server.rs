//! Server configuration and startup.

use crate::routes::api_routes;
use crate::state::AppState;
use axum::Router;
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

/// Listener settings.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8001,
        }
    }
}

impl ServerConfig {
    /// `host:port` as passed to the listener.
    #[must_use]
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Builds the application router with tracing and permissive CORS.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .nest("/api", api_routes())
        .with_state(state)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
}

/// The HTTP front of the ledger.
pub struct ApiServer {
    config: ServerConfig,
    state: AppState,
}

impl ApiServer {
    pub fn new(config: ServerConfig, state: AppState) -> Self {
        Self { config, state }
    }

    /// Serves until Ctrl-C.
    ///
    /// # Errors
    /// Returns an error if the address cannot be bound.
    pub async fn run(self) -> std::io::Result<()> {
        let listener = TcpListener::bind(self.config.bind_address()).await?;
        let address: SocketAddr = listener.local_addr()?;
        info!(%address, "API server listening");

        axum::serve(listener, create_router(self.state))
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        info!("API server stopped");
        Ok(())
    }
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_err() {
        // no signal handler; run until the process is killed
        std::future::pending::<()>().await;
    }
}

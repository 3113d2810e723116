//! HTTP listener.

use std::sync::Arc;

use crate::routes::{router, ServerState};

/// Listener settings.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Listen address (host:port).
    pub addr: String,
    /// Add a permissive CORS layer.
    pub cors: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            addr: DEFAULT_ADDR.to_string(),
            cors: false,
        }
    }
}

pub const DEFAULT_ADDR: &str = "0.0.0.0:5000";

/// Serves the API until the process is stopped.
pub struct ApiServer {
    state: Arc<ServerState>,
    config: ServerConfig,
}

impl ApiServer {
    pub fn new(state: ServerState, config: ServerConfig) -> Self {
        Self {
            state: Arc::new(state),
            config,
        }
    }

    /// Bind and serve until ctrl-c.
    pub async fn run(&self) -> std::io::Result<()> {
        let app = router(self.state.clone(), self.config.cors);

        let listener = tokio::net::TcpListener::bind(&self.config.addr).await?;
        tracing::info!("HTTP API listening on {}", self.config.addr);

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("HTTP API stopped");
        Ok(())
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("Cannot listen for ctrl-c: {e}");
        std::future::pending::<()>().await;
    }
}

//! Streamable-HTTP host for the MCP server.
//!
//! Mounts the rmcp streamable-HTTP service at `/mcp` next to a `/health`
//! liveness route, with cooperative shutdown through a cancellation token.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Result, anyhow};
use axum::{Json, Router, routing::get};
use rmcp::transport::streamable_http_server::{
    StreamableHttpServerConfig, StreamableHttpService, session::local::LocalSessionManager,
};
use serde_json::{Value, json};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use airflow_api::AirflowClient;

use crate::server::core::AirflowMcpServer;

/// Host configuration for the MCP HTTP server.
#[derive(Debug, Clone)]
pub struct AirflowHttpServer {
    bind_address: SocketAddr,
    client: Arc<AirflowClient>,
}

impl AirflowHttpServer {
    /// Create a server bound to the provided address.
    pub fn new(bind_address: SocketAddr, client: Arc<AirflowClient>) -> Self {
        Self { bind_address, client }
    }

    /// Start serving and return a handle for inspection and shutdown.
    pub async fn start(self) -> Result<RunningHttpServer> {
        let cancellation_token = CancellationToken::new();
        let session_manager = Arc::new(LocalSessionManager::default());

        let client = Arc::clone(&self.client);
        let service: StreamableHttpService<AirflowMcpServer, LocalSessionManager> = StreamableHttpService::new(
            move || Ok(AirflowMcpServer::new(Arc::clone(&client))),
            session_manager,
            StreamableHttpServerConfig {
                stateful_mode: true,
                sse_keep_alive: None,
                cancellation_token: cancellation_token.child_token(),
                ..Default::default()
            },
        );

        let router = Router::new()
            .route("/health", get(health))
            .nest_service("/mcp", service);
        let listener = tokio::net::TcpListener::bind(self.bind_address).await?;
        let bound_address = listener.local_addr()?;

        let server_handle = tokio::spawn({
            let shutdown = cancellation_token.child_token();
            async move {
                let _ = axum::serve(listener, router)
                    .with_graceful_shutdown(async move {
                        shutdown.cancelled().await;
                    })
                    .await;
            }
        });

        Ok(RunningHttpServer {
            bind_address: bound_address,
            cancellation_token,
            server_handle,
        })
    }
}

/// Liveness payload for load balancers and deploy checks.
async fn health() -> Json<Value> {
    Json(json!({ "status": "healthy", "service": "airflow-mcp" }))
}

/// Runtime handle for a running MCP HTTP server.
#[derive(Debug)]
pub struct RunningHttpServer {
    bind_address: SocketAddr,
    cancellation_token: CancellationToken,
    server_handle: JoinHandle<()>,
}

impl RunningHttpServer {
    /// The bound socket address.
    pub fn bound_address(&self) -> SocketAddr {
        self.bind_address
    }

    /// Wait for the serve task to finish on its own (for example after an
    /// external shutdown signal cancelled it).
    pub async fn wait(self) -> Result<()> {
        self.server_handle
            .await
            .map_err(|error| anyhow!("MCP HTTP server task failed: {error}"))
    }

    /// Stop the server and wait for the serve task to drain.
    pub async fn stop(self) -> Result<()> {
        self.cancellation_token.cancel();
        self.server_handle
            .await
            .map_err(|error| anyhow!("MCP HTTP server task failed: {error}"))?;
        Ok(())
    }
}

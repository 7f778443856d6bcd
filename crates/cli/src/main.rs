//! MCP server for Apache Airflow.
//!
//! Thin entry point: load the connection configuration from the
//! environment, build the client once, and serve the shared tool router
//! over the selected transport.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use rmcp::{ServiceExt, transport::stdio};
use tracing::info;

use airflow_api::{AirflowClient, AirflowConfig};
use airflow_mcp::{AirflowHttpServer, AirflowMcpServer, faas};

#[derive(Parser)]
#[command(name = "airflow-mcp", version, about = "MCP server for Apache Airflow")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Serve the MCP protocol over stdio (the default).
    Stdio,
    /// Serve the streamable-HTTP transport at /mcp with a /health route.
    Http {
        /// Address to bind.
        #[arg(long, default_value = "127.0.0.1:3000")]
        bind: SocketAddr,
    },
    /// Serve the reduced JSON-RPC compatibility endpoint (initialize,
    /// tools/list, tools/call) for serverless-style deployments.
    Faas {
        /// Address to bind.
        #[arg(long, default_value = "127.0.0.1:3000")]
        bind: SocketAddr,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    // Fatal before serving anything: no usable credential mode, no server.
    let config = AirflowConfig::from_env().context("Airflow connection configuration")?;
    let client = Arc::new(AirflowClient::new(config)?);

    match cli.command.unwrap_or(Command::Stdio) {
        Command::Stdio => run_stdio(client).await,
        Command::Http { bind } => run_http(bind, client).await,
        Command::Faas { bind } => run_faas(bind, client).await,
    }
}

/// Logs go to stderr: stdout is reserved for the stdio MCP transport.
fn init_tracing() {
    let filter = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into());
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

async fn run_stdio(client: Arc<AirflowClient>) -> Result<()> {
    info!("MCP server for Airflow started on stdio");
    let service = AirflowMcpServer::new(client)
        .serve(stdio())
        .await
        .context("serve stdio transport")?;
    service.waiting().await?;
    Ok(())
}

async fn run_http(bind: SocketAddr, client: Arc<AirflowClient>) -> Result<()> {
    let server = AirflowHttpServer::new(bind, client).start().await?;
    info!(address = %server.bound_address(), "MCP server for Airflow started on HTTP");
    info!(
        "MCP endpoint: http://{0}/mcp  Health check: http://{0}/health",
        server.bound_address()
    );
    tokio::signal::ctrl_c().await?;
    info!("shutting down HTTP server");
    server.stop().await
}

async fn run_faas(bind: SocketAddr, client: Arc<AirflowClient>) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(bind).await?;
    info!(address = %listener.local_addr()?, "JSON-RPC compatibility endpoint started");
    axum::serve(listener, faas::router(client))
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
        })
        .await
        .context("serve compatibility endpoint")?;
    Ok(())
}

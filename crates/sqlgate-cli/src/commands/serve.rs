//! Serve command.
//!
//! `sqlgate serve` - Connect the SQL Server pool and run the MCP server on the
//! configured transport until input closes or Ctrl-C.

use anyhow::{Context, Result};
use clap::Args;
use sqlgate_adapter_mssql::MssqlExecutor;
use sqlgate_core::{GatewayConfig, Transport};
use sqlgate_mcp::{Dispatcher, McpServer};
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

/// How long in-flight calls get to report cancellation after Ctrl-C.
const SHUTDOWN_GRACE: Duration = Duration::from_secs(2);

/// Arguments for `sqlgate serve`.
#[derive(Debug, Args)]
pub struct ServeArgs {
    /// Transport override: "stdio" or "http".
    #[arg(long)]
    pub transport: Option<Transport>,

    /// HTTP port override.
    #[arg(long)]
    pub port: Option<u16>,

    /// HTTP host override.
    #[arg(long)]
    pub host: Option<String>,
}

/// Fold command line overrides into the loaded configuration.
pub fn apply_overrides(config: &mut GatewayConfig, args: &ServeArgs) {
    if let Some(transport) = args.transport {
        config.mcp.transport = transport;
    }
    if let Some(port) = args.port {
        config.mcp.port = port;
    }
    if let Some(host) = &args.host {
        config.mcp.host = host.clone();
    }
}

pub async fn run(mut config: GatewayConfig, args: ServeArgs) -> Result<()> {
    apply_overrides(&mut config, &args);

    let executor = MssqlExecutor::connect(&config.upstream)
        .await
        .context("Failed to connect to the upstream SQL Server")?;

    let shutdown = CancellationToken::new();
    let dispatcher = Dispatcher::new(super::planner(&config), Arc::new(executor))
        .with_timeout(config.execution.timeout())
        .with_cancellation(shutdown.clone());
    let server = McpServer::new(config.mcp.clone(), Arc::new(dispatcher));

    info!(
        transport = ?config.mcp.transport,
        default_schema = %config.catalog.default_schema,
        timeout_seconds = config.execution.timeout_seconds,
        "Starting sqlgate"
    );

    let mut running = std::pin::pin!(server.run());
    tokio::select! {
        result = &mut running => result.context("MCP server failed")?,
        _ = tokio::signal::ctrl_c() => {
            info!("Shutdown signal received");
            shutdown.cancel();
            if let Ok(Err(e)) = tokio::time::timeout(SHUTDOWN_GRACE, &mut running).await {
                warn!(error = %e, "MCP server failed during shutdown");
            }
        }
    }

    info!("sqlgate stopped");
    Ok(())
}

// crates/openprodoc-mcp/src/cli/serve.rs
// MCP server initialization and main loop

use anyhow::{Result, bail};
use openprodoc::config::EnvConfig;
use openprodoc::mcp::ProdocServer;
use tracing::{info, warn};

/// Build the server from validated configuration. Fails on configuration errors;
/// warnings are logged and startup continues.
pub fn setup_server(env_config: EnvConfig) -> Result<ProdocServer> {
    let validation = env_config.validate();
    for warning in &validation.warnings {
        warn!("{}", warning);
    }
    if !validation.is_valid() {
        bail!("Invalid configuration:\n{}", validation.report());
    }

    info!(base_url = %env_config.base_url, "OpenProdoc endpoint configured");
    Ok(ProdocServer::new(env_config))
}

/// Run the MCP server with stdio transport
pub async fn run_mcp_server(env_config: EnvConfig) -> Result<()> {
    let server = setup_server(env_config)?;
    info!(tools = server.list_tool_names().len(), "Starting MCP server on stdio");

    let transport = rmcp::transport::io::stdio();
    let service = rmcp::serve_server(server, transport).await?;
    service.waiting().await?;

    info!("MCP client disconnected, shutting down");
    Ok(())
}

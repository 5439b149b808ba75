//! mcp-kagi server entry point.
//!
//! This is the main binary that boots the MCP server on stdio transport.
//! Logging goes to stderr to avoid interfering with the JSON-RPC protocol on stdout.

use anyhow::Result;
use kagi_core::AppConfig;
use rmcp::service::serve_server;
use rmcp::transport::io::stdio;
use tracing_subscriber::EnvFilter;

mod handler;
mod tools;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .json()
        .init();

    let config = AppConfig::load()?;

    let credential = if config.api_key.is_some() { "override" } else { config.api_key_env.as_str() };
    tracing::info!(
        base_url = %config.base_url,
        credential,
        "Starting mcp-kagi server on stdio transport"
    );

    let handler = handler::McpKagiServer::new(config);
    let transport = stdio();
    let server = serve_server(handler, transport).await?;

    server.waiting().await?;

    Ok(())
}

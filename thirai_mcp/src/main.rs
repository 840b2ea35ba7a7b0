use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use thirai_core::{
    mcp_server::{JsonRpcHandler, McpServer},
    transport::StdioTransport,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Logs go to stderr; stdout carries the JSON-RPC stream.
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "thirai_mcp=info,thirai_core=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    info!("Starting Thirai MCP Server");

    // Create provider registry with only feature-enabled connectors
    let registry = thirai_core::build_registry_enabled_only().await;

    // Note: credentials come from YOUTUBE_API_KEY or the secrets/set method.

    let registry = Arc::new(Mutex::new(registry));

    // Create MCP server
    let server = McpServer::new(registry);

    // Create JSON-RPC handler
    let handler = JsonRpcHandler::new(server);

    // Create and run stdio transport
    let transport = StdioTransport::new(handler);

    info!("MCP Server ready, listening on stdio");

    if let Err(e) = transport.run().await {
        error!("Transport error: {}", e);
        return Err(e.into());
    }

    Ok(())
}

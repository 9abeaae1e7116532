//! MCP command implementation.

use crate::analyzer::Analyzer;
use crate::config::Settings;
use crate::mcp::McpServer;
use anyhow::Result;

/// Run the MCP server.
pub async fn run_mcp(settings: Settings) -> Result<()> {
    // Fail before touching stdio if the endpoint cannot be used.
    let analyzer = Analyzer::from_settings(&settings)?;
    let server = McpServer::new(analyzer);
    server.run().await
}

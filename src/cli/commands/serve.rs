//! `rolodex serve`: run the MCP stdio server.

use std::sync::Arc;

use crate::adapters::http::HttpDirectory;
use crate::adapters::mcp::StdioServer;
use crate::services::DirectoryService;

pub async fn execute(service: Arc<DirectoryService<HttpDirectory>>) -> anyhow::Result<()> {
    StdioServer::new(service).run().await
}

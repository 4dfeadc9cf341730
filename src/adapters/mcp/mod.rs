//! MCP (Model Context Protocol) server adapter.

pub mod stdio_server;

pub use stdio_server::StdioServer;

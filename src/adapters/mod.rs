//! Infrastructure adapters for external systems.

pub mod http;
pub mod mcp;
pub mod mock;

pub mod bundle;
pub mod error;
pub mod mcp_api;

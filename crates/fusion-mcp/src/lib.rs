//! fusion-mcp - MCP tool surface
//!
//! This crate exposes hybrid search as an MCP (Model Context Protocol)
//! tool for AI assistants.
//!
//! # Tools
//!
//! - `hybrid_search` - Search documents with fused vector + text retrieval

mod server;

pub use server::{HybridMcpServer, SearchParams, ServerInfo, ToolInfo, ToolResult};

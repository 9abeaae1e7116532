//! MCP (Model Context Protocol) server for Sight.
//!
//! Exposes the `analyze_image` and `analyze_video` tools to AI assistants.
//! Implements JSON-RPC 2.0 over stdio.

mod protocol;
mod server;
mod tools;

pub use server::McpServer;
pub use tools::{get_tools, render_error};

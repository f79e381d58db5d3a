//! MCP (Model Context Protocol) server for editing ddclient.conf from AI assistants.

pub mod server;
pub mod tools;

pub use server::McpServer;
pub use tools::get_tools;

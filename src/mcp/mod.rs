//! Model Context Protocol server exposing the export tools.

pub mod protocol;
pub mod server;

pub use server::McpServer;

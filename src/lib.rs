pub mod analyzer;
#[cfg(feature = "node")]
pub mod bridge;
pub mod canvas;
pub mod config;
pub mod error;
pub mod framer;
pub mod logging;
pub mod mcp;
pub mod tools;

// Re-export selected API for consumers
pub use analyzer::{extract_dependencies, outline_source, DependencyReport};
pub use canvas::{build_snapshot, CanvasDocument, ExportItem, SnapshotSession};
pub use config::Settings;
pub use error::{CanvasError, ExportError};
pub use framer::{FramerApi, FramerClient};
pub use mcp::McpServer;
pub use tools::ToolHandlers;

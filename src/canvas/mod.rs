//! Selection export for the design canvas: classify the selected nodes,
//! capture their structure and properties, and write them out as JSON.

pub mod classify;
pub mod document;
pub mod download;
pub mod node;
pub mod properties;
pub mod session;
pub mod snapshot;
pub mod structure;

pub use classify::{classify, NodeClass};
pub use document::{CanvasDocument, JsonNode};
pub use download::{sanitize_file_name, write_items};
pub use node::{CanvasHost, RawNode};
pub use properties::{serialize_gradient, ComponentInfo, Gradient, NodeProperties};
pub use session::{SessionView, SnapshotSession};
pub use snapshot::{build_snapshot, ExportItem, SnapshotBuilder};
pub use structure::{extract_structure, StructureNode};

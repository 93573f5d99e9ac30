//! Framer project metadata and component sources.

pub mod client;
pub mod download;
pub mod normalize;
pub mod types;

#[cfg(test)]
pub(crate) mod testing;

pub use client::{extract_project_id, FramerApi, FramerClient};
pub use download::ComponentDownloader;
pub use normalize::normalize_project;
pub use types::{Component, ComponentKind, ExportResult, ExportedComponent, Module, Project};

//! Static analysis of downloaded component sources.

pub mod dependencies;
pub mod outline;
pub mod report;

pub use dependencies::{count_lines, estimate_bundle_size, extract_dependencies};
pub use outline::{outline_source, SourceOutline};
pub use report::DependencyReport;

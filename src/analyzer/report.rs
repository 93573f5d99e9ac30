use crate::analyzer::dependencies::{count_lines, extract_dependencies};
use crate::analyzer::outline::{outline_source, ExportInfo};
use dashmap::DashMap;
use rayon::prelude::*;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;
use std::sync::Arc;
use walkdir::{DirEntry, WalkDir};

#[derive(Debug, Clone, Serialize)]
pub struct FileReport {
    pub dependencies: Vec<String>,
    pub lines: usize,
    pub exports: Vec<ExportInfo>,
    pub parsed: bool,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ReportSnapshot {
    root: String,
    total_files: usize,
    total_lines: usize,
    dependencies: BTreeSet<String>,
    files: BTreeMap<String, FileReport>,
}

/// Dependencies of every component source under an export directory.
pub struct DependencyReport {
    pub root: String,
    pub files: Arc<DashMap<String, FileReport>>,
}

impl DependencyReport {
    pub fn index_dir(root: &str) -> Self {
        let sources = find_all_source_files(root);
        let files = Arc::new(DashMap::new());

        sources.par_iter().for_each(|file_path| match std::fs::read_to_string(file_path) {
            Ok(source) => {
                let outline = outline_source(&source, file_path);
                let report = FileReport {
                    dependencies: extract_dependencies(&source).into_iter().collect(),
                    lines: count_lines(&source),
                    parsed: outline.is_some(),
                    exports: outline.map(|o| o.exports).unwrap_or_default(),
                };
                files.insert(relative_to(root, file_path), report);
            }
            Err(err) => tracing::warn!(file = %file_path, error = %err, "skipping unreadable source"),
        });

        Self { root: root.to_string(), files }
    }

    /// Union of all per-file dependencies, sorted.
    pub fn dependencies(&self) -> BTreeSet<String> {
        self.files
            .iter()
            .flat_map(|e| e.value().dependencies.clone())
            .collect()
    }

    pub fn to_json(&self) -> String {
        let files: BTreeMap<String, FileReport> = self
            .files
            .iter()
            .map(|e| (e.key().clone(), e.value().clone()))
            .collect();
        let snapshot = ReportSnapshot {
            root: self.root.clone(),
            total_files: files.len(),
            total_lines: files.values().map(|f| f.lines).sum(),
            dependencies: self.dependencies(),
            files,
        };
        serde_json::to_string_pretty(&snapshot).unwrap_or_else(|_| "{}".into())
    }
}

fn relative_to(root: &str, file_path: &str) -> String {
    Path::new(file_path)
        .strip_prefix(root)
        .map(|p| p.to_string_lossy().replace('\\', "/"))
        .unwrap_or_else(|_| file_path.to_string())
}

const SKIPPED_DIRS: &[&str] = &["node_modules", "dist", "build", ".git", "target"];
const SOURCE_EXTENSIONS: &[&str] = &["ts", "tsx", "js", "jsx"];

fn is_skipped_dir(entry: &DirEntry) -> bool {
    entry.depth() > 0
        && entry.file_type().is_dir()
        && entry.file_name().to_str().is_some_and(|name| SKIPPED_DIRS.contains(&name))
}

fn is_source_file(entry: &DirEntry) -> bool {
    entry.file_type().is_file()
        && entry
            .path()
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| SOURCE_EXTENSIONS.contains(&ext))
}

/// Component sources under `root`, sorted. Vendored and build directories
/// are pruned without being descended into.
pub fn find_all_source_files(root: &str) -> Vec<String> {
    let mut sources: Vec<String> = WalkDir::new(root)
        .into_iter()
        .filter_entry(|entry| !is_skipped_dir(entry))
        .filter_map(Result::ok)
        .filter(is_source_file)
        .map(|entry| entry.path().to_string_lossy().to_string())
        .collect();
    sources.sort();
    sources
}

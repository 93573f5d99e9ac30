use crate::canvas::classify::NodeClass;
use crate::canvas::properties::{ComponentInfo, NodeProperties};
use crate::canvas::snapshot::ExportItem;
use crate::canvas::structure::StructureNode;
use crate::error::CanvasError;
use rayon::prelude::*;
use serde::Serialize;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// File contents written for one selected item.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemPayload<'a> {
    pub name: Option<&'a str>,
    #[serde(rename = "type")]
    pub class: NodeClass,
    pub node_type: &'a str,
    pub structure: &'a StructureNode,
    pub properties: &'a NodeProperties,
    /// Instances only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub component_info: Option<&'a ComponentInfo>,
}

impl<'a> From<&'a ExportItem> for ItemPayload<'a> {
    fn from(item: &'a ExportItem) -> Self {
        Self {
            name: item.name.as_deref(),
            class: item.class,
            node_type: &item.node_type,
            structure: &item.structure,
            properties: &item.properties,
            component_info: item
                .component_info
                .as_ref()
                .filter(|_| item.class == NodeClass::ComponentInstance),
        }
    }
}

/// `<name>.json` with anything outside `[A-Za-z0-9_-]` replaced by `_`.
pub fn sanitize_file_name(name: Option<&str>) -> String {
    let sanitized: String = name
        .unwrap_or("unnamed")
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' || c == '-' { c } else { '_' })
        .collect();
    format!("{sanitized}.json")
}

/// File name per selected item, in item order. A name already issued gets
/// the first free `_2`, `_3`, ... suffix, so no two items share a file.
pub fn plan_downloads<'a>(
    items: &'a [ExportItem],
    selected: &HashSet<String>,
) -> Result<Vec<(String, &'a ExportItem)>, CanvasError> {
    let mut issued: HashSet<String> = HashSet::new();
    let planned: Vec<(String, &ExportItem)> = items
        .iter()
        .filter(|item| selected.contains(&item.id))
        .map(|item| {
            let mut file_name = sanitize_file_name(item.name.as_deref());
            let stem = file_name.trim_end_matches(".json").to_string();
            let mut n = 1;
            while issued.contains(&file_name) {
                n += 1;
                file_name = format!("{stem}_{n}.json");
            }
            issued.insert(file_name.clone());
            (file_name, item)
        })
        .collect();

    if planned.is_empty() {
        return Err(CanvasError::NothingSelected);
    }
    Ok(planned)
}

/// Write one pretty-printed JSON file per selected item into `dir`.
pub fn write_items(
    items: &[ExportItem],
    selected: &HashSet<String>,
    dir: &Path,
) -> Result<Vec<PathBuf>, CanvasError> {
    let planned = plan_downloads(items, selected)?;
    std::fs::create_dir_all(dir).map_err(|source| CanvasError::Io {
        context: "failed to create download directory",
        path: dir.to_path_buf(),
        source,
    })?;

    let written = planned
        .par_iter()
        .map(|(file_name, item)| -> Result<PathBuf, CanvasError> {
            let path = dir.join(file_name);
            let content = serde_json::to_string_pretty(&ItemPayload::from(*item))?;
            std::fs::write(&path, content).map_err(|source| CanvasError::Io {
                context: "failed to write item",
                path: path.clone(),
                source,
            })?;
            Ok(path)
        })
        .collect::<Result<Vec<_>, CanvasError>>()?;

    tracing::info!(files = written.len(), dir = %dir.display(), "downloaded items");
    Ok(written)
}

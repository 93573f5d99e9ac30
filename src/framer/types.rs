//! Framer project records and export reports.
//!
//! API endpoints:
//! - `GET https://api.framer.com/web/projects/{projectId}`
//! - `GET https://framerusercontent.com/modules/{moduleId}/{versionId}/{file}`

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: String,
    pub name: String,
    pub url: String,
    pub modules: Vec<Module>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub styles: Option<ProjectStyles>,
}

impl Project {
    pub fn components(&self) -> impl Iterator<Item = &Component> {
        self.modules.iter().flat_map(|m| m.components.iter())
    }

    pub fn component_count(&self) -> usize {
        self.modules.iter().map(|m| m.components.len()).sum()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Module {
    pub id: String,
    pub version_id: String,
    pub name: String,
    pub components: Vec<Component>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ComponentKind {
    #[default]
    Component,
    Override,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Component {
    pub name: String,
    pub path: String,
    pub module_id: String,
    pub version_id: String,
    /// Always `<cdn>/modules/<moduleId>/<versionId>/<path>`.
    pub url: String,
    #[serde(rename = "type")]
    pub kind: ComponentKind,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectStyles {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fonts: Option<Vec<Font>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub colors: Option<BTreeMap<String, String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub breakpoints: Option<BTreeMap<String, f64>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Font {
    pub family: String,
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportedComponent {
    pub name: String,
    /// CDN url the source came from.
    pub original_path: String,
    pub exported_path: String,
    pub dependencies: Vec<String>,
    #[serde(rename = "type")]
    pub kind: ComponentKind,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportedStyles {
    pub tokens_generated: usize,
    pub fonts_exported: usize,
    pub breakpoints_created: usize,
    pub css_path: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportSummary {
    pub total_components: usize,
    pub total_lines: usize,
    pub dependencies: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bundle_size_estimate: Option<String>,
}

/// Filled in by a later transform step; export only records the originals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransformReport {
    pub components_exported: usize,
    pub tokens_generated: Vec<String>,
    pub components_kept_original: usize,
    pub cms_placeholders: usize,
}

impl TransformReport {
    pub fn untransformed(exported: usize) -> Self {
        Self {
            components_exported: exported,
            tokens_generated: Vec::new(),
            components_kept_original: exported,
            cms_placeholders: 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportResult {
    pub project_id: String,
    pub project_name: String,
    pub output_path: String,
    pub components: Vec<ExportedComponent>,
    pub styles: ExportedStyles,
    pub summary: ExportSummary,
    pub transform_report: TransformReport,
}

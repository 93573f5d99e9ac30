use crate::analyzer::dependencies;
use crate::canvas::{self, CanvasDocument, SnapshotSession};
use crate::config::DEFAULT_CDN_BASE;
use crate::framer::normalize;
use napi::bindgen_prelude::*;
use napi_derive::napi;

#[napi]
pub fn extract_dependencies(source: String) -> Vec<String> {
    dependencies::extract_dependencies(&source).into_iter().collect()
}

#[napi]
pub fn classify_node(class_tag: String) -> String {
    canvas::classify(&class_tag).as_str().to_string()
}

#[napi]
pub fn sanitize_file_name(name: Option<String>) -> String {
    canvas::sanitize_file_name(name.as_deref())
}

/// Normalize a raw project metadata payload into the project JSON the tools return.
#[napi]
pub fn normalize_project(raw_json: String, cdn_base: Option<String>) -> Result<String> {
    let raw: serde_json::Value = serde_json::from_str(&raw_json)
        .map_err(|e| Error::from_reason(format!("invalid project json: {}", e)))?;
    let cdn_base = cdn_base.unwrap_or_else(|| DEFAULT_CDN_BASE.to_string());
    let project = normalize::normalize_project(&raw, cdn_base.trim_end_matches('/'));
    serde_json::to_string(&project)
        .map_err(|e| Error::from_reason(format!("serialize project failed: {}", e)))
}

#[napi(object)]
pub struct SnapshotOutput {
    pub items_json: String,
    pub message: String,
    pub error: Option<String>,
}

/// Build the export list for a canvas document (`{ canvasRoot, selection }`).
#[napi]
pub async fn build_snapshot(document_json: String) -> Result<SnapshotOutput> {
    let document = CanvasDocument::from_json(&document_json)
        .map_err(|e| Error::from_reason(format!("invalid canvas document: {}", e)))?;
    let view = SnapshotSession::new(document).refresh().await;
    let items_json = serde_json::to_string(&view.items)
        .map_err(|e| Error::from_reason(format!("serialize items failed: {}", e)))?;
    Ok(SnapshotOutput { items_json, message: view.message, error: view.error })
}

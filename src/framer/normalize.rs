use crate::framer::types::{Component, ComponentKind, Module, Project, ProjectStyles};
use serde_json::Value;

pub const UNTITLED_PROJECT: &str = "Untitled Project";

/// CDN address of a component source file.
pub fn component_url(cdn_base: &str, module_id: &str, version_id: &str, path: &str) -> String {
    format!(
        "{}/modules/{}/{}/{}",
        cdn_base.trim_end_matches('/'),
        module_id,
        version_id,
        path
    )
}

fn str_field<'a>(raw: &'a Value, key: &str) -> Option<&'a str> {
    raw.get(key).and_then(Value::as_str)
}

fn list_field<'a>(raw: &'a Value, key: &str) -> &'a [Value] {
    raw.get(key).and_then(Value::as_array).map(Vec::as_slice).unwrap_or(&[])
}

/// Map the project payload onto [`Project`], filling every missing field.
///
/// Component urls are rebuilt from module/version/path; a url in the payload
/// is ignored.
pub fn normalize_project(raw: &Value, cdn_base: &str) -> Project {
    let modules = list_field(raw, "modules")
        .iter()
        .map(|m| normalize_module(m, cdn_base))
        .collect();

    let styles = match raw.get("styles") {
        None | Some(Value::Null) => None,
        Some(styles) => match serde_json::from_value::<ProjectStyles>(styles.clone()) {
            Ok(styles) => Some(styles),
            Err(err) => {
                tracing::warn!(error = %err, "ignoring unrecognized project styles");
                None
            }
        },
    };

    Project {
        id: str_field(raw, "id")
            .filter(|id| !id.is_empty())
            .or_else(|| str_field(raw, "projectId"))
            .unwrap_or_default()
            .to_string(),
        name: str_field(raw, "name")
            .filter(|n| !n.is_empty())
            .unwrap_or(UNTITLED_PROJECT)
            .to_string(),
        url: str_field(raw, "url").unwrap_or_default().to_string(),
        modules,
        styles,
    }
}

fn normalize_module(raw: &Value, cdn_base: &str) -> Module {
    let id = str_field(raw, "id").unwrap_or_default().to_string();
    let version_id = str_field(raw, "versionId").unwrap_or_default().to_string();

    let components = list_field(raw, "components")
        .iter()
        .map(|c| {
            let path = str_field(c, "path").unwrap_or_default().to_string();
            Component {
                name: str_field(c, "name").unwrap_or_default().to_string(),
                url: component_url(cdn_base, &id, &version_id, &path),
                path,
                module_id: id.clone(),
                version_id: version_id.clone(),
                kind: match str_field(c, "type") {
                    Some("override") => ComponentKind::Override,
                    _ => ComponentKind::Component,
                },
            }
        })
        .collect();

    Module {
        name: str_field(raw, "name").unwrap_or_default().to_string(),
        id,
        version_id,
        components,
    }
}

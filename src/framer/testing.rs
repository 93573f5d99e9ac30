//! In-memory [`FramerApi`] for tests.

use crate::error::ExportError;
use crate::framer::client::FramerApi;
use crate::framer::normalize::component_url;
use crate::framer::types::{Component, ComponentKind, Project};
use async_trait::async_trait;
use reqwest::StatusCode;
use std::collections::{BTreeMap, HashMap};

pub const FAKE_CDN: &str = "https://cdn.test";

#[derive(Default)]
pub struct FakeApi {
    pub project: Option<Project>,
    code: HashMap<String, String>,
    manifests: HashMap<String, BTreeMap<String, String>>,
}

impl FakeApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_project(mut self, project: Project) -> Self {
        self.project = Some(project);
        self
    }

    pub fn with_code(mut self, path: &str, code: &str) -> Self {
        self.code.insert(path.to_string(), code.to_string());
        self
    }

    pub fn with_manifest(mut self, module_id: &str, deps: &[(&str, &str)]) -> Self {
        let manifest = deps.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        self.manifests.insert(module_id.to_string(), manifest);
        self
    }

    pub fn component(module_id: &str, version_id: &str, name: &str, path: &str) -> Component {
        Component {
            name: name.to_string(),
            path: path.to_string(),
            module_id: module_id.to_string(),
            version_id: version_id.to_string(),
            url: component_url(FAKE_CDN, module_id, version_id, path),
            kind: ComponentKind::Component,
        }
    }
}

#[async_trait]
impl FramerApi for FakeApi {
    async fn project_metadata(&self, project_id: &str) -> Result<Project, ExportError> {
        match &self.project {
            Some(project) if project.id == project_id => Ok(project.clone()),
            _ => Err(ExportError::ProjectNotFound(project_id.to_string())),
        }
    }

    async fn component_code(
        &self,
        _module_id: &str,
        _version_id: &str,
        file_name: &str,
    ) -> Result<String, ExportError> {
        self.code.get(file_name).cloned().ok_or_else(|| ExportError::Status {
            what: format!("component {file_name}"),
            status: StatusCode::NOT_FOUND,
        })
    }

    async fn component_dependencies(
        &self,
        module_id: &str,
        _version_id: &str,
    ) -> BTreeMap<String, String> {
        self.manifests.get(module_id).cloned().unwrap_or_default()
    }
}

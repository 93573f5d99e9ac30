use crate::error::ExportError;
use crate::framer::client::FramerApi;
use crate::framer::types::ComponentKind;
use crate::tools::resolve_project_id;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListProjectsInput {
    pub project_url: String,
    #[serde(default)]
    pub project_id: Option<String>,
    #[serde(default)]
    pub access_token: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectOverview {
    pub id: String,
    pub name: String,
    pub url: String,
    pub component_count: usize,
    pub module_count: usize,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ModuleOverview {
    pub id: String,
    pub name: String,
    pub component_count: usize,
}

#[derive(Debug, Serialize)]
pub struct ComponentOverview {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: ComponentKind,
    pub url: String,
}

#[derive(Debug, Serialize)]
pub struct ListProjectsResult {
    pub project: ProjectOverview,
    pub modules: Vec<ModuleOverview>,
    pub components: Vec<ComponentOverview>,
}

pub async fn list_framer_projects<A: FramerApi + ?Sized>(
    api: &A,
    input: &ListProjectsInput,
) -> Result<ListProjectsResult, ExportError> {
    let project_id = resolve_project_id(input.project_id.as_deref(), &input.project_url)?;
    let project = api.project_metadata(&project_id).await?;

    let modules = project
        .modules
        .iter()
        .map(|m| ModuleOverview {
            id: m.id.clone(),
            name: m.name.clone(),
            component_count: m.components.len(),
        })
        .collect();
    let components = project
        .components()
        .map(|c| ComponentOverview { name: c.name.clone(), kind: c.kind, url: c.url.clone() })
        .collect();

    Ok(ListProjectsResult {
        project: ProjectOverview {
            component_count: project.component_count(),
            module_count: project.modules.len(),
            id: project.id,
            name: project.name,
            url: project.url,
        },
        modules,
        components,
    })
}

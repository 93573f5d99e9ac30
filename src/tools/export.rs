use crate::analyzer::dependencies::estimate_bundle_size;
use crate::error::ExportError;
use crate::framer::client::FramerApi;
use crate::framer::download::ComponentDownloader;
use crate::framer::types::{
    Component, ExportResult, ExportSummary, ExportedComponent, ExportedStyles, TransformReport,
};
use crate::tools::resolve_project_id;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::Path;

pub const SUMMARY_FILE: &str = "export-summary.json";

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportComponentsInput {
    pub project_url: String,
    #[serde(default)]
    pub project_id: Option<String>,
    pub output_path: String,
    #[serde(default)]
    pub access_token: Option<String>,
}

#[derive(Serialize)]
struct ProjectIdentity<'a> {
    id: &'a str,
    name: &'a str,
    url: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SummaryManifest<'a> {
    project: ProjectIdentity<'a>,
    summary: &'a ExportSummary,
    components: &'a [ExportedComponent],
    transform_report: &'a TransformReport,
}

/// Download every component of a project and write the summary manifest.
pub async fn export_framer_components<A: FramerApi + ?Sized>(
    api: &A,
    input: &ExportComponentsInput,
) -> Result<ExportResult, ExportError> {
    let project_id = resolve_project_id(input.project_id.as_deref(), &input.project_url)?;
    let project = api.project_metadata(&project_id).await?;

    let all_components: Vec<Component> = project.components().cloned().collect();
    if all_components.is_empty() {
        return Err(ExportError::NoComponents(project.name));
    }

    let output_path = Path::new(&input.output_path);
    let downloaded = ComponentDownloader::new(api)
        .download_all(&all_components, output_path)
        .await;
    tracing::info!(
        requested = all_components.len(),
        exported = downloaded.len(),
        "components downloaded"
    );

    let dependencies: BTreeSet<String> = downloaded
        .iter()
        .flat_map(|d| d.exported.dependencies.iter().cloned())
        .collect();
    let total_bytes: usize = downloaded.iter().map(|d| d.bytes).sum();
    let summary = ExportSummary {
        total_components: downloaded.len(),
        total_lines: downloaded.iter().map(|d| d.lines).sum(),
        dependencies: dependencies.into_iter().collect(),
        bundle_size_estimate: Some(estimate_bundle_size(total_bytes)),
    };
    let components: Vec<ExportedComponent> = downloaded.into_iter().map(|d| d.exported).collect();
    let transform_report = TransformReport::untransformed(components.len());

    let manifest = SummaryManifest {
        project: ProjectIdentity { id: &project.id, name: &project.name, url: &project.url },
        summary: &summary,
        components: &components,
        transform_report: &transform_report,
    };
    write_summary(output_path, &serde_json::to_string_pretty(&manifest)?).await?;

    Ok(ExportResult {
        project_id: project.id,
        project_name: project.name,
        output_path: input.output_path.clone(),
        components,
        styles: ExportedStyles::default(),
        summary,
        transform_report,
    })
}

async fn write_summary(output_path: &Path, json: &str) -> Result<(), ExportError> {
    tokio::fs::create_dir_all(output_path).await.map_err(|source| ExportError::Io {
        context: "failed to create output directory",
        path: output_path.to_path_buf(),
        source,
    })?;
    let path = output_path.join(SUMMARY_FILE);
    tokio::fs::write(&path, json).await.map_err(|source| ExportError::Io {
        context: "failed to write export summary",
        path,
        source,
    })
}

use crate::analyzer::dependencies::{count_lines, extract_dependencies};
use crate::error::ExportError;
use crate::framer::client::FramerApi;
use crate::framer::types::{Component, ExportedComponent};
use futures::stream::{self, StreamExt};
use std::collections::BTreeSet;
use std::path::{self, Path, PathBuf};

/// Concurrent downloads per export.
pub const DOWNLOAD_CONCURRENCY: usize = 4;

#[derive(Debug, Clone)]
pub struct DownloadedComponent {
    pub exported: ExportedComponent,
    pub lines: usize,
    pub bytes: usize,
}

pub struct ComponentDownloader<'a, A: FramerApi + ?Sized> {
    api: &'a A,
}

impl<'a, A: FramerApi + ?Sized> ComponentDownloader<'a, A> {
    pub fn new(api: &'a A) -> Self {
        Self { api }
    }

    /// Download every component, skipping the ones that fail.
    ///
    /// Results keep the input order. A broken component is logged and left
    /// out, so the result may be shorter than `components`.
    pub async fn download_all(
        &self,
        components: &[Component],
        output_path: &Path,
    ) -> Vec<DownloadedComponent> {
        let results: Vec<Result<DownloadedComponent, ExportError>> = stream::iter(components)
            .map(|component| self.download(component, output_path))
            .buffered(DOWNLOAD_CONCURRENCY)
            .collect()
            .await;

        components
            .iter()
            .zip(results)
            .filter_map(|(component, result)| match result {
                Ok(downloaded) => Some(downloaded),
                Err(err) => {
                    tracing::warn!(component = %component.name, error = %err, "failed to download component");
                    None
                }
            })
            .collect()
    }

    /// Fetch one component and write it under `<output>/original/`.
    pub async fn download(
        &self,
        component: &Component,
        output_path: &Path,
    ) -> Result<DownloadedComponent, ExportError> {
        let file_path = exported_file_path(output_path, &component.path)?;
        let code = self
            .api
            .component_code(&component.module_id, &component.version_id, &component.path)
            .await?;
        let manifest = self
            .api
            .component_dependencies(&component.module_id, &component.version_id)
            .await;

        if let Some(parent) = file_path.parent() {
            tokio::fs::create_dir_all(parent).await.map_err(|source| ExportError::Io {
                context: "failed to create directory",
                path: parent.to_path_buf(),
                source,
            })?;
        }
        tokio::fs::write(&file_path, &code).await.map_err(|source| ExportError::Io {
            context: "failed to write component",
            path: file_path.clone(),
            source,
        })?;

        let dependencies: BTreeSet<String> = manifest
            .into_keys()
            .chain(extract_dependencies(&code))
            .collect();

        tracing::debug!(component = %component.name, path = %file_path.display(), "component written");
        Ok(DownloadedComponent {
            exported: ExportedComponent {
                name: component.name.clone(),
                original_path: component.url.clone(),
                exported_path: file_path.to_string_lossy().to_string(),
                dependencies: dependencies.into_iter().collect(),
                kind: component.kind,
            },
            lines: count_lines(&code),
            bytes: code.len(),
        })
    }
}

/// `<output>/original/<path>`, with `.tsx` appended when missing.
///
/// `path` comes from the remote payload; absolute paths and `..` segments
/// are rejected so every file stays under `<output>/original/`.
pub fn exported_file_path(
    output_path: &Path,
    component_path: &str,
) -> Result<PathBuf, ExportError> {
    let escapes = Path::new(component_path).components().any(|c| {
        matches!(
            c,
            path::Component::RootDir | path::Component::Prefix(_) | path::Component::ParentDir
        )
    });
    if escapes {
        return Err(ExportError::UnsafeComponentPath(component_path.to_string()));
    }

    let file_name = if component_path.ends_with(".tsx") {
        component_path.to_string()
    } else {
        format!("{component_path}.tsx")
    };
    Ok(output_path.join("original").join(file_name))
}

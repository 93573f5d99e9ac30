//! Framer API client
//!
//! Fetches project metadata from the Framer web API and component sources
//! from the Framer CDN.

use crate::config::ClientConfig;
use crate::error::ExportError;
use crate::framer::normalize::{component_url, normalize_project};
use crate::framer::types::Project;
use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::{Client, StatusCode};
use serde_json::Value;
use std::collections::BTreeMap;

static PROJECT_ID_IN_URL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"projects/([^/?]+)").expect("static project id pattern"));

/// Project id from a `framer.com/projects/<Name--id>` url. Published site
/// urls carry no id.
pub fn extract_project_id(url: &str) -> Option<String> {
    PROJECT_ID_IN_URL
        .captures(url)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

/// Remote side of the export tools.
#[async_trait]
pub trait FramerApi: Send + Sync {
    async fn project_metadata(&self, project_id: &str) -> Result<Project, ExportError>;

    async fn component_code(
        &self,
        module_id: &str,
        version_id: &str,
        file_name: &str,
    ) -> Result<String, ExportError>;

    /// `dependencies.json` of a module version. Not every module has one, so
    /// any failure reads as an empty manifest.
    async fn component_dependencies(
        &self,
        module_id: &str,
        version_id: &str,
    ) -> BTreeMap<String, String>;
}

pub struct FramerClient {
    http: Client,
    config: ClientConfig,
}

impl FramerClient {
    pub fn new(config: ClientConfig) -> Result<Self, ExportError> {
        let http = Client::builder()
            .timeout(config.timeout)
            .user_agent(concat!("framer-export/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(ExportError::Client)?;
        Ok(Self { http, config })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    async fn get(&self, url: &str, what: &str) -> Result<reqwest::Response, ExportError> {
        tracing::debug!(%url, "GET");
        self.http
            .get(url)
            .send()
            .await
            .map_err(|source| ExportError::Request { what: what.to_string(), source })
    }
}

/// Map a failed metadata response onto the error the user can act on.
pub fn metadata_status_error(status: StatusCode, project_id: &str) -> ExportError {
    match status {
        StatusCode::UNAUTHORIZED => ExportError::Unauthorized,
        StatusCode::NOT_FOUND => ExportError::ProjectNotFound(project_id.to_string()),
        status => ExportError::Status { what: "project metadata".into(), status },
    }
}

#[async_trait]
impl FramerApi for FramerClient {
    async fn project_metadata(&self, project_id: &str) -> Result<Project, ExportError> {
        let url = format!("{}/projects/{}", self.config.api_base, project_id);
        tracing::debug!(%url, "fetching project metadata");

        let response = self
            .http
            .get(&url)
            .bearer_auth(&self.config.access_token)
            .query(&[
                ("accessToken", self.config.access_token.as_str()),
                ("includeUsageData", "true"),
            ])
            .send()
            .await
            .map_err(|source| ExportError::Request { what: "project metadata".into(), source })?;

        let status = response.status();
        if !status.is_success() {
            return Err(metadata_status_error(status, project_id));
        }

        let raw: Value = response
            .json()
            .await
            .map_err(|source| ExportError::Request { what: "project metadata".into(), source })?;
        let project = normalize_project(&raw, &self.config.cdn_base);
        tracing::info!(
            project = %project.id,
            modules = project.modules.len(),
            components = project.component_count(),
            "fetched project metadata"
        );
        Ok(project)
    }

    async fn component_code(
        &self,
        module_id: &str,
        version_id: &str,
        file_name: &str,
    ) -> Result<String, ExportError> {
        let url = component_url(&self.config.cdn_base, module_id, version_id, file_name);
        let what = format!("component {file_name}");
        let response = self.get(&url, &what).await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ExportError::Status { what, status });
        }
        response
            .text()
            .await
            .map_err(|source| ExportError::Request { what, source })
    }

    async fn component_dependencies(
        &self,
        module_id: &str,
        version_id: &str,
    ) -> BTreeMap<String, String> {
        let url = component_url(&self.config.cdn_base, module_id, version_id, "dependencies.json");
        let response = match self.get(&url, "dependencies manifest").await {
            Ok(response) if response.status().is_success() => response,
            Ok(response) => {
                tracing::debug!(%url, status = %response.status(), "no dependencies manifest");
                return BTreeMap::new();
            }
            Err(err) => {
                tracing::debug!(%url, error = %err, "dependencies manifest unavailable");
                return BTreeMap::new();
            }
        };

        match response.json::<BTreeMap<String, Value>>().await {
            Ok(manifest) => manifest
                .into_iter()
                .map(|(name, version)| {
                    let version = match version {
                        Value::String(s) => s,
                        other => other.to_string(),
                    };
                    (name, version)
                })
                .collect(),
            Err(err) => {
                tracing::debug!(%url, error = %err, "unreadable dependencies manifest");
                BTreeMap::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Settings;

    #[test]
    fn project_ids_from_urls() {
        assert_eq!(
            extract_project_id("https://framer.com/projects/Portfolio--aBc123?node=xyz").as_deref(),
            Some("Portfolio--aBc123")
        );
        assert_eq!(
            extract_project_id("https://framer.com/projects/Site--id/").as_deref(),
            Some("Site--id")
        );
        assert_eq!(extract_project_id("https://nailsbystella.hu"), None);
    }

    #[test]
    fn metadata_statuses_map_to_actionable_errors() {
        assert!(matches!(
            metadata_status_error(StatusCode::UNAUTHORIZED, "p"),
            ExportError::Unauthorized
        ));
        match metadata_status_error(StatusCode::NOT_FOUND, "Site--id") {
            ExportError::ProjectNotFound(id) => assert_eq!(id, "Site--id"),
            other => panic!("unexpected {other:?}"),
        }
        let err = metadata_status_error(StatusCode::BAD_GATEWAY, "p");
        assert_eq!(err.to_string(), "Failed to fetch project metadata: 502 Bad Gateway");
    }

    #[test]
    fn client_builds_from_settings() {
        let settings = Settings { access_token: Some("t".into()), ..Settings::default() };
        let client = FramerClient::new(settings.client_config(None).unwrap()).unwrap();
        assert_eq!(client.config().api_base, "https://api.framer.com/web");
    }
}

//! Component export tools
//!
//! The three operations the MCP server exposes, plus their schemas and the
//! dispatcher that turns a `tools/call` into a text result.

pub mod component;
pub mod export;
pub mod list;

use crate::config::Settings;
use crate::error::ExportError;
use crate::framer::client::{extract_project_id, FramerClient};
use crate::mcp::protocol::{Tool, ToolCallResult};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{json, Value};

pub use component::{get_component_code, parse_component_url, GetComponentInput, GetComponentResult};
pub use export::{export_framer_components, ExportComponentsInput};
pub use list::{list_framer_projects, ListProjectsInput, ListProjectsResult};

pub const LIST_PROJECTS: &str = "list_framer_projects";
pub const EXPORT_COMPONENTS: &str = "export_framer_components";
pub const GET_COMPONENT: &str = "get_component_code";

const ACCESS_TOKEN_DESCRIPTION: &str =
    "Framer access token (optional if FRAMER_ACCESS_TOKEN env var is set)";

/// An explicit id wins; otherwise it must be recoverable from the url.
pub(crate) fn resolve_project_id(
    project_id: Option<&str>,
    project_url: &str,
) -> Result<String, ExportError> {
    project_id
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(str::to_string)
        .or_else(|| extract_project_id(project_url))
        .ok_or(ExportError::ProjectIdUnresolved)
}

pub fn get_tools() -> Vec<Tool> {
    vec![
        Tool {
            name: LIST_PROJECTS.into(),
            description: "List components and modules in a specific Framer project. \
                Requires a project URL (framer.com/projects/...) or published site URL with projectId. \
                Returns project metadata, modules, and available components."
                .into(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "projectUrl": {
                        "type": "string",
                        "description": "Framer project URL (e.g., https://framer.com/projects/Project-Name--ABC123) or published site URL"
                    },
                    "projectId": {
                        "type": "string",
                        "description": "Project ID (required for published sites if not extractable from URL)"
                    },
                    "accessToken": {
                        "type": "string",
                        "description": ACCESS_TOKEN_DESCRIPTION
                    }
                },
                "required": ["projectUrl"]
            }),
        },
        Tool {
            name: EXPORT_COMPONENTS.into(),
            description: "Export all components from a Framer project to a local directory. \
                Downloads component source code (.tsx files) and generates a summary report. \
                Components are saved in their original form (no transformation applied)."
                .into(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "projectUrl": {
                        "type": "string",
                        "description": "Framer project URL or published site URL. For published sites, also provide projectId."
                    },
                    "projectId": {
                        "type": "string",
                        "description": "Framer project ID (required for published sites)"
                    },
                    "outputPath": {
                        "type": "string",
                        "description": "Local directory path where components will be exported. Example: \"/tmp/framer-export/my-project\""
                    },
                    "accessToken": {
                        "type": "string",
                        "description": ACCESS_TOKEN_DESCRIPTION
                    }
                },
                "required": ["projectUrl", "outputPath"]
            }),
        },
        Tool {
            name: GET_COMPONENT.into(),
            description: "Fetch source code for a single Framer component from CDN. \
                Requires a direct CDN URL (framerusercontent.com/modules/...). \
                Returns component code, line count, and extracted dependencies."
                .into(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "componentUrl": {
                        "type": "string",
                        "description": "Direct URL to Framer component on CDN. Example: https://framerusercontent.com/modules/{moduleId}/{versionId}/Button.tsx"
                    },
                    "accessToken": {
                        "type": "string",
                        "description": ACCESS_TOKEN_DESCRIPTION
                    }
                },
                "required": ["componentUrl"]
            }),
        },
    ]
}

/// Runs tool calls against the live Framer API.
pub struct ToolHandlers {
    settings: Settings,
}

impl ToolHandlers {
    pub fn new(settings: Settings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Every failure comes back as an `Error: ...` text result.
    pub async fn handle(&self, name: &str, arguments: Value) -> ToolCallResult {
        match self.call(name, arguments).await {
            Ok(value) => ToolCallResult::json(&value),
            Err(err) => {
                tracing::warn!(tool = name, error = %err, "tool call failed");
                ToolCallResult::error(format!("Error: {err}"))
            }
        }
    }

    async fn call(&self, name: &str, arguments: Value) -> Result<Value, ExportError> {
        match name {
            LIST_PROJECTS => {
                let input: ListProjectsInput = parse_arguments(arguments)?;
                let client = self.client(input.access_token.as_deref())?;
                to_value(list_framer_projects(&client, &input).await?)
            }
            EXPORT_COMPONENTS => {
                let input: ExportComponentsInput = parse_arguments(arguments)?;
                let client = self.client(input.access_token.as_deref())?;
                to_value(export_framer_components(&client, &input).await?)
            }
            GET_COMPONENT => {
                let input: GetComponentInput = parse_arguments(arguments)?;
                let client = self.client(input.access_token.as_deref())?;
                to_value(get_component_code(&client, &input).await?)
            }
            other => Err(ExportError::UnknownTool(other.to_string())),
        }
    }

    fn client(&self, token_override: Option<&str>) -> Result<FramerClient, ExportError> {
        FramerClient::new(self.settings.client_config(token_override)?)
    }
}

fn parse_arguments<T: DeserializeOwned>(arguments: Value) -> Result<T, ExportError> {
    serde_json::from_value(arguments).map_err(ExportError::InvalidArguments)
}

fn to_value<T: Serialize>(result: T) -> Result<Value, ExportError> {
    Ok(serde_json::to_value(result)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(result: &ToolCallResult) -> &str {
        &result.content[0].text
    }

    #[test]
    fn project_id_resolution() {
        assert_eq!(
            resolve_project_id(None, "https://framer.com/projects/Site--abc?node=1").unwrap(),
            "Site--abc"
        );
        assert_eq!(resolve_project_id(Some("Given--id"), "https://x.com").unwrap(), "Given--id");
        assert_eq!(
            resolve_project_id(Some(" "), "https://framer.com/projects/Fallback").unwrap(),
            "Fallback"
        );
        assert!(matches!(
            resolve_project_id(None, "https://published.site"),
            Err(ExportError::ProjectIdUnresolved)
        ));
    }

    #[test]
    fn three_tools_with_required_fields() {
        let tools = get_tools();
        let names: Vec<&str> = tools.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec![LIST_PROJECTS, EXPORT_COMPONENTS, GET_COMPONENT]);
        assert_eq!(tools[1].input_schema["required"], json!(["projectUrl", "outputPath"]));
    }

    #[tokio::test]
    async fn unknown_tool_is_an_error_result() {
        let handlers = ToolHandlers::new(Settings::default());
        let result = handlers.handle("delete_everything", json!({})).await;
        assert_eq!(result.is_error, Some(true));
        assert_eq!(text(&result), "Error: Unknown tool: delete_everything");
    }

    #[tokio::test]
    async fn missing_token_fails_before_any_request() {
        let handlers = ToolHandlers::new(Settings::default());
        let result = handlers
            .handle(LIST_PROJECTS, json!({ "projectUrl": "https://framer.com/projects/A--b" }))
            .await;
        assert_eq!(result.is_error, Some(true));
        assert!(text(&result).starts_with("Error: FRAMER_ACCESS_TOKEN environment variable is required"));
    }

    #[tokio::test]
    async fn malformed_arguments_are_rejected() {
        let handlers = ToolHandlers::new(Settings::default());
        let result = handlers.handle(EXPORT_COMPONENTS, json!({ "projectUrl": 3 })).await;
        assert_eq!(result.is_error, Some(true));
        assert!(text(&result).starts_with("Error: invalid tool arguments"));
    }

    #[tokio::test]
    async fn invalid_component_url_with_token() {
        let settings = Settings { access_token: Some("token".into()), ..Settings::default() };
        let handlers = ToolHandlers::new(settings);
        let result = handlers
            .handle(GET_COMPONENT, json!({ "componentUrl": "https://example.com/Button.tsx" }))
            .await;
        assert_eq!(result.is_error, Some(true));
        assert!(text(&result).contains("Invalid component URL format"));
    }
}

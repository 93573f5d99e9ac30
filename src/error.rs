use std::path::PathBuf;
use thiserror::Error;

/// Failures of the component export tools.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error(
        "FRAMER_ACCESS_TOKEN environment variable is required. \
         Get your token from Framer project settings."
    )]
    MissingAccessToken,

    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    #[error("invalid tool arguments: {0}")]
    InvalidArguments(#[source] serde_json::Error),

    #[error(
        "Could not extract project ID from URL. \
         Please provide projectId parameter for published sites."
    )]
    ProjectIdUnresolved,

    #[error(
        "Authentication failed. Check your FRAMER_ACCESS_TOKEN. \
         Get a token from your Framer project settings."
    )]
    Unauthorized,

    #[error("Project not found: {0}. Verify the project ID is correct and the site is published.")]
    ProjectNotFound(String),

    #[error("Failed to fetch {what}: {status}")]
    Status {
        what: String,
        status: reqwest::StatusCode,
    },

    #[error("request for {what} failed: {source}")]
    Request {
        what: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    #[error(
        "Invalid component URL format. Expected: \
         https://framerusercontent.com/modules/{{moduleId}}/{{versionId}}/{{fileName}} (got {0})"
    )]
    InvalidComponentUrl(String),

    #[error("component path {0:?} points outside the export directory")]
    UnsafeComponentPath(String),

    #[error("No components found in project {0}. Verify the project has published components.")]
    NoComponents(String),

    #[error("{context} {path}: {source}")]
    Io {
        context: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// Failures while reading the canvas or writing item downloads.
#[derive(Debug, Error)]
pub enum CanvasError {
    #[error("canvas host error: {0}")]
    Host(String),

    #[error("node tree deeper than {limit} levels")]
    DepthExceeded { limit: usize },

    #[error("No files selected")]
    NothingSelected,

    #[error("{context} {path}: {source}")]
    Io {
        context: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

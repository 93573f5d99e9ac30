use crate::analyzer::dependencies::{count_lines, extract_dependencies};
use crate::analyzer::outline::{outline_source, SourceOutline};
use crate::error::ExportError;
use crate::framer::client::FramerApi;
use serde::{Deserialize, Serialize};
use url::Url;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetComponentInput {
    pub component_url: String,
    #[serde(default)]
    pub access_token: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GetComponentResult {
    pub url: String,
    pub file_name: String,
    pub code: String,
    pub lines: usize,
    pub dependencies: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub outline: Option<SourceOutline>,
}

/// Address of a component file on the CDN.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComponentAddress {
    pub module_id: String,
    pub version_id: String,
    pub file_name: String,
}

/// Split `https://<cdn>/modules/{moduleId}/{versionId}/{fileName}`.
/// `fileName` may itself contain `/`.
pub fn parse_component_url(component_url: &str) -> Result<ComponentAddress, ExportError> {
    let invalid = || ExportError::InvalidComponentUrl(component_url.to_string());
    let url = Url::parse(component_url).map_err(|_| invalid())?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(invalid());
    }

    let segments: Vec<&str> = url.path_segments().ok_or_else(invalid)?.collect();
    match segments.as_slice() {
        ["modules", module_id, version_id, rest @ ..]
            if !module_id.is_empty()
                && !version_id.is_empty()
                && !rest.is_empty()
                && rest.iter().all(|s| !s.is_empty()) =>
        {
            Ok(ComponentAddress {
                module_id: module_id.to_string(),
                version_id: version_id.to_string(),
                file_name: rest.join("/"),
            })
        }
        _ => Err(invalid()),
    }
}

pub async fn get_component_code<A: FramerApi + ?Sized>(
    api: &A,
    input: &GetComponentInput,
) -> Result<GetComponentResult, ExportError> {
    let address = parse_component_url(&input.component_url)?;
    let code = api
        .component_code(&address.module_id, &address.version_id, &address.file_name)
        .await?;

    Ok(GetComponentResult {
        url: input.component_url.clone(),
        lines: count_lines(&code),
        dependencies: extract_dependencies(&code).into_iter().collect(),
        outline: outline_source(&code, &address.file_name),
        file_name: address.file_name,
        code,
    })
}

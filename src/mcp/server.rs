//! MCP Server
//!
//! Newline-delimited JSON-RPC over stdio. Stdout carries responses only;
//! everything else goes to the tracing subscriber on stderr.

use super::protocol::*;
use crate::tools::{get_tools, ToolHandlers};
use serde::Serialize;
use serde_json::Value;
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader};

pub const SERVER_NAME: &str = "framer-export";

const PREVIEW_CHARS: usize = 100;

pub struct McpServer {
    handlers: ToolHandlers,
}

impl McpServer {
    pub fn new(handlers: ToolHandlers) -> Self {
        Self { handlers }
    }

    /// Serve stdin/stdout until stdin closes.
    pub async fn run(&self) -> anyhow::Result<()> {
        self.serve(tokio::io::stdin(), tokio::io::stdout()).await
    }

    pub async fn serve<R, W>(&self, input: R, mut output: W) -> anyhow::Result<()>
    where
        R: AsyncRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let mut lines = BufReader::new(input).lines();
        tracing::info!(server = SERVER_NAME, "MCP server running on stdio");

        while let Some(line) = lines.next_line().await? {
            if line.trim().is_empty() {
                continue;
            }
            tracing::debug!(message = %preview(&line), "<-");

            let Some(response) = self.handle(&line).await else {
                continue;
            };
            let out = serde_json::to_string(&response)?;
            tracing::debug!(message = %preview(&out), "->");

            output.write_all(out.as_bytes()).await?;
            output.write_all(b"\n").await?;
            output.flush().await?;
        }

        tracing::info!("stdin closed, MCP server shutting down");
        Ok(())
    }

    /// Handle a single JSON-RPC message. Notifications (no `id`) that need no
    /// answer yield `None`.
    pub async fn handle(&self, msg: &str) -> Option<JsonRpcResponse> {
        let req: JsonRpcRequest = match serde_json::from_str(msg) {
            Ok(r) => r,
            Err(e) => return Some(JsonRpcResponse::error(None, PARSE_ERROR, e.to_string())),
        };

        let id = req.id.clone();
        let response = match req.method.as_str() {
            "initialize" => {
                let result = InitializeResult {
                    protocol_version: PROTOCOL_VERSION.into(),
                    capabilities: ServerCapabilities {
                        tools: ToolsCapability { list_changed: false },
                    },
                    server_info: ServerInfo {
                        name: SERVER_NAME.into(),
                        version: env!("CARGO_PKG_VERSION").into(),
                    },
                };
                respond(id, result)
            }

            "notifications/initialized" if id.is_none() => return None,
            "notifications/initialized" => JsonRpcResponse::success(id, Value::Null),

            "tools/list" => respond(id, ToolsListResult { tools: get_tools() }),

            "tools/call" => {
                let params: ToolCallParams = match serde_json::from_value(req.params) {
                    Ok(p) => p,
                    Err(e) => return Some(JsonRpcResponse::error(id, INVALID_PARAMS, e.to_string())),
                };

                tracing::info!(tool = %params.name, "calling tool");
                let result = self.handlers.handle(&params.name, params.arguments).await;
                respond(id, result)
            }

            _ => JsonRpcResponse::error(
                id,
                METHOD_NOT_FOUND,
                format!("Unknown method: {}", req.method),
            ),
        };
        Some(response)
    }
}

fn respond<T: Serialize>(id: Option<Value>, result: T) -> JsonRpcResponse {
    match serde_json::to_value(result) {
        Ok(v) => JsonRpcResponse::success(id, v),
        Err(e) => JsonRpcResponse::error(id, INTERNAL_ERROR, format!("Serialization error: {}", e)),
    }
}

fn preview(line: &str) -> String {
    if line.chars().count() > PREVIEW_CHARS {
        let head: String = line.chars().take(PREVIEW_CHARS).collect();
        format!("{head}...")
    } else {
        line.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Settings;
    use serde_json::json;

    fn server() -> McpServer {
        McpServer::new(ToolHandlers::new(Settings::default()))
    }

    async fn call(msg: Value) -> Value {
        let response = server().handle(&msg.to_string()).await.expect("response");
        serde_json::to_value(response).unwrap()
    }

    #[tokio::test]
    async fn initialize_reports_server_info() {
        let response = call(json!({ "jsonrpc": "2.0", "id": 1, "method": "initialize", "params": {} })).await;
        assert_eq!(response["id"], json!(1));
        assert_eq!(response["result"]["protocolVersion"], json!(PROTOCOL_VERSION));
        assert_eq!(response["result"]["serverInfo"]["name"], json!("framer-export"));
        assert_eq!(response["result"]["capabilities"]["tools"]["listChanged"], json!(false));
    }

    #[tokio::test]
    async fn lists_three_tools() {
        let response = call(json!({ "jsonrpc": "2.0", "id": "a", "method": "tools/list" })).await;
        let tools = response["result"]["tools"].as_array().unwrap();
        assert_eq!(tools.len(), 3);
        assert_eq!(tools[2]["name"], json!("get_component_code"));
        assert!(tools[0]["inputSchema"]["properties"]["projectUrl"].is_object());
    }

    #[tokio::test]
    async fn unknown_method_and_parse_error() {
        let response = call(json!({ "jsonrpc": "2.0", "id": 7, "method": "resources/list" })).await;
        assert_eq!(response["error"]["code"], json!(METHOD_NOT_FOUND));
        assert_eq!(response["id"], json!(7));

        let response = server().handle("{not json").await.unwrap();
        assert_eq!(response.error.unwrap().code, PARSE_ERROR);
        assert!(response.id.is_none());
    }

    #[tokio::test]
    async fn tool_failures_are_results_not_rpc_errors() {
        let response = call(json!({
            "jsonrpc": "2.0",
            "id": 3,
            "method": "tools/call",
            "params": { "name": "nope", "arguments": {} }
        }))
        .await;
        assert!(response.get("error").is_none());
        assert_eq!(response["result"]["isError"], json!(true));
        assert_eq!(response["result"]["content"][0]["type"], json!("text"));
        assert_eq!(response["result"]["content"][0]["text"], json!("Error: Unknown tool: nope"));
    }

    #[tokio::test]
    async fn bad_call_params_are_invalid_params() {
        let response = call(json!({ "jsonrpc": "2.0", "id": 4, "method": "tools/call", "params": {} })).await;
        assert_eq!(response["error"]["code"], json!(INVALID_PARAMS));
    }

    #[tokio::test]
    async fn initialized_notification_gets_no_reply() {
        let msg = json!({ "jsonrpc": "2.0", "method": "notifications/initialized" });
        assert!(server().handle(&msg.to_string()).await.is_none());
    }

    #[tokio::test]
    async fn serve_writes_one_line_per_request() {
        let input = concat!(
            "{\"jsonrpc\":\"2.0\",\"id\":1,\"method\":\"initialize\"}\n",
            "\n",
            "{\"jsonrpc\":\"2.0\",\"method\":\"notifications/initialized\"}\n",
            "{\"jsonrpc\":\"2.0\",\"id\":2,\"method\":\"tools/list\"}\n",
        );
        let mut output = Vec::new();
        server().serve(input.as_bytes(), &mut output).await.unwrap();

        let lines: Vec<Value> = String::from_utf8(output)
            .unwrap()
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0]["id"], json!(1));
        assert_eq!(lines[1]["id"], json!(2));
    }
}

//! MCP server implementation.
//!
//! Handles the JSON-RPC surface (`initialize`, `tools/list`, `tools/call`, ...)
//! and hands tool calls to the [`Dispatcher`]. The same handler backs both the
//! stdio and HTTP transports.

use crate::dispatcher::Dispatcher;
use crate::error::McpError;
use crate::http_transport::HttpServer;
use crate::protocol::*;
use serde_json::{Value, json};
use sqlgate_core::config::{McpConfig, Transport};
use std::sync::Arc;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};

/// Name reported in `initialize` and `/health`.
pub const SERVER_NAME: &str = "sqlgate";

/// The MCP server.
pub struct McpServer {
    config: McpConfig,
    dispatcher: Arc<Dispatcher>,
}

impl McpServer {
    /// Create a new MCP server around a dispatcher.
    pub fn new(config: McpConfig, dispatcher: Arc<Dispatcher>) -> Self {
        Self { config, dispatcher }
    }

    pub fn config(&self) -> &McpConfig {
        &self.config
    }

    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    /// Start the MCP server on the configured transport.
    pub async fn run(self) -> Result<(), McpError> {
        match self.config.transport {
            Transport::Stdio => self.run_stdio().await,
            Transport::Http => self.run_http().await,
        }
    }

    /// Run the server with stdio transport.
    pub async fn run_stdio(&self) -> Result<(), McpError> {
        tracing::info!(
            tools = self.dispatcher.catalog().len(),
            "Starting MCP server with stdio transport"
        );
        let stdin = BufReader::new(tokio::io::stdin());
        let stdout = tokio::io::stdout();
        self.serve_lines(stdin, stdout).await
    }

    /// Run the server with HTTP transport.
    pub async fn run_http(self) -> Result<(), McpError> {
        let address = self.config.bind_address();
        tracing::info!(
            address = %address,
            tools = self.dispatcher.catalog().len(),
            "Starting MCP server with HTTP transport"
        );
        HttpServer::new(address, Arc::new(self)).run().await
    }

    /// Serve newline-delimited JSON-RPC until `reader` reaches end of input.
    pub async fn serve_lines<R, W>(&self, reader: R, mut writer: W) -> Result<(), McpError>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let mut lines = reader.lines();
        while let Some(line) = lines.next_line().await? {
            if line.trim().is_empty() {
                continue;
            }

            let Some(response) = self.handle_message(&line).await else {
                continue;
            };
            let mut response_json = serde_json::to_string(&response)?;
            response_json.push('\n');

            writer.write_all(response_json.as_bytes()).await?;
            writer.flush().await?;
        }

        tracing::info!("Input closed, stopping stdio transport");
        Ok(())
    }

    /// Handle one raw JSON-RPC message. Returns `None` for notifications.
    pub async fn handle_message(&self, message: &str) -> Option<JsonRpcResponse> {
        let value: Value = match serde_json::from_str(message) {
            Ok(value) => value,
            Err(e) => {
                tracing::debug!(error = %e, "Unparseable JSON-RPC message");
                return Some(JsonRpcResponse::error(
                    None,
                    error_codes::PARSE_ERROR,
                    format!("Parse error: {}", e),
                ));
            }
        };

        let id = value.get("id").cloned();
        let request: JsonRpcRequest = match serde_json::from_value(value) {
            Ok(request) => request,
            Err(e) => {
                return Some(JsonRpcResponse::error(
                    id,
                    error_codes::INVALID_REQUEST,
                    format!("Invalid request: {}", e),
                ));
            }
        };

        if request.jsonrpc != "2.0" {
            return Some(JsonRpcResponse::error(
                request.id,
                error_codes::INVALID_REQUEST,
                "Invalid request: jsonrpc must be \"2.0\"",
            ));
        }

        if request.is_notification() {
            tracing::debug!(method = %request.method, "Notification received");
            return None;
        }

        Some(self.handle_request(request).await)
    }

    /// Handle a JSON-RPC request.
    pub async fn handle_request(&self, request: JsonRpcRequest) -> JsonRpcResponse {
        let id = request.id.clone();

        match request.method.as_str() {
            "initialize" => self.handle_initialize(id),
            "initialized" | "notifications/initialized" => JsonRpcResponse::success(id, json!({})),
            "ping" => JsonRpcResponse::success(id, json!({})),
            "tools/list" => self.handle_list_tools(id),
            "tools/call" => self.handle_call_tool(id, request.params).await,
            "shutdown" => self.handle_shutdown(id),
            _ => JsonRpcResponse::error(
                id,
                error_codes::METHOD_NOT_FOUND,
                format!("Method not found: {}", request.method),
            ),
        }
    }

    fn handle_initialize(&self, id: Option<Value>) -> JsonRpcResponse {
        let info = ServerInfo {
            name: SERVER_NAME.to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        };
        let result = json!({
            "protocolVersion": PROTOCOL_VERSION,
            "serverInfo": info,
            "capabilities": {
                "tools": {
                    "listChanged": false
                }
            }
        });
        JsonRpcResponse::success(id, result)
    }

    fn handle_list_tools(&self, id: Option<Value>) -> JsonRpcResponse {
        let planner = self.dispatcher.planner();
        let result = ListToolsResponse {
            tools: planner.catalog().tool_definitions(planner.default_schema()),
        };
        JsonRpcResponse::success(id, json!(result))
    }

    async fn handle_call_tool(&self, id: Option<Value>, params: Option<Value>) -> JsonRpcResponse {
        let params: CallToolParams = match params {
            Some(p) => match serde_json::from_value(p) {
                Ok(params) => params,
                Err(e) => {
                    return JsonRpcResponse::error(
                        id,
                        error_codes::INVALID_PARAMS,
                        format!("Invalid params: {}", e),
                    );
                }
            },
            None => return JsonRpcResponse::error(id, error_codes::INVALID_PARAMS, "Missing params"),
        };

        let envelope = self
            .dispatcher
            .dispatch(&params.name, &params.arguments, params.options)
            .await;
        JsonRpcResponse::success(id, json!(envelope.into_tool_response()))
    }

    fn handle_shutdown(&self, id: Option<Value>) -> JsonRpcResponse {
        tracing::info!("MCP server shutdown requested");
        JsonRpcResponse::success(id, json!(null))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;
    use crate::dispatcher::StatementPlanner;
    use async_trait::async_trait;
    use sqlgate_runtime::{ExecutionError, ExecutionResult, SqlExecutor, SqlStatement};

    struct Unreachable;

    #[async_trait]
    impl SqlExecutor for Unreachable {
        async fn execute(&self, _: &SqlStatement) -> Result<ExecutionResult, ExecutionError> {
            Err(ExecutionError::Connection("no database in unit tests".to_string()))
        }
    }

    fn server() -> McpServer {
        let planner = StatementPlanner::new(Arc::new(Catalog::builtin()), "dbo");
        let dispatcher = Dispatcher::new(planner, Arc::new(Unreachable));
        McpServer::new(McpConfig::default(), Arc::new(dispatcher))
    }

    fn request(method: &str, params: Option<Value>) -> JsonRpcRequest {
        JsonRpcRequest {
            jsonrpc: "2.0".to_string(),
            id: Some(json!(1)),
            method: method.to_string(),
            params,
        }
    }

    #[tokio::test]
    async fn test_initialize() {
        let response = server().handle_request(request("initialize", None)).await;
        let result = response.result.unwrap();
        assert_eq!(result["protocolVersion"], PROTOCOL_VERSION);
        assert_eq!(result["serverInfo"]["name"], "sqlgate");
        assert!(response.error.is_none());
    }

    #[tokio::test]
    async fn test_list_tools() {
        let response = server().handle_request(request("tools/list", None)).await;
        let tools = response.result.unwrap()["tools"].as_array().unwrap().clone();
        assert_eq!(tools.len(), 31);
        assert_eq!(tools[0]["name"], "create_table");
        assert!(tools[0]["inputSchema"]["properties"].is_object());
    }

    #[tokio::test]
    async fn test_call_unknown_tool_is_tool_error() {
        let response = server()
            .handle_request(request(
                "tools/call",
                Some(json!({ "name": "nonexistent", "arguments": {} })),
            ))
            .await;
        let result = response.result.unwrap();
        assert_eq!(result["isError"], true);
        assert!(
            result["content"][0]["text"]
                .as_str()
                .unwrap()
                .starts_with("Error executing nonexistent: Unknown tool: nonexistent")
        );
    }

    #[tokio::test]
    async fn test_call_without_params() {
        let response = server().handle_request(request("tools/call", None)).await;
        assert_eq!(response.error.unwrap().code, error_codes::INVALID_PARAMS);
    }

    #[tokio::test]
    async fn test_unknown_method() {
        let response = server().handle_request(request("resources/list", None)).await;
        assert_eq!(response.error.unwrap().code, error_codes::METHOD_NOT_FOUND);
    }

    #[tokio::test]
    async fn test_handle_message_parse_error() {
        let response = server().handle_message("{not json").await.unwrap();
        assert_eq!(response.error.unwrap().code, error_codes::PARSE_ERROR);
        assert!(response.id.is_none());
    }

    #[tokio::test]
    async fn test_handle_message_notification_has_no_reply() {
        let reply = server()
            .handle_message(r#"{"jsonrpc":"2.0","method":"notifications/initialized"}"#)
            .await;
        assert!(reply.is_none());
    }

    #[tokio::test]
    async fn test_serve_lines() {
        let input = concat!(
            r#"{"jsonrpc":"2.0","id":1,"method":"ping"}"#,
            "\n\n",
            r#"{"jsonrpc":"2.0","method":"notifications/initialized"}"#,
            "\n",
            r#"{"jsonrpc":"2.0","id":2,"method":"tools/call","params":{"name":"list_tables","options":{"dryRun":true}}}"#,
            "\n"
        );
        let mut output = Vec::new();
        server().serve_lines(input.as_bytes(), &mut output).await.unwrap();

        let output = String::from_utf8(output).unwrap();
        let replies: Vec<Value> = output
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect();
        assert_eq!(replies.len(), 2);
        assert_eq!(replies[0]["id"], 1);
        assert_eq!(replies[1]["id"], 2);
        assert!(replies[1]["result"].get("isError").is_none());
    }
}

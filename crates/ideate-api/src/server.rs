//! Line-delimited JSON-RPC server over any async reader/writer pair.
//!
//! `ideate serve` runs it on stdin/stdout. One request per line, one response
//! per line; notifications get no response.

use anyhow::Context;
use serde_json::Value;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tracing::{debug, error, info, warn};

use crate::protocol::{
    ContentBlock, InitializeResult, JSONRPC_VERSION, JsonRpcError, JsonRpcRequest,
    JsonRpcResponse, PROTOCOL_VERSION, RequestId, ServerCapabilities, ServerInfo,
    ToolsCallParams, ToolsCallResult, ToolsCapability, ToolsListResult, methods,
};
use crate::tools::{ToolError, ToolRegistry};

/// JSON-RPC front end for one domain's tools.
#[derive(Debug)]
pub struct RpcServer {
    tools: ToolRegistry,
    info: ServerInfo,
    initialized: bool,
}

impl RpcServer {
    #[must_use]
    pub fn new(tools: ToolRegistry, info: ServerInfo) -> Self {
        Self {
            tools,
            info,
            initialized: false,
        }
    }

    /// Serve until the reader reaches EOF.
    ///
    /// # Errors
    ///
    /// Returns an error if reading or writing the transport fails.
    pub async fn serve<R, W>(&mut self, reader: R, mut writer: W) -> anyhow::Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        info!(server = %self.info.name, "tool server starting");
        let mut lines = reader.lines();

        while let Some(line) = lines.next_line().await.context("Failed to read request")? {
            if line.trim().is_empty() {
                continue;
            }
            debug!("Received: {}", line);

            let Some(response) = self.handle_line(&line).await else {
                continue;
            };
            let mut out = serde_json::to_string(&response).context("Failed to encode response")?;
            out.push('\n');
            writer
                .write_all(out.as_bytes())
                .await
                .context("Failed to write response")?;
            writer.flush().await.context("Failed to flush response")?;
        }

        info!("tool server shutting down");
        Ok(())
    }

    /// Handle one raw line. `None` means nothing should be written back.
    pub async fn handle_line(&mut self, line: &str) -> Option<JsonRpcResponse> {
        match serde_json::from_str::<JsonRpcRequest>(line) {
            Ok(request) => self.handle_request(request).await,
            Err(e) => Some(JsonRpcResponse::error(
                RequestId::Null,
                JsonRpcError::parse_error(format!("Invalid JSON: {e}")),
            )),
        }
    }

    /// Handle a single parsed request.
    pub async fn handle_request(&mut self, request: JsonRpcRequest) -> Option<JsonRpcResponse> {
        let Some(id) = request.id.clone() else {
            debug!(method = %request.method, "notification");
            if request.method == methods::INITIALIZED {
                self.initialized = true;
            }
            return None;
        };

        if request.jsonrpc != JSONRPC_VERSION {
            return Some(JsonRpcResponse::error(
                id,
                JsonRpcError::invalid_request(format!(
                    "Invalid JSON-RPC version: {}",
                    request.jsonrpc
                )),
            ));
        }

        let response = match request.method.as_str() {
            methods::INITIALIZE => self.handle_initialize(id),
            methods::PING => JsonRpcResponse::success(id, Value::Object(serde_json::Map::new())),
            methods::TOOLS_LIST => self.handle_tools_list(id),
            methods::TOOLS_CALL => self.handle_tools_call(id, request.params).await,
            other => JsonRpcResponse::error(id, JsonRpcError::method_not_found(other)),
        };
        Some(response)
    }

    fn handle_initialize(&mut self, id: RequestId) -> JsonRpcResponse {
        self.initialized = true;
        let result = InitializeResult {
            protocol_version: PROTOCOL_VERSION.to_string(),
            capabilities: ServerCapabilities {
                tools: Some(ToolsCapability {
                    list_changed: false,
                }),
            },
            server_info: self.info.clone(),
            instructions: None,
        };
        encode(id, &result)
    }

    fn handle_tools_list(&self, id: RequestId) -> JsonRpcResponse {
        let result = ToolsListResult {
            tools: self.tools.list_tools(),
        };
        encode(id, &result)
    }

    async fn handle_tools_call(&self, id: RequestId, params: Option<Value>) -> JsonRpcResponse {
        if !self.initialized {
            return JsonRpcResponse::error(id, JsonRpcError::invalid_request("Server not initialized"));
        }

        let params: ToolsCallParams = match params.map(serde_json::from_value) {
            Some(Ok(params)) => params,
            Some(Err(e)) => {
                return JsonRpcResponse::error(
                    id,
                    JsonRpcError::invalid_params(format!("Invalid tool call params: {e}")),
                );
            }
            None => {
                return JsonRpcResponse::error(
                    id,
                    JsonRpcError::invalid_params("Missing tool call params"),
                );
            }
        };

        info!(tool = %params.name, "tool call");
        match self.tools.call_tool(&params.name, params.arguments).await {
            Ok(value) => {
                let text = match serde_json::to_string(&value) {
                    Ok(text) => text,
                    Err(e) => {
                        error!("Failed to serialize tool result: {}", e);
                        return JsonRpcResponse::error(
                            id,
                            JsonRpcError::internal_error("Failed to serialize tool result"),
                        );
                    }
                };
                let result = ToolsCallResult {
                    content: vec![ContentBlock::Text { text }],
                    structured_content: Some(value),
                    is_error: false,
                };
                encode(id, &result)
            }
            Err(ToolError::UnknownTool(name)) => {
                warn!(tool = %name, "unknown tool");
                JsonRpcResponse::error(id, JsonRpcError::invalid_params(format!("Unknown tool: {name}")))
            }
            Err(ToolError::Api(err)) => {
                debug!(code = err.code(), "tool call failed");
                JsonRpcResponse::error(id, JsonRpcError::from(&err))
            }
        }
    }
}

fn encode<T: serde::Serialize>(id: RequestId, result: &T) -> JsonRpcResponse {
    match serde_json::to_value(result) {
        Ok(value) => JsonRpcResponse::success(id, value),
        Err(e) => {
            error!("Failed to serialize response: {}", e);
            JsonRpcResponse::error(id, JsonRpcError::internal_error("Failed to serialize response"))
        }
    }
}

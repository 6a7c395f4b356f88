#![forbid(unsafe_code)]

use crate::protocol::{JsonRpcRequest, json_rpc_error, json_rpc_response, tool_text_content};
use crate::tools::{self, ToolError};
use cg_storage::SqliteStore;
use serde_json::{Value, json};

const PROTOCOL_VERSION: &str = "2024-11-05";
const SERVER_NAME: &str = "contextguard-query";
const SERVER_VERSION: &str = env!("CARGO_PKG_VERSION");

pub(crate) struct QueryServer {
    initialized: bool,
    store: SqliteStore,
}

impl QueryServer {
    pub(crate) fn new(store: SqliteStore) -> Self {
        Self {
            initialized: false,
            store,
        }
    }

    pub(crate) fn handle(&mut self, request: JsonRpcRequest) -> Option<Value> {
        let method = request.method.as_str();

        if method == "initialize" {
            return Some(json_rpc_response(
                request.id,
                json!({
                    "protocolVersion": PROTOCOL_VERSION,
                    "serverInfo": { "name": SERVER_NAME, "version": SERVER_VERSION },
                    "capabilities": { "tools": {} },
                }),
            ));
        }

        if !self.initialized && method != "notifications/initialized" {
            return Some(json_rpc_error(request.id, -32002, "Server not initialized"));
        }

        if method == "notifications/initialized" {
            self.initialized = true;
            return None;
        }

        if method == "ping" {
            return Some(json_rpc_response(request.id, json!({})));
        }

        if method == "tools/list" {
            return Some(json_rpc_response(
                request.id,
                json!({ "tools": tools::tool_definitions() }),
            ));
        }

        if method == "tools/call" {
            let Some(params) = request.params.as_ref().and_then(Value::as_object) else {
                return Some(json_rpc_error(request.id, -32602, "params must be an object"));
            };
            let name = params.get("name").and_then(Value::as_str).unwrap_or("");
            let arguments = params.get("arguments").cloned().unwrap_or_else(|| json!({}));

            return Some(self.call_tool(request.id, name, &arguments));
        }

        Some(json_rpc_error(
            request.id,
            -32601,
            &format!("Method not found: {method}"),
        ))
    }

    fn call_tool(&mut self, id: Option<Value>, name: &str, arguments: &Value) -> Value {
        match tools::dispatch_tool(&self.store, name, arguments) {
            Ok(result) => json_rpc_response(
                id,
                json!({ "content": [tool_text_content(&result)], "isError": false }),
            ),
            Err(ToolError::InvalidParams(message)) => json_rpc_error(id, -32602, message),
            Err(ToolError::UnknownTool(name)) => {
                let payload = json!({ "error": format!("Unknown tool: {name}") });
                json_rpc_response(
                    id,
                    json!({ "content": [tool_text_content(&payload)], "isError": true }),
                )
            }
            Err(ToolError::Internal(_)) => {
                let payload = json!({ "error": "internal error" });
                json_rpc_response(
                    id,
                    json!({ "content": [tool_text_content(&payload)], "isError": true }),
                )
            }
        }
    }
}

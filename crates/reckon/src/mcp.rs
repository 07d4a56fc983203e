#![forbid(unsafe_code)]

//! JSON-RPC 2.0 tool server over newline-delimited stdio (MCP framing).

use std::collections::HashMap;
use std::io::{self, BufRead, Write};

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::calculator::{Calculator, SharedCalculator};
use crate::tools::{ToolRegistry, create_default_registry};

const PROTOCOL_VERSION: &str = "2024-11-05";

pub const PARSE_ERROR: i64 = -32700;
pub const INVALID_REQUEST: i64 = -32600;
pub const METHOD_NOT_FOUND: i64 = -32601;
pub const INVALID_PARAMS: i64 = -32602;
pub const INTERNAL_ERROR: i64 = -32603;

pub struct McpServer {
    tool_registry: ToolRegistry,
}

#[derive(Debug, Serialize)]
struct ServerInfo {
    name: &'static str,
    version: &'static str,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct InitializeParams {
    client_info: Option<ClientInfo>,
}

#[derive(Debug, Deserialize)]
struct ClientInfo {
    name: String,
}

#[derive(Debug, Deserialize)]
struct ToolCallParams {
    name: String,
    #[serde(default)]
    arguments: HashMap<String, Value>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ToolResult {
    content: Vec<ToolContent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    is_error: Option<bool>,
}

#[derive(Debug, Serialize)]
struct ToolContent {
    r#type: &'static str,
    text: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
enum JsonRpcId {
    String(String),
    Number(i64),
}

/// Ids must be a string or an integer. `None` means the id is unusable.
fn json_rpc_id_from_value(value: &Value) -> Option<JsonRpcId> {
    match value {
        Value::String(s) => Some(JsonRpcId::String(s.clone())),
        Value::Number(n) => n.as_i64().map(JsonRpcId::Number),
        _ => None,
    }
}

impl Default for McpServer {
    fn default() -> Self {
        Self::new(Calculator::shared())
    }
}

impl McpServer {
    /// Server whose tools all operate on `calculator`.
    pub fn new(calculator: SharedCalculator) -> Self {
        Self {
            tool_registry: create_default_registry(&calculator),
        }
    }

    /// Serve stdin/stdout until stdin closes.
    pub fn start(&mut self) -> io::Result<()> {
        let stdin = io::stdin();
        let stdout = io::stdout();
        self.serve(stdin.lock(), stdout.lock())
    }

    /// Serve one request per line until `input` reaches end of stream.
    pub fn serve<R: BufRead, W: Write>(&mut self, mut input: R, mut output: W) -> io::Result<()> {
        tracing::info!("tool server started");
        let mut buf = Vec::new();

        loop {
            buf.clear();
            let bytes = input.read_until(b'\n', &mut buf)?;
            if bytes == 0 {
                break;
            }

            let Ok(line) = std::str::from_utf8(&buf) else {
                tracing::warn!(bytes, "request is not valid UTF-8");
                send_error(&mut output, None, PARSE_ERROR, "Parse error: invalid UTF-8")?;
                continue;
            };

            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }

            match serde_json::from_str::<Value>(trimmed) {
                Ok(message) => self.handle_message(&message, &mut output)?,
                Err(err) => {
                    tracing::warn!(error = %err, "unparsable request");
                    send_error(&mut output, None, PARSE_ERROR, "Parse error: invalid JSON")?;
                }
            }
        }

        tracing::info!("tool server stopped");
        Ok(())
    }

    fn handle_message<W: Write>(&self, message: &Value, out: &mut W) -> io::Result<()> {
        let method = message.get("method").and_then(|m| m.as_str()).unwrap_or("");
        tracing::debug!(method, "request received");

        // Requests without an id are notifications and get no reply.
        let Some(raw_id) = message.get("id") else {
            return Ok(());
        };
        let Some(id) = json_rpc_id_from_value(raw_id) else {
            tracing::warn!(id = %raw_id, "request id is not a string or integer");
            return send_error(
                out,
                None,
                INVALID_REQUEST,
                "Invalid request: id must be a string or integer",
            );
        };

        match method {
            "initialize" => self.handle_initialize(out, id, message.get("params")),
            "tools/list" => {
                let tools = self.tool_registry.get_tool_metadata();
                send_result(out, id, serde_json::json!({ "tools": tools }))
            }
            "tools/call" => self.handle_tools_call(out, id, message.get("params")),
            "ping" => send_result(out, id, serde_json::json!({})),
            _ => send_error(
                out,
                Some(id),
                METHOD_NOT_FOUND,
                &format!("Method not found: {method}"),
            ),
        }
    }

    fn handle_initialize<W: Write>(
        &self,
        out: &mut W,
        id: JsonRpcId,
        params: Option<&Value>,
    ) -> io::Result<()> {
        let parsed = params
            .and_then(|p| serde_json::from_value::<InitializeParams>(p.clone()).ok())
            .unwrap_or_default();
        if let Some(client) = parsed.client_info {
            tracing::info!(client = %client.name, "client connected");
        }

        let response = serde_json::json!({
            "protocolVersion": PROTOCOL_VERSION,
            "capabilities": { "tools": {} },
            "serverInfo": ServerInfo {
                name: "reckon",
                version: env!("CARGO_PKG_VERSION"),
            }
        });

        send_result(out, id, response)
    }

    fn handle_tools_call<W: Write>(
        &self,
        out: &mut W,
        id: JsonRpcId,
        params: Option<&Value>,
    ) -> io::Result<()> {
        let Some(params) = params else {
            return send_error(out, Some(id), INVALID_PARAMS, "Missing tool params");
        };

        let Ok(parsed) = serde_json::from_value::<ToolCallParams>(params.clone()) else {
            return send_error(out, Some(id), INVALID_PARAMS, "Invalid tool params");
        };

        let args_json = serde_json::to_value(&parsed.arguments)
            .unwrap_or_else(|_| Value::Object(serde_json::Map::new()));

        let tool_result = match self.tool_registry.execute(&parsed.name, args_json) {
            Ok(result) => ToolResult {
                content: vec![ToolContent {
                    r#type: "text",
                    text: result.to_string(),
                }],
                is_error: None,
            },
            Err(err) if err.code == "not_found" => {
                return send_error(out, Some(id), INVALID_PARAMS, &err.message);
            }
            Err(err) => {
                tracing::debug!(tool = %parsed.name, code = %err.code, "tool call failed");
                ToolResult {
                    content: vec![ToolContent {
                        r#type: "text",
                        text: format!("Error: {}", err.message),
                    }],
                    is_error: Some(true),
                }
            }
        };

        match serde_json::to_value(tool_result) {
            Ok(value) => send_result(out, id, value),
            Err(err) => send_error(
                out,
                Some(id),
                INTERNAL_ERROR,
                &format!("Internal error: {err}"),
            ),
        }
    }
}

fn send_result<W: Write>(out: &mut W, id: JsonRpcId, result: Value) -> io::Result<()> {
    let response = serde_json::json!({
        "jsonrpc": "2.0",
        "id": id,
        "result": result,
    });
    send_response(out, &response)
}

fn send_error<W: Write>(
    out: &mut W,
    id: Option<JsonRpcId>,
    code: i64,
    message: &str,
) -> io::Result<()> {
    let response = serde_json::json!({
        "jsonrpc": "2.0",
        "id": id,
        "error": { "code": code, "message": message },
    });
    send_response(out, &response)
}

fn send_response<W: Write>(out: &mut W, response: &Value) -> io::Result<()> {
    writeln!(out, "{response}")?;
    out.flush()
}

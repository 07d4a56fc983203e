#![forbid(unsafe_code)]

//! Tool abstraction layer for the Reckon JSON-RPC server.
//!
//! Tools wrap calls into the shared calculator session so they can be tested
//! without the protocol layer.

use std::collections::BTreeMap;

use serde_json::Value;

use crate::calculator::SharedCalculator;
use crate::error::CalcError;

pub mod calculator_tools;

/// Result type for tool execution
pub type ToolResult = Result<Value, ToolError>;

/// Error type for tool execution failures
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolError {
    pub code: String,
    pub message: String,
}

impl ToolError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }

    pub fn invalid_params(message: impl Into<String>) -> Self {
        Self::new("invalid_params", message)
    }

    pub fn internal_error(message: impl Into<String>) -> Self {
        Self::new("internal_error", message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new("not_found", message)
    }
}

impl From<CalcError> for ToolError {
    fn from(err: CalcError) -> Self {
        Self::new(err.kind(), err.message())
    }
}

impl std::fmt::Display for ToolError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.code, self.message)
    }
}

impl std::error::Error for ToolError {}

/// A callable exposed through `tools/list` and `tools/call`.
pub trait Tool: Send + Sync {
    /// Tool name (used in the protocol)
    fn name(&self) -> &'static str;

    /// Human-readable description
    fn description(&self) -> &'static str;

    /// JSON schema for input parameters
    fn input_schema(&self) -> Value;

    /// Execute the tool with given parameters
    fn execute(&self, params: Value) -> ToolResult;
}

/// Registry for managing available tools. Listing order is by name.
#[derive(Default)]
pub struct ToolRegistry {
    tools: BTreeMap<String, Box<dyn Tool>>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, tool: Box<dyn Tool>) {
        let name = tool.name().to_string();
        self.tools.insert(name, tool);
    }

    pub fn get(&self, name: &str) -> Option<&dyn Tool> {
        self.tools.get(name).map(|t| t.as_ref())
    }

    /// Tool metadata for `tools/list`
    pub fn get_tool_metadata(&self) -> Vec<Value> {
        self.tools
            .values()
            .map(|tool| {
                serde_json::json!({
                    "name": tool.name(),
                    "description": tool.description(),
                    "inputSchema": tool.input_schema(),
                })
            })
            .collect()
    }

    pub fn execute(&self, name: &str, params: Value) -> ToolResult {
        match self.get(name) {
            Some(tool) => tool.execute(params),
            None => Err(ToolError::not_found(format!("Tool not found: {name}"))),
        }
    }
}

/// Registry with every calculator tool bound to one session.
pub fn create_default_registry(calculator: &SharedCalculator) -> ToolRegistry {
    let mut registry = ToolRegistry::new();
    registry.register(Box::new(calculator_tools::CalculateTool::new(
        calculator.clone(),
    )));
    registry.register(Box::new(calculator_tools::HistoryTool::new(
        calculator.clone(),
    )));
    registry.register(Box::new(calculator_tools::ClearHistoryTool::new(
        calculator.clone(),
    )));
    registry
}

#![forbid(unsafe_code)]

//! Calculator tools for the JSON-RPC server.

use std::sync::MutexGuard;

use serde_json::{Value, json};

use crate::calculator::{Calculator, SharedCalculator};
use crate::tools::{Tool, ToolError, ToolResult};

fn lock(calculator: &SharedCalculator) -> Result<MutexGuard<'_, Calculator>, ToolError> {
    calculator
        .lock()
        .map_err(|_| ToolError::internal_error("Calculator session lock poisoned"))
}

fn number_param(params: &Value, name: &str) -> Result<f64, ToolError> {
    params[name]
        .as_f64()
        .filter(|v| v.is_finite())
        .ok_or_else(|| ToolError::invalid_params(format!("Missing or invalid '{name}' parameter")))
}

/// Compute and record one calculation.
pub struct CalculateTool {
    calculator: SharedCalculator,
}

impl CalculateTool {
    pub const fn new(calculator: SharedCalculator) -> Self {
        Self { calculator }
    }
}

impl Tool for CalculateTool {
    fn name(&self) -> &'static str {
        "reckon_calculate"
    }

    fn description(&self) -> &'static str {
        "Apply +, -, * or / to two numbers and record the calculation in the session history."
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "operand1": { "type": "number", "description": "Left-hand operand." },
                "operand2": { "type": "number", "description": "Right-hand operand." },
                "operator": {
                    "type": "string",
                    "description": "One of '+', '-', '*', '/'."
                }
            },
            "required": ["operand1", "operand2", "operator"]
        })
    }

    fn execute(&self, params: Value) -> ToolResult {
        let operand1 = number_param(&params, "operand1")?;
        let operand2 = number_param(&params, "operand2")?;
        let operator = params["operator"]
            .as_str()
            .ok_or_else(|| ToolError::invalid_params("Missing or invalid 'operator' parameter"))?;

        let calculation = lock(&self.calculator)?.calculate(operand1, operand2, operator)?;

        serde_json::to_value(&calculation)
            .map_err(|e| ToolError::internal_error(format!("Failed to encode calculation: {e}")))
    }
}

/// Read the session history.
pub struct HistoryTool {
    calculator: SharedCalculator,
}

impl HistoryTool {
    pub const fn new(calculator: SharedCalculator) -> Self {
        Self { calculator }
    }
}

impl Tool for HistoryTool {
    fn name(&self) -> &'static str {
        "reckon_history"
    }

    fn description(&self) -> &'static str {
        "List the calculations recorded in this session, oldest first, with the time each was recorded."
    }

    fn input_schema(&self) -> Value {
        json!({ "type": "object", "properties": {} })
    }

    fn execute(&self, _params: Value) -> ToolResult {
        let calculator = lock(&self.calculator)?;
        let history = calculator.history();
        Ok(json!({
            "count": history.len(),
            "entries": history,
        }))
    }
}

/// Empty the session history.
pub struct ClearHistoryTool {
    calculator: SharedCalculator,
}

impl ClearHistoryTool {
    pub const fn new(calculator: SharedCalculator) -> Self {
        Self { calculator }
    }
}

impl Tool for ClearHistoryTool {
    fn name(&self) -> &'static str {
        "reckon_clear_history"
    }

    fn description(&self) -> &'static str {
        "Remove every calculation from the session history."
    }

    fn input_schema(&self) -> Value {
        json!({ "type": "object", "properties": {} })
    }

    fn execute(&self, _params: Value) -> ToolResult {
        let cleared = lock(&self.calculator)?.clear_history();
        Ok(json!({ "cleared": cleared }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_calculate_tool_records_in_session() {
        let session = Calculator::shared();
        let tool = CalculateTool::new(session.clone());

        let value = tool
            .execute(json!({ "operand1": 10, "operand2": 5, "operator": "+" }))
            .unwrap();
        assert_eq!(value["result"], json!(15.0));
        assert_eq!(value["formatted_result"], json!("10 + 5 = 15"));
        assert_eq!(session.lock().unwrap().history().len(), 1);
    }

    #[test]
    fn test_calculate_tool_reports_calc_errors() {
        let session = Calculator::shared();
        let tool = CalculateTool::new(session.clone());

        let err = tool
            .execute(json!({ "operand1": 10, "operand2": 0, "operator": "/" }))
            .unwrap_err();
        assert_eq!(err.code, "division_by_zero");
        assert!(session.lock().unwrap().history().is_empty());
    }

    #[test]
    fn test_calculate_tool_validates_params() {
        let tool = CalculateTool::new(Calculator::shared());
        let err = tool
            .execute(json!({ "operand1": "ten", "operand2": 1, "operator": "+" }))
            .unwrap_err();
        assert_eq!(err.code, "invalid_params");

        let err = tool
            .execute(json!({ "operand1": 1, "operand2": 1 }))
            .unwrap_err();
        assert_eq!(err.message, "Missing or invalid 'operator' parameter");
    }

    #[test]
    fn test_history_and_clear_tools_share_session() {
        let session = Calculator::shared();
        session.lock().unwrap().calculate(1.0, 2.0, "+").unwrap();
        session.lock().unwrap().calculate(3.0, 4.0, "*").unwrap();

        let history = HistoryTool::new(session.clone()).execute(json!({})).unwrap();
        assert_eq!(history["count"], json!(2));
        assert_eq!(history["entries"][1]["formatted_result"], json!("3 * 4 = 12"));
        let recorded_at = history["entries"][0]["recorded_at"].as_str().unwrap();
        assert!(chrono::DateTime::parse_from_rfc3339(recorded_at).is_ok());

        let cleared = ClearHistoryTool::new(session.clone())
            .execute(json!({}))
            .unwrap();
        assert_eq!(cleared, json!({ "cleared": 2 }));
        assert!(session.lock().unwrap().history().is_empty());
    }
}

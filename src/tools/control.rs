//! Control tools — `complete_work` and `abort_work`.
//!
//! These are ordinary tools from the registry's point of view; their only
//! special role is that the task runner inspects the shared result slot
//! they write to, after `execute_tool_calls` returns.

use async_trait::async_trait;
use serde_json::Value;

use super::traits::Tool;
use crate::content::ToolResultData;
use crate::error::{Error, Result};
use crate::runner::{SharedResult, TaskStatus};

/// Signals that the agent has successfully completed the task.
pub struct CompleteWorkTool {
    result: SharedResult,
    /// JSON schema for `output`, if the run was started with one. Only
    /// used to render the tool's parameter schema for the model adapter —
    /// the core does not itself validate `output` against it.
    output_schema: Option<Value>,
}

impl CompleteWorkTool {
    pub fn new(result: SharedResult, output_schema: Option<Value>) -> Self {
        CompleteWorkTool {
            result,
            output_schema,
        }
    }
}

#[async_trait]
impl Tool for CompleteWorkTool {
    fn name(&self) -> &str {
        "complete_work"
    }

    fn description(&self) -> &str {
        "Signal that you have successfully completed the task. Optionally provide structured output data."
    }

    fn parameters_schema(&self) -> Value {
        let mut properties = serde_json::json!({
            "feedback": {
                "type": "string",
                "description": "Brief 1-2 sentence summary of what you accomplished"
            }
        });
        if let Some(schema) = &self.output_schema {
            properties["output"] = schema.clone();
        }
        serde_json::json!({
            "type": "object",
            "properties": properties,
            "required": ["feedback"],
        })
    }

    async fn execute(&self, args: Value) -> Result<ToolResultData> {
        let feedback = args
            .get("feedback")
            .and_then(Value::as_str)
            .ok_or_else(|| Error::InvalidParams {
                name: self.name().to_string(),
                message: "missing 'feedback'".into(),
            })?
            .to_string();
        let output = args.get("output").cloned().filter(|v| !v.is_null());

        {
            let mut slot = self.result.lock().await;
            slot.status = Some(TaskStatus::Completed);
            slot.feedback = Some(feedback.clone());
            if output.is_some() {
                slot.output = output.clone();
            }
        }

        let mut description = format!("Completed: {}", feedback);
        if let Some(ref output) = output {
            let pretty = serde_json::to_string_pretty(output).unwrap_or_default();
            description.push_str(&format!("\nOutput data:\n{}", pretty));
        }

        Ok(ToolResultData::success_terminal(self.name(), description))
    }
}

/// Signals that the agent cannot proceed further with the task.
pub struct AbortWorkTool {
    result: SharedResult,
}

impl AbortWorkTool {
    pub fn new(result: SharedResult) -> Self {
        AbortWorkTool { result }
    }
}

#[async_trait]
impl Tool for AbortWorkTool {
    fn name(&self) -> &str {
        "abort_work"
    }

    fn description(&self) -> &str {
        "Signal that you cannot proceed (stuck, blocked, error, or impossible)"
    }

    fn parameters_schema(&self) -> Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "reason": {
                    "type": "string",
                    "description": "Explain why you cannot continue and what went wrong"
                }
            },
            "required": ["reason"],
        })
    }

    async fn execute(&self, args: Value) -> Result<ToolResultData> {
        let reason = args
            .get("reason")
            .and_then(Value::as_str)
            .ok_or_else(|| Error::InvalidParams {
                name: self.name().to_string(),
                message: "missing 'reason'".into(),
            })?
            .to_string();

        {
            let mut slot = self.result.lock().await;
            slot.status = Some(TaskStatus::Aborted);
            slot.feedback = Some(reason.clone());
        }

        Ok(ToolResultData::success_terminal(
            self.name(),
            format!("Aborted: {}", reason),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runner::TaskResultSlot;
    use std::sync::Arc;
    use tokio::sync::Mutex;

    fn new_slot() -> SharedResult {
        Arc::new(Mutex::new(TaskResultSlot::default()))
    }

    #[tokio::test]
    async fn complete_work_sets_status_and_feedback() {
        let slot = new_slot();
        let tool = CompleteWorkTool::new(slot.clone(), None);
        let result = tool
            .execute(serde_json::json!({"feedback": "done deal"}))
            .await
            .unwrap();
        assert!(result.terminal);
        assert_eq!(result.description, "Completed: done deal");
        let guard = slot.lock().await;
        assert_eq!(guard.status, Some(TaskStatus::Completed));
        assert_eq!(guard.feedback.as_deref(), Some("done deal"));
    }

    #[tokio::test]
    async fn complete_work_renders_output_json() {
        let slot = new_slot();
        let tool = CompleteWorkTool::new(slot.clone(), Some(serde_json::json!({"type": "object"})));
        let result = tool
            .execute(serde_json::json!({"feedback": "ok", "output": {"value": 42}}))
            .await
            .unwrap();
        assert!(result.description.contains("Output data:"));
        assert!(result.description.contains("42"));
        let guard = slot.lock().await;
        assert_eq!(guard.output, Some(serde_json::json!({"value": 42})));
    }

    #[tokio::test]
    async fn abort_work_sets_status_and_reason() {
        let slot = new_slot();
        let tool = AbortWorkTool::new(slot.clone());
        let result = tool
            .execute(serde_json::json!({"reason": "blocked"}))
            .await
            .unwrap();
        assert!(result.terminal);
        assert_eq!(result.description, "Aborted: blocked");
        let guard = slot.lock().await;
        assert_eq!(guard.status, Some(TaskStatus::Aborted));
    }

    #[tokio::test]
    async fn missing_feedback_is_invalid_params() {
        let slot = new_slot();
        let tool = CompleteWorkTool::new(slot, None);
        let err = tool.execute(serde_json::json!({})).await.unwrap_err();
        assert!(matches!(err, Error::InvalidParams { .. }));
    }
}

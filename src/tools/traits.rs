//! The `Tool` trait every agent-callable capability implements.

use async_trait::async_trait;
use serde_json::Value;

use crate::content::{ToolResultData, ToolResultStatus};
use crate::error::Result;

/// A named, schema-validated, asynchronous capability the model may invoke.
///
/// `execute` receives arguments that have already been validated against
/// `parameters_schema()` by the registry; a tool that
/// wants stronger typing than raw JSON should parse its own `args` with
/// `serde_json::from_value` inside `execute` and map failures to
/// `Error::InvalidParams`.
#[async_trait]
pub trait Tool: Send + Sync {
    /// Unique tool identifier.
    fn name(&self) -> &str;

    /// Human-readable description shown to the model.
    fn description(&self) -> &str;

    /// JSON Schema for this tool's parameters, per-field described.
    fn parameters_schema(&self) -> Value;

    /// Execute the tool with validated parameters.
    ///
    /// A `Result::Err` here is caught by the registry and converted into
    /// an error `ToolResultData`; it is not expected
    /// to carry partial results.
    async fn execute(&self, args: Value) -> Result<ToolResultData>;
}

impl ToolResultData {
    /// A successful, non-terminal result.
    pub fn success(name: impl Into<String>, description: impl Into<String>) -> Self {
        ToolResultData {
            tool_call_id: None,
            name: name.into(),
            status: ToolResultStatus::Success,
            error: None,
            description: description.into(),
            terminal: false,
        }
    }

    /// A successful result that halts the current tool batch. Only the
    /// control tools (`complete_work`/`abort_work`) use this to also end
    /// the run; an ordinary tool halting the batch does not end the loop.
    pub fn success_terminal(name: impl Into<String>, description: impl Into<String>) -> Self {
        ToolResultData {
            terminal: true,
            ..ToolResultData::success(name, description)
        }
    }

    /// An error result; always halts the current tool batch.
    pub fn error(
        name: impl Into<String>,
        error: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        ToolResultData {
            tool_call_id: None,
            name: name.into(),
            status: ToolResultStatus::Error,
            error: Some(error.into()),
            description: description.into(),
            terminal: false,
        }
    }

    /// A result synthesized for a call that was never reached because an
    /// earlier call in the same batch stopped execution.
    pub fn skipped(name: impl Into<String>) -> Self {
        let name = name.into();
        let description = format!("{} (SKIPPED)", name);
        ToolResultData {
            tool_call_id: None,
            name,
            status: ToolResultStatus::Skipped,
            error: None,
            description,
            terminal: false,
        }
    }
}

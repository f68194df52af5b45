//! Model adapter contract.
//!
//! The adapter converts the internal conversation into a provider-specific
//! request and parses the reply back into a `Message`. No implementation
//! ships in this crate — it is an external collaborator with the contract
//! specified here.

use async_trait::async_trait;
use serde_json::Value;

use crate::content::Message;
use crate::error::Result;
use crate::tools::Tool;

/// A tool's declaration rendered for the model adapter: name, description,
/// and a JSON Schema for its parameters.
#[derive(Debug, Clone)]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    pub parameters: Value,
}

impl ToolDefinition {
    pub fn from_tool(tool: &dyn Tool) -> Self {
        ToolDefinition {
            name: tool.name().to_string(),
            description: tool.description().to_string(),
            parameters: tool.parameters_schema(),
        }
    }
}

/// The single operation the task runner consumes from the model layer.
///
/// Implementations are responsible for: preserving message order, role
/// tagging, and the association between a `ToolResult` and its
/// originating `ToolCall`; rendering each tool's schema into a
/// provider-compatible form (resolving `$ref`s, dropping unsupported
/// keywords); disabling provider-side automatic tool execution; and
/// surfacing provider/network failures as an error rather than a
/// synthetic `ToolResult`.
#[async_trait]
pub trait ModelAdapter: Send + Sync {
    async fn call_tools(&self, messages: &[Message], tools: &[ToolDefinition]) -> Result<Message>;
}

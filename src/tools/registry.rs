//! Tool registry — lookup and ordered batch dispatch of tool calls.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::{info, warn};

use super::traits::Tool;
use crate::content::ToolCallData;
use crate::content::ToolResultData;

/// Registry of available tools, keyed by name with insertion-time
/// replacement on duplicate names.
#[derive(Clone, Default)]
pub struct ToolRegistry {
    tools: HashMap<String, Arc<dyn Tool>>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        ToolRegistry {
            tools: HashMap::new(),
        }
    }

    /// Register a tool, replacing any existing tool with the same name.
    pub fn register(&mut self, tool: Arc<dyn Tool>) {
        self.tools.insert(tool.name().to_string(), tool);
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn Tool>> {
        self.tools.get(name).cloned()
    }

    pub fn get_all(&self) -> Vec<Arc<dyn Tool>> {
        self.tools.values().cloned().collect()
    }

    pub fn clear(&mut self) {
        self.tools.clear();
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Execute a batch of tool calls in order, stopping early on the first
    /// error or terminal result. Every remaining call in the batch after a
    /// stop yields a `skipped` result. The returned sequence always has
    /// the same length and order as `calls`.
    pub async fn execute_tool_calls(&self, calls: &[ToolCallData]) -> Vec<ToolResultData> {
        let mut results = Vec::with_capacity(calls.len());
        let mut stopped_at = calls.len();

        for (idx, call) in calls.iter().enumerate() {
            let tool = match self.get(&call.name) {
                Some(tool) => tool,
                None => {
                    let message = format!("Tool '{}' not found in registry", call.name);
                    warn!("{}", message);
                    results.push(with_call_id(
                        ToolResultData::error(
                            &call.name,
                            &message,
                            format!("{} (ERROR: Tool not found)", call.name),
                        ),
                        call,
                    ));
                    stopped_at = idx + 1;
                    break;
                }
            };

            let args = serde_json::Value::Object(call.arguments.clone());
            let result = match tool.execute(args).await {
                Ok(result) => result,
                Err(e) => {
                    let message = e.to_string();
                    warn!("Tool '{}' failed: {}", call.name, message);
                    ToolResultData::error(
                        &call.name,
                        &message,
                        format!("{} (ERROR: {})", call.name, message),
                    )
                }
            };
            let result = with_call_id(result, call);

            info!("Tool executed: {}", result.description);
            let should_stop = result.terminal || result.status == crate::content::ToolResultStatus::Error;
            results.push(result);
            stopped_at = idx + 1;
            if should_stop {
                break;
            }
        }

        for call in &calls[stopped_at..] {
            info!("Tool skipped: {}", call.name);
            results.push(with_call_id(ToolResultData::skipped(&call.name), call));
        }

        results
    }
}

fn with_call_id(mut result: ToolResultData, call: &ToolCallData) -> ToolResultData {
    result.tool_call_id = call.id.clone();
    result
}

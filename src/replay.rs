//! Replay engine — deterministic re-execution of a recorded run's tool
//! calls, without invoking the model.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::info;

use crate::content::{Role, ToolCallData, ToolResultStatus};
use crate::error::{Error, Result};
use crate::runner::Run;
use crate::tools::Tool;

/// Replays a prior `Run`'s tool-call sequence against a (possibly
/// different) set of tools. Strict: no retries, no model fallback, no
/// `observe()` re-use in the decision.
pub struct ReplayEngine {
    tools: HashMap<String, Arc<dyn Tool>>,
}

impl ReplayEngine {
    pub fn new(tools: Vec<Arc<dyn Tool>>) -> Self {
        ReplayEngine {
            tools: tools.into_iter().map(|t| (t.name().to_string(), t)).collect(),
        }
    }

    /// Extract the ordered tool-call sequence from a run's messages by
    /// concatenating `ToolCall` content from every model message, in order.
    pub fn extract_tool_calls(run: &Run) -> Vec<ToolCallData> {
        run.messages
            .iter()
            .filter(|m| m.role == Role::Model)
            .flat_map(|m| m.tool_calls().into_iter().cloned())
            .collect()
    }

    /// Re-execute `run`'s recorded tool calls in order. Stops and returns
    /// an error on the first missing tool, invalid parameters, or tool
    /// result with `status = error`.
    pub async fn replay(&self, run: &Run) -> Result<()> {
        let calls = Self::extract_tool_calls(run);
        for call in &calls {
            self.execute_one(call).await?;
        }
        Ok(())
    }

    async fn execute_one(&self, call: &ToolCallData) -> Result<()> {
        let tool = self
            .tools
            .get(&call.name)
            .ok_or_else(|| Error::Replay(format!("Tool '{}' not found in tool registry", call.name)))?;

        let args = serde_json::Value::Object(call.arguments.clone());
        let result = tool
            .execute(args)
            .await
            .map_err(|e| Error::Replay(format!("Tool '{}' failed: {}", call.name, e)))?;

        info!("Replayed tool: {}", result.description);

        if result.status == ToolResultStatus::Error {
            return Err(Error::Replay(format!(
                "Tool '{}' failed: {}",
                call.name,
                result.error.unwrap_or_default()
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::{Content, Message, ToolResultData};
    use crate::error::Result as TaResult;
    use crate::runner::TaskStatus;
    use async_trait::async_trait;
    use serde_json::Value;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingAdd {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl Tool for CountingAdd {
        fn name(&self) -> &str {
            "add"
        }
        fn description(&self) -> &str {
            "add"
        }
        fn parameters_schema(&self) -> Value {
            serde_json::json!({"type": "object"})
        }
        async fn execute(&self, args: Value) -> TaResult<ToolResultData> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let a = args.get("a").and_then(Value::as_i64).unwrap_or(0);
            let b = args.get("b").and_then(Value::as_i64).unwrap_or(0);
            Ok(ToolResultData::success("add", format!("{}", a + b)))
        }
    }

    fn add_call(id: &str, a: i64, b: i64) -> Content {
        let mut args = serde_json::Map::new();
        args.insert("a".into(), serde_json::json!(a));
        args.insert("b".into(), serde_json::json!(b));
        Content::tool_call(Some(id.into()), "add", args)
    }

    fn run_with_two_add_calls() -> Run {
        Run {
            task_description: "sum things".into(),
            status: TaskStatus::Completed,
            output: None,
            feedback: Some("done".into()),
            action_log: String::new(),
            messages: vec![
                Message::model(vec![add_call("1", 1, 2)]),
                Message::user(vec![]),
                Message::model(vec![add_call("2", 3, 4)]),
                Message::user(vec![]),
            ],
            steps_used: 2,
            max_steps: 10,
        }
    }

    #[tokio::test]
    async fn replay_executes_calls_in_order() {
        let add = Arc::new(CountingAdd {
            calls: AtomicUsize::new(0),
        });
        let engine = ReplayEngine::new(vec![add.clone()]);
        engine.replay(&run_with_two_add_calls()).await.unwrap();
        assert_eq!(add.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn replay_fails_loudly_when_tool_missing() {
        let engine = ReplayEngine::new(vec![]);
        let err = engine.replay(&run_with_two_add_calls()).await.unwrap_err();
        match err {
            Error::Replay(msg) => assert_eq!(msg, "Tool 'add' not found in tool registry"),
            other => panic!("expected Replay error, got {other:?}"),
        }
    }

    struct AlwaysErrors;
    #[async_trait]
    impl Tool for AlwaysErrors {
        fn name(&self) -> &str {
            "add"
        }
        fn description(&self) -> &str {
            "add"
        }
        fn parameters_schema(&self) -> Value {
            serde_json::json!({"type": "object"})
        }
        async fn execute(&self, _args: Value) -> TaResult<ToolResultData> {
            Ok(ToolResultData::error("add", "disk full", "add (ERROR: disk full)"))
        }
    }

    #[tokio::test]
    async fn replay_stops_on_first_error_result() {
        let engine = ReplayEngine::new(vec![Arc::new(AlwaysErrors)]);
        let err = engine.replay(&run_with_two_add_calls()).await.unwrap_err();
        match err {
            Error::Replay(msg) => assert_eq!(msg, "Tool 'add' failed: disk full"),
            other => panic!("expected Replay error, got {other:?}"),
        }
    }
}

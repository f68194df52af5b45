//! Agent façade — stateful retention of prior runs, `do`/`redo`/`reset`.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::info;

use crate::error::{Error, Result};
use crate::model::ModelAdapter;
use crate::prompts::DEFAULT_SYSTEM_PROMPT;
use crate::replay::ReplayEngine;
use crate::runner::{MemoryConfig, Observer, Run, TaskRunner, TaskStatus};
use crate::tools::Tool;

/// Returned by `Agent::check` — the outcome of verifying a condition.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Verdict {
    pub passed: bool,
    pub reason: String,
}

impl Verdict {
    /// Allows `if verdict { ... }`-style use at call sites, mirroring the
    /// original's `Verdict.__bool__`.
    pub fn is_true(&self) -> bool {
        self.passed
    }
}

/// A stateful agent that performs tasks using tools and a model adapter,
/// retaining prior runs across calls for context.
pub struct Agent {
    model: Arc<dyn ModelAdapter>,
    tools: Vec<Arc<dyn Tool>>,
    observer: Arc<dyn Observer>,
    system_prompt: String,
    memory: MemoryConfig,
    stateful: bool,
    previous_runs: Vec<Run>,
}

impl Agent {
    pub fn new(model: Arc<dyn ModelAdapter>, tools: Vec<Arc<dyn Tool>>, observer: Arc<dyn Observer>) -> Self {
        Agent {
            model,
            tools,
            observer,
            system_prompt: DEFAULT_SYSTEM_PROMPT.to_string(),
            memory: MemoryConfig::default(),
            stateful: true,
            previous_runs: Vec::new(),
        }
    }

    pub fn with_system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.system_prompt = prompt.into();
        self
    }

    pub fn with_memory(mut self, memory: MemoryConfig) -> Self {
        self.memory = memory;
        self
    }

    pub fn with_stateful(mut self, stateful: bool) -> Self {
        self.stateful = stateful;
        self
    }

    /// Perform a task. Returns the completed `Run`, or `Error::TaskAborted`
    /// if the agent aborted (the `Run` itself remains well-formed internally,
    /// but is not handed back to the caller in that case).
    #[allow(clippy::disallowed_names)]
    pub async fn r#do(
        &mut self,
        task: &str,
        max_iterations: u32,
        output_schema: Option<Value>,
    ) -> Result<Run> {
        let run = self.run_task(task, max_iterations, output_schema).await?;
        Ok(run)
    }

    /// Retrieve information from the current context.
    pub async fn tell(&mut self, what: &str, schema: Option<Value>, max_iterations: u32) -> Result<Value> {
        let effective_schema = schema.clone().unwrap_or_else(|| {
            serde_json::json!({
                "type": "object",
                "properties": {"value": {"type": "string", "description": format!("The requested information: {what}")}},
                "required": ["value"],
            })
        });
        let task = format!("Find and return the following information: {}", what);
        let run = self.run_task(&task, max_iterations, Some(effective_schema)).await?;
        let output = run.output.unwrap_or(Value::Null);
        if schema.is_some() {
            Ok(output)
        } else {
            Ok(output.get("value").cloned().unwrap_or(Value::String(String::new())))
        }
    }

    /// Check whether a condition holds against the current context.
    pub async fn check(&mut self, condition: &str, max_iterations: u32) -> Result<Verdict> {
        let schema = serde_json::json!({
            "type": "object",
            "properties": {"passed": {"type": "boolean", "description": "True if the condition is met, False otherwise"}},
            "required": ["passed"],
        });
        let task = format!("Check if the following condition is true: {}", condition);
        let run = self.run_task(&task, max_iterations, Some(schema)).await?;
        let passed = run
            .output
            .as_ref()
            .and_then(|o| o.get("passed"))
            .and_then(Value::as_bool)
            .ok_or_else(|| Error::ModelAdapter(anyhow::anyhow!("Check failed: no structured output received")))?;
        Ok(Verdict {
            passed,
            reason: run.feedback.unwrap_or_default(),
        })
    }

    async fn run_task(&mut self, task: &str, max_iterations: u32, output_schema: Option<Value>) -> Result<Run> {
        let runner = TaskRunner::new(self.model.clone(), self.tools.clone(), self.observer.clone())
            .with_system_prompt(self.system_prompt.clone())
            .with_memory(self.memory);

        let previous_runs: &[Run] = if self.stateful { &self.previous_runs } else { &[] };
        let run = runner.run(task, max_iterations, previous_runs, output_schema).await?;

        if self.stateful {
            self.previous_runs.push(run.clone());
        }

        if run.status == TaskStatus::Aborted {
            return Err(Error::TaskAborted {
                feedback: run.feedback.clone().unwrap_or_default(),
            });
        }

        Ok(run)
    }

    /// Deterministically replay a prior run's tool calls without invoking
    /// the model. Unlike `do`, no abort-to-error conversion is applied —
    /// replay failures surface directly as `Error::Replay`.
    pub async fn redo(&self, run: &Run) -> Result<()> {
        let engine = ReplayEngine::new(self.tools.clone());
        engine.replay(run).await
    }

    /// Clear all previous runs, starting fresh for the next task.
    pub fn reset(&mut self) {
        self.previous_runs.clear();
        info!("Agent history reset");
    }

    pub fn previous_runs(&self) -> &[Run] {
        &self.previous_runs
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::{Content, Message};
    use crate::model::testing::ScriptedModelAdapter;
    use crate::runner::NoopObserver;

    fn complete_call(feedback: &str) -> Content {
        let mut args = serde_json::Map::new();
        args.insert("feedback".into(), serde_json::json!(feedback));
        Content::tool_call(Some("1".into()), "complete_work", args)
    }

    fn abort_call(reason: &str) -> Content {
        let mut args = serde_json::Map::new();
        args.insert("reason".into(), serde_json::json!(reason));
        Content::tool_call(Some("1".into()), "abort_work", args)
    }

    fn agent(replies: Vec<Message>) -> Agent {
        Agent::new(
            Arc::new(ScriptedModelAdapter::new(replies)),
            vec![],
            Arc::new(NoopObserver),
        )
    }

    #[tokio::test]
    async fn do_returns_run_on_completion_and_remembers_it() {
        let mut a = agent(vec![Message::model(vec![complete_call("ok")])]);
        let run = a.r#do("task one", 5, None).await.unwrap();
        assert_eq!(run.feedback.as_deref(), Some("ok"));
        assert_eq!(a.previous_runs().len(), 1);
    }

    #[tokio::test]
    async fn do_raises_task_aborted_on_abort() {
        let mut a = agent(vec![Message::model(vec![abort_call("nope")])]);
        let err = a.r#do("task one", 5, None).await.unwrap_err();
        match err {
            Error::TaskAborted { feedback } => assert_eq!(feedback, "nope"),
            other => panic!("expected TaskAborted, got {other:?}"),
        }
        // Aborted runs are still recorded for stateful context.
        assert_eq!(a.previous_runs().len(), 1);
    }

    #[tokio::test]
    async fn reset_clears_previous_runs_and_is_idempotent() {
        let mut a = agent(vec![Message::model(vec![complete_call("ok")])]);
        a.r#do("task one", 5, None).await.unwrap();
        assert_eq!(a.previous_runs().len(), 1);
        a.reset();
        a.reset();
        assert_eq!(a.previous_runs().len(), 0);
    }

    #[tokio::test]
    async fn non_stateful_agent_does_not_remember_runs() {
        let mut a = agent(vec![Message::model(vec![complete_call("ok")])]).with_stateful(false);
        a.r#do("task one", 5, None).await.unwrap();
        assert_eq!(a.previous_runs().len(), 0);
    }

    #[tokio::test]
    async fn tell_returns_value_directly_with_default_schema() {
        let mut args = serde_json::Map::new();
        args.insert("feedback".into(), serde_json::json!("found it"));
        args.insert("output".into(), serde_json::json!({"value": "42"}));
        let reply = Message::model(vec![Content::tool_call(
            Some("1".into()),
            "complete_work",
            args,
        )]);
        let mut a = agent(vec![reply]);
        let value = a.tell("the total price", None, 5).await.unwrap();
        assert_eq!(value, serde_json::json!("42"));
    }

    #[tokio::test]
    async fn check_builds_verdict_from_structured_output() {
        let mut args = serde_json::Map::new();
        args.insert("feedback".into(), serde_json::json!("user is logged in"));
        args.insert("output".into(), serde_json::json!({"passed": true}));
        let reply = Message::model(vec![Content::tool_call(
            Some("1".into()),
            "complete_work",
            args,
        )]);
        let mut a = agent(vec![reply]);
        let verdict = a.check("user is logged in", 5).await.unwrap();
        assert!(verdict.is_true());
        assert_eq!(verdict.reason, "user is logged in");
    }
}

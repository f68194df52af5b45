//! Task runner — the bounded iteration loop.

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::content::{Content, Message, ToolCallData};
use crate::error::Result;
use crate::memory::{assemble_messages, compact, MemoryConfig, Pair};
use crate::model::{ModelAdapter, ToolDefinition};
use crate::prompts::DEFAULT_SYSTEM_PROMPT;
use crate::tools::{AbortWorkTool, CompleteWorkTool, Tool, ToolRegistry};

/// Terminal task status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    Completed,
    Aborted,
}

impl TaskStatus {
    /// Capitalised label, used when formatting prior-run summaries.
    pub fn capitalized(&self) -> &'static str {
        match self {
            TaskStatus::Completed => "Completed",
            TaskStatus::Aborted => "Aborted",
        }
    }
}

/// The mutable cell control tools write into during a run. Destroyed with the runner at the end of `run`.
#[derive(Debug, Default)]
pub struct TaskResultSlot {
    pub status: Option<TaskStatus>,
    pub output: Option<Value>,
    pub feedback: Option<String>,
}

/// Shared handle to a run's in-progress result, held by both control tools.
pub type SharedResult = Arc<Mutex<TaskResultSlot>>;

/// The immutable record of one task execution.
#[derive(Debug, Clone)]
pub struct Run {
    pub task_description: String,
    pub status: TaskStatus,
    pub output: Option<Value>,
    pub feedback: Option<String>,
    pub action_log: String,
    pub messages: Vec<Message>,
    pub steps_used: u32,
    pub max_steps: u32,
}

/// Supplies the agent's current environment state at each sampling point.
#[async_trait]
pub trait Observer: Send + Sync {
    async fn observe(&self) -> Vec<Content>;
}

/// An observer that always returns an empty context; the default for
/// agents with no external environment to sample.
pub struct NoopObserver;

#[async_trait]
impl Observer for NoopObserver {
    async fn observe(&self) -> Vec<Content> {
        Vec::new()
    }
}

/// Executes a single task: assembles context, invokes the model adapter,
/// dispatches tool calls, merges results with fresh observations, and
/// detects termination. Owns a fresh `ToolRegistry` per run; never shared
/// across tasks.
pub struct TaskRunner {
    model: Arc<dyn ModelAdapter>,
    tools: Vec<Arc<dyn Tool>>,
    observer: Arc<dyn Observer>,
    system_prompt: String,
    memory: MemoryConfig,
}

impl TaskRunner {
    pub fn new(
        model: Arc<dyn ModelAdapter>,
        tools: Vec<Arc<dyn Tool>>,
        observer: Arc<dyn Observer>,
    ) -> Self {
        TaskRunner {
            model,
            tools,
            observer,
            system_prompt: DEFAULT_SYSTEM_PROMPT.to_string(),
            memory: MemoryConfig::default(),
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

    /// Run `task` for up to `max_iterations` iterations.
    pub async fn run(
        &self,
        task: &str,
        max_iterations: u32,
        previous_runs: &[Run],
        output_schema: Option<Value>,
    ) -> Result<Run> {
        let result: SharedResult = Arc::new(Mutex::new(TaskResultSlot::default()));
        let registry = self.setup_tools(result.clone(), output_schema);

        let bootstrap = self.build_bootstrap_messages(task, previous_runs).await;

        info!("Task start: {}", task);

        let mut pairs: Vec<Pair> = Vec::new();
        let mut steps_used = max_iterations;

        for iteration in 0..max_iterations {
            info!("Iteration {}/{}", iteration + 1, max_iterations);

            let messages = assemble_messages(&bootstrap, &pairs, &self.memory);
            let tool_defs: Vec<ToolDefinition> = registry
                .get_all()
                .iter()
                .map(|t| ToolDefinition::from_tool(t.as_ref()))
                .collect();

            let model_msg = self.model.call_tools(&messages, &tool_defs).await?;

            let tool_calls: Vec<ToolCallData> =
                model_msg.tool_calls().into_iter().cloned().collect();
            debug!("LLM requested {} tool call(s)", tool_calls.len());

            let tool_results = registry.execute_tool_calls(&tool_calls).await;

            let observation = self.observer.observe().await;

            let mut user_content: Vec<Content> = tool_results
                .into_iter()
                .map(Content::tool_result)
                .collect();
            user_content.extend(observation);
            let user_msg = Message::user(user_content);

            pairs.push((model_msg, user_msg));

            let status_set = result.lock().await.status.is_some();
            if status_set {
                steps_used = iteration + 1;
                break;
            }
        }

        let mut slot = result.lock().await;
        if slot.status.is_none() {
            warn!("Task reached max_iterations without a control tool firing");
            slot.status = Some(TaskStatus::Aborted);
            slot.feedback = Some("Reached maximum iterations".to_string());
        }

        let status = slot.status.expect("status is always set by this point");
        let output = slot.output.clone();
        let feedback = slot.feedback.clone();
        drop(slot);

        info!("Task end: status={:?}", status);

        let action_log = compact(&pairs);
        let mut messages: Vec<Message> = Vec::with_capacity(pairs.len() * 2);
        for (model_msg, user_msg) in pairs {
            messages.push(model_msg);
            messages.push(user_msg);
        }

        Ok(Run {
            task_description: task.to_string(),
            status,
            output,
            feedback,
            action_log,
            messages,
            steps_used,
            max_steps: max_iterations,
        })
    }

    fn setup_tools(&self, result: SharedResult, output_schema: Option<Value>) -> ToolRegistry {
        let mut registry = ToolRegistry::new();
        for tool in &self.tools {
            registry.register(tool.clone());
        }
        registry.register(Arc::new(CompleteWorkTool::new(result.clone(), output_schema)));
        registry.register(Arc::new(AbortWorkTool::new(result)));
        registry
    }

    async fn build_bootstrap_messages(&self, task: &str, previous_runs: &[Run]) -> Vec<Message> {
        let mut user_content: Vec<Content> = Vec::new();

        if !previous_runs.is_empty() {
            user_content.push(Content::text(format_previous_runs(previous_runs)));
        }

        user_content.push(Content::text(format!("## Current task:\n{}", task)));
        user_content.extend(self.observer.observe().await);

        vec![Message::system(&self.system_prompt), Message::user(user_content)]
    }
}

/// Render prior runs as context for a stateful agent's next task.
fn format_previous_runs(runs: &[Run]) -> String {
    let mut lines = vec!["## Previous tasks:".to_string(), String::new()];
    for (i, run) in runs.iter().enumerate() {
        lines.push(format!("### Task {}", i + 1));
        lines.push(format!("Task: {}", run.task_description));
        lines.push(format!("Status: {}", run.status.capitalized()));
        if let Some(ref feedback) = run.feedback {
            lines.push(format!("Feedback: {}", feedback));
        }
        lines.push(String::new());
    }
    lines.join("\n")
}

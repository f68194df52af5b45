//! TaskAgent CLI
//!
//! Runs a single scripted demo task against a toy in-memory tool, to show
//! how a host program wires the engine together. Not part of the crate's
//! public contract — a real deployment supplies its own `ModelAdapter`.

use std::sync::Arc;

use async_trait::async_trait;
use clap::{Parser, Subcommand};
use serde_json::Value;
use taskagent::agent::Agent;
use taskagent::content::{Content, Message, ToolResultData};
use taskagent::error::Result;
use taskagent::model::{ModelAdapter, ToolDefinition};
use taskagent::runner::NoopObserver;
use taskagent::tools::Tool;
use taskagent::{NAME, VERSION};
use tracing::info;

#[derive(Parser)]
#[command(name = "taskagent", version = VERSION, about = "TaskAgent demo CLI", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a scripted demo task against the `echo` tool.
    Run {
        /// The task description to hand to the agent.
        #[arg(long, default_value = "say hello")]
        task: String,
        /// Maximum loop iterations before the run is aborted.
        #[arg(long, default_value_t = 10)]
        max_iterations: u32,
    },
    /// Print the crate name and version.
    Version,
}

/// A toy tool that echoes its `text` argument back as the result description.
struct EchoTool;

#[async_trait]
impl Tool for EchoTool {
    fn name(&self) -> &str {
        "echo"
    }

    fn description(&self) -> &str {
        "Echo a piece of text back, for demo purposes"
    }

    fn parameters_schema(&self) -> Value {
        serde_json::json!({
            "type": "object",
            "properties": {"text": {"type": "string"}},
            "required": ["text"],
        })
    }

    async fn execute(&self, args: Value) -> Result<ToolResultData> {
        let text = args.get("text").and_then(Value::as_str).unwrap_or("");
        Ok(ToolResultData::success("echo", format!("echoed: {}", text)))
    }
}

/// A one-shot scripted adapter: echoes the task once, then completes.
/// Stands in for a real provider integration in this demo binary.
struct DemoAdapter;

#[async_trait]
impl ModelAdapter for DemoAdapter {
    async fn call_tools(&self, messages: &[Message], _tools: &[ToolDefinition]) -> Result<Message> {
        let model_turns = messages.iter().filter(|m| m.role == taskagent::content::Role::Model).count();
        if model_turns == 0 {
            let mut args = serde_json::Map::new();
            args.insert("text".into(), Value::String("hello from the demo adapter".into()));
            Ok(Message::model(vec![Content::tool_call(Some("call-1".into()), "echo", args)]))
        } else {
            let mut args = serde_json::Map::new();
            args.insert("feedback".into(), Value::String("demo task finished".into()));
            Ok(Message::model(vec![Content::tool_call(
                Some("call-2".into()),
                "complete_work",
                args,
            )]))
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    match cli.command {
        Commands::Run { task, max_iterations } => {
            info!("{} v{} starting demo run", NAME, VERSION);
            let mut agent = Agent::new(Arc::new(DemoAdapter), vec![Arc::new(EchoTool)], Arc::new(NoopObserver));
            let run = agent.r#do(&task, max_iterations, None).await?;
            println!("status: {:?}", run.status);
            println!("feedback: {}", run.feedback.unwrap_or_default());
            println!("steps used: {}/{}", run.steps_used, run.max_steps);
        }
        Commands::Version => {
            println!("{} {}", NAME, VERSION);
        }
    }

    Ok(())
}

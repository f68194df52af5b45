//! # TaskAgent
//!
//! A bounded, tool-calling task execution engine for autonomous agents.
//!
//! ## Architecture
//!
//! - **Content model** (`content`): the tagged `Content`/`Message` data model
//!   shared by every other module
//! - **Tools** (`tools`): the `Tool` trait, the ordered-dispatch `ToolRegistry`,
//!   and the `complete_work`/`abort_work` control tools
//! - **Memory** (`memory`): sliding-window retention with textual compaction
//!   and per-content lifespan filtering
//! - **Runner** (`runner`): the bounded iteration loop that ties model calls,
//!   tool dispatch, and termination detection together
//! - **Replay** (`replay`): deterministic re-execution of a recorded run's
//!   tool calls, without the model
//! - **Agent** (`agent`): a stateful façade over the runner (`do`, `tell`,
//!   `check`, `redo`, `reset`) that retains prior runs as context
//! - **Model** (`model`): the `ModelAdapter` trait implementations plug into;
//!   no concrete provider ships in this crate
//! - **Config** (`config`): environment-variable configuration loading
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use taskagent::agent::Agent;
//! use taskagent::runner::NoopObserver;
//!
//! # async fn run(model: Arc<dyn taskagent::model::ModelAdapter>) -> taskagent::Result<()> {
//! let mut agent = Agent::new(model, vec![], Arc::new(NoopObserver));
//! let run = agent.r#do("summarize the latest log file", 20, None).await?;
//! println!("{}", run.feedback.unwrap_or_default());
//! # Ok(())
//! # }
//! ```

pub mod agent;
pub mod config;
pub mod content;
pub mod error;
pub mod memory;
pub mod model;
pub mod prompts;
pub mod replay;
pub mod runner;
pub mod tools;

pub use error::{Error, Result};

/// Crate version, from Cargo.toml.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name, from Cargo.toml.
pub const NAME: &str = env!("CARGO_PKG_NAME");

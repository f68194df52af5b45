//! Error types for TaskAgent

use thiserror::Error;

/// Result type alias using TaskAgent's Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for TaskAgent
#[derive(Error, Debug)]
pub enum Error {
    /// `ToolCall.name` did not resolve to a registered tool.
    #[error("Tool '{0}' not found in registry")]
    ToolNotFound(String),

    /// Tool arguments failed validation against the tool's `Params` schema.
    #[error("Invalid parameters for tool '{name}': {message}")]
    InvalidParams { name: String, message: String },

    /// A tool raised during `execute`.
    #[error("Tool '{name}' execution failed: {message}")]
    ToolExecution { name: String, message: String },

    /// A task ended with `status = aborted`; carries the abort feedback.
    #[error("Task aborted: {feedback}")]
    TaskAborted { feedback: String },

    /// Replay drift: a missing tool, a param mismatch, or a tool returning
    /// an error result during deterministic replay.
    #[error("Replay failed: {0}")]
    Replay(String),

    /// The model adapter (out of core scope) failed or the transport it
    /// wraps failed; the core treats this opaquely.
    #[error("Model adapter error: {0}")]
    ModelAdapter(#[from] anyhow::Error),

    /// Configuration error (env var missing/invalid).
    #[error("Configuration error: {0}")]
    Config(String),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// True for errors that originate from the dispatch loop (registry
    /// lookup / validation / execution), as opposed to task-level or
    /// adapter-level failures.
    pub fn is_dispatch_error(&self) -> bool {
        matches!(
            self,
            Error::ToolNotFound(_) | Error::InvalidParams { .. } | Error::ToolExecution { .. }
        )
    }
}

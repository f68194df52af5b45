//! Configuration management for TaskAgent
//!
//! Loads configuration from environment variables.

use crate::error::{Error, Result};
use crate::memory::MemoryConfig;

/// Logging configuration
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Log level filter, e.g. `info,taskagent=debug`
    pub level: String,
    /// Log format (pretty, json)
    pub format: String,
}

/// Main application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Default cap on loop iterations when a caller doesn't supply one.
    pub default_max_iterations: u32,
    /// Sliding-window memory settings.
    pub memory: MemoryConfig,
    /// Override for the default system prompt; `None` uses the built-in.
    pub system_prompt: Option<String>,
    /// Whether the agent retains prior runs across `do` calls by default.
    pub stateful: bool,
    pub log: LogConfig,
}

impl Config {
    /// Load configuration from environment variables, falling back to
    /// defaults for anything unset.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let default_max_iterations = std::env::var("TASKAGENT_MAX_ITERATIONS")
            .ok()
            .map(|v| v.parse::<u32>())
            .transpose()
            .map_err(|e| Error::Config(format!("TASKAGENT_MAX_ITERATIONS: {}", e)))?
            .unwrap_or(20);

        let recent_window = std::env::var("TASKAGENT_MEMORY_WINDOW")
            .ok()
            .map(|v| v.parse::<usize>())
            .transpose()
            .map_err(|e| Error::Config(format!("TASKAGENT_MEMORY_WINDOW: {}", e)))?
            .unwrap_or(5);

        let stateful = std::env::var("TASKAGENT_STATEFUL")
            .map(|v| v.to_lowercase() != "false")
            .unwrap_or(true);

        Ok(Config {
            default_max_iterations,
            memory: MemoryConfig::new(recent_window),
            system_prompt: std::env::var("TASKAGENT_SYSTEM_PROMPT").ok(),
            stateful,
            log: LogConfig {
                level: std::env::var("RUST_LOG").unwrap_or_else(|_| "info,taskagent=debug".to_string()),
                format: std::env::var("LOG_FORMAT").unwrap_or_else(|_| "pretty".to_string()),
            },
        })
    }

    /// Defaults with no environment dependency, for tests and demos.
    pub fn minimal() -> Self {
        Config {
            default_max_iterations: 20,
            memory: MemoryConfig::default(),
            system_prompt: None,
            stateful: true,
            log: LogConfig {
                level: "info".to_string(),
                format: "pretty".to_string(),
            },
        }
    }
}

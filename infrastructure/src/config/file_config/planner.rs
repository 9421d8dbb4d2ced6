//! Planner configuration from TOML (`[planner]` section)

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Raw planner (Ollama chat endpoint) configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilePlannerConfig {
    /// Base URL of the Ollama server; `/api/chat` is appended
    pub url: String,
    /// Model name passed in every request
    pub model: String,
    /// Per-request timeout in seconds
    pub timeout_seconds: u64,
}

impl Default for FilePlannerConfig {
    fn default() -> Self {
        Self {
            url: "http://127.0.0.1:11434".to_string(),
            model: "qwen3:1.7b".to_string(),
            timeout_seconds: 30,
        }
    }
}

impl FilePlannerConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

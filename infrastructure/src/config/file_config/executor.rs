//! Plan executor configuration from TOML (`[executor]` section)

use pilot_application::ExecutionParams;
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileExecutorConfig {
    /// Replans allowed per run before it fails
    pub max_replan_attempts: u32,
    /// Timeout for ordinary tool calls, in seconds
    pub tool_timeout_seconds: u64,
    /// Timeout for `Pick Object`, in seconds
    pub pick_timeout_seconds: u64,
    /// Pause between steps, in milliseconds
    pub inter_step_delay_ms: u64,
}

impl Default for FileExecutorConfig {
    fn default() -> Self {
        let params = ExecutionParams::default();
        Self {
            max_replan_attempts: params.max_replan_attempts,
            tool_timeout_seconds: params.tool_timeout.as_secs(),
            pick_timeout_seconds: params.long_running_timeout.as_secs(),
            inter_step_delay_ms: params.inter_step_delay.as_millis() as u64,
        }
    }
}

impl FileExecutorConfig {
    pub fn to_params(&self) -> ExecutionParams {
        ExecutionParams::default()
            .with_max_replan_attempts(self.max_replan_attempts)
            .with_tool_timeout(Duration::from_secs(self.tool_timeout_seconds))
            .with_long_running_timeout(Duration::from_secs(self.pick_timeout_seconds))
            .with_inter_step_delay(Duration::from_millis(self.inter_step_delay_ms))
    }
}

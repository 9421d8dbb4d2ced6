//! Execution parameters for the plan executor loop.
//!
//! [`ExecutionParams`] groups the static parameters that control the
//! plan-execute-replan loop in
//! [`ExecutePlanUseCase`](crate::use_cases::execute_plan::ExecutePlanUseCase).
//! These are application-layer concerns, not domain policy.

use pilot_domain::ToolName;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Execution loop control parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutionParams {
    /// Replans allowed per run before it ends in `Failed`.
    pub max_replan_attempts: u32,
    /// Bound on a single tool call.
    pub tool_timeout: Duration,
    /// Bound on tools that run their own control loop (`Pick Object`).
    pub long_running_timeout: Duration,
    /// Pause after each successful step.
    pub inter_step_delay: Duration,
}

impl Default for ExecutionParams {
    fn default() -> Self {
        Self {
            max_replan_attempts: 3,
            tool_timeout: Duration::from_secs(10),
            long_running_timeout: Duration::from_secs(300),
            inter_step_delay: Duration::from_millis(500),
        }
    }
}

impl ExecutionParams {
    // ==================== Builder Methods ====================

    pub fn with_max_replan_attempts(mut self, max: u32) -> Self {
        self.max_replan_attempts = max;
        self
    }

    pub fn with_tool_timeout(mut self, timeout: Duration) -> Self {
        self.tool_timeout = timeout;
        self
    }

    pub fn with_long_running_timeout(mut self, timeout: Duration) -> Self {
        self.long_running_timeout = timeout;
        self
    }

    pub fn with_inter_step_delay(mut self, delay: Duration) -> Self {
        self.inter_step_delay = delay;
        self
    }

    /// Timeout that applies to a call of `tool`.
    pub fn timeout_for(&self, tool: ToolName) -> Duration {
        if tool.is_long_running() {
            self.long_running_timeout
        } else {
            self.tool_timeout
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default() {
        let params = ExecutionParams::default();
        assert_eq!(params.max_replan_attempts, 3);
        assert_eq!(params.tool_timeout, Duration::from_secs(10));
        assert_eq!(params.inter_step_delay, Duration::from_millis(500));
    }

    #[test]
    fn test_builder() {
        let params = ExecutionParams::default()
            .with_max_replan_attempts(1)
            .with_inter_step_delay(Duration::ZERO);

        assert_eq!(params.max_replan_attempts, 1);
        assert!(params.inter_step_delay.is_zero());
    }

    #[test]
    fn test_timeout_for_long_running_tool() {
        let params = ExecutionParams::default();
        assert_eq!(params.timeout_for(ToolName::PickObject), Duration::from_secs(300));
        assert_eq!(params.timeout_for(ToolName::CaptureImage), Duration::from_secs(10));
    }
}

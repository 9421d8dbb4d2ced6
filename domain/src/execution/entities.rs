//! Execution log entities

use crate::plan::Plan;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Phase of a plan execution run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ExecutorPhase {
    #[default]
    Idle,
    Running,
    Replanning,
    Done,
    Failed,
}

impl ExecutorPhase {
    pub fn as_str(&self) -> &str {
        match self {
            ExecutorPhase::Idle => "idle",
            ExecutorPhase::Running => "running",
            ExecutorPhase::Replanning => "replanning",
            ExecutorPhase::Done => "done",
            ExecutorPhase::Failed => "failed",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, ExecutorPhase::Done | ExecutorPhase::Failed)
    }
}

impl std::fmt::Display for ExecutorPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Why a run ended in [`ExecutorPhase::Failed`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FailureReason {
    ReplanLimitExceeded { attempts: u32, step: u32 },
    Cancelled,
}

impl std::fmt::Display for FailureReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FailureReason::ReplanLimitExceeded { attempts, step } => write!(
                f,
                "replan limit exceeded after {} attempts at step {}",
                attempts, step
            ),
            FailureReason::Cancelled => write!(f, "cancelled"),
        }
    }
}

/// One executed (or rejected) step
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutionRecord {
    pub step: u32,
    pub tool: String,
    pub params: Value,
    pub result_text: String,
    pub error_flag: bool,
}

impl ExecutionRecord {
    /// `Step N: <tool> <params> -> <result>`, the form the planner is shown
    /// in the final analysis prompt.
    pub fn summary_line(&self) -> String {
        format!(
            "Step {}: {} {} -> {}",
            self.step, self.tool, self.params, self.result_text
        )
    }
}

/// Outcome of asking the planner for a corrected suffix
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReplanOutcome {
    /// Corrected steps were spliced in
    Spliced { steps: usize },
    /// Planner returned no steps; the plan was left as is
    EmptyPlan,
    /// Planner call failed; the plan was left as is
    PlannerError,
}

impl std::fmt::Display for ReplanOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReplanOutcome::Spliced { steps } => write!(f, "spliced {} corrected steps", steps),
            ReplanOutcome::EmptyPlan => write!(f, "planner returned an empty plan"),
            ReplanOutcome::PlannerError => write!(f, "planner call failed"),
        }
    }
}

/// A replan attempt triggered by a failing step
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplanEvent {
    /// 1-based step number that failed
    pub failing_step: u32,
    /// 1-based attempt counter within the run
    pub attempt: u32,
    pub outcome: ReplanOutcome,
}

/// Ordered history of a run
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ExecutionLog {
    pub initial_response: String,
    pub records: Vec<ExecutionRecord>,
    pub replans: Vec<ReplanEvent>,
    pub final_analysis: Option<String>,
}

impl ExecutionLog {
    pub fn new(initial_response: impl Into<String>) -> Self {
        Self {
            initial_response: initial_response.into(),
            ..Default::default()
        }
    }

    pub fn push(&mut self, record: ExecutionRecord) {
        self.records.push(record);
    }

    pub fn error_count(&self) -> usize {
        self.records.iter().filter(|r| r.error_flag).count()
    }

    /// One `summary_line` per record, newline separated.
    pub fn render(&self) -> String {
        self.records
            .iter()
            .map(ExecutionRecord::summary_line)
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Text used when the final analysis could not be produced.
pub fn analysis_unavailable(reason: impl std::fmt::Display) -> String {
    format!("Analysis unavailable: {}", reason)
}

/// What `execute` hands back: the terminal phase, the log and the plan as
/// it stood at the end (replans included).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutionReport {
    pub phase: ExecutorPhase,
    pub log: ExecutionLog,
    pub final_plan: Plan,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub failure: Option<FailureReason>,
}

impl ExecutionReport {
    pub fn is_success(&self) -> bool {
        self.phase == ExecutorPhase::Done
    }

    pub fn replan_count(&self) -> usize {
        self.log.replans.len()
    }
}

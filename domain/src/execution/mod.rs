//! Execution domain module
//!
//! Value types for a plan-execute-replan run and the rule that decides
//! whether a tool result is an error.

pub mod classifier;
pub mod entities;

pub use classifier::{ERROR_KEYWORDS, is_error_text};
pub use entities::{
    ExecutionLog, ExecutionRecord, ExecutionReport, ExecutorPhase, FailureReason, ReplanEvent,
    ReplanOutcome, analysis_unavailable,
};

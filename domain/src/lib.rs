//! Domain layer for robot-pilot
//!
//! This crate contains the core business logic, entities, and value objects.
//! It has no dependencies on infrastructure or presentation concerns.
//!
//! # Core Concepts
//!
//! ## Plans
//!
//! A planner model turns a user command into a [`Plan`]: a reply text plus
//! ordered tool steps. Raw steps ([`PlanStep`]) become typed [`Step`]s only
//! through [`validate_step`], which checks them against the fixed robot
//! [`ToolSpec`] and the [`ActionVocabulary`].
//!
//! ## Execution
//!
//! Tool results are plain text; [`is_error_text`] decides which ones trigger
//! a replan. A run is recorded in an [`ExecutionLog`] and ends in an
//! [`ExecutionReport`].
//!
//! ## Visual servoing
//!
//! [`VisualServoController`] maps a detected bounding box to a body action
//! and a head tilt, with [`ServoPhase`] tracking the approach.

pub mod action;
pub mod execution;
pub mod plan;
pub mod prompt;
pub mod servo;
pub mod tool;
pub mod trial;
pub mod util;

// Re-export commonly used types
pub use action::{ActionVocabulary, DEFAULT_ACTIONS};
pub use execution::{
    ERROR_KEYWORDS, ExecutionLog, ExecutionRecord, ExecutionReport, ExecutorPhase, FailureReason,
    ReplanEvent, ReplanOutcome, analysis_unavailable, is_error_text,
};
pub use plan::{
    PLANNING_FAILED_RESPONSE, Plan, PlanCompliance, PlanParseError, PlanStep, Step,
    StepViolations, Violation, parse_plan, parse_plan_json, strip_think_blocks, validate_plan,
    validate_plan_value, validate_step,
};
pub use prompt::PlannerPromptTemplate;
pub use servo::{
    BoundingBox, BoundingBoxObservation, CENTER_HEAD, Decision, Detection, DetectionFrame,
    Episode, EpisodeActions, EpisodeEntry, Features, HeadPosition, LookAround, LookAroundMove,
    MAX_HEAD, MIN_HEAD, RobotState, ServoConfig, ServoPhase, VisualServoController,
};
pub use tool::{ToolDefinition, ToolName, ToolParameter, ToolSpec};
pub use trial::{TrialRecord, TrialStats, wilson_ci};

//! Plan domain module
//!
//! A plan is what the planner model returns for a user command: a reply
//! text and an ordered list of tool steps. Steps arrive untyped
//! ([`PlanStep`]) and become typed ([`Step`]) only by passing
//! [`validate_step`].

pub mod entities;
pub mod parser;
pub mod validation;

pub use entities::{PLANNING_FAILED_RESPONSE, Plan, PlanStep, Step};
pub use parser::{
    PlanParseError, extract_json_text, parse_plan, parse_plan_json, plan_step_from_value,
    strip_think_blocks,
};
pub use validation::{
    PlanCompliance, StepViolations, Violation, validate_plan, validate_plan_value, validate_step,
};

//! Prompt domain
//!
//! Templates for the planner model: the system prompt, the replan request
//! and the final analysis request.

pub mod planner;

pub use planner::PlannerPromptTemplate;

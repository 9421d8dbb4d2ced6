//! Port definitions (interfaces for external adapters)
//!
//! Ports define the contracts that infrastructure adapters must implement.

pub mod actuator;
pub mod episode_store;
pub mod planner_gateway;
pub mod progress;
pub mod tool_invoker;
pub mod trial_log;
pub mod vision;

//! Use cases
//!
//! Application-level operations that orchestrate domain logic.

pub mod execute_plan;
pub mod pick_object;
pub mod plan_command;
pub mod run_command;
pub(crate) mod shared;

#[cfg(test)]
pub(crate) mod mocks;

//! Application-level configuration.
//!
//! - [`ExecutionParams`]: plan executor loop control (replan ceiling, timeouts, pacing)

pub mod execution_params;

pub use execution_params::ExecutionParams;

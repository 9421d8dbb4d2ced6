//! Tool invoker port
//!
//! The call contract of the tool channel: one typed step in, one result
//! text out. One attempt, no retry.

use async_trait::async_trait;
use pilot_domain::Step;
use std::time::Duration;
use thiserror::Error;

/// Errors from invoking a tool
///
/// Transport and status failures of the robot services come back as
/// failure result texts (`Action failed: ...`). What is left is a call the
/// executor had to abandon; it renders with an error keyword so it
/// classifies as an error when it lands in the execution log.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ToolInvocationError {
    #[error("Tool call timeout after {0:?}")]
    Timeout(Duration),
}

/// Port for invoking robot tools
#[async_trait]
pub trait ToolInvoker: Send + Sync {
    /// Invoke one validated step and return the tool's result text.
    ///
    /// A returned `Ok` text may still describe a failure
    /// (e.g. `Action failed: ...`); classifying it is the caller's job.
    async fn invoke(&self, step: &Step) -> Result<String, ToolInvocationError>;
}

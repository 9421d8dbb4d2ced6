//! Actuator port
//!
//! The robot's action server: pre-recorded action groups and the head-tilt
//! servo.

use async_trait::async_trait;
use pilot_domain::HeadPosition;
use thiserror::Error;

/// Errors from the actuator service
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ActuatorError {
    #[error("Actuator transport error: {0}")]
    Transport(String),

    #[error("Actuator request timeout")]
    Timeout,

    #[error("Actuator returned status {0}")]
    Status(u16),
}

/// Port for commanding the robot body
#[async_trait]
pub trait ActuatorPort: Send + Sync {
    /// Run a named action group `times` times.
    async fn run_action(&self, action: &str, times: u32) -> Result<(), ActuatorError>;

    /// Move the head-tilt servo.
    async fn set_head(&self, position: HeadPosition) -> Result<(), ActuatorError>;
}

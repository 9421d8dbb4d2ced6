//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! They are deserialized directly and use domain types where appropriate.

mod actuator;
mod executor;
mod logging;
mod planner;
mod vision;

pub use actuator::FileActuatorConfig;
pub use executor::FileExecutorConfig;
pub use logging::FileLoggingConfig;
pub use planner::FilePlannerConfig;
pub use vision::FileVisionConfig;

use pilot_domain::{MAX_HEAD, MIN_HEAD, ServoConfig};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Configuration validation errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigValidationError {
    #[error("{0} cannot be 0")]
    ZeroTimeout(&'static str),

    #[error("{0} cannot be empty")]
    EmptyUrl(&'static str),

    #[error("planner.model cannot be empty")]
    EmptyModelName,

    #[error("servo.stability_frames must be at least 1")]
    ZeroStabilityFrames,

    #[error("servo.look_around_positions: {0} is outside [1000, 2000]")]
    HeadPositionOutOfRange(u16),

    #[error("servo.x_thresh must not exceed servo.fast_x_thresh")]
    InvertedLateralThresholds,
}

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Planner model settings
    pub planner: FilePlannerConfig,
    /// Detection and scene summary services
    pub vision: FileVisionConfig,
    /// Robot controller
    pub actuator: FileActuatorConfig,
    /// Plan executor limits
    pub executor: FileExecutorConfig,
    /// Visual servo tuning
    pub servo: ServoConfig,
    /// Trial log and episode output
    pub logging: FileLoggingConfig,
}

impl FileConfig {
    /// Validate the entire configuration, returning every problem found.
    pub fn validate(&self) -> Vec<ConfigValidationError> {
        let mut errors = Vec::new();

        for (field, url) in [
            ("planner.url", &self.planner.url),
            ("vision.url", &self.vision.url),
            ("vision.summary_url", &self.vision.summary_url),
            ("actuator.url", &self.actuator.url),
        ] {
            if url.trim().is_empty() {
                errors.push(ConfigValidationError::EmptyUrl(field));
            }
        }

        if self.planner.model.trim().is_empty() {
            errors.push(ConfigValidationError::EmptyModelName);
        }

        for (field, value) in [
            ("planner.timeout_seconds", self.planner.timeout_seconds),
            ("vision.timeout_seconds", self.vision.timeout_seconds),
            (
                "vision.summary_timeout_seconds",
                self.vision.summary_timeout_seconds,
            ),
            ("actuator.timeout_seconds", self.actuator.timeout_seconds),
            ("executor.tool_timeout_seconds", self.executor.tool_timeout_seconds),
            ("executor.pick_timeout_seconds", self.executor.pick_timeout_seconds),
        ] {
            if value == 0 {
                errors.push(ConfigValidationError::ZeroTimeout(field));
            }
        }

        if self.servo.stability_frames == 0 {
            errors.push(ConfigValidationError::ZeroStabilityFrames);
        }
        if self.servo.x_thresh > self.servo.fast_x_thresh {
            errors.push(ConfigValidationError::InvertedLateralThresholds);
        }
        errors.extend(
            self.servo
                .look_around_positions
                .iter()
                .filter(|p| !(MIN_HEAD..=MAX_HEAD).contains(*p))
                .map(|p| ConfigValidationError::HeadPositionOutOfRange(*p)),
        );

        errors
    }
}

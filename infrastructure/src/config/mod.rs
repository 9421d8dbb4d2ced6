//! Configuration file loading for robot-pilot
//!
//! This module handles file I/O and merging of configuration from multiple sources.
//! The priority order (highest to lowest):
//!
//! 1. `ROBOT_PILOT_*` environment variables (`__` separates section and key)
//! 2. `--config <path>` specified file
//! 3. Project root: `./robot-pilot.toml` or `./.robot-pilot.toml`
//! 4. Global: `$XDG_CONFIG_HOME/robot-pilot/config.toml`
//! 5. Default values

mod file_config;
mod loader;

pub use file_config::{
    ConfigValidationError, FileActuatorConfig, FileConfig, FileExecutorConfig, FileLoggingConfig,
    FilePlannerConfig, FileVisionConfig,
};
pub use loader::ConfigLoader;

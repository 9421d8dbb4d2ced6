//! Infrastructure layer for robot-pilot
//!
//! This crate contains adapters that implement the ports defined
//! in the application layer, including configuration file loading.

pub mod config;
pub mod logging;
pub mod ollama;
pub mod robot;
pub mod tools;
pub mod vision;

#[cfg(test)]
mod test_server;

// Re-export commonly used types
pub use config::{
    ConfigLoader, ConfigValidationError, FileActuatorConfig, FileConfig, FileExecutorConfig,
    FileLoggingConfig, FilePlannerConfig, FileVisionConfig,
};
pub use logging::{JsonEpisodeStore, JsonlTrialLogger, read_trial_log};
pub use ollama::OllamaPlannerGateway;
pub use robot::JsonRpcActuatorClient;
pub use tools::RobotToolInvoker;
pub use vision::HttpVisionClient;

//! Robot controller configuration from TOML (`[actuator]` section)

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Raw JSON-RPC actuator configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileActuatorConfig {
    /// JSON-RPC endpoint of the robot controller
    pub url: String,
    /// Request timeout in seconds
    pub timeout_seconds: u64,
    /// Pause after every command so the motion can finish
    pub settle_ms: u64,
}

impl Default for FileActuatorConfig {
    fn default() -> Self {
        Self {
            url: "http://lab-erza.local:9030".to_string(),
            timeout_seconds: 5,
            settle_ms: 1000,
        }
    }
}

impl FileActuatorConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }

    pub fn settle(&self) -> Duration {
        Duration::from_millis(self.settle_ms)
    }
}

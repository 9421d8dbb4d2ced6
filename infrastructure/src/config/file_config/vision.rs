//! Vision service configuration from TOML (`[vision]` section)

use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileVisionConfig {
    /// Open-vocabulary detection endpoint
    pub url: String,
    /// Scene summary endpoint
    pub summary_url: String,
    /// `boundaryColors` sent when a request names none
    pub default_boundary_colors: String,
    /// Detection timeout in seconds
    pub timeout_seconds: u64,
    /// Scene summary timeout in seconds
    pub summary_timeout_seconds: u64,
}

impl Default for FileVisionConfig {
    fn default() -> Self {
        Self {
            url: "http://127.0.0.1:8000/dino_api".to_string(),
            summary_url: "http://127.0.0.1:8000/summarize_scene".to_string(),
            default_boundary_colors: "red".to_string(),
            timeout_seconds: 10,
            summary_timeout_seconds: 30,
        }
    }
}

impl FileVisionConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }

    pub fn summary_timeout(&self) -> Duration {
        Duration::from_secs(self.summary_timeout_seconds)
    }
}

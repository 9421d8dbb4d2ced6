//! Run artefact configuration from TOML (`[logging]` section)

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileLoggingConfig {
    /// JSONL file receiving one trial record per command; off when unset
    pub trials_log: Option<String>,
    /// Directory for pick episodes
    pub episodes_dir: String,
    /// Write an episode file for every pick run
    pub save_episodes: bool,
}

impl Default for FileLoggingConfig {
    fn default() -> Self {
        Self {
            trials_log: None,
            episodes_dir: "episodes".to_string(),
            save_episodes: true,
        }
    }
}

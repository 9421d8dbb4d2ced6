//! Episode store port

use pilot_domain::Episode;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum EpisodeStoreError {
    #[error("Episode I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Episode serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Persists pick-run episodes, one document per run.
pub trait EpisodeStore: Send + Sync {
    /// Write the episode and return where it went.
    fn save(&self, episode: &Episode) -> Result<PathBuf, EpisodeStoreError>;
}

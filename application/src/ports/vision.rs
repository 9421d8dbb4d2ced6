//! Vision service port

use async_trait::async_trait;
use pilot_domain::DetectionFrame;
use thiserror::Error;

/// Errors from the vision service
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum VisionError {
    #[error("Vision transport error: {0}")]
    Transport(String),

    #[error("Vision request timeout")]
    Timeout,

    #[error("Vision service error: {0}")]
    Service(String),

    #[error("Invalid vision response: {0}")]
    InvalidResponse(String),
}

/// Port for the vision service: open-vocabulary detection and a VLM scene
/// summary.
#[async_trait]
pub trait VisionPort: Send + Sync {
    /// Detect `request` (`;`-separated object names) in the current frame.
    ///
    /// An empty `detections` list is a miss, not an error.
    async fn detect(
        &self,
        request: &str,
        boundary_colors: Option<&str>,
    ) -> Result<DetectionFrame, VisionError>;

    /// One-sentence description of what the camera sees.
    async fn summarize_scene(&self) -> Result<String, VisionError>;
}

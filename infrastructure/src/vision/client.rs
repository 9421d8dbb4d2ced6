//! HTTP client for the detection and scene-summary services.
//!
//! Detection: `POST {url}?request=<q>&boundaryColors=<c>` answering
//! `{detections, image_width, image_height}`. An empty detection list is a
//! normal frame, not an error.
//!
//! Scene summary: `POST {summary_url}` answering `{summary}` or `{error}`.

use crate::config::FileVisionConfig;
use async_trait::async_trait;
use pilot_application::{VisionError, VisionPort};
use pilot_domain::DetectionFrame;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

#[derive(Debug, Deserialize)]
struct SummaryResponse {
    summary: Option<String>,
    error: Option<String>,
}

pub struct HttpVisionClient {
    client: reqwest::Client,
    detect_url: String,
    summary_url: String,
    default_boundary_colors: String,
    summary_timeout: Duration,
}

impl HttpVisionClient {
    pub fn new(
        detect_url: impl Into<String>,
        summary_url: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, VisionError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| VisionError::Transport(e.to_string()))?;
        Ok(Self {
            client,
            detect_url: detect_url.into(),
            summary_url: summary_url.into(),
            default_boundary_colors: "red".to_string(),
            summary_timeout: Duration::from_secs(30),
        })
    }

    pub fn from_config(config: &FileVisionConfig) -> Result<Self, VisionError> {
        Ok(
            Self::new(config.url.clone(), config.summary_url.clone(), config.timeout())?
                .with_default_boundary_colors(config.default_boundary_colors.clone())
                .with_summary_timeout(config.summary_timeout()),
        )
    }

    pub fn with_default_boundary_colors(mut self, colors: impl Into<String>) -> Self {
        self.default_boundary_colors = colors.into();
        self
    }

    pub fn with_summary_timeout(mut self, timeout: Duration) -> Self {
        self.summary_timeout = timeout;
        self
    }

    async fn post(&self, request: reqwest::RequestBuilder) -> Result<String, VisionError> {
        let response = request.send().await.map_err(transport_error)?;
        let status = response.status();
        let body = response.text().await.map_err(transport_error)?;
        if !status.is_success() {
            return Err(VisionError::Service(format!("status {}: {}", status.as_u16(), body)));
        }
        Ok(body)
    }
}

fn transport_error(e: reqwest::Error) -> VisionError {
    if e.is_timeout() {
        VisionError::Timeout
    } else {
        VisionError::Transport(e.to_string())
    }
}

#[async_trait]
impl VisionPort for HttpVisionClient {
    async fn detect(
        &self,
        request: &str,
        boundary_colors: Option<&str>,
    ) -> Result<DetectionFrame, VisionError> {
        let colors = boundary_colors.unwrap_or(&self.default_boundary_colors);
        debug!("Detect '{}' (colors {})", request, colors);

        let body = self
            .post(
                self.client
                    .post(&self.detect_url)
                    .query(&[("request", request), ("boundaryColors", colors)]),
            )
            .await?;
        serde_json::from_str(&body).map_err(|e| VisionError::InvalidResponse(e.to_string()))
    }

    async fn summarize_scene(&self) -> Result<String, VisionError> {
        let body = self
            .post(self.client.post(&self.summary_url).timeout(self.summary_timeout))
            .await?;
        let parsed: SummaryResponse =
            serde_json::from_str(&body).map_err(|e| VisionError::InvalidResponse(e.to_string()))?;

        match (parsed.summary, parsed.error) {
            (Some(summary), _) if !summary.trim().is_empty() => Ok(summary),
            (_, Some(error)) => Err(VisionError::Service(error)),
            _ => Err(VisionError::InvalidResponse("empty scene summary".to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_server::serve_once;

    fn client(base: &str) -> HttpVisionClient {
        HttpVisionClient::new(
            format!("{}/dino_api", base),
            format!("{}/summarize_scene", base),
            Duration::from_secs(5),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_detect_parses_frame_and_sends_query() {
        let (url, server) = serve_once(
            200,
            r#"{"detections": [{"score": 0.91, "label": "red ball", "box": {"xmin": 10, "ymin": 20, "xmax": 30, "ymax": 60}}], "image_width": 640, "image_height": 480}"#,
        )
        .await;

        let frame = client(&url).detect("red ball", None).await.unwrap();
        assert_eq!(frame.detections.len(), 1);
        assert_eq!(frame.image_width, 640);
        assert_eq!(frame.detections[0].bbox.ymax, 60.0);

        let request = server.await.unwrap();
        assert!(request.line.starts_with("POST /dino_api?request=red+ball&boundaryColors=red "));
    }

    #[tokio::test]
    async fn test_detect_passes_explicit_colors() {
        let (url, server) = serve_once(200, r#"{"detections": []}"#).await;

        let frame = client(&url).detect("cup", Some("blue")).await.unwrap();
        assert!(frame.observe().is_none());
        assert!(server.await.unwrap().line.contains("boundaryColors=blue"));
    }

    #[tokio::test]
    async fn test_summary_success() {
        let (url, _server) = serve_once(200, r#"{"summary": "I see a red ball on the left"}"#).await;
        assert_eq!(
            client(&url).summarize_scene().await.unwrap(),
            "I see a red ball on the left"
        );
    }

    #[tokio::test]
    async fn test_summary_error_field() {
        let (url, _server) = serve_once(200, r#"{"error": "camera offline"}"#).await;
        assert_eq!(
            client(&url).summarize_scene().await.unwrap_err(),
            VisionError::Service("camera offline".to_string())
        );
    }

    #[tokio::test]
    async fn test_service_status_error() {
        let (url, _server) = serve_once(503, "busy").await;
        let err = client(&url).detect("box", None).await.unwrap_err();
        assert_eq!(err, VisionError::Service("status 503: busy".to_string()));
    }
}

//! Planner gateway backed by an Ollama server.

use super::protocol::{ChatRequest, ChatResponse};
use crate::config::FilePlannerConfig;
use async_trait::async_trait;
use pilot_application::{ChatMessage, GatewayError, PlannerGateway};
use std::time::Duration;
use tracing::debug;

pub struct OllamaPlannerGateway {
    client: reqwest::Client,
    chat_url: String,
    model: String,
}

impl OllamaPlannerGateway {
    pub fn new(
        base_url: &str,
        model: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, GatewayError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| GatewayError::ConnectionError(e.to_string()))?;
        Ok(Self {
            client,
            chat_url: format!("{}/api/chat", base_url.trim_end_matches('/')),
            model: model.into(),
        })
    }

    pub fn from_config(config: &FilePlannerConfig) -> Result<Self, GatewayError> {
        Self::new(&config.url, config.model.clone(), config.timeout())
    }
}

fn transport_error(e: reqwest::Error) -> GatewayError {
    if e.is_timeout() {
        GatewayError::Timeout
    } else {
        GatewayError::ConnectionError(e.to_string())
    }
}

#[async_trait]
impl PlannerGateway for OllamaPlannerGateway {
    fn model(&self) -> &str {
        &self.model
    }

    async fn chat(&self, messages: &[ChatMessage], json_mode: bool) -> Result<String, GatewayError> {
        let request = ChatRequest {
            model: &self.model,
            messages,
            stream: false,
            format: json_mode.then_some("json"),
        };
        debug!("POST {} ({} messages)", self.chat_url, messages.len());

        let response = self
            .client
            .post(&self.chat_url)
            .json(&request)
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();
        let body = response.text().await.map_err(transport_error)?;
        if !status.is_success() {
            return Err(GatewayError::RequestFailed {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: ChatResponse = serde_json::from_str(&body)
            .map_err(|e| GatewayError::InvalidResponse(e.to_string()))?;
        Ok(parsed.message.content)
    }
}

//! Actuator port over the robot's JSON-RPC endpoint.

use super::protocol::JsonRpcRequest;
use crate::config::FileActuatorConfig;
use async_trait::async_trait;
use pilot_application::{ActuatorError, ActuatorPort};
use pilot_domain::HeadPosition;
use std::time::Duration;
use tracing::{debug, info};

pub struct JsonRpcActuatorClient {
    client: reqwest::Client,
    url: String,
    settle: Duration,
}

impl JsonRpcActuatorClient {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, ActuatorError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ActuatorError::Transport(e.to_string()))?;
        Ok(Self {
            client,
            url: url.into(),
            settle: Duration::from_secs(1),
        })
    }

    pub fn from_config(config: &FileActuatorConfig) -> Result<Self, ActuatorError> {
        Ok(Self::new(config.url.clone(), config.timeout())?.with_settle(config.settle()))
    }

    /// Pause after every command, successful or not
    pub fn with_settle(mut self, settle: Duration) -> Self {
        self.settle = settle;
        self
    }

    async fn send(&self, request: JsonRpcRequest) -> Result<(), ActuatorError> {
        debug!("{} {} -> {}", request.method, request.params, self.url);
        let result = self.client.post(&self.url).json(&request).send().await;
        if !self.settle.is_zero() {
            tokio::time::sleep(self.settle).await;
        }

        let response = result.map_err(|e| {
            if e.is_timeout() {
                ActuatorError::Timeout
            } else {
                ActuatorError::Transport(e.to_string())
            }
        })?;
        match response.status().as_u16() {
            200 => Ok(()),
            status => Err(ActuatorError::Status(status)),
        }
    }
}

#[async_trait]
impl ActuatorPort for JsonRpcActuatorClient {
    async fn run_action(&self, action: &str, times: u32) -> Result<(), ActuatorError> {
        info!("RunAction {} x{}", action, times);
        self.send(JsonRpcRequest::run_action(action, times)).await
    }

    async fn set_head(&self, position: HeadPosition) -> Result<(), ActuatorError> {
        debug!("Head -> {}", position);
        self.send(JsonRpcRequest::set_head(position)).await
    }
}

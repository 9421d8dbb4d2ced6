//! Planner gateway port
//!
//! Defines the interface for talking to the planner model (an
//! Ollama-compatible chat endpoint).

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur during planner gateway operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GatewayError {
    #[error("Connection error: {0}")]
    ConnectionError(String),

    #[error("Request failed with status {status}: {body}")]
    RequestFailed { status: u16, body: String },

    #[error("Planner request timeout")]
    Timeout,

    #[error("Invalid planner response: {0}")]
    InvalidResponse(String),
}

/// Role of a chat message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    System,
    User,
    Assistant,
}

/// One message of a chat request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
        }
    }
}

/// Gateway to the planner model
///
/// Implementations (adapters) live in the infrastructure layer.
#[async_trait]
pub trait PlannerGateway: Send + Sync {
    /// Name of the model answering the requests
    fn model(&self) -> &str;

    /// Send a non-streaming chat request and return the reply text.
    ///
    /// With `json_mode` the model is asked to reply with a JSON document.
    async fn chat(&self, messages: &[ChatMessage], json_mode: bool) -> Result<String, GatewayError>;
}

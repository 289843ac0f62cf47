//! Generation client port
//!
//! Defines the interface for asking a language model for text.

use arena_domain::{Message, ModelId};
use async_trait::async_trait;
use thiserror::Error;

/// Errors that can occur during a generation call
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GatewayError {
    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Rate limited: {0}")]
    RateLimited(String),

    #[error("Provider returned HTTP {code}: {message}")]
    Status { code: u16, message: String },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Other error: {0}")]
    Other(String),
}

/// One call to a model: role-tagged messages plus the credential to use
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    pub model: ModelId,
    pub messages: Vec<Message>,
    pub credential: String,
}

impl GenerationRequest {
    pub fn new(model: ModelId, messages: Vec<Message>, credential: impl Into<String>) -> Self {
        Self {
            model,
            messages,
            credential: credential.into(),
        }
    }
}

/// Text returned by a model, with usage when the provider reports it
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Generation {
    pub text: String,
    pub input_tokens: Option<u64>,
    pub output_tokens: Option<u64>,
    pub cost: Option<f64>,
}

impl Generation {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Default::default()
        }
    }

    pub fn with_usage(mut self, input_tokens: u64, output_tokens: u64) -> Self {
        self.input_tokens = Some(input_tokens);
        self.output_tokens = Some(output_tokens);
        self
    }

    pub fn with_cost(mut self, cost: f64) -> Self {
        self.cost = Some(cost);
        self
    }
}

/// Client for text generation
///
/// This port defines how the application layer reaches a model provider.
/// Implementations (adapters) live in the infrastructure layer. A client
/// carries no timeout or retry behaviour of its own; see
/// [`call_with_retry`](crate::use_cases::retry::call_with_retry).
#[async_trait]
pub trait GenerationClient: Send + Sync {
    async fn generate(&self, request: &GenerationRequest) -> Result<Generation, GatewayError>;
}

//! Wire types for the OpenAI-compatible chat completions API.
//!
//! - **Request**: `POST {base_url}/chat/completions` with model + messages
//! - **Response**: `choices[0].message.content` plus optional `usage`
//! - **Error**: `{"error": {"message": ...}}` on non-2xx statuses

use arena_domain::{Message, Role};
use serde::{Deserialize, Serialize};

/// Chat completion request body
#[derive(Debug, Clone, Serialize)]
pub struct ChatCompletionRequest<'a> {
    pub model: &'a str,
    pub messages: Vec<ChatMessage<'a>>,
}

impl<'a> ChatCompletionRequest<'a> {
    pub fn new(model: &'a str, messages: &'a [Message]) -> Self {
        Self {
            model,
            messages: messages.iter().map(ChatMessage::from).collect(),
        }
    }
}

/// One role-tagged message on the wire
#[derive(Debug, Clone, Serialize)]
pub struct ChatMessage<'a> {
    pub role: Role,
    pub content: &'a str,
}

impl<'a> From<&'a Message> for ChatMessage<'a> {
    fn from(message: &'a Message) -> Self {
        Self {
            role: message.role,
            content: &message.content,
        }
    }
}

/// Chat completion response body
#[derive(Debug, Clone, Deserialize)]
pub struct ChatCompletionResponse {
    #[serde(default)]
    pub choices: Vec<Choice>,
    pub usage: Option<Usage>,
}

impl ChatCompletionResponse {
    /// Text of the first choice, if any
    pub fn into_text(self) -> Option<String> {
        self.choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Choice {
    pub message: ResponseMessage,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ResponseMessage {
    pub content: Option<String>,
}

/// Token usage; some gateways also report the billed cost
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct Usage {
    pub prompt_tokens: Option<u64>,
    pub completion_tokens: Option<u64>,
    pub cost: Option<f64>,
}

/// Error envelope returned with non-2xx statuses
#[derive(Debug, Clone, Deserialize)]
pub struct ErrorResponse {
    pub error: ErrorBody,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ErrorBody {
    pub message: String,
}

/// Human-readable message from an error body, falling back to the raw text
pub fn error_message(body: &str) -> String {
    serde_json::from_str::<ErrorResponse>(body)
        .map(|wrapper| wrapper.error.message)
        .unwrap_or_else(|_| body.trim().to_string())
}

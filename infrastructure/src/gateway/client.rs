//! AI gateway client implementation

use super::protocol::{ChatCompletionRequest, ChatCompletionResponse, error_message};
use crate::config::{DEFAULT_BASE_URL, FileGatewayConfig};
use arena_application::ports::generation::{
    GatewayError, Generation, GenerationClient, GenerationRequest,
};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use std::time::Duration;
use tracing::debug;

/// Generation client for an OpenAI-compatible gateway
pub struct AiGatewayClient {
    client: Client,
    base_url: String,
}

impl AiGatewayClient {
    /// Client for the default gateway endpoint
    pub fn new() -> Result<Self, GatewayError> {
        Self::with_base_url(DEFAULT_BASE_URL, None)
    }

    /// Client for a custom endpoint, with an optional transport timeout
    pub fn with_base_url(
        base_url: impl Into<String>,
        request_timeout: Option<Duration>,
    ) -> Result<Self, GatewayError> {
        let mut builder = Client::builder().user_agent(concat!(
            env!("CARGO_PKG_NAME"),
            "/",
            env!("CARGO_PKG_VERSION")
        ));
        if let Some(timeout) = request_timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| GatewayError::Connection(e.to_string()))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    /// Build from the `[gateway]` config section
    pub fn from_config(config: &FileGatewayConfig) -> Result<Self, GatewayError> {
        Self::with_base_url(
            config.base_url.trim(),
            config.request_timeout_secs.map(Duration::from_secs),
        )
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }
}

#[async_trait]
impl GenerationClient for AiGatewayClient {
    async fn generate(&self, request: &GenerationRequest) -> Result<Generation, GatewayError> {
        let body = ChatCompletionRequest::new(request.model.as_str(), &request.messages);
        debug!("POST {} model={}", self.endpoint(), request.model);

        let response = self
            .client
            .post(self.endpoint())
            .bearer_auth(&request.credential)
            .json(&body)
            .send()
            .await
            .map_err(|e| GatewayError::Connection(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(map_http_error(status, &text));
        }

        let parsed: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| GatewayError::InvalidResponse(e.to_string()))?;

        let usage = parsed.usage.unwrap_or_default();
        let text = parsed.into_text().ok_or_else(|| {
            GatewayError::InvalidResponse("response contained no message content".to_string())
        })?;

        Ok(Generation {
            text,
            input_tokens: usage.prompt_tokens,
            output_tokens: usage.completion_tokens,
            cost: usage.cost,
        })
    }
}

/// Map a non-2xx status to a gateway error
fn map_http_error(status: StatusCode, body: &str) -> GatewayError {
    let message = error_message(body);
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => GatewayError::Unauthorized(message),
        StatusCode::TOO_MANY_REQUESTS => GatewayError::RateLimited(message),
        _ => GatewayError::Status {
            code: status.as_u16(),
            message,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arena_domain::{Message, ModelId};
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// Serve a single canned HTTP response and hand back the raw request
    async fn serve_once(status: &'static str, body: &'static str) -> (String, tokio::task::JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let url = format!("http://{}/v1", listener.local_addr().unwrap());

        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut raw = Vec::new();
            let mut buf = [0u8; 4096];
            loop {
                let n = socket.read(&mut buf).await.unwrap();
                raw.extend_from_slice(&buf[..n]);
                let text = String::from_utf8_lossy(&raw);
                if let Some(split) = text.find("\r\n\r\n") {
                    let length = text[..split]
                        .lines()
                        .find_map(|l| {
                            l.to_ascii_lowercase()
                                .strip_prefix("content-length:")
                                .map(|v| v.trim().parse::<usize>().unwrap())
                        })
                        .unwrap_or(0);
                    if raw.len() >= split + 4 + length {
                        break;
                    }
                }
                if n == 0 {
                    break;
                }
            }
            let response = format!(
                "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status,
                body.len(),
                body
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            String::from_utf8_lossy(&raw).to_string()
        });

        (url, handle)
    }

    fn request() -> GenerationRequest {
        GenerationRequest::new(
            ModelId::new("openai/gpt-5"),
            vec![Message::system("Be brief."), Message::user("Scenario: heatwave")],
            "sk-test",
        )
    }

    #[test]
    fn test_map_http_error() {
        assert!(matches!(
            map_http_error(StatusCode::UNAUTHORIZED, "{\"error\":{\"message\":\"bad key\"}}"),
            GatewayError::Unauthorized(m) if m == "bad key"
        ));
        assert!(matches!(
            map_http_error(StatusCode::FORBIDDEN, ""),
            GatewayError::Unauthorized(_)
        ));
        assert!(matches!(
            map_http_error(StatusCode::TOO_MANY_REQUESTS, "slow down"),
            GatewayError::RateLimited(_)
        ));
        assert_eq!(
            map_http_error(StatusCode::BAD_GATEWAY, "upstream"),
            GatewayError::Status {
                code: 502,
                message: "upstream".to_string()
            }
        );
    }

    #[test]
    fn test_base_url_is_normalized() {
        let client = AiGatewayClient::with_base_url("http://localhost:9/v1/", None).unwrap();
        assert_eq!(client.base_url(), "http://localhost:9/v1");
        assert_eq!(client.endpoint(), "http://localhost:9/v1/chat/completions");
    }

    #[tokio::test]
    async fn test_generate_success() {
        let (url, server) = serve_once(
            "200 OK",
            r#"{"choices":[{"message":{"role":"assistant","content":"Plant trees."}}],"usage":{"prompt_tokens":12,"completion_tokens":3}}"#,
        )
        .await;
        let client = AiGatewayClient::with_base_url(url, None).unwrap();

        let generation = client.generate(&request()).await.unwrap();
        assert_eq!(generation.text, "Plant trees.");
        assert_eq!(generation.input_tokens, Some(12));
        assert_eq!(generation.output_tokens, Some(3));
        assert_eq!(generation.cost, None);

        let raw = server.await.unwrap();
        assert!(raw.starts_with("POST /v1/chat/completions"));
        assert!(raw.to_ascii_lowercase().contains("authorization: bearer sk-test"));
        assert!(raw.contains("\"model\":\"openai/gpt-5\""));
    }

    #[tokio::test]
    async fn test_generate_unauthorized() {
        let (url, _server) = serve_once(
            "401 Unauthorized",
            r#"{"error":{"message":"Invalid API key"}}"#,
        )
        .await;
        let client = AiGatewayClient::with_base_url(url, None).unwrap();

        let err = client.generate(&request()).await.unwrap_err();
        assert_eq!(err, GatewayError::Unauthorized("Invalid API key".to_string()));
    }

    #[tokio::test]
    async fn test_generate_empty_choices_is_invalid() {
        let (url, _server) = serve_once("200 OK", r#"{"choices":[]}"#).await;
        let client = AiGatewayClient::with_base_url(url, None).unwrap();

        let err = client.generate(&request()).await.unwrap_err();
        assert!(matches!(err, GatewayError::InvalidResponse(_)));
    }
}

//! HTTP transport for chat completion requests.

use super::message::ChatRequest;
use crate::error::{Result, SightError};
use async_trait::async_trait;
use std::time::Duration;
use tracing::debug;

/// Raw outcome of one HTTP exchange, before any envelope validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
    pub status: u16,
    pub body: String,
}

impl TransportResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Sends a serialized chat request to the completion endpoint.
#[async_trait]
pub trait ChatTransport: Send + Sync {
    /// POST the request. Fails only when the exchange itself fails.
    async fn post(&self, request: &ChatRequest) -> Result<TransportResponse>;
}

/// reqwest-backed transport with bearer authentication.
pub struct HttpTransport {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
}

impl HttpTransport {
    /// Create a transport. `timeout` of `None` leaves requests unbounded.
    pub fn new(endpoint: &str, api_key: &str, timeout: Option<Duration>) -> Result<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| SightError::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            endpoint: endpoint.to_string(),
            api_key: api_key.to_string(),
        })
    }
}

#[async_trait]
impl ChatTransport for HttpTransport {
    async fn post(&self, request: &ChatRequest) -> Result<TransportResponse> {
        debug!("POST {} (model {})", self.endpoint, request.model);

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(request)
            .send()
            .await
            .map_err(|e| SightError::Network(e.to_string()))?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| SightError::Network(e.to_string()))?;

        Ok(TransportResponse { status, body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chat::message::{ChatMessage, ContentPart};
    use mockito::Matcher;
    use serde_json::json;

    fn sample_request() -> ChatRequest {
        ChatRequest {
            model: "gpt-4o".to_string(),
            messages: vec![ChatMessage::user_parts(vec![
                ContentPart::text("what is this?"),
                ContentPart::image_url("https://example.com/cat.png"),
            ])],
        }
    }

    #[tokio::test]
    async fn test_posts_json_with_bearer_token() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/v1/chat/completions")
            .match_header("authorization", "Bearer sk-test")
            .match_header("content-type", "application/json")
            .match_body(Matcher::PartialJson(json!({
                "model": "gpt-4o",
                "messages": [{
                    "role": "user",
                    "content": [
                        { "type": "text", "text": "what is this?" },
                        { "type": "image_url", "image_url": { "url": "https://example.com/cat.png" } }
                    ]
                }]
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"choices":[{"message":{"content":"a cat"}}]}"#)
            .create_async()
            .await;

        let endpoint = format!("{}/v1/chat/completions", server.url());
        let transport = HttpTransport::new(&endpoint, "sk-test", None).unwrap();
        let response = transport.post(&sample_request()).await.unwrap();

        assert!(response.is_success());
        assert!(response.body.contains("a cat"));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_error_status_is_returned_not_raised() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/")
            .with_status(429)
            .with_body("rate limited")
            .create_async()
            .await;

        let transport = HttpTransport::new(&server.url(), "sk-test", None).unwrap();
        let response = transport.post(&sample_request()).await.unwrap();

        assert_eq!(response.status, 429);
        assert!(!response.is_success());
        assert_eq!(response.body, "rate limited");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_connection_failure_is_network_error() {
        // Port 9 (discard) on localhost is expected to refuse connections.
        let transport = HttpTransport::new("http://127.0.0.1:9/", "sk-test", Some(Duration::from_secs(5))).unwrap();
        let result = transport.post(&sample_request()).await;
        assert!(matches!(result, Err(SightError::Network(_))));
    }
}

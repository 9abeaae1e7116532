//! Chat completion client for multimodal analysis.
//!
//! Builds OpenAI-style chat requests carrying a prompt and one media part,
//! sends them through a [`ChatTransport`], and retries transient failures
//! with exponential backoff.

mod client;
mod message;
mod retry;
mod transport;

pub use client::CompletionClient;
pub use message::{
    extract_content, ChatMessage, ChatRequest, ContentPart, MediaUrl, MessageContent, Role,
};
pub use retry::{AttemptState, RetryPolicy, Sleeper, TokioSleeper};
pub use transport::{ChatTransport, HttpTransport, TransportResponse};

//! Completion client with bounded retry.

use super::message::{extract_content, ChatMessage, ChatRequest, ContentPart};
use super::retry::{AttemptState, RetryPolicy, Sleeper, TokioSleeper};
use super::transport::{ChatTransport, HttpTransport};
use crate::config::Settings;
use crate::error::{Result, SightError};
use crate::media::{MediaKind, MediaReference};
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

/// Longest slice of an error response body kept in an [`SightError::Api`].
const MAX_ERROR_BODY_CHARS: usize = 200;

/// Sends multimodal chat requests and returns the answer text.
pub struct CompletionClient {
    transport: Arc<dyn ChatTransport>,
    sleeper: Arc<dyn Sleeper>,
    model: String,
    policy: RetryPolicy,
}

impl CompletionClient {
    /// Create a client over any transport, with the default retry policy.
    pub fn new(transport: Arc<dyn ChatTransport>, model: &str) -> Self {
        Self {
            transport,
            sleeper: Arc::new(TokioSleeper),
            model: model.to_string(),
            policy: RetryPolicy::default(),
        }
    }

    /// Create an HTTP-backed client from settings. Fails if no API key is set.
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        let transport = HttpTransport::new(
            &settings.api.endpoint,
            settings.api_key()?,
            settings.request_timeout(),
        )?;

        Ok(Self::new(Arc::new(transport), &settings.api.model)
            .with_retry_policy(settings.retry_policy()))
    }

    pub fn with_retry_policy(mut self, policy: RetryPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_sleeper(mut self, sleeper: Arc<dyn Sleeper>) -> Self {
        self.sleeper = sleeper;
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Build the single user message for an analysis: prompt, then media.
    pub fn build_message(media: &MediaReference, prompt: &str, kind: MediaKind) -> ChatMessage {
        let url = media.media_url();
        let media_part = match kind {
            MediaKind::Image => ContentPart::image_url(url),
            MediaKind::Video => ContentPart::video_url(url),
        };
        ChatMessage::user_parts(vec![ContentPart::text(prompt), media_part])
    }

    /// Ask the model about one piece of media.
    #[instrument(skip(self, media, prompt), fields(kind = %kind, local = media.is_local))]
    pub async fn analyze(
        &self,
        media: &MediaReference,
        prompt: &str,
        kind: MediaKind,
    ) -> Result<String> {
        let message = Self::build_message(media, prompt, kind);
        self.send(vec![message]).await
    }

    /// Send a conversation and return the first choice's content.
    ///
    /// Network, HTTP status, parse and missing-content failures are retried up
    /// to the policy's attempt limit; the last such error is returned once the
    /// attempts run out. Any other error ends the call immediately.
    #[instrument(skip(self, messages), fields(model = %self.model, messages = messages.len()))]
    pub async fn send(&self, messages: Vec<ChatMessage>) -> Result<String> {
        let request = ChatRequest {
            model: self.model.clone(),
            messages,
        };
        let max_attempts = self.policy.max_attempts;

        let mut state = if max_attempts == 0 {
            AttemptState::Failed
        } else {
            AttemptState::Attempting(1)
        };
        let mut answer = None;
        let mut last_error = None;

        while !state.is_terminal() {
            state = match state {
                AttemptState::Attempting(attempt) => match self.attempt(&request).await {
                    Ok(content) => {
                        info!("Completion succeeded on attempt {}", attempt);
                        answer = Some(content);
                        AttemptState::Done
                    }
                    Err(e) if e.is_retryable() && attempt < max_attempts => {
                        warn!("Attempt {}/{} failed: {}", attempt, max_attempts, e);
                        last_error = Some(e);
                        AttemptState::Waiting(attempt)
                    }
                    Err(e) => {
                        warn!("Attempt {}/{} failed, giving up: {}", attempt, max_attempts, e);
                        last_error = Some(e);
                        AttemptState::Failed
                    }
                },
                AttemptState::Waiting(attempt) => {
                    let delay = self.policy.delay_after(attempt);
                    debug!("Backing off for {:?}", delay);
                    self.sleeper.sleep(delay).await;
                    AttemptState::Attempting(attempt + 1)
                }
                terminal => terminal,
            };
        }

        match (answer, last_error) {
            (Some(content), _) => Ok(content),
            (None, Some(e)) => Err(e),
            (None, None) => Err(SightError::MaxRetriesExceeded),
        }
    }

    async fn attempt(&self, request: &ChatRequest) -> Result<String> {
        let response = self.transport.post(request).await?;

        if !response.is_success() {
            return Err(SightError::Api {
                status: response.status,
                message: truncate(&response.body, MAX_ERROR_BODY_CHARS),
            });
        }

        let body: Value =
            serde_json::from_str(&response.body).map_err(|e| SightError::Parse(e.to_string()))?;

        extract_content(&body)
            .map(str::to_string)
            .ok_or(SightError::MissingContent)
    }
}

/// Truncate text with ellipsis, on a character boundary.
fn truncate(s: &str, max_chars: usize) -> String {
    match s.char_indices().nth(max_chars) {
        Some((idx, _)) => format!("{}...", &s[..idx]),
        None => s.to_string(),
    }
}

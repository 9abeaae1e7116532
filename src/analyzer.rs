//! Analysis pipeline for Sight.
//!
//! Resolves a media source and asks the completion client about it.

use crate::chat::CompletionClient;
use crate::config::Settings;
use crate::error::Result;
use crate::media::{ContentResolver, MediaKind};
use tracing::{info, instrument, warn};

/// Default prompt for image analysis.
pub const DEFAULT_IMAGE_PROMPT: &str = "Describe this image in detail.";

/// Default prompt for video analysis.
pub const DEFAULT_VIDEO_PROMPT: &str = "Describe this video in detail.";

/// Resolver plus completion client, built once at startup.
pub struct Analyzer {
    resolver: ContentResolver,
    client: CompletionClient,
}

impl Analyzer {
    pub fn new(resolver: ContentResolver, client: CompletionClient) -> Self {
        Self { resolver, client }
    }

    /// Build an analyzer from settings. Fails if no API key is configured.
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        let resolver = ContentResolver::new(settings.media_limits());
        let client = CompletionClient::from_settings(settings)?;
        info!("Analyzer ready (model {})", client.model());
        Ok(Self::new(resolver, client))
    }

    pub async fn analyze_image(&self, source: &str, prompt: &str) -> Result<String> {
        self.analyze(source, prompt, MediaKind::Image).await
    }

    pub async fn analyze_video(&self, source: &str, prompt: &str) -> Result<String> {
        self.analyze(source, prompt, MediaKind::Video).await
    }

    /// Resolve `source` and ask the model `prompt` about it as `kind`.
    #[instrument(skip(self, prompt), fields(kind = %kind))]
    pub async fn analyze(&self, source: &str, prompt: &str, kind: MediaKind) -> Result<String> {
        let media = self.resolver.resolve_with_hint(source, Some(kind)).await?;

        if media.category != kind {
            warn!(
                "Source looks like {} but is being analyzed as {}",
                media.category, kind
            );
        }

        let prompt = if prompt.trim().is_empty() {
            default_prompt(kind)
        } else {
            prompt
        };

        self.client.analyze(&media, prompt, kind).await
    }
}

pub fn default_prompt(kind: MediaKind) -> &'static str {
    match kind {
        MediaKind::Image => DEFAULT_IMAGE_PROMPT,
        MediaKind::Video => DEFAULT_VIDEO_PROMPT,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chat::{ChatRequest, ChatTransport, ContentPart, MessageContent, TransportResponse};
    use crate::error::SightError;
    use async_trait::async_trait;
    use std::sync::{Arc, Mutex};

    /// Always answers with the same content and remembers what it was sent.
    #[derive(Default)]
    struct EchoTransport {
        requests: Mutex<Vec<ChatRequest>>,
    }

    #[async_trait]
    impl ChatTransport for EchoTransport {
        async fn post(&self, request: &ChatRequest) -> Result<TransportResponse> {
            self.requests.lock().unwrap().push(request.clone());
            Ok(TransportResponse {
                status: 200,
                body: r#"{"choices":[{"message":{"content":"a cat"}}]}"#.to_string(),
            })
        }
    }

    fn analyzer(transport: Arc<EchoTransport>) -> Analyzer {
        Analyzer::new(
            ContentResolver::default(),
            CompletionClient::new(transport, "gpt-4o"),
        )
    }

    fn parts(transport: &EchoTransport) -> Vec<ContentPart> {
        let requests = transport.requests.lock().unwrap();
        match &requests[0].messages[0].content {
            MessageContent::Parts(parts) => parts.clone(),
            other => panic!("expected parts, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_local_image_is_sent_inline() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cat.png");
        std::fs::write(&path, b"0123456789").unwrap();

        let transport = Arc::new(EchoTransport::default());
        let answer = analyzer(transport.clone())
            .analyze_image(path.to_str().unwrap(), "describe this")
            .await
            .unwrap();

        assert_eq!(answer, "a cat");
        assert_eq!(
            parts(&transport),
            vec![
                ContentPart::text("describe this"),
                ContentPart::image_url("data:image/png;base64,MDEyMzQ1Njc4OQ=="),
            ]
        );
    }

    #[tokio::test]
    async fn test_remote_video_uses_default_prompt() {
        let transport = Arc::new(EchoTransport::default());
        analyzer(transport.clone())
            .analyze_video("https://example.com/clip", "  ")
            .await
            .unwrap();

        assert_eq!(
            parts(&transport),
            vec![
                ContentPart::text(DEFAULT_VIDEO_PROMPT),
                ContentPart::video_url("https://example.com/clip"),
            ]
        );
    }

    #[tokio::test]
    async fn test_resolver_errors_skip_the_endpoint() {
        let transport = Arc::new(EchoTransport::default());
        let err = analyzer(transport.clone())
            .analyze_image("/definitely/missing.jpg", "hi")
            .await
            .unwrap_err();

        assert!(matches!(err, SightError::NotFound(_)));
        assert!(transport.requests.lock().unwrap().is_empty());
    }
}

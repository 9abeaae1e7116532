//! Inline `data:` URI encoding for local media.

use crate::error::{Result, SightError};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};

/// Self-describing embedded file contents: a MIME type plus a base64 payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InlineData {
    pub mime: String,
    pub data: String,
}

impl InlineData {
    /// Encode raw bytes.
    pub fn encode(mime: &str, bytes: &[u8]) -> Self {
        Self {
            mime: mime.to_string(),
            data: BASE64.encode(bytes),
        }
    }

    /// Render as `data:<mime>;base64,<payload>`.
    pub fn to_data_uri(&self) -> String {
        format!("data:{};base64,{}", self.mime, self.data)
    }

    /// Parse a `data:<mime>;base64,<payload>` URI.
    pub fn parse(uri: &str) -> Result<Self> {
        let rest = uri
            .strip_prefix("data:")
            .ok_or_else(|| SightError::InvalidInput("not a data URI".to_string()))?;
        let (mime, data) = rest
            .split_once(";base64,")
            .ok_or_else(|| SightError::InvalidInput("data URI is not base64-encoded".to_string()))?;

        Ok(Self {
            mime: mime.to_string(),
            data: data.to_string(),
        })
    }

    /// Decode the payload back to raw bytes.
    pub fn decode(&self) -> Result<Vec<u8>> {
        BASE64
            .decode(&self.data)
            .map_err(|e| SightError::InvalidInput(format!("invalid base64 payload: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_uri_roundtrip() {
        let bytes: Vec<u8> = (0u8..=255).collect();
        let inline = InlineData::encode("image/png", &bytes);

        let uri = inline.to_data_uri();
        assert!(uri.starts_with("data:image/png;base64,"));

        let parsed = InlineData::parse(&uri).unwrap();
        assert_eq!(parsed, inline);
        assert_eq!(parsed.decode().unwrap(), bytes);
    }

    #[test]
    fn test_known_encoding() {
        let inline = InlineData::encode("video/mp4", b"hello");
        assert_eq!(inline.to_data_uri(), "data:video/mp4;base64,aGVsbG8=");
    }

    #[test]
    fn test_parse_rejects_plain_urls() {
        assert!(InlineData::parse("https://example.com/a.png").is_err());
        assert!(InlineData::parse("data:image/png,rawtext").is_err());
    }
}

//! Media references for Sight.
//!
//! Turns a user-supplied source (local path or remote URL) into something a
//! multimodal chat request can carry: either the URL itself or an inline
//! `data:` URI built from the file's bytes.

mod inline;
mod resolver;

pub use inline::InlineData;
pub use resolver::{ContentResolver, MediaLimits};

use crate::error::{Result, SightError};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Supported image file extensions.
pub const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg"];

/// Supported video file extensions.
pub const VIDEO_EXTENSIONS: &[&str] = &["mp4", "mov", "m4v"];

/// Category of a media reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Image,
    Video,
}

impl MediaKind {
    /// Capitalized label used in user-facing messages.
    pub fn label(&self) -> &'static str {
        match self {
            MediaKind::Image => "Image",
            MediaKind::Video => "Video",
        }
    }
}

impl std::fmt::Display for MediaKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MediaKind::Image => write!(f, "image"),
            MediaKind::Video => write!(f, "video"),
        }
    }
}

impl std::str::FromStr for MediaKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "image" => Ok(MediaKind::Image),
            "video" => Ok(MediaKind::Video),
            _ => Err(format!("Unknown media kind: {}", s)),
        }
    }
}

/// The resolved form of a user-supplied media source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaReference {
    /// Absolute filesystem path, or the original URL for remote sources.
    pub path: String,
    /// Size in bytes; 0 for remote sources.
    pub size_bytes: u64,
    pub category: MediaKind,
    pub is_local: bool,
    /// Embedded file contents; present only for local sources.
    pub inline_data: Option<InlineData>,
}

impl MediaReference {
    pub(crate) fn remote(url: &str, category: MediaKind) -> Self {
        Self {
            path: url.to_string(),
            size_bytes: 0,
            category,
            is_local: false,
            inline_data: None,
        }
    }

    pub(crate) fn local(path: String, size_bytes: u64, category: MediaKind, inline: InlineData) -> Self {
        Self {
            path,
            size_bytes,
            category,
            is_local: true,
            inline_data: Some(inline),
        }
    }

    /// The URL to place in a chat media part.
    pub fn media_url(&self) -> String {
        match &self.inline_data {
            Some(inline) => inline.to_data_uri(),
            None => self.path.clone(),
        }
    }
}

/// Whether a source string refers to remote content.
pub fn is_remote(source: &str) -> bool {
    source.starts_with("http://") || source.starts_with("https://")
}

/// Lowercased extension of a path or URL, without the leading dot.
///
/// For URLs only the path component is considered, so query strings and
/// fragments do not leak into the extension.
pub fn extension_of(reference: &str) -> Option<String> {
    let path = if is_remote(reference) {
        match url::Url::parse(reference) {
            Ok(url) => url.path().to_string(),
            Err(_) => reference.to_string(),
        }
    } else {
        reference.to_string()
    };

    Path::new(&path)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_lowercase())
}

/// Classify a path or URL as image or video by its extension.
pub fn classify_extension(reference: &str) -> Result<MediaKind> {
    let extension = extension_of(reference).unwrap_or_default();

    if IMAGE_EXTENSIONS.contains(&extension.as_str()) {
        Ok(MediaKind::Image)
    } else if VIDEO_EXTENSIONS.contains(&extension.as_str()) {
        Ok(MediaKind::Video)
    } else if extension.is_empty() {
        Err(SightError::UnsupportedFormat("(no extension)".to_string()))
    } else {
        Err(SightError::UnsupportedFormat(extension))
    }
}

/// MIME type for a supported extension.
pub fn mime_for_extension(extension: &str) -> &'static str {
    match extension {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "mp4" | "m4v" => "video/mp4",
        "mov" => "video/quicktime",
        _ => "application/octet-stream",
    }
}

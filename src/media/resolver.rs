//! Content resolver: validates a media source and produces a [`MediaReference`].

use super::{
    classify_extension, extension_of, is_remote, mime_for_extension, InlineData, MediaKind,
    MediaReference,
};
use crate::error::{Result, SightError};
use std::path::{Component, Path, PathBuf};
use tracing::{debug, info, instrument};

const MIB: u64 = 1024 * 1024;

/// Per-category size ceilings for local media.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MediaLimits {
    pub max_image_bytes: u64,
    pub max_video_bytes: u64,
}

impl MediaLimits {
    pub fn max_bytes(&self, kind: MediaKind) -> u64 {
        match kind {
            MediaKind::Image => self.max_image_bytes,
            MediaKind::Video => self.max_video_bytes,
        }
    }
}

impl Default for MediaLimits {
    fn default() -> Self {
        Self {
            max_image_bytes: 5 * MIB,
            max_video_bytes: 8 * MIB,
        }
    }
}

/// Resolves local paths and remote URLs into media references.
#[derive(Debug, Clone, Default)]
pub struct ContentResolver {
    limits: MediaLimits,
}

impl ContentResolver {
    pub fn new(limits: MediaLimits) -> Self {
        Self { limits }
    }

    /// Resolve a source with no category hint.
    pub async fn resolve(&self, source: &str) -> Result<MediaReference> {
        self.resolve_with_hint(source, None).await
    }

    /// Resolve a source.
    ///
    /// Remote URLs are passed through unvalidated; when their extension is not
    /// recognized the category falls back to `hint`, then to image.
    #[instrument(skip(self))]
    pub async fn resolve_with_hint(
        &self,
        source: &str,
        hint: Option<MediaKind>,
    ) -> Result<MediaReference> {
        if source.trim().is_empty() {
            return Err(SightError::InvalidInput("media source is required".to_string()));
        }

        if is_remote(source) {
            let category = match classify_extension(source) {
                Ok(kind) => kind,
                Err(_) => {
                    let fallback = hint.unwrap_or(MediaKind::Image);
                    debug!("Unrecognized remote extension, treating as {}", fallback);
                    fallback
                }
            };
            debug!("Passing remote {} through by URL", category);
            return Ok(MediaReference::remote(source, category));
        }

        let path = absolute_path(source)?;
        self.resolve_local(&path).await
    }

    async fn resolve_local(&self, path: &Path) -> Result<MediaReference> {
        let display = path.display().to_string();

        if !path.exists() {
            return Err(SightError::NotFound(display));
        }

        let metadata = tokio::fs::metadata(path).await?;
        if !metadata.is_file() {
            return Err(SightError::InvalidInput(format!("not a regular file: {}", display)));
        }

        let category = classify_extension(&display)?;
        let extension = extension_of(&display).unwrap_or_default();
        let max_bytes = self.limits.max_bytes(category);

        if metadata.len() > max_bytes {
            return Err(too_large(category, max_bytes));
        }

        let bytes = tokio::fs::read(path).await?;

        // The file may have grown between stat and read.
        if bytes.len() as u64 > max_bytes {
            return Err(too_large(category, max_bytes));
        }

        let inline = InlineData::encode(mime_for_extension(&extension), &bytes);
        info!("Encoded local {} ({} bytes) as {}", category, bytes.len(), inline.mime);

        Ok(MediaReference::local(display, bytes.len() as u64, category, inline))
    }
}

fn too_large(category: MediaKind, max_bytes: u64) -> SightError {
    SightError::TooLarge {
        category: category.label().to_string(),
        max_mb: max_bytes / MIB,
    }
}

/// Expand `~` and make the path absolute against the working directory.
///
/// `.` and `..` are resolved lexically; symlinks are not followed.
fn absolute_path(source: &str) -> Result<PathBuf> {
    let expanded = PathBuf::from(shellexpand::tilde(source).to_string());
    let joined = if expanded.is_absolute() {
        expanded
    } else {
        std::env::current_dir()?.join(expanded)
    };

    let mut normalized = PathBuf::new();
    for component in joined.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                normalized.pop();
            }
            other => normalized.push(other.as_os_str()),
        }
    }
    Ok(normalized)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::io::Write;

    fn write_file(dir: &Path, name: &str, bytes: &[u8]) -> PathBuf {
        let path = dir.join(name);
        let mut file = File::create(&path).unwrap();
        file.write_all(bytes).unwrap();
        path
    }

    #[tokio::test]
    async fn test_local_png_is_inlined() {
        let dir = tempfile::tempdir().unwrap();
        let bytes = [0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a, 0x00, 0x01];
        let path = write_file(dir.path(), "cat.png", &bytes);

        let resolver = ContentResolver::default();
        let reference = resolver.resolve(path.to_str().unwrap()).await.unwrap();

        assert!(reference.is_local);
        assert_eq!(reference.category, MediaKind::Image);
        assert_eq!(reference.size_bytes, 10);
        assert_eq!(reference.path, path.display().to_string());

        let inline = reference.inline_data.as_ref().unwrap();
        assert_eq!(inline.mime, "image/png");
        assert_eq!(inline.decode().unwrap(), bytes);
        assert!(reference.media_url().starts_with("data:image/png;base64,"));
    }

    #[tokio::test]
    async fn test_uppercase_video_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(dir.path(), "clip.MOV", b"not really a movie");

        let reference = ContentResolver::default()
            .resolve(path.to_str().unwrap())
            .await
            .unwrap();

        assert_eq!(reference.category, MediaKind::Video);
        assert_eq!(reference.inline_data.unwrap().mime, "video/quicktime");
    }

    #[tokio::test]
    async fn test_remote_urls_pass_through() {
        let resolver = ContentResolver::default();

        for url in [
            "https://example.com/image.jpg",
            "http://example.com/does/not/exist.mp4",
        ] {
            let reference = resolver.resolve(url).await.unwrap();
            assert!(!reference.is_local);
            assert_eq!(reference.path, url);
            assert_eq!(reference.size_bytes, 0);
            assert!(reference.inline_data.is_none());
        }
    }

    #[tokio::test]
    async fn test_remote_unknown_extension_uses_hint() {
        let resolver = ContentResolver::default();

        let reference = resolver
            .resolve_with_hint("https://example.com/stream?id=42", Some(MediaKind::Video))
            .await
            .unwrap();
        assert_eq!(reference.category, MediaKind::Video);

        let reference = resolver.resolve("https://example.com/render").await.unwrap();
        assert_eq!(reference.category, MediaKind::Image);
    }

    #[tokio::test]
    async fn test_empty_source_is_invalid() {
        let resolver = ContentResolver::default();
        assert!(matches!(resolver.resolve("").await, Err(SightError::InvalidInput(_))));
        assert!(matches!(resolver.resolve("   ").await, Err(SightError::InvalidInput(_))));
    }

    #[tokio::test]
    async fn test_missing_file_is_not_found() {
        let resolver = ContentResolver::default();
        let result = resolver.resolve("/non/existent/file.png").await;
        assert!(matches!(result, Err(SightError::NotFound(p)) if p.contains("file.png")));
    }

    #[tokio::test]
    async fn test_unsupported_format() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(dir.path(), "test.txt", b"test content");

        let result = ContentResolver::default().resolve(path.to_str().unwrap()).await;
        assert!(matches!(result, Err(SightError::UnsupportedFormat(ext)) if ext == "txt"));
    }

    #[tokio::test]
    async fn test_image_over_ceiling_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("huge.jpg");
        let file = File::create(&path).unwrap();
        file.set_len(5 * MIB + 1).unwrap();

        let result = ContentResolver::default().resolve(path.to_str().unwrap()).await;
        match result {
            Err(err @ SightError::TooLarge { .. }) => {
                assert_eq!(err.to_string(), "Image file too large. Maximum size is 5MB");
            }
            other => panic!("expected TooLarge, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_video_ceiling_is_separate() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("clip.mp4");
        let file = File::create(&path).unwrap();
        file.set_len(6 * MIB).unwrap();

        // Over the image ceiling but within the video one.
        let reference = ContentResolver::default()
            .resolve(path.to_str().unwrap())
            .await
            .unwrap();
        assert_eq!(reference.category, MediaKind::Video);
        assert_eq!(reference.size_bytes, 6 * MIB);

        let limits = MediaLimits { max_image_bytes: 5 * MIB, max_video_bytes: 4 * MIB };
        let result = ContentResolver::new(limits).resolve(path.to_str().unwrap()).await;
        assert!(matches!(result, Err(SightError::TooLarge { max_mb: 4, .. })));
    }

    #[tokio::test]
    async fn test_directory_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("album.png");
        std::fs::create_dir(&path).unwrap();

        let result = ContentResolver::default().resolve(path.to_str().unwrap()).await;
        assert!(matches!(result, Err(SightError::InvalidInput(_))));
    }

    #[test]
    fn test_relative_paths_are_normalized() {
        let cwd = std::env::current_dir().unwrap();

        assert_eq!(absolute_path("./cat.png").unwrap(), cwd.join("cat.png"));
        assert_eq!(absolute_path("cat.png").unwrap(), cwd.join("cat.png"));
        assert_eq!(
            absolute_path("photos/../cat.png").unwrap(),
            cwd.join("cat.png")
        );
        assert_eq!(
            absolute_path("/srv/./media/../cat.png").unwrap(),
            PathBuf::from("/srv/cat.png")
        );
    }

    #[test]
    fn test_tilde_is_expanded() {
        let home = dirs::home_dir().unwrap();
        assert_eq!(absolute_path("~/cat.png").unwrap(), home.join("cat.png"));
    }

    #[tokio::test]
    async fn test_missing_relative_path_reports_clean_absolute_path() {
        let expected = std::env::current_dir()
            .unwrap()
            .join("no-such-dir-for-sight")
            .join("cat.png");

        let result = ContentResolver::default()
            .resolve("./no-such-dir-for-sight/./cat.png")
            .await;
        assert!(matches!(
            result,
            Err(SightError::NotFound(p)) if p == expected.display().to_string()
        ));
    }
}

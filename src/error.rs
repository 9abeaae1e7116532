//! Error types for Sight.

use thiserror::Error;

/// Library-level error type for Sight operations.
#[derive(Error, Debug)]
pub enum SightError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("File not found: {0}")]
    NotFound(String),

    #[error("Unsupported file format: {0}")]
    UnsupportedFormat(String),

    #[error("{category} file too large. Maximum size is {max_mb}MB")]
    TooLarge { category: String, max_mb: u64 },

    #[error("Network error: {0}")]
    Network(String),

    #[error("API error: HTTP {status}: {message}")]
    Api { status: u16, message: String },

    #[error("JSON parse failed: {0}")]
    Parse(String),

    #[error("No content returned from API")]
    MissingContent,

    #[error("Max retries exceeded")]
    MaxRetriesExceeded,

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),
}

/// Closed classification of [`SightError`] variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    InvalidInput,
    NotFound,
    UnsupportedFormat,
    TooLarge,
    Network,
    Api,
    Parse,
    MissingContent,
    MaxRetriesExceeded,
    Config,
    Io,
}

impl SightError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            SightError::InvalidInput(_) => ErrorKind::InvalidInput,
            SightError::NotFound(_) => ErrorKind::NotFound,
            SightError::UnsupportedFormat(_) => ErrorKind::UnsupportedFormat,
            SightError::TooLarge { .. } => ErrorKind::TooLarge,
            SightError::Network(_) => ErrorKind::Network,
            SightError::Api { .. } => ErrorKind::Api,
            SightError::Parse(_) => ErrorKind::Parse,
            SightError::MissingContent => ErrorKind::MissingContent,
            SightError::MaxRetriesExceeded => ErrorKind::MaxRetriesExceeded,
            SightError::Config(_) | SightError::TomlParse(_) => ErrorKind::Config,
            SightError::Io(_) => ErrorKind::Io,
        }
    }

    /// Stable code shown to tool callers next to the message.
    pub fn code(&self) -> &'static str {
        match self.kind() {
            ErrorKind::InvalidInput => "INVALID_INPUT",
            ErrorKind::NotFound => "FILE_NOT_FOUND",
            ErrorKind::UnsupportedFormat => "UNSUPPORTED_FORMAT",
            ErrorKind::TooLarge => "FILE_TOO_LARGE",
            ErrorKind::Network => "NETWORK_ERROR",
            ErrorKind::Api => "API_ERROR",
            ErrorKind::Parse => "PARSE_ERROR",
            ErrorKind::MissingContent => "MISSING_CONTENT",
            ErrorKind::MaxRetriesExceeded => "MAX_RETRIES_EXCEEDED",
            ErrorKind::Config => "CONFIG_ERROR",
            ErrorKind::Io => "IO_ERROR",
        }
    }

    /// Whether a completion attempt that failed with this error may be retried.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self.kind(),
            ErrorKind::Network | ErrorKind::Api | ErrorKind::Parse | ErrorKind::MissingContent
        )
    }
}

/// Result type alias for Sight operations.
pub type Result<T> = std::result::Result<T, SightError>;

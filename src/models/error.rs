use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

/// Maximum number of characters kept in a diagnostic excerpt
pub const EXCERPT_LIMIT: usize = 500;

/// Failures of a single digest analysis that are reported back to the caller as data
#[derive(Debug, Error)]
pub enum DigestError {
    /// No API credential was supplied
    #[error("Missing ANTHROPIC_API_KEY credential")]
    Config,

    /// The completion call exceeded the client timeout
    #[error("Claude API timed out after {secs} seconds. Try again or reduce transcript length.")]
    Timeout { secs: u64 },

    /// The provider answered with a non-2xx status
    #[error("Claude API request failed")]
    Provider { status: u16, body: String },

    /// The sanitized reply still was not a JSON object
    #[error("Failed to parse Claude response as JSON")]
    JsonDecode {
        message: String,
        raw_excerpt: String,
        sanitized_excerpt: String,
    },

    /// Anything else that went wrong while handling the provider payload
    #[error("Failed to parse Claude response")]
    Unexpected { detail: String, raw_response: Value },

    /// Network failure other than a timeout.
    ///
    /// `analyze` propagates this as a fault instead of returning it as data.
    /// Callers driving `AnthropicClient::complete` themselves may still convert
    /// it into an [`ErrorResult`] of kind `TransportError`.
    #[error("Failed to send request to Anthropic API")]
    Transport(#[source] reqwest::Error),
}

/// Discriminant of an [`ErrorResult`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ErrorKind {
    ConfigError,
    Timeout,
    ProviderError,
    #[serde(rename = "JSONDecodeError")]
    JsonDecodeError,
    UnexpectedError,
    /// Only produced when a caller converts [`DigestError::Transport`] itself
    TransportError,
}

impl DigestError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            DigestError::Config => ErrorKind::ConfigError,
            DigestError::Timeout { .. } => ErrorKind::Timeout,
            DigestError::Provider { .. } => ErrorKind::ProviderError,
            DigestError::JsonDecode { .. } => ErrorKind::JsonDecodeError,
            DigestError::Unexpected { .. } => ErrorKind::UnexpectedError,
            DigestError::Transport(_) => ErrorKind::TransportError,
        }
    }

    /// Build a decode error, bounding both excerpts
    pub fn json_decode(message: impl Into<String>, raw: &str, sanitized: &str) -> Self {
        DigestError::JsonDecode {
            message: message.into(),
            raw_excerpt: excerpt(raw),
            sanitized_excerpt: excerpt(sanitized),
        }
    }
}

/// Serializable error shape handed to the presentation layer
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ErrorResult {
    pub error: String,
    pub kind: ErrorKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw_excerpt: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sanitized_excerpt: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exception: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw_response: Option<Value>,
}

impl ErrorResult {
    fn bare(error: String, kind: ErrorKind) -> Self {
        Self {
            error,
            kind,
            status: None,
            details: None,
            raw_excerpt: None,
            sanitized_excerpt: None,
            exception: None,
            raw_response: None,
        }
    }
}

impl From<DigestError> for ErrorResult {
    fn from(err: DigestError) -> Self {
        let mut result = ErrorResult::bare(err.to_string(), err.kind());
        match err {
            DigestError::Config | DigestError::Timeout { .. } => {}
            DigestError::Provider { status, body } => {
                result.status = Some(status);
                result.details = Some(body);
            }
            DigestError::JsonDecode {
                message,
                raw_excerpt,
                sanitized_excerpt,
            } => {
                result.exception = Some(message);
                result.raw_excerpt = Some(raw_excerpt);
                result.sanitized_excerpt = Some(sanitized_excerpt);
            }
            DigestError::Unexpected {
                detail,
                raw_response,
            } => {
                result.exception = Some(detail);
                result.raw_response = Some(raw_response);
            }
            DigestError::Transport(source) => {
                result.exception = Some(source.to_string());
            }
        }
        result
    }
}

/// Truncate text to [`EXCERPT_LIMIT`] characters, marking the cut with `...`
pub fn excerpt(text: &str) -> String {
    match text.char_indices().nth(EXCERPT_LIMIT) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_string(),
    }
}

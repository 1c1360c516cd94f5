//! Typed error enum for the summarize crate.

use thiserror::Error;

/// Errors from summarization API operations.
#[derive(Debug, Error)]
pub enum SummarizeError {
    #[error("HTTP request failed: {0}")]
    HttpRequest(#[from] reqwest::Error),
    #[error("HTTP status {code}: {body}")]
    HttpStatus { code: u16, body: String },
    #[error("JSON parse error in {context}: {source}")]
    JsonParse {
        context: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("response carried an empty summary")]
    EmptySummary,
    #[error("client initialization failed: {0}")]
    ClientInit(String),
}

impl SummarizeError {
    /// Whether this error is transient. Callers fall back to the local
    /// digest either way; this only informs log verbosity.
    #[must_use]
    pub const fn is_transient(&self) -> bool {
        match self {
            Self::HttpRequest(_) => true,
            Self::HttpStatus { code, .. } => matches!(*code, 429 | 500 | 502 | 503),
            _ => false,
        }
    }
}

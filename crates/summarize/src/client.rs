use casenotes_core::truncate;

use crate::error::SummarizeError;
use crate::types::{SummarizeRequest, SummarizeResponse};

/// Request timeout; a digest is cosmetic, so give up early.
const REQUEST_TIMEOUT_SECS: u64 = 10;

/// Client for the summarization endpoint.
pub struct SummarizeClient {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

impl std::fmt::Debug for SummarizeClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SummarizeClient")
            .field("base_url", &self.base_url)
            .field("api_key", &self.api_key.as_ref().map(|_| "***"))
            .finish_non_exhaustive()
    }
}

impl SummarizeClient {
    /// Creates a new client for the given endpoint, with an optional bearer
    /// token.
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be built (TLS backend
    /// failure).
    pub fn new(base_url: String, api_key: Option<String>) -> Result<Self, SummarizeError> {
        let base_url = base_url.trim_end_matches('/').to_owned();
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|e| SummarizeError::ClientInit(e.to_string()))?;
        Ok(Self { client, base_url, api_key })
    }

    /// Returns the base URL.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Summarize a page of note texts.
    ///
    /// No retry loop: a failure here means the caller renders the local
    /// digest instead, so retrying would only delay the page.
    ///
    /// # Errors
    /// Returns an error if the HTTP request fails, the API returns a
    /// non-success status, the body cannot be parsed, or the summary is
    /// empty after trimming.
    pub async fn summarize(&self, texts: &[String]) -> Result<String, SummarizeError> {
        let mut request = self
            .client
            .post(format!("{}/v1/summaries", self.base_url))
            .json(&SummarizeRequest { texts });
        if let Some(key) = &self.api_key {
            request = request.header("Authorization", format!("Bearer {key}"));
        }

        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            tracing::debug!(status = %status, "summarization endpoint returned non-success");
            return Err(SummarizeError::HttpStatus { code: status.as_u16(), body });
        }

        let parsed: SummarizeResponse =
            serde_json::from_str(&body).map_err(|e| SummarizeError::JsonParse {
                context: format!("summary response (body: {})", truncate(&body, 200)),
                source: e,
            })?;

        if parsed.summary.trim().is_empty() {
            return Err(SummarizeError::EmptySummary);
        }
        Ok(parsed.summary)
    }
}

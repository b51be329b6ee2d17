//! Raw HTTP client for the Gemini `generateContent` API.
//!
//! No pipeline awareness — just makes API calls via reqwest.

use std::time::Duration;

use reqwest::Client;

use super::types::{GenerateContentRequest, GenerateContentResponse};

/// Errors from LLM operations.
#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    ApiError { status: u16, message: String },

    #[error("rate limited (retry after {retry_after:?}s)")]
    RateLimited { retry_after: Option<u64> },

    #[error("invalid response: {0}")]
    InvalidResponse(String),

    #[error("response contained no text (finish reason: {0})")]
    EmptyResponse(String),
}

/// Raw HTTP client for the Gemini API.
#[derive(Debug)]
pub struct GeminiClient {
    http: Client,
    api_key: String,
    base_url: String,
}

impl GeminiClient {
    /// Create a client for `base_url` (the public endpoint, or a mock server
    /// in tests).
    pub fn with_base_url(
        api_key: String,
        base_url: String,
        timeout: Duration,
    ) -> Result<Self, LlmError> {
        let http = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Send a generateContent request for `model`.
    pub async fn generate_content(
        &self,
        model: &str,
        request: &GenerateContentRequest,
    ) -> Result<GenerateContentResponse, LlmError> {
        let url = format!("{}/v1beta/models/{}:generateContent", self.base_url, model);

        let response = self
            .http
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .header("content-type", "application/json")
            .json(request)
            .send()
            .await?;

        let status = response.status().as_u16();

        if status == 429 {
            let retry_after = response
                .headers()
                .get("retry-after")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse::<u64>().ok());
            return Err(LlmError::RateLimited { retry_after });
        }

        if status >= 400 {
            let body = response.text().await.unwrap_or_else(|_| "(no body)".into());
            return Err(LlmError::ApiError {
                status,
                message: body,
            });
        }

        let resp: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| LlmError::InvalidResponse(format!("failed to parse response: {e}")))?;

        Ok(resp)
    }
}

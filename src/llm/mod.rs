//! LLM Pool — model routing and connection management for the Gemini API.
//!
//! Wraps GeminiClient with model aliasing and the sampling defaults from
//! configuration. The content generator uses this for every request.

pub mod client;
pub mod types;

use std::time::Duration;

use gamegen_config::{ConfigError, GeminiConfig};
use tracing::debug;

use client::{GeminiClient, LlmError};
use types::{resolve_model, GenerateContentRequest, GenerationConfig};

/// LLM connection pool with model routing.
#[derive(Debug)]
pub struct LlmPool {
    client: GeminiClient,
    default_model: String,
    temperature: f32,
    max_tokens: u32,
}

impl LlmPool {
    /// Create a pool from configuration. Fails without an API key.
    pub fn from_config(config: &GeminiConfig) -> Result<Self, PoolError> {
        let api_key = config.api_key.clone().ok_or(ConfigError::MissingApiKey)?;
        if api_key.is_empty() {
            return Err(ConfigError::MissingApiKey.into());
        }
        let client = GeminiClient::with_base_url(
            api_key,
            config.base_url.clone(),
            Duration::from_secs(config.timeout_secs),
        )?;
        Ok(Self {
            client,
            default_model: resolve_model(&config.model).to_string(),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
        })
    }

    /// Send a single-turn prompt to the default model and return the
    /// response text.
    pub async fn complete(&self, prompt: &str) -> Result<String, LlmError> {
        let request = GenerateContentRequest::user_prompt(
            prompt,
            GenerationConfig {
                temperature: Some(self.temperature),
                max_output_tokens: Some(self.max_tokens),
            },
        );

        let response = self
            .client
            .generate_content(&self.default_model, &request)
            .await?;

        if let Some(usage) = &response.usage_metadata {
            debug!(
                model = %self.default_model,
                prompt_tokens = usage.prompt_token_count,
                output_tokens = usage.candidates_token_count,
                total_tokens = usage.total_token_count,
                "generateContent complete"
            );
        }

        response.text().ok_or_else(|| {
            let reason = response
                .candidates
                .first()
                .and_then(|c| c.finish_reason.clone())
                .unwrap_or_else(|| "no candidates".into());
            LlmError::EmptyResponse(reason)
        })
    }

    /// Get the default model (resolved to full ID).
    pub fn default_model(&self) -> &str {
        &self.default_model
    }
}

/// Errors while building a pool.
#[derive(Debug, thiserror::Error)]
pub enum PoolError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Client(#[from] LlmError),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(model: &str) -> GeminiConfig {
        GeminiConfig {
            api_key: Some("key".into()),
            model: model.into(),
            base_url: "http://127.0.0.1:1".into(),
            timeout_secs: 2,
            ..GeminiConfig::default()
        }
    }

    #[test]
    fn default_model_alias() {
        let pool = LlmPool::from_config(&config("flash")).unwrap();
        assert_eq!(pool.default_model(), "gemini-2.5-flash");
    }

    #[test]
    fn full_model_id_passes_through() {
        let pool = LlmPool::from_config(&config("gemini-1.5-pro-002")).unwrap();
        assert_eq!(pool.default_model(), "gemini-1.5-pro-002");
    }

    #[test]
    fn from_config_missing_key() {
        let config = GeminiConfig::default();
        let err = LlmPool::from_config(&config).unwrap_err();
        assert!(matches!(err, PoolError::Config(ConfigError::MissingApiKey)));
        assert!(err.to_string().contains("GEMINI_API_KEY"));
    }

    #[test]
    fn from_config_empty_key() {
        let config = GeminiConfig {
            api_key: Some(String::new()),
            ..GeminiConfig::default()
        };
        assert!(matches!(
            LlmPool::from_config(&config),
            Err(PoolError::Config(ConfigError::MissingApiKey))
        ));
    }

    #[test]
    fn from_config_keeps_sampling() {
        let config = GeminiConfig {
            temperature: 0.2,
            max_tokens: 512,
            ..config("pro")
        };
        let pool = LlmPool::from_config(&config).unwrap();
        assert_eq!(pool.default_model(), "gemini-2.5-pro");
        assert_eq!(pool.temperature, 0.2);
        assert_eq!(pool.max_tokens, 512);
    }

    #[tokio::test]
    async fn complete_unreachable_is_http_error() {
        let pool = LlmPool::from_config(&config("flash")).unwrap();
        let err = pool.complete("hello").await.unwrap_err();
        assert!(matches!(err, LlmError::Http(_)));
    }
}

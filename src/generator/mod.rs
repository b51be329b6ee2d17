//! Content generation — the port between the pipeline and the model.
//!
//! `ContentGenerator` is the capability every agent consumes. Each call
//! returns a typed `Result`; choosing a fallback is the caller's decision
//! (see `fallback`). `GeminiGenerator` is the production implementation.

pub mod fallback;
pub mod prompts;
#[cfg(test)]
pub(crate) mod stub;

use async_trait::async_trait;
use tracing::info;

use crate::llm::client::LlmError;
use crate::llm::{LlmPool, PoolError};
use crate::model::{AssetDescriptions, Concept, LevelDesign, Size};
use crate::sanitize::{self, ParseFailure};

/// A generation request that produced nothing usable.
#[derive(Debug, thiserror::Error)]
pub enum GenerationFailure {
    #[error("generation request failed: {0}")]
    Llm(#[from] LlmError),

    #[error(transparent)]
    Parse(#[from] ParseFailure),

    #[error("generated code was empty")]
    EmptyCode,
}

/// Turns task descriptions into structured game content.
#[async_trait]
pub trait ContentGenerator: Send + Sync {
    /// A concept for `theme`, or one of the model's choosing.
    async fn generate_concept(&self, theme: Option<&str>) -> Result<Concept, GenerationFailure>;

    /// Base layout for the 1-based level `index`.
    async fn generate_level(
        &self,
        concept: &Concept,
        index: usize,
    ) -> Result<LevelDesign, GenerationFailure>;

    /// Source text of a playable artifact for one (concept, level) pair.
    async fn generate_code(
        &self,
        concept: &Concept,
        level: &LevelDesign,
    ) -> Result<String, GenerationFailure>;

    async fn generate_assets(
        &self,
        concept: &Concept,
    ) -> Result<AssetDescriptions, GenerationFailure>;

    /// Raw text for a free-form prompt. Callers route it through `sanitize`.
    async fn generate_free_form(&self, prompt: &str) -> Result<String, GenerationFailure>;
}

/// Gemini-backed generator.
#[derive(Debug)]
pub struct GeminiGenerator {
    pool: LlmPool,
    field: Size,
}

impl GeminiGenerator {
    pub fn new(pool: LlmPool) -> Self {
        Self {
            pool,
            field: Size::default(),
        }
    }

    /// Playfield size requested in level prompts.
    pub fn with_field(mut self, field: Size) -> Self {
        self.field = field;
        self
    }

    /// Build from configuration. Fails before any request without an API key.
    pub fn from_config(config: &gamegen_config::GamegenConfig) -> Result<Self, PoolError> {
        let field = Size {
            width: i32::try_from(config.game.default_width).unwrap_or(i32::MAX),
            height: i32::try_from(config.game.default_height).unwrap_or(i32::MAX),
        };
        let pool = LlmPool::from_config(&config.gemini)?;
        info!(model = pool.default_model(), "using Gemini model");
        Ok(Self::new(pool).with_field(field))
    }
}

#[async_trait]
impl ContentGenerator for GeminiGenerator {
    async fn generate_concept(&self, theme: Option<&str>) -> Result<Concept, GenerationFailure> {
        let text = self
            .pool
            .complete(&prompts::concept_prompt(theme))
            .await?;
        let concept: Concept = sanitize::parse_json(&text)?;
        info!(title = %concept.title, "generated game concept");
        Ok(concept)
    }

    async fn generate_level(
        &self,
        concept: &Concept,
        index: usize,
    ) -> Result<LevelDesign, GenerationFailure> {
        let text = self
            .pool
            .complete(&prompts::level_prompt(concept, index, self.field))
            .await?;
        let level = sanitize::parse_json(&text)?;
        info!(level = index, "generated level design");
        Ok(level)
    }

    async fn generate_code(
        &self,
        concept: &Concept,
        level: &LevelDesign,
    ) -> Result<String, GenerationFailure> {
        let text = self
            .pool
            .complete(&prompts::code_prompt(concept, level))
            .await?;
        let code = sanitize::strip_fence(&text, "python");
        if code.is_empty() {
            return Err(GenerationFailure::EmptyCode);
        }
        info!(bytes = code.len(), "generated game code");
        Ok(code.to_string())
    }

    async fn generate_assets(
        &self,
        concept: &Concept,
    ) -> Result<AssetDescriptions, GenerationFailure> {
        let text = self
            .pool
            .complete(&prompts::assets_prompt(concept))
            .await?;
        let assets = sanitize::parse_json(&text)?;
        info!("generated asset descriptions");
        Ok(assets)
    }

    async fn generate_free_form(&self, prompt: &str) -> Result<String, GenerationFailure> {
        Ok(self.pool.complete(prompt).await?)
    }
}

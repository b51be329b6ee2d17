//! Scripted generator for tests. No network.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;

use super::{fallback, ContentGenerator, GenerationFailure};
use crate::llm::client::LlmError;
use crate::model::{AssetDescriptions, Concept, LevelDesign};

/// Replays canned content and records every call.
///
/// Concepts are handed out in order; once the queue is empty, concept
/// requests fail. `None` for any other field makes that request fail.
pub struct StubGenerator {
    concepts: Mutex<VecDeque<Concept>>,
    pub level: Option<LevelDesign>,
    pub code: Option<String>,
    pub assets: Option<AssetDescriptions>,
    pub analysis_reply: Option<String>,
    pub style_reply: Option<String>,
    calls: Mutex<Vec<String>>,
}

impl StubGenerator {
    /// Everything succeeds with fallback-shaped content; analysis and
    /// style replies are unset, so those requests fail.
    pub fn new(concepts: Vec<Concept>) -> Self {
        Self {
            concepts: Mutex::new(concepts.into()),
            level: Some(fallback::level(1)),
            code: Some("print('level')".into()),
            assets: Some(fallback::assets()),
            analysis_reply: None,
            style_reply: None,
            calls: Mutex::new(Vec::new()),
        }
    }

    /// A generator where every request fails.
    pub fn failing() -> Self {
        Self {
            level: None,
            code: None,
            assets: None,
            ..Self::new(Vec::new())
        }
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }

    fn unavailable<T>(what: &str) -> Result<T, GenerationFailure> {
        Err(GenerationFailure::Llm(LlmError::ApiError {
            status: 503,
            message: format!("stub has no {what}"),
        }))
    }
}

#[async_trait]
impl ContentGenerator for StubGenerator {
    async fn generate_concept(&self, theme: Option<&str>) -> Result<Concept, GenerationFailure> {
        self.record(format!("concept:{}", theme.unwrap_or("-")));
        match self.concepts.lock().unwrap().pop_front() {
            Some(concept) => Ok(concept),
            None => Self::unavailable("concept"),
        }
    }

    async fn generate_level(
        &self,
        _concept: &Concept,
        index: usize,
    ) -> Result<LevelDesign, GenerationFailure> {
        self.record(format!("level:{index}"));
        match &self.level {
            Some(level) => {
                let mut level = level.clone();
                level.level_number = u32::try_from(index).ok();
                Ok(level)
            }
            None => Self::unavailable("level"),
        }
    }

    async fn generate_code(
        &self,
        _concept: &Concept,
        level: &LevelDesign,
    ) -> Result<String, GenerationFailure> {
        let number = level.level_number.unwrap_or(0);
        self.record(format!("code:{number}"));
        match &self.code {
            Some(code) => Ok(format!("{code}  # level {number}")),
            None => Self::unavailable("code"),
        }
    }

    async fn generate_assets(
        &self,
        _concept: &Concept,
    ) -> Result<AssetDescriptions, GenerationFailure> {
        self.record("assets".into());
        match &self.assets {
            Some(assets) => Ok(assets.clone()),
            None => Self::unavailable("assets"),
        }
    }

    async fn generate_free_form(&self, prompt: &str) -> Result<String, GenerationFailure> {
        let (call, reply) = if prompt.contains("style guide") {
            ("free_form:style", &self.style_reply)
        } else {
            ("free_form:analysis", &self.analysis_reply)
        };
        self.record(call.into());
        match reply {
            Some(text) => Ok(text.clone()),
            None => Self::unavailable("free-form reply"),
        }
    }
}

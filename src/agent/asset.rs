//! Asset agent — visual style guide with a constant fallback.

use std::sync::Arc;

use tracing::{error, info};

use crate::generator::{fallback, prompts, ContentGenerator};
use crate::model::{Concept, StyleGuide};
use crate::sanitize;

pub struct AssetAgent {
    generator: Arc<dyn ContentGenerator>,
}

impl AssetAgent {
    pub fn new(generator: Arc<dyn ContentGenerator>) -> Self {
        Self { generator }
    }

    /// A fully populated style guide. Falls back to `fallback::style_guide`.
    pub async fn style_guide(&self, concept: &Concept) -> StyleGuide {
        let text = match self
            .generator
            .generate_free_form(&prompts::style_guide_prompt(concept))
            .await
        {
            Ok(text) => text,
            Err(e) => {
                error!(title = %concept.title, error = %e, "style guide request failed");
                return fallback::style_guide();
            }
        };

        match sanitize::parse_json(&text) {
            Ok(guide) => {
                info!(title = %concept.title, "style guide ready");
                guide
            }
            Err(e) => {
                error!(title = %concept.title, error = %e, "style guide response unparsable");
                fallback::style_guide()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::stub::StubGenerator;

    const GUIDE: &str = r#"```json
{
  "color_palette": {"primary": "Teal", "secondary": "Sand", "accent": "Coral", "background": "Navy", "text": "Ivory"},
  "art_style": "chunky pixels",
  "ui_style": "rounded panels",
  "animation_style": "bouncy",
  "particle_effects": "bubbles",
  "lighting": "caustics",
  "mood": "hopeful"
}
```"#;

    #[tokio::test]
    async fn parses_generated_guide() {
        let mut stub = StubGenerator::new(vec![]);
        stub.style_reply = Some(GUIDE.into());
        let agent = AssetAgent::new(Arc::new(stub));

        let guide = agent.style_guide(&fallback::concept(Some("turtles"))).await;
        assert_eq!(guide.color_palette.primary, "Teal");
        assert_eq!(guide.mood, "hopeful");
    }

    #[tokio::test]
    async fn partial_guide_falls_back() {
        let mut stub = StubGenerator::new(vec![]);
        stub.style_reply = Some(r#"{"art_style": "pixel"}"#.into());
        let agent = AssetAgent::new(Arc::new(stub));

        let guide = agent.style_guide(&fallback::concept(None)).await;
        assert_eq!(guide, fallback::style_guide());
    }

    #[tokio::test]
    async fn request_failure_falls_back() {
        let agent = AssetAgent::new(Arc::new(StubGenerator::failing()));
        let a = agent.style_guide(&fallback::concept(Some("a"))).await;
        let b = agent.style_guide(&fallback::concept(Some("something else"))).await;
        assert_eq!(a, b);
        assert_eq!(a.color_palette.background, "Black");
    }
}

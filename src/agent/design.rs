//! Design agent — concept variants and critique.

use std::sync::Arc;

use tracing::{error, info, warn};

use crate::generator::{fallback, prompts, ContentGenerator};
use crate::model::{AnalysisReport, Concept};
use crate::sanitize;

/// Variant label fed to the generator for the 1-based variant `k`.
pub fn variant_theme(theme: Option<&str>, k: usize) -> String {
    match theme {
        Some(theme) => format!("{theme} - variant {k}"),
        None => format!("variant {k}"),
    }
}

pub struct DesignAgent {
    generator: Arc<dyn ContentGenerator>,
}

impl DesignAgent {
    pub fn new(generator: Arc<dyn ContentGenerator>) -> Self {
        Self { generator }
    }

    /// `count` concepts, requested one after another, in request order.
    /// A failed request contributes the fallback concept for its variant.
    pub async fn generate_concepts(&self, theme: Option<&str>, count: usize) -> Vec<Concept> {
        let mut concepts = Vec::with_capacity(count);
        for k in 1..=count {
            let variant = variant_theme(theme, k);
            let concept = match self.generator.generate_concept(Some(&variant)).await {
                Ok(concept) => concept,
                Err(e) => {
                    warn!(variant = %variant, error = %e, "concept generation failed, using fallback");
                    fallback::concept(Some(&variant))
                }
            };
            info!(variant = k, title = %concept.title, "concept variant ready");
            concepts.push(concept);
        }
        concepts
    }

    /// Critique one concept. Any failure yields `AnalysisReport::safe_default`.
    pub async fn analyze(&self, concept: &Concept) -> AnalysisReport {
        let text = match self
            .generator
            .generate_free_form(&prompts::analysis_prompt(concept))
            .await
        {
            Ok(text) => text,
            Err(e) => {
                error!(title = %concept.title, error = %e, "analysis request failed");
                return AnalysisReport::safe_default();
            }
        };

        match sanitize::parse_json::<AnalysisReport>(&text) {
            Ok(report) => {
                info!(
                    risk = ?report.risk_level,
                    recommendation = ?report.recommendation,
                    "concept analyzed"
                );
                report
            }
            Err(e) => {
                error!(title = %concept.title, error = %e, "analysis response unparsable");
                AnalysisReport::safe_default()
            }
        }
    }
}

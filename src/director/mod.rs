//! Director — orchestrates the agents into a complete multi-level game.
//!
//! variants → select_best → analyze → (reject ⇒ fallback concept) →
//! level sequence → style guide → package. Selection is a pure function of
//! the variants in generation order, so it is reproducible for a given
//! generator.

use std::path::PathBuf;
use std::sync::Arc;

use chrono::Local;
use futures_util::future::join_all;
use gamegen_config::GamegenConfig;
use tracing::{debug, info, warn};

use crate::agent::{AssetAgent, CreationAgent, DesignAgent, LevelAgent};
use crate::generator::{fallback, ContentGenerator, GeminiGenerator};
use crate::llm::PoolError;
use crate::model::{CompletePackage, Concept, Recommendation};
use crate::packager::{Packager, PersistError};

/// Deterministic desirability score for a concept.
pub fn score(concept: &Concept) -> usize {
    let mut score = 2 * concept.mechanics.len()
        + 3 * concept.enemies.len()
        + 2 * concept.powerups.len();
    if concept.theme.chars().count() > 10 {
        score += 5;
    }
    score
}

/// The concept with the strictly highest score; the earliest wins ties.
pub fn select_best(concepts: Vec<Concept>) -> Option<Concept> {
    let mut best: Option<(usize, Concept)> = None;
    for concept in concepts {
        let s = score(&concept);
        debug!(title = %concept.title, score = s, "scored concept");
        match &best {
            Some((best_score, _)) if s <= *best_score => {}
            _ => best = Some((s, concept)),
        }
    }
    best.map(|(_, concept)| concept)
}

pub struct Director {
    generator: Arc<dyn ContentGenerator>,
    design: DesignAgent,
    levels: LevelAgent,
    assets: AssetAgent,
    packager: Arc<Packager>,
    concept_variants: usize,
    max_levels: usize,
}

impl Director {
    pub fn new(
        config: &GamegenConfig,
        generator: Arc<dyn ContentGenerator>,
        packager: Arc<Packager>,
    ) -> Self {
        let levels = match config.game.seed {
            Some(seed) => LevelAgent::with_seed(generator.clone(), seed),
            None => LevelAgent::new(generator.clone()),
        };
        Self {
            design: DesignAgent::new(generator.clone()),
            levels,
            assets: AssetAgent::new(generator.clone()),
            generator,
            packager,
            concept_variants: config.game.concept_variants,
            max_levels: config.game.max_levels.max(1),
        }
    }

    /// Gemini generator and on-disk packager. Fails before any stage runs
    /// when the configuration cannot reach the service.
    pub fn from_config(config: &GamegenConfig) -> Result<Self, PoolError> {
        let generator = Arc::new(GeminiGenerator::from_config(config)?);
        let packager = Arc::new(Packager::on_disk(&config.directories.games));
        Ok(Self::new(config, generator, packager))
    }

    /// A single-game agent sharing this director's generator and packager.
    pub fn creation_agent(&self) -> CreationAgent {
        CreationAgent::new(self.generator.clone(), self.packager.clone())
    }

    /// Run the full pipeline. `num_levels` is clamped to `1..=max_levels`.
    pub async fn create_complete(
        &mut self,
        theme: Option<&str>,
        num_levels: usize,
    ) -> CompletePackage {
        let num_levels = num_levels.clamp(1, self.max_levels);
        info!(theme = theme.unwrap_or("random"), num_levels, "creating complete game");

        let concepts = self
            .design
            .generate_concepts(theme, self.concept_variants)
            .await;
        let mut concept = select_best(concepts).unwrap_or_else(|| fallback::concept(theme));
        info!(title = %concept.title, score = score(&concept), "selected concept");

        let analysis = self.design.analyze(&concept).await;
        if analysis.recommendation == Recommendation::Reject {
            warn!(title = %concept.title, "concept rejected, using fallback");
            concept = fallback::concept(theme);
        }

        let levels = self.levels.build_sequence(&concept, num_levels).await;
        let style_guide = self.assets.style_guide(&concept).await;

        info!(title = %concept.title, "complete game created");
        CompletePackage {
            concept,
            analysis,
            levels,
            style_guide,
            created_at: Local::now(),
            theme: theme.map(str::to_string),
            num_levels,
        }
    }

    /// Generate code for every level and save the package. Code is requested
    /// fresh for each level; failures substitute the fallback game.
    pub async fn save_complete(&self, package: &CompletePackage) -> Result<PathBuf, PersistError> {
        let requests = package.levels.iter().enumerate().map(|(i, level)| async move {
            match self.generator.generate_code(&package.concept, level).await {
                Ok(code) => code,
                Err(e) => {
                    warn!(level = i + 1, error = %e, "code generation failed, using fallback");
                    fallback::FALLBACK_CODE.to_string()
                }
            }
        });
        // join_all yields results in input order, so file names follow level order.
        let level_code = join_all(requests).await;

        self.packager.save_complete(package, &level_code)
    }
}

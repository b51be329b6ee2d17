//! Creation agent — the single-game pipeline.
//!
//! concept → level 1 → code → assets → package. No branching: every stage
//! that fails contributes its fallback and the next stage runs.

use std::path::PathBuf;
use std::sync::Arc;

use chrono::Local;
use tracing::{info, warn};

use crate::generator::{fallback, ContentGenerator};
use crate::model::GamePackage;
use crate::packager::{Packager, PersistError};

pub struct CreationAgent {
    generator: Arc<dyn ContentGenerator>,
    packager: Arc<Packager>,
    history: Vec<GamePackage>,
}

impl CreationAgent {
    pub fn new(generator: Arc<dyn ContentGenerator>, packager: Arc<Packager>) -> Self {
        Self {
            generator,
            packager,
            history: Vec::new(),
        }
    }

    /// Run the five stages and record the package in the history.
    pub async fn create(&mut self, theme: Option<&str>) -> GamePackage {
        info!(theme = theme.unwrap_or("random"), "starting game creation");

        let concept = match self.generator.generate_concept(theme).await {
            Ok(concept) => concept,
            Err(e) => {
                warn!(error = %e, "concept generation failed, using fallback");
                fallback::concept(theme)
            }
        };

        let level_design = match self.generator.generate_level(&concept, 1).await {
            Ok(level) => level,
            Err(e) => {
                warn!(error = %e, "level generation failed, using fallback");
                fallback::level(1)
            }
        };

        let code = match self.generator.generate_code(&concept, &level_design).await {
            Ok(code) => code,
            Err(e) => {
                warn!(error = %e, "code generation failed, using fallback");
                fallback::FALLBACK_CODE.to_string()
            }
        };

        let assets = match self.generator.generate_assets(&concept).await {
            Ok(assets) => assets,
            Err(e) => {
                warn!(error = %e, "asset generation failed, using fallback");
                fallback::assets()
            }
        };

        let package = GamePackage {
            concept,
            level_design,
            code,
            assets,
            created_at: Local::now(),
            theme: theme.map(str::to_string),
        };

        info!(title = %package.concept.title, "game creation complete");
        self.history.push(package.clone());
        package
    }

    /// Persist through the packager. Write failures propagate.
    pub fn save(
        &self,
        package: &GamePackage,
        filename: Option<&str>,
    ) -> Result<PathBuf, PersistError> {
        self.packager.save_game(package, filename)
    }

    /// Every package created by this agent, oldest first.
    pub fn history(&self) -> &[GamePackage] {
        &self.history
    }

    /// The most recent package.
    pub fn current(&self) -> Option<&GamePackage> {
        self.history.last()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::stub::StubGenerator;
    use crate::model::Concept;
    use crate::packager::{MemoryStore, PackageStore};

    fn agent_with(stub: StubGenerator) -> (CreationAgent, Arc<StubGenerator>, Arc<MemoryStore>) {
        let stub = Arc::new(stub);
        let store = Arc::new(MemoryStore::new());
        let packager = Arc::new(Packager::new(store.clone()));
        (CreationAgent::new(stub.clone(), packager), stub, store)
    }

    #[tokio::test]
    async fn stages_run_in_order() {
        let concept = Concept {
            title: "Cosmic Gridlock".into(),
            ..fallback::concept(None)
        };
        let (mut agent, stub, _) = agent_with(StubGenerator::new(vec![concept]));

        let package = agent.create(Some("space")).await;
        assert_eq!(stub.calls(), ["concept:space", "level:1", "code:1", "assets"]);
        assert_eq!(package.concept.title, "Cosmic Gridlock");
        assert_eq!(package.level_design.level_number, Some(1));
        assert_eq!(package.code, "print('level')  # level 1");
        assert_eq!(package.theme.as_deref(), Some("space"));
    }

    #[tokio::test]
    async fn every_stage_falls_back() {
        let (mut agent, _, _) = agent_with(StubGenerator::failing());

        let package = agent.create(None).await;
        assert_eq!(package.concept, fallback::concept(None));
        assert_eq!(package.level_design, fallback::level(1));
        assert_eq!(package.code, fallback::FALLBACK_CODE);
        assert_eq!(package.assets, fallback::assets());
        assert!(package.theme.is_none());
    }

    #[tokio::test]
    async fn history_is_append_only() {
        let (mut agent, _, _) = agent_with(StubGenerator::failing());
        assert!(agent.current().is_none());

        agent.create(Some("one")).await;
        agent.create(Some("two")).await;
        assert_eq!(agent.history().len(), 2);
        assert_eq!(agent.history()[0].theme.as_deref(), Some("one"));
        assert_eq!(agent.current().unwrap().theme.as_deref(), Some("two"));
    }

    #[tokio::test]
    async fn save_writes_code_and_metadata() {
        let (mut agent, _, store) = agent_with(StubGenerator::failing());
        let package = agent.create(Some("space lased ships")).await;

        let path = agent.save(&package, None).unwrap();
        let name = path.to_string_lossy().into_owned();
        assert!(name.starts_with("Adventure Quest space lased ships_"));
        assert!(name.ends_with(".py"));
        assert_eq!(store.paths().len(), 2);
        assert_eq!(store.read(&path).unwrap(), fallback::FALLBACK_CODE.as_bytes());
    }
}

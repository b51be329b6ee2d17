//! Packager — writes finished games in a fixed layout.
//!
//! Layout under the games directory:
//! - single game: `<safe_title>_<ts>.py` + `<safe_title>_<ts>_metadata.json`
//! - complete game: `<safe_title>_<ts>/main.py`, `level_<k>.py` (k ≥ 2),
//!   `metadata.json`
//!
//! Saves are not transactional; a failed write leaves whatever was already
//! written and reports the path that failed.

pub mod store;

use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::{DateTime, Local};
use serde::Deserialize;
use tracing::{info, warn};

use crate::model::{CompletePackage, GameMetadata, GamePackage};
pub use store::{Entry, FsStore, MemoryStore, PackageStore};

const METADATA_FILE: &str = "metadata.json";

/// Errors while persisting a package.
#[derive(Debug, thiserror::Error)]
pub enum PersistError {
    #[error("failed to write {path}: {source}")]
    Io { path: PathBuf, source: io::Error },

    #[error("failed to serialize metadata: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Keep ASCII alphanumerics, space, `-` and `_`; trim trailing whitespace.
/// Falls back to "Untitled" when nothing survives.
pub fn safe_title(title: &str) -> String {
    let kept: String = title
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, ' ' | '-' | '_'))
        .collect();
    let kept = kept.trim_end();
    if kept.is_empty() {
        "Untitled".into()
    } else {
        kept.to_string()
    }
}

/// `YYYYMMDD_HHMMSS`.
pub fn timestamp(now: &DateTime<Local>) -> String {
    now.format("%Y%m%d_%H%M%S").to_string()
}

/// File name for level `index` (0-based) of a complete game.
pub fn level_file_name(index: usize) -> String {
    if index == 0 {
        "main.py".into()
    } else {
        format!("level_{}.py", index + 1)
    }
}

/// A game found on disk by `list_games`.
#[derive(Debug, Clone, PartialEq)]
pub struct SavedGame {
    /// Code file (single) or directory (complete), relative to the games dir.
    pub path: PathBuf,
    pub title: Option<String>,
    pub created_at: Option<String>,
    pub levels: usize,
}

/// The fields `list_games` reads back from a metadata file.
#[derive(Debug, Deserialize)]
struct MetadataSummary {
    concept: Option<TitleOnly>,
    created_at: Option<String>,
    num_levels: Option<usize>,
}

#[derive(Debug, Deserialize)]
struct TitleOnly {
    title: Option<String>,
}

pub struct Packager {
    store: Arc<dyn PackageStore>,
}

impl Packager {
    pub fn new(store: Arc<dyn PackageStore>) -> Self {
        Self { store }
    }

    /// Packager writing under `games_dir` on disk.
    pub fn on_disk(games_dir: impl Into<PathBuf>) -> Self {
        Self::new(Arc::new(FsStore::new(games_dir)))
    }

    pub fn store(&self) -> &Arc<dyn PackageStore> {
        &self.store
    }

    /// Save a single game now. See `save_game_at`.
    pub fn save_game(
        &self,
        package: &GamePackage,
        filename: Option<&str>,
    ) -> Result<PathBuf, PersistError> {
        self.save_game_at(package, filename, Local::now())
    }

    /// Write the code and its metadata sidecar. Returns the code file location.
    ///
    /// `filename` is reduced to its final component so callers cannot write
    /// outside the games directory.
    pub fn save_game_at(
        &self,
        package: &GamePackage,
        filename: Option<&str>,
        now: DateTime<Local>,
    ) -> Result<PathBuf, PersistError> {
        let code_path = match filename.and_then(|f| Path::new(f).file_name()) {
            Some(name) => PathBuf::from(name),
            None => PathBuf::from(format!(
                "{}_{}.py",
                safe_title(&package.concept.title),
                timestamp(&now)
            )),
        };
        let stem = code_path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        let metadata_path = PathBuf::from(format!("{stem}_metadata.json"));

        self.ensure_dir(Path::new(""))?;
        self.write(&code_path, package.code.as_bytes())?;
        let metadata = serde_json::to_vec_pretty(&GameMetadata::from(package))?;
        self.write(&metadata_path, &metadata)?;

        let location = self.store.locate(&code_path);
        info!(path = %location.display(), "game saved");
        Ok(location)
    }

    /// Save a complete game now. See `save_complete_at`.
    pub fn save_complete(
        &self,
        package: &CompletePackage,
        level_code: &[String],
    ) -> Result<PathBuf, PersistError> {
        self.save_complete_at(package, level_code, Local::now())
    }

    /// Write one code file per entry of `level_code` (in level order) and
    /// the full package as `metadata.json`. Returns the game directory.
    pub fn save_complete_at(
        &self,
        package: &CompletePackage,
        level_code: &[String],
        now: DateTime<Local>,
    ) -> Result<PathBuf, PersistError> {
        if level_code.len() != package.levels.len() {
            warn!(
                levels = package.levels.len(),
                code_files = level_code.len(),
                "code count does not match level count"
            );
        }

        let dir = PathBuf::from(format!(
            "{}_{}",
            safe_title(&package.concept.title),
            timestamp(&now)
        ));
        self.ensure_dir(&dir)?;

        for (index, code) in level_code.iter().enumerate() {
            self.write(&dir.join(level_file_name(index)), code.as_bytes())?;
        }

        let metadata = serde_json::to_vec_pretty(package)?;
        self.write(&dir.join(METADATA_FILE), &metadata)?;

        let location = self.store.locate(&dir);
        info!(path = %location.display(), levels = level_code.len(), "complete game saved");
        Ok(location)
    }

    /// Saved games, sorted by path. Games with unreadable metadata are still
    /// listed, without title or timestamp.
    pub fn list_games(&self) -> Result<Vec<SavedGame>, PersistError> {
        let root = Path::new("");
        let mut games = Vec::new();

        for entry in self.list(root)? {
            if entry.is_dir {
                let dir = PathBuf::from(&entry.name);
                let metadata_path = dir.join(METADATA_FILE);
                let has_metadata = self
                    .list(&dir)?
                    .iter()
                    .any(|e| !e.is_dir && e.name == METADATA_FILE);
                if !has_metadata {
                    continue;
                }
                let summary = self.read_summary(&metadata_path);
                games.push(SavedGame {
                    path: dir,
                    title: summary.as_ref().and_then(|s| title_of(s)),
                    created_at: summary.as_ref().and_then(|s| s.created_at.clone()),
                    levels: summary.and_then(|s| s.num_levels).unwrap_or(0),
                });
            } else if let Some(stem) = entry.name.strip_suffix(".py") {
                let summary = self.read_summary(Path::new(&format!("{stem}_metadata.json")));
                games.push(SavedGame {
                    path: PathBuf::from(&entry.name),
                    title: summary.as_ref().and_then(|s| title_of(s)),
                    created_at: summary.and_then(|s| s.created_at),
                    levels: 1,
                });
            }
        }
        Ok(games)
    }

    fn read_summary(&self, path: &Path) -> Option<MetadataSummary> {
        let bytes = self.store.read(path).ok()?;
        match serde_json::from_slice(&bytes) {
            Ok(summary) => Some(summary),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "unreadable metadata");
                None
            }
        }
    }

    fn ensure_dir(&self, dir: &Path) -> Result<(), PersistError> {
        self.store
            .create_dir_all(dir)
            .map_err(|source| PersistError::Io {
                path: self.store.locate(dir),
                source,
            })
    }

    fn write(&self, path: &Path, contents: &[u8]) -> Result<(), PersistError> {
        self.store
            .write(path, contents)
            .map_err(|source| PersistError::Io {
                path: self.store.locate(path),
                source,
            })
    }

    fn list(&self, dir: &Path) -> Result<Vec<Entry>, PersistError> {
        self.store.list(dir).map_err(|source| PersistError::Io {
            path: self.store.locate(dir),
            source,
        })
    }
}

fn title_of(summary: &MetadataSummary) -> Option<String> {
    summary.concept.as_ref().and_then(|c| c.title.clone())
}

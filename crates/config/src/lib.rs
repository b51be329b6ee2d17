//! Configuration for gamegen.
//!
//! One explicit value, built once at startup and passed by reference into
//! the director and its agents. Sources, lowest priority first:
//! built-in defaults, an optional YAML file, environment variables.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Errors while building the configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid config file {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_yaml::Error,
    },

    #[error("invalid value for {var}: {value:?}")]
    InvalidEnv { var: String, value: String },

    #[error("missing API key: set GEMINI_API_KEY or pass --api-key")]
    MissingApiKey,
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GamegenConfig {
    pub gemini: GeminiConfig,
    pub game: GameConfig,
    pub directories: DirectoryConfig,
    pub logging: LoggingConfig,
}

/// Generation service settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeminiConfig {
    /// Model alias ("flash", "pro") or full model ID.
    pub model: String,
    pub base_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    pub temperature: f32,
    pub max_tokens: u32,
    /// Per-request timeout.
    pub timeout_secs: u64,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            model: "flash".into(),
            base_url: "https://generativelanguage.googleapis.com".into(),
            api_key: None,
            temperature: 0.7,
            max_tokens: 2048,
            timeout_secs: 30,
        }
    }
}

/// Pipeline shape.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub default_width: u32,
    pub default_height: u32,
    pub default_levels: usize,
    pub max_levels: usize,
    /// How many concept variants the director compares.
    pub concept_variants: usize,
    /// Fixed seed for enemy placement. Entropy-seeded when unset.
    pub seed: Option<u64>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            default_width: 800,
            default_height: 600,
            default_levels: 3,
            max_levels: 10,
            concept_variants: 3,
            seed: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DirectoryConfig {
    pub games: PathBuf,
}

impl Default for DirectoryConfig {
    fn default() -> Self {
        Self {
            games: PathBuf::from("games"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default filter directive when RUST_LOG is not set.
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".into(),
        }
    }
}

impl GamegenConfig {
    /// Parse a YAML document. Missing sections take their defaults.
    pub fn from_yaml(yaml: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(yaml)
    }

    /// Load from a YAML file, or defaults if `path` is None.
    /// Environment overrides are applied on top either way.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => {
                let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
                    path: path.to_path_buf(),
                    source,
                })?;
                Self::from_yaml(&text).map_err(|source| ConfigError::Parse {
                    path: path.to_path_buf(),
                    source,
                })?
            }
            None => Self::default(),
        };
        config.apply_env()?;
        Ok(config)
    }

    /// Overlay values from the process environment.
    pub fn apply_env(&mut self) -> Result<(), ConfigError> {
        self.apply_env_from(|var| std::env::var(var).ok())
    }

    /// Overlay values from an arbitrary lookup (the environment in production).
    pub fn apply_env_from<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |var: &str| lookup(var).filter(|v| !v.trim().is_empty());

        if let Some(key) = get("GEMINI_API_KEY") {
            self.gemini.api_key = Some(key);
        }
        if let Some(model) = get("GEMINI_MODEL") {
            self.gemini.model = model;
        }
        if let Some(width) = get("GAME_WIDTH") {
            self.game.default_width = parse_env("GAME_WIDTH", &width)?;
        }
        if let Some(height) = get("GAME_HEIGHT") {
            self.game.default_height = parse_env("GAME_HEIGHT", &height)?;
        }
        if let Some(dir) = get("GAMES_DIR") {
            self.directories.games = PathBuf::from(dir);
        }
        if let Some(level) = get("LOG_LEVEL") {
            self.logging.level = level.to_lowercase();
        }
        Ok(())
    }

    /// The API key, or `MissingApiKey`. Checked before any stage runs.
    pub fn api_key(&self) -> Result<&str, ConfigError> {
        self.gemini
            .api_key
            .as_deref()
            .filter(|k| !k.is_empty())
            .ok_or(ConfigError::MissingApiKey)
    }
}

fn parse_env<T: std::str::FromStr>(var: &str, value: &str) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::InvalidEnv {
        var: var.to_string(),
        value: value.to_string(),
    })
}

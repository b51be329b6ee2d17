//! Domain types produced by the pipeline.
//!
//! Everything here is serde-serializable: the same types decode the
//! generator's JSON and encode the packaged metadata. Fields the pipeline
//! never reads are kept in flattened maps so they survive the round trip.

use std::collections::BTreeMap;

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

/// The high-level game idea.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Concept {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub genre: String,
    #[serde(default)]
    pub theme: String,
    #[serde(default)]
    pub objective: String,
    #[serde(default)]
    pub mechanics: Vec<String>,
    #[serde(default)]
    pub player_abilities: Vec<String>,
    #[serde(default)]
    pub enemies: Vec<EnemyArchetype>,
    #[serde(default)]
    pub powerups: Vec<PowerupArchetype>,
    #[serde(default)]
    pub level_progression: String,
    #[serde(default)]
    pub scoring_system: String,
    #[serde(default)]
    pub visual_style: String,
    #[serde(default)]
    pub sound_theme: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnemyArchetype {
    pub name: String,
    #[serde(default)]
    pub behavior: String,
    #[serde(default)]
    pub difficulty: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PowerupArchetype {
    pub name: String,
    #[serde(default)]
    pub effect: String,
}

/// Playfield dimensions in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Size {
    pub width: i32,
    pub height: i32,
}

impl Default for Size {
    fn default() -> Self {
        Self {
            width: 800,
            height: 600,
        }
    }
}

/// An enemy added by difficulty scaling.
///
/// Generated enemies stay raw JSON in `LevelDesign::enemies`; the pipeline
/// only counts them, so their shape is up to the model.
#[derive(Debug, Clone, PartialEq)]
pub struct EnemyInstance {
    pub x: i32,
    pub y: i32,
    pub kind: String,
    pub patrol_path: Vec<[i32; 2]>,
}

impl EnemyInstance {
    /// A basic enemy pacing 50px to the right of its spawn.
    pub fn basic_at(x: i32, y: i32) -> Self {
        Self {
            x,
            y,
            kind: "basic".into(),
            patrol_path: vec![[x, y], [x.saturating_add(50), y]],
        }
    }

    /// The level-file form: `{"x", "y", "type", "patrol_path"}`.
    pub fn to_value(&self) -> Value {
        json!({
            "x": self.x,
            "y": self.y,
            "type": self.kind,
            "patrol_path": self.patrol_path,
        })
    }
}

/// One playable layout.
///
/// `enemies` and `time_limit` are optional: difficulty scaling only touches
/// a field that the generator actually produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelDesign {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level_number: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default)]
    pub size: Size,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enemies: Option<Vec<Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_limit: Option<i64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

/// Analysis verdict on a concept.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Recommendation {
    Proceed,
    Revise,
    Reject,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Improvement {
    pub area: String,
    pub suggestion: String,
}

/// Structured critique of a concept.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    #[serde(default)]
    pub analysis: String,
    #[serde(default)]
    pub strengths: Vec<String>,
    #[serde(default)]
    pub weaknesses: Vec<String>,
    #[serde(default)]
    pub improvements: Vec<Improvement>,
    pub risk_level: RiskLevel,
    pub recommendation: Recommendation,
}

impl AnalysisReport {
    /// The report used when analysis is unavailable. Never blocks the pipeline.
    pub fn safe_default() -> Self {
        Self {
            analysis: "Analysis failed".into(),
            strengths: Vec::new(),
            weaknesses: Vec::new(),
            improvements: Vec::new(),
            risk_level: RiskLevel::Medium,
            recommendation: Recommendation::Proceed,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColorPalette {
    pub primary: String,
    pub secondary: String,
    pub accent: String,
    pub background: String,
    pub text: String,
}

/// Visual style guide. Every field is required on decode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StyleGuide {
    pub color_palette: ColorPalette,
    pub art_style: String,
    pub ui_style: String,
    pub animation_style: String,
    pub particle_effects: String,
    pub lighting: String,
    pub mood: String,
}

/// Descriptions for simple placeholder art.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AssetDescriptions {
    pub player: String,
    pub enemies: BTreeMap<String, String>,
    pub powerups: BTreeMap<String, String>,
    pub obstacles: BTreeMap<String, String>,
    pub background: String,
    pub ui_elements: BTreeMap<String, String>,
}

/// Output of the single-game pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GamePackage {
    pub concept: Concept,
    pub level_design: LevelDesign,
    pub code: String,
    pub assets: AssetDescriptions,
    pub created_at: DateTime<Local>,
    pub theme: Option<String>,
}

/// Sidecar metadata for a single game: the package minus its code.
#[derive(Debug, Serialize)]
pub struct GameMetadata<'a> {
    pub concept: &'a Concept,
    pub level_design: &'a LevelDesign,
    pub assets: &'a AssetDescriptions,
    pub created_at: &'a DateTime<Local>,
    pub theme: Option<&'a str>,
}

impl<'a> From<&'a GamePackage> for GameMetadata<'a> {
    fn from(package: &'a GamePackage) -> Self {
        Self {
            concept: &package.concept,
            level_design: &package.level_design,
            assets: &package.assets,
            created_at: &package.created_at,
            theme: package.theme.as_deref(),
        }
    }
}

/// Output of the multi-level pipeline. Holds no code; code is generated at save time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletePackage {
    pub concept: Concept,
    pub analysis: AnalysisReport,
    pub levels: Vec<LevelDesign>,
    pub style_guide: StyleGuide,
    pub created_at: DateTime<Local>,
    pub theme: Option<String>,
    pub num_levels: usize,
}

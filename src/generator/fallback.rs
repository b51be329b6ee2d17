//! Fixed substitutes used when a generation request fails.
//!
//! Deterministic: the same inputs always give the same value. The calling
//! stage decides when to use them; the generator itself never does.

use std::collections::BTreeMap;

use serde_json::{json, Map, Value};

use crate::model::{
    AssetDescriptions, ColorPalette, Concept, EnemyArchetype, EnemyInstance, LevelDesign,
    PowerupArchetype, Size, StyleGuide,
};

/// Playable placeholder written when code generation fails.
pub const FALLBACK_CODE: &str = include_str!("fallback_game.py");

/// Fallback concept for an optional theme.
pub fn concept(theme: Option<&str>) -> Concept {
    Concept {
        title: format!("Adventure Quest {}", theme.unwrap_or("Mystery")),
        description: "A top-down adventure game where you explore and collect items".into(),
        genre: "adventure".into(),
        theme: theme.unwrap_or("fantasy").into(),
        objective: "Collect all coins while avoiding enemies".into(),
        mechanics: vec!["movement".into(), "collection".into(), "avoidance".into()],
        player_abilities: vec!["move".into(), "collect".into()],
        enemies: vec![
            EnemyArchetype {
                name: "Guard".into(),
                behavior: "patrols".into(),
                difficulty: "easy".into(),
            },
            EnemyArchetype {
                name: "Hunter".into(),
                behavior: "chases player".into(),
                difficulty: "medium".into(),
            },
        ],
        powerups: vec![
            PowerupArchetype {
                name: "Health".into(),
                effect: "restores health".into(),
            },
            PowerupArchetype {
                name: "Speed".into(),
                effect: "increases movement speed".into(),
            },
        ],
        level_progression: "Linear progression with increasing difficulty".into(),
        scoring_system: "Points for collecting items and surviving".into(),
        visual_style: "Simple colored shapes".into(),
        sound_theme: "Retro arcade style".into(),
    }
}

/// Fallback layout for the 1-based level `index`.
pub fn level(index: usize) -> LevelDesign {
    let extra = json!({
        "description": format!("Basic level {index}"),
        "spawn_points": [{"x": 50, "y": 50, "type": "player"}],
        "obstacles": [
            {"x": 200, "y": 200, "width": 50, "height": 50, "type": "wall"},
            {"x": 500, "y": 300, "width": 30, "height": 30, "type": "rock"}
        ],
        "powerups": [
            {"x": 300, "y": 150, "type": "health"},
            {"x": 600, "y": 400, "type": "speed"}
        ],
        "objectives": [{"type": "collect", "target": "coins", "count": 3}],
        "difficulty": "easy"
    });

    LevelDesign {
        level_number: u32::try_from(index).ok(),
        name: Some(format!("Level {index}")),
        size: Size::default(),
        enemies: Some(vec![EnemyInstance::basic_at(400, 300).to_value()]),
        time_limit: Some(120),
        extra: into_map(extra),
    }
}

/// Fallback asset descriptions.
pub fn assets() -> AssetDescriptions {
    AssetDescriptions {
        player: "Blue rectangle representing the player character".into(),
        enemies: pairs(&[
            ("basic", "Red rectangle for basic enemy"),
            ("aggressive", "Dark red rectangle for aggressive enemy"),
        ]),
        powerups: pairs(&[
            ("health", "Green circle for health powerup"),
            ("speed", "Yellow circle for speed powerup"),
        ]),
        obstacles: pairs(&[
            ("wall", "Gray rectangle for wall obstacle"),
            ("rock", "Brown circle for rock obstacle"),
        ]),
        background: "Black background".into(),
        ui_elements: pairs(&[
            ("score", "White text for score display"),
            ("health_bar", "Red rectangle for health bar"),
        ]),
    }
}

/// Fallback style guide. Constant; never derived from the concept.
pub fn style_guide() -> StyleGuide {
    StyleGuide {
        color_palette: ColorPalette {
            primary: "Blue".into(),
            secondary: "Green".into(),
            accent: "Yellow".into(),
            background: "Black".into(),
            text: "White".into(),
        },
        art_style: "Simple geometric shapes with bright colors".into(),
        ui_style: "Clean, minimal interface".into(),
        animation_style: "Smooth, simple animations".into(),
        particle_effects: "Basic particle effects for collectibles".into(),
        lighting: "Flat lighting".into(),
        mood: "Energetic and fun".into(),
    }
}

fn pairs(entries: &[(&str, &str)]) -> BTreeMap<String, String> {
    entries
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

fn into_map(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        _ => Map::new(),
    }
}

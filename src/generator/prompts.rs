//! Prompt templates for every generation request.
//!
//! Each builder embeds the JSON shape the sanitizer expects back.

use crate::model::{Concept, LevelDesign, Size};

/// Concept request. `theme` None lets the model pick.
pub fn concept_prompt(theme: Option<&str>) -> String {
    let theme = theme.unwrap_or("Choose an engaging theme");
    format!(
        r#"You are an expert game designer. Create a complete game concept for a top-down 2D arcade game.

Theme: {theme}

Respond with JSON only, in this structure:
{{
  "title": "Game Title",
  "description": "Brief game description",
  "genre": "action, adventure, puzzle, ...",
  "theme": "Visual/atmospheric theme",
  "objective": "Main objective",
  "mechanics": ["Core mechanic 1", "Core mechanic 2", "Core mechanic 3"],
  "player_abilities": ["Ability 1", "Ability 2"],
  "enemies": [{{"name": "Enemy 1", "behavior": "How it acts", "difficulty": "easy"}}],
  "powerups": [{{"name": "Powerup 1", "effect": "What it does"}}],
  "level_progression": "How levels progress",
  "scoring_system": "How points are earned",
  "visual_style": "Art style description",
  "sound_theme": "Audio theme description"
}}

Make it creative and engaging, with clear, implementable mechanics."#
    )
}

/// Level request for the 1-based `index`.
pub fn level_prompt(concept: &Concept, index: usize, field: Size) -> String {
    format!(
        r#"Based on this game concept, design level {index}.

Game: {title}
Genre: {genre}
Mechanics: {mechanics}

Respond with JSON only, in this structure:
{{
  "level_number": {index},
  "name": "Level name",
  "description": "Level description",
  "size": {{"width": {width}, "height": {height}}},
  "spawn_points": [{{"x": 100, "y": 100, "type": "player"}}],
  "obstacles": [{{"x": 200, "y": 200, "width": 50, "height": 50, "type": "wall"}}],
  "powerups": [{{"x": 300, "y": 150, "type": "health"}}],
  "enemies": [{{"x": 350, "y": 250, "type": "basic", "patrol_path": [[350, 250], [400, 250]]}}],
  "objectives": [{{"type": "collect", "target": "coins", "count": 5}}],
  "difficulty": "easy",
  "time_limit": 120
}}

Make it challenging but fair for level {index}. Use integer coordinates inside the {width}x{height} field."#,
        width = field.width,
        height = field.height,
        title = concept.title,
        genre = concept.genre,
        mechanics = concept.mechanics.join(", "),
    )
}

/// Playable-code request for one (concept, level) pair.
pub fn code_prompt(concept: &Concept, level: &LevelDesign) -> String {
    format!(
        r#"Generate complete pygame code for this game.

Game concept:
{concept}

Level design:
{level}

Requirements:
1. Use pygame, top-down 2D view
2. Player movement with WASD or arrow keys
3. Implement the mechanics from the concept
4. Collision detection, basic enemy AI, powerup collection, scoring
5. Game states: menu, playing, game over
6. Simple colored shapes only; no external images

Return one complete, runnable Python file with all imports and a main() function."#,
        concept = pretty(concept),
        level = pretty(level),
    )
}

/// Asset-description request.
pub fn assets_prompt(concept: &Concept) -> String {
    format!(
        r#"For this game, describe simple visual assets buildable from colored shapes.

Game: {title}
Visual style: {style}

Respond with JSON only, in this structure:
{{
  "player": "Player appearance",
  "enemies": {{"basic": "...", "aggressive": "..."}},
  "powerups": {{"health": "...", "speed": "..."}},
  "obstacles": {{"wall": "...", "rock": "..."}},
  "background": "Background description",
  "ui_elements": {{"score": "...", "health_bar": "..."}}
}}"#,
        title = concept.title,
        style = concept.visual_style,
    )
}

/// Free-form critique request.
pub fn analysis_prompt(concept: &Concept) -> String {
    format!(
        r#"Analyze this game concept and suggest improvements:

{concept}

Consider gameplay balance, player engagement, difficulty progression,
replayability and technical feasibility.

Respond with JSON only, in this structure:
{{
  "analysis": "Overall analysis",
  "strengths": ["strength 1"],
  "weaknesses": ["weakness 1"],
  "improvements": [{{"area": "mechanics", "suggestion": "..."}}],
  "risk_level": "one of: low, medium, high",
  "recommendation": "one of: proceed, revise, reject"
}}"#,
        concept = pretty(concept),
    )
}

/// Free-form style-guide request.
pub fn style_guide_prompt(concept: &Concept) -> String {
    format!(
        r#"Create a detailed visual style guide for this game:

{concept}

Respond with JSON only, in this structure:
{{
  "color_palette": {{
    "primary": "main color",
    "secondary": "secondary color",
    "accent": "accent color",
    "background": "background color",
    "text": "text color"
  }},
  "art_style": "art style description",
  "ui_style": "UI guidelines",
  "animation_style": "animation guidelines",
  "particle_effects": "particle effect suggestions",
  "lighting": "lighting style",
  "mood": "overall mood"
}}"#,
        concept = pretty(concept),
    )
}

fn pretty<T: serde::Serialize>(value: &T) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| "{}".into())
}

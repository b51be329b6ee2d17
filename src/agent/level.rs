//! Level agent — ordered level sequences with rising difficulty.
//!
//! Level `i` (1-based) is scaled by `difficulty_modifier(i)`: +20% per
//! level, capped at 2.0 from level 6 on. Scaling adds enemies and shortens
//! the time limit; it never removes enemies and never drops the limit
//! below `MIN_TIME_LIMIT`.

use std::sync::Arc;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, info, warn};

use crate::generator::{fallback, ContentGenerator};
use crate::model::{Concept, EnemyInstance, LevelDesign};

pub const MAX_MODIFIER: f64 = 2.0;
pub const MIN_TIME_LIMIT: i64 = 60;
/// Spawned enemies keep this far from every edge.
const EDGE_MARGIN: i32 = 50;

/// Difficulty multiplier for the 1-based level `index`.
pub fn difficulty_modifier(index: usize) -> f64 {
    let steps = index.saturating_sub(1) as f64;
    (1.0 + steps * 0.2).min(MAX_MODIFIER)
}

/// Scale one level in place. Only fields present on the level are touched.
pub fn scale_difficulty<R: Rng + ?Sized>(level: &mut LevelDesign, modifier: f64, rng: &mut R) {
    let size = level.size;

    if let Some(enemies) = level.enemies.as_mut() {
        let current = enemies.len();
        let target = (current as f64 * modifier).floor() as usize;
        if target > current {
            for _ in current..target {
                let x = random_coord(rng, size.width);
                let y = random_coord(rng, size.height);
                enemies.push(EnemyInstance::basic_at(x, y).to_value());
            }
            debug!(from = current, to = target, "added enemies");
        }
    }

    if let Some(limit) = level.time_limit.as_mut() {
        let scaled = (*limit as f64 / modifier).floor() as i64;
        *limit = scaled.max(MIN_TIME_LIMIT);
    }
}

/// Uniform in `[EDGE_MARGIN, dimension - EDGE_MARGIN]`; collapses to the
/// margin when the playfield is too small for the range.
fn random_coord<R: Rng + ?Sized>(rng: &mut R, dimension: i32) -> i32 {
    let high = dimension.saturating_sub(EDGE_MARGIN).max(EDGE_MARGIN);
    rng.gen_range(EDGE_MARGIN..=high)
}

pub struct LevelAgent {
    generator: Arc<dyn ContentGenerator>,
    rng: StdRng,
}

impl LevelAgent {
    /// Entropy-seeded placement.
    pub fn new(generator: Arc<dyn ContentGenerator>) -> Self {
        Self {
            generator,
            rng: StdRng::from_entropy(),
        }
    }

    /// Reproducible placement.
    pub fn with_seed(generator: Arc<dyn ContentGenerator>, seed: u64) -> Self {
        Self {
            generator,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Levels 1..=n in order, each scaled exactly once.
    pub async fn build_sequence(&mut self, concept: &Concept, n: usize) -> Vec<LevelDesign> {
        let mut levels = Vec::with_capacity(n);
        for index in 1..=n {
            let mut level = match self.generator.generate_level(concept, index).await {
                Ok(level) => level,
                Err(e) => {
                    warn!(level = index, error = %e, "level generation failed, using fallback");
                    fallback::level(index)
                }
            };
            let modifier = difficulty_modifier(index);
            scale_difficulty(&mut level, modifier, &mut self.rng);
            info!(
                level = index,
                modifier,
                enemies = level.enemies.as_ref().map_or(0, Vec::len),
                time_limit = ?level.time_limit,
                "level scaled"
            );
            levels.push(level);
        }
        levels
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::stub::StubGenerator;
    use crate::model::Size;
    use serde_json::{json, Map};

    fn level_with(enemies: usize, time_limit: Option<i64>) -> LevelDesign {
        LevelDesign {
            level_number: Some(1),
            name: None,
            size: Size::default(),
            enemies: Some(
                (0..enemies)
                    .map(|i| EnemyInstance::basic_at(100 + i as i32, 100).to_value())
                    .collect(),
            ),
            time_limit,
            extra: Map::new(),
        }
    }

    #[test]
    fn modifier_table() {
        let expected = [1.0, 1.2, 1.4, 1.6, 1.8, 2.0, 2.0, 2.0, 2.0, 2.0];
        for (i, want) in expected.iter().enumerate() {
            let got = difficulty_modifier(i + 1);
            assert!((got - want).abs() < 1e-9, "level {}: {got} != {want}", i + 1);
        }
        assert_eq!(difficulty_modifier(6), 2.0);
        assert_eq!(difficulty_modifier(7), 2.0);
        assert_eq!(difficulty_modifier(100), 2.0);
    }

    #[test]
    fn time_limit_scenarios() {
        let mut rng = StdRng::seed_from_u64(1);

        let mut level = level_with(0, Some(120));
        scale_difficulty(&mut level, 1.2, &mut rng);
        assert_eq!(level.time_limit, Some(100));

        let mut level = level_with(0, Some(50));
        scale_difficulty(&mut level, 2.0, &mut rng);
        assert_eq!(level.time_limit, Some(60));
    }

    #[test]
    fn time_limit_never_below_floor() {
        let mut rng = StdRng::seed_from_u64(2);
        for limit in [0, 1, 59, 60, 61, 119, 120, 500] {
            for step in 0..=10 {
                let modifier = 1.0 + step as f64 * 0.1;
                let mut level = level_with(0, Some(limit));
                scale_difficulty(&mut level, modifier, &mut rng);
                assert!(level.time_limit.unwrap() >= MIN_TIME_LIMIT);
            }
        }
    }

    #[test]
    fn enemy_count_never_decreases() {
        let mut rng = StdRng::seed_from_u64(3);
        for count in 0..8 {
            for index in 1..=10 {
                let mut level = level_with(count, None);
                scale_difficulty(&mut level, difficulty_modifier(index), &mut rng);
                let after = level.enemies.unwrap().len();
                assert!(after >= count);
                assert_eq!(after, (count as f64 * difficulty_modifier(index)).floor() as usize);
            }
        }
    }

    #[test]
    fn added_enemies_are_basic_and_in_bounds() {
        let mut rng = StdRng::seed_from_u64(4);
        let mut level = level_with(5, Some(120));
        scale_difficulty(&mut level, 2.0, &mut rng);

        let enemies = level.enemies.unwrap();
        assert_eq!(enemies.len(), 10);
        for enemy in &enemies[5..] {
            assert_eq!(enemy["type"], "basic");
            let x = enemy["x"].as_i64().unwrap();
            let y = enemy["y"].as_i64().unwrap();
            assert!((50..=750).contains(&x));
            assert!((50..=550).contains(&y));
            assert_eq!(enemy["patrol_path"], json!([[x, y], [x + 50, y]]));
        }
    }

    #[test]
    fn tiny_playfield_clamps_to_margin() {
        let mut rng = StdRng::seed_from_u64(5);
        let mut level = level_with(2, None);
        level.size = Size { width: 60, height: 40 };
        scale_difficulty(&mut level, 2.0, &mut rng);
        for enemy in &level.enemies.unwrap()[2..] {
            assert_eq!(enemy["x"], 50);
            assert_eq!(enemy["y"], 50);
        }
    }

    #[test]
    fn extreme_playfield_does_not_overflow() {
        let mut rng = StdRng::seed_from_u64(8);
        let mut level = level_with(1, None);
        level.size = Size { width: i32::MIN, height: i32::MAX };
        scale_difficulty(&mut level, 2.0, &mut rng);
        let added = &level.enemies.unwrap()[1];
        assert_eq!(added["x"], 50);
        assert!(added["y"].as_i64().unwrap() >= 50);
    }

    #[test]
    fn generated_float_coordinates_are_scaled_not_replaced() {
        let raw = r#"```json
{"level_number": 2, "name": "Reef",
 "enemies": [{"x": 350.5, "y": 250.0, "type": "eel", "patrol_path": [{"x": 350, "y": 250}]},
             {"x": 10.75, "y": 20, "type": "crab"}],
 "time_limit": 120}
```"#;
        let mut level: LevelDesign = crate::sanitize::parse_json(raw).unwrap();
        scale_difficulty(&mut level, 1.6, &mut StdRng::seed_from_u64(9));

        assert_eq!(level.name.as_deref(), Some("Reef"));
        let enemies = level.enemies.unwrap();
        // floor(2 * 1.6) = 3
        assert_eq!(enemies.len(), 3);
        assert_eq!(enemies[0]["type"], "eel");
        assert_eq!(enemies[1]["x"], 10.75);
        assert_eq!(enemies[2]["type"], "basic");
        // floor(120 / 1.6) = 75
        assert_eq!(level.time_limit, Some(75));
    }

    #[test]
    fn absent_fields_untouched() {
        let mut rng = StdRng::seed_from_u64(6);
        let mut level = level_with(0, None);
        level.enemies = None;
        let before = level.clone();
        scale_difficulty(&mut level, 1.8, &mut rng);
        assert_eq!(level, before);
    }

    #[test]
    fn same_seed_same_placement() {
        let mut a = level_with(3, None);
        let mut b = level_with(3, None);
        scale_difficulty(&mut a, 2.0, &mut StdRng::seed_from_u64(99));
        scale_difficulty(&mut b, 2.0, &mut StdRng::seed_from_u64(99));
        assert_eq!(a, b);
    }

    #[tokio::test]
    async fn sequence_is_ordered_and_scaled() {
        let mut stub = StubGenerator::new(vec![]);
        stub.level = Some(level_with(5, Some(120)));
        let stub = Arc::new(stub);
        let mut agent = LevelAgent::with_seed(stub.clone(), 7);
        let concept = fallback::concept(None);

        let levels = agent.build_sequence(&concept, 5).await;
        assert_eq!(levels.len(), 5);
        assert_eq!(stub.calls(), ["level:1", "level:2", "level:3", "level:4", "level:5"]);

        let numbers: Vec<_> = levels.iter().map(|l| l.level_number.unwrap()).collect();
        assert_eq!(numbers, [1, 2, 3, 4, 5]);

        // floor(5 * [1.0, 1.2, 1.4, 1.6, 1.8])
        let enemies: Vec<_> = levels.iter().map(|l| l.enemies.as_ref().unwrap().len()).collect();
        assert_eq!(enemies, [5, 6, 7, 8, 9]);

        // max(60, floor(120 / m))
        let limits: Vec<_> = levels.iter().map(|l| l.time_limit.unwrap()).collect();
        assert_eq!(limits, [120, 100, 85, 75, 66]);
    }

    #[tokio::test]
    async fn failed_levels_fall_back() {
        let mut agent = LevelAgent::with_seed(Arc::new(StubGenerator::failing()), 8);
        let levels = agent.build_sequence(&fallback::concept(None), 2).await;
        assert_eq!(levels.len(), 2);
        assert_eq!(levels[1].name.as_deref(), Some("Level 2"));
        // fallback has one enemy: floor(1 * 1.2) == 1
        assert_eq!(levels[1].enemies.as_ref().unwrap().len(), 1);
        assert_eq!(levels[1].time_limit, Some(100));
    }
}

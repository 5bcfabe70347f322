//! Scripted stand-in for a human player.
//!
//! The strategy is deliberately simple: work through a fixed tower
//! build order, placing each tower on the free tile closest to the
//! path, keep the ballista trained on the nearest enemy, spend spare
//! gold on upgrades, and always skip wave countdowns.

use td_core::geometry::{point_to_segment_distance, TILE_SIZE};
use td_core::prelude::*;

/// Minimum distance a candidate tile keeps from the path corridor.
/// Matches the placement clearance so candidates are not wasted on
/// tiles the oracle will reject.
const MIN_PATH_DISTANCE: f32 = 46.0;

/// Candidates further than this from the path are not worth building
/// on with the short-ranged kinds in the default build order.
const MAX_PATH_DISTANCE: f32 = 110.0;

/// Gold kept in reserve before the strategy starts buying upgrades.
const UPGRADE_RESERVE: u32 = 300;

/// A scripted player driving one simulation.
pub struct ScriptedPlayer {
    build_order: Vec<TowerKind>,
    next_build: usize,
    candidates: Option<Vec<Vec2>>,
}

impl ScriptedPlayer {
    /// Parse a comma-separated build order like `"basic,sniper,splash"`.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::UnknownTowerKind`] for unrecognized names.
    pub fn from_build_order(build: &str) -> Result<Self> {
        let build_order = build
            .split(',')
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(|name| {
                TowerKind::from_name(name).ok_or_else(|| GameError::UnknownTowerKind(name.into()))
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            build_order,
            next_build: 0,
            candidates: None,
        })
    }

    /// Issue this frame's commands and return the frame input.
    pub fn act(&mut self, sim: &mut Simulation) -> InputSnapshot {
        sim.skip_countdown();
        self.build(sim);
        self.upgrade(sim);
        Self::aim(sim)
    }

    fn build(&mut self, sim: &mut Simulation) {
        let Some(&kind) = self.build_order.get(self.next_build) else {
            return;
        };
        if sim.gold() < td_core::economy::tower_cost(kind) {
            return;
        }

        let candidates = self
            .candidates
            .get_or_insert_with(|| rank_candidates(sim))
            .clone();
        for spot in candidates {
            if sim.place_tower(kind, spot).is_some() {
                self.next_build += 1;
                tracing::debug!(kind = kind.name(), x = spot.x, y = spot.y, "strategy built tower");
                return;
            }
        }
    }

    fn upgrade(&mut self, sim: &mut Simulation) {
        if self.next_build < self.build_order.len() || sim.gold() < UPGRADE_RESERVE {
            return;
        }
        let ids: Vec<_> = sim.towers().iter().map(|t| t.id).collect();
        for id in ids {
            if sim.upgrade_tower(id) {
                return;
            }
        }
    }

    fn aim(sim: &Simulation) -> InputSnapshot {
        let origin = sim.ballista().position;
        let target = sim
            .enemies()
            .iter()
            .min_by(|a, b| {
                origin
                    .distance_squared(a.position)
                    .total_cmp(&origin.distance_squared(b.position))
            })
            .map(|enemy| enemy.position);

        InputSnapshot {
            aim: target.unwrap_or(Vec2::new(origin.x, 100.0)),
            firing: target.is_some(),
        }
    }
}

/// Every placeable tile center within range of the path, nearest first.
fn rank_candidates(sim: &Simulation) -> Vec<Vec2> {
    let path = sim.path().to_vec();
    let terrain = sim.terrain();
    let mut spots = Vec::new();

    let mut y = 100.0 + TILE_SIZE / 2.0;
    while y <= 620.0 {
        let mut x = TILE_SIZE + TILE_SIZE / 2.0;
        while x <= 1240.0 {
            let spot = Vec2::new(x, y);
            let dist = path
                .windows(2)
                .map(|seg| point_to_segment_distance(spot, seg[0], seg[1]))
                .fold(f32::INFINITY, f32::min);
            if (MIN_PATH_DISTANCE..=MAX_PATH_DISTANCE).contains(&dist)
                && terrain.can_place_at(spot)
            {
                spots.push((dist, spot));
            }
            x += TILE_SIZE;
        }
        y += TILE_SIZE;
    }

    spots.sort_by(|a, b| a.0.total_cmp(&b.0));
    spots.into_iter().map(|(_, spot)| spot).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn simple_level() -> LevelData {
        LevelData {
            id: 1,
            name: "Strategy Test".to_string(),
            lives: 20,
            starting_gold: 400,
            path: vec![Vec2::new(-30.0, 360.0), Vec2::new(1310.0, 360.0)],
            terrain: TerrainData::default(),
            waves: vec![WaveData {
                groups: vec![GroupData {
                    kind: "basic".to_string(),
                    count: 3,
                    delay: 1.0,
                }],
            }],
            scaling: ScalingData::default(),
        }
    }

    #[test]
    fn test_build_order_parses() {
        let player = ScriptedPlayer::from_build_order("basic, sniper,splash").unwrap();
        assert_eq!(
            player.build_order,
            vec![TowerKind::Basic, TowerKind::Sniper, TowerKind::Splash]
        );

        assert!(matches!(
            ScriptedPlayer::from_build_order("basic,catapult"),
            Err(GameError::UnknownTowerKind(_))
        ));
    }

    #[test]
    fn test_strategy_builds_near_the_path() {
        let mut sim = Simulation::new(&simple_level());
        let mut player = ScriptedPlayer::from_build_order("basic,basic").unwrap();

        for _ in 0..10 {
            let input = player.act(&mut sim);
            sim.update(1.0 / 60.0, &input);
        }

        assert_eq!(sim.towers().len(), 2);
        for tower in sim.towers() {
            let dist = (tower.position.y - 360.0).abs();
            assert!(dist >= MIN_PATH_DISTANCE && dist <= MAX_PATH_DISTANCE);
        }
    }

    #[test]
    fn test_strategy_clears_the_level() {
        let mut sim = Simulation::new(&simple_level());
        let mut player = ScriptedPlayer::from_build_order("basic,basic").unwrap();

        for _ in 0..20_000 {
            let input = player.act(&mut sim);
            sim.update(1.0 / 60.0, &input);
            if sim.state() != GameState::Playing {
                break;
            }
        }

        assert_eq!(sim.state(), GameState::LevelComplete);
    }
}

//! Tower entities: targeting, aiming and firing.
//!
//! Tower kinds are a closed tagged set sharing one simulation model;
//! the per-kind divergence is limited to base stats and the splash /
//! slow side-effect flags their projectiles carry. Upgrade stats are
//! always recomputed from the base values and the current level, never
//! by repeatedly multiplying the mutated stat, so repeated upgrades
//! cannot accumulate floating-point drift.

use serde::{Deserialize, Serialize};

use crate::enemy::{Enemy, EnemyId};
use crate::geometry::{angle_difference, direction_from_angle, Vec2};
use crate::projectile::{Projectile, ProjectileOwner};

/// Range multiplier for towers placed on a hill, fixed at placement time.
pub const HILL_RANGE_BONUS: f32 = 1.2;

/// Maximum tower upgrade level.
pub const MAX_TOWER_LEVEL: u8 = 3;

/// Per-level damage multiplier.
const DAMAGE_GROWTH: f32 = 1.4;
/// Per-level range multiplier.
const RANGE_GROWTH: f32 = 1.1;
/// Per-level fire-interval multiplier (shorter is faster).
const INTERVAL_GROWTH: f32 = 0.85;
/// Per-level splash-radius growth for the splash tower.
const SPLASH_GROWTH_PER_LEVEL: f32 = 0.2;
/// Per-level slow-factor improvement for the slow tower.
const SLOW_IMPROVEMENT_PER_LEVEL: f32 = 0.1;

/// Stable identifier for a placed tower.
pub type TowerId = u32;

/// Closed set of tower kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TowerKind {
    /// Balanced all-purpose tower.
    Basic,
    /// Long range, high damage, slow firing.
    Sniper,
    /// Area damage on impact.
    Splash,
    /// Slows enemies on hit.
    Slow,
}

/// Immutable per-kind base statistics.
#[derive(Debug, Clone, Copy)]
pub struct TowerStats {
    /// Base targeting range.
    pub range: f32,
    /// Base seconds between shots.
    pub fire_interval: f32,
    /// Base damage per projectile.
    pub damage: f32,
    /// Projectile travel speed.
    pub projectile_speed: f32,
    /// Projectile collision radius.
    pub projectile_radius: f32,
    /// Distance from the tower center to the projectile spawn point.
    pub muzzle_offset: f32,
    /// Base splash radius; 0 for non-splash kinds.
    pub splash_radius: f32,
    /// Base slow factor; `None` for non-slow kinds.
    pub slow_factor: Option<f32>,
}

impl TowerKind {
    /// Parse a content/UI kind name.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "basic" => Some(Self::Basic),
            "sniper" => Some(Self::Sniper),
            "splash" => Some(Self::Splash),
            "slow" => Some(Self::Slow),
            _ => None,
        }
    }

    /// Canonical kind name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Basic => "basic",
            Self::Sniper => "sniper",
            Self::Splash => "splash",
            Self::Slow => "slow",
        }
    }

    /// Base statistics at level 1.
    #[must_use]
    pub const fn base_stats(self) -> TowerStats {
        match self {
            Self::Basic => TowerStats {
                range: 150.0,
                fire_interval: 0.8,
                damage: 40.0,
                projectile_speed: 500.0,
                projectile_radius: 4.0,
                muzzle_offset: 25.0,
                splash_radius: 0.0,
                slow_factor: None,
            },
            Self::Sniper => TowerStats {
                range: 280.0,
                fire_interval: 2.0,
                damage: 120.0,
                projectile_speed: 900.0,
                projectile_radius: 4.0,
                muzzle_offset: 25.0,
                splash_radius: 0.0,
                slow_factor: None,
            },
            Self::Splash => TowerStats {
                range: 120.0,
                fire_interval: 1.5,
                damage: 35.0,
                projectile_speed: 400.0,
                projectile_radius: 8.0,
                muzzle_offset: 20.0,
                splash_radius: 60.0,
                slow_factor: None,
            },
            Self::Slow => TowerStats {
                range: 130.0,
                fire_interval: 0.5,
                damage: 15.0,
                projectile_speed: 600.0,
                projectile_radius: 5.0,
                muzzle_offset: 22.0,
                splash_radius: 0.0,
                slow_factor: Some(0.4),
            },
        }
    }
}

/// A placed tower.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tower {
    /// Stable identifier, assigned by the simulation.
    pub id: TowerId,
    /// Kind tag.
    pub kind: TowerKind,
    /// Fixed position.
    pub position: Vec2,
    /// Upgrade level, 1..=3, monotonic.
    pub level: u8,
    /// Whether this tower was placed on a hill. Fixed at placement
    /// time; the bonus is not re-evaluated later.
    pub on_hill: bool,
    /// Current aim angle in radians.
    pub aim_angle: f32,
    /// Simulation time of the last shot; `None` before the first.
    pub last_fired: Option<f32>,
    /// Target acquired this frame, if any.
    pub target: Option<EnemyId>,
    /// Current damage, recomputed from base on upgrade.
    pub damage: f32,
    /// Current range before the hill bonus, recomputed on upgrade.
    pub range: f32,
    /// Current seconds between shots, recomputed on upgrade.
    pub fire_interval: f32,
}

impl Tower {
    /// Place a new level-1 tower.
    #[must_use]
    pub fn new(id: TowerId, kind: TowerKind, position: Vec2, on_hill: bool) -> Self {
        let stats = kind.base_stats();
        Self {
            id,
            kind,
            position,
            level: 1,
            on_hill,
            aim_angle: 0.0,
            last_fired: None,
            target: None,
            damage: stats.damage,
            range: stats.range,
            fire_interval: stats.fire_interval,
        }
    }

    /// Targeting range including the hill bonus.
    #[must_use]
    pub fn effective_range(&self) -> f32 {
        if self.on_hill {
            self.range * HILL_RANGE_BONUS
        } else {
            self.range
        }
    }

    /// Upgrade one level. Returns `false` (no-op) at max level.
    pub fn upgrade(&mut self) -> bool {
        if self.level >= MAX_TOWER_LEVEL {
            return false;
        }
        self.level += 1;
        self.recompute_stats();
        true
    }

    fn recompute_stats(&mut self) {
        let stats = self.kind.base_stats();
        let steps = i32::from(self.level) - 1;
        self.damage = (stats.damage * DAMAGE_GROWTH.powi(steps)).floor();
        self.range = (stats.range * RANGE_GROWTH.powi(steps)).floor();
        self.fire_interval = stats.fire_interval * INTERVAL_GROWTH.powi(steps);
    }

    /// Splash radius of projectiles fired at the current level.
    #[must_use]
    pub fn splash_radius(&self) -> f32 {
        let base = self.kind.base_stats().splash_radius;
        if base == 0.0 {
            return 0.0;
        }
        base * (1.0 + SPLASH_GROWTH_PER_LEVEL * f32::from(self.level - 1))
    }

    /// Slow factor of projectiles fired at the current level.
    #[must_use]
    pub fn slow_factor(&self) -> Option<f32> {
        self.kind
            .base_stats()
            .slow_factor
            .map(|base| base - SLOW_IMPROVEMENT_PER_LEVEL * f32::from(self.level - 1))
    }

    /// Acquire a target, rotate toward it, and fire when off cooldown.
    ///
    /// Targeting picks the nearest live enemy strictly inside the
    /// effective range; ties break by iteration order (first found
    /// wins). Rotation is bounded per frame rather than instantaneous.
    /// Returns the projectile to spawn, if the tower fired.
    pub fn update(&mut self, dt: f32, now: f32, enemies: &[Enemy]) -> Option<Projectile> {
        let (target_id, target_pos) = match self.find_target(enemies) {
            Some(found) => found,
            None => {
                self.target = None;
                return None;
            }
        };
        self.target = Some(target_id);

        let desired = self.position.angle_to(target_pos);
        let turn = (dt * 10.0).min(1.0);
        self.aim_angle += angle_difference(self.aim_angle, desired) * turn;

        if self.ready_to_fire(now) {
            self.last_fired = Some(now);
            return Some(self.make_projectile());
        }

        None
    }

    /// Whether the inter-shot cooldown has elapsed at time `now`.
    #[must_use]
    pub fn ready_to_fire(&self, now: f32) -> bool {
        self.last_fired
            .map_or(true, |last| now - last >= self.fire_interval)
    }

    fn find_target(&self, enemies: &[Enemy]) -> Option<(EnemyId, Vec2)> {
        let mut closest = None;
        let mut closest_dist = self.effective_range();

        for enemy in enemies {
            if enemy.is_dead {
                continue;
            }
            let dist = self.position.distance(enemy.position);
            if dist < closest_dist {
                closest_dist = dist;
                closest = Some((enemy.id, enemy.position));
            }
        }

        closest
    }

    fn make_projectile(&self) -> Projectile {
        let stats = self.kind.base_stats();
        let muzzle = self.position + direction_from_angle(self.aim_angle) * stats.muzzle_offset;

        let mut projectile = Projectile::new(
            muzzle,
            self.aim_angle,
            stats.projectile_speed,
            self.damage,
            ProjectileOwner::Tower,
        )
        .with_radius(stats.projectile_radius);

        let splash = self.splash_radius();
        if splash > 0.0 {
            projectile = projectile.with_splash(splash);
        }
        if let Some(factor) = self.slow_factor() {
            projectile = projectile.with_slow(factor);
        }

        projectile
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::ScalingData;
    use crate::enemy::EnemyKind;

    fn enemy_at(id: EnemyId, x: f32, y: f32) -> Enemy {
        let path = vec![Vec2::new(x, y), Vec2::new(x + 1000.0, y)];
        Enemy::spawn(id, EnemyKind::Basic, &path, &ScalingData::default())
    }

    #[test]
    fn test_upgrade_recomputes_from_base() {
        let mut tower = Tower::new(1, TowerKind::Basic, Vec2::ZERO, false);
        assert!(tower.upgrade());
        assert!((tower.damage - 56.0).abs() < 1e-3);
        assert!((tower.range - 165.0).abs() < 1e-3);
        assert!((tower.fire_interval - 0.68).abs() < 1e-3);

        assert!(tower.upgrade());
        assert!((tower.damage - 78.0).abs() < 1e-3);
        assert!((tower.range - 181.0).abs() < 1e-3);

        // Level 3 is max
        assert!(!tower.upgrade());
        assert_eq!(tower.level, 3);
        assert!((tower.damage - 78.0).abs() < 1e-3);
    }

    #[test]
    fn test_hill_bonus_multiplies_range() {
        let on_hill = Tower::new(1, TowerKind::Sniper, Vec2::ZERO, true);
        let flat = Tower::new(2, TowerKind::Sniper, Vec2::ZERO, false);
        assert!((on_hill.effective_range() - flat.effective_range() * HILL_RANGE_BONUS).abs() < 1e-3);
    }

    #[test]
    fn test_targets_nearest_in_range() {
        let mut tower = Tower::new(1, TowerKind::Basic, Vec2::ZERO, false);
        let enemies = vec![
            enemy_at(10, 140.0, 0.0),
            enemy_at(11, 60.0, 0.0),
            enemy_at(12, 400.0, 0.0), // out of range
        ];

        tower.update(0.016, 0.0, &enemies);
        assert_eq!(tower.target, Some(11));
    }

    #[test]
    fn test_no_target_out_of_range() {
        let mut tower = Tower::new(1, TowerKind::Basic, Vec2::ZERO, false);
        let enemies = vec![enemy_at(10, 300.0, 0.0)];

        let shot = tower.update(0.016, 0.0, &enemies);
        assert!(shot.is_none());
        assert!(tower.target.is_none());
    }

    #[test]
    fn test_dead_enemies_ignored() {
        let mut tower = Tower::new(1, TowerKind::Basic, Vec2::ZERO, false);
        let mut near = enemy_at(10, 50.0, 0.0);
        near.take_damage(9999.0);
        let enemies = vec![near, enemy_at(11, 100.0, 0.0)];

        tower.update(0.016, 0.0, &enemies);
        assert_eq!(tower.target, Some(11));
    }

    #[test]
    fn test_fire_respects_cooldown() {
        let mut tower = Tower::new(1, TowerKind::Basic, Vec2::ZERO, false);
        let enemies = vec![enemy_at(10, 50.0, 0.0)];

        // First shot fires immediately
        assert!(tower.update(0.016, 0.0, &enemies).is_some());
        // Cooldown not yet elapsed
        assert!(tower.update(0.016, 0.4, &enemies).is_none());
        // Elapsed
        assert!(tower.update(0.016, 0.81, &enemies).is_some());
    }

    #[test]
    fn test_rotation_is_bounded() {
        let mut tower = Tower::new(1, TowerKind::Basic, Vec2::ZERO, false);
        // Enemy straight down; desired angle is PI/2, aim starts at 0
        let enemies = vec![enemy_at(10, 0.0, 100.0)];

        tower.update(0.016, 10.0, &enemies);
        let after_one = tower.aim_angle;
        assert!(after_one > 0.0);
        assert!(after_one < std::f32::consts::FRAC_PI_2);

        for t in 0..100 {
            tower.update(0.016, 10.0 + t as f32, &enemies);
        }
        assert!((tower.aim_angle - std::f32::consts::FRAC_PI_2).abs() < 0.05);
    }

    #[test]
    fn test_splash_tower_projectiles_carry_splash() {
        let mut tower = Tower::new(1, TowerKind::Splash, Vec2::ZERO, false);
        let enemies = vec![enemy_at(10, 50.0, 0.0)];
        let projectile = tower.update(0.016, 0.0, &enemies).unwrap();

        assert!((projectile.splash_radius - 60.0).abs() < 1e-3);
        assert!(projectile.slow_factor.is_none());

        // Splash radius grows with level
        tower.upgrade();
        assert!((tower.splash_radius() - 72.0).abs() < 1e-3);
        tower.upgrade();
        assert!((tower.splash_radius() - 84.0).abs() < 1e-3);
    }

    #[test]
    fn test_slow_tower_projectiles_carry_slow() {
        let mut tower = Tower::new(1, TowerKind::Slow, Vec2::ZERO, false);
        let enemies = vec![enemy_at(10, 50.0, 0.0)];
        let projectile = tower.update(0.016, 0.0, &enemies).unwrap();

        let factor = projectile.slow_factor.unwrap();
        assert!((factor - 0.4).abs() < 1e-3);

        // Slow improves with level
        tower.upgrade();
        assert!((tower.slow_factor().unwrap() - 0.3).abs() < 1e-3);
        tower.upgrade();
        assert!((tower.slow_factor().unwrap() - 0.2).abs() < 1e-3);
    }
}

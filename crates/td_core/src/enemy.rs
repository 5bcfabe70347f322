//! Enemy entities and their path-following behavior.
//!
//! Enemy kinds are a closed tagged set with shared simulation fields;
//! the only behavioral divergence is the boss's phase-threshold speed
//! escalation. Per-kind base stats live in a lookup on [`EnemyKind`],
//! scaled by the level's difficulty multipliers at spawn time.

use serde::{Deserialize, Serialize};

use crate::content::ScalingData;
use crate::geometry::Vec2;

/// Distance within which an enemy counts as having reached a waypoint.
pub const WAYPOINT_EPSILON: f32 = 5.0;

/// Stable identifier for a live enemy.
pub type EnemyId = u32;

/// Closed set of enemy kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EnemyKind {
    /// Standard foot soldier.
    Basic,
    /// Fast but fragile scout.
    Fast,
    /// Heavily armored, slow.
    Tank,
    /// Multi-phase boss; speeds up as health drops.
    Boss,
}

/// Immutable per-kind base statistics.
#[derive(Debug, Clone, Copy)]
pub struct EnemyStats {
    /// Starting health.
    pub health: f32,
    /// Movement speed in field units per second.
    pub speed: f32,
    /// Gold credited on kill.
    pub reward: u32,
    /// Lives removed when this enemy reaches the end of the path.
    pub damage: u32,
    /// Collision radius.
    pub radius: f32,
}

impl EnemyKind {
    /// Parse a content-table kind name.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "basic" => Some(Self::Basic),
            "fast" => Some(Self::Fast),
            "tank" => Some(Self::Tank),
            "boss" => Some(Self::Boss),
            _ => None,
        }
    }

    /// Canonical kind name, matching content tables.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Basic => "basic",
            Self::Fast => "fast",
            Self::Tank => "tank",
            Self::Boss => "boss",
        }
    }

    /// Base statistics before level scaling.
    #[must_use]
    pub const fn base_stats(self) -> EnemyStats {
        match self {
            Self::Basic => EnemyStats {
                health: 100.0,
                speed: 80.0,
                reward: 10,
                damage: 1,
                radius: 14.0,
            },
            Self::Fast => EnemyStats {
                health: 50.0,
                speed: 150.0,
                reward: 15,
                damage: 1,
                radius: 11.0,
            },
            Self::Tank => EnemyStats {
                health: 400.0,
                speed: 40.0,
                reward: 30,
                damage: 2,
                radius: 20.0,
            },
            Self::Boss => EnemyStats {
                health: 2000.0,
                speed: 30.0,
                reward: 200,
                damage: 5,
                radius: 32.0,
            },
        }
    }
}

/// A live enemy walking the level path.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enemy {
    /// Stable identifier, assigned by the simulation.
    pub id: EnemyId,
    /// Kind tag.
    pub kind: EnemyKind,
    /// Current position.
    pub position: Vec2,
    /// Index of the waypoint currently being walked toward.
    pub path_index: usize,
    /// Current health; never negative.
    pub health: f32,
    /// Health at spawn.
    pub max_health: f32,
    /// Speed before slow and phase modifiers, with level scaling baked in.
    pub base_speed: f32,
    /// Active slow multiplier; 1.0 means no slow.
    pub slow_factor: f32,
    /// Seconds remaining on the active slow.
    pub slow_remaining: f32,
    /// Boss phase, 1-based; always 1 for non-boss kinds.
    pub phase: u8,
    /// Gold credited on kill, with level scaling baked in.
    pub reward: u32,
    /// Lives removed if this enemy reaches the end.
    pub damage: u32,
    /// Collision radius.
    pub radius: f32,
    /// Terminal flag: killed by damage. Mutually exclusive with `reached_end`.
    pub is_dead: bool,
    /// Terminal flag: walked off the end of the path.
    pub reached_end: bool,
}

impl Enemy {
    /// Spawn an enemy at the start of `path` with level scaling applied.
    ///
    /// Health and reward multipliers are floored to whole values the
    /// way the content tables document them; speed scales smoothly.
    #[must_use]
    pub fn spawn(id: EnemyId, kind: EnemyKind, path: &[Vec2], scaling: &ScalingData) -> Self {
        let stats = kind.base_stats();
        let position = path.first().copied().unwrap_or(Vec2::ZERO);
        let health = (stats.health * scaling.health).floor();

        Self {
            id,
            kind,
            position,
            path_index: 0,
            health,
            max_health: health,
            base_speed: stats.speed * scaling.speed,
            slow_factor: 1.0,
            slow_remaining: 0.0,
            phase: 1,
            reward: (stats.reward as f32 * scaling.reward).floor() as u32,
            damage: stats.damage,
            radius: stats.radius,
            is_dead: false,
            reached_end: false,
        }
    }

    /// Effective movement speed: base speed with phase escalation and
    /// any active slow applied.
    #[must_use]
    pub fn current_speed(&self) -> f32 {
        self.base_speed * self.phase_multiplier() * self.slow_factor
    }

    /// Speed multiplier for the current boss phase.
    #[must_use]
    pub fn phase_multiplier(&self) -> f32 {
        match self.phase {
            2 => 1.5,
            3 => 2.0,
            _ => 1.0,
        }
    }

    /// Advance slow timers and walk toward the current waypoint.
    ///
    /// Terminal enemies (dead or reached the end) do not move.
    pub fn update(&mut self, dt: f32, path: &[Vec2]) {
        if self.is_dead || self.reached_end {
            return;
        }

        if self.slow_remaining > 0.0 {
            self.slow_remaining -= dt;
            if self.slow_remaining <= 0.0 {
                self.slow_remaining = 0.0;
                self.slow_factor = 1.0;
            }
        }

        let Some(target) = path.get(self.path_index).copied() else {
            self.reached_end = true;
            return;
        };

        let dist = self.position.distance(target);
        if dist < WAYPOINT_EPSILON {
            self.path_index += 1;
            if self.path_index >= path.len() {
                self.reached_end = true;
            }
        } else {
            let step = self.current_speed() * dt;
            let dir = (target - self.position) * (1.0 / dist);
            self.position = self.position + dir * step;
        }
    }

    /// Apply direct damage, clamping health at zero.
    ///
    /// Boss phase thresholds (50% and 25% of max health) are checked
    /// here; a phase only ever increases.
    pub fn take_damage(&mut self, amount: f32) {
        if self.is_dead {
            return;
        }

        self.health -= amount;
        if self.health <= 0.0 {
            self.health = 0.0;
            self.is_dead = true;
        }

        if self.kind == EnemyKind::Boss {
            let fraction = self.health / self.max_health;
            if fraction < 0.25 && self.phase < 3 {
                self.phase = 3;
            } else if fraction < 0.5 && self.phase < 2 {
                self.phase = 2;
            }
        }
    }

    /// Apply a slow effect.
    ///
    /// A slow is an assignment, not a stack: the factor is overwritten
    /// only if the new one is stronger or no slow is active, and the
    /// duration extends to the larger of remaining and new.
    pub fn apply_slow(&mut self, factor: f32, duration: f32) {
        if factor < self.slow_factor || self.slow_remaining <= 0.0 {
            self.slow_factor = factor;
        }
        self.slow_remaining = self.slow_remaining.max(duration);
    }

    /// Whether this enemy should be pruned from the live set.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.is_dead || self.reached_end
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn straight_path() -> Vec<Vec2> {
        vec![Vec2::new(0.0, 0.0), Vec2::new(100.0, 0.0), Vec2::new(100.0, 100.0)]
    }

    fn basic(path: &[Vec2]) -> Enemy {
        Enemy::spawn(1, EnemyKind::Basic, path, &ScalingData::default())
    }

    #[test]
    fn test_kind_name_roundtrip() {
        for kind in [
            EnemyKind::Basic,
            EnemyKind::Fast,
            EnemyKind::Tank,
            EnemyKind::Boss,
        ] {
            assert_eq!(EnemyKind::from_name(kind.name()), Some(kind));
        }
        assert!(EnemyKind::from_name("dragon").is_none());
    }

    #[test]
    fn test_spawn_applies_scaling() {
        let scaling = ScalingData {
            health: 1.5,
            speed: 2.0,
            reward: 1.2,
        };
        let enemy = Enemy::spawn(1, EnemyKind::Basic, &straight_path(), &scaling);

        assert!((enemy.health - 150.0).abs() < 1e-6);
        assert!((enemy.base_speed - 160.0).abs() < 1e-6);
        assert_eq!(enemy.reward, 12);
    }

    #[test]
    fn test_moves_toward_waypoint() {
        let path = straight_path();
        let mut enemy = basic(&path);
        // Starts at the first waypoint, immediately advances the cursor
        enemy.update(0.1, &path);
        assert_eq!(enemy.path_index, 1);

        enemy.update(0.5, &path);
        assert!(enemy.position.x > 0.0);
        assert!((enemy.position.y).abs() < 1e-6);
    }

    #[test]
    fn test_reaches_end() {
        let path = vec![Vec2::new(0.0, 0.0), Vec2::new(20.0, 0.0)];
        let mut enemy = basic(&path);

        for _ in 0..100 {
            enemy.update(0.1, &path);
        }

        assert!(enemy.reached_end);
        assert!(!enemy.is_dead);
    }

    #[test]
    fn test_damage_clamps_at_zero() {
        let path = straight_path();
        let mut enemy = basic(&path);

        enemy.take_damage(9999.0);
        assert!(enemy.is_dead);
        assert!((enemy.health).abs() < 1e-6);

        // No resurrection
        enemy.take_damage(10.0);
        assert!(enemy.is_dead);
        assert!((enemy.health).abs() < 1e-6);
    }

    #[test]
    fn test_slow_overwrite_if_stronger() {
        let path = straight_path();
        let mut enemy = basic(&path);

        enemy.apply_slow(0.5, 2.0);
        assert!((enemy.slow_factor - 0.5).abs() < 1e-6);
        assert!(enemy.current_speed() < enemy.base_speed);

        // Weaker slow while active: factor unchanged, duration extends
        enemy.apply_slow(0.8, 3.0);
        assert!((enemy.slow_factor - 0.5).abs() < 1e-6);
        assert!((enemy.slow_remaining - 3.0).abs() < 1e-6);

        // Stronger slow overwrites
        enemy.apply_slow(0.3, 1.0);
        assert!((enemy.slow_factor - 0.3).abs() < 1e-6);
        // Duration never shrinks
        assert!((enemy.slow_remaining - 3.0).abs() < 1e-6);
    }

    #[test]
    fn test_slow_expires() {
        let path = straight_path();
        let mut enemy = basic(&path);

        enemy.apply_slow(0.4, 0.5);
        enemy.update(0.3, &path);
        assert!(enemy.current_speed() < enemy.base_speed);

        enemy.update(0.3, &path);
        assert!((enemy.slow_factor - 1.0).abs() < 1e-6);
        assert!((enemy.current_speed() - enemy.base_speed).abs() < 1e-6);
    }

    #[test]
    fn test_boss_phases_escalate() {
        let path = straight_path();
        let mut boss = Enemy::spawn(1, EnemyKind::Boss, &path, &ScalingData::default());
        let base = boss.base_speed;

        assert_eq!(boss.phase, 1);

        // Below 50%
        boss.take_damage(1100.0);
        assert_eq!(boss.phase, 2);
        assert!((boss.current_speed() - base * 1.5).abs() < 1e-4);

        // Below 25%
        boss.take_damage(500.0);
        assert_eq!(boss.phase, 3);
        assert!((boss.current_speed() - base * 2.0).abs() < 1e-4);
    }

    #[test]
    fn test_boss_phase_skips_straight_to_three() {
        let path = straight_path();
        let mut boss = Enemy::spawn(1, EnemyKind::Boss, &path, &ScalingData::default());

        // One huge hit that crosses both thresholds
        boss.take_damage(1900.0);
        assert_eq!(boss.phase, 3);
    }

    #[test]
    fn test_boss_phase_survives_slow_expiry() {
        let path = straight_path();
        let mut boss = Enemy::spawn(1, EnemyKind::Boss, &path, &ScalingData::default());
        let base = boss.base_speed;

        boss.take_damage(1100.0);
        boss.apply_slow(0.4, 0.2);
        assert!((boss.current_speed() - base * 1.5 * 0.4).abs() < 1e-4);

        boss.update(0.3, &path);
        assert!((boss.current_speed() - base * 1.5).abs() < 1e-4);
    }

    #[test]
    fn test_nonboss_never_phases() {
        let path = straight_path();
        let mut tank = Enemy::spawn(1, EnemyKind::Tank, &path, &ScalingData::default());
        tank.take_damage(350.0);
        assert_eq!(tank.phase, 1);
        assert!((tank.phase_multiplier() - 1.0).abs() < 1e-6);
    }
}

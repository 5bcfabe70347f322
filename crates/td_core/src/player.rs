//! The player-controlled ballista.
//!
//! The ballista sits at a fixed emplacement at the bottom of the field
//! and fires toward the host-supplied aim point while the fire input is
//! held. It upgrades along two independent tracks (fire rate and
//! damage) whose stats are recomputed from base values per level.

use serde::{Deserialize, Serialize};

use crate::geometry::{direction_from_angle, Vec2};
use crate::projectile::{Projectile, ProjectileOwner};

/// Fixed ballista emplacement.
pub const BALLISTA_POSITION: Vec2 = Vec2::new(640.0, 670.0);

/// Distance from the pivot to the projectile spawn point.
pub const BARREL_LENGTH: f32 = 50.0;

/// Maximum fire-rate upgrade level.
pub const MAX_FIRE_RATE_LEVEL: u8 = 10;

/// Maximum damage upgrade level.
pub const MAX_DAMAGE_LEVEL: u8 = 5;

/// How far below horizontal the barrel may point, in radians.
///
/// Angles use canvas conventions (y down), so "below horizontal" is
/// the band around `PI/2`. Aim points inside the band clamp to the
/// nearer edge.
pub const AIM_DEPRESSION_LIMIT: f32 = 0.3;

const BASE_FIRE_INTERVAL: f32 = 0.8;
const BASE_DAMAGE: f32 = 25.0;
const PROJECTILE_SPEED: f32 = 700.0;
/// Per-level fire-interval multiplier.
const FIRE_RATE_GROWTH: f32 = 0.92;
/// Per-level damage multiplier.
const DAMAGE_GROWTH: f32 = 1.4;

/// The player-controlled ballista.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ballista {
    /// Fixed pivot position.
    pub position: Vec2,
    /// Current barrel angle in radians.
    pub aim_angle: f32,
    /// Fire-rate upgrade level, 1..=10.
    pub fire_rate_level: u8,
    /// Damage upgrade level, 1..=5.
    pub damage_level: u8,
    /// Simulation time of the last shot; `None` before the first.
    pub last_fired: Option<f32>,
}

impl Default for Ballista {
    fn default() -> Self {
        Self::new()
    }
}

impl Ballista {
    /// Create a ballista at its emplacement with both tracks at level 1.
    #[must_use]
    pub fn new() -> Self {
        Self {
            position: BALLISTA_POSITION,
            aim_angle: -std::f32::consts::FRAC_PI_2,
            fire_rate_level: 1,
            damage_level: 1,
            last_fired: None,
        }
    }

    /// Seconds between shots at the current fire-rate level.
    #[must_use]
    pub fn fire_interval(&self) -> f32 {
        BASE_FIRE_INTERVAL * FIRE_RATE_GROWTH.powi(i32::from(self.fire_rate_level) - 1)
    }

    /// Damage per shot at the current damage level.
    #[must_use]
    pub fn damage(&self) -> f32 {
        (BASE_DAMAGE * DAMAGE_GROWTH.powi(i32::from(self.damage_level) - 1)).floor()
    }

    /// Raise the fire-rate level by one. Returns `false` at max level.
    pub fn upgrade_fire_rate(&mut self) -> bool {
        if self.fire_rate_level >= MAX_FIRE_RATE_LEVEL {
            return false;
        }
        self.fire_rate_level += 1;
        true
    }

    /// Raise the damage level by one. Returns `false` at max level.
    pub fn upgrade_damage(&mut self) -> bool {
        if self.damage_level >= MAX_DAMAGE_LEVEL {
            return false;
        }
        self.damage_level += 1;
        true
    }

    /// Point the barrel at a field position, clamped so it never aims
    /// more than [`AIM_DEPRESSION_LIMIT`] below horizontal.
    pub fn aim_at(&mut self, target: Vec2) {
        use std::f32::consts::{FRAC_PI_2, PI};

        let mut angle = self.position.angle_to(target);
        if angle > AIM_DEPRESSION_LIMIT && angle <= FRAC_PI_2 {
            angle = AIM_DEPRESSION_LIMIT;
        } else if angle > FRAC_PI_2 && angle < PI - AIM_DEPRESSION_LIMIT {
            angle = PI - AIM_DEPRESSION_LIMIT;
        }
        self.aim_angle = angle;
    }

    /// Whether the inter-shot cooldown has elapsed at time `now`.
    #[must_use]
    pub fn ready_to_fire(&self, now: f32) -> bool {
        self.last_fired
            .map_or(true, |last| now - last >= self.fire_interval())
    }

    /// Aim at `target` and, if `firing` and off cooldown, loose a bolt.
    pub fn update(&mut self, now: f32, target: Vec2, firing: bool) -> Option<Projectile> {
        self.aim_at(target);

        if !firing || !self.ready_to_fire(now) {
            return None;
        }

        self.last_fired = Some(now);
        let muzzle = self.position + direction_from_angle(self.aim_angle) * BARREL_LENGTH;
        Some(Projectile::new(
            muzzle,
            self.aim_angle,
            PROJECTILE_SPEED,
            self.damage(),
            ProjectileOwner::Player,
        ))
    }
}

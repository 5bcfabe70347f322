//! Projectile entities.
//!
//! Projectiles are short-lived: spawned by a tower's or the ballista's
//! fire action, integrated forward each frame, and removed on their
//! first qualifying hit (unless piercing) or once they leave the field
//! margin.

use serde::{Deserialize, Serialize};

use crate::geometry::{direction_from_angle, Vec2, FIELD_HEIGHT, FIELD_WIDTH};

/// Margin beyond the visible field before a projectile is pruned.
pub const OFF_FIELD_MARGIN: f32 = 50.0;

/// Who fired a projectile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProjectileOwner {
    /// The player-controlled ballista.
    Player,
    /// A placed tower.
    Tower,
}

/// A projectile in flight.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Projectile {
    /// Current position.
    pub position: Vec2,
    /// Velocity in field units per second.
    pub velocity: Vec2,
    /// Direct-hit damage.
    pub damage: f32,
    /// Who fired this projectile.
    pub owner: ProjectileOwner,
    /// Collision radius.
    pub radius: f32,
    /// Splash radius; 0 means no area damage.
    pub splash_radius: f32,
    /// Slow factor applied on hit; `None` means no slow.
    pub slow_factor: Option<f32>,
    /// Piercing projectiles survive hits.
    pub piercing: bool,
    /// Set after the first qualifying hit of a non-piercing projectile.
    pub is_dead: bool,
}

impl Projectile {
    /// Create a projectile travelling along `angle` at `speed`.
    #[must_use]
    pub fn new(
        position: Vec2,
        angle: f32,
        speed: f32,
        damage: f32,
        owner: ProjectileOwner,
    ) -> Self {
        Self {
            position,
            velocity: direction_from_angle(angle) * speed,
            damage,
            owner,
            radius: 5.0,
            splash_radius: 0.0,
            slow_factor: None,
            piercing: false,
            is_dead: false,
        }
    }

    /// Set the collision radius.
    #[must_use]
    pub fn with_radius(mut self, radius: f32) -> Self {
        self.radius = radius;
        self
    }

    /// Give this projectile area damage on hit.
    #[must_use]
    pub fn with_splash(mut self, splash_radius: f32) -> Self {
        self.splash_radius = splash_radius;
        self
    }

    /// Give this projectile a slow effect on hit.
    #[must_use]
    pub fn with_slow(mut self, factor: f32) -> Self {
        self.slow_factor = Some(factor);
        self
    }

    /// Advance the projectile by `dt` seconds.
    pub fn update(&mut self, dt: f32) {
        self.position = self.position + self.velocity * dt;
    }

    /// Whether the projectile has left the field margin.
    #[must_use]
    pub fn is_off_field(&self) -> bool {
        self.position.x < -OFF_FIELD_MARGIN
            || self.position.x > FIELD_WIDTH + OFF_FIELD_MARGIN
            || self.position.y < -OFF_FIELD_MARGIN
            || self.position.y > FIELD_HEIGHT + OFF_FIELD_MARGIN
    }
}

/// Area damage dealt at `dist` from an impact with the given splash
/// radius: linear falloff at half weight, zero at the radius and
/// beyond. The direct hit is handled separately and never double
/// counted through this path.
#[must_use]
pub fn splash_damage(direct_damage: f32, dist: f32, splash_radius: f32) -> f32 {
    if splash_radius <= 0.0 || dist >= splash_radius {
        return 0.0;
    }
    direct_damage * (1.0 - dist / splash_radius) * 0.5
}

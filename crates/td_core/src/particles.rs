//! Impact particles.
//!
//! Particles are cosmetic plain data: the host reads them out of the
//! snapshot and draws them however it likes. They never affect
//! gameplay. Bursts use a deterministic radial fan so identical inputs
//! produce identical effects.

use serde::{Deserialize, Serialize};

use crate::geometry::{direction_from_angle, Vec2};

/// Lifetime of every particle, in seconds.
pub const PARTICLE_LIFETIME: f32 = 0.5;

const EXPLOSION_COUNT: u32 = 12;
const EXPLOSION_SPEED: f32 = 120.0;
const HIT_COUNT: u32 = 5;
const HIT_SPEED: f32 = 60.0;

/// One cosmetic particle.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Particle {
    /// Current position.
    pub position: Vec2,
    /// Velocity in field units per second.
    pub velocity: Vec2,
    /// Remaining lifetime in seconds.
    pub life: f32,
}

/// All live particles.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ParticleSystem {
    particles: Vec<Particle>,
}

impl ParticleSystem {
    /// Radial burst for an enemy death.
    pub fn spawn_explosion(&mut self, center: Vec2) {
        self.spawn_fan(center, EXPLOSION_COUNT, EXPLOSION_SPEED);
    }

    /// Smaller burst for a projectile hit.
    pub fn spawn_hit(&mut self, center: Vec2) {
        self.spawn_fan(center, HIT_COUNT, HIT_SPEED);
    }

    fn spawn_fan(&mut self, center: Vec2, count: u32, speed: f32) {
        let step = std::f32::consts::TAU / count as f32;
        for i in 0..count {
            let angle = step * i as f32;
            self.particles.push(Particle {
                position: center,
                velocity: direction_from_angle(angle) * speed,
                life: PARTICLE_LIFETIME,
            });
        }
    }

    /// Integrate and prune expired particles.
    pub fn update(&mut self, dt: f32) {
        for particle in &mut self.particles {
            particle.position = particle.position + particle.velocity * dt;
            particle.life -= dt;
        }
        self.particles.retain(|particle| particle.life > 0.0);
    }

    /// Live particles.
    #[must_use]
    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    /// Number of live particles.
    #[must_use]
    pub fn len(&self) -> usize {
        self.particles.len()
    }

    /// Whether no particles are live.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }
}

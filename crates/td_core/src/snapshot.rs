//! Read-only views for renderers and HUDs.
//!
//! A snapshot borrows from the simulation for one frame; the host reads
//! what it needs and drops it before the next update. Nothing in here
//! can mutate game state.

use crate::enemy::Enemy;
use crate::particles::Particle;
use crate::player::Ballista;
use crate::projectile::Projectile;
use crate::simulation::{GameState, Simulation};
use crate::tower::{Tower, TowerId};
use crate::waves::WavePhase;

/// Wave progress for the HUD.
#[derive(Debug, Clone, Copy)]
pub struct WaveStatus {
    /// 1-based wave in progress, 0 before the first.
    pub current: u32,
    /// Total waves in the level.
    pub total: u32,
    /// Sequencer phase.
    pub phase: WavePhase,
    /// Seconds left on the countdown, 0 outside the countdown.
    pub countdown: f32,
}

/// One frame's worth of read-only game state.
#[derive(Debug)]
pub struct GameSnapshot<'a> {
    /// Top-level state.
    pub state: GameState,
    /// Level id.
    pub level_id: u32,
    /// Level display name.
    pub level_name: &'a str,
    /// Lives remaining.
    pub lives: u32,
    /// Gold balance.
    pub gold: u32,
    /// Score.
    pub score: u32,
    /// Wave progress.
    pub wave: WaveStatus,
    /// The player ballista.
    pub ballista: &'a Ballista,
    /// Live enemies.
    pub enemies: &'a [Enemy],
    /// Placed towers.
    pub towers: &'a [Tower],
    /// Projectiles in flight.
    pub projectiles: &'a [Projectile],
    /// Cosmetic particles.
    pub particles: &'a [Particle],
    /// Selected tower, if any.
    pub selected_tower: Option<TowerId>,
}

impl Simulation {
    /// Borrow a read-only view of the current frame.
    #[must_use]
    pub fn snapshot(&self) -> GameSnapshot<'_> {
        let sequencer = self.sequencer();
        GameSnapshot {
            state: self.state(),
            level_id: self.level_id(),
            level_name: self.level_name(),
            lives: self.lives(),
            gold: self.gold(),
            score: self.score(),
            wave: WaveStatus {
                current: sequencer.current_wave(),
                total: sequencer.total_waves(),
                phase: sequencer.phase(),
                countdown: sequencer.countdown(),
            },
            ballista: self.ballista(),
            enemies: self.enemies(),
            towers: self.towers(),
            projectiles: self.projectiles(),
            particles: self.particles().particles(),
            selected_tower: self.selected_tower(),
        }
    }
}

//! The per-frame orchestrator.
//!
//! [`Simulation`] owns all mutable game state for one level and
//! advances it with a fixed phase order each frame: player, waves,
//! enemies, towers, projectiles, collisions, then the end-state check.
//! The host drives it with pre-sampled input; commands (placement,
//! upgrades, selling, pause, countdown skip) are separate methods that
//! apply immediately and atomically.

use serde::{Deserialize, Serialize};

use crate::content::{LevelCatalogue, LevelData, ScalingData};
use crate::economy::{
    self, damage_upgrade_cost, fire_rate_upgrade_cost, tower_upgrade_cost, Economy,
};
use crate::enemy::{Enemy, EnemyId, EnemyKind};
use crate::error::{GameError, Result};
use crate::geometry::{Vec2, FIELD_WIDTH, TILE_SIZE};
use crate::particles::ParticleSystem;
use crate::player::Ballista;
use crate::projectile::Projectile;
use crate::terrain::TerrainMap;
use crate::tower::{Tower, TowerId, TowerKind};
use crate::waves::WaveSequencer;

/// Largest frame delta the simulation will integrate. Longer host
/// frames (tab unfocus, debugger pauses) are clamped, trading wall
/// clock accuracy for stable physics.
pub const MAX_FRAME_DELTA: f32 = 0.1;

/// Duration of the slow effect applied by slow projectiles.
pub const SLOW_DURATION: f32 = 2.0;

/// Minimum center-to-center spacing between towers.
pub const TOWER_MIN_SPACING: f32 = 50.0;

/// Pick radius for selecting a tower at a point.
pub const TOWER_PICK_RADIUS: f32 = 25.0;

/// Placement bounds: towers must sit clear of the field edges and the
/// HUD band at the top and the ballista emplacement at the bottom.
const PLACEMENT_MIN_X: f32 = TILE_SIZE;
const PLACEMENT_MAX_X: f32 = FIELD_WIDTH - TILE_SIZE;
const PLACEMENT_MIN_Y: f32 = 100.0;
const PLACEMENT_MAX_Y: f32 = 620.0;

/// Score awarded per gold of kill reward.
const SCORE_PER_REWARD: u32 = 10;

/// Top-level game state. Only `Playing` advances the simulation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameState {
    /// No level loaded or level not started.
    Menu,
    /// Level running.
    Playing,
    /// Level frozen; input ignored except unpause.
    Paused,
    /// Interstitial between waves. Reserved for hosts that want a
    /// between-wave screen; the simulation itself never enters it.
    WaveComplete,
    /// All waves cleared with lives remaining.
    LevelComplete,
    /// Lives reached zero.
    GameOver,
}

/// Host input sampled once per frame.
#[derive(Debug, Clone, Copy, Default)]
pub struct InputSnapshot {
    /// Field position the ballista aims at.
    pub aim: Vec2,
    /// Whether the fire input is held.
    pub firing: bool,
}

/// Level completion record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelResult {
    /// The completed level.
    pub level_id: u32,
    /// Star rating, 1..=3, from the fraction of lives kept.
    pub stars: u8,
}

/// What happened during one frame, for host-side sound and UI cues.
#[derive(Debug, Clone, Default)]
pub struct FrameEvents {
    /// Enemies spawned this frame.
    pub enemies_spawned: u32,
    /// Enemies killed this frame.
    pub enemies_killed: u32,
    /// Enemies that reached the base this frame.
    pub enemies_leaked: u32,
    /// Set on the frame the level completes.
    pub level_complete: Option<LevelResult>,
    /// Set on the frame lives reach zero.
    pub game_over: bool,
}

/// All mutable state for one level in progress.
#[derive(Debug, Clone)]
pub struct Simulation {
    state: GameState,
    level_id: u32,
    level_name: String,
    clock: f32,
    lives: u32,
    starting_lives: u32,
    score: u32,
    path: Vec<Vec2>,
    scaling: ScalingData,
    terrain: TerrainMap,
    sequencer: WaveSequencer,
    economy: Economy,
    ballista: Ballista,
    enemies: Vec<Enemy>,
    towers: Vec<Tower>,
    projectiles: Vec<Projectile>,
    particles: ParticleSystem,
    next_enemy_id: EnemyId,
    next_tower_id: TowerId,
    selected_tower: Option<TowerId>,
}

impl Simulation {
    /// Start a level. The simulation begins in `Playing` with the
    /// initial wave countdown running.
    #[must_use]
    pub fn new(level: &LevelData) -> Self {
        tracing::info!(level = level.id, name = %level.name, "level started");
        Self {
            state: GameState::Playing,
            level_id: level.id,
            level_name: level.name.clone(),
            clock: 0.0,
            lives: level.lives,
            starting_lives: level.lives.max(1),
            score: 0,
            path: level.path.clone(),
            scaling: level.scaling,
            terrain: TerrainMap::new(level.terrain.clone(), level.path.clone()),
            sequencer: WaveSequencer::new(level.waves.clone()),
            economy: Economy::new(level.starting_gold),
            ballista: Ballista::new(),
            enemies: Vec::new(),
            towers: Vec::new(),
            projectiles: Vec::new(),
            particles: ParticleSystem::default(),
            next_enemy_id: 0,
            next_tower_id: 0,
            selected_tower: None,
        }
    }

    /// Start a level out of a catalogue.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::LevelNotFound`] for an unknown id.
    pub fn from_catalogue(catalogue: &LevelCatalogue, level_id: u32) -> Result<Self> {
        catalogue
            .level(level_id)
            .map(Self::new)
            .ok_or(GameError::LevelNotFound(level_id))
    }

    /// Advance one frame. `dt` is clamped to [`MAX_FRAME_DELTA`].
    /// A no-op outside `Playing`.
    pub fn update(&mut self, dt: f32, input: &InputSnapshot) -> FrameEvents {
        let mut events = FrameEvents::default();

        if self.state != GameState::Playing {
            return events;
        }

        let dt = dt.clamp(0.0, MAX_FRAME_DELTA);
        self.clock += dt;

        self.update_player(input);
        self.update_waves(dt, &mut events);
        self.update_enemies(dt, &mut events);
        if events.game_over {
            return events;
        }
        self.update_towers(dt);
        self.update_projectiles(dt);
        self.resolve_collisions(&mut events);
        self.particles.update(dt);
        self.check_end_state(&mut events);

        events
    }

    fn update_player(&mut self, input: &InputSnapshot) {
        if let Some(bolt) = self.ballista.update(self.clock, input.aim, input.firing) {
            self.projectiles.push(bolt);
        }
    }

    fn update_waves(&mut self, dt: f32, events: &mut FrameEvents) {
        let field_clear = self.enemies.is_empty();
        for kind_name in self.sequencer.update(dt, field_clear) {
            let Some(kind) = EnemyKind::from_name(&kind_name) else {
                tracing::warn!(kind = %kind_name, "unknown enemy kind in wave, skipping");
                continue;
            };
            let id = self.next_enemy_id;
            self.next_enemy_id += 1;
            self.enemies
                .push(Enemy::spawn(id, kind, &self.path, &self.scaling));
            events.enemies_spawned += 1;
        }
    }

    fn update_enemies(&mut self, dt: f32, events: &mut FrameEvents) {
        for enemy in &mut self.enemies {
            enemy.update(dt, &self.path);
        }

        let mut leaked_damage = 0u32;
        self.enemies.retain(|enemy| {
            if enemy.reached_end {
                leaked_damage += enemy.damage;
                events.enemies_leaked += 1;
                false
            } else {
                !enemy.is_dead
            }
        });

        if leaked_damage > 0 {
            self.lives = self.lives.saturating_sub(leaked_damage);
            tracing::debug!(lives = self.lives, "base damaged");
            if self.lives == 0 {
                self.state = GameState::GameOver;
                events.game_over = true;
                tracing::info!(level = self.level_id, score = self.score, "game over");
            }
        }
    }

    fn update_towers(&mut self, dt: f32) {
        for tower in &mut self.towers {
            if let Some(shot) = tower.update(dt, self.clock, &self.enemies) {
                self.projectiles.push(shot);
            }
        }
    }

    fn update_projectiles(&mut self, dt: f32) {
        for projectile in &mut self.projectiles {
            projectile.update(dt);
        }
        self.projectiles.retain(|p| !p.is_off_field());
    }

    fn resolve_collisions(&mut self, events: &mut FrameEvents) {
        for projectile in &mut self.projectiles {
            if projectile.is_dead {
                continue;
            }

            for i in 0..self.enemies.len() {
                if self.enemies[i].is_dead {
                    continue;
                }
                let dist = projectile.position.distance(self.enemies[i].position);
                if dist >= projectile.radius + self.enemies[i].radius {
                    continue;
                }

                // Direct hit
                self.enemies[i].take_damage(projectile.damage);
                if let Some(factor) = projectile.slow_factor {
                    self.enemies[i].apply_slow(factor, SLOW_DURATION);
                }
                self.particles.spawn_hit(projectile.position);
                if self.enemies[i].is_dead {
                    let victim = self.enemies[i].clone();
                    Self::award_kill(
                        &mut self.economy,
                        &mut self.score,
                        &mut self.particles,
                        &victim,
                        events,
                    );
                }

                // Area damage around the impact, excluding the enemy
                // that took the direct hit (it sits within the
                // projectile's own radius).
                if projectile.splash_radius > 0.0 {
                    let impact = projectile.position;
                    let splash = projectile.splash_radius;
                    for j in 0..self.enemies.len() {
                        if self.enemies[j].is_dead {
                            continue;
                        }
                        let d = impact.distance(self.enemies[j].position);
                        if d >= splash || d <= projectile.radius {
                            continue;
                        }
                        self.enemies[j]
                            .take_damage(crate::projectile::splash_damage(
                                projectile.damage,
                                d,
                                splash,
                            ));
                        if self.enemies[j].is_dead {
                            let victim = self.enemies[j].clone();
                            Self::award_kill(
                                &mut self.economy,
                                &mut self.score,
                                &mut self.particles,
                                &victim,
                                events,
                            );
                        }
                    }
                }

                if !projectile.piercing {
                    projectile.is_dead = true;
                    break;
                }
            }
        }

        self.projectiles.retain(|p| !p.is_dead);
        self.enemies.retain(|e| !e.is_dead);
    }

    fn award_kill(
        economy: &mut Economy,
        score: &mut u32,
        particles: &mut ParticleSystem,
        enemy: &Enemy,
        events: &mut FrameEvents,
    ) {
        economy.deposit(enemy.reward);
        *score += enemy.reward * SCORE_PER_REWARD;
        particles.spawn_explosion(enemy.position);
        events.enemies_killed += 1;
        tracing::debug!(kind = enemy.kind.name(), reward = enemy.reward, "enemy killed");
    }

    fn check_end_state(&mut self, events: &mut FrameEvents) {
        if !self.sequencer.is_complete() || !self.enemies.is_empty() {
            return;
        }

        self.state = GameState::LevelComplete;
        let kept = self.lives as f32 / self.starting_lives as f32;
        let stars = if kept >= 0.9 {
            3
        } else if kept >= 0.5 {
            2
        } else {
            1
        };
        let result = LevelResult {
            level_id: self.level_id,
            stars,
        };
        events.level_complete = Some(result);
        tracing::info!(
            level = self.level_id,
            stars,
            score = self.score,
            "level complete"
        );
    }

    // ---- Commands ----------------------------------------------------

    /// Snap a requested position to the center of its placement tile.
    #[must_use]
    pub fn snap_to_tile(at: Vec2) -> Vec2 {
        Vec2::new(
            (at.x / TILE_SIZE).floor() * TILE_SIZE + TILE_SIZE / 2.0,
            (at.y / TILE_SIZE).floor() * TILE_SIZE + TILE_SIZE / 2.0,
        )
    }

    /// Try to place a tower of `kind` at (the tile containing) `at`.
    ///
    /// Rejections leave all state untouched, in check order: bounds,
    /// terrain, spacing to existing towers, then gold. Returns the new
    /// tower's id on success.
    pub fn place_tower(&mut self, kind: TowerKind, at: Vec2) -> Option<TowerId> {
        if self.state != GameState::Playing {
            return None;
        }

        let position = Self::snap_to_tile(at);
        if position.x < PLACEMENT_MIN_X
            || position.x > PLACEMENT_MAX_X
            || position.y < PLACEMENT_MIN_Y
            || position.y > PLACEMENT_MAX_Y
        {
            tracing::debug!(?position, "placement rejected: out of bounds");
            return None;
        }
        if !self.terrain.can_place_at(position) {
            tracing::debug!(?position, "placement rejected: terrain");
            return None;
        }
        if self
            .towers
            .iter()
            .any(|t| t.position.distance(position) < TOWER_MIN_SPACING)
        {
            tracing::debug!(?position, "placement rejected: too close to a tower");
            return None;
        }
        if !self.economy.spend(economy::tower_cost(kind)) {
            tracing::debug!(kind = kind.name(), "placement rejected: not enough gold");
            return None;
        }

        let id = self.next_tower_id;
        self.next_tower_id += 1;
        let on_hill = self.terrain.is_on_hill(position);
        self.towers.push(Tower::new(id, kind, position, on_hill));
        tracing::debug!(id, kind = kind.name(), on_hill, "tower placed");
        Some(id)
    }

    /// Upgrade a tower one level, charging gold. Fails at max level,
    /// for unknown ids, or when gold is short.
    pub fn upgrade_tower(&mut self, id: TowerId) -> bool {
        if self.state != GameState::Playing {
            return false;
        }
        let Some(tower) = self.towers.iter_mut().find(|t| t.id == id) else {
            return false;
        };
        let Some(cost) = tower_upgrade_cost(tower.kind, tower.level) else {
            return false;
        };
        if !self.economy.spend(cost) {
            return false;
        }
        tower.upgrade()
    }

    /// Sell a tower for 60% of everything invested in it.
    pub fn sell_tower(&mut self, id: TowerId) -> bool {
        if self.state != GameState::Playing {
            return false;
        }
        let Some(index) = self.towers.iter().position(|t| t.id == id) else {
            return false;
        };
        let tower = self.towers.remove(index);
        self.economy
            .deposit(economy::tower_sell_value(tower.kind, tower.level));
        if self.selected_tower == Some(id) {
            self.selected_tower = None;
        }
        true
    }

    /// The tower whose pick radius contains `at`, if any.
    #[must_use]
    pub fn tower_at(&self, at: Vec2) -> Option<TowerId> {
        self.towers
            .iter()
            .find(|t| t.position.distance(at) < TOWER_PICK_RADIUS)
            .map(|t| t.id)
    }

    /// Select the tower at `at` (or clear the selection).
    pub fn select_tower_at(&mut self, at: Vec2) -> Option<TowerId> {
        self.selected_tower = self.tower_at(at);
        self.selected_tower
    }

    /// Buy the next ballista fire-rate upgrade.
    pub fn upgrade_fire_rate(&mut self) -> bool {
        if self.state != GameState::Playing {
            return false;
        }
        let Some(cost) = fire_rate_upgrade_cost(self.ballista.fire_rate_level) else {
            return false;
        };
        self.economy.spend(cost) && self.ballista.upgrade_fire_rate()
    }

    /// Buy the next ballista damage upgrade.
    pub fn upgrade_damage(&mut self) -> bool {
        if self.state != GameState::Playing {
            return false;
        }
        let Some(cost) = damage_upgrade_cost(self.ballista.damage_level) else {
            return false;
        };
        self.economy.spend(cost) && self.ballista.upgrade_damage()
    }

    /// Cut the wave countdown short.
    pub fn skip_countdown(&mut self) {
        if self.state == GameState::Playing {
            self.sequencer.skip_countdown();
        }
    }

    /// Toggle between `Playing` and `Paused`.
    pub fn toggle_pause(&mut self) {
        self.state = match self.state {
            GameState::Playing => GameState::Paused,
            GameState::Paused => GameState::Playing,
            other => other,
        };
    }

    // ---- Read access -------------------------------------------------

    /// Current game state.
    #[must_use]
    pub const fn state(&self) -> GameState {
        self.state
    }

    /// Level id in progress.
    #[must_use]
    pub const fn level_id(&self) -> u32 {
        self.level_id
    }

    /// Level display name.
    #[must_use]
    pub fn level_name(&self) -> &str {
        &self.level_name
    }

    /// Accumulated simulation time in seconds.
    #[must_use]
    pub const fn clock(&self) -> f32 {
        self.clock
    }

    /// Lives remaining.
    #[must_use]
    pub const fn lives(&self) -> u32 {
        self.lives
    }

    /// Current score.
    #[must_use]
    pub const fn score(&self) -> u32 {
        self.score
    }

    /// Current gold balance.
    #[must_use]
    pub const fn gold(&self) -> u32 {
        self.economy.balance()
    }

    /// The wave sequencer, for HUD status.
    #[must_use]
    pub const fn sequencer(&self) -> &WaveSequencer {
        &self.sequencer
    }

    /// The placement oracle, for host-side placement previews.
    #[must_use]
    pub const fn terrain(&self) -> &TerrainMap {
        &self.terrain
    }

    /// The level's waypoint path.
    #[must_use]
    pub fn path(&self) -> &[Vec2] {
        &self.path
    }

    /// The player ballista.
    #[must_use]
    pub const fn ballista(&self) -> &Ballista {
        &self.ballista
    }

    /// Live enemies.
    #[must_use]
    pub fn enemies(&self) -> &[Enemy] {
        &self.enemies
    }

    /// Placed towers.
    #[must_use]
    pub fn towers(&self) -> &[Tower] {
        &self.towers
    }

    /// Projectiles in flight.
    #[must_use]
    pub fn projectiles(&self) -> &[Projectile] {
        &self.projectiles
    }

    /// Live particles.
    #[must_use]
    pub const fn particles(&self) -> &ParticleSystem {
        &self.particles
    }

    /// Currently selected tower, if any.
    #[must_use]
    pub const fn selected_tower(&self) -> Option<TowerId> {
        self.selected_tower
    }
}

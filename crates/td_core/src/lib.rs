//! # TD Core
//!
//! Headless simulation core for Greenwood Defense, a path-following
//! tower-defense game.
//!
//! This crate contains **only** simulation logic:
//! - No rendering
//! - No IO
//! - No wall-clock time (the host supplies pre-clamped frame deltas)
//!
//! This separation enables:
//! - Headless runners and CI soak tests
//! - Swappable presentation layers (the core exposes read-only
//!   snapshots each frame and accepts no rendering calls back)
//! - Unit testing of every gameplay rule without a frame scheduler
//!
//! ## Crate Structure
//!
//! - [`geometry`] - Pure 2D math utilities
//! - [`content`] - Immutable level/wave content records
//! - [`enemy`], [`tower`], [`projectile`], [`player`] - Entity models
//! - [`waves`] - Wave sequencing state machine
//! - [`economy`] - Gold ledger and cost formulas
//! - [`terrain`] - Placement oracle (path/pond/tree/hill queries)
//! - [`simulation`] - The per-frame orchestrator
//! - [`snapshot`] - Read-only render/HUD views

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic)]

pub mod content;
pub mod economy;
pub mod enemy;
pub mod error;
pub mod geometry;
pub mod particles;
pub mod player;
pub mod projectile;
pub mod simulation;
pub mod snapshot;
pub mod terrain;
pub mod tower;
pub mod waves;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::content::{
        GroupData, LevelCatalogue, LevelData, ScalingData, TerrainData, WaveData,
    };
    pub use crate::economy::Economy;
    pub use crate::enemy::{Enemy, EnemyKind};
    pub use crate::error::{GameError, Result};
    pub use crate::geometry::Vec2;
    pub use crate::player::Ballista;
    pub use crate::projectile::{Projectile, ProjectileOwner};
    pub use crate::simulation::{FrameEvents, GameState, InputSnapshot, LevelResult, Simulation};
    pub use crate::snapshot::{GameSnapshot, WaveStatus};
    pub use crate::terrain::TerrainMap;
    pub use crate::tower::{Tower, TowerKind};
    pub use crate::waves::{WavePhase, WaveSequencer};
}

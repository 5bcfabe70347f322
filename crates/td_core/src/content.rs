//! Immutable level content records.
//!
//! These structs define everything a level ships with: the waypoint
//! path, terrain features, wave schedule and difficulty scaling. They
//! are pure data designed to be deserialized from RON files by the
//! host; the core performs no IO and does not validate content beyond
//! the defensive serde defaults documented on each field.

use serde::{Deserialize, Serialize};

use crate::enemy::EnemyKind;
use crate::error::{GameError, Result};
use crate::geometry::Vec2;

/// A complete level definition.
///
/// Immutable once loaded. The simulation never mutates content; it
/// copies what it needs at level start.
///
/// # Example RON
///
/// ```ron
/// LevelData(
///     id: 1,
///     name: "Boot Camp",
///     lives: 20,
///     starting_gold: 200,
///     path: [(x: -30.0, y: 360.0), (x: 200.0, y: 360.0)],
///     terrain: TerrainData(
///         hills: [(center: (x: 350.0, y: 280.0), radius: 70.0)],
///         ponds: [(center: (x: 100.0, y: 550.0), radius: 45.0)],
///         trees: [(center: (x: 80.0, y: 150.0), size: Large)],
///     ),
///     waves: [
///         WaveData(groups: [GroupData(kind: "basic", count: 5, delay: 1.0)]),
///     ],
///     scaling: ScalingData(health: 1.0, speed: 1.0, reward: 1.0),
/// )
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LevelData {
    /// Unique level identifier.
    pub id: u32,

    /// Display name.
    pub name: String,

    /// Lives the base starts with.
    #[serde(default = "default_lives")]
    pub lives: u32,

    /// Gold the player starts with.
    #[serde(default = "default_starting_gold")]
    pub starting_gold: u32,

    /// Ordered waypoints enemies walk through, interpolated linearly.
    pub path: Vec<Vec2>,

    /// Terrain features used by the placement oracle.
    #[serde(default)]
    pub terrain: TerrainData,

    /// Wave schedule, consumed strictly in order.
    pub waves: Vec<WaveData>,

    /// Difficulty multipliers applied to every enemy spawned.
    #[serde(default)]
    pub scaling: ScalingData,
}

impl LevelData {
    /// Check the level for problems the simulation cannot work around.
    ///
    /// Unknown wave kinds are an error here even though the simulation
    /// merely logs and skips them at spawn time, so content problems
    /// surface in tooling before a player meets a short wave.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::InvalidState`] for a path with fewer than
    /// two waypoints or an empty wave list, and
    /// [`GameError::UnknownEnemyKind`] for an unrecognized wave kind.
    pub fn validate(&self) -> Result<()> {
        if self.path.len() < 2 {
            return Err(GameError::InvalidState(format!(
                "level {} path needs at least two waypoints",
                self.id
            )));
        }
        if self.waves.is_empty() {
            return Err(GameError::InvalidState(format!(
                "level {} has no waves",
                self.id
            )));
        }
        for wave in &self.waves {
            for group in &wave.groups {
                if EnemyKind::from_name(&group.kind).is_none() {
                    return Err(GameError::UnknownEnemyKind(group.kind.clone()));
                }
            }
        }
        Ok(())
    }
}

/// Terrain features of a level.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TerrainData {
    /// Hills grant towers a placement-time range bonus.
    #[serde(default)]
    pub hills: Vec<HillData>,
    /// Ponds block tower placement.
    #[serde(default)]
    pub ponds: Vec<PondData>,
    /// Trees block tower placement.
    #[serde(default)]
    pub trees: Vec<TreeData>,
}

/// A circular hill.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct HillData {
    /// Center position.
    pub center: Vec2,
    /// Radius in field units.
    pub radius: f32,
}

/// A circular pond.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PondData {
    /// Center position.
    pub center: Vec2,
    /// Radius in field units.
    pub radius: f32,
}

/// A tree with a size class.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct TreeData {
    /// Trunk position.
    pub center: Vec2,
    /// Size class, determines the blocked footprint.
    #[serde(default)]
    pub size: TreeSize,
}

/// Tree size classes with fixed footprint radii.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TreeSize {
    /// 18-unit footprint.
    #[default]
    Small,
    /// 25-unit footprint.
    Medium,
    /// 35-unit footprint.
    Large,
}

impl TreeSize {
    /// Footprint radius for placement blocking.
    #[must_use]
    pub const fn radius(self) -> f32 {
        match self {
            Self::Small => 18.0,
            Self::Medium => 25.0,
            Self::Large => 35.0,
        }
    }
}

/// One scheduled batch of enemy spawns.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WaveData {
    /// Spawn groups, flattened in order into the spawn queue.
    pub groups: Vec<GroupData>,
}

/// A homogeneous run of spawns within a wave.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupData {
    /// Enemy kind name (e.g. "basic", "fast", "tank", "boss").
    ///
    /// Kept as a string so content can reference kinds the core does
    /// not know; those spawns are logged and skipped at spawn time.
    #[serde(default = "default_kind")]
    pub kind: String,

    /// Number of enemies in this group.
    #[serde(default = "default_count")]
    pub count: u32,

    /// Seconds between consecutive spawns in this group.
    #[serde(default = "default_spawn_delay")]
    pub delay: f32,
}

/// Per-level difficulty multipliers baked into spawned enemies.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ScalingData {
    /// Health multiplier.
    #[serde(default = "default_multiplier")]
    pub health: f32,
    /// Speed multiplier.
    #[serde(default = "default_multiplier")]
    pub speed: f32,
    /// Kill reward multiplier.
    #[serde(default = "default_multiplier")]
    pub reward: f32,
}

impl Default for ScalingData {
    fn default() -> Self {
        Self {
            health: 1.0,
            speed: 1.0,
            reward: 1.0,
        }
    }
}

const fn default_lives() -> u32 {
    20
}

const fn default_starting_gold() -> u32 {
    200
}

fn default_kind() -> String {
    "basic".to_string()
}

const fn default_count() -> u32 {
    1
}

const fn default_spawn_delay() -> f32 {
    0.5
}

const fn default_multiplier() -> f32 {
    1.0
}

/// An ordered collection of levels with lookup by id.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LevelCatalogue {
    levels: Vec<LevelData>,
}

impl LevelCatalogue {
    /// Build a catalogue from a list of levels.
    #[must_use]
    pub fn new(levels: Vec<LevelData>) -> Self {
        Self { levels }
    }

    /// Look up a level by id.
    #[must_use]
    pub fn level(&self, id: u32) -> Option<&LevelData> {
        self.levels.iter().find(|level| level.id == id)
    }

    /// Number of levels.
    #[must_use]
    pub fn len(&self) -> usize {
        self.levels.len()
    }

    /// Check if the catalogue is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    /// Iterate levels in order.
    pub fn iter(&self) -> impl Iterator<Item = &LevelData> {
        self.levels.iter()
    }
}

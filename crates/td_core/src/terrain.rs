//! Terrain placement oracle.
//!
//! Built once at level start from the level's terrain features and
//! waypoint path, then queried by the simulation when the host asks to
//! place a tower. Purely geometric; it knows nothing about gold or
//! existing towers.

use serde::{Deserialize, Serialize};

use crate::content::TerrainData;
use crate::geometry::{point_to_segment_distance, Vec2};

/// Width of the walked path corridor.
pub const PATH_WIDTH: f32 = 50.0;

/// Extra clearance kept between tower centers and blocking features.
pub const PLACEMENT_CLEARANCE: f32 = 20.0;

/// Fraction of a hill's radius that counts as "on the hill" for the
/// placement-time range bonus.
const HILL_PLACEMENT_FRACTION: f32 = 0.8;

/// Terrain features plus the path, resolved for placement queries.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TerrainMap {
    features: TerrainData,
    path: Vec<Vec2>,
}

impl TerrainMap {
    /// Build the oracle for a level.
    #[must_use]
    pub fn new(features: TerrainData, path: Vec<Vec2>) -> Self {
        Self { features, path }
    }

    /// Whether a tower center may sit at `point` as far as terrain is
    /// concerned. The path corridor, ponds and trees all block with
    /// [`PLACEMENT_CLEARANCE`] of slack; hills do not block.
    #[must_use]
    pub fn can_place_at(&self, point: Vec2) -> bool {
        !self.blocked_by_path(point) && !self.blocked_by_pond(point) && !self.blocked_by_tree(point)
    }

    /// Whether `point` lies on a hill for the range bonus. Evaluated
    /// only at placement time; uses a tighter radius than the drawn
    /// hill so towers on the fringe do not qualify.
    #[must_use]
    pub fn is_on_hill(&self, point: Vec2) -> bool {
        self.features
            .hills
            .iter()
            .any(|hill| point.distance(hill.center) < hill.radius * HILL_PLACEMENT_FRACTION)
    }

    fn blocked_by_path(&self, point: Vec2) -> bool {
        let clearance = PATH_WIDTH / 2.0 + PLACEMENT_CLEARANCE;
        self.path
            .windows(2)
            .any(|seg| point_to_segment_distance(point, seg[0], seg[1]) < clearance)
    }

    fn blocked_by_pond(&self, point: Vec2) -> bool {
        self.features
            .ponds
            .iter()
            .any(|pond| point.distance(pond.center) < pond.radius + PLACEMENT_CLEARANCE)
    }

    fn blocked_by_tree(&self, point: Vec2) -> bool {
        self.features
            .trees
            .iter()
            .any(|tree| point.distance(tree.center) < tree.size.radius() + PLACEMENT_CLEARANCE)
    }
}

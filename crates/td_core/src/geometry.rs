//! Pure 2D math utilities for the simulation.
//!
//! Everything here is stateless. Positions and distances are in field
//! units (the playfield is [`FIELD_WIDTH`] x [`FIELD_HEIGHT`]); angles
//! are radians with y pointing down, matching canvas conventions.

use serde::{Deserialize, Serialize};

/// Playfield width in field units.
pub const FIELD_WIDTH: f32 = 1280.0;

/// Playfield height in field units.
pub const FIELD_HEIGHT: f32 = 720.0;

/// Side length of one placement tile.
pub const TILE_SIZE: f32 = 40.0;

/// 2D vector / point.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vec2 {
    /// X coordinate.
    pub x: f32,
    /// Y coordinate.
    pub y: f32,
}

impl Vec2 {
    /// Create a new vector.
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Zero vector.
    pub const ZERO: Self = Self { x: 0.0, y: 0.0 };

    /// Euclidean distance to another point.
    #[must_use]
    pub fn distance(self, other: Self) -> f32 {
        self.distance_squared(other).sqrt()
    }

    /// Squared distance (avoids sqrt for comparisons).
    #[must_use]
    pub fn distance_squared(self, other: Self) -> f32 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        dx * dx + dy * dy
    }

    /// Angle from `self` toward `other`, in radians.
    #[must_use]
    pub fn angle_to(self, other: Self) -> f32 {
        (other.y - self.y).atan2(other.x - self.x)
    }

    /// Linearly interpolate between two points.
    #[must_use]
    pub fn lerp(self, other: Self, t: f32) -> Self {
        Self {
            x: lerp(self.x, other.x, t),
            y: lerp(self.y, other.y, t),
        }
    }
}

impl std::ops::Add for Vec2 {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self {
            x: self.x + rhs.x,
            y: self.y + rhs.y,
        }
    }
}

impl std::ops::Sub for Vec2 {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Self {
            x: self.x - rhs.x,
            y: self.y - rhs.y,
        }
    }
}

impl std::ops::Mul<f32> for Vec2 {
    type Output = Self;

    fn mul(self, rhs: f32) -> Self::Output {
        Self {
            x: self.x * rhs,
            y: self.y * rhs,
        }
    }
}

/// Unit direction vector for an angle.
#[must_use]
pub fn direction_from_angle(angle: f32) -> Vec2 {
    Vec2::new(angle.cos(), angle.sin())
}

/// Normalize an angle into `[0, 2*PI)`.
#[must_use]
pub fn normalize_angle(mut angle: f32) -> f32 {
    use std::f32::consts::TAU;
    while angle < 0.0 {
        angle += TAU;
    }
    while angle >= TAU {
        angle -= TAU;
    }
    angle
}

/// Signed smallest difference from `from` to `to`, in `(-PI, PI]`.
#[must_use]
pub fn angle_difference(from: f32, to: f32) -> f32 {
    use std::f32::consts::{PI, TAU};
    let mut diff = to - from;
    while diff > PI {
        diff -= TAU;
    }
    while diff < -PI {
        diff += TAU;
    }
    diff
}

/// Linear interpolation.
#[must_use]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Clamp `value` into `[min, max]`.
#[must_use]
pub fn clamp(value: f32, min: f32, max: f32) -> f32 {
    value.max(min).min(max)
}

/// Circle-circle overlap test (strict, touching circles do not overlap).
#[must_use]
pub fn circles_overlap(a: Vec2, ra: f32, b: Vec2, rb: f32) -> bool {
    let radii = ra + rb;
    a.distance_squared(b) < radii * radii
}

/// Point-in-circle test (strict).
#[must_use]
pub fn point_in_circle(point: Vec2, center: Vec2, radius: f32) -> bool {
    point.distance_squared(center) < radius * radius
}

/// Distance from a point to the closest point on a line segment.
#[must_use]
pub fn point_to_segment_distance(point: Vec2, a: Vec2, b: Vec2) -> f32 {
    point.distance(closest_point_on_segment(point, a, b))
}

/// Closest point on segment `a..b` to `point`.
#[must_use]
pub fn closest_point_on_segment(point: Vec2, a: Vec2, b: Vec2) -> Vec2 {
    let seg = b - a;
    let len_sq = seg.x * seg.x + seg.y * seg.y;

    if len_sq == 0.0 {
        return a;
    }

    let t = ((point.x - a.x) * seg.x + (point.y - a.y) * seg.y) / len_sq;
    a + seg * clamp(t, 0.0, 1.0)
}

//! Geometry primitives for placed parts.
//!
//! Positions are world coordinates in feet with `z` up (ground at z = 0).
//! Rotations are per-axis degrees; only yaw (`z`) affects the axis-aligned
//! footprint of a part.

use serde::{Deserialize, Serialize};

/// A point in design space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Position {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Origin at ground level.
    pub fn origin() -> Self {
        Self::default()
    }

    /// Euclidean distance to another position.
    pub fn distance_to(&self, other: &Position) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        let dz = self.z - other.z;
        (dx * dx + dy * dy + dz * dz).sqrt()
    }

    /// Distance in the ground plane, ignoring height.
    pub fn horizontal_distance_to(&self, other: &Position) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }

    pub fn translated(&self, dx: f64, dy: f64, dz: f64) -> Self {
        Self::new(self.x + dx, self.y + dy, self.z + dz)
    }
}

/// Per-axis rotation in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rotation {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Rotation {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Yaw-only rotation about the vertical axis.
    pub fn yaw(degrees: f64) -> Self {
        Self::new(0.0, 0.0, degrees)
    }

    /// Normalize every axis into [0, 360).
    pub fn normalized(&self) -> Self {
        Self::new(
            self.x.rem_euclid(360.0),
            self.y.rem_euclid(360.0),
            self.z.rem_euclid(360.0),
        )
    }

    /// Rotate a point in the ground plane by this rotation's yaw.
    pub fn apply_yaw(&self, x: f64, y: f64) -> (f64, f64) {
        let rad = self.z.to_radians();
        let (sin, cos) = rad.sin_cos();
        (x * cos - y * sin, x * sin + y * cos)
    }
}

/// Physical extents of a part in feet.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Dimensions {
    pub width: f64,
    pub depth: f64,
    pub height: f64,
}

impl Dimensions {
    pub fn new(width: f64, depth: f64, height: f64) -> Self {
        Self {
            width,
            depth,
            height,
        }
    }

    /// Ground-plane area.
    pub fn footprint_area(&self) -> f64 {
        self.width * self.depth
    }
}

/// Axis-aligned box in world space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min: Position,
    pub max: Position,
}

impl BoundingBox {
    pub fn new(min: Position, max: Position) -> Self {
        Self { min, max }
    }

    /// World-space extent of a part placed at `position` with `rotation`.
    ///
    /// The part is centered on `position` in the ground plane and sits on
    /// it vertically. Yaw rotates the footprint; the axis-aligned result
    /// uses the rotated corner extremes.
    pub fn from_instance(position: &Position, rotation: &Rotation, dims: &Dimensions) -> Self {
        let hw = dims.width / 2.0;
        let hd = dims.depth / 2.0;
        let corners = [(-hw, -hd), (hw, -hd), (hw, hd), (-hw, hd)];

        let mut min_x = f64::INFINITY;
        let mut min_y = f64::INFINITY;
        let mut max_x = f64::NEG_INFINITY;
        let mut max_y = f64::NEG_INFINITY;
        for (cx, cy) in corners {
            let (rx, ry) = rotation.apply_yaw(cx, cy);
            min_x = min_x.min(rx);
            min_y = min_y.min(ry);
            max_x = max_x.max(rx);
            max_y = max_y.max(ry);
        }

        Self::new(
            Position::new(position.x + min_x, position.y + min_y, position.z),
            Position::new(
                position.x + max_x,
                position.y + max_y,
                position.z + dims.height,
            ),
        )
    }

    /// Smallest box containing both.
    pub fn union(&self, other: &BoundingBox) -> Self {
        Self::new(
            Position::new(
                self.min.x.min(other.min.x),
                self.min.y.min(other.min.y),
                self.min.z.min(other.min.z),
            ),
            Position::new(
                self.max.x.max(other.max.x),
                self.max.y.max(other.max.y),
                self.max.z.max(other.max.z),
            ),
        )
    }

    pub fn size(&self) -> Dimensions {
        Dimensions::new(
            self.max.x - self.min.x,
            self.max.y - self.min.y,
            self.max.z - self.min.z,
        )
    }

    /// Overlap depth with another box along each axis; `None` if disjoint.
    pub fn overlap(&self, other: &BoundingBox) -> Option<Dimensions> {
        let ox = self.max.x.min(other.max.x) - self.min.x.max(other.min.x);
        let oy = self.max.y.min(other.max.y) - self.min.y.max(other.min.y);
        let oz = self.max.z.min(other.max.z) - self.min.z.max(other.min.z);
        if ox > 0.0 && oy > 0.0 && oz > 0.0 {
            Some(Dimensions::new(ox, oy, oz))
        } else {
            None
        }
    }

    /// Whether the ground-plane footprints intersect.
    pub fn footprint_overlaps(&self, other: &BoundingBox) -> bool {
        self.max.x > other.min.x
            && other.max.x > self.min.x
            && self.max.y > other.min.y
            && other.max.y > self.min.y
    }
}

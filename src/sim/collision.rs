//! Bounding-box intersection between sprites
//!
//! Every entity is a rectangle centred on its position, possibly rotated.
//! Intersection is tested on the axis-aligned box enclosing that rectangle,
//! the same frame-overlap test a scene graph performs on node bounds.

use glam::Vec2;

/// Axis-aligned bounding box in scene coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec2,
    pub max: Vec2,
}

impl Aabb {
    pub fn new(min: Vec2, max: Vec2) -> Self {
        Self { min, max }
    }

    /// Box enclosing a `size` rectangle centred at `center`, turned by `rotation` radians
    pub fn from_sprite(center: Vec2, size: Vec2, rotation: f32) -> Self {
        let (sin, cos) = rotation.sin_cos();
        let half = size * 0.5;
        let extent = Vec2::new(
            half.x * cos.abs() + half.y * sin.abs(),
            half.x * sin.abs() + half.y * cos.abs(),
        );
        Self {
            min: center - extent,
            max: center + extent,
        }
    }

    pub fn center(&self) -> Vec2 {
        (self.min + self.max) * 0.5
    }

    pub fn size(&self) -> Vec2 {
        self.max - self.min
    }

    /// True when the boxes share a region of non-zero area (touching edges don't count)
    pub fn intersects(&self, other: &Aabb) -> bool {
        self.min.x < other.max.x
            && other.min.x < self.max.x
            && self.min.y < other.max.y
            && other.min.y < self.max.y
    }

    pub fn contains_point(&self, p: Vec2) -> bool {
        p.x >= self.min.x && p.x <= self.max.x && p.y >= self.min.y && p.y <= self.max.y
    }
}

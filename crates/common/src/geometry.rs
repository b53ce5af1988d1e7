use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::COLLISION_SCALE;

/// Axis-aligned rectangle in world units. `(x, y)` is the top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    pub fn from_pos_size(pos: Vec2, size: Vec2) -> Self {
        Self::new(pos.x, pos.y, size.x, size.y)
    }

    /// Rectangle of the given size whose center is `center`.
    pub fn centered_at(center: Vec2, size: Vec2) -> Self {
        Self::from_pos_size(center - size / 2.0, size)
    }

    pub fn position(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    pub fn size(&self) -> Vec2 {
        Vec2::new(self.w, self.h)
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.w / 2.0, self.y + self.h / 2.0)
    }

    pub fn right(&self) -> f32 {
        self.x + self.w
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.h
    }

    /// Move the top-left corner, keeping the size.
    pub fn set_position(&mut self, pos: Vec2) {
        self.x = pos.x;
        self.y = pos.y;
    }

    /// Half-open overlap test: rectangles that only share an edge do not intersect.
    pub fn intersects(&self, other: &Rect) -> bool {
        self.x < other.right()
            && other.x < self.right()
            && self.y < other.bottom()
            && other.y < self.bottom()
    }

    /// Half-open, like `intersects`.
    pub fn contains_point(&self, p: Vec2) -> bool {
        p.x >= self.x && p.x < self.right() && p.y >= self.y && p.y < self.bottom()
    }
}

/// Derive the collision box for a visual rectangle: same center, scaled by
/// [`COLLISION_SCALE`] on both axes.
pub fn collision_box(visual: &Rect) -> Rect {
    Rect::centered_at(visual.center(), visual.size() * COLLISION_SCALE)
}

/// Clamp a top-left position so that a box of `size` lies inside
/// `[0, world.x] x [0, world.y]`. Each axis is clamped independently.
///
/// Positions already inside the world are returned unchanged.
pub fn get_within_world(pos: Vec2, size: Vec2, world: Vec2) -> Vec2 {
    Vec2::new(
        pos.x.max(0.0).min(world.x - size.x),
        pos.y.max(0.0).min(world.y - size.y),
    )
}

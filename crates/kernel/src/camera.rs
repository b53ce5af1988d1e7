use dungeon_common::{Rect, get_within_world};
use glam::Vec2;

/// Fixed-size view rectangle that follows the player inside the world.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    area: Rect,
}

impl Camera {
    /// Camera of `size` anchored at the origin.
    pub fn new(size: Vec2) -> Self {
        Self {
            area: Rect::from_pos_size(Vec2::ZERO, size),
        }
    }

    /// Current view rectangle.
    pub fn rect(&self) -> Rect {
        self.area
    }

    /// Fixed view dimensions.
    pub fn size(&self) -> Vec2 {
        self.area.size()
    }

    /// Center on `center`, then clamp so the whole view stays in the world.
    pub fn center_on(&mut self, center: Vec2, world_size: Vec2) {
        let desired = center - self.size() / 2.0;
        self.area
            .set_position(get_within_world(desired, self.size(), world_size));
    }
}

use dungeon_common::{Direction, EntityId, Rect, collision_box};
use glam::Vec2;

/// Positioned rectangle plus its derived collision box.
///
/// The collision box is recomputed on every position change and is never
/// stale.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Body {
    rect: Rect,
    collision: Rect,
}

impl Body {
    /// Body at `pos` with its collision box derived from `size`.
    pub fn new(pos: Vec2, size: Vec2) -> Self {
        let rect = Rect::from_pos_size(pos, size);
        Self {
            rect,
            collision: collision_box(&rect),
        }
    }

    /// The visual rectangle, distinct from the collision box.
    pub fn rect(&self) -> Rect {
        self.rect
    }

    pub fn collision_box(&self) -> Rect {
        self.collision
    }

    pub fn position(&self) -> Vec2 {
        self.rect.position()
    }

    pub fn size(&self) -> Vec2 {
        self.rect.size()
    }

    pub fn center(&self) -> Vec2 {
        self.rect.center()
    }

    pub fn set_position(&mut self, pos: Vec2) {
        self.rect.set_position(pos);
        self.collision = collision_box(&self.rect);
    }

    /// A copy of this body moved to `pos`. Leaves `self` untouched.
    pub fn at(&self, pos: Vec2) -> Self {
        Self::new(pos, self.size())
    }
}

/// A body that can move in a cardinal direction at a scalable speed.
///
/// Speeds are in world units per millisecond. New entities face `Left` and
/// stand still; spawn with [`EntitySpawn::moving`](crate::EntitySpawn::moving)
/// (e.g. for projectiles) to start in motion.
#[derive(Debug, Clone, PartialEq)]
pub struct WorldEntity {
    id: EntityId,
    body: Body,
    direction: Direction,
    base_speed: f32,
    speed_multiplier: f32,
    effective_speed: f32,
    is_moving: bool,
}

impl WorldEntity {
    pub(crate) fn new(id: EntityId, pos: Vec2, size: Vec2, base_speed: f32) -> Self {
        Self {
            id,
            body: Body::new(pos, size),
            direction: Direction::default(),
            base_speed,
            speed_multiplier: 1.0,
            effective_speed: base_speed,
            is_moving: false,
        }
    }

    pub fn id(&self) -> EntityId {
        self.id
    }

    pub fn body(&self) -> &Body {
        &self.body
    }

    pub fn rect(&self) -> Rect {
        self.body.rect()
    }

    pub fn collision_box(&self) -> Rect {
        self.body.collision_box()
    }

    pub fn position(&self) -> Vec2 {
        self.body.position()
    }

    pub fn size(&self) -> Vec2 {
        self.body.size()
    }

    pub fn center(&self) -> Vec2 {
        self.body.center()
    }

    /// Facing, kept while stationary.
    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn is_moving(&self) -> bool {
        self.is_moving
    }

    pub fn base_speed(&self) -> f32 {
        self.base_speed
    }

    pub fn speed_multiplier(&self) -> f32 {
        self.speed_multiplier
    }

    /// `base_speed * speed_multiplier`.
    pub fn effective_speed(&self) -> f32 {
        self.effective_speed
    }

    /// Start moving. A `Direction` is always a real direction; use
    /// [`set_stationary`](Self::set_stationary) to stop.
    pub fn set_moving_in_direction(&mut self, direction: Direction) {
        self.direction = direction;
        self.is_moving = true;
    }

    /// Stop moving. The facing direction is kept.
    pub fn set_stationary(&mut self) {
        self.is_moving = false;
    }

    /// Where this entity would be after `elapsed_ms` of movement, or `None`
    /// when stationary. Pure: nothing is mutated.
    pub fn tentative_position(&self, elapsed_ms: f32) -> Option<Vec2> {
        self.is_moving
            .then(|| self.tentative_position_in(self.direction, elapsed_ms))
    }

    /// Where this entity would be after moving `elapsed_ms` in `direction`,
    /// whether or not it is currently moving.
    pub fn tentative_position_in(&self, direction: Direction, elapsed_ms: f32) -> Vec2 {
        self.position() + direction.vector() * self.effective_speed * elapsed_ms
    }

    /// Additive speed multiplier change. No bounds are enforced: callers
    /// apply and remove symmetric deltas.
    pub fn adjust_speed_multiplier(&mut self, delta: f32) {
        self.speed_multiplier += delta;
        self.effective_speed = self.base_speed * self.speed_multiplier;
    }

    pub(crate) fn set_position(&mut self, pos: Vec2) {
        self.body.set_position(pos);
    }
}

use dungeon_common::Rect;
use glam::Vec2;

/// Errors from constructing a world or spawning into it.
///
/// Missing entities are never errors: lookups return `Option` and removals
/// are no-ops.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum WorldError {
    #[error("world size must be positive, finite, and small enough to partition, got {0:?}")]
    InvalidWorldSize(Vec2),
    #[error("camera size {camera:?} must be positive and fit inside the world {world:?}")]
    InvalidCameraSize { camera: Vec2, world: Vec2 },
    #[error("entity size {size:?} must be positive and fit inside the world {world:?}")]
    InvalidEntitySize { size: Vec2, world: Vec2 },
    #[error("enemy max health must be positive, got {max_health}")]
    InvalidHealth { max_health: i32 },
    #[error("wall {index} at {rect:?} lies outside the world")]
    WallOutOfBounds { index: usize, rect: Rect },
}

//! Shared types for the dungeon world engine.
//!
//! # Invariants
//! - Collision boxes are derived from the visual rectangle, never stored apart from it.
//! - Overlap is half-open: touching edges do not collide.

pub mod geometry;
pub mod types;

pub use geometry::{Rect, collision_box, get_within_world};
pub use types::{Direction, EntityId, EntityKind, ParseDirectionError};

/// Fraction of an entity's visual size used for its collision box.
pub const COLLISION_SCALE: f32 = 0.7;

/// Side length of a wall bucket in world units.
pub const WALL_BUCKET_SIZE: f32 = 100.0;

/// Side length of a pathfinding grid cell in world units.
pub const GRID_CELL_SIZE: f32 = 25.0;

//! Collision resolution for moving entities.
//!
//! Obstacles are the walls in the bucket neighborhood of the candidate
//! position plus every enemy and the player. Dynamic entities are few, so
//! they are scanned linearly. Tests are pure: no entity is moved to test a position.

use dungeon_common::{EntityId, get_within_world};
use glam::Vec2;
use std::iter;

use crate::World;
use crate::entity::Body;

/// What happened to one entity's movement this tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MoveOutcome {
    /// Not moving, or not a known entity.
    Stationary,
    /// Committed to the given (clamped) position.
    Moved(Vec2),
    /// The move would overlap an obstacle; the entity stayed put.
    Blocked,
}

impl World {
    /// Would entity `id` overlap any obstacle if it stood at `candidate`?
    ///
    /// The entity itself is never an obstacle. Unknown ids never collide.
    pub fn would_collide(&self, id: EntityId, candidate: Vec2) -> bool {
        match self.entity(id) {
            Some(entity) => self.collides_at(id, entity.size(), candidate),
            None => false,
        }
    }

    fn collides_at(&self, id: EntityId, size: Vec2, candidate: Vec2) -> bool {
        let candidate_box = Body::new(candidate, size).collision_box();
        self.walls_near_point(candidate)
            .into_iter()
            .chain(self.enemies.iter().map(|e| &e.entity))
            .chain(iter::once(&self.player))
            .filter(|other| other.id() != id)
            .any(|other| other.collision_box().intersects(&candidate_box))
    }

    /// Move an entity along its direction for `elapsed_ms`, all or nothing.
    ///
    /// The tentative position is clamped into the world first. If the clamped
    /// position collides, the entity keeps its previous position exactly; there
    /// is no partial movement or sliding.
    pub fn resolve_move(&mut self, id: EntityId, elapsed_ms: f32) -> MoveOutcome {
        let world_size = self.world_size();
        let Some(entity) = self.entity(id) else {
            return MoveOutcome::Stationary;
        };
        let Some(tentative) = entity.tentative_position(elapsed_ms) else {
            return MoveOutcome::Stationary;
        };
        let size = entity.size();
        let candidate = get_within_world(tentative, size, world_size);

        if self.collides_at(id, size, candidate) {
            tracing::trace!(%id, x = candidate.x, y = candidate.y, "move blocked");
            return MoveOutcome::Blocked;
        }
        match self.entity_mut(id) {
            Some(entity) => {
                entity.set_position(candidate);
                tracing::trace!(%id, x = candidate.x, y = candidate.y, "moved");
                MoveOutcome::Moved(candidate)
            }
            // Walls resolve through `entity` but can never be moving.
            None => MoveOutcome::Stationary,
        }
    }
}

use std::fmt;

use dungeon_common::{EntityId, Rect};

use crate::World;
use crate::entity::WorldEntity;

/// Opaque AI controller attached to an enemy.
///
/// Called once per step with the world passed in explicitly. The mind is
/// detached from its enemy for the duration of the call, so it may freely
/// mutate any part of the world, including removing its own enemy.
pub trait EnemyMind {
    fn control(&mut self, enemy: EntityId, world: &mut World, elapsed_ms: f32);
}

/// Payload logic attached to a projectile. The only code that marks a
/// projectile expired.
pub trait ProjectileBehavior {
    fn update(&mut self, projectile: EntityId, world: &mut World, elapsed_ms: f32);
}

pub struct Enemy {
    pub entity: WorldEntity,
    health: i32,
    max_health: i32,
    pub(crate) mind: Option<Box<dyn EnemyMind>>,
}

impl Enemy {
    pub(crate) fn new(
        entity: WorldEntity,
        health: i32,
        max_health: i32,
        mind: Option<Box<dyn EnemyMind>>,
    ) -> Self {
        Self {
            entity,
            health: health.min(max_health).max(0),
            max_health,
            mind,
        }
    }

    pub fn id(&self) -> EntityId {
        self.entity.id()
    }

    pub fn health(&self) -> i32 {
        self.health
    }

    pub fn max_health(&self) -> i32 {
        self.max_health
    }

    /// Dead enemies stay in the world until the next prune.
    pub fn is_dead(&self) -> bool {
        self.health == 0
    }

    /// Floors at zero.
    pub fn lose_health(&mut self, amount: i32) {
        self.health = (self.health - amount).max(0);
    }

    /// Caps at `max_health`.
    pub fn gain_health(&mut self, amount: i32) {
        self.health = (self.health + amount).min(self.max_health);
    }
}

impl fmt::Debug for Enemy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Enemy")
            .field("entity", &self.entity)
            .field("health", &self.health)
            .field("max_health", &self.max_health)
            .field("has_mind", &self.mind.is_some())
            .finish()
    }
}

pub struct Projectile {
    pub entity: WorldEntity,
    has_expired: bool,
    pub(crate) behavior: Option<Box<dyn ProjectileBehavior>>,
}

impl Projectile {
    pub(crate) fn new(entity: WorldEntity, behavior: Option<Box<dyn ProjectileBehavior>>) -> Self {
        Self {
            entity,
            has_expired: false,
            behavior,
        }
    }

    pub fn id(&self) -> EntityId {
        self.entity.id()
    }

    pub fn has_expired(&self) -> bool {
        self.has_expired
    }

    /// Mark for removal at the next prune.
    pub fn expire(&mut self) {
        self.has_expired = true;
    }
}

impl fmt::Debug for Projectile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Projectile")
            .field("entity", &self.entity)
            .field("has_expired", &self.has_expired)
            .field("has_behavior", &self.behavior.is_some())
            .finish()
    }
}

/// What a ground item gives when picked up.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum Loot {
    Potion(String),
    Item(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct GroundItem {
    pub entity: WorldEntity,
    pub loot: Loot,
}

impl GroundItem {
    pub fn id(&self) -> EntityId {
        self.entity.id()
    }
}

/// A timed, non-colliding effect such as damage text or a hit flash.
#[derive(Debug, Clone, PartialEq)]
pub struct VisualEffect {
    pub label: String,
    pub area: Rect,
    remaining_ms: f32,
    has_expired: bool,
}

impl VisualEffect {
    /// An effect over `area` lasting `duration_ms`. Non-positive durations start expired.
    pub fn new(label: impl Into<String>, area: Rect, duration_ms: f32) -> Self {
        Self {
            label: label.into(),
            area,
            remaining_ms: duration_ms,
            has_expired: duration_ms <= 0.0,
        }
    }

    pub fn remaining_ms(&self) -> f32 {
        self.remaining_ms
    }

    pub fn has_expired(&self) -> bool {
        self.has_expired
    }

    /// Count down; expires once no time remains.
    pub fn update(&mut self, elapsed_ms: f32) {
        self.remaining_ms -= elapsed_ms;
        if self.remaining_ms <= 0.0 {
            self.has_expired = true;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;

    fn enemy(health: i32, max: i32) -> Enemy {
        let entity = WorldEntity::new(EntityId(3), Vec2::ZERO, Vec2::new(10.0, 10.0), 0.1);
        Enemy::new(entity, health, max, None)
    }

    #[test]
    fn enemy_health_stays_within_bounds() {
        let mut e = enemy(5, 10);
        e.gain_health(100);
        assert_eq!(e.health(), 10);
        e.lose_health(25);
        assert_eq!(e.health(), 0);
        assert!(e.is_dead());
    }

    #[test]
    fn enemy_spawn_health_is_clamped() {
        assert_eq!(enemy(50, 10).health(), 10);
        assert_eq!(enemy(-3, 10).health(), 0);
        assert_eq!(enemy(5, -1).health(), 0);
    }

    #[test]
    fn visual_effect_expires_after_duration() {
        let mut v = VisualEffect::new("hit", Rect::new(0.0, 0.0, 5.0, 5.0), 100.0);
        v.update(60.0);
        assert!(!v.has_expired());
        v.update(40.0);
        assert!(v.has_expired());
    }

    #[test]
    fn projectile_expiry_is_explicit() {
        let entity = WorldEntity::new(EntityId(9), Vec2::ZERO, Vec2::ONE, 1.0);
        let mut p = Projectile::new(entity, None);
        assert!(!p.has_expired());
        p.expire();
        assert!(p.has_expired());
    }
}

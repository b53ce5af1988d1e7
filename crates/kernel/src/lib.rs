//! Dungeon Kernel: authoritative world state, collision resolution, and
//! per-tick stepping.
//!
//! # Invariants
//! - Every entity id lives in exactly one collection.
//! - Moving entities never end a tick overlapping a wall or another body;
//!   a blocked move leaves the entity exactly where it was.
//! - Collections iterate in insertion order, so a step is deterministic for
//!   deterministic controllers.
//! - All state mutations flow through explicit operations on [`World`].

pub mod actors;
pub mod camera;
pub mod collision;
pub mod entity;
pub mod error;
pub mod player;
pub mod tick;
pub mod world;

pub use actors::{Enemy, EnemyMind, GroundItem, Loot, Projectile, ProjectileBehavior, VisualEffect};
pub use camera::Camera;
pub use collision::MoveOutcome;
pub use entity::{Body, WorldEntity};
pub use error::WorldError;
pub use player::{AbilityId, Buff, BuffId, BuffsUpdate, HeroStat, PlayerState};
pub use tick::TickReport;
pub use world::{EntitySpawn, RenderItem, Spawn, World, WorldConfig, WorldEvent};

use std::collections::HashSet;

use dungeon_common::{
    Direction, EntityId, EntityKind, GRID_CELL_SIZE, Rect, WALL_BUCKET_SIZE, get_within_world,
};
use dungeon_spatial::{PathGrid, WallBuckets};
use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::actors::{
    Enemy, EnemyMind, GroundItem, Loot, Projectile, ProjectileBehavior, VisualEffect,
};
use crate::camera::Camera;
use crate::entity::WorldEntity;
use crate::error::WorldError;
use crate::player::{HeroStat, PlayerState};

/// Fixed world and view dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WorldConfig {
    pub world_size: Vec2,
    pub camera_size: Vec2,
}

/// Placement and motion attributes shared by every spawnable entity.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EntitySpawn {
    pub position: Vec2,
    pub size: Vec2,
    /// World units per millisecond.
    #[serde(default)]
    pub speed: f32,
    /// Start moving in this direction. `None` spawns stationary.
    #[serde(default)]
    pub direction: Option<Direction>,
}

impl EntitySpawn {
    /// Stationary spawn with zero speed.
    pub fn new(position: Vec2, size: Vec2) -> Self {
        Self {
            position,
            size,
            speed: 0.0,
            direction: None,
        }
    }

    /// Set the base speed in world units per millisecond.
    pub fn with_speed(mut self, speed: f32) -> Self {
        self.speed = speed;
        self
    }

    /// Spawn already moving in `direction`.
    pub fn moving(mut self, direction: Direction) -> Self {
        self.direction = Some(direction);
        self
    }
}

/// A request to add one entity to a dynamic collection.
pub enum Spawn {
    Enemy {
        body: EntitySpawn,
        health: i32,
        max_health: i32,
        mind: Option<Box<dyn EnemyMind>>,
    },
    Projectile {
        body: EntitySpawn,
        behavior: Option<Box<dyn ProjectileBehavior>>,
    },
    GroundItem {
        body: EntitySpawn,
        loot: Loot,
    },
}

impl Spawn {
    /// Enemy at full health with no mind attached.
    pub fn enemy(body: EntitySpawn, max_health: i32) -> Self {
        Self::Enemy {
            body,
            health: max_health,
            max_health,
            mind: None,
        }
    }

    /// Projectile with no behavior attached; it never expires on its own.
    pub fn projectile(body: EntitySpawn) -> Self {
        Self::Projectile {
            body,
            behavior: None,
        }
    }

    /// Item lying on the ground until picked up.
    pub fn ground_item(body: EntitySpawn, loot: Loot) -> Self {
        Self::GroundItem { body, loot }
    }

    /// Attach an AI controller. No effect on non-enemies.
    pub fn with_mind(mut self, new_mind: impl EnemyMind + 'static) -> Self {
        if let Self::Enemy { mind, .. } = &mut self {
            *mind = Some(Box::new(new_mind));
        }
        self
    }

    /// Attach payload logic. No effect on non-projectiles.
    pub fn with_behavior(mut self, new_behavior: impl ProjectileBehavior + 'static) -> Self {
        if let Self::Projectile { behavior, .. } = &mut self {
            *behavior = Some(Box::new(new_behavior));
        }
        self
    }

    /// Collection this spawn will land in.
    pub fn kind(&self) -> EntityKind {
        match self {
            Self::Enemy { .. } => EntityKind::Enemy,
            Self::Projectile { .. } => EntityKind::Projectile,
            Self::GroundItem { .. } => EntityKind::GroundItem,
        }
    }

    fn body(&self) -> &EntitySpawn {
        match self {
            Self::Enemy { body, .. }
            | Self::Projectile { body, .. }
            | Self::GroundItem { body, .. } => body,
        }
    }
}

/// An event record produced by runtime mutations of the world.
///
/// Per-tick movement is summarized by `Advanced`; only out-of-band position
/// changes are recorded individually.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum WorldEvent {
    Spawned { id: EntityId, kind: EntityKind },
    /// Explicit removal or a prune sweep.
    Despawned { id: EntityId, kind: EntityKind },
    /// Teleported by [`World::place`] or [`World::translate`].
    Placed { id: EntityId, position: Vec2 },
    Advanced { tick: u64, elapsed_ms: f32 },
}

/// One entry of the draw list handed to a renderer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderItem {
    pub id: EntityId,
    pub kind: EntityKind,
    pub rect: Rect,
}

/// The authoritative world state.
///
/// Owns every positioned entity. Each entity lives in exactly one
/// collection; collections iterate in insertion order, which makes a tick
/// deterministic. Walls are fixed at construction, so the wall buckets and the
/// pathfinding grid are built once and never change.
///
/// Subsystems (AI, abilities, projectile payloads) receive `&mut World` as an
/// explicit argument for the duration of a call.
#[derive(Debug)]
pub struct World {
    config: WorldConfig,
    pub(crate) player: WorldEntity,
    player_state: PlayerState,
    pub(crate) enemies: Vec<Enemy>,
    pub(crate) projectiles: Vec<Projectile>,
    ground_items: Vec<GroundItem>,
    walls: Vec<WorldEntity>,
    pub(crate) visual_effects: Vec<VisualEffect>,
    wall_buckets: WallBuckets,
    path_grid: PathGrid,
    camera: Camera,
    pub(crate) tick: u64,
    next_id: u64,
    pub(crate) event_log: Vec<WorldEvent>,
}

impl World {
    /// Build a world from level geometry. Walls are immutable afterwards.
    pub fn new(
        config: WorldConfig,
        player: EntitySpawn,
        walls: impl IntoIterator<Item = Rect>,
    ) -> Result<Self, WorldError> {
        let world_size = config.world_size;
        let partitionable = WallBuckets::dimensions_for(world_size, WALL_BUCKET_SIZE).is_some()
            && PathGrid::dimensions_for(world_size, GRID_CELL_SIZE).is_some();
        if !(world_size.x > 0.0 && world_size.y > 0.0 && partitionable) {
            return Err(WorldError::InvalidWorldSize(world_size));
        }
        let cam = config.camera_size;
        if !(cam.x > 0.0 && cam.y > 0.0 && cam.x <= world_size.x && cam.y <= world_size.y) {
            return Err(WorldError::InvalidCameraSize {
                camera: cam,
                world: world_size,
            });
        }
        check_entity_size(player.size, world_size)?;

        let mut next_id = 0;
        let mut alloc = || {
            next_id += 1;
            EntityId(next_id)
        };

        let mut player_entity = WorldEntity::new(
            alloc(),
            get_within_world(player.position, player.size, world_size),
            player.size,
            player.speed,
        );
        if let Some(d) = player.direction {
            player_entity.set_moving_in_direction(d);
        }

        let mut wall_entities = Vec::new();
        for (index, rect) in walls.into_iter().enumerate() {
            let inside = rect.w > 0.0
                && rect.h > 0.0
                && get_within_world(rect.position(), rect.size(), world_size) == rect.position();
            if !inside {
                return Err(WorldError::WallOutOfBounds { index, rect });
            }
            wall_entities.push(WorldEntity::new(alloc(), rect.position(), rect.size(), 0.0));
        }

        let wall_buckets = WallBuckets::build(
            world_size,
            WALL_BUCKET_SIZE,
            wall_entities.iter().map(WorldEntity::position),
        );
        let path_grid = PathGrid::build(
            world_size,
            GRID_CELL_SIZE,
            wall_entities.iter().map(WorldEntity::position),
        );

        tracing::info!(
            width = world_size.x,
            height = world_size.y,
            walls = wall_entities.len(),
            buckets = ?wall_buckets.dimensions(),
            grid = ?path_grid.dimensions(),
            "world created"
        );

        let mut world = Self {
            config,
            player: player_entity,
            player_state: PlayerState::default(),
            enemies: Vec::new(),
            projectiles: Vec::new(),
            ground_items: Vec::new(),
            walls: wall_entities,
            visual_effects: Vec::new(),
            wall_buckets,
            path_grid,
            camera: Camera::new(cam),
            tick: 0,
            next_id,
            event_log: Vec::new(),
        };
        world.recenter_camera();
        Ok(world)
    }

    /// Replace the default player resources.
    pub fn with_player_state(mut self, state: PlayerState) -> Self {
        self.player_state = state;
        self
    }

    /// World and camera dimensions fixed at construction.
    pub fn config(&self) -> &WorldConfig {
        &self.config
    }

    /// Width and height of the world.
    pub fn world_size(&self) -> Vec2 {
        self.config.world_size
    }

    /// The whole world as a rectangle anchored at the origin.
    pub fn world_area(&self) -> Rect {
        Rect::from_pos_size(Vec2::ZERO, self.config.world_size)
    }

    /// Number of completed ticks.
    pub fn tick(&self) -> u64 {
        self.tick
    }

    /// The player body. Always present.
    pub fn player(&self) -> &WorldEntity {
        &self.player
    }

    /// Mutable player body, for speed and facing changes.
    pub fn player_mut(&mut self) -> &mut WorldEntity {
        &mut self.player
    }

    /// Non-spatial player resources.
    pub fn player_state(&self) -> &PlayerState {
        &self.player_state
    }

    /// Mutable player resources.
    pub fn player_state_mut(&mut self) -> &mut PlayerState {
        &mut self.player_state
    }

    /// Enemies in spawn order.
    pub fn enemies(&self) -> &[Enemy] {
        &self.enemies
    }

    /// Enemies in spawn order, for health changes.
    pub fn enemies_mut(&mut self) -> &mut [Enemy] {
        &mut self.enemies
    }

    /// Projectiles in spawn order.
    pub fn projectiles(&self) -> &[Projectile] {
        &self.projectiles
    }

    /// Projectiles in spawn order, for expiry changes.
    pub fn projectiles_mut(&mut self) -> &mut [Projectile] {
        &mut self.projectiles
    }

    /// Ground items in spawn order.
    pub fn ground_items(&self) -> &[GroundItem] {
        &self.ground_items
    }

    /// Walls in construction order. Indices match the wall buckets.
    pub fn walls(&self) -> &[WorldEntity] {
        &self.walls
    }

    /// Effects still playing.
    pub fn visual_effects(&self) -> &[VisualEffect] {
        &self.visual_effects
    }

    /// Start a visual effect. It is pruned once expired.
    pub fn add_visual_effect(&mut self, effect: VisualEffect) {
        self.visual_effects.push(effect);
    }

    /// Bucket index over the walls.
    pub fn wall_buckets(&self) -> &WallBuckets {
        &self.wall_buckets
    }

    /// Pathfinding occupancy grid built from the walls.
    pub fn path_grid(&self) -> &PathGrid {
        &self.path_grid
    }

    /// Current view rectangle, always inside the world.
    pub fn camera_rect(&self) -> Rect {
        self.camera.rect()
    }

    /// Read-only access to the event log.
    pub fn events(&self) -> &[WorldEvent] {
        &self.event_log
    }

    /// Drain and return the event log.
    pub fn drain_events(&mut self) -> Vec<WorldEvent> {
        std::mem::take(&mut self.event_log)
    }

    /// Look up an enemy by id.
    pub fn enemy(&self, id: EntityId) -> Option<&Enemy> {
        self.enemies.iter().find(|e| e.id() == id)
    }

    /// Look up an enemy by id for mutation.
    pub fn enemy_mut(&mut self, id: EntityId) -> Option<&mut Enemy> {
        self.enemies.iter_mut().find(|e| e.id() == id)
    }

    /// Look up a projectile by id.
    pub fn projectile(&self, id: EntityId) -> Option<&Projectile> {
        self.projectiles.iter().find(|p| p.id() == id)
    }

    /// Look up a projectile by id for mutation.
    pub fn projectile_mut(&mut self, id: EntityId) -> Option<&mut Projectile> {
        self.projectiles.iter_mut().find(|p| p.id() == id)
    }

    /// Look up a ground item by id.
    pub fn ground_item(&self, id: EntityId) -> Option<&GroundItem> {
        self.ground_items.iter().find(|g| g.id() == id)
    }

    /// Which collection currently holds `id`.
    pub fn kind_of(&self, id: EntityId) -> Option<EntityKind> {
        if self.player.id() == id {
            Some(EntityKind::Player)
        } else if self.enemy(id).is_some() {
            Some(EntityKind::Enemy)
        } else if self.projectile(id).is_some() {
            Some(EntityKind::Projectile)
        } else if self.ground_item(id).is_some() {
            Some(EntityKind::GroundItem)
        } else if self.walls.iter().any(|w| w.id() == id) {
            Some(EntityKind::Wall)
        } else {
            None
        }
    }

    /// Geometry and motion of any entity, walls included.
    pub fn entity(&self, id: EntityId) -> Option<&WorldEntity> {
        if self.player.id() == id {
            return Some(&self.player);
        }
        self.enemies
            .iter()
            .map(|e| &e.entity)
            .chain(self.projectiles.iter().map(|p| &p.entity))
            .chain(self.ground_items.iter().map(|g| &g.entity))
            .chain(self.walls.iter())
            .find(|e| e.id() == id)
    }

    /// Mutable access to a non-wall entity. Walls never move.
    pub(crate) fn entity_mut(&mut self, id: EntityId) -> Option<&mut WorldEntity> {
        if self.player.id() == id {
            return Some(&mut self.player);
        }
        self.enemies
            .iter_mut()
            .map(|e| &mut e.entity)
            .chain(self.projectiles.iter_mut().map(|p| &mut p.entity))
            .chain(self.ground_items.iter_mut().map(|g| &mut g.entity))
            .find(|e| e.id() == id)
    }

    /// Add an entity to its collection. The position is clamped into the world.
    pub fn spawn(&mut self, spawn: Spawn) -> Result<EntityId, WorldError> {
        let world_size = self.config.world_size;
        let body = *spawn.body();
        check_entity_size(body.size, world_size)?;
        if let Spawn::Enemy { max_health, .. } = &spawn {
            if *max_health <= 0 {
                return Err(WorldError::InvalidHealth {
                    max_health: *max_health,
                });
            }
        }

        self.next_id += 1;
        let id = EntityId(self.next_id);
        let mut entity = WorldEntity::new(
            id,
            get_within_world(body.position, body.size, world_size),
            body.size,
            body.speed,
        );
        if let Some(d) = body.direction {
            entity.set_moving_in_direction(d);
        }

        let kind = spawn.kind();
        match spawn {
            Spawn::Enemy {
                health,
                max_health,
                mind,
                ..
            } => self
                .enemies
                .push(Enemy::new(entity, health, max_health, mind)),
            Spawn::Projectile { behavior, .. } => {
                self.projectiles.push(Projectile::new(entity, behavior))
            }
            Spawn::GroundItem { loot, .. } => self.ground_items.push(GroundItem { entity, loot }),
        }
        tracing::debug!(%id, %kind, "spawned");
        self.event_log.push(WorldEvent::Spawned { id, kind });
        Ok(id)
    }

    /// Remove one entity. Absent ids, the player, and walls are left alone.
    pub fn despawn(&mut self, id: EntityId) -> Option<EntityKind> {
        let kind = if let Some(i) = self.enemies.iter().position(|e| e.id() == id) {
            self.enemies.remove(i);
            EntityKind::Enemy
        } else if let Some(i) = self.projectiles.iter().position(|p| p.id() == id) {
            self.projectiles.remove(i);
            EntityKind::Projectile
        } else if let Some(i) = self.ground_items.iter().position(|g| g.id() == id) {
            self.ground_items.remove(i);
            EntityKind::GroundItem
        } else {
            return None;
        };
        tracing::debug!(%id, %kind, "despawned");
        self.event_log.push(WorldEvent::Despawned { id, kind });
        Some(kind)
    }

    /// Filter every dynamic collection, dropping the given ids.
    ///
    /// Idempotent: ids that are not present are ignored. Returns how many
    /// entities were removed.
    pub fn remove_entities(&mut self, ids: &[EntityId]) -> usize {
        let doomed: HashSet<EntityId> = ids.iter().copied().collect();
        let events = &mut self.event_log;
        retain_logged(&mut self.projectiles, EntityKind::Projectile, events, Projectile::id, |p| {
            !doomed.contains(&p.id())
        }) + retain_logged(&mut self.ground_items, EntityKind::GroundItem, events, GroundItem::id, |g| {
            !doomed.contains(&g.id())
        }) + retain_logged(&mut self.enemies, EntityKind::Enemy, events, Enemy::id, |e| {
            !doomed.contains(&e.id())
        })
    }

    /// Drop projectiles marked expired. Returns how many were removed.
    pub fn prune_expired_projectiles(&mut self) -> usize {
        retain_logged(
            &mut self.projectiles,
            EntityKind::Projectile,
            &mut self.event_log,
            Projectile::id,
            |p| !p.has_expired(),
        )
    }

    /// Drop enemies with no health left. Returns how many were removed.
    pub fn prune_dead_enemies(&mut self) -> usize {
        retain_logged(
            &mut self.enemies,
            EntityKind::Enemy,
            &mut self.event_log,
            Enemy::id,
            |e| e.health() > 0,
        )
    }

    /// Drop finished visual effects. Returns how many were removed.
    pub fn prune_expired_visual_effects(&mut self) -> usize {
        let before = self.visual_effects.len();
        self.visual_effects.retain(|v| !v.has_expired());
        before - self.visual_effects.len()
    }

    /// Set or clear movement intent. `None` stops the entity and keeps its
    /// facing. Returns false when `id` is unknown or a wall.
    pub fn set_direction(&mut self, id: EntityId, direction: Option<Direction>) -> bool {
        let Some(entity) = self.entity_mut(id) else {
            return false;
        };
        match direction {
            Some(d) => entity.set_moving_in_direction(d),
            None => entity.set_stationary(),
        }
        true
    }

    /// Teleport an entity, clamped into the world. No collision test.
    pub fn place(&mut self, id: EntityId, pos: Vec2) -> bool {
        let world_size = self.config.world_size;
        let Some(entity) = self.entity_mut(id) else {
            return false;
        };
        let clamped = get_within_world(pos, entity.size(), world_size);
        entity.set_position(clamped);
        tracing::debug!(%id, x = clamped.x, y = clamped.y, "placed");
        self.event_log.push(WorldEvent::Placed {
            id,
            position: clamped,
        });
        true
    }

    /// Shift an entity by `delta`, clamped into the world. No collision test.
    pub fn translate(&mut self, id: EntityId, delta: Vec2) -> bool {
        match self.entity(id).map(WorldEntity::position) {
            Some(pos) => self.place(id, pos + delta),
            None => false,
        }
    }

    /// Apply a stat delta. Movement speed adjusts the player's speed multiplier.
    pub fn modify_player_stat(&mut self, stat: HeroStat, delta: f32) {
        if !self.player_state.modify_stat(stat, delta) {
            self.player.adjust_speed_multiplier(delta);
        }
    }

    /// Ids in the `kind` collection whose collision box overlaps `region`.
    ///
    /// A linear scan; the wall buckets only serve neighborhood and view queries.
    pub fn intersecting(&self, region: &Rect, kind: EntityKind) -> Vec<EntityId> {
        let hit = |e: &WorldEntity| e.collision_box().intersects(region);
        match kind {
            EntityKind::Player => {
                if hit(&self.player) {
                    vec![self.player.id()]
                } else {
                    Vec::new()
                }
            }
            EntityKind::Enemy => self
                .enemies
                .iter()
                .filter(|e| hit(&e.entity))
                .map(Enemy::id)
                .collect(),
            EntityKind::Projectile => self
                .projectiles
                .iter()
                .filter(|p| hit(&p.entity))
                .map(Projectile::id)
                .collect(),
            EntityKind::GroundItem => self
                .ground_items
                .iter()
                .filter(|g| hit(&g.entity))
                .map(GroundItem::id)
                .collect(),
            EntityKind::Wall => self
                .walls
                .iter()
                .filter(|w| hit(*w))
                .map(WorldEntity::id)
                .collect(),
        }
    }

    /// Every dynamic entity (player, enemies, projectiles, ground items)
    /// whose collision box overlaps `region`.
    pub fn entities_overlapping(&self, region: &Rect) -> Vec<EntityId> {
        [
            EntityKind::Player,
            EntityKind::Enemy,
            EntityKind::Projectile,
            EntityKind::GroundItem,
        ]
        .into_iter()
        .flat_map(|kind| self.intersecting(region, kind))
        .collect()
    }

    /// Enemies whose collision box overlaps `region`.
    pub fn enemies_intersecting(&self, region: &Rect) -> Vec<&Enemy> {
        self.enemies
            .iter()
            .filter(|e| e.entity.collision_box().intersects(region))
            .collect()
    }

    /// Projectiles whose collision box overlaps `region`.
    pub fn projectiles_intersecting(&self, region: &Rect) -> Vec<&Projectile> {
        self.projectiles
            .iter()
            .filter(|p| p.entity.collision_box().intersects(region))
            .collect()
    }

    /// Walls in the 3x3 bucket block around an entity. Empty for unknown ids.
    pub fn walls_near(&self, id: EntityId) -> Vec<&WorldEntity> {
        match self.entity(id) {
            Some(e) => self.walls_near_point(e.position()),
            None => Vec::new(),
        }
    }

    /// Walls in the 3x3 bucket block around `pos`.
    pub fn walls_near_point(&self, pos: Vec2) -> Vec<&WorldEntity> {
        self.wall_buckets
            .walls_near(pos)
            .into_iter()
            .map(|i| &self.walls[i])
            .collect()
    }

    /// Walls in the buckets covering `rect`. Used for view culling.
    pub fn walls_in_rect(&self, rect: &Rect) -> Vec<&WorldEntity> {
        self.wall_buckets
            .walls_in_rect(rect)
            .into_iter()
            .map(|i| &self.walls[i])
            .collect()
    }

    /// Draw list: player, projectiles, ground items, enemies, then the walls
    /// in view of the camera.
    pub fn render_list(&self) -> Vec<RenderItem> {
        let item = |e: &WorldEntity, kind| RenderItem {
            id: e.id(),
            kind,
            rect: e.rect(),
        };
        let mut out = vec![item(&self.player, EntityKind::Player)];
        out.extend(
            self.projectiles
                .iter()
                .map(|p| item(&p.entity, EntityKind::Projectile)),
        );
        out.extend(
            self.ground_items
                .iter()
                .map(|g| item(&g.entity, EntityKind::GroundItem)),
        );
        out.extend(self.enemies.iter().map(|e| item(&e.entity, EntityKind::Enemy)));
        out.extend(
            self.walls_in_rect(&self.camera.rect())
                .into_iter()
                .map(|w| item(w, EntityKind::Wall)),
        );
        out
    }

    /// True when `rect` overlaps the world area at all.
    pub fn is_within_world(&self, rect: &Rect) -> bool {
        rect.intersects(&self.world_area())
    }

    /// Center the camera on the player, kept fully inside the world.
    pub fn recenter_camera(&mut self) {
        self.camera
            .center_on(self.player.center(), self.config.world_size);
    }
}

fn check_entity_size(size: Vec2, world: Vec2) -> Result<(), WorldError> {
    if size.x > 0.0 && size.y > 0.0 && size.x <= world.x && size.y <= world.y {
        Ok(())
    } else {
        Err(WorldError::InvalidEntitySize { size, world })
    }
}

/// `Vec::retain` that records a `Despawned` event for each dropped item.
fn retain_logged<T>(
    items: &mut Vec<T>,
    kind: EntityKind,
    events: &mut Vec<WorldEvent>,
    id_of: impl Fn(&T) -> EntityId,
    mut keep: impl FnMut(&T) -> bool,
) -> usize {
    let before = items.len();
    items.retain(|item| {
        let kept = keep(item);
        if !kept {
            events.push(WorldEvent::Despawned {
                id: id_of(item),
                kind,
            });
        }
        kept
    });
    before - items.len()
}

use dungeon_common::{EntityId, EntityKind, Rect};
use dungeon_kernel::World;
use glam::Vec2;

/// World inspector for developer tooling.
///
/// Provides read-only queries against the world state for debugging and
/// headless runs.
pub struct WorldInspector;

impl WorldInspector {
    /// Produce a summary of the world state.
    pub fn summary(world: &World) -> WorldSummary {
        let (cols, rows) = world.wall_buckets().dimensions();
        WorldSummary {
            tick: world.tick(),
            enemies: world.enemies().len(),
            projectiles: world.projectiles().len(),
            ground_items: world.ground_items().len(),
            walls: world.walls().len(),
            visual_effects: world.visual_effects().len(),
            buckets: (cols, rows),
            camera: world.camera_rect(),
            pending_events: world.events().len(),
        }
    }

    /// Position and motion of a single entity, walls included.
    pub fn inspect_entity(world: &World, id: EntityId) -> Option<EntityInfo> {
        let kind = world.kind_of(id)?;
        let entity = world.entity(id)?;
        let health = world.enemy(id).map(|e| (e.health(), e.max_health()));
        Some(EntityInfo {
            id,
            kind,
            position: entity.position(),
            size: entity.size(),
            collision_box: entity.collision_box(),
            moving: entity.is_moving().then(|| entity.direction()),
            speed: entity.effective_speed(),
            health,
        })
    }

    /// All entity ids, player first, then each collection in insertion order.
    pub fn list_entities(world: &World) -> Vec<EntityId> {
        std::iter::once(world.player().id())
            .chain(world.enemies().iter().map(|e| e.id()))
            .chain(world.projectiles().iter().map(|p| p.id()))
            .chain(world.ground_items().iter().map(|g| g.id()))
            .chain(world.walls().iter().map(|w| w.id()))
            .collect()
    }
}

/// Summary of world state for the inspector.
#[derive(Debug, Clone, PartialEq)]
pub struct WorldSummary {
    pub tick: u64,
    pub enemies: usize,
    pub projectiles: usize,
    pub ground_items: usize,
    pub walls: usize,
    pub visual_effects: usize,
    pub buckets: (usize, usize),
    pub camera: Rect,
    pub pending_events: usize,
}

impl std::fmt::Display for WorldSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "World: tick={} enemies={} projectiles={} items={} walls={} effects={} buckets={}x{} camera=({:.1}, {:.1}) pending_events={}",
            self.tick,
            self.enemies,
            self.projectiles,
            self.ground_items,
            self.walls,
            self.visual_effects,
            self.buckets.0,
            self.buckets.1,
            self.camera.x,
            self.camera.y,
            self.pending_events
        )
    }
}

/// Detailed info about a single entity.
#[derive(Debug, Clone, PartialEq)]
pub struct EntityInfo {
    pub id: EntityId,
    pub kind: EntityKind,
    pub position: Vec2,
    pub size: Vec2,
    pub collision_box: Rect,
    /// Direction of travel, `None` when stationary.
    pub moving: Option<dungeon_common::Direction>,
    pub speed: f32,
    /// `(health, max_health)` for enemies.
    pub health: Option<(i32, i32)>,
}

impl std::fmt::Display for EntityInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} {} pos=({:.2}, {:.2}) size=({:.1}, {:.1})",
            self.kind, self.id, self.position.x, self.position.y, self.size.x, self.size.y
        )?;
        if let Some(direction) = self.moving {
            write!(f, " moving={direction:?} speed={:.3}", self.speed)?;
        }
        if let Some((hp, max)) = self.health {
            write!(f, " hp={hp}/{max}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dungeon_common::Direction;
    use dungeon_kernel::{EntitySpawn, Spawn, WorldConfig};

    fn world() -> World {
        let config = WorldConfig {
            world_size: Vec2::new(500.0, 500.0),
            camera_size: Vec2::new(200.0, 200.0),
        };
        let player = EntitySpawn::new(Vec2::new(250.0, 250.0), Vec2::new(20.0, 20.0));
        World::new(config, player, vec![Rect::new(0.0, 0.0, 25.0, 25.0)]).unwrap()
    }

    #[test]
    fn summary_fresh_world() {
        let world = world();
        let summary = WorldInspector::summary(&world);
        assert_eq!(summary.tick, 0);
        assert_eq!(summary.enemies, 0);
        assert_eq!(summary.walls, 1);
        assert_eq!(summary.buckets, (6, 6));
    }

    #[test]
    fn summary_counts_spawns_and_ticks() {
        let mut world = world();
        world
            .spawn(Spawn::enemy(
                EntitySpawn::new(Vec2::new(50.0, 50.0), Vec2::new(20.0, 20.0)),
                3,
            ))
            .unwrap();
        world.step(16.0);

        let summary = WorldInspector::summary(&world);
        assert_eq!(summary.tick, 1);
        assert_eq!(summary.enemies, 1);
        assert!(summary.pending_events >= 2);
    }

    #[test]
    fn inspect_enemy_reports_health_and_motion() {
        let mut world = world();
        let id = world
            .spawn(Spawn::enemy(
                EntitySpawn::new(Vec2::new(100.0, 100.0), Vec2::new(20.0, 20.0))
                    .with_speed(0.2)
                    .moving(Direction::Down),
                7,
            ))
            .unwrap();

        let info = WorldInspector::inspect_entity(&world, id).unwrap();
        assert_eq!(info.kind, EntityKind::Enemy);
        assert_eq!(info.position, Vec2::new(100.0, 100.0));
        assert_eq!(info.moving, Some(Direction::Down));
        assert_eq!(info.health, Some((7, 7)));
        assert!(info.to_string().contains("hp=7/7"));
    }

    #[test]
    fn inspect_entity_not_found() {
        let world = world();
        assert!(WorldInspector::inspect_entity(&world, EntityId(404)).is_none());
    }

    #[test]
    fn list_entities_starts_with_player() {
        let world = world();
        let ids = WorldInspector::list_entities(&world);
        assert_eq!(ids.len(), 2);
        assert_eq!(ids[0], world.player().id());
    }

    #[test]
    fn summary_display() {
        let s = WorldInspector::summary(&world()).to_string();
        assert!(s.contains("tick=0"));
        assert!(s.contains("buckets=6x6"));
    }
}

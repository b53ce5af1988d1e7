use std::path::Path;

use anyhow::Context;
use dungeon_common::Rect;
use dungeon_kernel::{EntitySpawn, Loot, Spawn, World, WorldConfig};
use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::demo::ChaseMind;

/// A level description: world dimensions, the player, walls, and starting
/// entities.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelConfig {
    pub world: WorldConfig,
    pub player: EntitySpawn,
    #[serde(default)]
    pub walls: Vec<Rect>,
    #[serde(default)]
    pub enemies: Vec<EnemyConfig>,
    #[serde(default)]
    pub ground_items: Vec<ItemConfig>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnemyConfig {
    #[serde(flatten)]
    pub body: EntitySpawn,
    pub health: i32,
    /// Attach the chase mind.
    #[serde(default)]
    pub chase: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemConfig {
    #[serde(flatten)]
    pub body: EntitySpawn,
    pub loot: Loot,
}

impl LevelConfig {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading level config {}", path.display()))?;
        serde_json::from_str(&text)
            .with_context(|| format!("parsing level config {}", path.display()))
    }

    /// Load `path` if given, otherwise the built-in arena.
    pub fn load_or_default(path: Option<&Path>) -> anyhow::Result<Self> {
        match path {
            Some(p) => Self::load(p),
            None => Ok(Self::default_arena()),
        }
    }

    /// A 1000x800 room ringed by walls with a pillar block and two chasers.
    pub fn default_arena() -> Self {
        const TILE: f32 = 25.0;
        let world_size = Vec2::new(1000.0, 800.0);
        let cols = (world_size.x / TILE) as usize;
        let rows = (world_size.y / TILE) as usize;

        let mut walls = Vec::new();
        for x in 0..cols {
            walls.push(Rect::new(x as f32 * TILE, 0.0, TILE, TILE));
            walls.push(Rect::new(x as f32 * TILE, world_size.y - TILE, TILE, TILE));
        }
        for y in 1..rows - 1 {
            walls.push(Rect::new(0.0, y as f32 * TILE, TILE, TILE));
            walls.push(Rect::new(world_size.x - TILE, y as f32 * TILE, TILE, TILE));
        }
        for (x, y) in [(15, 12), (16, 12), (15, 13), (16, 13)] {
            walls.push(Rect::new(x as f32 * TILE, y as f32 * TILE, TILE, TILE));
        }

        let enemy = |x: f32, y: f32| EnemyConfig {
            body: EntitySpawn::new(Vec2::new(x, y), Vec2::new(30.0, 30.0)).with_speed(0.12),
            health: 5,
            chase: true,
        };
        Self {
            world: WorldConfig {
                world_size,
                camera_size: Vec2::new(400.0, 300.0),
            },
            player: EntitySpawn::new(Vec2::new(200.0, 400.0), Vec2::new(30.0, 30.0))
                .with_speed(0.25),
            walls,
            enemies: vec![enemy(800.0, 150.0), enemy(750.0, 600.0)],
            ground_items: vec![ItemConfig {
                body: EntitySpawn::new(Vec2::new(500.0, 200.0), Vec2::new(20.0, 20.0)),
                loot: Loot::Potion("health".into()),
            }],
        }
    }

    pub fn build_world(&self) -> anyhow::Result<World> {
        let mut world = World::new(self.world, self.player, self.walls.iter().copied())
            .context("building world")?;
        for enemy in &self.enemies {
            let mut spawn = Spawn::enemy(enemy.body, enemy.health);
            if enemy.chase {
                spawn = spawn.with_mind(ChaseMind::default());
            }
            world.spawn(spawn).context("spawning enemy")?;
        }
        for item in &self.ground_items {
            world
                .spawn(Spawn::ground_item(item.body, item.loot.clone()))
                .context("spawning ground item")?;
        }
        Ok(world)
    }
}

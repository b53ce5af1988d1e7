//! Demo controllers for headless runs.

use dungeon_common::{Direction, EntityId, Rect};
use dungeon_kernel::{EnemyMind, EntitySpawn, ProjectileBehavior, Spawn, VisualEffect, World};
use glam::Vec2;

const BITE_DAMAGE: f32 = 1.0;
const BITE_RANGE: f32 = 15.0;
const BITE_COOLDOWN_MS: f32 = 500.0;
const BOLT_DAMAGE: i32 = 2;
const BOLT_SIZE: f32 = 8.0;
const BOLT_SPEED: f32 = 0.6;

/// Walks toward the player along the longer axis, falls back to the other
/// axis when the preferred step is blocked, and bites when adjacent.
#[derive(Debug, Default)]
pub struct ChaseMind {
    cooldown_ms: f32,
}

impl EnemyMind for ChaseMind {
    fn control(&mut self, enemy: EntityId, world: &mut World, elapsed_ms: f32) {
        self.cooldown_ms = (self.cooldown_ms - elapsed_ms).max(0.0);
        let Some(me) = world.enemy(enemy).map(|e| e.entity.clone()) else {
            return;
        };
        let target = world.player().center();
        let delta = target - me.center();

        let reach = Rect::centered_at(me.center(), me.size() + Vec2::splat(2.0 * BITE_RANGE));
        if reach.intersects(&world.player().rect()) {
            world.set_direction(enemy, None);
            if self.cooldown_ms == 0.0 {
                world.player_state_mut().lose_health(BITE_DAMAGE);
                self.cooldown_ms = BITE_COOLDOWN_MS;
                tracing::debug!(%enemy, "bite");
            }
            return;
        }

        let horizontal = if delta.x < 0.0 { Direction::Left } else { Direction::Right };
        let vertical = if delta.y < 0.0 { Direction::Up } else { Direction::Down };
        let (first, second) = if delta.x.abs() >= delta.y.abs() {
            (horizontal, vertical)
        } else {
            (vertical, horizontal)
        };

        let choice = [first, second].into_iter().find(|&d| {
            let next = me.tentative_position_in(d, elapsed_ms);
            !world.would_collide(enemy, next)
        });
        world.set_direction(enemy, Some(choice.unwrap_or(first)));
    }
}

/// Straight-flying bolt that damages the first enemy it touches and expires
/// on hit or when it leaves the world.
#[derive(Debug, Default)]
pub struct Bolt;

impl ProjectileBehavior for Bolt {
    fn update(&mut self, projectile: EntityId, world: &mut World, _elapsed_ms: f32) {
        let Some(rect) = world.projectile(projectile).map(|p| p.entity.rect()) else {
            return;
        };
        let hit = world.enemies_intersecting(&rect).first().map(|e| e.id());
        let outside = !world.is_within_world(&rect);
        if let Some(target) = hit {
            if let Some(enemy) = world.enemy_mut(target) {
                enemy.lose_health(BOLT_DAMAGE);
            }
            world.add_visual_effect(VisualEffect::new("bolt-hit", rect, 200.0));
            tracing::debug!(%projectile, %target, "bolt hit");
        }
        if hit.is_some() || outside {
            if let Some(p) = world.projectile_mut(projectile) {
                p.expire();
            }
        }
    }
}

/// Fire a bolt from the player's center in the direction it faces.
pub fn fire_bolt(world: &mut World) -> anyhow::Result<EntityId> {
    let player = world.player();
    let size = Vec2::splat(BOLT_SIZE);
    let origin = player.center() - size / 2.0;
    let spawn = EntitySpawn::new(origin, size)
        .with_speed(BOLT_SPEED)
        .moving(player.direction());
    Ok(world.spawn(Spawn::projectile(spawn).with_behavior(Bolt))?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use dungeon_kernel::WorldConfig;

    fn world() -> World {
        let config = WorldConfig {
            world_size: Vec2::new(600.0, 600.0),
            camera_size: Vec2::new(200.0, 200.0),
        };
        let player = EntitySpawn::new(Vec2::new(300.0, 300.0), Vec2::new(30.0, 30.0));
        World::new(config, player, Vec::new()).unwrap()
    }

    #[test]
    fn chaser_closes_distance_then_bites() {
        let mut w = world();
        let e = w
            .spawn(
                Spawn::enemy(
                    EntitySpawn::new(Vec2::new(100.0, 300.0), Vec2::new(30.0, 30.0))
                        .with_speed(0.2),
                    5,
                )
                .with_mind(ChaseMind::default()),
            )
            .unwrap();
        let start = w.enemy(e).unwrap().entity.position().x;
        w.step(100.0);
        assert!(w.enemy(e).unwrap().entity.position().x > start);

        for _ in 0..100 {
            w.step(100.0);
        }
        assert!(w.player_state().health() < 100);
    }

    #[test]
    fn chaser_detours_around_a_wall() {
        let config = WorldConfig {
            world_size: Vec2::new(600.0, 600.0),
            camera_size: Vec2::new(200.0, 200.0),
        };
        let player = EntitySpawn::new(Vec2::new(300.0, 250.0), Vec2::new(30.0, 30.0));
        let wall = Rect::new(140.0, 300.0, 25.0, 25.0);
        let mut w = World::new(config, player, vec![wall]).unwrap();
        let e = w
            .spawn(
                Spawn::enemy(
                    EntitySpawn::new(Vec2::new(100.0, 300.0), Vec2::new(30.0, 30.0))
                        .with_speed(0.2),
                    5,
                )
                .with_mind(ChaseMind::default()),
            )
            .unwrap();
        w.step(100.0);
        // Right is blocked by the wall, so the mind steps up instead.
        assert_eq!(w.enemy(e).unwrap().entity.direction(), Direction::Up);
        assert_eq!(w.enemy(e).unwrap().entity.position(), Vec2::new(100.0, 280.0));
    }

    #[test]
    fn bolt_damages_enemy_and_expires() {
        let mut w = world();
        let e = w
            .spawn(Spawn::enemy(
                EntitySpawn::new(Vec2::new(200.0, 300.0), Vec2::new(30.0, 30.0)),
                5,
            ))
            .unwrap();
        let bolt = fire_bolt(&mut w).unwrap();
        for _ in 0..5 {
            w.step(50.0);
        }
        assert!(w.projectile(bolt).is_none());
        assert_eq!(w.enemy(e).unwrap().health(), 3);
        assert!(!w.visual_effects().is_empty());
    }
}

//! Per-tick driver.
//!
//! A step runs, in order: enemy minds, projectile behaviors, then
//! [`World::advance`] (movement, pruning, camera). Nothing yields mid-step.

use dungeon_common::EntityId;

use crate::World;
use crate::actors::{Enemy, Projectile};
use crate::collision::MoveOutcome;
use crate::player::BuffsUpdate;
use crate::world::WorldEvent;

/// What one call to [`World::advance`] did.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickReport {
    pub tick: u64,
    pub moved: usize,
    pub blocked: usize,
    pub pruned_enemies: usize,
    pub pruned_projectiles: usize,
    pub pruned_effects: usize,
    pub buffs: BuffsUpdate,
}

impl World {
    /// Run one full simulation step: controllers first, then [`advance`](Self::advance).
    pub fn step(&mut self, elapsed_ms: f32) -> TickReport {
        let _span = tracing::info_span!("world_step", tick = self.tick + 1).entered();
        self.run_enemy_minds(elapsed_ms);
        self.run_projectile_behaviors(elapsed_ms);
        self.advance(elapsed_ms)
    }

    /// Resolve motion for every entity, prune what expired, and recenter the
    /// camera. Call exactly once per simulation step.
    ///
    /// The player and enemies move through collision resolution in insertion
    /// order. Projectiles fly unobstructed; their behaviors decide hits and
    /// expiry. Ground items and walls never move.
    pub fn advance(&mut self, elapsed_ms: f32) -> TickReport {
        let _span = tracing::debug_span!("world_advance", elapsed_ms).entered();
        let mut report = TickReport::default();

        let movers: Vec<EntityId> = std::iter::once(self.player.id())
            .chain(self.enemies.iter().map(Enemy::id))
            .collect();
        for id in movers {
            match self.resolve_move(id, elapsed_ms) {
                MoveOutcome::Moved(_) => report.moved += 1,
                MoveOutcome::Blocked => report.blocked += 1,
                MoveOutcome::Stationary => {}
            }
        }

        for projectile in &mut self.projectiles {
            if let Some(next) = projectile.entity.tentative_position(elapsed_ms) {
                projectile.entity.set_position(next);
            }
        }

        for effect in &mut self.visual_effects {
            effect.update(elapsed_ms);
        }

        let state = self.player_state_mut();
        state.regenerate_mana(elapsed_ms);
        state.recharge_ability_cooldowns(elapsed_ms);
        report.buffs = state.update_buffs(elapsed_ms);

        report.pruned_projectiles = self.prune_expired_projectiles();
        report.pruned_enemies = self.prune_dead_enemies();
        report.pruned_effects = self.prune_expired_visual_effects();

        self.recenter_camera();

        self.tick += 1;
        report.tick = self.tick;
        self.event_log.push(WorldEvent::Advanced {
            tick: self.tick,
            elapsed_ms,
        });
        tracing::trace!(
            tick = self.tick,
            moved = report.moved,
            blocked = report.blocked,
            "advance complete"
        );
        report
    }

    /// Give each enemy's mind control, in insertion order.
    ///
    /// The mind is detached while it runs and reattached only if its enemy is
    /// still present afterwards.
    fn run_enemy_minds(&mut self, elapsed_ms: f32) {
        let ids: Vec<EntityId> = self.enemies.iter().map(Enemy::id).collect();
        for id in ids {
            let Some(mut mind) = self.enemy_mut(id).and_then(|e| e.mind.take()) else {
                continue;
            };
            mind.control(id, self, elapsed_ms);
            if let Some(enemy) = self.enemy_mut(id) {
                enemy.mind = Some(mind);
            }
        }
    }

    fn run_projectile_behaviors(&mut self, elapsed_ms: f32) {
        let ids: Vec<EntityId> = self.projectiles.iter().map(Projectile::id).collect();
        for id in ids {
            let Some(mut behavior) = self.projectile_mut(id).and_then(|p| p.behavior.take())
            else {
                continue;
            };
            behavior.update(id, self, elapsed_ms);
            if let Some(projectile) = self.projectile_mut(id) {
                projectile.behavior = Some(behavior);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actors::{EnemyMind, Loot, ProjectileBehavior, VisualEffect};
    use crate::player::BuffId;
    use crate::{EntitySpawn, Spawn, WorldConfig};
    use dungeon_common::{Direction, EntityKind, Rect};
    use glam::Vec2;

    fn world() -> World {
        let config = WorldConfig {
            world_size: Vec2::new(1000.0, 800.0),
            camera_size: Vec2::new(300.0, 200.0),
        };
        let player = EntitySpawn::new(Vec2::new(500.0, 400.0), Vec2::new(30.0, 30.0)).with_speed(0.1);
        World::new(config, player, vec![Rect::new(0.0, 0.0, 25.0, 25.0)]).unwrap()
    }

    /// Walks toward the player horizontally and bites when overlapping.
    struct Chaser;

    impl EnemyMind for Chaser {
        fn control(&mut self, enemy: EntityId, world: &mut World, _elapsed_ms: f32) {
            let target = world.player().center();
            let me = world.enemy(enemy).map(|e| e.entity.center()).unwrap_or(target);
            let dir = if target.x < me.x {
                Direction::Left
            } else {
                Direction::Right
            };
            world.set_direction(enemy, Some(dir));
        }
    }

    /// Expires after a fixed lifetime or when leaving the world.
    struct Lifetime(f32);

    impl ProjectileBehavior for Lifetime {
        fn update(&mut self, projectile: EntityId, world: &mut World, elapsed_ms: f32) {
            self.0 -= elapsed_ms;
            let outside = world
                .projectile(projectile)
                .is_some_and(|p| !world.is_within_world(&p.entity.rect()));
            if self.0 <= 0.0 || outside {
                if let Some(p) = world.projectile_mut(projectile) {
                    p.expire();
                }
            }
        }
    }

    /// Despawns its own enemy on first control.
    struct SelfDestruct;

    impl EnemyMind for SelfDestruct {
        fn control(&mut self, enemy: EntityId, world: &mut World, _elapsed_ms: f32) {
            world.despawn(enemy);
        }
    }

    #[test]
    fn advance_moves_player_and_recenters_camera() {
        let mut w = world();
        let player = w.player().id();
        w.set_direction(player, Some(Direction::Down));
        let report = w.advance(100.0);
        assert_eq!(report.moved, 1);
        assert_eq!(w.player().position(), Vec2::new(500.0, 410.0));
        assert_eq!(w.camera_rect().center(), w.player().center());
        assert_eq!(w.tick(), 1);
    }

    #[test]
    fn step_runs_minds_before_motion() {
        let mut w = world();
        let e = w
            .spawn(
                Spawn::enemy(
                    EntitySpawn::new(Vec2::new(100.0, 400.0), Vec2::new(30.0, 30.0)).with_speed(0.2),
                    10,
                )
                .with_mind(Chaser),
            )
            .unwrap();
        w.step(50.0);
        assert_eq!(w.enemy(e).unwrap().entity.position(), Vec2::new(110.0, 400.0));
        // Mind is reattached and keeps steering.
        w.step(50.0);
        assert_eq!(w.enemy(e).unwrap().entity.position(), Vec2::new(120.0, 400.0));
    }

    #[test]
    fn mind_may_remove_its_own_enemy() {
        let mut w = world();
        let e = w
            .spawn(
                Spawn::enemy(EntitySpawn::new(Vec2::new(100.0, 100.0), Vec2::new(30.0, 30.0)), 5)
                    .with_mind(SelfDestruct),
            )
            .unwrap();
        w.step(16.0);
        assert!(w.enemy(e).is_none());
        assert_eq!(w.kind_of(e), None);
    }

    #[test]
    fn projectiles_fly_through_enemies_and_expire() {
        let mut w = world();
        w.spawn(Spawn::enemy(
            EntitySpawn::new(Vec2::new(200.0, 100.0), Vec2::new(30.0, 30.0)),
            5,
        ))
        .unwrap();
        let p = w
            .spawn(
                Spawn::projectile(
                    EntitySpawn::new(Vec2::new(150.0, 105.0), Vec2::new(10.0, 10.0))
                        .with_speed(1.0)
                        .moving(Direction::Right),
                )
                .with_behavior(Lifetime(150.0)),
            )
            .unwrap();

        w.step(100.0);
        assert_eq!(w.projectile(p).unwrap().entity.position(), Vec2::new(250.0, 105.0));

        let report = w.step(100.0);
        assert_eq!(report.pruned_projectiles, 1);
        assert!(w.projectile(p).is_none());
    }

    #[test]
    fn projectile_leaving_world_is_expired_by_behavior() {
        let mut w = world();
        let p = w
            .spawn(
                Spawn::projectile(
                    EntitySpawn::new(Vec2::new(980.0, 105.0), Vec2::new(10.0, 10.0))
                        .with_speed(1.0)
                        .moving(Direction::Right),
                )
                .with_behavior(Lifetime(10_000.0)),
            )
            .unwrap();
        w.step(100.0);
        assert!(w.projectile(p).is_some());
        w.step(100.0);
        assert!(w.projectile(p).is_none());
    }

    #[test]
    fn dead_enemies_are_swept_during_advance() {
        let mut w = world();
        let e = w
            .spawn(Spawn::enemy(
                EntitySpawn::new(Vec2::new(100.0, 100.0), Vec2::new(30.0, 30.0)),
                5,
            ))
            .unwrap();
        w.enemy_mut(e).unwrap().lose_health(5);
        let report = w.advance(16.0);
        assert_eq!(report.pruned_enemies, 1);
        assert!(
            w.events()
                .contains(&WorldEvent::Despawned { id: e, kind: EntityKind::Enemy })
        );
    }

    #[test]
    fn ground_items_stay_put() {
        let mut w = world();
        let item = w
            .spawn(Spawn::ground_item(
                EntitySpawn::new(Vec2::new(300.0, 300.0), Vec2::new(20.0, 20.0))
                    .with_speed(1.0)
                    .moving(Direction::Up),
                Loot::Item("hatchet".into()),
            ))
            .unwrap();
        w.advance(100.0);
        assert_eq!(w.ground_item(item).unwrap().entity.position(), Vec2::new(300.0, 300.0));
    }

    #[test]
    fn advance_ticks_player_state_and_effects() {
        let mut w = world();
        w.player_state_mut().gain_buff(BuffId("haste".into()), 50.0);
        w.add_visual_effect(VisualEffect::new("dmg", Rect::new(0.0, 0.0, 5.0, 5.0), 30.0));
        let report = w.advance(40.0);
        assert_eq!(report.buffs.started, vec![BuffId("haste".into())]);
        assert_eq!(report.pruned_effects, 1);
        let report = w.advance(40.0);
        assert_eq!(report.buffs.ended, vec![BuffId("haste".into())]);
    }

    #[test]
    fn tick_is_deterministic_across_runs() {
        let run = || {
            let mut w = world();
            for i in 0..5 {
                w.spawn(
                    Spawn::enemy(
                        EntitySpawn::new(
                            Vec2::new(100.0 + 60.0 * i as f32, 600.0),
                            Vec2::new(30.0, 30.0),
                        )
                        .with_speed(0.15),
                        5,
                    )
                    .with_mind(Chaser),
                )
                .unwrap();
            }
            for _ in 0..40 {
                w.step(16.0);
            }
            w.enemies()
                .iter()
                .map(|e| e.entity.position())
                .collect::<Vec<_>>()
        };
        assert_eq!(run(), run());
    }
}

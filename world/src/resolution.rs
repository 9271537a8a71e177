//! Ordered collision and effect resolution for a single logical tick.

use snake_arcade_core::{
    CellCoord, CellKind, DeathReason, Event, FoodKind, SessionState, SpecialEffect, StatusEffect,
};
use tracing::debug;

use crate::{ActiveStatus, World};

/// Runs one logical tick.
///
/// The order is fixed: turn, move, terminal collisions, food, special food,
/// expiry, hostile motion, projectile hits.
pub(crate) fn run_step(world: &mut World, out_events: &mut Vec<Event>) {
    let Some(direction) = world.queued.take().or(world.snake.direction()) else {
        expire(world, out_events);
        return;
    };

    let outcome = world.snake.advance(direction, &mut world.grid);
    if outcome.wall_collision {
        world.end_session(DeathReason::Wall, out_events);
        return;
    }
    if outcome.obstacle_collision {
        world.end_session(DeathReason::Obstacle, out_events);
        return;
    }
    if outcome.self_collision {
        world.end_session(DeathReason::SelfCollision, out_events);
        return;
    }
    let Some(head) = outcome.new_head else {
        return;
    };
    out_events.push(Event::SnakeAdvanced {
        head,
        length: world.snake_length(),
    });

    match outcome.ate {
        Some(FoodKind::Regular) => consume_food(world, head, out_events),
        Some(FoodKind::Special) => consume_special_food(world, head, out_events),
        None => {}
    }

    expire(world, out_events);

    let (columns, rows) = (world.grid.columns(), world.grid.rows());
    world.hostiles.advance(
        world.clock.elapsed(),
        columns,
        rows,
        &world.config.enemies,
        out_events,
    );
    resolve_projectiles(world, out_events);
}

/// Removes special food and statuses whose expiry time has passed.
pub(crate) fn expire(world: &mut World, out_events: &mut Vec<Event>) {
    if world.state == SessionState::GameOver {
        return;
    }
    let now = world.clock.elapsed();

    if let Some(special) = world.special_food {
        if special.expires_at <= now {
            world.special_food = None;
            if world.grid.cell_at(special.cell) == Some(CellKind::SpecialFood) {
                let _ = world.grid.set_cell(special.cell, CellKind::Empty);
            }
            debug!(cell = %special.cell, "special food expired");
            out_events.push(Event::SpecialFoodExpired { cell: special.cell });
        }
    }

    let mut lapsed = Vec::new();
    world.statuses.retain(|active| {
        if active.until <= now {
            lapsed.push(active.status);
            false
        } else {
            true
        }
    });
    out_events.extend(
        lapsed
            .into_iter()
            .map(|status| Event::StatusExpired { status }),
    );
}

fn consume_food(world: &mut World, cell: CellCoord, out_events: &mut Vec<Event>) {
    let Some(food) = world.food.take() else {
        return;
    };
    world.add_score(food.points);
    out_events.push(Event::FoodEaten {
        cell,
        points: food.points,
        score: world.score,
    });
    world.sync_level(out_events);
}

fn consume_special_food(world: &mut World, cell: CellCoord, out_events: &mut Vec<Event>) {
    let Some(special) = world.special_food.take() else {
        return;
    };
    world.add_score(special.points);
    out_events.push(Event::SpecialFoodEaten {
        cell,
        effect: special.effect,
        points: special.points,
        score: world.score,
    });

    match special.effect {
        SpecialEffect::Bonus => {}
        SpecialEffect::ClearEnemies => {
            let count = world.hostiles.clear_drones();
            out_events.push(Event::EnemiesCleared { count });
        }
        SpecialEffect::DamageBoss => match world.hostiles.damage_boss() {
            Some(0) => {
                out_events.push(Event::BossDamaged { health: 0 });
                let bonus = world.config.scoring.boss_bonus;
                world.add_score(bonus);
                out_events.push(Event::BossDefeated { bonus });
            }
            Some(health) => out_events.push(Event::BossDamaged { health }),
            None => {}
        },
        SpecialEffect::Shield => {
            let until = world
                .clock
                .elapsed()
                .saturating_add(world.config.special_food.shield_duration());
            world
                .statuses
                .retain(|active| active.status != StatusEffect::Shield);
            world.statuses.push(ActiveStatus {
                status: StatusEffect::Shield,
                until,
            });
            out_events.push(Event::StatusGranted {
                status: StatusEffect::Shield,
                until,
            });
        }
    }

    world.sync_level(out_events);
}

fn resolve_projectiles(world: &mut World, out_events: &mut Vec<Event>) {
    let (columns, rows) = (world.grid.columns(), world.grid.rows());
    let truncate = usize::try_from(world.config.enemies.truncate_segments).unwrap_or(usize::MAX);
    let min_length = usize::try_from(world.config.snake.min_length).unwrap_or(usize::MAX);
    let projectiles = world.hostiles.take_projectiles();
    let mut survivors = Vec::with_capacity(projectiles.len());

    for projectile in projectiles {
        if world.state != SessionState::Playing {
            survivors.push(projectile);
            continue;
        }
        if projectile.is_spent(columns, rows) {
            continue;
        }
        let head = world.snake.head();
        let struck = projectile
            .swept_cells(columns, rows)
            .into_iter()
            .find(|cell| head == Some(*cell) || world.snake.is_body(*cell));
        let Some(cell) = struck else {
            survivors.push(projectile);
            continue;
        };
        let head_hit = head == Some(cell);

        if world.is_shielded() {
            out_events.push(Event::ProjectileAbsorbed {
                projectile: projectile.id,
            });
            continue;
        }
        if head_hit {
            world.end_session(DeathReason::Projectile, out_events);
            continue;
        }
        if world.snake.len().saturating_sub(truncate) < min_length {
            world.end_session(DeathReason::Truncated, out_events);
            continue;
        }
        let lost = world.snake.truncate_tail(truncate, &mut world.grid);
        out_events.push(Event::CollisionDamage {
            segments_lost: u32::try_from(lost).unwrap_or(u32::MAX),
            length: world.snake_length(),
        });
    }

    world.hostiles.keep_projectiles(survivors);
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use glam::Vec2;
    use snake_arcade_core::{Command, Direction, EnemyId, GameConfig, SessionSave};

    use super::*;
    use crate::{apply, query};

    fn world_with_snake(segments: Vec<CellCoord>) -> World {
        let mut world = World::new(GameConfig::default()).expect("valid config");
        let mut events = Vec::new();
        apply(
            &mut world,
            Command::RestoreSession {
                save: SessionSave {
                    columns: 16,
                    rows: 16,
                    score: 0,
                    level: 1,
                    snake: segments,
                    food: None,
                },
            },
            &mut events,
        );
        apply(
            &mut world,
            Command::RequestDirection {
                direction: Direction::Right,
            },
            &mut events,
        );
        world
    }

    fn row_snake(head: u32, length: u32) -> Vec<CellCoord> {
        (0..length).map(|i| CellCoord::new(head - i, 8)).collect()
    }

    fn launch(world: &mut World, x: f32, y: f32, velocity: Vec2) {
        let _ = world
            .hostiles
            .launch(EnemyId::new(99), Vec2::new(x, y), velocity);
    }

    fn step(world: &mut World) -> Vec<Event> {
        let mut events = Vec::new();
        apply(
            world,
            Command::Tick {
                dt: Duration::from_millis(200),
            },
            &mut events,
        );
        events
    }

    #[test]
    fn body_hits_truncate_the_tail() {
        let mut world = world_with_snake(row_snake(10, 7));
        launch(&mut world, 6.5, 7.6, Vec2::new(0.0, 0.5));

        let events = step(&mut world);

        assert!(events.contains(&Event::CollisionDamage {
            segments_lost: 2,
            length: 5,
        }));
        assert_eq!(
            query::snake_segments(&world),
            (7..=11).rev().map(|c| CellCoord::new(c, 8)).collect::<Vec<_>>()
        );
        assert_eq!(world.grid.cell_at(CellCoord::new(5, 8)), Some(CellKind::Empty));
        assert!(world.hostiles.projectile_snapshots().is_empty());
        assert_eq!(world.state, SessionState::Playing);
    }

    #[test]
    fn fast_projectiles_cannot_jump_over_the_snake() {
        let mut world = world_with_snake(row_snake(10, 7));
        launch(&mut world, 8.5, 5.5, Vec2::new(0.0, 2.0));

        let first = step(&mut world);
        assert!(!first
            .iter()
            .any(|event| matches!(event, Event::CollisionDamage { .. })));

        let second = step(&mut world);

        assert!(second.contains(&Event::CollisionDamage {
            segments_lost: 2,
            length: 5,
        }));
        assert!(world.hostiles.projectile_snapshots().is_empty());
        assert_eq!(world.state, SessionState::Playing);
    }

    #[test]
    fn head_hits_end_the_session() {
        let mut world = world_with_snake(row_snake(10, 7));
        launch(&mut world, 11.5, 7.6, Vec2::new(0.0, 0.5));

        let events = step(&mut world);

        assert_eq!(world.state, SessionState::GameOver);
        assert!(matches!(
            events.last(),
            Some(Event::GameOver {
                reason: DeathReason::Projectile,
                length: 7,
                ..
            })
        ));
    }

    #[test]
    fn shield_absorbs_hits() {
        let mut world = world_with_snake(row_snake(10, 7));
        world.statuses.push(ActiveStatus {
            status: StatusEffect::Shield,
            until: Duration::from_secs(10),
        });
        launch(&mut world, 11.5, 7.6, Vec2::new(0.0, 0.5));

        let events = step(&mut world);

        assert!(events.iter().any(|event| matches!(event, Event::ProjectileAbsorbed { .. })));
        assert_eq!(world.state, SessionState::Playing);
        assert_eq!(world.snake.len(), 7);
        assert!(world.hostiles.projectile_snapshots().is_empty());
    }

    #[test]
    fn truncation_below_minimum_ends_the_session() {
        let mut world = world_with_snake(row_snake(8, 3));
        launch(&mut world, 7.5, 7.6, Vec2::new(0.0, 0.5));

        let events = step(&mut world);

        assert!(matches!(
            events.last(),
            Some(Event::GameOver {
                reason: DeathReason::Truncated,
                ..
            })
        ));
        assert_eq!(world.snake.len(), 3);
    }

    #[test]
    fn misses_keep_flying_and_spent_projectiles_vanish() {
        let mut world = world_with_snake(row_snake(10, 4));
        launch(&mut world, 1.5, 1.5, Vec2::new(0.0, 0.5));
        launch(&mut world, -0.9, 3.0, Vec2::new(-0.5, 0.0));

        let _ = step(&mut world);

        let remaining = world.hostiles.projectile_snapshots();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].position, Vec2::new(1.5, 2.0));
    }

    #[test]
    fn shield_replaces_rather_than_stacks() {
        let mut world = world_with_snake(row_snake(10, 4));
        let mut events = Vec::new();
        for _ in 0..2 {
            let head = world.snake.head().expect("snake has a head");
            apply(
                &mut world,
                Command::PlaceSpecialFood {
                    cell: CellCoord::new(head.column() + 1, 8),
                    effect: SpecialEffect::Shield,
                },
                &mut events,
            );
            events.extend(step(&mut world));
        }

        assert_eq!(world.statuses.len(), 1);
        assert_eq!(world.statuses[0].until, Duration::from_millis(5_400));
        let granted = events
            .iter()
            .filter(|event| matches!(event, Event::StatusGranted { .. }))
            .count();
        assert_eq!(granted, 2);
    }
}

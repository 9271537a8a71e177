use std::time::Duration;

use snake_arcade_core::{
    CellCoord, Command, Direction, Edge, EnemyPattern, Event, GameConfig, SpecialEffect,
};
use snake_arcade_world::{self as world, query, World};

fn submit(world: &mut World, command: Command) -> Vec<Event> {
    let mut events = Vec::new();
    world::apply(world, command, &mut events);
    events
}

fn arena(configure: impl FnOnce(&mut GameConfig)) -> World {
    let mut config = GameConfig::default();
    config.enemies.start_level = 1;
    configure(&mut config);
    let mut world = World::new(config).expect("valid config");
    let _ = submit(&mut world, Command::StartSession);
    world
}

fn spawn(world: &mut World, edge: Edge, offset: u32) -> Vec<Event> {
    submit(
        world,
        Command::SpawnEnemy {
            edge,
            offset,
            pattern: EnemyPattern::Stationary,
        },
    )
}

fn step(world: &mut World) -> Vec<Event> {
    let dt = query::tick_interval(world);
    submit(world, Command::Tick { dt })
}

fn eat_next(world: &mut World, effect: SpecialEffect) -> Vec<Event> {
    let head = query::snake_segments(world)[0];
    let _ = submit(
        world,
        Command::PlaceSpecialFood {
            cell: CellCoord::new(head.column() + 1, head.row()),
            effect,
        },
    );
    let _ = submit(
        world,
        Command::RequestDirection {
            direction: Direction::Right,
        },
    );
    step(world)
}

#[test]
fn enemy_count_is_capped() {
    let mut world = arena(|_| {});
    let mut spawned = 0;
    for offset in 0..5 {
        spawned += spawn(&mut world, Edge::North, offset)
            .iter()
            .filter(|event| matches!(event, Event::EnemySpawned { .. }))
            .count();
    }
    assert_eq!(spawned, 3);
    assert_eq!(query::population(&world).enemy_count, 3);
}

#[test]
fn offsets_past_the_edge_are_ignored() {
    let mut world = arena(|_| {});
    assert!(spawn(&mut world, Edge::East, 16).is_empty());
    assert_eq!(spawn(&mut world, Edge::East, 15).len(), 1);
}

#[test]
fn disabled_enemies_never_spawn() {
    let mut world = arena(|config| config.enemies.enabled = false);
    assert!(spawn(&mut world, Edge::South, 4).is_empty());
}

#[test]
fn enemies_fire_while_the_snake_moves() {
    let mut world = arena(|config| config.enemies.fire_interval_ms = 200);
    let _ = spawn(&mut world, Edge::North, 0);
    let _ = submit(
        &mut world,
        Command::RequestDirection {
            direction: Direction::Down,
        },
    );

    let fired: usize = (0..3)
        .map(|_| {
            step(&mut world)
                .iter()
                .filter(|event| matches!(event, Event::ProjectileFired { .. }))
                .count()
        })
        .sum();

    assert_eq!(fired, 3);
    let snapshot = query::snapshot(&world);
    assert_eq!(snapshot.projectiles.len(), 3);
    assert!(snapshot
        .projectiles
        .iter()
        .all(|projectile| projectile.velocity.x > 0.0 && projectile.velocity.y > 0.0));
}

#[test]
fn clearing_special_food_removes_every_drone() {
    let mut world = arena(|_| {});
    let _ = spawn(&mut world, Edge::North, 1);
    let _ = spawn(&mut world, Edge::West, 1);

    let events = eat_next(&mut world, SpecialEffect::ClearEnemies);

    assert!(events.contains(&Event::EnemiesCleared { count: 2 }));
    assert_eq!(query::population(&world).enemy_count, 0);
    assert!(query::snapshot(&world).enemies.is_empty());
}

#[test]
fn the_boss_falls_after_enough_hits() {
    let mut world = arena(|config| config.boss.health = 2);
    let spawned = submit(&mut world, Command::SpawnBoss);
    assert!(matches!(
        spawned.as_slice(),
        [Event::BossSpawned { health: 2, .. }]
    ));
    assert!(submit(&mut world, Command::SpawnBoss).is_empty());

    let first = eat_next(&mut world, SpecialEffect::DamageBoss);
    assert!(first.contains(&Event::BossDamaged { health: 1 }));

    let second = eat_next(&mut world, SpecialEffect::DamageBoss);
    assert!(second.contains(&Event::BossDamaged { health: 0 }));
    assert!(second.contains(&Event::BossDefeated { bonus: 10 }));

    assert!(!query::population(&world).boss_present);
    assert_eq!(query::score(&world), 16);
    assert_eq!(query::level(&world), 4);
}

#[test]
fn damage_without_a_boss_only_scores() {
    let mut world = arena(|_| {});
    let events = eat_next(&mut world, SpecialEffect::DamageBoss);
    assert!(!events
        .iter()
        .any(|event| matches!(event, Event::BossDamaged { .. })));
    assert_eq!(query::score(&world), 3);
}

#[test]
fn shield_expires_after_its_duration() {
    let mut world = arena(|config| config.special_food.shield_ms = 1_000);
    let granted = eat_next(&mut world, SpecialEffect::Shield);
    assert!(granted.iter().any(|event| matches!(event, Event::StatusGranted { .. })));
    assert!(query::is_shielded(&world));

    let _ = submit(
        &mut world,
        Command::RequestDirection {
            direction: Direction::Up,
        },
    );
    let mut expired = false;
    for _ in 0..5 {
        expired |= step(&mut world)
            .iter()
            .any(|event| matches!(event, Event::StatusExpired { .. }));
    }
    assert!(expired);
    assert!(!query::is_shielded(&world));
    assert_eq!(query::elapsed(&world), Duration::from_millis(1_200));
}

use std::time::Duration;

use snake_arcade_core::{
    CellCoord, CellKind, Command, DeathReason, Direction, Event, GameConfig, SessionState,
    SpecialEffect,
};
use snake_arcade_world::{self as world, query, World};

fn started() -> World {
    let mut world = World::new(GameConfig::default()).expect("valid config");
    let mut events = Vec::new();
    world::apply(&mut world, Command::StartSession, &mut events);
    world
}

fn submit(world: &mut World, command: Command) -> Vec<Event> {
    let mut events = Vec::new();
    world::apply(world, command, &mut events);
    events
}

fn step(world: &mut World) -> Vec<Event> {
    let dt = query::tick_interval(world);
    submit(world, Command::Tick { dt })
}

fn turn(world: &mut World, direction: Direction) {
    let _ = submit(world, Command::RequestDirection { direction });
}

#[test]
fn eating_food_grows_the_snake_and_scores() {
    let mut world = started();
    let _ = submit(
        &mut world,
        Command::PlaceFood {
            cell: CellCoord::new(9, 8),
        },
    );
    turn(&mut world, Direction::Right);

    let events = step(&mut world);

    assert_eq!(
        query::snake_segments(&world),
        vec![
            CellCoord::new(9, 8),
            CellCoord::new(8, 8),
            CellCoord::new(7, 8),
            CellCoord::new(6, 8),
        ]
    );
    assert_eq!(query::score(&world), 1);
    assert_eq!(query::food_cell(&world), None);
    assert!(events.contains(&Event::FoodEaten {
        cell: CellCoord::new(9, 8),
        points: 1,
        score: 1,
    }));
}

#[test]
fn non_eating_ticks_keep_length() {
    let mut world = started();
    turn(&mut world, Direction::Up);
    for _ in 0..4 {
        let _ = step(&mut world);
        assert_eq!(query::snake_segments(&world).len(), 3);
    }
    assert_eq!(query::score(&world), 0);
}

#[test]
fn leaving_the_grid_ends_the_session_with_score_frozen() {
    let mut world = started();
    let _ = submit(
        &mut world,
        Command::PlaceFood {
            cell: CellCoord::new(10, 8),
        },
    );
    turn(&mut world, Direction::Right);

    for _ in 0..7 {
        let _ = step(&mut world);
    }
    assert_eq!(query::snake_segments(&world)[0], CellCoord::new(15, 8));
    assert_eq!(query::score(&world), 1);

    let events = step(&mut world);

    assert_eq!(query::state(&world), SessionState::GameOver);
    assert_eq!(query::score(&world), 1);
    assert_eq!(query::snake_segments(&world)[0], CellCoord::new(15, 8));
    assert!(events.contains(&Event::GameOver {
        reason: DeathReason::Wall,
        score: 1,
        level: 1,
        length: 4,
        new_high_score: true,
    }));
    assert_eq!(query::high_score(&world), 1);

    assert!(step(&mut world).is_empty(), "game over is absorbing");
}

#[test]
fn running_into_the_body_ends_the_session() {
    let mut world = started();
    for cell in [CellCoord::new(9, 8), CellCoord::new(10, 8)] {
        let _ = submit(&mut world, Command::PlaceFood { cell });
        turn(&mut world, Direction::Right);
        let _ = step(&mut world);
    }
    assert_eq!(query::snake_segments(&world).len(), 5);

    turn(&mut world, Direction::Up);
    let _ = step(&mut world);
    turn(&mut world, Direction::Left);
    let _ = step(&mut world);
    turn(&mut world, Direction::Down);
    let events = step(&mut world);

    assert_eq!(query::state(&world), SessionState::GameOver);
    assert!(matches!(
        events.last(),
        Some(Event::GameOver {
            reason: DeathReason::SelfCollision,
            ..
        })
    ));
}

#[test]
fn obstacles_end_the_session() {
    let mut config = GameConfig::default();
    config.grid.obstacles.push(CellCoord::new(10, 8));
    let mut world = World::new(config).expect("valid config");
    let _ = submit(&mut world, Command::StartSession);
    assert_eq!(
        query::grid_view(&world).cell_at(CellCoord::new(10, 8)),
        Some(CellKind::Obstacle)
    );
    turn(&mut world, Direction::Right);

    let _ = step(&mut world);
    let events = step(&mut world);

    assert!(matches!(
        events.last(),
        Some(Event::GameOver {
            reason: DeathReason::Obstacle,
            ..
        })
    ));
}

#[test]
fn reverse_request_keeps_the_queued_direction() {
    let mut world = started();
    turn(&mut world, Direction::Right);
    let _ = step(&mut world);

    let rejected = submit(
        &mut world,
        Command::RequestDirection {
            direction: Direction::Left,
        },
    );
    assert!(rejected.is_empty());
    assert_eq!(query::snapshot(&world).snake.queued, None);

    let accepted = submit(
        &mut world,
        Command::RequestDirection {
            direction: Direction::Up,
        },
    );
    assert_eq!(
        accepted,
        vec![Event::DirectionQueued {
            direction: Direction::Up
        }]
    );
    assert_eq!(query::snapshot(&world).snake.queued, Some(Direction::Up));
}

#[test]
fn snake_idles_until_a_direction_is_chosen() {
    let mut world = started();
    let before = query::snake_segments(&world);
    for _ in 0..5 {
        let _ = step(&mut world);
    }
    assert_eq!(query::snake_segments(&world), before);
    assert_eq!(query::state(&world), SessionState::Playing);
}

#[test]
fn collected_special_food_applies_once() {
    let mut world = started();
    let placed = submit(
        &mut world,
        Command::PlaceSpecialFood {
            cell: CellCoord::new(9, 8),
            effect: SpecialEffect::Bonus,
        },
    );
    assert_eq!(
        placed,
        vec![Event::SpecialFoodPlaced {
            cell: CellCoord::new(9, 8),
            effect: SpecialEffect::Bonus,
            expires_at: Duration::from_millis(10_000),
        }]
    );
    turn(&mut world, Direction::Right);

    let mut eaten = 0;
    for _ in 0..3 {
        eaten += step(&mut world)
            .iter()
            .filter(|event| matches!(event, Event::SpecialFoodEaten { .. }))
            .count();
    }

    assert_eq!(eaten, 1);
    assert_eq!(query::score(&world), 3);
    assert_eq!(query::special_food(&world), None);
}

#[test]
fn uncollected_special_food_expires_without_side_effects() {
    let mut world = started();
    let cell = CellCoord::new(1, 1);
    let _ = submit(
        &mut world,
        Command::PlaceSpecialFood {
            cell,
            effect: SpecialEffect::Shield,
        },
    );

    for _ in 0..99 {
        let _ = submit(
            &mut world,
            Command::Tick {
                dt: Duration::from_millis(100),
            },
        );
    }
    assert!(query::special_food(&world).is_some());

    let events = submit(
        &mut world,
        Command::Tick {
            dt: Duration::from_millis(100),
        },
    );

    assert!(events.contains(&Event::SpecialFoodExpired { cell }));
    assert_eq!(query::special_food(&world), None);
    assert_eq!(query::grid_view(&world).cell_at(cell), Some(CellKind::Empty));
    assert_eq!(query::score(&world), 0);
    assert!(!query::is_shielded(&world));
}

#[test]
fn level_ups_follow_score_thresholds() {
    let mut world = started();
    turn(&mut world, Direction::Right);
    let mut levels = Vec::new();
    for column in 9..15 {
        let _ = submit(
            &mut world,
            Command::PlaceFood {
                cell: CellCoord::new(column, 8),
            },
        );
        for event in step(&mut world) {
            if let Event::LevelUp { level } = event {
                levels.push(level);
            }
        }
    }

    assert_eq!(query::score(&world), 6);
    assert_eq!(levels, vec![2]);
    assert_eq!(query::level(&world), 2);
    assert_eq!(query::tick_interval(&world), Duration::from_millis(190));
}

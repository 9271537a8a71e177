use std::{collections::HashSet, time::Duration};

use proptest::prelude::*;
use snake_arcade_core::{CellCoord, CellKind, Command, Direction, Event, GameConfig, SessionState};
use snake_arcade_world::{self as world, query, World};

fn direction() -> impl Strategy<Value = Direction> {
    prop::sample::select(Direction::ALL.to_vec())
}

fn cell() -> impl Strategy<Value = CellCoord> {
    (0_u32..16, 0_u32..16).prop_map(|(column, row)| CellCoord::new(column, row))
}

proptest! {
    #[test]
    fn random_play_preserves_board_invariants(
        moves in prop::collection::vec((direction(), cell()), 1..120),
    ) {
        let mut world = World::new(GameConfig::default()).expect("valid config");
        let mut events = Vec::new();
        world::apply(&mut world, Command::StartSession, &mut events);
        let mut last_score = 0;
        let mut last_interval = query::tick_interval(&world);

        for (direction, food) in moves {
            events.clear();
            world::apply(&mut world, Command::PlaceFood { cell: food }, &mut events);
            world::apply(&mut world, Command::RequestDirection { direction }, &mut events);
            world::apply(
                &mut world,
                Command::Tick { dt: Duration::from_millis(200) },
                &mut events,
            );

            let segments = query::snake_segments(&world);
            let distinct: HashSet<CellCoord> = segments.iter().copied().collect();
            prop_assert_eq!(distinct.len(), segments.len());
            prop_assert!(segments.iter().all(|cell| cell.column() < 16 && cell.row() < 16));

            let view = query::grid_view(&world);
            prop_assert_eq!(view.cell_at(segments[0]), Some(CellKind::SnakeHead));
            for body in &segments[1..] {
                prop_assert_eq!(view.cell_at(*body), Some(CellKind::SnakeBody));
            }
            if let Some(food) = query::food_cell(&world) {
                prop_assert!(!segments.contains(&food));
                prop_assert_eq!(view.cell_at(food), Some(CellKind::Food));
            }

            let score = query::score(&world);
            prop_assert!(score >= last_score);
            last_score = score;

            let interval = query::tick_interval(&world);
            prop_assert!(interval <= last_interval);
            prop_assert!(interval >= Duration::from_millis(50));
            last_interval = interval;

            let advanced = events
                .iter()
                .filter(|event| matches!(event, Event::SnakeAdvanced { .. }))
                .count();
            prop_assert!(advanced <= 1);

            if query::state(&world) == SessionState::GameOver {
                let frozen = query::score(&world);
                world::apply(
                    &mut world,
                    Command::Tick { dt: Duration::from_millis(200) },
                    &mut events,
                );
                prop_assert_eq!(query::score(&world), frozen);
                break;
            }
        }
    }
}

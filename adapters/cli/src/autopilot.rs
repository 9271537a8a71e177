//! Greedy autopilot that steers the headless snake.

use std::collections::{HashSet, VecDeque};

use snake_arcade_core::{CellCoord, Direction, WorldSnapshot};

/// Picks the next heading for the snake in `snapshot`.
///
/// Follows the shortest open path to the nearest food. When no food is
/// reachable it turns toward the neighbour with the most open space.
pub(crate) fn choose(snapshot: &WorldSnapshot) -> Option<Direction> {
    let head = snapshot.snake.head()?;
    let blocked = blocked_cells(snapshot);
    let targets: Vec<CellCoord> = snapshot
        .special_food
        .map(|special| special.cell)
        .into_iter()
        .chain(snapshot.food.map(|food| food.cell))
        .collect();

    let moves: Vec<(Direction, CellCoord)> = Direction::ALL
        .into_iter()
        .filter(|direction| snapshot.snake.direction != Some(direction.opposite()))
        .filter_map(|direction| {
            let next = head.step(direction, snapshot.columns, snapshot.rows)?;
            (!blocked.contains(&next)).then_some((direction, next))
        })
        .collect();

    let toward_food = moves
        .iter()
        .filter_map(|&(direction, next)| {
            distance_to_any(next, &targets, &blocked, snapshot).map(|steps| (steps, direction))
        })
        .min_by_key(|&(steps, _)| steps)
        .map(|(_, direction)| direction);

    toward_food.or_else(|| {
        moves
            .iter()
            .max_by_key(|&&(_, next)| open_area(next, &blocked, snapshot))
            .map(|&(direction, _)| direction)
    })
}

/// Cells the head must not enter next tick. The tail moves away, so it is
/// left open.
fn blocked_cells(snapshot: &WorldSnapshot) -> HashSet<CellCoord> {
    let segments = &snapshot.snake.segments;
    let keep = segments.len().saturating_sub(1);
    segments
        .iter()
        .take(keep)
        .chain(snapshot.obstacles.iter())
        .copied()
        .collect()
}

fn neighbours(cell: CellCoord, snapshot: &WorldSnapshot) -> impl Iterator<Item = CellCoord> + '_ {
    Direction::ALL
        .into_iter()
        .filter_map(move |direction| cell.step(direction, snapshot.columns, snapshot.rows))
}

fn distance_to_any(
    start: CellCoord,
    targets: &[CellCoord],
    blocked: &HashSet<CellCoord>,
    snapshot: &WorldSnapshot,
) -> Option<usize> {
    if targets.is_empty() {
        return None;
    }
    let mut seen = HashSet::from([start]);
    let mut frontier = VecDeque::from([(start, 0_usize)]);
    while let Some((cell, steps)) = frontier.pop_front() {
        if targets.contains(&cell) {
            return Some(steps);
        }
        for next in neighbours(cell, snapshot) {
            if !blocked.contains(&next) && seen.insert(next) {
                frontier.push_back((next, steps + 1));
            }
        }
    }
    None
}

fn open_area(start: CellCoord, blocked: &HashSet<CellCoord>, snapshot: &WorldSnapshot) -> usize {
    let mut seen = HashSet::from([start]);
    let mut frontier = vec![start];
    while let Some(cell) = frontier.pop() {
        for next in neighbours(cell, snapshot) {
            if !blocked.contains(&next) && seen.insert(next) {
                frontier.push(next);
            }
        }
    }
    seen.len()
}

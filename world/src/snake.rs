//! Snake body bookkeeping and single-step advancement.

use std::collections::VecDeque;

use snake_arcade_core::{CellCoord, CellKind, Direction, FoodKind, SnakeConfig};
use thiserror::Error;

use crate::grid::{Grid, GridError};

/// Ordered snake segments, head first.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Snake {
    segments: VecDeque<CellCoord>,
    direction: Option<Direction>,
}

/// Result of attempting to advance the snake by one cell.
///
/// When any collision flag is set the snake and grid are left untouched.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AdvanceOutcome {
    /// Cell the head moved into, or `None` when it would have left the grid.
    pub new_head: Option<CellCoord>,
    /// Food consumed by the move.
    pub ate: Option<FoodKind>,
    /// The head would have left the grid.
    pub wall_collision: bool,
    /// The head would have entered an obstacle.
    pub obstacle_collision: bool,
    /// The head would have entered a body segment that stays put this tick.
    pub self_collision: bool,
}

impl AdvanceOutcome {
    /// Reports whether the move ended the session.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        self.wall_collision || self.obstacle_collision || self.self_collision
    }

    fn blocked(new_head: Option<CellCoord>) -> Self {
        Self {
            new_head,
            ate: None,
            wall_collision: false,
            obstacle_collision: false,
            self_collision: false,
        }
    }
}

impl Snake {
    /// Lays out a fresh snake on the grid center with the body trailing left.
    #[must_use]
    pub fn spawn(config: &SnakeConfig, columns: u32, rows: u32) -> Self {
        Self {
            segments: config.spawn_cells(columns, rows).into(),
            direction: None,
        }
    }

    /// Builds a snake from explicit segments ordered head first.
    ///
    /// Segments must be non-empty, pairwise distinct and unit distance apart.
    pub fn from_segments(segments: Vec<CellCoord>) -> Result<Self, SnakeError> {
        if segments.is_empty() {
            return Err(SnakeError::Empty);
        }
        for (index, pair) in segments.windows(2).enumerate() {
            if pair[0].manhattan_distance(pair[1]) != 1 {
                return Err(SnakeError::Disjoint { index: index + 1 });
            }
        }
        for (index, cell) in segments.iter().enumerate() {
            if segments[..index].contains(cell) {
                return Err(SnakeError::Overlapping { cell: *cell });
            }
        }

        Ok(Self {
            segments: segments.into(),
            direction: None,
        })
    }

    /// Cell occupied by the head.
    #[must_use]
    pub fn head(&self) -> Option<CellCoord> {
        self.segments.front().copied()
    }

    /// Number of segments.
    #[must_use]
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// Reports whether the snake has no segments.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Iterates over the segments head first.
    pub fn segments(&self) -> impl Iterator<Item = CellCoord> + '_ {
        self.segments.iter().copied()
    }

    /// Direction applied on the most recent successful move.
    #[must_use]
    pub const fn direction(&self) -> Option<Direction> {
        self.direction
    }

    /// Direction the head faces.
    ///
    /// Before the first move this is the direction pointing away from the
    /// neck, so a stationary snake still refuses to turn back on itself.
    #[must_use]
    pub fn facing(&self) -> Option<Direction> {
        self.direction.or_else(|| {
            let head = self.segments.front().copied()?;
            let neck = self.segments.get(1).copied()?;
            Direction::between(neck, head)
        })
    }

    /// Reports whether the cell is occupied by a segment other than the head.
    #[must_use]
    pub fn is_body(&self, cell: CellCoord) -> bool {
        self.segments.iter().skip(1).any(|segment| *segment == cell)
    }

    /// Marks every segment on the grid.
    pub fn paint(&self, grid: &mut Grid) -> Result<(), GridError> {
        for (index, cell) in self.segments.iter().enumerate() {
            let kind = if index == 0 {
                CellKind::SnakeHead
            } else {
                CellKind::SnakeBody
            };
            grid.set_cell(*cell, kind)?;
        }
        Ok(())
    }

    /// Advances the head one cell in `direction`, keeping the grid in sync.
    ///
    /// The tail cell is a legal destination because the tail vacates it on
    /// the same tick; it can never hold food, so the snake never grows into it.
    pub fn advance(&mut self, direction: Direction, grid: &mut Grid) -> AdvanceOutcome {
        let Some(head) = self.head() else {
            return AdvanceOutcome::blocked(None);
        };

        let (column, row) = head.translated_by(direction.delta());
        let Some(new_head) = CellCoord::from_signed(column, row, grid.columns(), grid.rows())
        else {
            return AdvanceOutcome {
                wall_collision: true,
                ..AdvanceOutcome::blocked(None)
            };
        };

        let ate = match grid.cell_at(new_head) {
            Some(CellKind::Obstacle) => {
                return AdvanceOutcome {
                    obstacle_collision: true,
                    ..AdvanceOutcome::blocked(Some(new_head))
                };
            }
            Some(CellKind::Food) => Some(FoodKind::Regular),
            Some(CellKind::SpecialFood) => Some(FoodKind::Special),
            _ => None,
        };

        let stays_put = self.segments.len() - 1;
        if self
            .segments
            .iter()
            .take(stays_put)
            .any(|segment| *segment == new_head)
        {
            return AdvanceOutcome {
                self_collision: true,
                ..AdvanceOutcome::blocked(Some(new_head))
            };
        }

        let _ = grid.set_cell(head, CellKind::SnakeBody);
        if ate.is_none() {
            if let Some(tail) = self.segments.pop_back() {
                let _ = grid.set_cell(tail, CellKind::Empty);
            }
        }
        let _ = grid.set_cell(new_head, CellKind::SnakeHead);
        self.segments.push_front(new_head);
        self.direction = Some(direction);

        AdvanceOutcome {
            ate,
            ..AdvanceOutcome::blocked(Some(new_head))
        }
    }

    /// Removes up to `count` trailing segments, never removing the head.
    ///
    /// Returns the number of segments removed.
    pub fn truncate_tail(&mut self, count: usize, grid: &mut Grid) -> usize {
        let removable = count.min(self.segments.len().saturating_sub(1));
        for _ in 0..removable {
            if let Some(tail) = self.segments.pop_back() {
                let _ = grid.set_cell(tail, CellKind::Empty);
            }
        }
        removable
    }
}

/// Reasons explicit segments cannot form a snake.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum SnakeError {
    /// No segments were provided.
    #[error("a snake needs at least one segment")]
    Empty,
    /// A segment is not adjacent to its predecessor.
    #[error("segment {index} is not adjacent to the segment before it")]
    Disjoint {
        /// Position of the offending segment.
        index: usize,
    },
    /// A cell appears more than once.
    #[error("cell {cell} is occupied by more than one segment")]
    Overlapping {
        /// Cell that repeats.
        cell: CellCoord,
    },
}

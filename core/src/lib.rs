#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Snake Arcade engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Adapters submit [`Command`] values
//! describing desired mutations, the world executes those commands via its
//! `apply` entry point, and then broadcasts [`Event`] values for systems to
//! react to deterministically. Systems consume event streams, query immutable
//! views, and respond exclusively with new command batches.

mod config;
mod stats;

use std::{fmt, time::Duration};

use glam::Vec2;
use serde::{Deserialize, Serialize};

pub use config::{
    BossConfig, ConfigError, EnemyConfig, GameConfig, GridConfig, PacingConfig, ScoringConfig,
    SnakeConfig, SpecialFoodConfig, TimerPolicy,
};
pub use stats::StatsRecord;

/// Canonical banner emitted when the experience boots.
pub const WELCOME_BANNER: &str = "Welcome to Snake Arcade.";

/// Lifecycle of a play session.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SessionState {
    /// Title screen shown before the first session and after returning to it.
    #[default]
    StartScreen,
    /// Simulation advances on every logical tick.
    Playing,
    /// Simulation is suspended until resumed.
    Paused,
    /// Session ended; only restart or returning to the title are accepted.
    GameOver,
}

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    /// Seeds the persisted high score loaded by the host at startup.
    SeedHighScore {
        /// High score recovered from storage.
        score: u32,
    },
    /// Starts a fresh session from the title screen or after a game over.
    StartSession,
    /// Suspends a running session.
    PauseSession,
    /// Resumes a paused session.
    ResumeSession,
    /// Starts a fresh session after a game over.
    RestartSession,
    /// Leaves a paused or finished session for the title screen.
    ReturnToTitle,
    /// Requests that the snake turn on its next logical tick.
    RequestDirection {
        /// Direction the player asked for.
        direction: Direction,
    },
    /// Toggles the boost that shortens the tick interval.
    SetBoost {
        /// Whether boost is held.
        active: bool,
    },
    /// Advances the simulation clock by the provided frame delta.
    Tick {
        /// Duration of real time that elapsed since the previous frame.
        dt: Duration,
    },
    /// Places regular food on the provided cell.
    PlaceFood {
        /// Cell that receives the food.
        cell: CellCoord,
    },
    /// Places special food on the provided cell.
    PlaceSpecialFood {
        /// Cell that receives the special food.
        cell: CellCoord,
        /// Effect applied when the special food is eaten.
        effect: SpecialEffect,
    },
    /// Spawns a regular enemy just outside the provided edge.
    SpawnEnemy {
        /// Grid edge the enemy appears on.
        edge: Edge,
        /// Position along the edge measured in cells.
        offset: u32,
        /// Movement pattern followed by the enemy.
        pattern: EnemyPattern,
    },
    /// Spawns the boss above the north edge.
    SpawnBoss,
    /// Replaces the current session with a persisted checkpoint.
    RestoreSession {
        /// Checkpoint to resume from.
        save: SessionSave,
    },
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// A fresh session started.
    SessionStarted {
        /// Length of the newly spawned snake.
        length: u32,
    },
    /// The session was paused.
    SessionPaused,
    /// The session was resumed.
    SessionResumed,
    /// The world returned to the title screen.
    ReturnedToTitle,
    /// A persisted checkpoint replaced the current session.
    SessionRestored {
        /// Score carried by the checkpoint.
        score: u32,
        /// Level carried by the checkpoint.
        level: u32,
        /// Length of the restored snake.
        length: u32,
    },
    /// A checkpoint was rejected because it does not fit the configured world.
    RestoreRejected {
        /// Reason the checkpoint was rejected.
        reason: RestoreError,
    },
    /// A direction request was accepted for the next logical tick.
    DirectionQueued {
        /// Direction that will be applied.
        direction: Direction,
    },
    /// Boost was engaged or released.
    BoostChanged {
        /// Whether boost is now held.
        active: bool,
    },
    /// The simulation clock advanced.
    TimeAdvanced {
        /// Duration of simulated time that elapsed.
        dt: Duration,
    },
    /// The snake moved one cell.
    SnakeAdvanced {
        /// Cell now occupied by the head.
        head: CellCoord,
        /// Length of the snake after moving.
        length: u32,
    },
    /// Regular food was placed.
    FoodPlaced {
        /// Cell holding the food.
        cell: CellCoord,
    },
    /// Special food was placed.
    SpecialFoodPlaced {
        /// Cell holding the special food.
        cell: CellCoord,
        /// Effect applied when eaten.
        effect: SpecialEffect,
        /// Simulation time at which the special food disappears.
        expires_at: Duration,
    },
    /// A placement command targeted a cell that cannot hold food.
    PlacementRejected {
        /// Cell named by the rejected command.
        cell: CellCoord,
    },
    /// Regular food was eaten.
    FoodEaten {
        /// Cell the food occupied.
        cell: CellCoord,
        /// Points awarded.
        points: u32,
        /// Score after awarding the points.
        score: u32,
    },
    /// Special food was eaten.
    SpecialFoodEaten {
        /// Cell the special food occupied.
        cell: CellCoord,
        /// Effect applied.
        effect: SpecialEffect,
        /// Points awarded.
        points: u32,
        /// Score after awarding the points.
        score: u32,
    },
    /// Special food expired without being eaten.
    SpecialFoodExpired {
        /// Cell the special food occupied.
        cell: CellCoord,
    },
    /// The session reached a new level.
    LevelUp {
        /// Level reached.
        level: u32,
    },
    /// A timed status was granted to the snake.
    StatusGranted {
        /// Status granted.
        status: StatusEffect,
        /// Simulation time at which the status lapses.
        until: Duration,
    },
    /// A timed status lapsed.
    StatusExpired {
        /// Status that lapsed.
        status: StatusEffect,
    },
    /// An enemy entered the arena.
    EnemySpawned {
        /// Identifier allocated to the enemy.
        enemy: EnemyId,
        /// Edge the enemy appeared on.
        edge: Edge,
        /// Movement pattern followed by the enemy.
        pattern: EnemyPattern,
    },
    /// Regular enemies and their projectiles were removed.
    EnemiesCleared {
        /// Number of enemies removed.
        count: u32,
    },
    /// An enemy fired a projectile.
    ProjectileFired {
        /// Identifier allocated to the projectile.
        projectile: ProjectileId,
        /// Enemy that fired.
        owner: EnemyId,
        /// Launch position in cell units.
        position: Vec2,
    },
    /// A projectile struck the snake while the shield was active.
    ProjectileAbsorbed {
        /// Projectile that was absorbed.
        projectile: ProjectileId,
    },
    /// A projectile struck the body and removed trailing segments.
    CollisionDamage {
        /// Segments removed from the tail.
        segments_lost: u32,
        /// Length of the snake after truncation.
        length: u32,
    },
    /// The boss entered the arena.
    BossSpawned {
        /// Identifier allocated to the boss.
        enemy: EnemyId,
        /// Hits required to defeat it.
        health: u32,
    },
    /// The boss took a hit.
    BossDamaged {
        /// Remaining hits required.
        health: u32,
    },
    /// The boss was defeated.
    BossDefeated {
        /// Bonus points awarded.
        bonus: u32,
    },
    /// The session ended.
    GameOver {
        /// Cause of the game over.
        reason: DeathReason,
        /// Final score.
        score: u32,
        /// Final level.
        level: u32,
        /// Final snake length.
        length: u32,
        /// Whether the score beat the previous high score.
        new_high_score: bool,
    },
    /// Lifetime statistics changed.
    StatisticsUpdated {
        /// Updated statistics.
        record: StatsRecord,
    },
}

impl Event {
    /// Sound cue hosts should play in response to the event, if any.
    #[must_use]
    pub const fn cue(&self) -> Option<&'static str> {
        match self {
            Self::SessionStarted { .. } | Self::SessionRestored { .. } => Some("button"),
            Self::SessionPaused => Some("pause"),
            Self::SessionResumed => Some("resume"),
            Self::ReturnedToTitle => Some("menu"),
            Self::DirectionQueued { .. } => Some("move"),
            Self::FoodEaten { .. } => Some("eat"),
            Self::SpecialFoodEaten { .. } => Some("powerup"),
            Self::BossDefeated { .. } => Some("bossDefeated"),
            Self::LevelUp { .. } => Some("levelUp"),
            Self::CollisionDamage { .. }
            | Self::ProjectileAbsorbed { .. }
            | Self::BossDamaged { .. } => Some("hit"),
            Self::GameOver { .. } => Some("gameOver"),
            _ => None,
        }
    }
}

/// Cardinal movement directions available to the snake.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Movement toward decreasing row indices.
    Up,
    /// Movement toward increasing row indices.
    Down,
    /// Movement toward decreasing column indices.
    Left,
    /// Movement toward increasing column indices.
    Right,
}

impl Direction {
    /// Every direction in a fixed order.
    pub const ALL: [Direction; 4] = [Self::Up, Self::Down, Self::Left, Self::Right];

    /// Direction pointing the opposite way.
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::Up => Self::Down,
            Self::Down => Self::Up,
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }

    /// Reports whether `other` is the exact reverse of this direction.
    #[must_use]
    pub fn is_opposite(self, other: Direction) -> bool {
        self.opposite() == other
    }

    /// Column and row offsets of a single step.
    #[must_use]
    pub const fn delta(self) -> (i64, i64) {
        match self {
            Self::Up => (0, -1),
            Self::Down => (0, 1),
            Self::Left => (-1, 0),
            Self::Right => (1, 0),
        }
    }

    /// Direction of the unit step from `from` to `to`, if they are adjacent.
    #[must_use]
    pub fn between(from: CellCoord, to: CellCoord) -> Option<Self> {
        let target = to.translated_by((0, 0));
        Self::ALL
            .into_iter()
            .find(|direction| from.translated_by(direction.delta()) == target)
    }
}

/// Location of a single grid cell expressed as column and row coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellCoord {
    column: u32,
    row: u32,
}

impl CellCoord {
    /// Creates a new grid cell coordinate.
    #[must_use]
    pub const fn new(column: u32, row: u32) -> Self {
        Self { column, row }
    }

    /// Zero-based column index of the cell.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }

    /// Zero-based row index of the cell.
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }

    /// Computes the Manhattan distance between two cell coordinates.
    #[must_use]
    pub fn manhattan_distance(self, other: CellCoord) -> u32 {
        self.column().abs_diff(other.column()) + self.row().abs_diff(other.row())
    }

    /// Signed coordinates reached by adding `offset`, which may leave the grid.
    #[must_use]
    pub fn translated_by(self, offset: (i64, i64)) -> (i64, i64) {
        (
            i64::from(self.column) + offset.0,
            i64::from(self.row) + offset.1,
        )
    }

    /// Neighbouring cell in `direction`, or `None` when it leaves a
    /// `columns × rows` grid.
    #[must_use]
    pub fn step(self, direction: Direction, columns: u32, rows: u32) -> Option<CellCoord> {
        let (column, row) = self.translated_by(direction.delta());
        Self::from_signed(column, row, columns, rows)
    }

    /// Converts signed coordinates into a cell when they lie inside the grid.
    #[must_use]
    pub fn from_signed(column: i64, row: i64, columns: u32, rows: u32) -> Option<CellCoord> {
        let column = u32::try_from(column).ok()?;
        let row = u32::try_from(row).ok()?;
        (column < columns && row < rows).then_some(Self::new(column, row))
    }

    /// Center of the cell in continuous cell units.
    #[must_use]
    pub fn center(self) -> Vec2 {
        Vec2::new(self.column as f32 + 0.5, self.row as f32 + 0.5)
    }
}

impl fmt::Display for CellCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.column, self.row)
    }
}

/// Contents of a single grid cell.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CellKind {
    /// Nothing occupies the cell.
    #[default]
    Empty,
    /// The snake's head.
    SnakeHead,
    /// Any snake segment other than the head.
    SnakeBody,
    /// Regular food.
    Food,
    /// Special food.
    SpecialFood,
    /// Static obstacle.
    Obstacle,
}

/// Kind of food consumed by the snake.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FoodKind {
    /// Regular food.
    Regular,
    /// Special food carrying an effect.
    Special,
}

/// Effect applied when special food is eaten.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SpecialEffect {
    /// Awards the special food points and nothing else.
    Bonus,
    /// Removes every regular enemy and its projectiles.
    ClearEnemies,
    /// Deals one hit to the boss.
    DamageBoss,
    /// Grants a timed shield against projectiles.
    Shield,
}

/// Timed statuses the snake can carry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StatusEffect {
    /// Projectile hits are absorbed without damage.
    Shield,
}

/// Edge of the grid an enemy is attached to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Edge {
    /// Above row zero.
    North,
    /// Right of the last column.
    East,
    /// Below the last row.
    South,
    /// Left of column zero.
    West,
}

impl Edge {
    /// Every edge in a fixed order.
    pub const ALL: [Edge; 4] = [Self::North, Self::East, Self::South, Self::West];

    /// Edge across the grid.
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::North => Self::South,
            Self::East => Self::West,
            Self::South => Self::North,
            Self::West => Self::East,
        }
    }

    /// Number of cells running along the edge.
    #[must_use]
    pub const fn length(self, columns: u32, rows: u32) -> u32 {
        match self {
            Self::North | Self::South => columns,
            Self::East | Self::West => rows,
        }
    }
}

/// Movement pattern followed by an enemy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EnemyPattern {
    /// Holds its spawn position.
    Stationary,
    /// Sweeps back and forth along its edge.
    Oscillating,
    /// Periodically jumps to the opposite edge.
    Teleporting,
}

impl EnemyPattern {
    /// Every pattern in a fixed order.
    pub const ALL: [EnemyPattern; 3] = [Self::Stationary, Self::Oscillating, Self::Teleporting];
}

/// Distinguishes regular enemies from the boss.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EnemyKind {
    /// Regular enemy.
    Drone,
    /// Boss enemy with health.
    Boss,
}

/// Cause of a game over.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DeathReason {
    /// The head left the grid.
    Wall,
    /// The head ran into the body.
    SelfCollision,
    /// The head ran into an obstacle.
    Obstacle,
    /// A projectile struck the head.
    Projectile,
    /// A projectile would have cut the snake below its minimum length.
    Truncated,
}

/// Reasons a [`SessionSave`] cannot be restored.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RestoreError {
    /// The checkpoint was taken on a grid of different dimensions.
    GridMismatch,
    /// The snake is too short, disjoint, self-overlapping or off the grid.
    InvalidSnake,
    /// The snake or food overlaps an obstacle or the food overlaps the snake.
    Overlap,
}

/// Unique identifier assigned to an enemy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EnemyId(u32);

impl EnemyId {
    /// Creates a new enemy identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Unique identifier assigned to a projectile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ProjectileId(u32);

impl ProjectileId {
    /// Creates a new projectile identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Resumable checkpoint of a session in progress.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSave {
    /// Columns of the grid the checkpoint was taken on.
    pub columns: u32,
    /// Rows of the grid the checkpoint was taken on.
    pub rows: u32,
    /// Score at the time of the checkpoint.
    pub score: u32,
    /// Level at the time of the checkpoint.
    pub level: u32,
    /// Snake segments, head first.
    pub snake: Vec<CellCoord>,
    /// Regular food cell, if food was on the grid.
    pub food: Option<CellCoord>,
}

/// Read-only view into the dense cell grid.
#[derive(Clone, Copy, Debug)]
pub struct GridView<'a> {
    cells: &'a [CellKind],
    columns: u32,
    rows: u32,
}

impl<'a> GridView<'a> {
    /// Captures a new grid view backed by the provided row-major cell slice.
    #[must_use]
    pub fn new(cells: &'a [CellKind], columns: u32, rows: u32) -> Self {
        Self {
            cells,
            columns,
            rows,
        }
    }

    /// Returns the contents of the provided cell, or `None` outside the grid.
    #[must_use]
    pub fn cell_at(&self, cell: CellCoord) -> Option<CellKind> {
        self.index(cell)
            .and_then(|index| self.cells.get(index).copied())
    }

    /// Reports whether the cell lies inside the grid and holds nothing.
    #[must_use]
    pub fn is_empty(&self, cell: CellCoord) -> bool {
        self.cell_at(cell) == Some(CellKind::Empty)
    }

    /// Iterates over every empty cell in row-major order.
    pub fn empty_cells(&self) -> impl Iterator<Item = CellCoord> + 'a {
        let columns = self.columns.max(1);
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, kind)| **kind == CellKind::Empty)
            .filter_map(move |(index, _)| {
                let index = u32::try_from(index).ok()?;
                Some(CellCoord::new(index % columns, index / columns))
            })
    }

    /// Provides the dimensions of the underlying grid.
    #[must_use]
    pub const fn dimensions(&self) -> (u32, u32) {
        (self.columns, self.rows)
    }

    fn index(&self, cell: CellCoord) -> Option<usize> {
        if cell.column() < self.columns && cell.row() < self.rows {
            let row = usize::try_from(cell.row()).ok()?;
            let column = usize::try_from(cell.column()).ok()?;
            let width = usize::try_from(self.columns).ok()?;
            Some(row * width + column)
        } else {
            None
        }
    }
}

/// Occupant counts systems consult before requesting spawns.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PopulationView {
    /// Current level.
    pub level: u32,
    /// Whether regular food is on the grid.
    pub food_present: bool,
    /// Whether special food is on the grid.
    pub special_food_present: bool,
    /// Number of regular enemies alive.
    pub enemy_count: u32,
    /// Whether the boss is alive.
    pub boss_present: bool,
}

/// Immutable representation of the snake used for queries.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SnakeSnapshot {
    /// Segments ordered head first.
    pub segments: Vec<CellCoord>,
    /// Direction applied on the most recent logical tick.
    pub direction: Option<Direction>,
    /// Direction waiting to be applied on the next logical tick.
    pub queued: Option<Direction>,
}

impl SnakeSnapshot {
    /// Cell occupied by the head, if the snake exists.
    #[must_use]
    pub fn head(&self) -> Option<CellCoord> {
        self.segments.first().copied()
    }
}

/// Immutable representation of regular food.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FoodSnapshot {
    /// Cell holding the food.
    pub cell: CellCoord,
    /// Points awarded when eaten.
    pub points: u32,
}

/// Immutable representation of special food.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SpecialFoodSnapshot {
    /// Cell holding the special food.
    pub cell: CellCoord,
    /// Points awarded when eaten.
    pub points: u32,
    /// Effect applied when eaten.
    pub effect: SpecialEffect,
    /// Simulation time at which it disappears.
    pub expires_at: Duration,
}

/// Immutable representation of an enemy.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EnemySnapshot {
    /// Identifier allocated to the enemy.
    pub id: EnemyId,
    /// Regular enemy or boss.
    pub kind: EnemyKind,
    /// Movement pattern.
    pub pattern: EnemyPattern,
    /// Edge the enemy is attached to.
    pub edge: Edge,
    /// Position in continuous cell units.
    pub position: Vec2,
    /// Unit vector projectiles are fired along.
    pub aim: Vec2,
    /// Remaining hits; always one for regular enemies.
    pub health: u32,
    /// Simulation time of the next shot.
    pub next_fire_at: Duration,
}

/// Immutable representation of a projectile.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ProjectileSnapshot {
    /// Identifier allocated to the projectile.
    pub id: ProjectileId,
    /// Enemy that fired the projectile.
    pub owner: EnemyId,
    /// Position in continuous cell units.
    pub position: Vec2,
    /// Travel per logical tick in cell units.
    pub velocity: Vec2,
}

/// Immutable representation of a timed status.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StatusSnapshot {
    /// Status carried by the snake.
    pub status: StatusEffect,
    /// Simulation time at which it lapses.
    pub until: Duration,
}

/// Read-only snapshot of everything a renderer needs for one frame.
#[derive(Clone, Debug, PartialEq)]
pub struct WorldSnapshot {
    /// Session lifecycle state.
    pub state: SessionState,
    /// Grid columns.
    pub columns: u32,
    /// Grid rows.
    pub rows: u32,
    /// Snake segments and heading.
    pub snake: SnakeSnapshot,
    /// Regular food, if present.
    pub food: Option<FoodSnapshot>,
    /// Special food, if present.
    pub special_food: Option<SpecialFoodSnapshot>,
    /// Static obstacles.
    pub obstacles: Vec<CellCoord>,
    /// Enemies ordered by identifier.
    pub enemies: Vec<EnemySnapshot>,
    /// Projectiles ordered by identifier.
    pub projectiles: Vec<ProjectileSnapshot>,
    /// Active timed statuses.
    pub statuses: Vec<StatusSnapshot>,
    /// Current score.
    pub score: u32,
    /// Current level.
    pub level: u32,
    /// Best score known to the world.
    pub high_score: u32,
    /// Whether boost is held.
    pub boosted: bool,
    /// Current logical tick interval.
    pub tick_interval: Duration,
    /// Simulation time elapsed in the session.
    pub elapsed: Duration,
    /// Logical ticks executed in the session.
    pub steps: u64,
}

impl WorldSnapshot {
    /// Reports whether the provided status is active.
    #[must_use]
    pub fn has_status(&self, status: StatusEffect) -> bool {
        self.statuses.iter().any(|active| active.status == status)
    }
}

#[cfg(test)]
mod tests {
    use super::{CellCoord, Direction, Event, SessionSave, SpecialEffect};
    use serde::{de::DeserializeOwned, Serialize};

    #[test]
    fn manhattan_distance_matches_expectation() {
        let origin = CellCoord::new(1, 1);
        let destination = CellCoord::new(4, 3);
        assert_eq!(origin.manhattan_distance(destination), 5);
        assert_eq!(destination.manhattan_distance(origin), 5);
    }

    #[test]
    fn step_stays_inside_grid() {
        let corner = CellCoord::new(0, 0);
        assert_eq!(corner.step(Direction::Up, 4, 4), None);
        assert_eq!(corner.step(Direction::Left, 4, 4), None);
        assert_eq!(
            corner.step(Direction::Right, 4, 4),
            Some(CellCoord::new(1, 0))
        );
        assert_eq!(CellCoord::new(3, 3).step(Direction::Down, 4, 4), None);
    }

    #[test]
    fn direction_between_adjacent_cells() {
        let origin = CellCoord::new(5, 5);
        assert_eq!(
            Direction::between(origin, CellCoord::new(6, 5)),
            Some(Direction::Right)
        );
        assert_eq!(
            Direction::between(origin, CellCoord::new(5, 4)),
            Some(Direction::Up)
        );
        assert_eq!(Direction::between(origin, CellCoord::new(7, 5)), None);
        assert_eq!(Direction::between(origin, origin), None);
    }

    #[test]
    fn opposites_pair_up() {
        for direction in Direction::ALL {
            assert!(direction.is_opposite(direction.opposite()));
            assert!(!direction.is_opposite(direction));
        }
    }

    #[test]
    fn cues_follow_gameplay_events() {
        assert_eq!(
            Event::FoodEaten {
                cell: CellCoord::new(1, 1),
                points: 1,
                score: 1
            }
            .cue(),
            Some("eat")
        );
        assert_eq!(Event::SessionPaused.cue(), Some("pause"));
        assert_eq!(
            Event::TimeAdvanced {
                dt: std::time::Duration::from_millis(16)
            }
            .cue(),
            None
        );
    }

    fn assert_round_trip<T>(value: &T)
    where
        T: Serialize + DeserializeOwned + PartialEq + std::fmt::Debug,
    {
        let bytes = bincode::serialize(value).expect("serialize");
        let restored: T = bincode::deserialize(&bytes).expect("deserialize");
        assert_eq!(&restored, value);
    }

    #[test]
    fn session_save_round_trips_through_bincode() {
        let save = SessionSave {
            columns: 16,
            rows: 16,
            score: 12,
            level: 3,
            snake: vec![CellCoord::new(4, 4), CellCoord::new(3, 4)],
            food: Some(CellCoord::new(9, 2)),
        };
        assert_round_trip(&save);
    }

    #[test]
    fn special_effect_round_trips_through_bincode() {
        assert_round_trip(&SpecialEffect::DamageBoss);
    }
}

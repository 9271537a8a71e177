use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::CellCoord;

/// Complete set of tunables consumed by the world and its systems.
///
/// Every section falls back to its defaults when omitted, so partial TOML
/// documents describe only the values they override.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Playfield dimensions and static obstacles.
    pub grid: GridConfig,
    /// Snake sizing rules.
    pub snake: SnakeConfig,
    /// Tick cadence and pause behaviour.
    pub pacing: PacingConfig,
    /// Point values and level thresholds.
    pub scoring: ScoringConfig,
    /// Special food odds, lifetime and effect durations.
    pub special_food: SpecialFoodConfig,
    /// Regular enemy behaviour.
    pub enemies: EnemyConfig,
    /// Boss encounter behaviour.
    pub boss: BossConfig,
    /// Seed that drives every random choice made by the spawning system.
    pub seed: u64,
}

impl GameConfig {
    /// Verifies that the configuration describes a playable session.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let GridConfig {
            columns,
            rows,
            ref obstacles,
        } = self.grid;
        if columns < MIN_GRID_EXTENT || rows < MIN_GRID_EXTENT {
            return Err(ConfigError::GridTooSmall { columns, rows });
        }

        let initial_length = self.snake.initial_length;
        if initial_length == 0 || initial_length > columns / 2 + 1 {
            return Err(ConfigError::SnakeDoesNotFit {
                length: initial_length,
                columns,
            });
        }
        if self.snake.min_length == 0 || self.snake.min_length > initial_length {
            return Err(ConfigError::MinimumLength {
                min_length: self.snake.min_length,
                initial_length,
            });
        }

        let spawn_cells = self.snake.spawn_cells(columns, rows);
        for &cell in obstacles {
            if cell.column() >= columns || cell.row() >= rows {
                return Err(ConfigError::ObstacleOutOfBounds { cell });
            }
            if spawn_cells.contains(&cell) {
                return Err(ConfigError::ObstacleOnSnake { cell });
            }
        }

        let pacing = &self.pacing;
        if pacing.min_interval_ms == 0 || pacing.base_interval_ms < pacing.min_interval_ms {
            return Err(ConfigError::Pacing {
                base_ms: pacing.base_interval_ms,
                min_ms: pacing.min_interval_ms,
            });
        }
        if !pacing.boost_multiplier.is_finite() || pacing.boost_multiplier < 1.0 {
            return Err(ConfigError::BoostMultiplier(pacing.boost_multiplier));
        }

        if self.scoring.level_up_score == 0 {
            return Err(ConfigError::LevelUpScore);
        }
        if !(0.0..=1.0).contains(&self.special_food.chance) {
            return Err(ConfigError::SpecialFoodChance(self.special_food.chance));
        }
        if !self.enemies.projectile_speed.is_finite() || self.enemies.projectile_speed <= 0.0 {
            return Err(ConfigError::ProjectileSpeed(self.enemies.projectile_speed));
        }
        if self.boss.every_levels == 0 || self.boss.health == 0 {
            return Err(ConfigError::Boss);
        }

        Ok(())
    }
}

const MIN_GRID_EXTENT: u32 = 4;

/// Dimensions of the playfield and the cells permanently blocked by obstacles.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    /// Number of columns in the grid.
    pub columns: u32,
    /// Number of rows in the grid.
    pub rows: u32,
    /// Cells occupied by obstacles for the whole session.
    pub obstacles: Vec<CellCoord>,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            columns: 16,
            rows: 16,
            obstacles: Vec::new(),
        }
    }
}

/// Sizing rules applied to the snake.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SnakeConfig {
    /// Number of segments created when a session starts.
    pub initial_length: u32,
    /// Shortest length the snake may be truncated to before the session ends.
    pub min_length: u32,
}

impl SnakeConfig {
    /// Cells the snake occupies when a session starts, head first.
    ///
    /// The head sits on the grid center and the body trails to the left.
    #[must_use]
    pub fn spawn_cells(&self, columns: u32, rows: u32) -> Vec<CellCoord> {
        let head_column = columns / 2;
        let row = rows / 2;
        (0..self.initial_length)
            .filter_map(|offset| head_column.checked_sub(offset))
            .map(|column| CellCoord::new(column, row))
            .collect()
    }
}

impl Default for SnakeConfig {
    fn default() -> Self {
        Self {
            initial_length: 3,
            min_length: 2,
        }
    }
}

/// Controls how the simulation clock behaves while a session is paused.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimerPolicy {
    /// The simulation clock and every expiry timer stop while paused.
    #[default]
    FreezeWhilePaused,
    /// The simulation clock keeps running while paused, so timed items may
    /// expire, but no logical tick executes.
    RealTime,
}

/// Logical tick cadence.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PacingConfig {
    /// Tick interval at level one, in milliseconds.
    pub base_interval_ms: u64,
    /// Fastest permitted tick interval, in milliseconds.
    pub min_interval_ms: u64,
    /// Interval reduction applied per level gained, in milliseconds.
    pub step_down_ms: u64,
    /// Divisor applied to the interval while boost is held.
    pub boost_multiplier: f32,
    /// Clock behaviour while paused.
    pub timer_policy: TimerPolicy,
}

impl PacingConfig {
    /// Computes the logical tick interval for the provided level.
    ///
    /// The level reduction is applied first, then the boost divisor, and the
    /// result is clamped to the configured floor last so boosting never
    /// drops the interval below it.
    #[must_use]
    pub fn tick_interval(&self, level: u32, boosted: bool) -> Duration {
        let levels_gained = u64::from(level.saturating_sub(1));
        let reduced_ms = self
            .base_interval_ms
            .saturating_sub(levels_gained.saturating_mul(self.step_down_ms));
        let mut micros = reduced_ms.saturating_mul(1_000);
        if boosted && self.boost_multiplier > 1.0 {
            micros = (micros as f64 / f64::from(self.boost_multiplier)).round() as u64;
        }
        let floor = self.min_interval_ms.saturating_mul(1_000);
        Duration::from_micros(micros.max(floor))
    }
}

impl Default for PacingConfig {
    fn default() -> Self {
        Self {
            base_interval_ms: 200,
            min_interval_ms: 50,
            step_down_ms: 10,
            boost_multiplier: 2.0,
            timer_policy: TimerPolicy::FreezeWhilePaused,
        }
    }
}

/// Point values awarded during play.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    /// Points awarded for regular food.
    pub food_points: u32,
    /// Points awarded for special food.
    pub special_food_points: u32,
    /// Score span covered by a single level.
    pub level_up_score: u32,
    /// Points awarded for defeating a boss.
    pub boss_bonus: u32,
}

impl ScoringConfig {
    /// Level reached for the provided score.
    #[must_use]
    pub const fn level_for(&self, score: u32) -> u32 {
        if self.level_up_score == 0 {
            return 1;
        }
        1 + score / self.level_up_score
    }
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            food_points: 1,
            special_food_points: 3,
            level_up_score: 5,
            boss_bonus: 10,
        }
    }
}

/// Special food odds and timed effects.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpecialFoodConfig {
    /// Probability of spawning special food after regular food is eaten.
    pub chance: f64,
    /// Time special food stays on the grid before expiring, in milliseconds.
    pub lifetime_ms: u64,
    /// Optional fixed cadence that spawns special food regardless of the roll.
    pub interval_ms: Option<u64>,
    /// Duration of the shield granted by the shield effect, in milliseconds.
    pub shield_ms: u64,
}

impl SpecialFoodConfig {
    /// Lifetime of a placed special food item.
    #[must_use]
    pub const fn lifetime(&self) -> Duration {
        Duration::from_millis(self.lifetime_ms)
    }

    /// Duration of a granted shield.
    #[must_use]
    pub const fn shield_duration(&self) -> Duration {
        Duration::from_millis(self.shield_ms)
    }
}

impl Default for SpecialFoodConfig {
    fn default() -> Self {
        Self {
            chance: 0.1,
            lifetime_ms: 10_000,
            interval_ms: None,
            shield_ms: 5_000,
        }
    }
}

/// Regular enemy behaviour.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnemyConfig {
    /// Whether enemies spawn at all.
    pub enabled: bool,
    /// First level at which enemies spawn.
    pub start_level: u32,
    /// Maximum number of regular enemies alive at once.
    pub max_count: u32,
    /// Spawn cadence before any difficulty scaling, in milliseconds.
    pub spawn_interval_ms: u64,
    /// Cadence reduction per enemy spawned this session, in milliseconds.
    pub spawn_step_ms: u64,
    /// Fastest permitted spawn cadence, in milliseconds.
    pub min_spawn_interval_ms: u64,
    /// Delay between consecutive shots from a single enemy, in milliseconds.
    pub fire_interval_ms: u64,
    /// Projectile travel per logical tick, in cells.
    pub projectile_speed: f32,
    /// Trailing segments removed when a projectile strikes the body.
    pub truncate_segments: u32,
    /// Logical ticks between teleports for teleporting enemies.
    pub teleport_every: u32,
    /// Farthest an oscillating enemy strays from its anchor, in cells.
    pub oscillation_range: u32,
}

impl EnemyConfig {
    /// Spawn cadence after `difficulty` enemies have already spawned.
    #[must_use]
    pub fn spawn_interval(&self, difficulty: u32) -> Duration {
        let reduction = self.spawn_step_ms.saturating_mul(u64::from(difficulty));
        let interval = self
            .spawn_interval_ms
            .saturating_sub(reduction)
            .max(self.min_spawn_interval_ms);
        Duration::from_millis(interval)
    }

    /// Delay between shots.
    #[must_use]
    pub const fn fire_interval(&self) -> Duration {
        Duration::from_millis(self.fire_interval_ms)
    }
}

impl Default for EnemyConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            start_level: 2,
            max_count: 3,
            spawn_interval_ms: 8_000,
            spawn_step_ms: 500,
            min_spawn_interval_ms: 3_000,
            fire_interval_ms: 2_500,
            projectile_speed: 0.5,
            truncate_segments: 2,
            teleport_every: 12,
            oscillation_range: 3,
        }
    }
}

/// Boss encounter behaviour.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BossConfig {
    /// A boss appears on every level that is a multiple of this value.
    pub every_levels: u32,
    /// Hits required to defeat the boss.
    pub health: u32,
    /// Delay between boss shots, in milliseconds.
    pub fire_interval_ms: u64,
}

impl BossConfig {
    /// Delay between boss shots.
    #[must_use]
    pub const fn fire_interval(&self) -> Duration {
        Duration::from_millis(self.fire_interval_ms)
    }
}

impl Default for BossConfig {
    fn default() -> Self {
        Self {
            every_levels: 5,
            health: 3,
            fire_interval_ms: 1_500,
        }
    }
}

/// Reasons a [`GameConfig`] is rejected.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum ConfigError {
    /// The grid is smaller than the supported minimum.
    #[error("grid of {columns}x{rows} cells is too small (minimum is 4x4)")]
    GridTooSmall {
        /// Configured column count.
        columns: u32,
        /// Configured row count.
        rows: u32,
    },
    /// The initial snake does not fit between the grid center and the left edge.
    #[error("initial snake length {length} does not fit in {columns} columns")]
    SnakeDoesNotFit {
        /// Configured initial length.
        length: u32,
        /// Configured column count.
        columns: u32,
    },
    /// The minimum length is zero or exceeds the initial length.
    #[error("minimum length {min_length} must be between 1 and the initial length {initial_length}")]
    MinimumLength {
        /// Configured minimum length.
        min_length: u32,
        /// Configured initial length.
        initial_length: u32,
    },
    /// An obstacle lies outside the grid.
    #[error("obstacle at {cell} lies outside the grid")]
    ObstacleOutOfBounds {
        /// Offending obstacle cell.
        cell: CellCoord,
    },
    /// An obstacle overlaps the snake's starting position.
    #[error("obstacle at {cell} overlaps the starting snake")]
    ObstacleOnSnake {
        /// Offending obstacle cell.
        cell: CellCoord,
    },
    /// Tick intervals are zero or inverted.
    #[error("tick interval floor {min_ms}ms must be positive and not exceed the base {base_ms}ms")]
    Pacing {
        /// Configured base interval.
        base_ms: u64,
        /// Configured interval floor.
        min_ms: u64,
    },
    /// Boost multiplier is below one or not finite.
    #[error("boost multiplier {0} must be a finite value of at least 1.0")]
    BoostMultiplier(f32),
    /// Level span is zero.
    #[error("level_up_score must be positive")]
    LevelUpScore,
    /// Special food probability lies outside `0.0..=1.0`.
    #[error("special food chance {0} must lie within 0.0..=1.0")]
    SpecialFoodChance(f64),
    /// Projectile speed is not positive.
    #[error("projectile speed {0} must be a positive finite value")]
    ProjectileSpeed(f32),
    /// Boss cadence or health is zero.
    #[error("boss level cadence and health must both be positive")]
    Boss,
}

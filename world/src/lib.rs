#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state management for Snake Arcade.
//!
//! The world owns the grid, the snake, food, hostiles and the simulation
//! clock. It changes only through [`apply`], and reports every change as an
//! [`Event`] so systems and adapters can react without touching state.

mod clock;
pub mod grid;
mod hostiles;
mod resolution;
pub mod snake;

use std::time::Duration;

use snake_arcade_core::{
    CellCoord, CellKind, Command, ConfigError, DeathReason, Direction, Edge, EnemyKind,
    EnemyPattern, Event, GameConfig, RestoreError, SessionSave, SessionState, SpecialEffect,
    StatusEffect,
};
use tracing::{debug, info, warn};

use crate::{
    clock::Clock,
    grid::Grid,
    hostiles::{EnemySpec, Hostiles},
    snake::Snake,
};

#[derive(Clone, Copy, Debug)]
struct Food {
    cell: CellCoord,
    points: u32,
}

#[derive(Clone, Copy, Debug)]
struct SpecialFood {
    cell: CellCoord,
    points: u32,
    effect: SpecialEffect,
    expires_at: Duration,
}

#[derive(Clone, Copy, Debug)]
struct ActiveStatus {
    status: StatusEffect,
    until: Duration,
}

/// Represents the authoritative Snake Arcade world state.
#[derive(Debug)]
pub struct World {
    config: GameConfig,
    state: SessionState,
    grid: Grid,
    snake: Snake,
    queued: Option<Direction>,
    food: Option<Food>,
    special_food: Option<SpecialFood>,
    hostiles: Hostiles,
    statuses: Vec<ActiveStatus>,
    clock: Clock,
    score: u32,
    level: u32,
    high_score: u32,
    boosted: bool,
}

impl World {
    /// Creates a world on the title screen using the provided configuration.
    pub fn new(config: GameConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let (columns, rows) = (config.grid.columns, config.grid.rows);
        let mut world = Self {
            grid: Grid::new(columns, rows),
            snake: Snake::spawn(&config.snake, columns, rows),
            config,
            state: SessionState::StartScreen,
            queued: None,
            food: None,
            special_food: None,
            hostiles: Hostiles::default(),
            statuses: Vec::new(),
            clock: Clock::default(),
            score: 0,
            level: 1,
            high_score: 0,
            boosted: false,
        };
        world.reset_session();
        Ok(world)
    }

    fn reset_session(&mut self) {
        let snake = Snake::spawn(
            &self.config.snake,
            self.config.grid.columns,
            self.config.grid.rows,
        );
        self.rebuild(snake);
        self.food = None;
        self.special_food = None;
        self.hostiles.clear();
        self.statuses.clear();
        self.clock.reset();
        self.queued = None;
        self.score = 0;
        self.level = 1;
        self.boosted = false;
    }

    fn rebuild(&mut self, snake: Snake) {
        self.grid.clear();
        for &cell in &self.config.grid.obstacles {
            let _ = self.grid.set_cell(cell, CellKind::Obstacle);
        }
        self.snake = snake;
        if let Err(error) = self.snake.paint(&mut self.grid) {
            warn!(%error, "snake does not fit the grid");
        }
    }

    fn start_session(&mut self, out_events: &mut Vec<Event>) {
        self.reset_session();
        self.state = SessionState::Playing;
        info!(high_score = self.high_score, "session started");
        out_events.push(Event::SessionStarted {
            length: self.snake_length(),
        });
    }

    fn end_session(&mut self, reason: DeathReason, out_events: &mut Vec<Event>) {
        if self.state != SessionState::Playing {
            return;
        }
        self.state = SessionState::GameOver;
        self.boosted = false;
        let new_high_score = self.score > self.high_score;
        if new_high_score {
            self.high_score = self.score;
        }
        info!(?reason, score = self.score, level = self.level, "session ended");
        out_events.push(Event::GameOver {
            reason,
            score: self.score,
            level: self.level,
            length: self.snake_length(),
            new_high_score,
        });
    }

    fn snake_length(&self) -> u32 {
        u32::try_from(self.snake.len()).unwrap_or(u32::MAX)
    }

    fn tick_interval(&self) -> Duration {
        self.config.pacing.tick_interval(self.level, self.boosted)
    }

    fn is_shielded(&self) -> bool {
        self.statuses
            .iter()
            .any(|active| active.status == StatusEffect::Shield)
    }

    fn add_score(&mut self, points: u32) {
        self.score = self.score.saturating_add(points);
    }

    fn sync_level(&mut self, out_events: &mut Vec<Event>) {
        let target = self.config.scoring.level_for(self.score);
        while self.level < target {
            self.level += 1;
            info!(level = self.level, "level up");
            out_events.push(Event::LevelUp { level: self.level });
        }
    }

    fn request_direction(&mut self, direction: Direction, out_events: &mut Vec<Event>) {
        match self.state {
            SessionState::StartScreen => self.start_session(out_events),
            SessionState::Playing => {}
            SessionState::Paused | SessionState::GameOver => return,
        }

        if self
            .snake
            .facing()
            .is_some_and(|facing| facing.is_opposite(direction))
        {
            debug!(?direction, "reverse direction ignored");
            return;
        }
        if self.queued == Some(direction) {
            return;
        }
        self.queued = Some(direction);
        out_events.push(Event::DirectionQueued { direction });
    }

    fn place_food(&mut self, cell: CellCoord, out_events: &mut Vec<Event>) {
        if self.state != SessionState::Playing
            || self.food.is_some()
            || self.grid.cell_at(cell) != Some(CellKind::Empty)
        {
            debug!(%cell, "food placement rejected");
            out_events.push(Event::PlacementRejected { cell });
            return;
        }
        let _ = self.grid.set_cell(cell, CellKind::Food);
        self.food = Some(Food {
            cell,
            points: self.config.scoring.food_points,
        });
        out_events.push(Event::FoodPlaced { cell });
    }

    fn place_special_food(
        &mut self,
        cell: CellCoord,
        effect: SpecialEffect,
        out_events: &mut Vec<Event>,
    ) {
        if self.state != SessionState::Playing
            || self.special_food.is_some()
            || self.grid.cell_at(cell) != Some(CellKind::Empty)
        {
            debug!(%cell, "special food placement rejected");
            out_events.push(Event::PlacementRejected { cell });
            return;
        }
        let expires_at = self
            .clock
            .elapsed()
            .saturating_add(self.config.special_food.lifetime());
        let _ = self.grid.set_cell(cell, CellKind::SpecialFood);
        self.special_food = Some(SpecialFood {
            cell,
            points: self.config.scoring.special_food_points,
            effect,
            expires_at,
        });
        out_events.push(Event::SpecialFoodPlaced {
            cell,
            effect,
            expires_at,
        });
    }

    fn spawn_enemy(
        &mut self,
        edge: Edge,
        offset: u32,
        pattern: EnemyPattern,
        out_events: &mut Vec<Event>,
    ) {
        let enemies = self.config.enemies;
        let (columns, rows) = (self.grid.columns(), self.grid.rows());
        if self.state != SessionState::Playing
            || !enemies.enabled
            || self.level < enemies.start_level
            || self.hostiles.drone_count() >= enemies.max_count
            || offset >= edge.length(columns, rows)
        {
            debug!(?edge, offset, "enemy spawn ignored");
            return;
        }
        let spec = EnemySpec {
            kind: EnemyKind::Drone,
            pattern,
            edge,
            offset,
            health: 1,
            fire_interval: enemies.fire_interval(),
        };
        let enemy = self
            .hostiles
            .spawn(spec, self.clock.elapsed(), columns, rows, &enemies);
        out_events.push(Event::EnemySpawned {
            enemy,
            edge,
            pattern,
        });
    }

    fn spawn_boss(&mut self, out_events: &mut Vec<Event>) {
        if self.state != SessionState::Playing || self.hostiles.has_boss() {
            debug!("boss spawn ignored");
            return;
        }
        let (columns, rows) = (self.grid.columns(), self.grid.rows());
        let boss = self.config.boss;
        let spec = EnemySpec {
            kind: EnemyKind::Boss,
            pattern: EnemyPattern::Oscillating,
            edge: Edge::North,
            offset: columns / 2,
            health: boss.health,
            fire_interval: boss.fire_interval(),
        };
        let enemy = self.hostiles.spawn(
            spec,
            self.clock.elapsed(),
            columns,
            rows,
            &self.config.enemies,
        );
        info!(health = boss.health, "boss spawned");
        out_events.push(Event::BossSpawned {
            enemy,
            health: boss.health,
        });
    }

    fn restore(&mut self, save: SessionSave, out_events: &mut Vec<Event>) {
        match self.validate_save(&save) {
            Ok(snake) => {
                self.reset_session();
                self.rebuild(snake);
                self.score = save.score;
                self.level = save.level.max(self.config.scoring.level_for(save.score));
                self.state = SessionState::Playing;
                if let Some(cell) = save.food {
                    let _ = self.grid.set_cell(cell, CellKind::Food);
                    self.food = Some(Food {
                        cell,
                        points: self.config.scoring.food_points,
                    });
                }
                info!(score = self.score, level = self.level, "session restored");
                out_events.push(Event::SessionRestored {
                    score: self.score,
                    level: self.level,
                    length: self.snake_length(),
                });
            }
            Err(reason) => {
                warn!(?reason, "saved session rejected");
                out_events.push(Event::RestoreRejected { reason });
            }
        }
    }

    fn validate_save(&self, save: &SessionSave) -> Result<Snake, RestoreError> {
        let (columns, rows) = (self.grid.columns(), self.grid.rows());
        if save.columns != columns || save.rows != rows {
            return Err(RestoreError::GridMismatch);
        }
        let min_length = usize::try_from(self.config.snake.min_length).unwrap_or(usize::MAX);
        if save.snake.len() < min_length {
            return Err(RestoreError::InvalidSnake);
        }
        let snake =
            Snake::from_segments(save.snake.clone()).map_err(|_| RestoreError::InvalidSnake)?;
        let in_bounds = |cell: &CellCoord| cell.column() < columns && cell.row() < rows;
        if !save.snake.iter().all(in_bounds) {
            return Err(RestoreError::InvalidSnake);
        }
        let obstacles = &self.config.grid.obstacles;
        if save.snake.iter().any(|cell| obstacles.contains(cell)) {
            return Err(RestoreError::Overlap);
        }
        if let Some(food) = save.food {
            if !in_bounds(&food) || obstacles.contains(&food) || save.snake.contains(&food) {
                return Err(RestoreError::Overlap);
            }
        }
        Ok(snake)
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::SeedHighScore { score } => {
            world.high_score = world.high_score.max(score);
        }
        Command::StartSession => {
            if matches!(
                world.state,
                SessionState::StartScreen | SessionState::GameOver
            ) {
                world.start_session(out_events);
            }
        }
        Command::RestartSession => {
            if world.state == SessionState::GameOver {
                world.start_session(out_events);
            }
        }
        Command::PauseSession => {
            if world.state == SessionState::Playing {
                world.state = SessionState::Paused;
                out_events.push(Event::SessionPaused);
            }
        }
        Command::ResumeSession => {
            if world.state == SessionState::Paused {
                world.state = SessionState::Playing;
                out_events.push(Event::SessionResumed);
            }
        }
        Command::ReturnToTitle => {
            if matches!(world.state, SessionState::Paused | SessionState::GameOver) {
                world.state = SessionState::StartScreen;
                world.boosted = false;
                out_events.push(Event::ReturnedToTitle);
            }
        }
        Command::RequestDirection { direction } => world.request_direction(direction, out_events),
        Command::SetBoost { active } => {
            if world.state == SessionState::Playing && world.boosted != active {
                world.boosted = active;
                out_events.push(Event::BoostChanged { active });
            }
        }
        Command::Tick { dt } => {
            let policy = world.config.pacing.timer_policy;
            if !world.clock.advance(dt, world.state, policy) {
                return;
            }
            out_events.push(Event::TimeAdvanced { dt });

            let interval = world.tick_interval();
            if world.state == SessionState::Playing && world.clock.take_step(interval) {
                resolution::run_step(world, out_events);
            } else {
                resolution::expire(world, out_events);
            }
        }
        Command::PlaceFood { cell } => world.place_food(cell, out_events),
        Command::PlaceSpecialFood { cell, effect } => {
            world.place_special_food(cell, effect, out_events);
        }
        Command::SpawnEnemy {
            edge,
            offset,
            pattern,
        } => world.spawn_enemy(edge, offset, pattern, out_events),
        Command::SpawnBoss => world.spawn_boss(out_events),
        Command::RestoreSession { save } => world.restore(save, out_events),
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use std::time::Duration;

    use super::World;
    use snake_arcade_core::{
        CellCoord, CellKind, FoodSnapshot, GameConfig, GridView, PopulationView, SessionSave,
        SessionState, SnakeSnapshot, SpecialFoodSnapshot, StatusSnapshot, WorldSnapshot,
    };

    /// Configuration the world was built with.
    #[must_use]
    pub fn config(world: &World) -> &GameConfig {
        &world.config
    }

    /// Current session state.
    #[must_use]
    pub fn state(world: &World) -> SessionState {
        world.state
    }

    /// Current score.
    #[must_use]
    pub fn score(world: &World) -> u32 {
        world.score
    }

    /// Current level.
    #[must_use]
    pub fn level(world: &World) -> u32 {
        world.level
    }

    /// Best score known to the world.
    #[must_use]
    pub fn high_score(world: &World) -> u32 {
        world.high_score
    }

    /// Logical tick interval for the current level and boost.
    #[must_use]
    pub fn tick_interval(world: &World) -> Duration {
        world.tick_interval()
    }

    /// Simulation time elapsed in the session.
    #[must_use]
    pub fn elapsed(world: &World) -> Duration {
        world.clock.elapsed()
    }

    /// Reports whether the shield is active.
    #[must_use]
    pub fn is_shielded(world: &World) -> bool {
        world.is_shielded()
    }

    /// Read-only view of the grid.
    #[must_use]
    pub fn grid_view(world: &World) -> GridView<'_> {
        world.grid.view()
    }

    /// Snake segments ordered head first.
    #[must_use]
    pub fn snake_segments(world: &World) -> Vec<CellCoord> {
        world.snake.segments().collect()
    }

    /// Cell holding regular food, if any.
    #[must_use]
    pub fn food_cell(world: &World) -> Option<CellCoord> {
        world.food.map(|food| food.cell)
    }

    /// Special food on the grid, if any.
    #[must_use]
    pub fn special_food(world: &World) -> Option<SpecialFoodSnapshot> {
        world.special_food.map(|special| SpecialFoodSnapshot {
            cell: special.cell,
            points: special.points,
            effect: special.effect,
            expires_at: special.expires_at,
        })
    }

    /// Occupant counts consulted by the spawning system.
    #[must_use]
    pub fn population(world: &World) -> PopulationView {
        PopulationView {
            level: world.level,
            food_present: world.food.is_some(),
            special_food_present: world.special_food.is_some(),
            enemy_count: world.hostiles.drone_count(),
            boss_present: world.hostiles.has_boss(),
        }
    }

    /// Checkpoint of the running session, if one is in progress.
    #[must_use]
    pub fn session_save(world: &World) -> Option<SessionSave> {
        if !matches!(world.state, SessionState::Playing | SessionState::Paused) {
            return None;
        }
        Some(SessionSave {
            columns: world.grid.columns(),
            rows: world.grid.rows(),
            score: world.score,
            level: world.level,
            snake: snake_segments(world),
            food: food_cell(world),
        })
    }

    /// Captures everything a renderer needs for one frame.
    #[must_use]
    pub fn snapshot(world: &World) -> WorldSnapshot {
        WorldSnapshot {
            state: world.state,
            columns: world.grid.columns(),
            rows: world.grid.rows(),
            snake: SnakeSnapshot {
                segments: snake_segments(world),
                direction: world.snake.direction(),
                queued: world.queued,
            },
            food: world.food.map(|food| FoodSnapshot {
                cell: food.cell,
                points: food.points,
            }),
            special_food: special_food(world),
            obstacles: world.grid.cells_of(CellKind::Obstacle).collect(),
            enemies: world.hostiles.enemy_snapshots(),
            projectiles: world.hostiles.projectile_snapshots(),
            statuses: world
                .statuses
                .iter()
                .map(|active| StatusSnapshot {
                    status: active.status,
                    until: active.until,
                })
                .collect(),
            score: world.score,
            level: world.level,
            high_score: world.high_score,
            boosted: world.boosted,
            tick_interval: world.tick_interval(),
            elapsed: world.clock.elapsed(),
            steps: world.clock.steps(),
        }
    }
}

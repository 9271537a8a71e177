#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Seeded spawning system that decides where food, special food and enemies
//! appear.
//!
//! The system never mutates the world. It reads events and immutable views and
//! answers with placement commands, which the world validates and applies.

use std::time::Duration;

use rand::{seq::IteratorRandom, Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use snake_arcade_core::{
    CellCoord, Command, Edge, EnemyConfig, EnemyPattern, Event, GameConfig, GridView,
    PopulationView, SessionState, SpecialEffect, SpecialFoodConfig,
};
use tracing::{debug, warn};

/// Configuration parameters required to construct the spawning system.
#[derive(Clone, Copy, Debug)]
pub struct Config {
    special_food: SpecialFoodConfig,
    enemies: EnemyConfig,
    boss_every_levels: u32,
    seed: u64,
}

impl Config {
    /// Creates a configuration from explicit parts.
    #[must_use]
    pub const fn new(
        special_food: SpecialFoodConfig,
        enemies: EnemyConfig,
        boss_every_levels: u32,
        seed: u64,
    ) -> Self {
        Self {
            special_food,
            enemies,
            boss_every_levels,
            seed,
        }
    }

    /// Extracts the spawning knobs from a full game configuration.
    #[must_use]
    pub fn from_game(config: &GameConfig) -> Self {
        Self::new(
            config.special_food,
            config.enemies,
            config.boss.every_levels,
            config.seed,
        )
    }
}

/// Pure system that emits placement commands while a session is running.
#[derive(Debug)]
pub struct Spawning {
    config: Config,
    rng: ChaCha8Rng,
    enemy_clock: Duration,
    special_clock: Duration,
    difficulty: u32,
    starved: bool,
}

impl Spawning {
    /// Creates a new spawning system using the supplied configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(config.seed),
            config,
            enemy_clock: Duration::ZERO,
            special_clock: Duration::ZERO,
            difficulty: 0,
            starved: false,
        }
    }

    /// Number of enemies this session has spawned so far.
    #[must_use]
    pub const fn difficulty(&self) -> u32 {
        self.difficulty
    }

    /// Consumes events and immutable views to emit spawn commands.
    pub fn handle(
        &mut self,
        events: &[Event],
        state: SessionState,
        grid: GridView<'_>,
        population: PopulationView,
        out: &mut Vec<Command>,
    ) {
        if events.iter().any(|event| {
            matches!(
                event,
                Event::SessionStarted { .. } | Event::SessionRestored { .. }
            )
        }) {
            self.reset();
        }

        if state != SessionState::Playing {
            return;
        }

        let mut elapsed = Duration::ZERO;
        let mut food_eaten = false;
        let mut boss_due = false;
        for event in events {
            match event {
                Event::TimeAdvanced { dt } => elapsed = elapsed.saturating_add(*dt),
                Event::FoodEaten { .. } => food_eaten = true,
                Event::LevelUp { level } => boss_due |= self.is_boss_level(*level),
                _ => {}
            }
        }

        let mut claimed = Vec::new();
        if !population.food_present {
            if let Some(cell) = self.pick_cell(grid, &claimed) {
                claimed.push(cell);
                out.push(Command::PlaceFood { cell });
            }
        }

        if !population.special_food_present && self.special_food_due(food_eaten, elapsed) {
            if let Some(cell) = self.pick_cell(grid, &claimed) {
                let effect = self.pick_effect(population);
                debug!(%cell, ?effect, "special food requested");
                claimed.push(cell);
                out.push(Command::PlaceSpecialFood { cell, effect });
            }
        }

        if boss_due && !population.boss_present {
            debug!(level = population.level, "boss requested");
            out.push(Command::SpawnBoss);
        }

        self.spawn_enemies(elapsed, population, grid, out);
    }

    fn reset(&mut self) {
        self.enemy_clock = Duration::ZERO;
        self.special_clock = Duration::ZERO;
        self.difficulty = 0;
        self.starved = false;
    }

    fn is_boss_level(&self, level: u32) -> bool {
        self.config.boss_every_levels > 0 && level % self.config.boss_every_levels == 0
    }

    fn pick_cell(&mut self, grid: GridView<'_>, claimed: &[CellCoord]) -> Option<CellCoord> {
        let cell = grid
            .empty_cells()
            .filter(|cell| !claimed.contains(cell))
            .choose(&mut self.rng);
        match cell {
            Some(_) => self.starved = false,
            None if !self.starved => {
                self.starved = true;
                warn!("no empty cell left for food");
            }
            None => {}
        }
        cell
    }

    fn special_food_due(&mut self, food_eaten: bool, elapsed: Duration) -> bool {
        let mut due = food_eaten && self.rng.gen_bool(self.config.special_food.chance);

        if let Some(interval_ms) = self.config.special_food.interval_ms {
            let interval = Duration::from_millis(interval_ms);
            self.special_clock = self.special_clock.saturating_add(elapsed);
            if !interval.is_zero() && self.special_clock >= interval {
                self.special_clock = Duration::ZERO;
                due = true;
            }
        }
        due
    }

    fn pick_effect(&mut self, population: PopulationView) -> SpecialEffect {
        if population.boss_present {
            return SpecialEffect::DamageBoss;
        }
        let mut effects = vec![SpecialEffect::Bonus, SpecialEffect::Shield];
        if population.enemy_count > 0 {
            effects.push(SpecialEffect::ClearEnemies);
        }
        effects
            .into_iter()
            .choose(&mut self.rng)
            .unwrap_or(SpecialEffect::Bonus)
    }

    fn spawn_enemies(
        &mut self,
        elapsed: Duration,
        population: PopulationView,
        grid: GridView<'_>,
        out: &mut Vec<Command>,
    ) {
        let enemies = self.config.enemies;
        if !enemies.enabled || population.level < enemies.start_level {
            self.enemy_clock = Duration::ZERO;
            return;
        }

        self.enemy_clock = self.enemy_clock.saturating_add(elapsed);
        if self.enemy_clock < enemies.spawn_interval(self.difficulty) {
            return;
        }
        self.enemy_clock = Duration::ZERO;
        if population.enemy_count >= enemies.max_count {
            return;
        }

        let (columns, rows) = grid.dimensions();
        let edge = Edge::ALL[self.rng.gen_range(0..Edge::ALL.len())];
        let length = edge.length(columns, rows);
        if length == 0 {
            return;
        }
        let offset = self.rng.gen_range(0..length);
        let pattern = EnemyPattern::ALL[self.rng.gen_range(0..EnemyPattern::ALL.len())];
        self.difficulty = self.difficulty.saturating_add(1);
        debug!(?edge, offset, ?pattern, difficulty = self.difficulty, "enemy requested");
        out.push(Command::SpawnEnemy {
            edge,
            offset,
            pattern,
        });
    }
}

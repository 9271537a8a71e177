#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shared rendering contracts for Snake Arcade adapters.
//!
//! A [`Scene`] is a flattened, read-only picture of one world snapshot: the
//! play field surrounded by a one-cell border ring where enemies live. Backends
//! receive a [`Presentation`] and draw it however they like.

mod text;

use std::{error::Error, fmt};

use anyhow::Result as AnyResult;
use glam::Vec2;
use snake_arcade_core::{
    CellCoord, EnemyKind, SessionState, SpecialEffect, StatusEffect, WorldSnapshot,
};

pub use text::TextBackend;

/// RGBA color used when presenting frames.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    /// Red channel intensity in the range 0.0..=1.0.
    pub red: f32,
    /// Green channel intensity in the range 0.0..=1.0.
    pub green: f32,
    /// Blue channel intensity in the range 0.0..=1.0.
    pub blue: f32,
    /// Alpha channel intensity in the range 0.0..=1.0.
    pub alpha: f32,
}

impl Color {
    /// Creates a new color from floating point channels.
    #[must_use]
    pub const fn new(red: f32, green: f32, blue: f32, alpha: f32) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    /// Creates an opaque color from byte RGB values.
    #[must_use]
    pub const fn from_rgb_u8(red: u8, green: u8, blue: u8) -> Self {
        Self {
            red: red as f32 / 255.0,
            green: green as f32 / 255.0,
            blue: blue as f32 / 255.0,
            alpha: 1.0,
        }
    }

    /// Returns a new color lightened towards white by the provided amount.
    #[must_use]
    pub fn lighten(self, amount: f32) -> Self {
        let amount = amount.clamp(0.0, 1.0);
        let lift = |channel: f32| channel + (1.0 - channel) * amount;
        Self {
            red: lift(self.red),
            green: lift(self.green),
            blue: lift(self.blue),
            alpha: self.alpha,
        }
    }

    /// Byte channels suitable for 24-bit terminal escapes.
    #[must_use]
    pub fn to_rgb_u8(self) -> [u8; 3] {
        let byte = |channel: f32| (channel.clamp(0.0, 1.0) * 255.0).round() as u8;
        [byte(self.red), byte(self.green), byte(self.blue)]
    }
}

/// What occupies one cell of the scene.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Sprite {
    /// Nothing to draw.
    #[default]
    Empty,
    /// Outer ring around the play field.
    Border,
    /// Snake head.
    Head,
    /// Snake body segment.
    Body,
    /// Regular food.
    Food,
    /// Special food with the effect it grants.
    SpecialFood(SpecialEffect),
    /// Static obstacle.
    Obstacle,
    /// Regular enemy.
    Enemy,
    /// Boss enemy.
    Boss,
    /// Projectile in flight.
    Projectile,
}

impl Sprite {
    /// Character used by text backends.
    #[must_use]
    pub const fn symbol(self) -> char {
        match self {
            Self::Empty => '.',
            Self::Border => '+',
            Self::Head => '@',
            Self::Body => 'o',
            Self::Food => '*',
            Self::SpecialFood(SpecialEffect::Bonus) => '$',
            Self::SpecialFood(SpecialEffect::ClearEnemies) => '!',
            Self::SpecialFood(SpecialEffect::DamageBoss) => '%',
            Self::SpecialFood(SpecialEffect::Shield) => '&',
            Self::Obstacle => '#',
            Self::Enemy => 'E',
            Self::Boss => 'B',
            Self::Projectile => '-',
        }
    }
}

/// Colors assigned to each sprite.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Palette {
    /// Play field background.
    pub background: Color,
    /// Border ring.
    pub border: Color,
    /// Snake head and body.
    pub snake: Color,
    /// Regular food.
    pub food: Color,
    /// Special food.
    pub special_food: Color,
    /// Obstacles.
    pub obstacle: Color,
    /// Enemies, bosses and their projectiles.
    pub hostile: Color,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            background: Color::from_rgb_u8(0x1b, 0x1f, 0x1a),
            border: Color::from_rgb_u8(0x5a, 0x61, 0x55),
            snake: Color::from_rgb_u8(0x4c, 0xaf, 0x50),
            food: Color::from_rgb_u8(0xe5, 0x39, 0x35),
            special_food: Color::from_rgb_u8(0xff, 0xc1, 0x07),
            obstacle: Color::from_rgb_u8(0x8d, 0x6e, 0x63),
            hostile: Color::from_rgb_u8(0xab, 0x47, 0xbc),
        }
    }
}

impl Palette {
    /// Color used to draw `sprite`.
    #[must_use]
    pub fn color_of(&self, sprite: Sprite) -> Color {
        match sprite {
            Sprite::Empty => self.background,
            Sprite::Border => self.border,
            Sprite::Head => self.snake.lighten(0.35),
            Sprite::Body => self.snake,
            Sprite::Food => self.food,
            Sprite::SpecialFood(_) => self.special_food,
            Sprite::Obstacle => self.obstacle,
            Sprite::Enemy | Sprite::Projectile => self.hostile,
            Sprite::Boss => self.hostile.lighten(0.25),
        }
    }
}

/// Status line shown above the play field.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Hud {
    /// Session lifecycle state.
    pub state: SessionState,
    /// Current score.
    pub score: u32,
    /// Current level.
    pub level: u32,
    /// Best score on record.
    pub high_score: u32,
    /// Whether the shield is active.
    pub shielded: bool,
    /// Whether boost is held.
    pub boosted: bool,
}

impl Hud {
    /// Prompt shown for states that wait on the player.
    #[must_use]
    pub const fn prompt(&self) -> Option<&'static str> {
        match self.state {
            SessionState::StartScreen => Some("press a direction to start"),
            SessionState::Paused => Some("paused"),
            SessionState::GameOver => Some("game over"),
            SessionState::Playing => None,
        }
    }
}

/// Scene description of one frame, border ring included.
#[derive(Clone, Debug, PartialEq)]
pub struct Scene {
    columns: u32,
    rows: u32,
    sprites: Vec<Sprite>,
    /// Status line content.
    pub hud: Hud,
}

impl Scene {
    /// Flattens a world snapshot into sprites.
    pub fn from_snapshot(snapshot: &WorldSnapshot) -> Result<Self, RenderingError> {
        let (columns, rows) = (snapshot.columns, snapshot.rows);
        if columns == 0 || rows == 0 {
            return Err(RenderingError::EmptyGrid { columns, rows });
        }
        let width = columns as usize + 2;
        let height = rows as usize + 2;
        let mut scene = Self {
            columns,
            rows,
            sprites: vec![Sprite::Empty; width * height],
            hud: Hud {
                state: snapshot.state,
                score: snapshot.score,
                level: snapshot.level,
                high_score: snapshot.high_score,
                shielded: snapshot.has_status(StatusEffect::Shield),
                boosted: snapshot.boosted,
            },
        };

        for row in -1..=i64::from(rows) {
            for column in -1..=i64::from(columns) {
                if !scene.is_inside(column, row) {
                    scene.paint(column, row, Sprite::Border);
                }
            }
        }
        for &cell in &snapshot.obstacles {
            scene.paint_cell(cell, Sprite::Obstacle);
        }
        if let Some(food) = snapshot.food {
            scene.paint_cell(food.cell, Sprite::Food);
        }
        if let Some(special) = snapshot.special_food {
            scene.paint_cell(special.cell, Sprite::SpecialFood(special.effect));
        }
        for &segment in snapshot.snake.segments.iter().skip(1) {
            scene.paint_cell(segment, Sprite::Body);
        }
        if let Some(head) = snapshot.snake.head() {
            scene.paint_cell(head, Sprite::Head);
        }
        for projectile in &snapshot.projectiles {
            let (column, row) = scene.ring_cell(projectile.position);
            if matches!(scene.sprite_at(column, row), Some(Sprite::Empty | Sprite::Border)) {
                scene.paint(column, row, Sprite::Projectile);
            }
        }
        for enemy in &snapshot.enemies {
            let (column, row) = scene.ring_cell(enemy.position);
            let sprite = match enemy.kind {
                EnemyKind::Drone => Sprite::Enemy,
                EnemyKind::Boss => Sprite::Boss,
            };
            scene.paint(column, row, sprite);
        }

        Ok(scene)
    }

    /// Play field dimensions without the border ring.
    #[must_use]
    pub const fn dimensions(&self) -> (u32, u32) {
        (self.columns, self.rows)
    }

    /// Sprite at a position where `-1` and `columns`/`rows` address the ring.
    #[must_use]
    pub fn sprite_at(&self, column: i64, row: i64) -> Option<Sprite> {
        self.index(column, row).map(|index| self.sprites[index])
    }

    /// Rows of sprites top to bottom, border ring included.
    pub fn lines(&self) -> impl Iterator<Item = &[Sprite]> {
        self.sprites.chunks(self.columns as usize + 2)
    }

    fn is_inside(&self, column: i64, row: i64) -> bool {
        (0..i64::from(self.columns)).contains(&column) && (0..i64::from(self.rows)).contains(&row)
    }

    fn ring_cell(&self, position: Vec2) -> (i64, i64) {
        let column = (position.x.floor() as i64).clamp(-1, i64::from(self.columns));
        let row = (position.y.floor() as i64).clamp(-1, i64::from(self.rows));
        (column, row)
    }

    fn index(&self, column: i64, row: i64) -> Option<usize> {
        let width = i64::from(self.columns) + 2;
        let height = i64::from(self.rows) + 2;
        let (x, y) = (column + 1, row + 1);
        if (0..width).contains(&x) && (0..height).contains(&y) {
            usize::try_from(y * width + x).ok()
        } else {
            None
        }
    }

    fn paint(&mut self, column: i64, row: i64, sprite: Sprite) {
        if let Some(index) = self.index(column, row) {
            self.sprites[index] = sprite;
        }
    }

    fn paint_cell(&mut self, cell: CellCoord, sprite: Sprite) {
        self.paint(i64::from(cell.column()), i64::from(cell.row()), sprite);
    }
}

/// Presentation descriptor consumed by rendering backends.
#[derive(Clone, Debug, PartialEq)]
pub struct Presentation {
    /// Title shown by the backend.
    pub window_title: String,
    /// Colors used for sprites.
    pub palette: Palette,
    /// Scene content that should be displayed.
    pub scene: Scene,
}

impl Presentation {
    /// Constructs a new presentation descriptor.
    #[must_use]
    pub fn new<T>(window_title: T, palette: Palette, scene: Scene) -> Self
    where
        T: Into<String>,
    {
        Self {
            window_title: window_title.into(),
            palette,
            scene,
        }
    }
}

/// Rendering backend capable of presenting Snake Arcade scenes.
pub trait RenderingBackend {
    /// Draws one frame.
    fn present(&mut self, presentation: &Presentation) -> AnyResult<()>;
}

/// Errors that can occur when constructing rendering descriptors.
#[derive(Debug, PartialEq, Eq)]
pub enum RenderingError {
    /// The snapshot describes a grid without cells.
    EmptyGrid {
        /// Reported column count.
        columns: u32,
        /// Reported row count.
        rows: u32,
    },
}

impl fmt::Display for RenderingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyGrid { columns, rows } => {
                write!(f, "cannot render an empty {columns}x{rows} grid")
            }
        }
    }
}

impl Error for RenderingError {}

#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that runs Snake Arcade headlessly.
//!
//! The binary drives the session façade with a fixed frame delta, steers the
//! snake with a greedy autopilot and prints frames as text.

mod autopilot;

use std::{
    fs,
    io::{self, IsTerminal},
    path::{Path, PathBuf},
    time::Duration,
};

use anyhow::{Context, Result};
use clap::Parser;
use snake_arcade_core::{Direction, GameConfig, SessionState, WELCOME_BANNER};
use snake_arcade_rendering::{Palette, Presentation, RenderingBackend, Scene, TextBackend};
use snake_arcade_session::Arcade;
use snake_arcade_storage::{FileStore, MemoryStore, Store};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

const WINDOW_TITLE: &str = "Snake Arcade";

/// Command-line arguments for the headless runner.
#[derive(Debug, Parser)]
#[command(name = "snake-arcade", version, about = "Headless Snake Arcade runner")]
struct CliArgs {
    /// TOML file with game configuration overrides.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// JSON file used to persist high scores, statistics and saves.
    ///
    /// A session saved by an earlier run is resumed, and an unfinished
    /// session is saved on exit.
    #[arg(long, value_name = "PATH")]
    store: Option<PathBuf>,

    /// Seed for every random choice; overrides the configuration file.
    #[arg(long)]
    seed: Option<u64>,

    /// Number of frames to simulate.
    #[arg(long, default_value_t = 600)]
    frames: u32,

    /// Simulated duration of one frame in milliseconds.
    #[arg(long, default_value_t = 16)]
    frame_ms: u64,

    /// Print every Nth frame; zero prints only the final frame.
    #[arg(long, default_value_t = 0)]
    render_every: u32,

    /// Disable the autopilot; the snake keeps its opening heading.
    #[arg(long)]
    no_autopilot: bool,
}

/// Entry point for the Snake Arcade command-line interface.
fn main() -> Result<()> {
    init_tracing();
    let args = CliArgs::parse();
    let config = load_config(args.config.as_deref(), args.seed)?;

    match args.store.clone() {
        Some(path) => {
            let store = FileStore::open(&path)
                .with_context(|| format!("failed to open store {}", path.display()))?;
            run(&args, config, store)
        }
        None => run(&args, config, MemoryStore::new()),
    }
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .try_init();
}

fn load_config(path: Option<&Path>, seed: Option<u64>) -> Result<GameConfig> {
    let mut config = match path {
        Some(path) => {
            let contents = fs::read_to_string(path)
                .with_context(|| format!("failed to read config {}", path.display()))?;
            toml::from_str(&contents)
                .with_context(|| format!("failed to parse config {}", path.display()))?
        }
        None => GameConfig::default(),
    };
    if let Some(seed) = seed {
        config.seed = seed;
    }
    config.validate().context("invalid game configuration")?;
    Ok(config)
}

fn run<S: Store>(args: &CliArgs, config: GameConfig, store: S) -> Result<()> {
    let mut arcade = Arcade::new(config, store).context("failed to build the arcade")?;
    let mut backend = TextBackend::new(io::stdout().lock()).with_color(io::stdout().is_terminal());
    println!("{WELCOME_BANNER}");

    if args.store.is_some() && arcade.load_game() {
        info!("resumed the saved session");
        if let [head, neck, ..] = arcade.snapshot().snake.segments[..] {
            if let Some(facing) = Direction::between(neck, head) {
                arcade.request_direction(facing);
            }
        }
    } else {
        arcade.request_direction(Direction::Right);
    }

    let dt = Duration::from_millis(args.frame_ms.max(1));
    let mut snapshot = arcade.snapshot();
    for frame in 1..=args.frames {
        if !args.no_autopilot {
            if let Some(direction) = autopilot::choose(&snapshot) {
                arcade.request_direction(direction);
            }
        }
        snapshot = arcade.frame(dt);

        if args.render_every > 0 && frame % args.render_every == 0 {
            present(&mut backend, &snapshot)?;
        }
        if snapshot.state == SessionState::GameOver {
            break;
        }
    }
    present(&mut backend, &snapshot)?;

    if args.store.is_some()
        && matches!(snapshot.state, SessionState::Playing | SessionState::Paused)
    {
        match arcade.save_game() {
            Ok(save) => println!("session saved at score {}", save.score),
            Err(error) => warn!(%error, "could not save the session"),
        }
    }

    let record = arcade.statistics();
    println!(
        "score {} | level {} | best {} | games {} | food {} | longest {}",
        snapshot.score,
        snapshot.level,
        arcade.high_score(),
        record.games_played,
        record.food_eaten,
        record.longest_snake
    );
    Ok(())
}

fn present<W: io::Write>(
    backend: &mut TextBackend<W>,
    snapshot: &snake_arcade_core::WorldSnapshot,
) -> Result<()> {
    let scene = Scene::from_snapshot(snapshot).context("failed to build scene")?;
    backend.present(&Presentation::new(WINDOW_TITLE, Palette::default(), scene))
}

#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Host-facing façade that owns a world, its systems and persistence.
//!
//! Hosts call [`Arcade::frame`] once per display frame and render the returned
//! snapshot. Input methods translate host intents into world commands. Every
//! event is forwarded synchronously to registered listeners.

use std::time::Duration;

use snake_arcade_core::{
    Command, ConfigError, Direction, Event, GameConfig, SessionSave, SessionState, StatsRecord,
    WorldSnapshot,
};
use snake_arcade_storage::{Persistence, StorageError, Store};
use snake_arcade_system_spawning::{Config as SpawningConfig, Spawning};
use snake_arcade_system_statistics::Statistics;
use snake_arcade_world::{self as world, query, World};
use thiserror::Error;
use tracing::{debug, info, warn};

const MAX_PUMP_ROUNDS: usize = 16;

/// Errors surfaced by the façade.
#[derive(Debug, Error)]
pub enum SessionError {
    /// The configuration failed validation.
    #[error("invalid game configuration")]
    Config(#[from] ConfigError),
    /// There is no running session to save.
    #[error("no session in progress to save")]
    NothingToSave,
    /// The store rejected a write.
    #[error("failed to persist the session")]
    Storage(#[from] StorageError),
}

type Listener = Box<dyn FnMut(&Event)>;

/// Snake arcade session bound to a persistence store.
pub struct Arcade<S: Store> {
    world: World,
    spawning: Spawning,
    statistics: Statistics,
    persistence: Persistence<S>,
    listeners: Vec<Listener>,
}

impl<S: Store> Arcade<S> {
    /// Builds a session on the title screen, seeding records from `store`.
    pub fn new(config: GameConfig, store: S) -> Result<Self, SessionError> {
        let spawning = Spawning::new(SpawningConfig::from_game(&config));
        let mut world = World::new(config)?;
        let persistence = Persistence::new(store);
        let record = persistence.load_statistics();
        let high_score = persistence.load_high_score().max(record.high_score);

        let mut events = Vec::new();
        world::apply(
            &mut world,
            Command::SeedHighScore { score: high_score },
            &mut events,
        );
        info!(high_score, games_played = record.games_played, "arcade ready");

        Ok(Self {
            world,
            spawning,
            statistics: Statistics::new(record),
            persistence,
            listeners: Vec::new(),
        })
    }

    /// Registers a listener that observes every event in emission order.
    pub fn on_event<F>(&mut self, listener: F)
    where
        F: FnMut(&Event) + 'static,
    {
        self.listeners.push(Box::new(listener));
    }

    /// Advances the simulation by one display frame and returns the new state.
    pub fn frame(&mut self, dt: Duration) -> WorldSnapshot {
        let _ = self.submit(Command::Tick { dt });
        self.snapshot()
    }

    /// Captures the current state without advancing time.
    #[must_use]
    pub fn snapshot(&self) -> WorldSnapshot {
        query::snapshot(&self.world)
    }

    /// Current session state.
    #[must_use]
    pub fn state(&self) -> SessionState {
        query::state(&self.world)
    }

    /// Best score known to this session.
    #[must_use]
    pub fn high_score(&self) -> u32 {
        query::high_score(&self.world)
    }

    /// Lifetime statistics including the running session.
    #[must_use]
    pub fn statistics(&self) -> &StatsRecord {
        self.statistics.record()
    }

    /// Borrows the persistence store.
    #[must_use]
    pub fn store(&self) -> &S {
        self.persistence.store()
    }

    /// Tears the session down and returns the store.
    pub fn into_store(self) -> S {
        self.persistence.into_store()
    }

    /// Requests a new heading. Starts the game from the title screen.
    pub fn request_direction(&mut self, direction: Direction) {
        let _ = self.submit(Command::RequestDirection { direction });
    }

    /// Pauses a running session.
    pub fn request_pause(&mut self) {
        let _ = self.submit(Command::PauseSession);
    }

    /// Resumes a paused session.
    pub fn request_resume(&mut self) {
        let _ = self.submit(Command::ResumeSession);
    }

    /// Starts a session from the title screen or after a game over.
    pub fn request_start(&mut self) {
        let _ = self.submit(Command::StartSession);
    }

    /// Restarts after a game over.
    pub fn request_restart(&mut self) {
        let _ = self.submit(Command::RestartSession);
    }

    /// Leaves a paused or finished session for the title screen.
    pub fn request_title(&mut self) {
        let _ = self.submit(Command::ReturnToTitle);
    }

    /// Holds or releases the speed boost.
    pub fn set_boost(&mut self, active: bool) {
        let _ = self.submit(Command::SetBoost { active });
    }

    /// Maps a single "pause" key onto the state machine.
    pub fn toggle_pause(&mut self) {
        let command = match self.state() {
            SessionState::Playing => Command::PauseSession,
            SessionState::Paused => Command::ResumeSession,
            SessionState::StartScreen | SessionState::GameOver => Command::StartSession,
        };
        let _ = self.submit(command);
    }

    /// Persists a checkpoint of the running session and returns it.
    pub fn save_game(&mut self) -> Result<SessionSave, SessionError> {
        let save = query::session_save(&self.world).ok_or(SessionError::NothingToSave)?;
        self.persistence.save_session(&save)?;
        info!(score = save.score, level = save.level, "session saved");
        Ok(save)
    }

    /// Restores the stored checkpoint, if there is a valid one.
    pub fn load_game(&mut self) -> bool {
        match self.persistence.load_session() {
            Some(save) => self.restore(save),
            None => {
                debug!("no saved session to load");
                false
            }
        }
    }

    /// Replaces the running session with `save`.
    ///
    /// Returns `false` when the checkpoint does not fit this grid.
    pub fn restore(&mut self, save: SessionSave) -> bool {
        self.submit(Command::RestoreSession { save })
            .iter()
            .any(|event| matches!(event, Event::SessionRestored { .. }))
    }

    fn submit(&mut self, command: Command) -> Vec<Event> {
        let mut events = Vec::new();
        world::apply(&mut self.world, command, &mut events);
        self.pump(events)
    }

    /// Feeds events through listeners and systems until no system has more
    /// commands. Returns every event seen.
    fn pump(&mut self, mut events: Vec<Event>) -> Vec<Event> {
        let mut seen = Vec::new();

        for _ in 0..MAX_PUMP_ROUNDS {
            if events.is_empty() {
                return seen;
            }

            let mut derived = Vec::new();
            self.statistics.handle(&events, &mut derived);
            events.extend(derived);
            self.dispatch(&events);

            let mut commands = Vec::new();
            self.spawning.handle(
                &events,
                query::state(&self.world),
                query::grid_view(&self.world),
                query::population(&self.world),
                &mut commands,
            );
            seen.append(&mut events);

            for command in commands {
                world::apply(&mut self.world, command, &mut events);
            }
        }

        if !events.is_empty() {
            warn!(pending = events.len(), "event pump did not settle");
            self.dispatch(&events);
            seen.append(&mut events);
        }
        seen
    }

    fn dispatch(&mut self, events: &[Event]) {
        for event in events {
            self.persist(event);
            for listener in &mut self.listeners {
                listener(event);
            }
        }
    }

    fn persist(&mut self, event: &Event) {
        let result = match event {
            Event::GameOver {
                score,
                new_high_score,
                ..
            } => {
                let saved = if *new_high_score {
                    self.persistence.save_high_score(*score)
                } else {
                    Ok(())
                };
                saved.and_then(|()| self.persistence.clear_session())
            }
            Event::StatisticsUpdated { record } => self.persistence.save_statistics(record),
            _ => Ok(()),
        };
        if let Err(error) = result {
            warn!(%error, "failed to persist arcade data");
        }
    }
}

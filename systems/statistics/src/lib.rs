#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Lifetime statistics system that folds session events into a persistent
//! record.

use snake_arcade_core::{Event, StatsRecord};
use tracing::debug;

/// Pure statistics system that tracks the running session and publishes the
/// lifetime record whenever it changes.
#[derive(Debug, Default)]
pub struct Statistics {
    record: StatsRecord,
    session: SessionTally,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
struct SessionTally {
    longest: u32,
}

impl Statistics {
    /// Creates a statistics system seeded with a previously stored record.
    #[must_use]
    pub fn new(record: StatsRecord) -> Self {
        Self {
            record,
            session: SessionTally::default(),
        }
    }

    /// Returns the lifetime record including the running session.
    #[must_use]
    pub fn record(&self) -> &StatsRecord {
        &self.record
    }

    /// Consumes world events and publishes record updates.
    ///
    /// At most one [`Event::StatisticsUpdated`] is emitted per call, carrying
    /// the record after every event in the batch was folded in.
    pub fn handle(&mut self, events: &[Event], out: &mut Vec<Event>) {
        let mut changed = false;

        for event in events {
            match event {
                Event::SessionStarted { length } => {
                    self.record.games_played = self.record.games_played.saturating_add(1);
                    self.session = SessionTally { longest: *length };
                    changed = true;
                }
                Event::SessionRestored { length, .. } => {
                    self.session = SessionTally { longest: *length };
                }
                Event::SnakeAdvanced { length, .. } | Event::CollisionDamage { length, .. } => {
                    self.session.longest = self.session.longest.max(*length);
                }
                Event::FoodEaten { .. } | Event::SpecialFoodEaten { .. } => {
                    self.record.food_eaten = self.record.food_eaten.saturating_add(1);
                }
                Event::GameOver {
                    score,
                    level,
                    length,
                    ..
                } => {
                    let longest = self.session.longest.max(*length);
                    if self.record.absorb_session(*score, *level, longest) {
                        debug!(score, level, longest, "personal best improved");
                    }
                    changed = true;
                }
                _ => {}
            }
        }

        if changed {
            out.push(Event::StatisticsUpdated {
                record: self.record.clone(),
            });
        }
    }
}

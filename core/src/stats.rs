use serde::{Deserialize, Serialize};

/// Lifetime play statistics persisted between runs.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StatsRecord {
    /// Sessions started from the title screen or after a game over.
    pub games_played: u64,
    /// Best score reached in any session.
    pub high_score: u32,
    /// Highest level reached in any session.
    pub max_level: u32,
    /// Regular and special food items eaten across all sessions.
    pub food_eaten: u64,
    /// Longest snake grown in any session.
    pub longest_snake: u32,
}

impl StatsRecord {
    /// Folds the results of a finished session into the record.
    ///
    /// Returns `true` when any of the best-of values improved.
    pub fn absorb_session(&mut self, score: u32, level: u32, longest: u32) -> bool {
        let before = (self.high_score, self.max_level, self.longest_snake);
        self.high_score = self.high_score.max(score);
        self.max_level = self.max_level.max(level);
        self.longest_snake = self.longest_snake.max(longest);
        before != (self.high_score, self.max_level, self.longest_snake)
    }
}

impl Default for StatsRecord {
    fn default() -> Self {
        Self {
            games_played: 0,
            high_score: 0,
            max_level: 1,
            food_eaten: 0,
            longest_snake: 0,
        }
    }
}

//! Session-local telemetry
//!
//! Per-operation answer tallies accumulated across the games of one play
//! session. The sim never reads these; they exist for the host and the
//! stats sink.

use serde::{Deserialize, Serialize};

use crate::problem::Operation;
use crate::sim::GameEvent;

/// Correct/wrong/missed counts for one operation category
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpTally {
    pub correct: u32,
    pub wrong: u32,
    pub missed: u32,
}

impl OpTally {
    /// Rounds resolved in this category, however they ended
    pub fn total(&self) -> u32 {
        self.correct + self.wrong + self.missed
    }
}

/// Telemetry for one play session, possibly spanning several games
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SessionStats {
    tallies: [OpTally; Operation::ALL.len()],
    /// Completed games, counted at game over
    pub games_played: u32,
    /// Best final score across completed games
    pub best_score: u32,
    /// Highest level reached in any game
    pub highest_level: u32,
}

impl SessionStats {
    /// Fold one sim event into the tallies
    pub fn record(&mut self, event: &GameEvent) {
        match event {
            GameEvent::CorrectHit { operation, .. } => {
                self.tallies[operation.index()].correct += 1;
            }
            GameEvent::WrongHit { operation, .. } => {
                self.tallies[operation.index()].wrong += 1;
            }
            GameEvent::Missed { operation, .. } => {
                self.tallies[operation.index()].missed += 1;
            }
            GameEvent::LevelUp { new_level, .. } => {
                self.highest_level = self.highest_level.max(*new_level);
            }
            GameEvent::GameOver { score, level, .. } => {
                self.games_played += 1;
                self.best_score = self.best_score.max(*score);
                self.highest_level = self.highest_level.max(*level);
            }
            _ => {}
        }
    }

    pub fn tally(&self, operation: Operation) -> OpTally {
        self.tallies[operation.index()]
    }

    pub fn total_correct(&self) -> u32 {
        self.tallies.iter().map(|t| t.correct).sum()
    }

    pub fn total_wrong(&self) -> u32 {
        self.tallies.iter().map(|t| t.wrong).sum()
    }

    pub fn total_missed(&self) -> u32 {
        self.tallies.iter().map(|t| t.missed).sum()
    }

    /// Correct share of all resolved rounds, 0..=1 (0 when nothing resolved)
    pub fn accuracy(&self) -> f32 {
        let total = self.total_correct() + self.total_wrong() + self.total_missed();
        if total == 0 {
            return 0.0;
        }
        self.total_correct() as f32 / total as f32
    }
}

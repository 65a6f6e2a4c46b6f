//! Feedback and stats boundary traits
//!
//! Audio cues, analytics, and leaderboard submission live outside the core.
//! The session talks to them only through these traits, handing over copies
//! at transition points; implementations never reach back into the sim.

use std::cell::{Ref, RefCell};
use std::rc::Rc;

use crate::problem::Operation;

/// Fire-and-forget gameplay cues.
///
/// Every method defaults to a no-op so hosts implement only what they need.
/// Implementations must not block.
pub trait FeedbackSink {
    fn on_correct_hit(&mut self, level: u32, operation: Operation, new_score: u32) {
        let _ = (level, operation, new_score);
    }

    fn on_wrong_hit(&mut self, level: u32, operation: Operation, lives_remaining: u32) {
        let _ = (level, operation, lives_remaining);
    }

    fn on_missed(&mut self, level: u32, operation: Operation, lives_remaining: u32) {
        let _ = (level, operation, lives_remaining);
    }

    fn on_level_up(&mut self, new_level: u32, tier: u32, score: u32) {
        let _ = (new_level, tier, score);
    }

    fn on_tier_changed(&mut self, tier: u32, description: &str) {
        let _ = (tier, description);
    }
}

/// End-of-game score submission, called exactly once per completed game.
pub trait StatsSink {
    fn report_game_over(&mut self, final_score: u32, final_level: u32, correct_count: u32) {
        let _ = (final_score, final_level, correct_count);
    }
}

/// Sink that ignores everything. The session default.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl FeedbackSink for NullSink {}
impl StatsSink for NullSink {}

/// Call log shared by [`RecordingSink`] clones.
#[derive(Debug, Default)]
pub struct RecordedCalls {
    /// (level, operation, new_score)
    pub correct_hits: Vec<(u32, Operation, u32)>,
    /// (level, operation, lives_remaining)
    pub wrong_hits: Vec<(u32, Operation, u32)>,
    /// (level, operation, lives_remaining)
    pub misses: Vec<(u32, Operation, u32)>,
    /// (new_level, tier, score)
    pub level_ups: Vec<(u32, u32, u32)>,
    /// (tier, description)
    pub tier_changes: Vec<(u32, String)>,
    /// (final_score, final_level, correct_count)
    pub game_overs: Vec<(u32, u32, u32)>,
}

/// Sink that records every call, for host test automation.
///
/// Clones share one log, so a clone can be boxed into the session while the
/// original stays out for inspection.
#[derive(Debug, Clone, Default)]
pub struct RecordingSink {
    calls: Rc<RefCell<RecordedCalls>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> Ref<'_, RecordedCalls> {
        self.calls.borrow()
    }
}

impl FeedbackSink for RecordingSink {
    fn on_correct_hit(&mut self, level: u32, operation: Operation, new_score: u32) {
        self.calls
            .borrow_mut()
            .correct_hits
            .push((level, operation, new_score));
    }

    fn on_wrong_hit(&mut self, level: u32, operation: Operation, lives_remaining: u32) {
        self.calls
            .borrow_mut()
            .wrong_hits
            .push((level, operation, lives_remaining));
    }

    fn on_missed(&mut self, level: u32, operation: Operation, lives_remaining: u32) {
        self.calls
            .borrow_mut()
            .misses
            .push((level, operation, lives_remaining));
    }

    fn on_level_up(&mut self, new_level: u32, tier: u32, score: u32) {
        self.calls
            .borrow_mut()
            .level_ups
            .push((new_level, tier, score));
    }

    fn on_tier_changed(&mut self, tier: u32, description: &str) {
        self.calls
            .borrow_mut()
            .tier_changes
            .push((tier, description.to_string()));
    }
}

impl StatsSink for RecordingSink {
    fn report_game_over(&mut self, final_score: u32, final_level: u32, correct_count: u32) {
        self.calls
            .borrow_mut()
            .game_overs
            .push((final_score, final_level, correct_count));
    }
}

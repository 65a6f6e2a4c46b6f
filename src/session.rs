//! Host-facing game session
//!
//! Wraps the deterministic sim behind an explicit session object. The host
//! calls control methods as input arrives and `frame(dt)` once per rendered
//! frame; the session runs fixed-timestep substeps, clears one-shot inputs,
//! folds sim events into telemetry, and forwards them to the feedback and
//! stats sinks.

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::feedback::{FeedbackSink, NullSink, StatsSink};
use crate::problem::MathProblem;
use crate::sim::{
    AnswerBlock, GameEvent, GamePhase, GameScore, GameState, Projectile, TickInput, tick,
};
use crate::stats::SessionStats;

/// One running play session: create on entry, drop on navigate-away.
pub struct GameSession {
    state: GameState,
    input: TickInput,
    accumulator: f32,
    stats: SessionStats,
    feedback: Box<dyn FeedbackSink>,
    stats_sink: Box<dyn StatsSink>,
}

impl GameSession {
    /// Session with no-op sinks.
    pub fn new(seed: u64) -> Self {
        Self::with_sinks(seed, Box::new(NullSink), Box::new(NullSink))
    }

    pub fn with_sinks(
        seed: u64,
        feedback: Box<dyn FeedbackSink>,
        stats_sink: Box<dyn StatsSink>,
    ) -> Self {
        Self {
            state: GameState::new(seed),
            input: TickInput::default(),
            accumulator: 0.0,
            stats: SessionStats::default(),
            feedback,
            stats_sink,
        }
    }

    // --- Control surface ---

    pub fn start_game(&mut self) {
        self.input.start = true;
    }

    pub fn pause(&mut self) {
        self.input.pause = true;
    }

    pub fn resume(&mut self) {
        self.input.resume = true;
    }

    pub fn skip_level_up(&mut self) {
        self.input.skip_level_up = true;
    }

    /// Set the held movement direction, -1 (left) to 1 (right). Sticky
    /// until changed, like a held key.
    pub fn move_player(&mut self, direction: f32) {
        self.input.move_dir = direction;
    }

    pub fn fire(&mut self) {
        self.input.fire = true;
    }

    /// Toggle the demo AI.
    pub fn set_auto_pilot(&mut self, enabled: bool) {
        self.input.auto_pilot = enabled;
    }

    /// Advance by `dt` seconds of host time, running fixed substeps.
    pub fn frame(&mut self, dt: f32) {
        let dt = dt.min(0.1);
        self.accumulator += dt;

        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            let input = self.input.clone();
            tick(&mut self.state, &input, SIM_DT);
            self.accumulator -= SIM_DT;
            substeps += 1;

            // Clear one-shot inputs after processing
            self.input.start = false;
            self.input.pause = false;
            self.input.resume = false;
            self.input.skip_level_up = false;
            self.input.fire = false;

            self.dispatch_events();
        }
    }

    fn dispatch_events(&mut self) {
        for event in self.state.take_events() {
            self.stats.record(&event);
            match event {
                GameEvent::CorrectHit {
                    level,
                    operation,
                    new_score,
                } => self.feedback.on_correct_hit(level, operation, new_score),
                GameEvent::WrongHit {
                    level,
                    operation,
                    lives_remaining,
                } => self.feedback.on_wrong_hit(level, operation, lives_remaining),
                GameEvent::Missed {
                    level,
                    operation,
                    lives_remaining,
                } => self.feedback.on_missed(level, operation, lives_remaining),
                GameEvent::LevelUp {
                    new_level,
                    tier,
                    score,
                } => self.feedback.on_level_up(new_level, tier, score),
                GameEvent::TierChanged { tier, description } => {
                    self.feedback.on_tier_changed(tier, description)
                }
                GameEvent::GameOver {
                    score,
                    level,
                    correct_total,
                } => self.stats_sink.report_game_over(score, level, correct_total),
                GameEvent::RoundStarted { .. } | GameEvent::CountdownTick { .. } => {}
            }
        }
    }

    // --- Read surface ---

    pub fn phase(&self) -> GamePhase {
        self.state.phase
    }

    pub fn score(&self) -> GameScore {
        self.state.score
    }

    pub fn problem(&self) -> Option<&MathProblem> {
        self.state.problem.as_ref()
    }

    pub fn blocks(&self) -> &[AnswerBlock] {
        &self.state.blocks
    }

    pub fn countdown(&self) -> u32 {
        self.state.countdown
    }

    pub fn time_remaining_fraction(&self) -> f32 {
        self.state.time_remaining_fraction()
    }

    pub fn player_x(&self) -> f32 {
        self.state.player.pos.x
    }

    pub fn projectile(&self) -> Option<Projectile> {
        self.state.projectile
    }

    pub fn stats(&self) -> &SessionStats {
        &self.stats
    }

    /// Full sim state, read-only (renderers want more than the snapshot).
    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Serializable view of the visible state.
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            phase: self.state.phase,
            score: self.state.score,
            problem: self.state.problem.clone(),
            blocks: self.state.blocks.clone(),
            countdown: self.state.countdown,
            time_remaining: self.state.time_remaining_fraction(),
            player_x: self.state.player.pos.x,
            projectile: self.state.projectile,
            hit_flash: self.state.hit_flash_active(),
        }
    }
}

/// Everything a renderer or test harness needs for one frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub phase: GamePhase,
    pub score: GameScore,
    pub problem: Option<MathProblem>,
    pub blocks: Vec<AnswerBlock>,
    pub countdown: u32,
    pub time_remaining: f32,
    pub player_x: f32,
    pub projectile: Option<Projectile>,
    pub hit_flash: bool,
}

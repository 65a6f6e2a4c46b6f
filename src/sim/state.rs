//! Game state and core simulation types
//!
//! All state that must be persisted for snapshots/determinism lives here.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::difficulty::STARTING_LIVES;
use crate::problem::{Answer, MathProblem, Operation};
use crate::sim::timers::TimerQueue;

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Waiting for the host to start a game
    Menu,
    /// Pre-round countdown (3, 2, 1, go)
    Countdown,
    /// Active gameplay
    Playing,
    /// Game is paused
    Paused,
    /// Level-up banner; returns to Playing on timeout or skip
    LevelUp,
    /// Run ended
    GameOver,
}

/// Scoreboard for the current game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameScore {
    /// Correct answers this game, one point each
    pub score: u32,
    /// Current difficulty level (1-based)
    pub level: u32,
    /// Lives remaining
    pub lives: u32,
    /// Correct answers toward the next level-up; resets on each level-up
    pub correct_in_level: u32,
}

impl Default for GameScore {
    fn default() -> Self {
        Self {
            score: 0,
            level: 1,
            lives: STARTING_LIVES,
            correct_in_level: 0,
        }
    }
}

/// A falling block carrying one candidate answer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnswerBlock {
    pub id: u32,
    pub answer: Answer,
    /// Whether shooting this block solves the current problem
    pub is_correct: bool,
    /// Block center in board space (y grows downward)
    pub pos: Vec2,
}

/// The player's cannon at the bottom of the board
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub pos: Vec2,
}

impl Default for Player {
    fn default() -> Self {
        Self {
            pos: Vec2::new(BOARD_WIDTH / 2.0, PLAYER_Y),
        }
    }
}

/// A shot in flight (at most one at a time)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Projectile {
    pub id: u32,
    pub pos: Vec2,
    /// Velocity in units per second (negative y is up)
    pub vel: Vec2,
}

/// One-shot notifications buffered on the state, drained by the host after
/// each frame
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    /// A fresh problem and its answer blocks entered the board
    RoundStarted { level: u32, operation: Operation },
    /// The correct block was shot
    CorrectHit {
        level: u32,
        operation: Operation,
        new_score: u32,
    },
    /// A distractor block was shot
    WrongHit {
        level: u32,
        operation: Operation,
        lives_remaining: u32,
    },
    /// The blocks reached the impact line unanswered
    Missed {
        level: u32,
        operation: Operation,
        lives_remaining: u32,
    },
    /// Enough correct answers accumulated; the level advanced
    LevelUp {
        new_level: u32,
        tier: u32,
        score: u32,
    },
    /// The new level crossed a tier boundary
    TierChanged { tier: u32, description: &'static str },
    /// The countdown stepped: 3, 2, 1, then 0 for "go"
    CountdownTick { value: u32 },
    /// Lives hit zero; `correct_total` is this game's correct-answer count
    GameOver {
        score: u32,
        level: u32,
        correct_total: u32,
    },
}

/// Complete game state (deterministic, serializable)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    /// Current phase
    pub phase: GamePhase,
    /// Scoreboard
    pub score: GameScore,
    /// The problem being asked, `None` outside an active round
    pub problem: Option<MathProblem>,
    /// Falling candidate blocks for the active round
    pub blocks: Vec<AnswerBlock>,
    /// Player cannon
    pub player: Player,
    /// Shot in flight, if any
    pub projectile: Option<Projectile>,
    /// Countdown display value while in Countdown
    pub countdown: u32,
    /// Seconds of unpaused play since the current round spawned
    pub round_elapsed_secs: f32,
    /// Time budget for the current round, from the level's difficulty
    pub round_time_secs: f32,
    /// Simulation tick counter; pause freezes it, and every pending timer
    /// with it
    pub time_ticks: u64,
    /// Pending phase-transition timers
    pub timers: TimerQueue,
    /// Tick before which another life loss is ignored
    pub wrong_cooldown_until: u64,
    /// Tick until which the correct-hit flash is shown
    pub hit_flash_until: u64,
    /// Gameplay RNG, seeded once per state
    pub rng: Pcg32,
    /// Events since the last drain (transient, rebuilt each frame)
    #[serde(skip)]
    pub events: Vec<GameEvent>,
    /// Next entity ID
    next_id: u32,
}

impl GameState {
    /// Create a new game state with the given seed
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            phase: GamePhase::Menu,
            score: GameScore::default(),
            problem: None,
            blocks: Vec::new(),
            player: Player::default(),
            projectile: None,
            countdown: 0,
            round_elapsed_secs: 0.0,
            round_time_secs: 0.0,
            time_ticks: 0,
            timers: TimerQueue::default(),
            wrong_cooldown_until: 0,
            hit_flash_until: 0,
            rng: Pcg32::seed_from_u64(seed),
            events: Vec::new(),
            next_id: 1,
        }
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Allocate `n` consecutive entity IDs, returning the first
    pub fn allocate_ids(&mut self, n: u32) -> u32 {
        let first = self.next_id;
        self.next_id += n;
        first
    }

    /// Queue an event for the host to drain after this frame
    pub fn emit(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Drain all buffered events
    pub fn take_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// The block that solves the current problem, if a round is active
    pub fn correct_block(&self) -> Option<&AnswerBlock> {
        self.blocks.iter().find(|b| b.is_correct)
    }

    /// Whether no answer blocks remain on the board
    pub fn board_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Fraction of the round's time budget remaining, 0..=1
    ///
    /// Reads 1.0 outside an active round.
    pub fn time_remaining_fraction(&self) -> f32 {
        if self.round_time_secs <= 0.0 {
            return 1.0;
        }
        (1.0 - self.round_elapsed_secs / self.round_time_secs).clamp(0.0, 1.0)
    }

    /// Whether the correct-hit flash is live this tick
    pub fn hit_flash_active(&self) -> bool {
        self.time_ticks < self.hit_flash_until
    }
}

//! Mathfall - an arithmetic-practice arcade game core
//!
//! Core modules:
//! - `difficulty`: Tier table and level resolver (time budgets, operations, digit ranges)
//! - `problem`: Math problem generators with distractor synthesis
//! - `sim`: Deterministic round simulation (falling blocks, collisions, score state)
//! - `session`: Host-facing control and read surfaces around one game session
//! - `stats`: Per-operation telemetry bookkeeping
//! - `feedback`: Fire-and-forget collaborator sinks (audio cues, score reporting)

pub mod difficulty;
pub mod feedback;
pub mod problem;
pub mod session;
pub mod sim;
pub mod stats;

pub use feedback::{FeedbackSink, StatsSink};
pub use session::{GameSession, Snapshot};
pub use stats::SessionStats;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz frame callback)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Frames per second assumed by tick-based timer conversions
    pub const FRAMES_PER_SECOND: f32 = 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Board dimensions (logical pixels)
    pub const BOARD_WIDTH: f32 = 800.0;
    pub const BOARD_HEIGHT: f32 = 600.0;
    /// HUD band at the top; answer blocks spawn just below it
    pub const HUD_MARGIN: f32 = 60.0;
    /// Blocks reaching this line count as missed answers
    pub const IMPACT_LINE_Y: f32 = BOARD_HEIGHT - 80.0;
    /// Horizontal inset the block layout keeps clear on each side
    pub const BOARD_PADDING: f32 = 40.0;

    /// Answer block dimensions
    pub const BLOCK_WIDTH: f32 = 120.0;
    pub const BLOCK_HEIGHT: f32 = 48.0;

    /// Player cannon - slides along the bottom edge
    pub const PLAYER_Y: f32 = BOARD_HEIGHT - 40.0;
    pub const PLAYER_WIDTH: f32 = 48.0;
    pub const PLAYER_SPEED: f32 = 420.0;

    /// Projectile defaults
    pub const PROJECTILE_SPEED: f32 = 720.0;
    pub const PROJECTILE_RADIUS: f32 = 6.0;
    /// Extra slack around a block for the hit test
    pub const HIT_PADDING: f32 = 10.0;

    /// Countdown starts here and steps down once per second
    pub const COUNTDOWN_START: u32 = 3;
    pub const COUNTDOWN_TICK_SECS: f32 = 1.0;
    /// Level-up banner duration (skippable)
    pub const LEVEL_UP_SECS: f32 = 2.0;
    /// Re-entrancy guard after a life loss
    pub const WRONG_COOLDOWN_SECS: f32 = 0.8;
    /// Hit flash duration (read by hosts for feedback tinting)
    pub const HIT_FLASH_SECS: f32 = 0.3;
}

/// Tolerance for comparing canonical answer values
pub const ANSWER_EPSILON: f64 = 1e-6;

/// Compare two answer values for equality within `ANSWER_EPSILON`
#[inline]
pub fn answers_equal(a: f64, b: f64) -> bool {
    (a - b).abs() < ANSWER_EPSILON
}

/// Convert a duration in seconds to whole simulation ticks
#[inline]
pub fn secs_to_ticks(secs: f32) -> u64 {
    (secs * consts::FRAMES_PER_SECOND).round() as u64
}

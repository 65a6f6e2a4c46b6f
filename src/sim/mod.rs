//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Tick-indexed timers only (no wall clock)
//! - No rendering or platform dependencies

pub mod collision;
pub mod round;
pub mod state;
pub mod tick;
pub mod timers;

pub use collision::{block_reached_impact_line, projectile_hits_block, projectile_off_board};
pub use round::build_answer_blocks;
pub use state::{
    AnswerBlock, GameEvent, GamePhase, GameScore, GameState, Player, Projectile,
};
pub use tick::{TickInput, fall_speed, tick};
pub use timers::{TimerKind, TimerQueue};

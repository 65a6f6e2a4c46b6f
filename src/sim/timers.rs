//! Tick-indexed timer queue for deferred phase transitions.
//!
//! Timers fire on the simulation tick counter rather than wall time, so a
//! paused game holds every pending timer in place and a fixed seed replays
//! identically.

use serde::{Deserialize, Serialize};

/// What happens when a timer fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimerKind {
    /// Step the pre-round countdown (3, 2, 1, go).
    CountdownTick,
    /// End the level-up banner and resume play.
    LevelUpEnd,
}

/// A single pending timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduledTimer {
    /// Tick index at which this timer fires.
    pub fires_at: u64,
    /// Action taken when it fires.
    pub kind: TimerKind,
}

/// Queue of pending timers, keyed on the simulation tick counter.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TimerQueue {
    pending: Vec<ScheduledTimer>,
}

impl TimerQueue {
    /// Schedule `kind` to fire `delay_ticks` ticks after `now`.
    pub fn schedule(&mut self, now: u64, delay_ticks: u64, kind: TimerKind) {
        self.pending.push(ScheduledTimer {
            fires_at: now + delay_ticks,
            kind,
        });
    }

    /// Drop every pending timer of the given kind.
    pub fn cancel(&mut self, kind: TimerKind) {
        self.pending.retain(|t| t.kind != kind);
    }

    /// Drop all pending timers.
    pub fn clear(&mut self) {
        self.pending.clear();
    }

    /// Remove and return every timer due at or before `now`, oldest first.
    pub fn drain_due(&mut self, now: u64) -> Vec<TimerKind> {
        let mut due: Vec<ScheduledTimer> = self
            .pending
            .iter()
            .copied()
            .filter(|t| t.fires_at <= now)
            .collect();
        self.pending.retain(|t| t.fires_at > now);
        due.sort_by_key(|t| t.fires_at);
        due.into_iter().map(|t| t.kind).collect()
    }

    /// Whether a timer of the given kind is pending.
    pub fn is_scheduled(&self, kind: TimerKind) -> bool {
        self.pending.iter().any(|t| t.kind == kind)
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

//! Countdown state and the read-only snapshot handed to displays

use std::fmt;

use serde::Serialize;

use super::TimerConfiguration;
use crate::utils::format_clock;

/// Segment of the workout cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TimerPhase {
    Prep,
    Work,
    Rest,
    Finished,
}

impl TimerPhase {
    pub fn label(&self) -> &'static str {
        match self {
            TimerPhase::Prep => "PREP",
            TimerPhase::Work => "WORK",
            TimerPhase::Rest => "REST",
            TimerPhase::Finished => "FINISHED",
        }
    }
}

impl fmt::Display for TimerPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Mutable countdown state, owned by the engine
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimerState {
    pub phase: TimerPhase,
    pub seconds_remaining: u32,
    pub current_round: u32,
    /// Work and rest seconds only
    pub total_elapsed_seconds: u64,
    pub is_running: bool,
    pub is_muted: bool,
    pub reset_pending: bool,
}

impl TimerState {
    /// Fresh state for a run that has not been started yet
    pub fn new(config: &TimerConfiguration) -> Self {
        Self {
            phase: TimerPhase::Prep,
            seconds_remaining: config.prep_seconds(),
            current_round: 1,
            total_elapsed_seconds: 0,
            is_running: false,
            is_muted: false,
            reset_pending: false,
        }
    }

    pub fn is_finished(&self) -> bool {
        self.phase == TimerPhase::Finished
    }

    pub fn snapshot(&self, config: &TimerConfiguration) -> TimerSnapshot {
        TimerSnapshot {
            phase: self.phase,
            seconds_remaining: self.seconds_remaining,
            remaining_clock: format_clock(u64::from(self.seconds_remaining)),
            current_round: self.current_round,
            total_rounds: config.rounds(),
            total_elapsed_seconds: self.total_elapsed_seconds,
            elapsed_clock: format_clock(self.total_elapsed_seconds),
            is_running: self.is_running,
            is_muted: self.is_muted,
            reset_pending: self.reset_pending,
        }
    }
}

/// Read-only view of the timer published after every mutation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TimerSnapshot {
    pub phase: TimerPhase,
    pub seconds_remaining: u32,
    pub remaining_clock: String,
    pub current_round: u32,
    pub total_rounds: u32,
    pub total_elapsed_seconds: u64,
    pub elapsed_clock: String,
    pub is_running: bool,
    pub is_muted: bool,
    pub reset_pending: bool,
}

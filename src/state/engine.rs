//! Interval timer state machine
//!
//! The engine owns all countdown state. Each tick or intent is one
//! synchronous update followed by a single observer notification.

use std::{fmt, str::FromStr, sync::Arc};

use tracing::{debug, info};

use super::{TimerConfiguration, TimerPhase, TimerSnapshot, TimerState};
use crate::services::{Cue, CueEvent, CueSink, StateObserver};

/// Seconds left at which the countdown cue starts
const COUNTDOWN_FROM: u32 = 5;

/// User commands accepted by the engine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    TogglePlay,
    ToggleMute,
    RequestReset,
    ConfirmReset,
    CancelReset,
}

impl FromStr for Intent {
    type Err = String;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        match input.trim().to_lowercase().as_str() {
            "" | "p" | "play" | "pause" => Ok(Intent::TogglePlay),
            "m" | "mute" | "unmute" => Ok(Intent::ToggleMute),
            "r" | "reset" => Ok(Intent::RequestReset),
            "y" | "yes" => Ok(Intent::ConfirmReset),
            "n" | "no" => Ok(Intent::CancelReset),
            other => Err(format!("unknown command '{}'", other)),
        }
    }
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Intent::TogglePlay => "toggle-play",
            Intent::ToggleMute => "toggle-mute",
            Intent::RequestReset => "request-reset",
            Intent::ConfirmReset => "confirm-reset",
            Intent::CancelReset => "cancel-reset",
        };
        f.write_str(name)
    }
}

/// What an intent did to the engine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntentOutcome {
    Applied,
    Ignored,
    /// The run is over and the host should go back to setup
    ResetConfirmed,
}

pub struct TimerEngine {
    config: TimerConfiguration,
    state: TimerState,
    sink: Arc<dyn CueSink>,
    observers: Vec<Box<dyn StateObserver>>,
}

impl fmt::Debug for TimerEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TimerEngine")
            .field("config", &self.config)
            .field("state", &self.state)
            .field("observers", &self.observers.len())
            .finish()
    }
}

impl TimerEngine {
    pub fn new(config: TimerConfiguration, sink: Arc<dyn CueSink>) -> Self {
        Self {
            state: TimerState::new(&config),
            config,
            sink,
            observers: Vec::new(),
        }
    }

    /// Register an observer and hand it the current snapshot
    pub fn add_observer(&mut self, mut observer: Box<dyn StateObserver>) {
        observer.on_snapshot(&self.snapshot());
        self.observers.push(observer);
    }

    pub fn config(&self) -> &TimerConfiguration {
        &self.config
    }

    pub fn state(&self) -> &TimerState {
        &self.state
    }

    pub fn snapshot(&self) -> TimerSnapshot {
        self.state.snapshot(&self.config)
    }

    pub fn is_running(&self) -> bool {
        self.state.is_running
    }

    /// Advance the clock by one second.
    ///
    /// Returns the cues raised by this tick. A tick delivered while paused
    /// or finished changes nothing and notifies nobody.
    pub fn tick(&mut self) -> Vec<CueEvent> {
        if !self.state.is_running {
            debug!("Tick ignored, timer not running");
            return Vec::new();
        }

        let mut cues = Vec::new();

        if self.state.seconds_remaining == 0 {
            self.resolve_boundary(&mut cues);
        }

        if !self.state.is_finished() {
            self.count_down(&mut cues);
            if self.state.seconds_remaining == 0 {
                self.resolve_boundary(&mut cues);
            }
        }

        debug!(
            "Tick: {} {}s round {}/{} elapsed {}s",
            self.state.phase,
            self.state.seconds_remaining,
            self.state.current_round,
            self.config.rounds(),
            self.state.total_elapsed_seconds
        );

        for event in &cues {
            self.sink.play(*event);
        }
        self.notify();
        cues
    }

    /// Apply a user command
    pub fn apply(&mut self, intent: Intent) -> IntentOutcome {
        let outcome = match intent {
            Intent::TogglePlay => self.toggle_play(),
            Intent::ToggleMute => {
                self.state.is_muted = !self.state.is_muted;
                info!("Mute set to: {}", self.state.is_muted);
                IntentOutcome::Applied
            }
            Intent::RequestReset => {
                self.state.reset_pending = true;
                IntentOutcome::Applied
            }
            Intent::CancelReset => {
                if self.state.reset_pending {
                    self.state.reset_pending = false;
                    IntentOutcome::Applied
                } else {
                    IntentOutcome::Ignored
                }
            }
            Intent::ConfirmReset => {
                if self.state.reset_pending {
                    info!("Reset confirmed, discarding run");
                    self.state.reset_pending = false;
                    self.state.is_running = false;
                    IntentOutcome::ResetConfirmed
                } else {
                    debug!("Reset confirmation without a pending request");
                    IntentOutcome::Ignored
                }
            }
        };

        if outcome != IntentOutcome::Ignored {
            self.notify();
        }
        outcome
    }

    fn toggle_play(&mut self) -> IntentOutcome {
        if self.state.is_finished() {
            debug!("Play toggled on a finished run, ignoring");
            return IntentOutcome::Ignored;
        }

        self.state.is_running = !self.state.is_running;
        if self.state.is_running {
            info!(
                "Timer running: {} {}s, round {}/{}",
                self.state.phase,
                self.state.seconds_remaining,
                self.state.current_round,
                self.config.rounds()
            );
        } else {
            info!("Timer paused");
        }
        IntentOutcome::Applied
    }

    fn count_down(&mut self, cues: &mut Vec<CueEvent>) {
        let remaining = self.state.seconds_remaining;
        if remaining == 1 {
            cues.push(CueEvent::new(Cue::PhaseSwitch, self.state.is_muted));
        } else if remaining < COUNTDOWN_FROM {
            cues.push(CueEvent::new(Cue::Countdown, self.state.is_muted));
        }

        self.state.seconds_remaining = remaining - 1;
        if self.state.phase != TimerPhase::Prep {
            self.state.total_elapsed_seconds += 1;
        }
    }

    /// Apply transition rules until a phase with time left, or the end, is reached
    fn resolve_boundary(&mut self, cues: &mut Vec<CueEvent>) {
        while self.state.seconds_remaining == 0 {
            match self.state.phase {
                TimerPhase::Prep => self.enter(TimerPhase::Work, self.config.work_seconds()),
                TimerPhase::Work if self.state.current_round < self.config.rounds() => {
                    if self.config.work_seconds() == 0 && self.config.rest_seconds() == 0 {
                        // Remaining rounds are all zero length
                        debug!("Skipping to round {} of zero-length rounds", self.config.rounds());
                        self.state.current_round = self.config.rounds();
                    } else {
                        self.enter(TimerPhase::Rest, self.config.rest_seconds());
                    }
                }
                TimerPhase::Work => {
                    self.enter(TimerPhase::Finished, 0);
                    self.state.is_running = false;
                    cues.push(CueEvent::new(Cue::Finish, self.state.is_muted));
                    info!(
                        "Workout finished after {} rounds, {}s elapsed",
                        self.config.rounds(),
                        self.state.total_elapsed_seconds
                    );
                    return;
                }
                TimerPhase::Rest => {
                    self.state.current_round += 1;
                    self.enter(TimerPhase::Work, self.config.work_seconds());
                }
                TimerPhase::Finished => {
                    self.state.is_running = false;
                    return;
                }
            }
        }
    }

    fn enter(&mut self, phase: TimerPhase, seconds: u32) {
        debug!("Entering {} for {}s", phase, seconds);
        self.state.phase = phase;
        self.state.seconds_remaining = seconds;
    }

    fn notify(&mut self) {
        let snapshot = self.snapshot();
        for observer in self.observers.iter_mut() {
            observer.on_snapshot(&snapshot);
        }
    }
}

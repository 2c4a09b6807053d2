//! Workout configuration value and its validation

use std::fmt;

use crate::utils::format_clock;

/// Error raised when a configuration cannot describe a workout
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    InvalidConfiguration(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidConfiguration(message) => {
                write!(f, "Invalid configuration: {message}")
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Immutable durations and round count for one workout
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerConfiguration {
    prep_seconds: u32,
    work_seconds: u32,
    rest_seconds: u32,
    rounds: u32,
}

impl TimerConfiguration {
    /// Validate raw user values and build a configuration.
    ///
    /// Durations must be non-negative and `rounds` at least 1. A zero work
    /// duration is accepted; the engine passes through zero-length phases.
    pub fn new(
        prep_seconds: i64,
        work_seconds: i64,
        rest_seconds: i64,
        rounds: i64,
    ) -> Result<Self, ConfigError> {
        if rounds < 1 {
            return Err(ConfigError::InvalidConfiguration(format!(
                "rounds must be at least 1, got {rounds}"
            )));
        }

        Ok(Self {
            prep_seconds: seconds_field("prep", prep_seconds)?,
            work_seconds: seconds_field("work", work_seconds)?,
            rest_seconds: seconds_field("rest", rest_seconds)?,
            rounds: u32::try_from(rounds).map_err(|_| {
                ConfigError::InvalidConfiguration(format!("rounds out of range: {rounds}"))
            })?,
        })
    }

    pub fn prep_seconds(&self) -> u32 {
        self.prep_seconds
    }

    pub fn work_seconds(&self) -> u32 {
        self.work_seconds
    }

    pub fn rest_seconds(&self) -> u32 {
        self.rest_seconds
    }

    pub fn rounds(&self) -> u32 {
        self.rounds
    }

    /// Planned workout length, excluding preparation
    pub fn total_planned_seconds(&self) -> u64 {
        u64::from(self.rounds) * (u64::from(self.work_seconds) + u64::from(self.rest_seconds))
    }
}

impl Default for TimerConfiguration {
    fn default() -> Self {
        Self {
            prep_seconds: 10,
            work_seconds: 30,
            rest_seconds: 30,
            rounds: 10,
        }
    }
}

impl fmt::Display for TimerConfiguration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "prep {} | work {} | rest {} | rounds {} | total {}",
            format_clock(u64::from(self.prep_seconds)),
            format_clock(u64::from(self.work_seconds)),
            format_clock(u64::from(self.rest_seconds)),
            self.rounds,
            format_clock(self.total_planned_seconds()),
        )
    }
}

fn seconds_field(name: &str, value: i64) -> Result<u32, ConfigError> {
    if value < 0 {
        return Err(ConfigError::InvalidConfiguration(format!(
            "{name} duration must not be negative, got {value}"
        )));
    }
    u32::try_from(value).map_err(|_| {
        ConfigError::InvalidConfiguration(format!("{name} duration out of range: {value}"))
    })
}

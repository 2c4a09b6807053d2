//! Configuration and CLI argument handling

use clap::Parser;

use crate::{
    state::{ConfigError, TimerConfiguration},
    utils::parse_duration,
};

/// CLI argument parsing structure
#[derive(Parser, Debug)]
#[command(name = "hiit-timer")]
#[command(about = "Interval workout timer with prep, work and rest phases")]
#[command(version = "1.0.0")]
pub struct Config {
    /// Preparation time before the first round (SS or MM:SS)
    #[arg(long, default_value = "0:10", value_parser = parse_duration, allow_hyphen_values = true)]
    pub prep: i64,

    /// Work time per round (SS or MM:SS)
    #[arg(short, long, default_value = "0:30", value_parser = parse_duration, allow_hyphen_values = true)]
    pub work: i64,

    /// Rest time between rounds (SS or MM:SS)
    #[arg(short, long, default_value = "0:30", value_parser = parse_duration, allow_hyphen_values = true)]
    pub rest: i64,

    /// Number of work rounds
    #[arg(short = 'n', long, default_value = "10", allow_hyphen_values = true)]
    pub rounds: i64,

    /// Start counting down immediately instead of waiting for play
    #[arg(short, long)]
    pub autostart: bool,

    /// Print snapshots as JSON lines instead of status text
    #[arg(long)]
    pub json: bool,

    /// Do not ring the terminal bell
    #[arg(short, long)]
    pub silent: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Config {
    /// Parse configuration from command line arguments
    pub fn parse() -> Self {
        Parser::parse()
    }

    /// Validate the duration flags into a workout configuration
    pub fn timer_configuration(&self) -> Result<TimerConfiguration, ConfigError> {
        TimerConfiguration::new(self.prep, self.work, self.rest, self.rounds)
    }

    /// Get the appropriate log level based on verbose flag
    pub fn log_level(&self) -> &'static str {
        if self.verbose { "debug" } else { "info" }
    }
}

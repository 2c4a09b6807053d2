//! HIIT Timer - a terminal interval workout timer
//! 
//! This library provides the countdown state machine that cycles through
//! prep, work and rest phases, the one-second tick scheduler that drives it,
//! and the sound and display collaborators it reports to.

pub mod config;
pub mod input;
pub mod services;
pub mod state;
pub mod tasks;
pub mod utils;

// Re-export commonly used types
pub use config::Config;
pub use state::{TimerConfiguration, TimerEngine, TimerSession};
pub use tasks::tick_scheduler_task;
pub use utils::signals::shutdown_signal;

//! State management module
//! 
//! Workout configuration, the countdown state machine and the shared session
//! that the input loop and tick scheduler operate on.

pub mod configuration;
pub mod engine;
pub mod session;
pub mod timer_state;

// Re-export main types
pub use configuration::{ConfigError, TimerConfiguration};
pub use engine::{Intent, IntentOutcome, TimerEngine};
pub use session::{ScheduleSignal, TimerSession};
pub use timer_state::{TimerPhase, TimerSnapshot, TimerState};

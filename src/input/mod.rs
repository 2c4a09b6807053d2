//! Terminal input module
//! 
//! Turns stdin lines into engine intents while a run is active, and into a
//! new workout configuration at the setup step.

pub mod handlers;
pub mod setup;

// Re-export main functions
pub use handlers::{handle_line, LineAction, HELP};
pub use setup::{parse_settings, SetupChoice};

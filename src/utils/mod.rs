//! Utility functions module
//! 
//! Clock formatting and process signal handling shared by the binary and library.

pub mod clock;
pub mod signals;

// Re-export main functions
pub use clock::{format_clock, parse_duration};
pub use signals::shutdown_signal;

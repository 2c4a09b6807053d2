//! Collaborator interfaces module
//! 
//! Sound cue sinks and snapshot observers the engine reports to.

pub mod display;
pub mod sound;

// Re-export main types
pub use display::{JsonDisplay, StateObserver, TerminalDisplay};
pub use sound::{Cue, CueEvent, CueLog, CueSink, SilentSink, TerminalBell};

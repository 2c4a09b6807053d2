//! Background tasks module
//! 
//! This module contains the tasks that run alongside the input loop.

pub mod tick_scheduler;

// Re-export main functions
pub use tick_scheduler::{tick_scheduler_task, TICK_PERIOD};

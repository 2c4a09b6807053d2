//! Run-time command handlers

use tracing::{error, info, warn};

use crate::state::{Intent, IntentOutcome, TimerSession};

/// Key summary shown at the start of a run and after bad input
pub const HELP: &str =
    "commands: <enter>/p play-pause | m mute | r reset | y/n confirm reset | q quit";

/// What the input loop should do after a line was handled
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineAction {
    Continue,
    /// Reset confirmed, go back to setup
    ReturnToSetup,
    Quit,
}

/// Handle one line typed while a run is active
pub fn handle_line(session: &TimerSession, line: &str) -> LineAction {
    let trimmed = line.trim();
    if matches!(trimmed, "q" | "quit" | "exit") {
        info!("Quit requested");
        return LineAction::Quit;
    }

    let intent = match trimmed.parse::<Intent>() {
        Ok(intent) => intent,
        Err(e) => {
            warn!("{}", e);
            eprintln!("{}", HELP);
            return LineAction::Continue;
        }
    };

    match session.dispatch(intent) {
        Ok(IntentOutcome::ResetConfirmed) => LineAction::ReturnToSetup,
        Ok(IntentOutcome::Applied) => LineAction::Continue,
        Ok(IntentOutcome::Ignored) => {
            info!("Command {} ignored in current state", intent);
            LineAction::Continue
        }
        Err(e) => {
            error!("Failed to apply {}: {}", intent, e);
            LineAction::Continue
        }
    }
}

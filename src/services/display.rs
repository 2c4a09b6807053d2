//! Snapshot observers used to render the running timer

use std::io::Write;

use tokio::sync::watch;
use tracing::warn;

use crate::state::TimerSnapshot;

/// Receives a snapshot after every engine mutation
pub trait StateObserver: Send {
    fn on_snapshot(&mut self, snapshot: &TimerSnapshot);
}

/// Human-readable status line per snapshot on stdout
#[derive(Debug, Default)]
pub struct TerminalDisplay;

impl TerminalDisplay {
    pub fn new() -> Self {
        Self
    }

    pub fn render(snapshot: &TimerSnapshot) -> String {
        let mut line = format!(
            "[{:<8}] {}  round {}/{}  elapsed {}  {}",
            snapshot.phase.label(),
            snapshot.remaining_clock,
            snapshot.current_round,
            snapshot.total_rounds,
            snapshot.elapsed_clock,
            if snapshot.is_running { "running" } else { "paused" },
        );
        if snapshot.is_muted {
            line.push_str("  muted");
        }
        if snapshot.reset_pending {
            line.push_str("  reset and return to setup? (y/n)");
        }
        line
    }
}

impl StateObserver for TerminalDisplay {
    fn on_snapshot(&mut self, snapshot: &TimerSnapshot) {
        let mut stdout = std::io::stdout().lock();
        if let Err(e) = writeln!(stdout, "{}", Self::render(snapshot)) {
            warn!("Failed to write status line: {}", e);
        }
    }
}

/// One JSON object per snapshot on stdout
#[derive(Debug, Default)]
pub struct JsonDisplay;

impl JsonDisplay {
    pub fn new() -> Self {
        Self
    }
}

impl StateObserver for JsonDisplay {
    fn on_snapshot(&mut self, snapshot: &TimerSnapshot) {
        match serde_json::to_string(snapshot) {
            Ok(json) => {
                let mut stdout = std::io::stdout().lock();
                if let Err(e) = writeln!(stdout, "{}", json) {
                    warn!("Failed to write snapshot: {}", e);
                }
            }
            Err(e) => warn!("Failed to serialize snapshot: {}", e),
        }
    }
}

impl StateObserver for watch::Sender<TimerSnapshot> {
    fn on_snapshot(&mut self, snapshot: &TimerSnapshot) {
        self.send_replace(snapshot.clone());
    }
}

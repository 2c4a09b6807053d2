//! Cue events and the sinks that turn them into sound

use std::{
    io::Write,
    sync::Mutex,
};

use tracing::{debug, warn};

/// Which sound the engine asks for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cue {
    Countdown,
    PhaseSwitch,
    Finish,
}

/// A cue request with its effective volume in `[0, 1]`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CueEvent {
    pub cue: Cue,
    pub volume: f32,
}

impl CueEvent {
    pub fn new(cue: Cue, muted: bool) -> Self {
        Self {
            cue,
            volume: if muted { 0.0 } else { 1.0 },
        }
    }

    pub fn is_audible(&self) -> bool {
        self.volume > 0.0
    }
}

/// Receiver of cue requests. Playback never blocks the caller and
/// failures stay inside the sink.
pub trait CueSink: Send + Sync {
    fn play(&self, event: CueEvent);
}

/// Rings the terminal bell on stderr, more rings for stronger cues
#[derive(Debug, Default)]
pub struct TerminalBell;

impl TerminalBell {
    pub fn new() -> Self {
        Self
    }

    fn rings(cue: Cue) -> usize {
        match cue {
            Cue::Countdown => 1,
            Cue::PhaseSwitch => 2,
            Cue::Finish => 3,
        }
    }
}

impl CueSink for TerminalBell {
    fn play(&self, event: CueEvent) {
        if !event.is_audible() {
            debug!("Cue {:?} muted", event.cue);
            return;
        }

        let bells = "\x07".repeat(Self::rings(event.cue));
        let mut stderr = std::io::stderr().lock();
        if let Err(e) = stderr.write_all(bells.as_bytes()).and_then(|_| stderr.flush()) {
            warn!("Failed to ring terminal bell: {}", e);
        }
    }
}

/// Drops every cue
#[derive(Debug, Default)]
pub struct SilentSink;

impl CueSink for SilentSink {
    fn play(&self, event: CueEvent) {
        debug!("Silent sink dropped cue {:?}", event.cue);
    }
}

/// Keeps every cue it receives, in order
#[derive(Debug, Default)]
pub struct CueLog {
    events: Mutex<Vec<CueEvent>>,
}

impl CueLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<CueEvent> {
        self.events
            .lock()
            .map(|events| events.clone())
            .unwrap_or_default()
    }

    pub fn count(&self, cue: Cue) -> usize {
        self.events().iter().filter(|event| event.cue == cue).count()
    }
}

impl CueSink for CueLog {
    fn play(&self, event: CueEvent) {
        match self.events.lock() {
            Ok(mut events) => events.push(event),
            Err(e) => warn!("Failed to record cue: {}", e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn muted_events_carry_zero_volume() {
        assert_eq!(CueEvent::new(Cue::Finish, true).volume, 0.0);
        assert_eq!(CueEvent::new(Cue::Finish, false).volume, 1.0);
        assert!(!CueEvent::new(Cue::Countdown, true).is_audible());
    }

    #[test]
    fn cue_log_records_in_order() {
        let log = CueLog::new();
        log.play(CueEvent::new(Cue::Countdown, false));
        log.play(CueEvent::new(Cue::PhaseSwitch, true));

        let cues: Vec<Cue> = log.events().iter().map(|event| event.cue).collect();
        assert_eq!(cues, vec![Cue::Countdown, Cue::PhaseSwitch]);
        assert_eq!(log.count(Cue::PhaseSwitch), 1);
    }
}

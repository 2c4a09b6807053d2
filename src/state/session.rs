//! Shared handle around one running workout

use std::{
    sync::{Arc, Mutex},
    time::Instant,
};
use chrono::{DateTime, Utc};
use tokio::sync::watch;
use tracing::{debug, info, warn};

use super::{Intent, IntentOutcome, TimerConfiguration, TimerEngine, TimerSnapshot};
use crate::services::{CueSink, StateObserver};

/// What the tick scheduler should be doing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScheduleSignal {
    Paused,
    Running,
    /// The run is gone; the scheduler must exit
    Discarded,
}

/// Session state shared between the input loop and the tick scheduler.
///
/// The engine sits behind one mutex so that a tick and an intent can never
/// interleave. It becomes `None` once the run is discarded.
#[derive(Debug)]
pub struct TimerSession {
    engine: Mutex<Option<TimerEngine>>,
    config: TimerConfiguration,
    /// Latest snapshot for async consumers
    pub snapshot_tx: watch::Sender<TimerSnapshot>,
    /// Desired scheduler state, derived after every mutation
    pub schedule_tx: watch::Sender<ScheduleSignal>,
    /// Keep the receiver alive to prevent channel closure
    _schedule_rx: watch::Receiver<ScheduleSignal>,
    pub created_at: Instant,
    last_intent: Mutex<Option<(Intent, DateTime<Utc>)>>,
}

impl TimerSession {
    /// Build a paused session for `config`, reporting cues to `sink`
    pub fn new(config: TimerConfiguration, sink: Arc<dyn CueSink>) -> Self {
        let mut engine = TimerEngine::new(config, sink);
        let (snapshot_tx, _) = watch::channel(engine.snapshot());
        let (schedule_tx, schedule_rx) = watch::channel(ScheduleSignal::Paused);

        engine.add_observer(Box::new(snapshot_tx.clone()));

        Self {
            engine: Mutex::new(Some(engine)),
            config,
            snapshot_tx,
            schedule_tx,
            _schedule_rx: schedule_rx,
            created_at: Instant::now(),
            last_intent: Mutex::new(None),
        }
    }

    pub fn config(&self) -> &TimerConfiguration {
        &self.config
    }

    /// Attach a display; it immediately receives the current snapshot
    pub fn add_observer(&self, observer: Box<dyn StateObserver>) -> Result<(), String> {
        let mut engine = self.engine.lock()
            .map_err(|e| format!("Failed to lock timer engine: {}", e))?;

        match engine.as_mut() {
            Some(engine) => {
                engine.add_observer(observer);
                Ok(())
            }
            None => Err("Timer session already discarded".to_string()),
        }
    }

    /// Deliver one scheduler tick. No-op once paused, finished or discarded.
    pub fn tick(&self) -> Result<(), String> {
        let mut guard = self.engine.lock()
            .map_err(|e| format!("Failed to lock timer engine: {}", e))?;

        let Some(engine) = guard.as_mut() else {
            debug!("Tick after discard ignored");
            return Ok(());
        };

        engine.tick();
        let signal = Self::signal_for(engine);
        drop(guard);

        self.publish_signal(signal);
        Ok(())
    }

    /// Apply a user intent and update the scheduler signal
    pub fn dispatch(&self, intent: Intent) -> Result<IntentOutcome, String> {
        let mut guard = self.engine.lock()
            .map_err(|e| format!("Failed to lock timer engine: {}", e))?;

        let Some(engine) = guard.as_mut() else {
            warn!("Intent {} after discard ignored", intent);
            return Ok(IntentOutcome::Ignored);
        };

        let outcome = engine.apply(intent);
        let mut signal = Self::signal_for(engine);
        if outcome == IntentOutcome::ResetConfirmed {
            *guard = None;
            signal = ScheduleSignal::Discarded;
        }
        drop(guard);

        if outcome != IntentOutcome::Ignored {
            if let Ok(mut last_intent) = self.last_intent.lock() {
                *last_intent = Some((intent, Utc::now()));
            }
        }

        self.publish_signal(signal);
        Ok(outcome)
    }

    /// Discard the run without a reset prompt, used when the host quits
    pub fn discard(&self) -> Result<(), String> {
        let mut guard = self.engine.lock()
            .map_err(|e| format!("Failed to lock timer engine: {}", e))?;

        if guard.take().is_some() {
            info!("Timer session discarded");
        }
        drop(guard);

        self.publish_signal(ScheduleSignal::Discarded);
        Ok(())
    }

    /// Current snapshot, `None` once discarded
    pub fn snapshot(&self) -> Result<Option<TimerSnapshot>, String> {
        self.engine.lock()
            .map(|engine| engine.as_ref().map(TimerEngine::snapshot))
            .map_err(|e| format!("Failed to lock timer engine: {}", e))
    }

    pub fn schedule_signal(&self) -> ScheduleSignal {
        *self.schedule_tx.borrow()
    }

    pub fn subscribe_schedule(&self) -> watch::Receiver<ScheduleSignal> {
        self.schedule_tx.subscribe()
    }

    pub fn subscribe_snapshots(&self) -> watch::Receiver<TimerSnapshot> {
        self.snapshot_tx.subscribe()
    }

    /// Wait until the timer stops running (paused, finished or discarded)
    pub async fn wait_until_idle(&self) {
        let mut rx = self.subscribe_schedule();
        if rx.wait_for(|signal| *signal != ScheduleSignal::Running).await.is_err() {
            warn!("Schedule channel closed while waiting for idle");
        }
    }

    /// Last applied intent and when it happened
    pub fn last_intent(&self) -> Option<(Intent, DateTime<Utc>)> {
        self.last_intent.lock().ok().and_then(|intent| *intent)
    }

    fn signal_for(engine: &TimerEngine) -> ScheduleSignal {
        if engine.is_running() {
            ScheduleSignal::Running
        } else {
            ScheduleSignal::Paused
        }
    }

    fn publish_signal(&self, signal: ScheduleSignal) {
        // Discarded is terminal
        let changed = self.schedule_tx.send_if_modified(|current| {
            if *current == signal || *current == ScheduleSignal::Discarded {
                false
            } else {
                *current = signal;
                true
            }
        });
        if changed {
            debug!("Schedule signal set to: {:?}", signal);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::CueLog;

    fn session(prep: i64, work: i64, rest: i64, rounds: i64) -> TimerSession {
        let config = TimerConfiguration::new(prep, work, rest, rounds).unwrap();
        TimerSession::new(config, Arc::new(CueLog::new()))
    }

    #[test]
    fn signal_follows_running_flag() {
        let session = session(1, 1, 0, 1);
        assert_eq!(session.schedule_signal(), ScheduleSignal::Paused);

        session.dispatch(Intent::TogglePlay).unwrap();
        assert_eq!(session.schedule_signal(), ScheduleSignal::Running);

        session.tick().unwrap();
        session.tick().unwrap();
        assert_eq!(session.schedule_signal(), ScheduleSignal::Paused);
        assert!(session.snapshot().unwrap().unwrap().phase == crate::state::TimerPhase::Finished);
    }

    #[test]
    fn confirmed_reset_discards_engine() {
        let session = session(3, 5, 2, 2);
        session.dispatch(Intent::TogglePlay).unwrap();
        session.dispatch(Intent::RequestReset).unwrap();

        let outcome = session.dispatch(Intent::ConfirmReset).unwrap();
        assert_eq!(outcome, IntentOutcome::ResetConfirmed);
        assert_eq!(session.schedule_signal(), ScheduleSignal::Discarded);
        assert_eq!(session.snapshot().unwrap(), None);

        session.tick().unwrap();
        assert_eq!(session.dispatch(Intent::TogglePlay).unwrap(), IntentOutcome::Ignored);
        assert_eq!(session.schedule_signal(), ScheduleSignal::Discarded);
    }

    #[test]
    fn snapshot_channel_tracks_ticks() {
        let session = session(3, 5, 2, 2);
        let rx = session.subscribe_snapshots();
        session.dispatch(Intent::TogglePlay).unwrap();
        session.tick().unwrap();

        assert_eq!(rx.borrow().seconds_remaining, 2);
        assert!(rx.borrow().is_running);
    }

    #[test]
    fn records_last_applied_intent() {
        let session = session(3, 5, 2, 2);
        assert!(session.last_intent().is_none());

        session.dispatch(Intent::ConfirmReset).unwrap();
        assert!(session.last_intent().is_none());

        session.dispatch(Intent::ToggleMute).unwrap();
        assert_eq!(session.last_intent().map(|(intent, _)| intent), Some(Intent::ToggleMute));
    }
}

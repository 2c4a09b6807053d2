//! One-second tick scheduler background task

use std::{sync::Arc, time::Duration};
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::{debug, error, info};

use crate::state::{ScheduleSignal, TimerSession};

/// Wall-clock length of one tick
pub const TICK_PERIOD: Duration = Duration::from_secs(1);

/// Background task that delivers ticks to the session while it is running.
///
/// Exactly one interval exists while the signal is `Running`; it is dropped
/// on every signal change, and the task returns on `Discarded` or when the
/// session can no longer be locked.
pub async fn tick_scheduler_task(session: Arc<TimerSession>) {
    info!("Starting tick scheduler task");

    let mut signal_rx = session.subscribe_schedule();

    loop {
        let signal = *signal_rx.borrow_and_update();
        match signal {
            ScheduleSignal::Discarded => break,
            ScheduleSignal::Paused => {
                if signal_rx.changed().await.is_err() {
                    debug!("Schedule channel closed");
                    break;
                }
            }
            ScheduleSignal::Running => {
                debug!("Arming tick interval");
                let mut interval = interval_at(Instant::now() + TICK_PERIOD, TICK_PERIOD);
                interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

                loop {
                    tokio::select! {
                        // A pause or reset wins over a tick that is ready at the same time
                        biased;

                        // Any change drops this interval, even a pause and resume
                        // merged into one notification
                        changed = signal_rx.changed() => {
                            if changed.is_err() {
                                debug!("Schedule channel closed");
                                info!("Tick scheduler task stopped");
                                return;
                            }
                            break;
                        }

                        _ = interval.tick() => {
                            if let Err(e) = session.tick() {
                                error!("Failed to deliver tick, stopping scheduler: {}", e);
                                info!("Tick scheduler task stopped");
                                return;
                            }
                        }
                    }
                }

                debug!("Tick interval cancelled");
            }
        }
    }

    info!("Tick scheduler task stopped");
}

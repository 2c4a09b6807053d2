use std::{panic::{catch_unwind, AssertUnwindSafe}, sync::Arc, time::Duration};

use hiit_timer::{
    services::{Cue, CueLog, StateObserver},
    state::{Intent, IntentOutcome, ScheduleSignal, TimerConfiguration, TimerPhase, TimerSession, TimerSnapshot},
    tasks::tick_scheduler_task,
};
use tokio::{task::JoinHandle, time::{sleep, timeout, Instant}};

fn start_session(prep: i64, work: i64, rest: i64, rounds: i64) -> (Arc<TimerSession>, Arc<CueLog>, JoinHandle<()>) {
    let log = Arc::new(CueLog::new());
    let config = TimerConfiguration::new(prep, work, rest, rounds).unwrap();
    let session = Arc::new(TimerSession::new(config, log.clone()));
    let scheduler = tokio::spawn(tick_scheduler_task(Arc::clone(&session)));
    (session, log, scheduler)
}

fn snapshot(session: &TimerSession) -> TimerSnapshot {
    session.snapshot().unwrap().expect("session discarded")
}

#[tokio::test(start_paused = true)]
async fn runs_example_workout_to_completion() {
    let (session, log, scheduler) = start_session(3, 5, 2, 2);
    let started = Instant::now();

    session.dispatch(Intent::TogglePlay).unwrap();
    timeout(Duration::from_secs(60), session.wait_until_idle())
        .await
        .expect("workout never finished");

    let finished = snapshot(&session);
    assert_eq!(finished.phase, TimerPhase::Finished);
    assert_eq!(finished.total_elapsed_seconds, 12);
    assert_eq!(finished.current_round, 2);
    assert!(!finished.is_running);
    assert_eq!(started.elapsed(), Duration::from_secs(15));

    assert_eq!(log.count(Cue::Finish), 1);
    assert_eq!(log.count(Cue::PhaseSwitch), 4);
    assert_eq!(session.schedule_signal(), ScheduleSignal::Paused);

    session.discard().unwrap();
    scheduler.await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn pause_freezes_state_until_resumed() {
    let (session, _log, scheduler) = start_session(3, 5, 2, 2);

    session.dispatch(Intent::TogglePlay).unwrap();
    sleep(Duration::from_millis(2500)).await;
    assert_eq!(snapshot(&session).seconds_remaining, 1);

    session.dispatch(Intent::TogglePlay).unwrap();
    let frozen = snapshot(&session);
    sleep(Duration::from_secs(10)).await;
    assert_eq!(snapshot(&session), frozen);

    session.dispatch(Intent::TogglePlay).unwrap();
    sleep(Duration::from_millis(1500)).await;
    let resumed = snapshot(&session);
    assert_eq!(resumed.phase, TimerPhase::Work);
    assert_eq!(resumed.seconds_remaining, 5);

    session.discard().unwrap();
    scheduler.await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn rapid_toggles_leave_a_single_schedule() {
    let (session, _log, scheduler) = start_session(10, 5, 2, 2);

    for _ in 0..3 {
        session.dispatch(Intent::TogglePlay).unwrap();
        tokio::task::yield_now().await;
        session.dispatch(Intent::TogglePlay).unwrap();
        tokio::task::yield_now().await;
    }
    session.dispatch(Intent::TogglePlay).unwrap();

    sleep(Duration::from_millis(3500)).await;
    assert_eq!(snapshot(&session).seconds_remaining, 7);

    session.discard().unwrap();
    scheduler.await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn confirmed_reset_stops_scheduler() {
    let (session, log, scheduler) = start_session(3, 5, 2, 2);

    session.dispatch(Intent::TogglePlay).unwrap();
    sleep(Duration::from_millis(1500)).await;

    assert_eq!(session.dispatch(Intent::ConfirmReset).unwrap(), IntentOutcome::Ignored);
    session.dispatch(Intent::RequestReset).unwrap();
    assert_eq!(session.dispatch(Intent::ConfirmReset).unwrap(), IntentOutcome::ResetConfirmed);

    timeout(Duration::from_secs(5), scheduler)
        .await
        .expect("scheduler kept running after reset")
        .unwrap();

    let cues_at_reset = log.events().len();
    sleep(Duration::from_secs(10)).await;
    assert_eq!(log.events().len(), cues_at_reset);
    assert_eq!(session.snapshot().unwrap(), None);
}

#[tokio::test(start_paused = true)]
async fn muted_run_keeps_timing() {
    let (session, log, scheduler) = start_session(0, 3, 1, 2);

    session.dispatch(Intent::ToggleMute).unwrap();
    session.dispatch(Intent::TogglePlay).unwrap();
    timeout(Duration::from_secs(60), session.wait_until_idle())
        .await
        .expect("workout never finished");

    assert_eq!(snapshot(&session).total_elapsed_seconds, 7);
    assert!(!log.events().is_empty());
    assert!(log.events().iter().all(|event| event.volume == 0.0));

    session.discard().unwrap();
    scheduler.await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn quick_pause_and_resume_rearms_the_interval() {
    let (session, _log, scheduler) = start_session(10, 5, 2, 2);

    session.dispatch(Intent::TogglePlay).unwrap();
    sleep(Duration::from_millis(900)).await;

    // Both land before the scheduler wakes, so it sees a single change
    session.dispatch(Intent::TogglePlay).unwrap();
    session.dispatch(Intent::TogglePlay).unwrap();

    sleep(Duration::from_millis(200)).await;
    assert_eq!(snapshot(&session).seconds_remaining, 10);

    sleep(Duration::from_millis(900)).await;
    assert_eq!(snapshot(&session).seconds_remaining, 9);

    session.discard().unwrap();
    scheduler.await.unwrap();
}

/// Panics the first time it sees the timer muted
struct PanicOnMute;

impl StateObserver for PanicOnMute {
    fn on_snapshot(&mut self, snapshot: &TimerSnapshot) {
        if snapshot.is_muted {
            panic!("display crashed");
        }
    }
}

#[tokio::test(start_paused = true)]
async fn scheduler_stops_when_engine_lock_is_poisoned() {
    let (session, _log, scheduler) = start_session(10, 5, 2, 2);
    session.add_observer(Box::new(PanicOnMute)).unwrap();
    session.dispatch(Intent::TogglePlay).unwrap();

    let crashed = catch_unwind(AssertUnwindSafe(|| session.dispatch(Intent::ToggleMute)));
    assert!(crashed.is_err());
    assert!(session.snapshot().is_err());

    timeout(Duration::from_secs(5), scheduler)
        .await
        .expect("scheduler kept ticking a poisoned session")
        .unwrap();
}

//! HIIT Timer - a terminal interval workout timer
//! 
//! This is the main entry point for the hiit-timer application.

use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};
use tracing::{error, info, warn};

use hiit_timer::{
    config::Config,
    input::{handle_line, parse_settings, LineAction, SetupChoice, HELP},
    services::{CueSink, JsonDisplay, SilentSink, StateObserver, TerminalBell, TerminalDisplay},
    state::{TimerConfiguration, TimerSession},
    tasks::tick_scheduler_task,
    utils::{format_clock, shutdown_signal},
};

type InputLines = Lines<BufReader<Stdin>>;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    // Logs go to stderr so stdout carries only the timer display
    tracing_subscriber::fmt()
        .with_env_filter(format!("hiit_timer={}", config.log_level()))
        .with_writer(std::io::stderr)
        .init();

    let workout = config.timer_configuration()?;
    info!("Starting hiit-timer v1.0.0");
    info!("Configuration: {}", workout);

    tokio::select! {
        result = run_app(&config, workout) => {
            if let Err(e) = &result {
                error!("Timer error: {}", e);
            }
            result?;
        }
        result = shutdown_signal() => {
            match result {
                Ok(()) => info!("Shutdown signal received"),
                Err(e) => error!("Failed to install signal handler: {}", e),
            }
        }
    }

    info!("hiit-timer shutdown complete");
    Ok(())
}

/// Alternate between running a workout and the setup prompt until the user quits
async fn run_app(config: &Config, mut workout: TimerConfiguration) -> anyhow::Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut autostart = config.autostart;

    loop {
        match run_workout(config, workout, autostart, &mut lines).await? {
            LineAction::Quit => return Ok(()),
            LineAction::Continue | LineAction::ReturnToSetup => {}
        }

        // Setup step after a confirmed reset
        autostart = false;
        loop {
            eprintln!("Setup: 'prep work rest rounds' (SS or MM:SS), <enter> to reuse [{}], q to quit", workout);
            let Some(line) = lines.next_line().await? else {
                return Ok(());
            };
            match parse_settings(&line, workout) {
                Ok(SetupChoice::Start(next)) => {
                    workout = next;
                    info!("Configuration: {}", workout);
                    break;
                }
                Ok(SetupChoice::Quit) => return Ok(()),
                Err(e) => warn!("{}", e),
            }
        }
    }
}

/// Run one workout until it is reset or the user quits
async fn run_workout(
    config: &Config,
    workout: TimerConfiguration,
    autostart: bool,
    lines: &mut InputLines,
) -> anyhow::Result<LineAction> {
    let sink: Arc<dyn CueSink> = if config.silent {
        Arc::new(SilentSink)
    } else {
        Arc::new(TerminalBell::new())
    };
    let display: Box<dyn StateObserver> = if config.json {
        Box::new(JsonDisplay::new())
    } else {
        Box::new(TerminalDisplay::new())
    };

    let session = Arc::new(TimerSession::new(workout, sink));
    session.add_observer(display).map_err(anyhow::Error::msg)?;

    eprintln!("Planned workout time {} ({} rounds)", format_clock(workout.total_planned_seconds()), workout.rounds());
    eprintln!("{}", HELP);

    // Start the tick scheduler background task
    let scheduler = tokio::spawn(tick_scheduler_task(Arc::clone(&session)));

    if autostart {
        handle_line(&session, "p");
    }

    let action = loop {
        match lines.next_line().await? {
            Some(line) => match handle_line(&session, &line) {
                LineAction::Continue => continue,
                action => break action,
            },
            None => {
                // Input closed: let the current run play out, then exit
                info!("Input closed, waiting for the timer to stop");
                session.wait_until_idle().await;
                break LineAction::Quit;
            }
        }
    };

    if let Err(e) = session.discard() {
        warn!("Failed to discard timer session: {}", e);
    }
    if let Err(e) = scheduler.await {
        error!("Tick scheduler task failed: {}", e);
    }

    if let Some((intent, at)) = session.last_intent() {
        info!("Last command {} at {}", intent, at.to_rfc3339());
    }
    info!("Session ran for {}", format_clock(session.created_at.elapsed().as_secs()));
    Ok(action)
}

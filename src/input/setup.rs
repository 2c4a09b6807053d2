//! Setup step: choosing the next workout after a reset

use crate::{
    state::TimerConfiguration,
    utils::parse_duration,
};

/// Result of a setup prompt line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetupChoice {
    Start(TimerConfiguration),
    Quit,
}

/// Parse a setup line: empty reuses `previous`, `q` quits, otherwise
/// `prep work rest rounds` with durations as SS or MM:SS.
pub fn parse_settings(line: &str, previous: TimerConfiguration) -> Result<SetupChoice, String> {
    let trimmed = line.trim();
    match trimmed {
        "" => return Ok(SetupChoice::Start(previous)),
        "q" | "quit" | "exit" => return Ok(SetupChoice::Quit),
        _ => {}
    }

    let fields: Vec<&str> = trimmed.split_whitespace().collect();
    let [prep, work, rest, rounds] = fields.as_slice() else {
        return Err(format!(
            "expected 'prep work rest rounds', got {} values",
            fields.len()
        ));
    };

    let rounds = rounds
        .parse::<i64>()
        .map_err(|_| format!("invalid rounds '{}'", rounds))?;

    TimerConfiguration::new(
        parse_duration(prep)?,
        parse_duration(work)?,
        parse_duration(rest)?,
        rounds,
    )
    .map(SetupChoice::Start)
    .map_err(|e| e.to_string())
}

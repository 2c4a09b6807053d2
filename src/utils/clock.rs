//! Minutes:seconds formatting and parsing

/// Format a number of seconds as zero-padded `MM:SS`.
///
/// Minutes are not wrapped into hours, so long workouts read `75:00`.
pub fn format_clock(seconds: u64) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}

/// Parse a duration written as `SS`, `M:SS` or `MM:SS`.
///
/// The sign is kept so that a negative entry reaches configuration
/// validation instead of failing here.
pub fn parse_duration(input: &str) -> Result<i64, String> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err("duration is empty".to_string());
    }

    let (negative, body) = match trimmed.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, trimmed),
    };

    let seconds = match body.split_once(':') {
        Some((minutes, seconds)) => {
            let minutes = parse_component(minutes, input)?;
            let seconds = parse_component(seconds, input)?;
            if seconds >= 60 {
                return Err(format!("seconds must be below 60 in '{}'", input));
            }
            minutes
                .checked_mul(60)
                .and_then(|m| m.checked_add(seconds))
                .ok_or_else(|| format!("duration too large: '{}'", input))?
        }
        None => parse_component(body, input)?,
    };

    Ok(if negative { -seconds } else { seconds })
}

fn parse_component(component: &str, input: &str) -> Result<i64, String> {
    component
        .parse::<i64>()
        .ok()
        .filter(|value| *value >= 0)
        .ok_or_else(|| format!("invalid duration '{}', expected SS or MM:SS", input))
}

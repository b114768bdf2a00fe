use chrono::Duration;

/// Parses the `<integer><unit>` repeating grammar used by the `t` and `f` labels, e.g. `1h30m`.
/// Units are `h`, `m` and `s`. Returns [None] for anything else, including an empty string.
pub fn parse_duration(s: &str) -> Option<Duration> {
    let mut total = Duration::zero();
    let mut digits = String::new();
    let mut groups = 0;

    for c in s.chars() {
        if c.is_ascii_digit() {
            digits.push(c);
            continue;
        }
        if digits.is_empty() {
            return None;
        }
        let amount = digits.parse::<i64>().ok()?;
        let part = match c {
            'h' => Duration::try_hours(amount)?,
            'm' => Duration::try_minutes(amount)?,
            's' => Duration::try_seconds(amount)?,
            _ => return None,
        };
        total = total.checked_add(&part)?;
        digits.clear();
        groups += 1;
    }

    // Trailing digits without a unit
    if !digits.is_empty() || groups == 0 {
        return None;
    }
    Some(total)
}

/// Duration as a float amount of nanoseconds. Falls back to millisecond precision for durations
/// too large to be represented in nanoseconds.
pub fn as_nanos_f64(value: Duration) -> f64 {
    value
        .num_nanoseconds()
        .map_or_else(|| value.num_milliseconds() as f64 * 1e6, |v| v as f64)
}

/// Multiplies a duration by a ratio, rounding to the nearest nanosecond.
pub fn scale_duration(value: Duration, ratio: f64) -> Duration {
    Duration::nanoseconds((as_nanos_f64(value) * ratio).round() as i64)
}

pub fn format_duration(v: Duration) -> String {
    if v.num_hours() > 0 {
        format!(
            "{}h{}m{}s",
            v.num_hours(),
            v.num_minutes() % 60,
            v.num_seconds() % 60
        )
    } else if v.num_minutes() > 0 {
        format!("{}m{}s", v.num_minutes() % 60, v.num_seconds() % 60)
    } else {
        format!("{}s", v.num_seconds() % 60)
    }
}

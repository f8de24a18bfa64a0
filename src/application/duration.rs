//! # Duration Parsing
//!
//! Turns a user-supplied time expression into a signed offset from "now".
//!
//! Two shapes are accepted:
//! - absolute timestamps (`2026-01-12T18:00:00Z`, `2026-01-12 18:00:00`, `2026-01-12`),
//!   which resolve to `timestamp - now`;
//! - relative expressions made of signed terms, optionally prefixed by `now`
//!   (`1h30m`, `+2d`, `now-15m`, `1.5h`, `1mo`, `now+1y-2w`).
//!
//! Months and years use calendar arithmetic, so `1mo` from Jan 31 lands on Feb 28/29.

use crate::domain::error::ArgumentError;
use chrono::{DateTime, Months, NaiveDate, NaiveDateTime, TimeDelta, Utc};

const NANOS_PER_SECOND: f64 = 1_000_000_000.0;

/// Parse `input` relative to `now`.
pub fn parse_duration(input: &str, now: DateTime<Utc>) -> Result<TimeDelta, ArgumentError> {
    let input = input.trim();
    if input.is_empty() {
        return Err(ArgumentError::invalid_duration(input, "empty duration string"));
    }

    if let Some(at) = parse_absolute(input) {
        return Ok(at - now);
    }

    let target = apply_relative(input, now)?;
    Ok(target - now)
}

fn parse_absolute(input: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(input) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(input, "%Y-%m-%d %H:%M:%S") {
        return Some(dt.and_utc());
    }
    NaiveDate::parse_from_str(input, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Unit {
    Fixed(f64),
    Months(u32),
}

fn unit_for(name: &str) -> Option<Unit> {
    let unit = match name {
        "ns" => Unit::Fixed(1.0),
        "us" | "µs" => Unit::Fixed(1_000.0),
        "ms" => Unit::Fixed(1_000_000.0),
        "s" | "sec" | "secs" | "second" | "seconds" => Unit::Fixed(NANOS_PER_SECOND),
        "m" | "min" | "mins" | "minute" | "minutes" => Unit::Fixed(60.0 * NANOS_PER_SECOND),
        "h" | "hr" | "hour" | "hours" => Unit::Fixed(3_600.0 * NANOS_PER_SECOND),
        "d" | "day" | "days" => Unit::Fixed(86_400.0 * NANOS_PER_SECOND),
        "w" | "week" | "weeks" => Unit::Fixed(604_800.0 * NANOS_PER_SECOND),
        "mo" | "month" | "months" => Unit::Months(1),
        "y" | "year" | "years" => Unit::Months(12),
        _ => return None,
    };
    Some(unit)
}

/// Walks `[+-]?<number><unit>` terms. A term without a sign inherits the previous
/// term's sign, so `-1h30m` means minus ninety minutes.
fn apply_relative(input: &str, now: DateTime<Utc>) -> Result<DateTime<Utc>, ArgumentError> {
    let err = |reason: &str| ArgumentError::invalid_duration(input, reason);

    let mut rest = input;
    if rest.len() >= 3 && rest.is_char_boundary(3) && rest[..3].eq_ignore_ascii_case("now") {
        rest = &rest[3..];
    }

    let mut target = now;
    let mut negative = false;

    loop {
        rest = rest.trim_start();
        if rest.is_empty() {
            break;
        }

        if let Some(stripped) = rest.strip_prefix('+') {
            negative = false;
            rest = stripped.trim_start();
        } else if let Some(stripped) = rest.strip_prefix('-') {
            negative = true;
            rest = stripped.trim_start();
        }

        let number_len = rest
            .find(|c: char| !(c.is_ascii_digit() || c == '.'))
            .unwrap_or(rest.len());
        let number = &rest[..number_len];
        if number.is_empty() {
            return Err(err("expected a number"));
        }
        rest = rest[number_len..].trim_start();

        let unit_len = rest
            .find(|c: char| !(c.is_alphabetic() || c == 'µ'))
            .unwrap_or(rest.len());
        let unit_name = &rest[..unit_len];
        if unit_name.is_empty() {
            return Err(err("missing unit suffix"));
        }
        rest = &rest[unit_len..];

        let unit = unit_for(&unit_name.to_lowercase()).ok_or_else(|| err("unknown unit"))?;
        target = match unit {
            Unit::Fixed(factor) => {
                let value: f64 = number.parse().map_err(|_| err("invalid number"))?;
                let nanos = value * factor;
                if !nanos.is_finite() || nanos.abs() >= i64::MAX as f64 {
                    return Err(err("duration out of range"));
                }
                let delta = TimeDelta::nanoseconds(nanos.round() as i64);
                let delta = if negative { -delta } else { delta };
                target
                    .checked_add_signed(delta)
                    .ok_or_else(|| err("duration out of range"))?
            }
            Unit::Months(per) => {
                let count: u32 = number
                    .parse()
                    .map_err(|_| err("months and years must be whole numbers"))?;
                let months = Months::new(
                    count
                        .checked_mul(per)
                        .ok_or_else(|| err("duration out of range"))?,
                );
                let shifted = if negative {
                    target.checked_sub_months(months)
                } else {
                    target.checked_add_months(months)
                };
                shifted.ok_or_else(|| err("duration out of range"))?
            }
        };
    }

    Ok(target)
}

/// Short human form such as `1d 2h 5m`, or `0s` for anything under a second.
pub fn format_duration(delta: TimeDelta) -> String {
    let sign = if delta < TimeDelta::zero() { "-" } else { "" };
    let mut secs = delta.num_seconds().unsigned_abs();

    let mut parts = Vec::new();
    for (unit, size) in [("d", 86_400), ("h", 3_600), ("m", 60), ("s", 1)] {
        if secs >= size {
            parts.push(format!("{}{unit}", secs / size));
            secs %= size;
        }
    }
    if parts.is_empty() {
        return "0s".to_string();
    }
    format!("{sign}{}", parts.join(" "))
}

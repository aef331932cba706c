//! Natural language date/time parsing
//!
//! Resolves the values clients send for `when`, `departure` and friends into
//! an instant. Forms are tried in order and the first match wins:
//!
//! 1. Unix timestamps (all digits, seconds)
//! 2. ISO 8601 date-times, with or without offset
//! 3. Relative phrases like "now", "tomorrow 2pm" or "in 20 minutes"
//! 4. Whatever [`fuzzydate`] understands
//!
//! Local times are interpreted in the provider's time zone.

use std::panic;

use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;
use tracing::debug;

const NAIVE_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
];

/// Parse a date/time expression relative to `now`, in time zone `tz`
///
/// Returns `None` if no form matches.
pub fn parse_when(input: &str, now: DateTime<Utc>, tz: Tz) -> Option<DateTime<Utc>> {
    let input = input.trim();
    if input.is_empty() {
        return None;
    }

    if let Some(t) = parse_unix(input) {
        debug!(input = %input, when = %t, "Parsed Unix timestamp");
        return Some(t);
    }

    if let Some(t) = parse_iso(input, tz) {
        debug!(input = %input, when = %t, "Parsed ISO 8601 date-time");
        return Some(t);
    }

    let lowered = input.to_lowercase();
    if let Some(t) = parse_relative(&lowered, now, tz) {
        debug!(input = %input, when = %t, "Parsed relative expression");
        return Some(t);
    }

    // Fall back to fuzzydate library
    let t = parse_fuzzy(&lowered, now, tz);
    match t {
        Some(t) => debug!(input = %input, when = %t, "Parsed with fuzzydate"),
        None => debug!(input = %input, "Failed to parse date/time"),
    }
    t
}

/// fuzzydate anchored at `now` in the provider's zone
///
/// fuzzydate panics when an offset leaves chrono's range
/// ("99999999 days from now"); that counts as no match.
fn parse_fuzzy(input: &str, now: DateTime<Utc>, tz: Tz) -> Option<DateTime<Utc>> {
    let relative_to = now.with_timezone(&tz).naive_local();
    let naive = panic::catch_unwind(|| fuzzydate::parse_relative_to(input, relative_to))
        .ok()?
        .ok()?;
    localize(naive, tz)
}

fn parse_unix(input: &str) -> Option<DateTime<Utc>> {
    if !input.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let secs: i64 = input.parse().ok()?;
    DateTime::from_timestamp(secs, 0)
}

fn parse_iso(input: &str, tz: Tz) -> Option<DateTime<Utc>> {
    if let Ok(t) = DateTime::parse_from_rfc3339(input) {
        return Some(t.with_timezone(&Utc));
    }
    for format in NAIVE_DATETIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(input, format) {
            return localize(naive, tz);
        }
    }
    if let Ok(date) = NaiveDate::parse_from_str(input, "%Y-%m-%d") {
        return localize(date.and_time(NaiveTime::MIN), tz);
    }
    None
}

/// Interpret a wall-clock time in `tz`, picking the earlier instant on DST overlaps
fn localize(naive: NaiveDateTime, tz: Tz) -> Option<DateTime<Utc>> {
    tz.from_local_datetime(&naive)
        .earliest()
        .map(|t| t.with_timezone(&Utc))
}

fn parse_relative(input: &str, now: DateTime<Utc>, tz: Tz) -> Option<DateTime<Utc>> {
    if input == "now" {
        return Some(now);
    }

    if let Some(rest) = input.strip_prefix("in ") {
        return parse_offset(rest).and_then(|d| now.checked_add_signed(d));
    }
    if let Some(rest) = input.strip_suffix(" ago") {
        return parse_offset(rest).and_then(|d| now.checked_sub_signed(d));
    }

    let today = now.with_timezone(&tz).date_naive();
    let (day, rest) = split_day(input, today);
    let rest = rest.trim();
    let rest = rest.strip_prefix("at ").unwrap_or(rest).trim();

    if rest.is_empty() {
        // bare day keyword: same wall-clock time on that day
        let time = now.with_timezone(&tz).time();
        return localize(day.and_time(time), tz);
    }

    let time = parse_clock(rest)?;
    localize(day.and_time(time), tz)
}

fn split_day(input: &str, today: NaiveDate) -> (NaiveDate, &str) {
    for (keyword, offset) in [("today", 0), ("tomorrow", 1), ("yesterday", -1)] {
        if let Some(rest) = input.strip_prefix(keyword) {
            return (today + Duration::days(offset), rest);
        }
    }
    (today, input)
}

/// "20 minutes", "2 hours", "1 day", "90 min"
fn parse_offset(input: &str) -> Option<Duration> {
    let mut parts = input.split_whitespace();
    let amount: i64 = parts.next()?.parse().ok()?;
    let unit = parts.next()?;
    if parts.next().is_some() {
        return None;
    }
    match unit.trim_end_matches('s') {
        "min" | "minute" => Duration::try_minutes(amount),
        "h" | "hour" | "hr" => Duration::try_hours(amount),
        "day" => Duration::try_days(amount),
        "week" => Duration::try_weeks(amount),
        _ => None,
    }
}

/// "14:00", "14:00:30", "2pm", "2:30pm", "2 pm"
fn parse_clock(input: &str) -> Option<NaiveTime> {
    let compact: String = input.chars().filter(|c| !c.is_whitespace()).collect();

    let (digits, meridiem) = if let Some(d) = compact.strip_suffix("am") {
        (d, Some(false))
    } else if let Some(d) = compact.strip_suffix("pm") {
        (d, Some(true))
    } else {
        (compact.as_str(), None)
    };

    let mut fields = digits.split(':');
    let hour: u32 = fields.next()?.parse().ok()?;
    let minute: u32 = fields.next().map_or(Some(0), |m| m.parse().ok())?;
    let second: u32 = fields.next().map_or(Some(0), |s| s.parse().ok())?;
    if fields.next().is_some() {
        return None;
    }

    let hour = match meridiem {
        Some(pm) => {
            if !(1..=12).contains(&hour) {
                return None;
            }
            match (hour, pm) {
                (12, false) => 0,
                (12, true) => 12,
                (h, true) => h + 12,
                (h, false) => h,
            }
        },
        // a lone number without a colon or meridiem is too ambiguous
        None if !digits.contains(':') => return None,
        None => hour,
    };

    NaiveTime::from_hms_opt(hour, minute, second)
}

#[cfg(test)]
mod tests {
    use chrono::Timelike;

    use super::*;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 2, 11, 10, 30, 0).unwrap()
    }

    #[test]
    fn parse_unix_timestamp() {
        let t = parse_when("1770805800", now(), Tz::UTC).unwrap();
        assert_eq!(t.timestamp(), 1_770_805_800);
    }

    #[test]
    fn parse_rfc3339_with_offset() {
        let t = parse_when("2026-02-11T14:37:00+01:00", now(), Tz::UTC).unwrap();
        assert_eq!(t, Utc.with_ymd_and_hms(2026, 2, 11, 13, 37, 0).unwrap());
    }

    #[test]
    fn parse_naive_iso_in_zone() {
        let t = parse_when("2026-02-11T14:37", now(), chrono_tz::Europe::Berlin).unwrap();
        assert_eq!(t, Utc.with_ymd_and_hms(2026, 2, 11, 13, 37, 0).unwrap());
    }

    #[test]
    fn parse_date_only_is_local_midnight() {
        let t = parse_when("2026-07-01", now(), chrono_tz::Europe::Berlin).unwrap();
        assert_eq!(t, Utc.with_ymd_and_hms(2026, 6, 30, 22, 0, 0).unwrap());
    }

    #[test]
    fn parse_now() {
        assert_eq!(parse_when("now", now(), Tz::UTC), Some(now()));
        assert_eq!(parse_when("  NOW ", now(), Tz::UTC), Some(now()));
    }

    #[test]
    fn parse_tomorrow_2pm() {
        let t = parse_when("tomorrow 2pm", now(), Tz::UTC).unwrap();
        assert_eq!(t, Utc.with_ymd_and_hms(2026, 2, 12, 14, 0, 0).unwrap());
    }

    #[test]
    fn parse_today_at_clock_time_in_zone() {
        let t = parse_when("today at 14:00", now(), chrono_tz::Europe::Berlin).unwrap();
        assert_eq!(t, Utc.with_ymd_and_hms(2026, 2, 11, 13, 0, 0).unwrap());
    }

    #[test]
    fn parse_bare_clock_time_is_today() {
        let t = parse_when("9:15pm", now(), Tz::UTC).unwrap();
        assert_eq!((t.hour(), t.minute()), (21, 15));
        assert_eq!(t.date_naive(), now().date_naive());
    }

    #[test]
    fn parse_in_minutes() {
        let t = parse_when("in 20 minutes", now(), Tz::UTC).unwrap();
        assert_eq!(t, now() + Duration::minutes(20));
    }

    #[test]
    fn parse_hours_ago() {
        let t = parse_when("2 hours ago", now(), Tz::UTC).unwrap();
        assert_eq!(t, now() - Duration::hours(2));
    }

    #[test]
    fn parse_tomorrow_keeps_current_time() {
        let t = parse_when("tomorrow", now(), Tz::UTC).unwrap();
        assert_eq!(t, now() + Duration::days(1));
    }

    #[test]
    fn clock_rejects_out_of_range() {
        assert!(parse_clock("13pm").is_none());
        assert!(parse_clock("25:00").is_none());
        assert!(parse_clock("12am") == NaiveTime::from_hms_opt(0, 0, 0));
    }

    #[test]
    fn parse_invalid_returns_none() {
        assert_eq!(parse_when("", now(), Tz::UTC), None);
        assert_eq!(parse_when("gibberish xyz qqq", now(), Tz::UTC), None);
    }

    #[test]
    fn fuzzy_offset_out_of_range_is_none() {
        assert_eq!(parse_when("99999999 days from now", now(), Tz::UTC), None);
        assert_eq!(parse_when("99999999 years ago", now(), Tz::UTC), None);
    }

    #[test]
    fn fuzzy_phrases_are_anchored_at_now() {
        let t = parse_when("2pm tomorrow", now(), Tz::UTC).unwrap();
        assert_eq!(t, Utc.with_ymd_and_hms(2026, 2, 12, 14, 0, 0).unwrap());
    }

    #[test]
    fn fuzzy_phrases_use_provider_zone() {
        // 14:00 in Berlin is 13:00 UTC in February
        let t = parse_when("2pm tomorrow", now(), Tz::Europe__Berlin).unwrap();
        assert_eq!(t, Utc.with_ymd_and_hms(2026, 2, 12, 13, 0, 0).unwrap());
    }

    mod properties {
        use proptest::prelude::*;

        use super::*;

        proptest! {
            #[test]
            fn unix_timestamps_roundtrip(secs in 0i64..4_000_000_000) {
                let t = parse_when(&secs.to_string(), now(), Tz::UTC).unwrap();
                prop_assert_eq!(t.timestamp(), secs);
            }

            #[test]
            fn rfc3339_ignores_provider_zone(secs in 0i64..4_000_000_000) {
                let t = DateTime::from_timestamp(secs, 0).unwrap();
                let text = t.with_timezone(&chrono_tz::Europe::Berlin).to_rfc3339();
                let parsed = parse_when(&text, now(), Tz::America__New_York).unwrap();
                prop_assert_eq!(parsed, t);
            }

            #[test]
            fn never_panics_on_printable_ascii(input in "[ -~]{0,30}") {
                let _ = parse_when(&input, now(), Tz::Europe__Berlin);
            }

            #[test]
            fn huge_fuzzy_offsets_are_rejected(days in 100_000_000u64..4_000_000_000) {
                prop_assert_eq!(parse_when(&format!("{days} days from now"), now(), Tz::UTC), None);
            }

            #[test]
            fn relative_minutes_offset_now(minutes in 1i64..10_000) {
                let t = parse_when(&format!("in {minutes} minutes"), now(), Tz::UTC).unwrap();
                prop_assert_eq!(t, now() + Duration::minutes(minutes));
            }
        }
    }
}

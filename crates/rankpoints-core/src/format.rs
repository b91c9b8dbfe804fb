//! Performance formatter.
//!
//! Maps between a raw performance value and its event-appropriate notation:
//! `m:ss.xx` for middle and long distance, two decimals for sprints, hurdles,
//! jumps and throws, whole numbers for combined events.
//!
//! Round-trip law: `parse(render(x))` equals `x` within 0.01 for every kind
//! except combined events, whose rendering rounds to the nearest point.

use std::sync::LazyLock;

use regex::Regex;

use crate::calculator::CalculationMode;
use crate::catalog::{Event, EventKind};
use crate::error::{Result, ScoringError};

/// Lowest points value on the scoring tables.
pub const MIN_POINTS: i32 = 0;
/// Highest points value on the scoring tables.
pub const MAX_POINTS: i32 = 1400;

/// Display for a cell with no value (unattainable, non-scoring or failed).
pub const NOT_AVAILABLE: &str = "-";

static CLOCK_TIME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d+):([0-5]\d\.\d{2})$").expect("static regex is valid"));

fn invalid(event: &Event, input: &str, expected: &str) -> ScoringError {
    ScoringError::InvalidFormat {
        event: event.name.to_string(),
        input: input.to_string(),
        expected: expected.to_string(),
    }
}

/// Parse a displayed performance into event-native units.
///
/// Never coerces: anything that does not match the event's notation is
/// rejected with `InvalidFormat`.
pub fn parse_performance(event: &Event, input: &str) -> Result<f64> {
    let trimmed = input.trim();
    match event.kind {
        EventKind::MiddleDistance | EventKind::LongDistance => {
            let caps = CLOCK_TIME
                .captures(trimmed)
                .ok_or_else(|| invalid(event, input, "mm:ss.xx"))?;
            let minutes: f64 = caps[1]
                .parse()
                .map_err(|_| invalid(event, input, "mm:ss.xx"))?;
            let seconds: f64 = caps[2]
                .parse()
                .map_err(|_| invalid(event, input, "mm:ss.xx"))?;
            Ok(minutes * 60.0 + seconds)
        }
        EventKind::Combined => trimmed
            .parse::<u32>()
            .map(f64::from)
            .map_err(|_| invalid(event, input, "a whole-number score")),
        EventKind::Sprint | EventKind::Hurdle | EventKind::Jump | EventKind::Throw => {
            let expected = if event.kind.is_timed() {
                "seconds (ss.xx)"
            } else {
                "meters (m.cm)"
            };
            let value: f64 = trimmed
                .parse()
                .map_err(|_| invalid(event, input, expected))?;
            if !value.is_finite() || value < 0.0 {
                return Err(invalid(event, input, expected));
            }
            Ok(value)
        }
    }
}

/// Render a performance value for display.
pub fn render_performance(event: &Event, value: f64) -> String {
    match event.kind {
        EventKind::MiddleDistance | EventKind::LongDistance => {
            let hundredths = (value.max(0.0) * 100.0).round() as u64;
            let minutes = hundredths / 6000;
            let rest = hundredths % 6000;
            format!("{}:{:02}.{:02}", minutes, rest / 100, rest % 100)
        }
        EventKind::Combined => format!("{}", round_half_up(value)),
        EventKind::Sprint | EventKind::Hurdle | EventKind::Jump | EventKind::Throw => {
            format!("{value:.2}")
        }
    }
}

/// Parse a typed points value: a whole number within the table range.
pub fn parse_points(input: &str) -> Result<i32> {
    let trimmed = input.trim();
    let invalid = || ScoringError::InvalidFormat {
        event: "points".to_string(),
        input: input.to_string(),
        expected: format!("a whole number between {MIN_POINTS} and {MAX_POINTS}"),
    };
    let points: i32 = trimmed.parse().map_err(|_| invalid())?;
    if !(MIN_POINTS..=MAX_POINTS).contains(&points) {
        return Err(invalid());
    }
    Ok(points)
}

/// Round to the nearest integer, halves rounding up.
pub fn round_half_up(value: f64) -> i64 {
    (value + 0.5).floor() as i64
}

/// Round a points value half-up, saturating at the `i32` bounds.
pub fn round_points(value: f64) -> i32 {
    let rounded = round_half_up(value);
    i32::try_from(rounded).unwrap_or(if rounded < 0 { i32::MIN } else { i32::MAX })
}

/// Placeholder text for the input field of `event` in `mode`.
pub fn input_hint(event: &Event, mode: CalculationMode) -> String {
    match mode {
        CalculationMode::PointsToPerformance => {
            format!("Enter points ({MIN_POINTS}-{MAX_POINTS})")
        }
        CalculationMode::PerformanceToPoints => match event.kind {
            EventKind::Sprint | EventKind::Hurdle => format!("Enter {} time (ss.xx)", event.name),
            EventKind::MiddleDistance | EventKind::LongDistance => {
                format!("Enter {} time (mm:ss.xx)", event.name)
            }
            EventKind::Jump | EventKind::Throw => {
                format!("Enter {} distance (m.cm)", event.name)
            }
            EventKind::Combined => format!("Enter {} score (whole number)", event.name),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{all_events, resolve_event};

    fn ev(name: &str) -> &'static Event {
        resolve_event(name).unwrap()
    }

    #[test]
    fn test_parse_clock_time() {
        let value = parse_performance(ev("1500m"), "3:45.67").unwrap();
        assert!((value - 225.67).abs() < 1e-9);
        assert_eq!(render_performance(ev("1500m"), value), "3:45.67");
    }

    #[test]
    fn test_parse_clock_time_rejects_bad_notation() {
        for input in ["3:75.00", "225.67", "3:4.5", "3:45.6", "abc", "", "-3:45.67"] {
            let err = parse_performance(ev("800m"), input).unwrap_err();
            assert!(
                matches!(err, ScoringError::InvalidFormat { .. }),
                "accepted {input:?}"
            );
        }
    }

    #[test]
    fn test_render_pads_seconds() {
        assert_eq!(render_performance(ev("800m"), 105.3), "1:45.30");
        assert_eq!(render_performance(ev("10000m"), 1571.0), "26:11.00");
        assert_eq!(render_performance(ev("3000m"), 480.05), "8:00.05");
    }

    #[test]
    fn test_render_carries_rounded_seconds_into_minutes() {
        assert_eq!(render_performance(ev("1500m"), 239.999), "4:00.00");
    }

    #[test]
    fn test_field_and_sprint_use_two_decimals() {
        assert_eq!(render_performance(ev("100m"), 9.5), "9.50");
        assert_eq!(render_performance(ev("Shot Put"), 21.456), "21.46");
        assert!((parse_performance(ev("Long Jump"), "8.95").unwrap() - 8.95).abs() < 1e-9);
    }

    #[test]
    fn test_negative_or_non_numeric_rejected() {
        assert!(parse_performance(ev("100m"), "-9.58").is_err());
        assert!(parse_performance(ev("High Jump"), "two meters").is_err());
        assert!(parse_performance(ev("High Jump"), "NaN").is_err());
    }

    #[test]
    fn test_combined_events_are_whole_numbers() {
        assert_eq!(parse_performance(ev("Decathlon"), "8126").unwrap(), 8126.0);
        assert!(parse_performance(ev("Decathlon"), "8126.5").is_err());
        assert_eq!(render_performance(ev("Heptathlon"), 6412.5), "6413");
        assert_eq!(render_performance(ev("Pentathlon"), 4801.2), "4801");
    }

    #[test]
    fn test_round_trip_within_tolerance() {
        let samples = [0.0, 0.004, 9.58, 59.995, 60.0, 225.67, 1571.33, 7199.99, 12345.678];
        for event in all_events().iter().filter(|e| e.kind != EventKind::Combined) {
            for &x in &samples {
                let back = parse_performance(event, &render_performance(event, x)).unwrap();
                assert!(
                    (back - x).abs() <= 0.01 + 1e-9,
                    "{}: {x} rendered back as {back}",
                    event.name
                );
            }
        }
    }

    #[test]
    fn test_round_points_saturates() {
        assert_eq!(round_points(1005.5), 1006);
        assert_eq!(round_points(-0.5), 0);
        assert_eq!(round_points(2_400_001_000.0), i32::MAX);
        assert_eq!(round_points(-2_400_001_000.0), i32::MIN);
        assert_eq!(round_points(f64::MAX), i32::MAX);
    }

    #[test]
    fn test_parse_points_bounds() {
        assert_eq!(parse_points("0").unwrap(), 0);
        assert_eq!(parse_points(" 1400 ").unwrap(), 1400);
        assert!(parse_points("1401").is_err());
        assert!(parse_points("-1").is_err());
        assert!(parse_points("1000.5").is_err());
    }

    #[test]
    fn test_input_hints() {
        let mode = CalculationMode::PerformanceToPoints;
        assert_eq!(input_hint(ev("60mH"), mode), "Enter 60mH time (ss.xx)");
        assert_eq!(input_hint(ev("5000m"), mode), "Enter 5000m time (mm:ss.xx)");
        assert_eq!(input_hint(ev("JT"), mode), "Enter Javelin Throw distance (m.cm)");
        assert_eq!(
            input_hint(ev("Decathlon"), mode),
            "Enter Decathlon score (whole number)"
        );
        assert_eq!(
            input_hint(ev("100m"), CalculationMode::PointsToPerformance),
            "Enter points (0-1400)"
        );
    }
}

//! Wind correction.
//!
//! Outdoor wind-affected events gain 6 points per m/s of headwind and lose
//! 6 points per m/s of tailwind beyond +2.0 m/s. Tailwind up to +2.0 m/s is
//! neutral. Every other event/season combination is left untouched.

use conversion_client::Season;
use serde::{Deserialize, Serialize};

use crate::catalog::Event;
use crate::error::{Result, ScoringError};
use crate::format::round_points;

/// Largest tailwind (m/s) that carries no penalty.
pub const NEUTRAL_TAILWIND_LIMIT: f64 = 2.0;
/// Points per m/s on both linear branches.
pub const POINTS_PER_MPS: f64 = 6.0;
/// Fixed adjustment when the caller signals no wind reading exists.
pub const NO_WIND_INFO_PENALTY: f64 = -30.0;

/// Wind input attached to a single calculation.
///
/// `NotSupplied` and `NoInformation` are deliberately distinct: the first
/// leaves points untouched, the second applies [`NO_WIND_INFO_PENALTY`].
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", content = "speed", rename_all = "snake_case")]
pub enum WindReading {
    #[default]
    NotSupplied,
    /// Measured speed in m/s; positive is tailwind, negative headwind.
    Measured(f64),
    /// Explicitly no wind reading available for the result.
    NoInformation,
}

/// Whether wind corrections apply to `event` in `season`.
pub fn is_wind_eligible(event: &Event, season: Season) -> bool {
    event.wind_affected && season == Season::Outdoor
}

/// Points delta for a measured wind speed. Continuous, piecewise linear.
pub fn wind_delta(wind_speed: f64) -> f64 {
    if wind_speed <= 0.0 {
        -wind_speed * POINTS_PER_MPS
    } else if wind_speed <= NEUTRAL_TAILWIND_LIMIT {
        0.0
    } else {
        -(wind_speed - NEUTRAL_TAILWIND_LIMIT) * POINTS_PER_MPS
    }
}

/// Unrounded correction for `reading`, zero when the event is not eligible.
pub fn correction(event: &Event, season: Season, reading: WindReading) -> f64 {
    if !is_wind_eligible(event, season) {
        return 0.0;
    }
    match reading {
        WindReading::NotSupplied => 0.0,
        WindReading::Measured(speed) => wind_delta(speed),
        WindReading::NoInformation => NO_WIND_INFO_PENALTY,
    }
}

/// Parse a typed wind speed in m/s.
pub fn parse_wind_speed(input: &str) -> Result<f64> {
    let speed: f64 = input.trim().parse().map_err(|_| ScoringError::InvalidFormat {
        event: "wind".to_string(),
        input: input.to_string(),
        expected: "a wind speed in m/s, e.g. -1.2 or +2.4".to_string(),
    })?;
    if !speed.is_finite() {
        return Err(ScoringError::InvalidFormat {
            event: "wind".to_string(),
            input: input.to_string(),
            expected: "a finite wind speed in m/s".to_string(),
        });
    }
    Ok(speed)
}

/// Base and wind-adjusted points for one result.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WindAdjustment {
    pub base_points: i32,
    pub adjusted_points: i32,
    pub reading: WindReading,
}

impl WindAdjustment {
    /// Integer points delta actually applied.
    pub fn delta(&self) -> i32 {
        self.adjusted_points.saturating_sub(self.base_points)
    }

    /// `"+6 points"` / `"-6 points"`, or `None` when nothing changed.
    pub fn summary(&self) -> Option<String> {
        match self.delta() {
            0 => None,
            d if d > 0 => Some(format!("+{d} points")),
            d => Some(format!("{d} points")),
        }
    }
}

/// Apply the wind correction to `base_points`.
pub fn adjust_points(
    event: &Event,
    season: Season,
    base_points: i32,
    reading: WindReading,
) -> WindAdjustment {
    let delta = correction(event, season, reading);
    let adjusted_points = if delta == 0.0 {
        base_points
    } else {
        round_points(f64::from(base_points) + delta)
    };
    WindAdjustment {
        base_points,
        adjusted_points,
        reading,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::resolve_event;

    #[test]
    fn test_neutral_zone() {
        for w in [0.1, 0.5, 1.0, 1.99, 2.0] {
            assert_eq!(wind_delta(w), 0.0, "wind {w}");
        }
    }

    #[test]
    fn test_continuous_at_breakpoints() {
        let eps = 1e-9;
        assert!(wind_delta(0.0).abs() < 1e-12);
        assert!(wind_delta(-eps).abs() < 1e-6);
        assert!(wind_delta(eps).abs() < 1e-6);
        assert!(wind_delta(2.0).abs() < 1e-12);
        assert!(wind_delta(2.0 + eps).abs() < 1e-6);
    }

    #[test]
    fn test_linear_branches() {
        assert!((wind_delta(-1.0) - 6.0).abs() < 1e-9);
        assert!((wind_delta(-3.5) - 21.0).abs() < 1e-9);
        assert!((wind_delta(3.0) + 6.0).abs() < 1e-9);
        assert!((wind_delta(2.1) + 0.6).abs() < 1e-9);
        assert!((wind_delta(5.0) + 18.0).abs() < 1e-9);
    }

    #[test]
    fn test_no_information_penalty_only_when_eligible() {
        let sprint = resolve_event("100m").unwrap();
        let adj = adjust_points(sprint, Season::Outdoor, 1000, WindReading::NoInformation);
        assert_eq!(adj.adjusted_points, 970);

        let hj = resolve_event("High Jump").unwrap();
        let adj = adjust_points(hj, Season::Outdoor, 1000, WindReading::NoInformation);
        assert_eq!(adj.adjusted_points, 1000);
    }

    #[test]
    fn test_not_supplied_is_a_no_op() {
        let lj = resolve_event("Long Jump").unwrap();
        let adj = adjust_points(lj, Season::Outdoor, 1111, WindReading::NotSupplied);
        assert_eq!(adj.adjusted_points, 1111);
        assert_eq!(adj.summary(), None);
    }

    #[test]
    fn test_summary_sign() {
        let sprint = resolve_event("200m").unwrap();
        let headwind = adjust_points(sprint, Season::Outdoor, 1000, WindReading::Measured(-1.0));
        assert_eq!(headwind.summary().as_deref(), Some("+6 points"));
        let tailwind = adjust_points(sprint, Season::Outdoor, 1000, WindReading::Measured(3.0));
        assert_eq!(tailwind.summary().as_deref(), Some("-6 points"));
    }

    #[test]
    fn test_fractional_delta_rounds_half_up() {
        let sprint = resolve_event("100m").unwrap();
        // -0.25 m/s headwind => +1.5 points
        let adj = adjust_points(sprint, Season::Outdoor, 1000, WindReading::Measured(-0.25));
        assert_eq!(adj.adjusted_points, 1002);
        // +2.1 m/s => -0.6 points
        let adj = adjust_points(sprint, Season::Outdoor, 1000, WindReading::Measured(2.1));
        assert_eq!(adj.adjusted_points, 999);
    }

    #[test]
    fn test_extreme_headwind_never_wraps() {
        let sprint = resolve_event("100m").unwrap();
        let adj = adjust_points(sprint, Season::Outdoor, 1000, WindReading::Measured(-400_000_000.0));
        assert_eq!(adj.adjusted_points, i32::MAX);
        assert!(adj.delta() > 0);

        let adj = adjust_points(sprint, Season::Outdoor, 1000, WindReading::Measured(400_000_000.0));
        assert_eq!(adj.adjusted_points, i32::MIN);
        assert!(adj.delta() < 0);
    }

    #[test]
    fn test_measured_wind_ignored_for_unaffected_outdoor_events() {
        for name in ["400m", "High Jump", "400mH", "Shot Put"] {
            let event = resolve_event(name).unwrap();
            let adj = adjust_points(event, Season::Outdoor, 1000, WindReading::Measured(-3.0));
            assert_eq!(adj.adjusted_points, 1000, "{name}");
            assert_eq!(adj.summary(), None);
        }
    }

    #[test]
    fn test_parse_wind_speed() {
        assert_eq!(parse_wind_speed("+2.4").unwrap(), 2.4);
        assert_eq!(parse_wind_speed(" -1.2 ").unwrap(), -1.2);
        assert!(parse_wind_speed("calm").is_err());
        assert!(parse_wind_speed("inf").is_err());
    }
}

//! Conversion service contract
//!
//! Wire types and the `ConversionService` trait that every backend of the
//! performance/points lookup implements:
//! - `calculate_points`: performance -> points
//! - `calculate_performance`: points -> performance
//! - `calculate_performances_batch`: one call per meet-comparison matrix
//!
//! The trait is async and transport-agnostic. `HttpConversionClient` talks to
//! the real service; in-memory fakes live in the `fakes` module.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::Result;

// ---------------------------------------------------------------------------
// Scoring context
// ---------------------------------------------------------------------------

/// Gender of the scoring table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Mens,
    Womens,
}

impl Gender {
    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Mens => "mens",
            Gender::Womens => "womens",
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Gender {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mens" | "men" | "m" => Ok(Gender::Mens),
            "womens" | "women" | "w" => Ok(Gender::Womens),
            other => Err(format!("unknown gender '{other}' (expected mens or womens)")),
        }
    }
}

/// Season of the scoring table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Season {
    Indoor,
    Outdoor,
}

impl Season {
    pub fn as_str(&self) -> &'static str {
        match self {
            Season::Indoor => "indoor",
            Season::Outdoor => "outdoor",
        }
    }
}

impl fmt::Display for Season {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Season {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "indoor" | "i" => Ok(Season::Indoor),
            "outdoor" | "o" => Ok(Season::Outdoor),
            other => Err(format!("unknown season '{other}' (expected indoor or outdoor)")),
        }
    }
}

// ---------------------------------------------------------------------------
// Requests / responses
// ---------------------------------------------------------------------------

/// Body of `POST /calculate-points`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointsRequest {
    /// Short event code when one exists, else the canonical name
    pub event_type: String,
    /// Performance in event-native units (seconds, meters, score)
    pub performance: f64,
    pub gender: Gender,
    pub season: Season,
}

/// Body of `POST /calculate-performance`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerformanceRequest {
    pub event_type: String,
    pub points: i32,
    pub gender: Gender,
    pub season: Season,
}

/// Body of `POST /calculate-performances-batch`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchRequest {
    pub base_points: i32,
    pub event_type: String,
    pub gender: Gender,
    pub season: Season,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct PointsResponse {
    pub points: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct PerformanceResponse {
    pub performance: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct BatchResponse {
    pub performances: BatchPerformances,
}

/// Batch result: category code -> place -> performance.
///
/// `None` marks a cell the service could not compute (e.g. points out of
/// table range).
pub type BatchPerformances = BTreeMap<String, BTreeMap<u8, Option<f64>>>;

// ---------------------------------------------------------------------------
// ConversionService
// ---------------------------------------------------------------------------

/// Performance <-> points lookup service.
///
/// Guarantees expected from implementations:
/// - Every call is an idempotent lookup; repeating it has no side effects.
/// - Failures are reported per call; one failing call never poisons others.
#[async_trait]
pub trait ConversionService: Send + Sync {
    /// Convert a performance into (unrounded) points.
    async fn calculate_points(&self, request: &PointsRequest) -> Result<f64>;

    /// Convert points into the performance that earns them.
    async fn calculate_performance(&self, request: &PerformanceRequest) -> Result<f64>;

    /// Performances for `base_points + bonus` across every meet category and place.
    async fn calculate_performances_batch(&self, request: &BatchRequest)
        -> Result<BatchPerformances>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gender_and_season_wire_format() {
        let req = PerformanceRequest {
            event_type: "HJ".to_string(),
            points: 1000,
            gender: Gender::Womens,
            season: Season::Indoor,
        };
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json["gender"], "womens");
        assert_eq!(json["season"], "indoor");
        assert_eq!(json["event_type"], "HJ");
        assert_eq!(json["points"], 1000);
    }

    #[test]
    fn test_gender_parse_accepts_short_forms() {
        assert_eq!("mens".parse::<Gender>().unwrap(), Gender::Mens);
        assert_eq!("W".parse::<Gender>().unwrap(), Gender::Womens);
        assert!("mixed".parse::<Gender>().is_err());
    }

    #[test]
    fn test_season_parse() {
        assert_eq!("Outdoor".parse::<Season>().unwrap(), Season::Outdoor);
        assert_eq!("indoor".parse::<Season>().unwrap(), Season::Indoor);
        assert!("summer".parse::<Season>().is_err());
    }

    #[test]
    fn test_batch_response_accepts_string_place_keys_and_nulls() {
        let body = r#"{"performances": {"OW": {"1": 9.58, "2": null}, "F": {"3": 10.4}}}"#;
        let parsed: BatchResponse = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.performances["OW"][&1], Some(9.58));
        assert_eq!(parsed.performances["OW"][&2], None);
        assert_eq!(parsed.performances["F"][&3], Some(10.4));
    }
}

//! Single-value calculations.
//!
//! One immutable [`CalculationRequest`] per calculate action: performance to
//! points (with wind correction) or points to performance. Any failure fails
//! the whole calculation; there is no partial result.

use std::sync::Arc;

use conversion_client::{
    ConversionService, Gender, PerformanceRequest, PointsRequest, Season,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::catalog::{resolve_event, Event};
use crate::error::{Result, ScoringError};
use crate::format::{parse_performance, parse_points, render_performance, round_points};
use crate::obs;
use crate::wind::{adjust_points, WindAdjustment, WindReading};

/// Direction of a calculation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CalculationMode {
    PerformanceToPoints,
    PointsToPerformance,
}

/// Everything one calculation needs, captured once.
#[derive(Debug, Clone, Serialize)]
pub struct CalculationRequest {
    pub event: &'static Event,
    pub gender: Gender,
    pub season: Season,
    pub mode: CalculationMode,
    /// Raw user input: a performance or a points value, depending on `mode`
    pub input: String,
    pub wind: WindReading,
}

impl CalculationRequest {
    /// Build a request, rejecting events the `(gender, season)` tables do not contest.
    pub fn new(
        event: &str,
        gender: Gender,
        season: Season,
        mode: CalculationMode,
        input: impl Into<String>,
    ) -> Result<Self> {
        let event = resolve_event(event)?;
        if !event.is_available(gender, season) {
            return Err(ScoringError::EventNotAvailable {
                event: event.name.to_string(),
                gender: gender.to_string(),
                season: season.to_string(),
            });
        }
        Ok(Self {
            event,
            gender,
            season,
            mode,
            input: input.into(),
            wind: WindReading::NotSupplied,
        })
    }

    pub fn with_wind(mut self, wind: WindReading) -> Self {
        self.wind = wind;
        self
    }
}

/// Result of a performance -> points calculation.
#[derive(Debug, Clone, Serialize)]
pub struct PointsOutcome {
    pub event: &'static str,
    pub performance: f64,
    pub adjustment: WindAdjustment,
}

impl PointsOutcome {
    /// Points after any wind correction.
    pub fn points(&self) -> i32 {
        self.adjustment.adjusted_points
    }
}

/// Result of a points -> performance calculation.
#[derive(Debug, Clone, Serialize)]
pub struct PerformanceOutcome {
    pub event: &'static str,
    pub points: i32,
    pub performance: f64,
    pub display: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum CalculationOutcome {
    Points(PointsOutcome),
    Performance(PerformanceOutcome),
}

/// Runs single-value calculations against a conversion service.
#[derive(Clone)]
pub struct Calculator {
    service: Arc<dyn ConversionService>,
}

impl Calculator {
    pub fn new(service: Arc<dyn ConversionService>) -> Self {
        Self { service }
    }

    /// Run `request` end to end.
    #[instrument(skip(self, request), fields(event = %request.event, mode = ?request.mode))]
    pub async fn calculate(&self, request: &CalculationRequest) -> Result<CalculationOutcome> {
        let outcome = match request.mode {
            CalculationMode::PerformanceToPoints => {
                CalculationOutcome::Points(self.performance_to_points(request).await?)
            }
            CalculationMode::PointsToPerformance => {
                CalculationOutcome::Performance(self.points_to_performance(request).await?)
            }
        };
        obs::emit_calculation_completed(request.event.name, request.mode);
        Ok(outcome)
    }

    async fn performance_to_points(&self, request: &CalculationRequest) -> Result<PointsOutcome> {
        // Format errors never reach the service.
        let performance = parse_performance(request.event, &request.input)?;
        let base_points = self
            .base_points(request.event, request.gender, request.season, performance)
            .await?;
        let adjustment = adjust_points(request.event, request.season, base_points, request.wind);
        debug!(
            base = adjustment.base_points,
            adjusted = adjustment.adjusted_points,
            "wind correction applied"
        );
        Ok(PointsOutcome {
            event: request.event.name,
            performance,
            adjustment,
        })
    }

    async fn points_to_performance(
        &self,
        request: &CalculationRequest,
    ) -> Result<PerformanceOutcome> {
        let points = parse_points(&request.input)?;
        let performance = self
            .performance_for(request.event, request.gender, request.season, points)
            .await?;
        Ok(PerformanceOutcome {
            event: request.event.name,
            points,
            performance,
            display: render_performance(request.event, performance),
        })
    }

    /// Points for `performance`, rounded half-up, before any wind correction.
    pub async fn base_points(
        &self,
        event: &Event,
        gender: Gender,
        season: Season,
        performance: f64,
    ) -> Result<i32> {
        let raw = self
            .service
            .calculate_points(&PointsRequest {
                event_type: event.service_code().to_string(),
                performance,
                gender,
                season,
            })
            .await?;
        Ok(round_points(raw))
    }

    /// Performance that earns `points` in `event`.
    pub async fn performance_for(
        &self,
        event: &Event,
        gender: Gender,
        season: Season,
        points: i32,
    ) -> Result<f64> {
        let performance = self
            .service
            .calculate_performance(&PerformanceRequest {
                event_type: event.service_code().to_string(),
                points,
                gender,
                season,
            })
            .await?;
        Ok(performance)
    }
}

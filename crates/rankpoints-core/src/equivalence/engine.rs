//! Concurrent cross-event and cross-meet expansion.
//!
//! Every cell of a pass is an independent lookup against the conversion
//! service. Lookups are issued together and awaited as a set on the calling
//! task; a failed lookup degrades only its own cell to [`Cell::Unavailable`].

use std::sync::Arc;

use chrono::Utc;
use conversion_client::{ConversionService, Gender, Season};
use futures::stream::{self, StreamExt};
use tracing::{info, instrument};

use crate::bonus::{bonus, last_scoring_place, CompetitionCategory};
use crate::calculator::Calculator;
use crate::catalog::{list_events, Event};
use crate::equivalence::matrix::{
    Cell, CompetitionCell, CompetitionInput, CompetitionMatrix, EventEquivalence,
    EventEquivalences, ExpansionInput,
};
use crate::equivalence::required_base;
use crate::equivalence::session::ComparisonSession;
use crate::error::{Result, ScoringError};
use crate::format::render_performance;
use crate::obs;

/// Configuration for expansion passes.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Maximum lookups in flight at once within one pass.
    pub max_in_flight: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self { max_in_flight: 32 }
    }
}

/// Expands a points value into equivalence matrices.
#[derive(Clone)]
pub struct EquivalenceEngine {
    calculator: Calculator,
    config: EngineConfig,
}

impl EquivalenceEngine {
    pub fn new(service: Arc<dyn ConversionService>) -> Self {
        Self::with_config(service, EngineConfig::default())
    }

    pub fn with_config(service: Arc<dyn ConversionService>, config: EngineConfig) -> Self {
        Self {
            calculator: Calculator::new(service),
            config: EngineConfig {
                max_in_flight: config.max_in_flight.max(1),
            },
        }
    }

    /// Equivalent performance for `input.points` in every event the input's
    /// `(gender, season)` tables contest.
    #[instrument(skip(self), fields(points = input.points, gender = %input.gender, season = %input.season))]
    pub async fn expand_events(&self, input: ExpansionInput) -> EventEquivalences {
        let events = list_events(input.gender, input.season);
        let ctx = LookupContext {
            gender: input.gender,
            season: input.season,
        };
        let points = input.points;

        let entries: Vec<EventEquivalence> = stream::iter(events)
            .map(|event| {
                let ctx = &ctx;
                async move {
                    let performance = self.lookup(event, ctx, points).await;
                    EventEquivalence {
                        event,
                        display: performance.display_with(|p| render_performance(event, *p)),
                        performance,
                    }
                }
            })
            .buffered(self.config.max_in_flight)
            .collect()
            .await;

        let result = EventEquivalences {
            input,
            entries,
            computed_at: Utc::now(),
        };
        info!(
            events = result.entries.len(),
            degraded = result.degraded_count(),
            "event expansion complete"
        );
        result
    }

    /// Required performance at every meet category and place to match
    /// `input.points`, plus the total each finish would be worth.
    ///
    /// Fails only when the input itself is invalid (unavailable event,
    /// non-scoring baseline place); service failures degrade single cells.
    #[instrument(skip(self), fields(event = %input.event, points = input.points))]
    pub async fn expand_competition(&self, input: CompetitionInput) -> Result<CompetitionMatrix> {
        validate_competition_input(&input)?;

        let baseline_bonus = match input.baseline {
            Some(finish) => finish.bonus()?,
            None => 0,
        };
        let performance_points = input.points - baseline_bonus;

        let mut slots = Vec::new();
        for category in CompetitionCategory::ALL {
            for place in 1..=last_scoring_place(category) {
                let cell_bonus = bonus(category, place)?;
                let required = required_base(input.points, category, place)?;
                slots.push((category, place, cell_bonus, required));
            }
        }

        let ctx = LookupContext {
            gender: input.gender,
            season: input.season,
        };
        let event = input.event;

        let cells: Vec<CompetitionCell> = stream::iter(slots)
            .map(|(category, place, cell_bonus, required)| {
                let ctx = &ctx;
                async move {
                    let performance = match required {
                        Cell::Value(points) => self.lookup(event, ctx, points).await,
                        _ => Cell::Unattainable,
                    };
                    CompetitionCell {
                        category,
                        place,
                        total_points: Cell::Value(performance_points + cell_bonus),
                        required_base: required,
                        display: performance.display_with(|p| render_performance(event, *p)),
                        performance,
                    }
                }
            })
            .buffered(self.config.max_in_flight)
            .collect()
            .await;

        let matrix = CompetitionMatrix {
            input,
            performance_points,
            cells,
            computed_at: Utc::now(),
        };
        info!(
            cells = matrix.cells.len(),
            degraded = matrix.degraded_count(),
            "competition expansion complete"
        );
        Ok(matrix)
    }

    /// Recompute the event comparison held by `session`.
    ///
    /// `None` input (no points) empties the session. Returns the matrix when
    /// this pass was committed, `None` when it was superseded.
    pub async fn refresh_events(
        &self,
        session: &ComparisonSession<EventEquivalences>,
        input: Option<ExpansionInput>,
    ) -> Option<Arc<EventEquivalences>> {
        let Some(input) = input else {
            session.clear();
            return None;
        };
        let token = session.begin();
        let matrix = self.expand_events(input).await;
        session.commit(token, matrix)
    }

    /// Recompute the competition comparison held by `session`.
    ///
    /// Invalid input is rejected before a pass starts and leaves the session
    /// untouched.
    pub async fn refresh_competition(
        &self,
        session: &ComparisonSession<CompetitionMatrix>,
        input: Option<CompetitionInput>,
    ) -> Result<Option<Arc<CompetitionMatrix>>> {
        let Some(input) = input else {
            session.clear();
            return Ok(None);
        };
        validate_competition_input(&input)?;
        if let Some(finish) = input.baseline {
            finish.bonus()?;
        }

        let token = session.begin();
        let matrix = self.expand_competition(input).await?;
        Ok(session.commit(token, matrix))
    }

    async fn lookup(&self, event: &Event, ctx: &LookupContext, points: i32) -> Cell<f64> {
        match self
            .calculator
            .performance_for(event, ctx.gender, ctx.season, points)
            .await
        {
            Ok(performance) => Cell::Value(performance),
            Err(err) => {
                obs::emit_cell_degraded(event.name, points, &err);
                Cell::Unavailable
            }
        }
    }
}

struct LookupContext {
    gender: Gender,
    season: Season,
}

fn validate_competition_input(input: &CompetitionInput) -> Result<()> {
    if !input.event.is_available(input.gender, input.season) {
        return Err(ScoringError::EventNotAvailable {
            event: input.event.name.to_string(),
            gender: input.gender.to_string(),
            season: input.season.to_string(),
        });
    }
    Ok(())
}

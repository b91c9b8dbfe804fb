//! Rankpoints Core Library
//!
//! Scoring equivalence for athletics ranking points: single-value
//! calculations with wind correction, the competition placement bonus table,
//! and concurrent cross-event and cross-meet equivalence matrices. Raw
//! points/performance conversions are delegated to a
//! [`conversion_client::ConversionService`].

pub mod bonus;
pub mod calculator;
pub mod catalog;
pub mod equivalence;
pub mod error;
pub mod format;
pub mod obs;
pub mod telemetry;
pub mod wind;

pub use bonus::{bonus, last_scoring_place, CompetitionCategory, Finish, Place, MAX_SCORING_PLACE};

pub use calculator::{
    CalculationMode, CalculationOutcome, CalculationRequest, Calculator, PerformanceOutcome,
    PointsOutcome,
};

pub use catalog::{
    all_events, code_for, group_by_section, list_events, resolve_event, Event, EventKind,
    GenderRestriction, Section, SeasonRestriction,
};

pub use equivalence::{
    required_base, total_points, Cell, ComparisonSession, CompetitionCell, CompetitionInput,
    CompetitionMatrix, EngineConfig, EquivalenceEngine, EquivalenceRow, EventEquivalence,
    EventEquivalences, ExpansionInput, PassToken, Phase,
};

pub use error::{Result, ScoringError};

pub use format::{
    input_hint, parse_performance, parse_points, render_performance, round_half_up, round_points,
    MAX_POINTS, MIN_POINTS, NOT_AVAILABLE,
};

pub use wind::{
    adjust_points, correction, is_wind_eligible, parse_wind_speed, wind_delta, WindAdjustment,
    WindReading, NO_WIND_INFO_PENALTY,
};

pub use conversion_client::{ConversionService, Gender, Season};

pub use telemetry::init_tracing;

/// Rankpoints version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

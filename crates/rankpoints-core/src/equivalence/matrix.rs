//! Equivalence matrix value types.
//!
//! Everything here is derived and ephemeral: rebuilt from inputs on every
//! pass, never mutated once built.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use conversion_client::{Gender, Season};
use serde::Serialize;

use crate::bonus::{CompetitionCategory, Finish, MAX_SCORING_PLACE};
use crate::catalog::{Event, Section};
use crate::format::{render_performance, NOT_AVAILABLE};

/// One matrix cell.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "status", content = "value", rename_all = "snake_case")]
pub enum Cell<T> {
    Value(T),
    /// Required baseline is zero or less.
    Unattainable,
    /// The category does not score this place.
    NotScoring,
    /// The conversion service failed for this cell.
    Unavailable,
}

impl<T> Cell<T> {
    pub fn value(&self) -> Option<&T> {
        match self {
            Cell::Value(v) => Some(v),
            _ => None,
        }
    }

    pub fn is_value(&self) -> bool {
        matches!(self, Cell::Value(_))
    }

    /// Render the value, or the `-` sentinel for every other state.
    pub fn display_with(&self, render: impl FnOnce(&T) -> String) -> String {
        match self {
            Cell::Value(v) => render(v),
            _ => NOT_AVAILABLE.to_string(),
        }
    }
}

/// Snapshot of the inputs one cross-event pass runs against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ExpansionInput {
    /// Points value, already wind-adjusted where applicable
    pub points: i32,
    pub gender: Gender,
    pub season: Season,
}

/// The equivalent performance in one event.
#[derive(Debug, Clone, Serialize)]
pub struct EventEquivalence {
    pub event: &'static Event,
    pub performance: Cell<f64>,
    pub display: String,
}

/// Equivalent performances across every event contested by the input's tables.
#[derive(Debug, Clone, Serialize)]
pub struct EventEquivalences {
    pub input: ExpansionInput,
    /// Catalog order
    pub entries: Vec<EventEquivalence>,
    pub computed_at: DateTime<Utc>,
}

impl EventEquivalences {
    /// Entries grouped by display section, empty sections omitted.
    pub fn sections(&self) -> Vec<(Section, Vec<&EventEquivalence>)> {
        let mut groups: Vec<(Section, Vec<&EventEquivalence>)> = Vec::new();
        for entry in &self.entries {
            let section = entry.event.kind.section();
            match groups.last_mut() {
                Some((current, members)) if *current == section => members.push(entry),
                _ => groups.push((section, vec![entry])),
            }
        }
        groups
    }

    pub fn get(&self, event_name: &str) -> Option<&EventEquivalence> {
        self.entries.iter().find(|e| e.event.name == event_name)
    }

    /// Number of cells that fell back to the sentinel.
    pub fn degraded_count(&self) -> usize {
        self.entries
            .iter()
            .filter(|e| !e.performance.is_value())
            .count()
    }
}

/// Snapshot of the inputs one competition pass runs against.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CompetitionInput {
    pub event: &'static Event,
    pub gender: Gender,
    pub season: Season,
    /// Entered points total
    pub points: i32,
    /// Meet and place the entered total was earned at, if any
    pub baseline: Option<Finish>,
}

/// One (category, place) cell of the competition matrix.
#[derive(Debug, Clone, Serialize)]
pub struct CompetitionCell {
    pub category: CompetitionCategory,
    pub place: u8,
    /// Baseline performance points plus this cell's bonus
    pub total_points: Cell<i32>,
    /// Performance points this finish needs to match the entered total
    pub required_base: Cell<i32>,
    /// Performance worth `required_base` points
    pub performance: Cell<f64>,
    pub display: String,
}

/// Points and required performances for every meet category and place.
#[derive(Debug, Clone, Serialize)]
pub struct CompetitionMatrix {
    pub input: CompetitionInput,
    /// Entered total minus the baseline finish's bonus
    pub performance_points: i32,
    /// Scoring cells, category-major in prestige order
    pub cells: Vec<CompetitionCell>,
    pub computed_at: DateTime<Utc>,
}

/// A single place's row across all categories: category -> display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EquivalenceRow {
    pub place: u8,
    pub cells: BTreeMap<CompetitionCategory, String>,
}

impl CompetitionMatrix {
    pub fn cell(&self, category: CompetitionCategory, place: u8) -> Option<&CompetitionCell> {
        self.cells
            .iter()
            .find(|c| c.category == category && c.place == place)
    }

    /// Number of scoring cells without a performance (unattainable or failed).
    pub fn degraded_count(&self) -> usize {
        self.cells
            .iter()
            .filter(|c| !c.performance.is_value())
            .count()
    }

    /// Total points for finishing `place` in `category`; `NotScoring` outside its range.
    pub fn total_points_at(&self, category: CompetitionCategory, place: u8) -> Cell<i32> {
        self.cell(category, place)
            .map_or(Cell::NotScoring, |c| c.total_points)
    }

    /// Required performance for `place` in `category`; `NotScoring` outside its range.
    pub fn performance_at(&self, category: CompetitionCategory, place: u8) -> Cell<f64> {
        self.cell(category, place)
            .map_or(Cell::NotScoring, |c| c.performance)
    }

    /// Total-points grid, one row per place 1..=16.
    pub fn total_points_rows(&self) -> Vec<EquivalenceRow> {
        self.rows(|category, place| {
            self.total_points_at(category, place)
                .display_with(|p| p.to_string())
        })
    }

    /// Required-performance grid, one row per place 1..=16.
    pub fn performance_rows(&self) -> Vec<EquivalenceRow> {
        let event = self.input.event;
        self.rows(|category, place| {
            self.performance_at(category, place)
                .display_with(|p| render_performance(event, *p))
        })
    }

    fn rows(&self, render: impl Fn(CompetitionCategory, u8) -> String) -> Vec<EquivalenceRow> {
        (1..=MAX_SCORING_PLACE)
            .map(|place| EquivalenceRow {
                place,
                cells: CompetitionCategory::ALL
                    .into_iter()
                    .map(|category| (category, render(category, place)))
                    .collect(),
            })
            .collect()
    }
}

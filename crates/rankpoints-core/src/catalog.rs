//! Event catalog.
//!
//! The single source of truth for which events exist, how each is classified,
//! which gender/season tables contest it, and which are wind-affected. Every
//! formatting and eligibility decision elsewhere branches on [`EventKind`],
//! never on the event's name.

use std::fmt;

use conversion_client::{Gender, Season};
use serde::Serialize;

use crate::error::{Result, ScoringError};

/// Discipline classification of an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    Sprint,
    Hurdle,
    MiddleDistance,
    LongDistance,
    Jump,
    Throw,
    Combined,
}

impl EventKind {
    /// Display section this kind is listed under.
    pub fn section(&self) -> Section {
        match self {
            EventKind::Sprint | EventKind::Hurdle => Section::SprintsAndHurdles,
            EventKind::MiddleDistance => Section::MiddleDistance,
            EventKind::LongDistance => Section::LongDistance,
            EventKind::Jump => Section::Jumps,
            EventKind::Throw => Section::Throws,
            EventKind::Combined => Section::CombinedEvents,
        }
    }

    /// Timed events score lower values higher.
    pub fn is_timed(&self) -> bool {
        matches!(
            self,
            EventKind::Sprint | EventKind::Hurdle | EventKind::MiddleDistance | EventKind::LongDistance
        )
    }
}

/// Display grouping, in catalog order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Section {
    SprintsAndHurdles,
    MiddleDistance,
    LongDistance,
    Jumps,
    Throws,
    CombinedEvents,
}

impl Section {
    pub fn label(&self) -> &'static str {
        match self {
            Section::SprintsAndHurdles => "Sprints & Hurdles",
            Section::MiddleDistance => "Middle Distance",
            Section::LongDistance => "Long Distance",
            Section::Jumps => "Jumps",
            Section::Throws => "Throws",
            Section::CombinedEvents => "Combined Events",
        }
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Which gender's tables contest an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GenderRestriction {
    None,
    MensOnly,
    WomensOnly,
    /// Contested by a different gender indoors and outdoors (heptathlon).
    BySeason { indoor: Gender, outdoor: Gender },
}

impl GenderRestriction {
    fn allows(&self, gender: Gender, season: Season) -> bool {
        match self {
            GenderRestriction::None => true,
            GenderRestriction::MensOnly => gender == Gender::Mens,
            GenderRestriction::WomensOnly => gender == Gender::Womens,
            GenderRestriction::BySeason { indoor, outdoor } => match season {
                Season::Indoor => gender == *indoor,
                Season::Outdoor => gender == *outdoor,
            },
        }
    }
}

/// Which season's tables contest an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SeasonRestriction {
    None,
    IndoorOnly,
    OutdoorOnly,
}

impl SeasonRestriction {
    fn allows(&self, season: Season) -> bool {
        match self {
            SeasonRestriction::None => true,
            SeasonRestriction::IndoorOnly => season == Season::Indoor,
            SeasonRestriction::OutdoorOnly => season == Season::Outdoor,
        }
    }
}

/// A catalog event. Static and immutable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Event {
    /// Canonical name, e.g. `"Long Jump"`
    pub name: &'static str,
    /// Short alias the conversion service expects, e.g. `"LJ"`
    pub code: Option<&'static str>,
    pub kind: EventKind,
    pub gender: GenderRestriction,
    pub season: SeasonRestriction,
    pub wind_affected: bool,
}

impl Event {
    /// Identifier sent to the conversion service.
    pub fn service_code(&self) -> &'static str {
        self.code.unwrap_or(self.name)
    }

    /// Whether `(gender, season)` tables contest this event.
    pub fn is_available(&self, gender: Gender, season: Season) -> bool {
        self.season.allows(season) && self.gender.allows(gender, season)
    }

    fn matches(&self, identifier: &str) -> bool {
        self.name.eq_ignore_ascii_case(identifier)
            || self
                .code
                .is_some_and(|code| code.eq_ignore_ascii_case(identifier))
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

const fn event(
    name: &'static str,
    code: Option<&'static str>,
    kind: EventKind,
    gender: GenderRestriction,
    season: SeasonRestriction,
    wind_affected: bool,
) -> Event {
    Event {
        name,
        code,
        kind,
        gender,
        season,
        wind_affected,
    }
}

use EventKind as K;
use GenderRestriction as G;
use SeasonRestriction as S;

static CATALOG: [Event; 24] = [
    event("60m", None, K::Sprint, G::None, S::IndoorOnly, false),
    event("100m", None, K::Sprint, G::None, S::OutdoorOnly, true),
    event("200m", None, K::Sprint, G::None, S::None, true),
    event("400m", None, K::Sprint, G::None, S::None, false),
    event("60mH", None, K::Hurdle, G::None, S::IndoorOnly, false),
    event("100mH", None, K::Hurdle, G::WomensOnly, S::OutdoorOnly, true),
    event("110mH", None, K::Hurdle, G::MensOnly, S::OutdoorOnly, true),
    event("400mH", None, K::Hurdle, G::None, S::OutdoorOnly, false),
    event("800m", None, K::MiddleDistance, G::None, S::None, false),
    event("1500m", None, K::MiddleDistance, G::None, S::None, false),
    event("3000m", None, K::MiddleDistance, G::None, S::None, false),
    event("5000m", None, K::LongDistance, G::None, S::OutdoorOnly, false),
    event("10000m", None, K::LongDistance, G::None, S::OutdoorOnly, false),
    event("High Jump", Some("HJ"), K::Jump, G::None, S::None, false),
    event("Pole Vault", Some("PV"), K::Jump, G::None, S::None, false),
    event("Long Jump", Some("LJ"), K::Jump, G::None, S::None, true),
    event("Triple Jump", Some("TJ"), K::Jump, G::None, S::None, true),
    event("Shot Put", Some("SP"), K::Throw, G::None, S::None, false),
    event("Discus Throw", Some("DT"), K::Throw, G::None, S::OutdoorOnly, false),
    event("Hammer Throw", Some("HT"), K::Throw, G::None, S::OutdoorOnly, false),
    event("Javelin Throw", Some("JT"), K::Throw, G::None, S::OutdoorOnly, false),
    event("Decathlon", None, K::Combined, G::MensOnly, S::OutdoorOnly, false),
    event(
        "Heptathlon",
        None,
        K::Combined,
        G::BySeason {
            indoor: Gender::Mens,
            outdoor: Gender::Womens,
        },
        S::None,
        false,
    ),
    event("Pentathlon", None, K::Combined, G::WomensOnly, S::IndoorOnly, false),
];

/// Every event in catalog order.
pub fn all_events() -> &'static [Event] {
    &CATALOG
}

/// Look up an event by canonical name or short code (case-insensitive).
pub fn resolve_event(identifier: &str) -> Result<&'static Event> {
    let identifier = identifier.trim();
    CATALOG
        .iter()
        .find(|e| e.matches(identifier))
        .ok_or_else(|| ScoringError::UnknownEvent(identifier.to_string()))
}

/// Events contested by `(gender, season)`, in catalog order.
pub fn list_events(gender: Gender, season: Season) -> Vec<&'static Event> {
    CATALOG
        .iter()
        .filter(|e| e.is_available(gender, season))
        .collect()
}

/// Identifier the conversion service expects for `event`.
pub fn code_for(event: &Event) -> &'static str {
    event.service_code()
}

/// Group events by display section, keeping their order; empty sections are omitted.
pub fn group_by_section<'a>(events: &[&'a Event]) -> Vec<(Section, Vec<&'a Event>)> {
    let mut groups: Vec<(Section, Vec<&'a Event>)> = Vec::new();
    for &event in events {
        let section = event.kind.section();
        match groups.last_mut() {
            Some((current, members)) if *current == section => members.push(event),
            _ => groups.push((section, vec![event])),
        }
    }
    groups
}

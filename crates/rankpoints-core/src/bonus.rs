//! Competition bonus table.
//!
//! Fixed placement bonuses per meet category. The table is data, never
//! computed; a revision replaces it wholesale.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Result, ScoringError};

/// Widest scoring range of any category.
pub const MAX_SCORING_PLACE: u8 = 16;

/// Meet category, highest prestige first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum CompetitionCategory {
    #[serde(rename = "OW")]
    OlympicsWorlds,
    #[serde(rename = "DF")]
    DiamondFinal,
    #[serde(rename = "GW")]
    DiamondLeague,
    #[serde(rename = "GL")]
    ContinentalGold,
    A,
    B,
    C,
    D,
    E,
    F,
}

static BONUS_BY_PLACE: [&[i32]; 10] = [
    &[375, 330, 300, 270, 250, 230, 215, 200, 130, 120, 110, 100, 95, 90, 85, 80],
    &[240, 210, 185, 170, 155, 145, 135, 125, 90, 80, 70, 60],
    &[200, 170, 150, 140, 130, 120, 110, 100, 70, 60, 50, 45],
    &[170, 145, 130, 120, 110, 100, 90, 80, 60, 50, 45, 40],
    &[140, 120, 110, 100, 90, 80, 70, 60],
    &[100, 80, 70, 60, 55, 50, 45, 40],
    &[60, 50, 45, 40, 35, 30, 27, 25],
    &[40, 35, 30, 25, 22, 19, 17, 15],
    &[25, 21, 18, 15, 12, 10],
    &[15, 10, 5],
];

impl CompetitionCategory {
    /// All categories in prestige order.
    pub const ALL: [CompetitionCategory; 10] = [
        CompetitionCategory::OlympicsWorlds,
        CompetitionCategory::DiamondFinal,
        CompetitionCategory::DiamondLeague,
        CompetitionCategory::ContinentalGold,
        CompetitionCategory::A,
        CompetitionCategory::B,
        CompetitionCategory::C,
        CompetitionCategory::D,
        CompetitionCategory::E,
        CompetitionCategory::F,
    ];

    fn index(&self) -> usize {
        *self as usize
    }

    /// Short code used on the wire and in tables.
    pub fn code(&self) -> &'static str {
        match self {
            CompetitionCategory::OlympicsWorlds => "OW",
            CompetitionCategory::DiamondFinal => "DF",
            CompetitionCategory::DiamondLeague => "GW",
            CompetitionCategory::ContinentalGold => "GL",
            CompetitionCategory::A => "A",
            CompetitionCategory::B => "B",
            CompetitionCategory::C => "C",
            CompetitionCategory::D => "D",
            CompetitionCategory::E => "E",
            CompetitionCategory::F => "F",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            CompetitionCategory::OlympicsWorlds => "Olympics/Worlds",
            CompetitionCategory::DiamondFinal => "Diamond Final",
            CompetitionCategory::DiamondLeague => "Diamond League",
            CompetitionCategory::ContinentalGold => "Continental Gold",
            CompetitionCategory::A => "Category A",
            CompetitionCategory::B => "Category B",
            CompetitionCategory::C => "Category C",
            CompetitionCategory::D => "Category D",
            CompetitionCategory::E => "Category E",
            CompetitionCategory::F => "Category F",
        }
    }

    /// Bonus per place, index 0 = first place.
    pub fn bonuses(&self) -> &'static [i32] {
        BONUS_BY_PLACE[self.index()]
    }
}

impl fmt::Display for CompetitionCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for CompetitionCategory {
    type Err = ScoringError;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim();
        CompetitionCategory::ALL
            .into_iter()
            .find(|c| c.code().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| ScoringError::UnknownCategory(wanted.to_string()))
    }
}

/// Last place that earns a bonus in `category`.
pub fn last_scoring_place(category: CompetitionCategory) -> u8 {
    category.bonuses().len() as u8
}

/// Bonus for finishing `place` in `category`.
pub fn bonus(category: CompetitionCategory, place: u8) -> Result<i32> {
    let last_place = last_scoring_place(category);
    if place == 0 || place > last_place {
        return Err(ScoringError::PlaceNotScoring {
            category: category.code().to_string(),
            place,
            last_place,
        });
    }
    Ok(category.bonuses()[usize::from(place) - 1])
}

/// Finishing position at a meet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Place {
    Scoring(u8),
    /// Finished outside the category's scoring range.
    BeyondScoring,
}

/// A category plus finishing position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Finish {
    pub category: CompetitionCategory,
    pub place: Place,
}

impl Finish {
    pub fn new(category: CompetitionCategory, place: u8) -> Self {
        Self {
            category,
            place: Place::Scoring(place),
        }
    }

    pub fn beyond_scoring(category: CompetitionCategory) -> Self {
        Self {
            category,
            place: Place::BeyondScoring,
        }
    }

    /// Placement bonus; zero beyond the scoring range.
    pub fn bonus(&self) -> Result<i32> {
        match self.place {
            Place::Scoring(place) => bonus(self.category, place),
            Place::BeyondScoring => Ok(0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_olympic_gold_bonus() {
        assert_eq!(bonus(CompetitionCategory::OlympicsWorlds, 1).unwrap(), 375);
        assert_eq!(bonus(CompetitionCategory::OlympicsWorlds, 16).unwrap(), 80);
    }

    #[test]
    fn test_category_f_scores_three_places() {
        assert_eq!(last_scoring_place(CompetitionCategory::F), 3);
        let err = bonus(CompetitionCategory::F, 4).unwrap_err();
        assert!(matches!(
            err,
            ScoringError::PlaceNotScoring { place: 4, last_place: 3, .. }
        ));
    }

    #[test]
    fn test_place_zero_is_not_scoring() {
        assert!(bonus(CompetitionCategory::A, 0).is_err());
    }

    #[test]
    fn test_scoring_ranges() {
        let ranges: Vec<u8> = CompetitionCategory::ALL
            .iter()
            .map(|c| last_scoring_place(*c))
            .collect();
        assert_eq!(ranges, vec![16, 12, 12, 12, 8, 8, 8, 8, 6, 3]);
        assert_eq!(ranges.iter().max().copied(), Some(MAX_SCORING_PLACE));
    }

    #[test]
    fn test_bonus_non_increasing_by_place() {
        for category in CompetitionCategory::ALL {
            let table = category.bonuses();
            assert!(
                table.windows(2).all(|w| w[0] >= w[1]),
                "{category} increases with place"
            );
        }
    }

    #[test]
    fn test_bonus_non_increasing_across_tiers() {
        for pair in CompetitionCategory::ALL.windows(2) {
            let (higher, lower) = (pair[0], pair[1]);
            for place in 1..=last_scoring_place(lower) {
                assert!(
                    bonus(higher, place).unwrap() >= bonus(lower, place).unwrap(),
                    "{higher} < {lower} at place {place}"
                );
            }
        }
    }

    #[test]
    fn test_codes_parse_case_insensitively() {
        assert_eq!(
            "ow".parse::<CompetitionCategory>().unwrap(),
            CompetitionCategory::OlympicsWorlds
        );
        assert_eq!("GL".parse::<CompetitionCategory>().unwrap().label(), "Continental Gold");
        assert!(matches!(
            "Z".parse::<CompetitionCategory>(),
            Err(ScoringError::UnknownCategory(_))
        ));
    }

    #[test]
    fn test_beyond_scoring_finish_has_zero_bonus() {
        let finish = Finish::beyond_scoring(CompetitionCategory::E);
        assert_eq!(finish.bonus().unwrap(), 0);
        assert_eq!(Finish::new(CompetitionCategory::E, 2).bonus().unwrap(), 21);
    }

    #[test]
    fn test_category_serializes_as_code() {
        let json = serde_json::to_string(&CompetitionCategory::DiamondLeague).unwrap();
        assert_eq!(json, "\"GW\"");
    }
}

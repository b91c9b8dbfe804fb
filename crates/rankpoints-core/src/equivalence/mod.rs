//! Equivalence engine.
//!
//! Turns one points total into everything it is worth elsewhere: the same
//! points in every other event, and the performance needed at every meet
//! category and place to reach the same total once placement bonuses are
//! added.
//!
//! # Module layout
//!
//! - [`matrix`]: `Cell`, `EventEquivalences`, `CompetitionMatrix`, `EquivalenceRow`
//! - [`engine`]: `EquivalenceEngine`, `EngineConfig` (concurrent fan-out)
//! - [`session`]: `ComparisonSession`, `PassToken`, `Phase` (superseded-pass handling)

pub mod engine;
pub mod matrix;
pub mod session;

pub use engine::{EngineConfig, EquivalenceEngine};
pub use matrix::{
    Cell, CompetitionCell, CompetitionInput, CompetitionMatrix, EquivalenceRow,
    EventEquivalence, EventEquivalences, ExpansionInput,
};
pub use session::{ComparisonSession, PassToken, Phase};

use crate::bonus::{bonus, CompetitionCategory, Finish};
use crate::error::Result;

/// Performance points plus the placement bonus of `finish`, if any.
pub fn total_points(base_points: i32, finish: Option<Finish>) -> Result<i32> {
    let bonus = match finish {
        Some(finish) => finish.bonus()?,
        None => 0,
    };
    Ok(base_points + bonus)
}

/// Performance points needed to reach `target_total` by finishing `place` in `category`.
///
/// A baseline of zero or less cannot be achieved and is reported as
/// [`Cell::Unattainable`].
pub fn required_base(target_total: i32, category: CompetitionCategory, place: u8) -> Result<Cell<i32>> {
    let required = target_total - bonus(category, place)?;
    if required <= 0 {
        Ok(Cell::Unattainable)
    } else {
        Ok(Cell::Value(required))
    }
}

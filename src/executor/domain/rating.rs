//! Rating scores and the derived aggregate rating.

use super::ExecutorDomainError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Single rating criterion value, validated to 1..=5.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Score(u8);

impl Score {
    /// Creates a validated criterion score.
    ///
    /// # Errors
    ///
    /// Returns [`ExecutorDomainError::ScoreOutOfRange`] when the value is
    /// outside 1..=5.
    pub const fn new(value: u8) -> Result<Self, ExecutorDomainError> {
        if value < 1 || value > 5 {
            return Err(ExecutorDomainError::ScoreOutOfRange(value));
        }
        Ok(Self(value))
    }

    /// Returns the underlying value.
    #[must_use]
    pub const fn value(self) -> u8 {
        self.0
    }
}

impl fmt::Display for Score {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The three criteria a completed task is rated on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskScores {
    /// Deadline adherence, 1..=5.
    pub deadline_met: Score,
    /// Effectiveness of the delivered work, 1..=5.
    pub effectiveness: Score,
    /// Quality of the delivered work, 1..=5.
    pub quality: Score,
}

impl TaskScores {
    /// Creates a validated score triple.
    ///
    /// # Errors
    ///
    /// Returns [`ExecutorDomainError::ScoreOutOfRange`] when any criterion
    /// is outside 1..=5.
    pub const fn new(
        deadline_met: u8,
        effectiveness: u8,
        quality: u8,
    ) -> Result<Self, ExecutorDomainError> {
        Ok(Self {
            deadline_met: match Score::new(deadline_met) {
                Ok(score) => score,
                Err(err) => return Err(err),
            },
            effectiveness: match Score::new(effectiveness) {
                Ok(score) => score,
                Err(err) => return Err(err),
            },
            quality: match Score::new(quality) {
                Ok(score) => score,
                Err(err) => return Err(err),
            },
        })
    }

    /// Returns the criteria sum, 3..=15.
    #[must_use]
    pub const fn total(self) -> u8 {
        self.deadline_met.value() + self.effectiveness.value() + self.quality.value()
    }
}

/// Aggregate executor rating, stored in tenths (0..=50) to keep the
/// arithmetic integral.
///
/// Displays as `0.0`..=`5.0` with one decimal, matching the
/// round-to-one-decimal rule of the rating invariant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Rating(u16);

impl Rating {
    /// The zero rating reported for an empty history.
    pub const ZERO: Self = Self(0);

    /// Creates a rating from a tenths value.
    #[must_use]
    pub const fn from_tenths(tenths: u16) -> Self {
        Self(tenths)
    }

    /// Returns the rating in tenths, `43` meaning `4.3`.
    #[must_use]
    pub const fn tenths(self) -> u16 {
        self.0
    }

    /// Computes `round(Σ totals / (3 · entries), 1 decimal)` over the given
    /// score totals; [`Rating::ZERO`] when the iterator is empty.
    #[expect(
        clippy::integer_division,
        reason = "tenths rounding is exact integer arithmetic by construction"
    )]
    #[must_use]
    pub fn from_totals(totals: impl IntoIterator<Item = u8>) -> Self {
        let mut sum: u32 = 0;
        let mut entries: u32 = 0;
        for total in totals {
            sum += u32::from(total);
            entries += 1;
        }
        if entries == 0 {
            return Self::ZERO;
        }
        let denominator = 3 * entries;
        let tenths = (10 * sum + denominator / 2) / denominator;
        // Totals are capped at 15 per entry, so the average fits in tenths.
        Self(u16::try_from(tenths).unwrap_or(50))
    }
}

impl fmt::Display for Rating {
    #[expect(
        clippy::integer_division,
        clippy::integer_division_remainder_used,
        reason = "splitting a tenths value into whole and fractional digits"
    )]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.0 / 10, self.0 % 10)
    }
}

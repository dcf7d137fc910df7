// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Rebate Engine - Pip Valuation & Aggregate Scoring

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::arith;
use crate::types::{Level, PairEntry};

/// Result of one explicit `calculate` action.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreCard {
    pub total_valued_pips: Decimal,
    pub points: Decimal,
}

/// Weighted pips for one pair. Sign and magnitude are passed through as-is.
pub fn valued_pips(pips: Decimal, pair_value: Decimal) -> Decimal {
    arith::mul(pips, pair_value)
}

pub fn total_valued_pips(entries: &[PairEntry]) -> Decimal {
    arith::sum(entries.iter().map(PairEntry::valued_pips))
}

/// The cutoff is inclusive: a total exactly at `threshold` qualifies.
pub fn qualifies(total_valued_pips: Decimal, threshold: Decimal) -> bool {
    total_valued_pips >= threshold
}

/// TF Points earned for a VP total. Below the threshold nothing is earned.
pub fn points_for(total_valued_pips: Decimal, level: &Level, threshold: Decimal) -> Decimal {
    if qualifies(total_valued_pips, threshold) {
        arith::mul(total_valued_pips, level.multiplier)
    } else {
        Decimal::ZERO
    }
}

pub fn score(entries: &[PairEntry], level: &Level, threshold: Decimal) -> ScoreCard {
    let total = total_valued_pips(entries);
    ScoreCard {
        total_valued_pips: total,
        points: points_for(total, level, threshold),
    }
}

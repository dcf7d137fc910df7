// Copyright © 2026 Hypermesh Foundation. All rights reserved.
// Licensed under the Business Source License 1.1.
// See the LICENSE file in the repository root for full license text.

//! Medal deduction system.
//!
//! A simulated loss is measured against the average of the qualifying months
//! in the trailing history, and so is the run of consecutive losing months
//! ending at the most recent month. Each percentage is mapped through its own
//! staircase to a non-positive medal delta; the two deltas add up.
//!
//! ```text
//! monthly:     <=100: 0  <=150: -1  <=200: -2  <=250: -3  <=275: -4  <=300: -5  <=325: -6  else -7
//! consecutive: <=100: 0  <=300: -1  <=500: -2  <=600: -3  <=650: -4  <=675: -5  <=700: -6  else -7
//! ```

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::arith;
use crate::config::ProgramConfig;
use crate::types::MonthlyHistory;

// ---------------------------------------------------------------------------
// MedalStaircase
// ---------------------------------------------------------------------------

/// Monotonically non-increasing step function from a loss percentage to a
/// medal delta.
///
/// Band `i` covers `(thresholds[i-1], thresholds[i]]` and yields `-i`; a
/// percentage above the last threshold yields `-thresholds.len()`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MedalStaircase {
    thresholds: Vec<Decimal>,
}

impl MedalStaircase {
    pub fn new(thresholds: Vec<Decimal>) -> Self {
        Self { thresholds }
    }

    pub fn monthly() -> Self {
        Self::new(vec![
            dec!(100),
            dec!(150),
            dec!(200),
            dec!(250),
            dec!(275),
            dec!(300),
            dec!(325),
        ])
    }

    pub fn consecutive() -> Self {
        Self::new(vec![
            dec!(100),
            dec!(300),
            dec!(500),
            dec!(600),
            dec!(650),
            dec!(675),
            dec!(700),
        ])
    }

    pub fn thresholds(&self) -> &[Decimal] {
        &self.thresholds
    }

    pub fn is_ascending(&self) -> bool {
        self.thresholds.windows(2).all(|w| w[0] < w[1])
    }

    /// Upper bounds are inclusive.
    pub fn delta(&self, percentage: Decimal) -> i64 {
        let band = self
            .thresholds
            .iter()
            .position(|&t| percentage <= t)
            .unwrap_or(self.thresholds.len());
        -(band as i64)
    }
}

// ---------------------------------------------------------------------------
// Inputs to the staircases
// ---------------------------------------------------------------------------

/// Mean of months at or above `qualification`; `fallback` when none qualify.
pub fn average_monthly_vp(
    history: &MonthlyHistory,
    qualification: Decimal,
    fallback: Decimal,
) -> Decimal {
    let qualifying: Vec<Decimal> = history
        .months()
        .iter()
        .copied()
        .filter(|&vp| vp >= qualification)
        .collect();
    if qualifying.is_empty() {
        return fallback;
    }
    arith::div(arith::sum(qualifying.iter().copied()), Decimal::from(qualifying.len()))
}

/// `|loss| / average * 100`, zero when the average is zero.
pub fn loss_percentage(loss_vp: Decimal, average: Decimal) -> Decimal {
    arith::mul(arith::div(loss_vp.abs(), average), dec!(100))
}

/// Sum of the unbroken run of losing months ending at the newest month.
/// A zero month ends the run.
pub fn consecutive_loss_vp(history: &MonthlyHistory) -> Decimal {
    arith::sum(
        history
            .months()
            .iter()
            .rev()
            .take_while(|&&vp| vp < Decimal::ZERO)
            .copied(),
    )
}

// ---------------------------------------------------------------------------
// MedalOutcome
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MedalOutcome {
    pub average_monthly_vp: Decimal,
    pub monthly_loss_percentage: Decimal,
    pub monthly_medal_change: i64,
    pub consecutive_loss_vp: Decimal,
    pub consecutive_loss_percentage: Decimal,
    pub consecutive_medal_change: i64,
    pub final_medal_change: i64,
    pub final_medal_count: i64,
}

pub fn assess(
    history: &MonthlyHistory,
    loss_vp_input: Decimal,
    current_medals: i64,
    config: &ProgramConfig,
) -> MedalOutcome {
    let average = average_monthly_vp(
        history,
        config.qualification_threshold,
        config.fallback_average_vp,
    );

    let monthly_pct = loss_percentage(loss_vp_input, average);
    let monthly_change = config.monthly_staircase.delta(monthly_pct);

    let streak = consecutive_loss_vp(history);
    let streak_pct = loss_percentage(streak, average);
    let streak_change = config.consecutive_staircase.delta(streak_pct);

    let final_change = monthly_change + streak_change;

    MedalOutcome {
        average_monthly_vp: average,
        monthly_loss_percentage: monthly_pct,
        monthly_medal_change: monthly_change,
        consecutive_loss_vp: streak,
        consecutive_loss_percentage: streak_pct,
        consecutive_medal_change: streak_change,
        final_medal_change: final_change,
        final_medal_count: current_medals.saturating_add(final_change).max(0),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn history(months: [i64; 6]) -> MonthlyHistory {
        MonthlyHistory::new(months.map(Decimal::from))
    }

    #[test]
    fn monthly_staircase_bands() {
        let s = MedalStaircase::monthly();
        assert_eq!(s.delta(dec!(0)), 0);
        assert_eq!(s.delta(dec!(100)), 0);
        assert_eq!(s.delta(dec!(100.01)), -1);
        assert_eq!(s.delta(dec!(150)), -1);
        assert_eq!(s.delta(dec!(200)), -2);
        assert_eq!(s.delta(dec!(250)), -3);
        assert_eq!(s.delta(dec!(275)), -4);
        assert_eq!(s.delta(dec!(300)), -5);
        assert_eq!(s.delta(dec!(325)), -6);
        assert_eq!(s.delta(dec!(325.0001)), -7);
        assert_eq!(s.delta(dec!(10000)), -7);
    }

    #[test]
    fn consecutive_staircase_bands() {
        let s = MedalStaircase::consecutive();
        assert_eq!(s.delta(dec!(100)), 0);
        assert_eq!(s.delta(dec!(101)), -1);
        assert_eq!(s.delta(dec!(300)), -1);
        assert_eq!(s.delta(dec!(500)), -2);
        assert_eq!(s.delta(dec!(600)), -3);
        assert_eq!(s.delta(dec!(650)), -4);
        assert_eq!(s.delta(dec!(675)), -5);
        assert_eq!(s.delta(dec!(700)), -6);
        assert_eq!(s.delta(dec!(701)), -7);
    }

    #[test]
    fn staircases_never_increase() {
        for s in [MedalStaircase::monthly(), MedalStaircase::consecutive()] {
            let mut last = 0;
            for pct in (0..=1000).step_by(5) {
                let d = s.delta(Decimal::from(pct));
                assert!(d <= last, "delta rose at {pct}%");
                last = d;
            }
        }
    }

    #[test]
    fn average_uses_qualifying_months_only() {
        let h = history([300, 600, 100, -50, 0, 900]);
        assert_eq!(average_monthly_vp(&h, dec!(300), dec!(300)), dec!(600));
    }

    #[test]
    fn average_falls_back_when_nothing_qualifies() {
        let h = history([0, 0, 0, 0, 0, 0]);
        assert_eq!(average_monthly_vp(&h, dec!(300), dec!(300)), dec!(300));
    }

    #[test]
    fn zero_month_breaks_the_streak() {
        let h = history([300, 300, 300, -200, -100, 0]);
        assert_eq!(consecutive_loss_vp(&h), Decimal::ZERO);
    }

    #[test]
    fn streak_stops_at_first_non_negative_month() {
        let h = history([-500, 300, 300, 300, -150, -200]);
        assert_eq!(consecutive_loss_vp(&h), dec!(-350));
    }

    #[test]
    fn consecutive_losses_cost_one_medal() {
        let config = ProgramConfig::default();
        let h = history([300, 300, 300, 300, -150, -200]);
        let outcome = assess(&h, Decimal::ZERO, 10, &config);
        assert_eq!(outcome.average_monthly_vp, dec!(300));
        assert_eq!(outcome.consecutive_loss_vp, dec!(-350));
        assert_eq!(outcome.consecutive_loss_percentage.round_dp(1), dec!(116.7));
        assert_eq!(outcome.consecutive_medal_change, -1);
        assert_eq!(outcome.monthly_medal_change, 0);
        assert_eq!(outcome.final_medal_count, 9);
    }

    #[test]
    fn combined_deltas_add_up() {
        let config = ProgramConfig::default();
        let h = history([400, 400, 400, -600, -600, -600]);
        // average 400; loss 1000 → 250% → -3; streak 1800 → 450% → -2
        let outcome = assess(&h, dec!(-1000), 10, &config);
        assert_eq!(outcome.monthly_medal_change, -3);
        assert_eq!(outcome.consecutive_medal_change, -2);
        assert_eq!(outcome.final_medal_change, -5);
        assert_eq!(outcome.final_medal_count, 5);
    }

    #[test]
    fn medals_never_go_negative() {
        let config = ProgramConfig::default();
        let h = history([0, 0, -900, -900, -900, -900]);
        let outcome = assess(&h, dec!(-5000), 3, &config);
        assert_eq!(outcome.final_medal_change, -14);
        assert_eq!(outcome.final_medal_count, 0);
    }

    #[test]
    fn huge_losses_land_in_the_last_band() {
        let config = ProgramConfig::default();
        let h = MonthlyHistory::new([Decimal::MIN; 6]);
        let outcome = assess(&h, Decimal::MIN, 10, &config);
        assert_eq!(outcome.average_monthly_vp, dec!(300));
        assert_eq!(outcome.consecutive_loss_vp, Decimal::MIN);
        assert_eq!(outcome.monthly_medal_change, -7);
        assert_eq!(outcome.consecutive_medal_change, -7);
        assert_eq!(outcome.final_medal_change, -14);
        assert_eq!(outcome.final_medal_count, 0);
    }

    #[test]
    fn huge_qualifying_months_average_without_overflow() {
        let h = MonthlyHistory::new([Decimal::MAX; 6]);
        assert_eq!(average_monthly_vp(&h, dec!(300), dec!(300)), Decimal::MAX / Decimal::from(6));
    }
}

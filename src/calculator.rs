// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Rebate Engine - Calculator Core

use rust_decimal::Decimal;
use tracing::{debug, warn};
use wasm_bindgen::prelude::*;

use crate::adapter::from_decimal;
use crate::config::{ConfigError, ProgramConfig};
use crate::input;
use crate::medals::{self, MedalOutcome};
use crate::redemption::{self, RedemptionNotice, RedemptionQuote};
use crate::scoring;
use crate::simulator::{self, PointDeduction, VpProjection};
use crate::types::*;

// ─── RewardsCalculator struct ────────────────────────────────────────────────

/// The single owner of all calculator state.
///
/// Inputs are plain fields; every derived value is recomputed from them on
/// read, so nothing can be observed stale. The exceptions are
/// `total_valued_pips` and `points`, which only change on [`calculate`]
/// (or [`reset`]).
///
/// [`calculate`]: RewardsCalculator::calculate
/// [`reset`]: RewardsCalculator::reset
#[wasm_bindgen]
pub struct RewardsCalculator {
    pub(crate) config: ProgramConfig,
    pub(crate) entries: Vec<PairEntry>,
    pub(crate) level: usize,
    pub(crate) tier: PartnershipTier,
    pub(crate) score: scoring::ScoreCard,
    pub(crate) points_to_redeem: Decimal,
    pub(crate) sim: SimulationState,
    pub(crate) history: MonthlyHistory,
}

// ─── Internal Logic (Testable, pure Rust) ────────────────────────────────────

impl RewardsCalculator {
    /// Build a calculator over a custom table set, rejecting tables the
    /// calculator cannot index into (no pairs, no levels, zero lot, ...).
    pub fn with_config(config: ProgramConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::from_validated(config))
    }

    fn from_validated(config: ProgramConfig) -> Self {
        let mut calc = Self {
            entries: Vec::new(),
            level: 0,
            tier: PartnershipTier::Basic,
            score: scoring::ScoreCard::default(),
            points_to_redeem: Decimal::ZERO,
            sim: initial_simulation(&config),
            history: MonthlyHistory::default(),
            config,
        };
        calc.reset();
        calc
    }

    pub fn config(&self) -> &ProgramConfig {
        &self.config
    }

    // ── Setters ─────────────────────────────────────────────────────────

    /// Unknown symbols are ignored.
    pub fn set_pips(&mut self, symbol: &str, pips: Decimal) {
        match self.entries.iter_mut().find(|e| e.symbol() == symbol) {
            Some(entry) => {
                entry.set_pips(pips);
                debug!(symbol, %pips, valued = %entry.valued_pips(), "pips updated");
            }
            None => warn!(symbol, "ignoring pips for unknown pair"),
        }
    }

    pub fn set_pips_input(&mut self, symbol: &str, raw: &str) {
        self.set_pips(symbol, input::parse_leading(raw));
    }

    /// Exact-name lookup; a miss leaves the selection unchanged. A tier the
    /// new level does not fund falls back to Basic.
    pub fn select_level(&mut self, name: &str) {
        let Some(index) = self.config.level_index(name) else {
            warn!(name, "ignoring unknown level");
            return;
        };
        self.level = index;
        if self.config.levels[index].redemption_for(self.tier).is_zero() {
            self.tier = PartnershipTier::Basic;
        }
        debug!(level = name, tier = %self.tier, "level selected");
    }

    /// Unconditional; derived redemption values treat an unfunded tier as 0%.
    pub fn select_partnership_tier(&mut self, tier: PartnershipTier) {
        self.tier = tier;
        debug!(%tier, "partnership tier selected");
    }

    pub fn set_points_to_redeem(&mut self, points: Decimal) {
        self.points_to_redeem = points;
    }

    pub fn set_points_to_redeem_input(&mut self, raw: &str) {
        self.set_points_to_redeem(input::parse_strict(raw));
    }

    pub fn set_target_vp(&mut self, vp: Decimal) {
        self.sim.target_vp = vp;
    }

    pub fn set_losing_trades(&mut self, trades: Decimal) {
        self.sim.losing_trades = trades;
    }

    pub fn set_loss_per_trade_vp(&mut self, vp: Decimal) {
        self.sim.loss_per_trade_vp = vp;
    }

    pub fn set_selected_pip_value(&mut self, value: Decimal) {
        self.sim.selected_pip_value = value;
    }

    pub fn select_loss_level(&mut self, name: &str) {
        match self.config.level_index(name) {
            Some(index) => self.sim.loss_level = index,
            None => warn!(name, "ignoring unknown loss level"),
        }
    }

    /// `index` counts from the oldest month; out-of-range indices are ignored.
    pub fn set_monthly_vp(&mut self, index: usize, vp: Decimal) {
        if !self.history.set(index, vp) {
            warn!(index, "ignoring out-of-range history month");
        }
    }

    pub fn set_current_medals(&mut self, medals: i64) {
        self.sim.current_medals = medals;
    }

    // ── Actions ─────────────────────────────────────────────────────────

    pub fn calculate(&mut self) {
        self.score = scoring::score(
            &self.entries,
            self.selected_level(),
            self.config.qualification_threshold,
        );
        debug!(
            total_vp = %self.score.total_valued_pips,
            points = %self.score.points,
            "calculated"
        );
    }

    /// Replace the whole working set with its defaults.
    pub fn reset(&mut self) {
        self.entries = self.config.pairs.iter().cloned().map(PairEntry::new).collect();
        self.level = 0;
        self.tier = PartnershipTier::Basic;
        self.score = scoring::ScoreCard::default();
        self.points_to_redeem = Decimal::ZERO;
        self.sim = initial_simulation(&self.config);
        self.history = MonthlyHistory::default();
        debug!("calculator reset");
    }

    // ── Inputs ──────────────────────────────────────────────────────────

    pub fn entries(&self) -> &[PairEntry] {
        &self.entries
    }

    pub fn entry(&self, symbol: &str) -> Option<&PairEntry> {
        self.entries.iter().find(|e| e.symbol() == symbol)
    }

    pub fn selected_level(&self) -> &Level {
        &self.config.levels[self.level]
    }

    pub fn selected_tier(&self) -> PartnershipTier {
        self.tier
    }

    pub fn points_to_redeem(&self) -> Decimal {
        self.points_to_redeem
    }

    pub fn simulation(&self) -> &SimulationState {
        &self.sim
    }

    pub fn loss_level(&self) -> &Level {
        &self.config.levels[self.sim.loss_level]
    }

    pub fn monthly_history(&self) -> &MonthlyHistory {
        &self.history
    }

    pub fn level_names(&self) -> Vec<&str> {
        self.config.levels.iter().map(|l| l.name.as_str()).collect()
    }

    pub fn pip_value_buckets(&self) -> Vec<Decimal> {
        self.config.pip_value_buckets()
    }

    // ── Aggregate scoring ───────────────────────────────────────────────

    pub fn total_valued_pips(&self) -> Decimal {
        self.score.total_valued_pips
    }

    pub fn points(&self) -> Decimal {
        self.score.points
    }

    // ── Redemption ──────────────────────────────────────────────────────

    pub fn redemption(&self) -> RedemptionQuote {
        redemption::quote(
            self.selected_level(),
            self.tier,
            self.score.points,
            self.points_to_redeem,
            self.config.redemption_lot,
        )
    }

    pub fn available_tiers(&self) -> Vec<PartnershipTier> {
        redemption::available_tiers(self.selected_level())
    }

    pub fn redeemable_percentage(&self) -> Decimal {
        redemption::redeemable_percentage(self.selected_level(), self.tier)
    }

    pub fn redeemable_balance(&self) -> Decimal {
        redemption::redeemable_balance(self.score.points, self.redeemable_percentage())
    }

    pub fn redeemed_cash_value(&self) -> Decimal {
        self.redemption().redeemed_cash_value
    }

    pub fn redemption_notice(&self) -> Option<RedemptionNotice> {
        self.redemption().notice
    }

    /// Empty when there is nothing to advise.
    pub fn redemption_message(&self) -> String {
        self.redemption_notice().map(|n| n.to_string()).unwrap_or_default()
    }

    // ── Simulators ──────────────────────────────────────────────────────

    pub fn projection(&self) -> VpProjection {
        simulator::project(&self.sim, self.config.pip_normalization)
    }

    pub fn pips_from_vp(&self) -> Decimal {
        self.projection().pips_from_vp
    }

    pub fn percentage_from_vp(&self) -> Decimal {
        self.projection().percentage_from_vp
    }

    pub fn remaining_vp(&self) -> Decimal {
        self.projection().remaining_vp
    }

    pub fn deduction(&self) -> PointDeduction {
        simulator::deduct(&self.sim, self.loss_level(), self.config.deduction_threshold)
    }

    pub fn loss_vp_input(&self) -> Decimal {
        self.deduction().loss_vp_input
    }

    pub fn is_deduction_applied(&self) -> bool {
        self.deduction().is_deduction_applied
    }

    pub fn total_point_deduction(&self) -> Decimal {
        self.deduction().total_point_deduction
    }

    pub fn medals(&self) -> MedalOutcome {
        medals::assess(
            &self.history,
            self.loss_vp_input(),
            self.sim.current_medals,
            &self.config,
        )
    }

    pub fn final_medal_count(&self) -> i64 {
        self.medals().final_medal_count
    }

    // ── Snapshot ────────────────────────────────────────────────────────

    pub fn snapshot(&self) -> CalculatorSnapshot {
        let quote = self.redemption();
        let projection = self.projection();
        let deduction = self.deduction();
        let medals = self.medals();

        CalculatorSnapshot {
            entries: self
                .entries
                .iter()
                .map(|e| PairEntrySnapshot {
                    symbol: e.symbol().to_string(),
                    value: from_decimal(e.pair().value),
                    pips: from_decimal(e.pips()),
                    valued_pips: from_decimal(e.valued_pips()),
                })
                .collect(),
            level: self.selected_level().name.clone(),
            partnership_tier: self.tier,
            total_valued_pips: from_decimal(self.score.total_valued_pips),
            points: from_decimal(self.score.points),
            redemption: RedemptionSnapshot {
                available_tiers: quote.available_tiers,
                redeemable_percentage: from_decimal(quote.redeemable_percentage),
                redeemable_balance: from_decimal(quote.redeemable_balance),
                points_to_redeem: from_decimal(self.points_to_redeem),
                redeemed_cash_value: from_decimal(quote.redeemed_cash_value),
                message: quote.notice.map(|n| n.to_string()).unwrap_or_default(),
            },
            projection: ProjectionSnapshot {
                target_vp: from_decimal(self.sim.target_vp),
                selected_pip_value: from_decimal(self.sim.selected_pip_value),
                pips_from_vp: from_decimal(projection.pips_from_vp),
                percentage_from_vp: from_decimal(projection.percentage_from_vp),
                remaining_vp: from_decimal(projection.remaining_vp),
            },
            deduction: DeductionSnapshot {
                loss_level: self.loss_level().name.clone(),
                losing_trades: from_decimal(self.sim.losing_trades),
                loss_per_trade_vp: from_decimal(self.sim.loss_per_trade_vp),
                loss_vp_input: from_decimal(deduction.loss_vp_input),
                is_deduction_applied: deduction.is_deduction_applied,
                total_point_deduction: from_decimal(deduction.total_point_deduction),
            },
            medals: MedalSnapshot {
                monthly_history: self.history.months().iter().copied().map(from_decimal).collect(),
                current_medals: self.sim.current_medals,
                average_monthly_vp: from_decimal(medals.average_monthly_vp),
                monthly_loss_percentage: from_decimal(medals.monthly_loss_percentage),
                monthly_medal_change: medals.monthly_medal_change,
                consecutive_loss_vp: from_decimal(medals.consecutive_loss_vp),
                consecutive_loss_percentage: from_decimal(medals.consecutive_loss_percentage),
                consecutive_medal_change: medals.consecutive_medal_change,
                final_medal_change: medals.final_medal_change,
                final_medal_count: medals.final_medal_count,
            },
        }
    }
}

impl Default for RewardsCalculator {
    fn default() -> Self {
        Self::from_validated(ProgramConfig::default())
    }
}

fn initial_simulation(config: &ProgramConfig) -> SimulationState {
    SimulationState {
        target_vp: Decimal::ZERO,
        losing_trades: Decimal::ZERO,
        loss_per_trade_vp: config.defaults.loss_per_trade_vp,
        selected_pip_value: config.defaults.selected_pip_value,
        current_medals: config.defaults.current_medals,
        loss_level: 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn starts_in_reset_state() {
        let calc = RewardsCalculator::default();
        assert_eq!(calc.entries().len(), 16);
        assert!(calc.entries().iter().all(|e| e.pips().is_zero() && e.valued_pips().is_zero()));
        assert_eq!(calc.selected_level().name, "Rookie");
        assert_eq!(calc.selected_tier(), PartnershipTier::Basic);
        assert_eq!(calc.simulation().loss_per_trade_vp, dec!(125));
        assert_eq!(calc.simulation().selected_pip_value, dec!(0.5));
        assert_eq!(calc.simulation().current_medals, 10);
        assert_eq!(calc.loss_level().name, "Rookie");
    }

    #[test]
    fn unknown_symbol_is_ignored() {
        let mut calc = RewardsCalculator::default();
        calc.set_pips("BTCUSD", dec!(1000));
        calc.calculate();
        assert_eq!(calc.total_valued_pips(), Decimal::ZERO);
        assert!(calc.entry("BTCUSD").is_none());
    }

    #[test]
    fn points_are_not_recomputed_until_calculate() {
        let mut calc = RewardsCalculator::default();
        calc.set_pips("EURUSD", dec!(200));
        assert_eq!(calc.points(), Decimal::ZERO);
        calc.calculate();
        assert_eq!(calc.points(), dec!(90));

        calc.select_level("Legend");
        assert_eq!(calc.points(), dec!(90));
        calc.calculate();
        assert_eq!(calc.points(), dec!(450));
    }

    #[test]
    fn level_change_drops_unfunded_tier() {
        let mut calc = RewardsCalculator::default();
        calc.select_level("Legend");
        calc.select_partnership_tier(PartnershipTier::Priority);
        calc.select_level("Master (Medal 11-12)");
        assert_eq!(calc.selected_tier(), PartnershipTier::Priority);
        calc.select_level("Elite");
        assert_eq!(calc.selected_tier(), PartnershipTier::Basic);
    }

    #[test]
    fn unknown_level_is_a_no_op() {
        let mut calc = RewardsCalculator::default();
        calc.select_level("Elite");
        calc.select_partnership_tier(PartnershipTier::Prospect);
        calc.select_level("Grandmaster");
        assert_eq!(calc.selected_level().name, "Elite");
        assert_eq!(calc.selected_tier(), PartnershipTier::Prospect);
    }

    #[test]
    fn unfunded_tier_reads_as_zero_percent() {
        let mut calc = RewardsCalculator::default();
        calc.select_level("Elite");
        calc.select_partnership_tier(PartnershipTier::Priority);
        assert_eq!(calc.redeemable_percentage(), Decimal::ZERO);
        assert_eq!(calc.redeemable_balance(), Decimal::ZERO);
    }

    #[test]
    fn out_of_range_month_is_ignored() {
        let mut calc = RewardsCalculator::default();
        calc.set_monthly_vp(6, dec!(-1000));
        assert!(calc.monthly_history().months().iter().all(|m| m.is_zero()));
    }

    #[test]
    fn text_inputs_are_coerced() {
        let mut calc = RewardsCalculator::default();
        calc.set_pips_input("USDJPY", "350 pips");
        calc.set_points_to_redeem_input("100abc");
        assert_eq!(calc.entry("USDJPY").map(|e| e.valued_pips()), Some(dec!(350)));
        assert_eq!(calc.points_to_redeem(), Decimal::ZERO);
    }

    #[test]
    fn snapshot_reflects_current_state() {
        let mut calc = RewardsCalculator::default();
        calc.select_level("Legend");
        calc.set_pips("NZDUSD", dec!(500));
        calc.calculate();
        calc.set_points_to_redeem(dec!(150));

        let snap = calc.snapshot();
        assert_eq!(snap.level, "Legend");
        assert_eq!(snap.total_valued_pips, 1000.0);
        assert_eq!(snap.points, 1500.0);
        assert_eq!(snap.redemption.redeemable_balance, 750.0);
        assert_eq!(snap.redemption.message, "Redemption must be in multiples of 100.");
        assert_eq!(snap.medals.final_medal_count, 10);
        assert_eq!(snap.entries.len(), 16);
    }

    #[test]
    fn with_config_rejects_tables_it_cannot_index() {
        let no_levels = ProgramConfig { levels: Vec::new(), ..ProgramConfig::default() };
        assert!(matches!(
            RewardsCalculator::with_config(no_levels),
            Err(ConfigError::NoLevels)
        ));

        let zero_lot = ProgramConfig { redemption_lot: Decimal::ZERO, ..ProgramConfig::default() };
        assert!(matches!(
            RewardsCalculator::with_config(zero_lot),
            Err(ConfigError::NonPositiveConstant { name: "redemption_lot", .. })
        ));

        assert!(RewardsCalculator::with_config(ProgramConfig::default()).is_ok());
    }

    #[test]
    fn unbounded_inputs_never_panic() {
        let mut calc = RewardsCalculator::default();
        calc.select_level("Legend");
        calc.select_partnership_tier(PartnershipTier::Priority);
        calc.set_pips("NZDUSD", dec!(50000000000000000000000000000));
        calc.set_pips_input("AUDUSD", "50000000000000000000000000000");
        calc.calculate();
        assert_eq!(calc.entry("NZDUSD").map(|e| e.valued_pips()), Some(Decimal::MAX));
        assert_eq!(calc.total_valued_pips(), Decimal::MAX);
        assert_eq!(calc.points(), Decimal::MAX);
        assert_eq!(calc.redeemable_balance(), Decimal::MAX);

        calc.set_losing_trades(dec!(1000000000000000));
        calc.set_loss_per_trade_vp(dec!(1000000000000000));
        assert_eq!(calc.loss_vp_input(), Decimal::MIN);
        assert_eq!(calc.medals().monthly_medal_change, -7);
        assert_eq!(calc.final_medal_count(), 3);

        calc.set_target_vp(dec!(100000000000000000000));
        calc.set_selected_pip_value(dec!(0.0000000001));
        assert_eq!(calc.pips_from_vp(), Decimal::MAX);

        let snap = calc.snapshot();
        assert!(snap.points > 0.0);
        assert_eq!(snap.medals.final_medal_count, 3);
    }
}

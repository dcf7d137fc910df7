// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Rebate Engine - Type Definitions

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of trailing months tracked by the medal deduction system.
pub const HISTORY_MONTHS: usize = 6;

// ─── Partnership Tier ───────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum PartnershipTier {
    Basic = 0,
    Prospect = 1,
    Priority = 2,
}

impl Default for PartnershipTier {
    fn default() -> Self { PartnershipTier::Basic }
}

impl PartnershipTier {
    pub const ALL: [PartnershipTier; 3] = [Self::Basic, Self::Prospect, Self::Priority];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Basic => "Basic",
            Self::Prospect => "Prospect",
            Self::Priority => "Priority",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.name() == name)
    }
}

impl fmt::Display for PartnershipTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ─── Currency Pair ──────────────────────────────────────────────────────────

/// A tradable pair and its per-pip weighting factor.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CurrencyPair {
    pub symbol: String,
    pub value: Decimal,
}

impl CurrencyPair {
    pub fn new(symbol: &str, value: Decimal) -> Self {
        Self { symbol: symbol.to_string(), value }
    }
}

// ─── Pair Entry ─────────────────────────────────────────────────────────────

/// Per-pair pip input. `valued_pips` is only ever written through
/// [`PairEntry::set_pips`], so it always equals `pips * pair.value`,
/// clamped to the Decimal range.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PairEntry {
    pair: CurrencyPair,
    pips: Decimal,
    valued_pips: Decimal,
}

impl PairEntry {
    pub fn new(pair: CurrencyPair) -> Self {
        Self { pair, pips: Decimal::ZERO, valued_pips: Decimal::ZERO }
    }

    pub fn set_pips(&mut self, pips: Decimal) {
        self.pips = pips;
        self.valued_pips = crate::scoring::valued_pips(pips, self.pair.value);
    }

    pub fn pair(&self) -> &CurrencyPair { &self.pair }
    pub fn symbol(&self) -> &str { &self.pair.symbol }
    pub fn pips(&self) -> Decimal { self.pips }
    pub fn valued_pips(&self) -> Decimal { self.valued_pips }
}

// ─── Level ──────────────────────────────────────────────────────────────────

/// Redemption fraction per partnership tier. Zero disables the tier.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct PartnershipRedemption {
    pub basic: Decimal,
    pub prospect: Decimal,
    pub priority: Decimal,
}

impl PartnershipRedemption {
    pub fn new(basic: Decimal, prospect: Decimal, priority: Decimal) -> Self {
        Self { basic, prospect, priority }
    }

    pub fn none() -> Self {
        Self::new(Decimal::ZERO, Decimal::ZERO, Decimal::ZERO)
    }

    pub fn for_tier(&self, tier: PartnershipTier) -> Decimal {
        match tier {
            PartnershipTier::Basic => self.basic,
            PartnershipTier::Prospect => self.prospect,
            PartnershipTier::Priority => self.priority,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Level {
    pub name: String,
    /// VP to TF Point conversion factor.
    pub multiplier: Decimal,
    /// Cash value of one redeemed point. Zero disables redemption.
    pub redemption_rate: Decimal,
    pub partnership_redemption: PartnershipRedemption,
}

impl Level {
    pub fn new(
        name: &str,
        multiplier: Decimal,
        redemption_rate: Decimal,
        partnership_redemption: PartnershipRedemption,
    ) -> Self {
        Self {
            name: name.to_string(),
            multiplier,
            redemption_rate,
            partnership_redemption,
        }
    }

    pub fn redemption_for(&self, tier: PartnershipTier) -> Decimal {
        self.partnership_redemption.for_tier(tier)
    }

    pub fn redemption_enabled(&self) -> bool {
        !self.redemption_rate.is_zero()
    }
}

// ─── Monthly History ────────────────────────────────────────────────────────

/// Trailing monthly VP totals, oldest first. Negative months are net losses.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct MonthlyHistory([Decimal; HISTORY_MONTHS]);

impl MonthlyHistory {
    pub fn new(months: [Decimal; HISTORY_MONTHS]) -> Self {
        Self(months)
    }

    pub fn get(&self, index: usize) -> Option<Decimal> {
        self.0.get(index).copied()
    }

    /// Returns false when `index` is out of range; the history is unchanged.
    pub fn set(&mut self, index: usize, value: Decimal) -> bool {
        match self.0.get_mut(index) {
            Some(slot) => {
                *slot = value;
                true
            }
            None => false,
        }
    }

    pub fn months(&self) -> &[Decimal; HISTORY_MONTHS] {
        &self.0
    }
}

// ─── Simulation State ───────────────────────────────────────────────────────

/// Scalar inputs for the VP projection, point deduction and medal simulators.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SimulationState {
    pub target_vp: Decimal,
    pub losing_trades: Decimal,
    pub loss_per_trade_vp: Decimal,
    pub selected_pip_value: Decimal,
    pub current_medals: i64,
    /// Index into the level table.
    pub loss_level: usize,
}

// ─── Snapshots (JS-facing, f64) ─────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PairEntrySnapshot {
    pub symbol: String,
    pub value: f64,
    pub pips: f64,
    pub valued_pips: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RedemptionSnapshot {
    pub available_tiers: Vec<PartnershipTier>,
    pub redeemable_percentage: f64,
    pub redeemable_balance: f64,
    pub points_to_redeem: f64,
    pub redeemed_cash_value: f64,
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectionSnapshot {
    pub target_vp: f64,
    pub selected_pip_value: f64,
    pub pips_from_vp: f64,
    pub percentage_from_vp: f64,
    pub remaining_vp: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeductionSnapshot {
    pub loss_level: String,
    pub losing_trades: f64,
    pub loss_per_trade_vp: f64,
    pub loss_vp_input: f64,
    pub is_deduction_applied: bool,
    pub total_point_deduction: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MedalSnapshot {
    pub monthly_history: Vec<f64>,
    pub current_medals: i64,
    pub average_monthly_vp: f64,
    pub monthly_loss_percentage: f64,
    pub monthly_medal_change: i64,
    pub consecutive_loss_vp: f64,
    pub consecutive_loss_percentage: f64,
    pub consecutive_medal_change: i64,
    pub final_medal_change: i64,
    pub final_medal_count: i64,
}

/// Every input and derived value of a calculator, as handed to the UI.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalculatorSnapshot {
    pub entries: Vec<PairEntrySnapshot>,
    pub level: String,
    pub partnership_tier: PartnershipTier,
    pub total_valued_pips: f64,
    pub points: f64,
    pub redemption: RedemptionSnapshot,
    pub projection: ProjectionSnapshot,
    pub deduction: DeductionSnapshot,
    pub medals: MedalSnapshot,
}

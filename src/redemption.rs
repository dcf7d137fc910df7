// Copyright © 2026 Hypermesh Foundation. All rights reserved.
// Licensed under the Business Source License 1.1.
// See the LICENSE file in the repository root for full license text.

//! TF Point redemption eligibility.
//!
//! A level's partnership table decides what fraction of earned points may be
//! redeemed under each tier; the level's redemption rate converts redeemed
//! points to cash. Requests must be positive, within the redeemable balance,
//! and a whole number of lots.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::arith;
use crate::types::{Level, PartnershipTier};

/// Advisory shown next to the redemption input. Never an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RedemptionNotice {
    InsufficientBalance,
    NotMultipleOfLot { lot: Decimal },
}

impl fmt::Display for RedemptionNotice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InsufficientBalance => f.write_str("Insufficient redeemable TF Point balance."),
            Self::NotMultipleOfLot { lot } => {
                write!(f, "Redemption must be in multiples of {}.", lot.normalize())
            }
        }
    }
}

/// All redemption-derived values for one set of inputs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RedemptionQuote {
    pub available_tiers: Vec<PartnershipTier>,
    pub redeemable_percentage: Decimal,
    pub redeemable_balance: Decimal,
    pub redeemed_cash_value: Decimal,
    pub notice: Option<RedemptionNotice>,
}

pub fn available_tiers(level: &Level) -> Vec<PartnershipTier> {
    PartnershipTier::ALL
        .into_iter()
        .filter(|&tier| level.redemption_for(tier) > Decimal::ZERO)
        .collect()
}

pub fn redeemable_percentage(level: &Level, tier: PartnershipTier) -> Decimal {
    let pct = level.redemption_for(tier);
    if pct > Decimal::ZERO { pct } else { Decimal::ZERO }
}

pub fn redeemable_balance(points: Decimal, percentage: Decimal) -> Decimal {
    arith::mul(points, percentage).floor()
}

fn is_whole_lot(points: Decimal, lot: Decimal) -> bool {
    matches!(points.checked_rem(lot), Some(rem) if rem.is_zero())
}

pub fn redeemed_cash_value(
    level: &Level,
    points_to_redeem: Decimal,
    balance: Decimal,
    lot: Decimal,
) -> Decimal {
    if !level.redemption_enabled()
        || points_to_redeem <= Decimal::ZERO
        || points_to_redeem > balance
        || !is_whole_lot(points_to_redeem, lot)
    {
        return Decimal::ZERO;
    }
    arith::mul(points_to_redeem, level.redemption_rate)
}

/// Balance is checked before the lot rule.
pub fn redemption_notice(
    level: &Level,
    points_to_redeem: Decimal,
    balance: Decimal,
    lot: Decimal,
) -> Option<RedemptionNotice> {
    if level.redemption_rate <= Decimal::ZERO || points_to_redeem <= Decimal::ZERO {
        return None;
    }
    if points_to_redeem > balance {
        return Some(RedemptionNotice::InsufficientBalance);
    }
    if !is_whole_lot(points_to_redeem, lot) {
        return Some(RedemptionNotice::NotMultipleOfLot { lot });
    }
    None
}

pub fn quote(
    level: &Level,
    tier: PartnershipTier,
    points: Decimal,
    points_to_redeem: Decimal,
    lot: Decimal,
) -> RedemptionQuote {
    let percentage = redeemable_percentage(level, tier);
    let balance = redeemable_balance(points, percentage);
    RedemptionQuote {
        available_tiers: available_tiers(level),
        redeemable_percentage: percentage,
        redeemable_balance: balance,
        redeemed_cash_value: redeemed_cash_value(level, points_to_redeem, balance, lot),
        notice: redemption_notice(level, points_to_redeem, balance, lot),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ProgramConfig;
    use rust_decimal_macros::dec;

    fn level(name: &str) -> Level {
        let config = ProgramConfig::default();
        let idx = config.level_index(name).expect("test: level exists");
        config.levels[idx].clone()
    }

    #[test]
    fn available_tiers_skip_zero_fractions() {
        assert!(available_tiers(&level("Rookie")).is_empty());
        assert_eq!(
            available_tiers(&level("Elite")),
            vec![PartnershipTier::Basic, PartnershipTier::Prospect]
        );
        assert_eq!(available_tiers(&level("Legend")), PartnershipTier::ALL.to_vec());
    }

    #[test]
    fn balance_is_floored() {
        let elite = level("Elite");
        let pct = redeemable_percentage(&elite, PartnershipTier::Prospect);
        assert_eq!(pct, dec!(0.3));
        assert_eq!(redeemable_balance(dec!(1234.5), pct), dec!(370));
    }

    #[test]
    fn disabled_tier_has_zero_percentage() {
        assert_eq!(
            redeemable_percentage(&level("Elite"), PartnershipTier::Priority),
            Decimal::ZERO
        );
    }

    #[test]
    fn cash_value_requires_whole_lots() {
        let legend = level("Legend");
        assert_eq!(redeemed_cash_value(&legend, dec!(300), dec!(500), dec!(100)), dec!(6000000));
        assert_eq!(redeemed_cash_value(&legend, dec!(250), dec!(500), dec!(100)), Decimal::ZERO);
        assert_eq!(redeemed_cash_value(&legend, dec!(600), dec!(500), dec!(100)), Decimal::ZERO);
        assert_eq!(redeemed_cash_value(&legend, dec!(0), dec!(500), dec!(100)), Decimal::ZERO);
        assert_eq!(redeemed_cash_value(&legend, dec!(-100), dec!(500), dec!(100)), Decimal::ZERO);
    }

    #[test]
    fn redemption_disabled_level_never_pays() {
        let pro = level("Pro");
        assert_eq!(redeemed_cash_value(&pro, dec!(100), dec!(1000), dec!(100)), Decimal::ZERO);
        assert_eq!(redemption_notice(&pro, dec!(150), dec!(0), dec!(100)), None);
    }

    #[test]
    fn balance_notice_wins_over_lot_notice() {
        let elite = level("Elite");
        assert_eq!(
            redemption_notice(&elite, dec!(150), dec!(100), dec!(100)),
            Some(RedemptionNotice::InsufficientBalance)
        );
        assert_eq!(
            redemption_notice(&elite, dec!(150), dec!(200), dec!(100)),
            Some(RedemptionNotice::NotMultipleOfLot { lot: dec!(100) })
        );
        assert_eq!(redemption_notice(&elite, dec!(200), dec!(200), dec!(100)), None);
    }

    #[test]
    fn notice_text() {
        assert_eq!(
            RedemptionNotice::InsufficientBalance.to_string(),
            "Insufficient redeemable TF Point balance."
        );
        assert_eq!(
            RedemptionNotice::NotMultipleOfLot { lot: dec!(100) }.to_string(),
            "Redemption must be in multiples of 100."
        );
    }

    #[test]
    fn quote_combines_everything() {
        let master = level("Master (Medal 8-10)");
        let q = quote(&master, PartnershipTier::Priority, dec!(700), dec!(700), dec!(100));
        assert_eq!(q.redeemable_percentage, dec!(1.0));
        assert_eq!(q.redeemable_balance, dec!(700));
        assert_eq!(q.redeemed_cash_value, dec!(7000000));
        assert_eq!(q.notice, None);
    }

    #[test]
    fn huge_point_totals_saturate() {
        let legend = level("Legend");
        let balance = redeemable_balance(Decimal::MAX, dec!(1));
        assert_eq!(balance, Decimal::MAX);

        let request = dec!(70000000000000000000000000000);
        assert_eq!(redeemed_cash_value(&legend, request, balance, dec!(100)), Decimal::MAX);
        assert_eq!(redemption_notice(&legend, request, balance, dec!(100)), None);
    }
}

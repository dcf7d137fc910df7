// Named Audit Scenarios — fixed inputs with known expected outputs

use rebate_engine::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::report::{Check, ScenarioResult};

pub struct Scenario {
    pub name: &'static str,
    pub label: &'static str,
    pub run: fn() -> Vec<Check>,
}

impl Scenario {
    pub fn execute(&self) -> ScenarioResult {
        let checks = (self.run)();
        ScenarioResult {
            scenario: self.name,
            label: self.label,
            pass: checks.iter().all(|c| c.pass),
            checks,
        }
    }
}

fn expect_eq<T: PartialEq + std::fmt::Debug>(name: &'static str, actual: T, expected: T) -> Check {
    let pass = actual == expected;
    Check::new(name, pass, format!("expected {expected:?}, got {actual:?}"))
}

fn history(months: [i64; HISTORY_MONTHS]) -> [Decimal; HISTORY_MONTHS] {
    months.map(Decimal::from)
}

fn load_history(calc: &mut RewardsCalculator, months: [i64; HISTORY_MONTHS]) {
    for (i, vp) in history(months).into_iter().enumerate() {
        calc.set_monthly_vp(i, vp);
    }
}

// ─── Scenario bodies ────────────────────────────────────────────────────────

fn below_threshold() -> Vec<Check> {
    let mut calc = RewardsCalculator::default();
    calc.set_pips("EURUSD", dec!(100));
    calc.set_pips("XAUUSD", dec!(100));
    calc.calculate();
    vec![
        expect_eq("total_valued_pips", calc.total_valued_pips(), dec!(200)),
        expect_eq("points", calc.points(), Decimal::ZERO),
    ]
}

fn at_threshold() -> Vec<Check> {
    let mut calc = RewardsCalculator::default();
    calc.set_pips("EURUSD", dec!(200));
    calc.calculate();
    vec![
        expect_eq("total_valued_pips", calc.total_valued_pips(), dec!(300)),
        expect_eq("points", calc.points(), dec!(90)),
    ]
}

fn legend_priority_redemption() -> Vec<Check> {
    let mut calc = RewardsCalculator::default();
    calc.select_level("Legend");
    calc.select_partnership_tier(PartnershipTier::Priority);
    calc.set_pips("NZDUSD", dec!(400));
    calc.calculate();
    calc.set_points_to_redeem(dec!(1200));
    let whole = vec![
        expect_eq("points", calc.points(), dec!(1200)),
        expect_eq("redeemable_balance", calc.redeemable_balance(), dec!(1200)),
        expect_eq("redeemed_cash_value", calc.redeemed_cash_value(), dec!(24000000)),
        expect_eq("message", calc.redemption_message(), String::new()),
    ];
    calc.set_points_to_redeem(dec!(1150));
    whole
        .into_iter()
        .chain([
            expect_eq("odd_lot_cash_value", calc.redeemed_cash_value(), Decimal::ZERO),
            expect_eq(
                "odd_lot_message",
                calc.redemption_message(),
                "Redemption must be in multiples of 100.".to_string(),
            ),
        ])
        .collect()
}

fn zero_month_breaks_streak() -> Vec<Check> {
    let mut calc = RewardsCalculator::default();
    load_history(&mut calc, [300, 300, 300, -200, -100, 0]);
    let medals = calc.medals();
    vec![
        expect_eq("consecutive_loss_vp", medals.consecutive_loss_vp, Decimal::ZERO),
        expect_eq("consecutive_medal_change", medals.consecutive_medal_change, 0),
    ]
}

fn two_losing_months() -> Vec<Check> {
    let mut calc = RewardsCalculator::default();
    load_history(&mut calc, [300, 300, 300, 300, -150, -200]);
    let medals = calc.medals();
    vec![
        expect_eq("consecutive_loss_vp", medals.consecutive_loss_vp, dec!(-350)),
        expect_eq("average_monthly_vp", medals.average_monthly_vp, dec!(300)),
        expect_eq(
            "consecutive_loss_percentage",
            medals.consecutive_loss_percentage.round_dp(1),
            dec!(116.7),
        ),
        expect_eq("consecutive_medal_change", medals.consecutive_medal_change, -1),
    ]
}

fn heavy_loss_deduction() -> Vec<Check> {
    let mut calc = RewardsCalculator::default();
    calc.select_loss_level("Elite");
    calc.set_losing_trades(dec!(4));
    let deduction = calc.deduction();
    vec![
        expect_eq("loss_vp_input", deduction.loss_vp_input, dec!(-500)),
        expect_eq("is_deduction_applied", deduction.is_deduction_applied, true),
        expect_eq("total_point_deduction", deduction.total_point_deduction, dec!(-250)),
        // fallback average 300 → 166.67% → -2
        expect_eq("monthly_medal_change", calc.medals().monthly_medal_change, -2),
    ]
}

fn reset_restores_defaults() -> Vec<Check> {
    let mut calc = RewardsCalculator::default();
    calc.set_pips("GBPUSD", dec!(999));
    calc.select_level("Legend");
    calc.select_partnership_tier(PartnershipTier::Prospect);
    calc.set_points_to_redeem(dec!(300));
    calc.set_target_vp(dec!(1000));
    calc.set_losing_trades(dec!(3));
    calc.set_loss_per_trade_vp(dec!(40));
    calc.set_selected_pip_value(dec!(2));
    calc.select_loss_level("Pro");
    calc.set_monthly_vp(2, dec!(-70));
    calc.set_current_medals(4);
    calc.calculate();
    calc.reset();

    let once = calc.snapshot();
    calc.reset();
    let twice = calc.snapshot();
    let same = serde_json::to_value(&once).ok() == serde_json::to_value(&twice).ok();

    vec![
        expect_eq("all_pips_zero", calc.entries().iter().all(|e| e.pips().is_zero()), true),
        expect_eq("level", calc.selected_level().name.as_str(), "Rookie"),
        expect_eq("tier", calc.selected_tier(), PartnershipTier::Basic),
        expect_eq("points_to_redeem", calc.points_to_redeem(), Decimal::ZERO),
        expect_eq("target_vp", calc.simulation().target_vp, Decimal::ZERO),
        expect_eq("losing_trades", calc.simulation().losing_trades, Decimal::ZERO),
        expect_eq("loss_per_trade_vp", calc.simulation().loss_per_trade_vp, dec!(125)),
        expect_eq("selected_pip_value", calc.simulation().selected_pip_value, dec!(0.5)),
        expect_eq("history", *calc.monthly_history().months(), [Decimal::ZERO; HISTORY_MONTHS]),
        expect_eq("current_medals", calc.simulation().current_medals, 10),
        expect_eq("idempotent", same, true),
    ]
}

pub fn scenarios() -> Vec<Scenario> {
    vec![
        Scenario {
            name: "SCORE_BELOW_THRESHOLD",
            label: "200 VP earns nothing",
            run: below_threshold,
        },
        Scenario {
            name: "SCORE_AT_THRESHOLD",
            label: "300 VP qualifies (Rookie)",
            run: at_threshold,
        },
        Scenario {
            name: "REDEEM_LEGEND_PRIORITY",
            label: "Legend/Priority full redemption",
            run: legend_priority_redemption,
        },
        Scenario {
            name: "MEDAL_ZERO_MONTH",
            label: "Zero month ends losing streak",
            run: zero_month_breaks_streak,
        },
        Scenario {
            name: "MEDAL_TWO_LOSSES",
            label: "Two losing months cost a medal",
            run: two_losing_months,
        },
        Scenario {
            name: "DEDUCT_HEAVY_LOSS",
            label: "500 VP loss at Elite",
            run: heavy_loss_deduction,
        },
        Scenario {
            name: "RESET_DEFAULTS",
            label: "Reset restores defaults",
            run: reset_restores_defaults,
        },
    ]
}

// Random Sweep — N seeded runs of random inputs, checking invariants on each
// Each run uses ChaCha8Rng seeded with base_seed + run index

use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rebate_engine::*;
use rust_decimal::Decimal;
use tracing::debug;

use crate::report::{InvariantTally, SweepResult};

const INVARIANTS: [&str; 8] = [
    "valued_pips_identity",
    "total_identity",
    "qualification_step",
    "tier_funded_or_basic",
    "whole_lot_rule",
    "medal_floor",
    "medal_sum",
    "reset_idempotent",
];

/// Largest 96-bit mantissa a Decimal can hold.
const MAX_MANTISSA: i128 = 79_228_162_514_264_337_593_543_950_335;

/// Mostly half-pip values the way users type them; one draw in ten is an
/// extreme magnitude anywhere up to the edge of the Decimal range.
fn random_magnitude(rng: &mut ChaCha8Rng, typical: std::ops::Range<i64>) -> Decimal {
    if rng.gen_bool(0.1) {
        let mantissa = rng.gen_range(-MAX_MANTISSA..=MAX_MANTISSA);
        Decimal::from_i128_with_scale(mantissa, rng.gen_range(0..=28))
    } else {
        Decimal::new(rng.gen_range(typical), 1) * Decimal::from(5)
    }
}

fn random_pips(rng: &mut ChaCha8Rng) -> Decimal {
    random_magnitude(rng, -2_000..20_000)
}

fn randomize(calc: &mut RewardsCalculator, rng: &mut ChaCha8Rng) {
    let symbols: Vec<String> = calc.entries().iter().map(|e| e.symbol().to_string()).collect();
    for symbol in &symbols {
        if rng.gen_bool(0.6) {
            let pips = random_pips(rng);
            calc.set_pips(symbol, pips);
        }
    }

    let levels: Vec<String> = calc.level_names().into_iter().map(str::to_string).collect();
    if let Some(level) = levels.choose(rng) {
        calc.select_level(level);
    }
    if let Some(&tier) = PartnershipTier::ALL.choose(rng) {
        calc.select_partnership_tier(tier);
    }
    // Select the level again so the tier fallback is exercised after a tier pick.
    if let Some(level) = levels.choose(rng) {
        calc.select_level(level);
    }
    calc.calculate();

    calc.set_points_to_redeem(Decimal::from(rng.gen_range(0..40) * 50));

    let buckets = calc.pip_value_buckets();
    if let Some(&bucket) = buckets.choose(rng) {
        calc.set_selected_pip_value(bucket);
    }
    calc.set_target_vp(random_magnitude(rng, 0..10_000));
    calc.set_losing_trades(random_magnitude(rng, 0..24).abs());
    calc.set_loss_per_trade_vp(random_magnitude(rng, 50..800).abs());
    if let Some(level) = levels.choose(rng) {
        calc.select_loss_level(level);
    }
    for month in 0..HISTORY_MONTHS {
        calc.set_monthly_vp(month, random_magnitude(rng, -1_800..3_000));
    }
    calc.set_current_medals(rng.gen_range(0..16));
}

fn evaluate(calc: &mut RewardsCalculator) -> [bool; 8] {
    let valued_ok = calc
        .entries()
        .iter()
        .all(|e| e.valued_pips() == arith::mul(e.pips(), e.pair().value));

    let sum = arith::sum(calc.entries().iter().map(|e| e.valued_pips()));
    let total_ok = calc.total_valued_pips() == sum;

    let threshold = calc.config().qualification_threshold;
    let step_ok = if calc.total_valued_pips() >= threshold {
        calc.points() == arith::mul(calc.total_valued_pips(), calc.selected_level().multiplier)
    } else {
        calc.points().is_zero()
    };

    let tier = calc.selected_tier();
    let tier_ok = tier == PartnershipTier::Basic
        || calc.selected_level().redemption_for(tier) > Decimal::ZERO;

    let lot = calc.config().redemption_lot;
    let lot_ok = (calc.points_to_redeem() % lot).is_zero() || calc.redeemed_cash_value().is_zero();

    let medals = calc.medals();
    let floor_ok = medals.final_medal_count >= 0;
    let sum_ok = medals.final_medal_change
        == medals.monthly_medal_change + medals.consecutive_medal_change
        && medals.final_medal_count
            == (calc.simulation().current_medals + medals.final_medal_change).max(0);

    calc.reset();
    let once = serde_json::to_value(calc.snapshot()).ok();
    calc.reset();
    let twice = serde_json::to_value(calc.snapshot()).ok();
    let reset_ok = once.is_some() && once == twice;

    [valued_ok, total_ok, step_ok, tier_ok, lot_ok, floor_ok, sum_ok, reset_ok]
}

pub fn run_sweep(runs: usize, base_seed: u64) -> SweepResult {
    let mut tallies: Vec<InvariantTally> = INVARIANTS.iter().map(|&n| InvariantTally::new(n)).collect();
    let mut qualifying_runs = 0;
    let mut redeemable_runs = 0;
    let mut points_total = 0.0;
    let mut medal_change_total = 0.0;

    for run in 0..runs {
        let seed = base_seed.wrapping_add(run as u64);
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let mut calc = RewardsCalculator::default();
        randomize(&mut calc, &mut rng);

        if !calc.points().is_zero() {
            qualifying_runs += 1;
        }
        if !calc.redeemed_cash_value().is_zero() {
            redeemable_runs += 1;
        }
        points_total += adapter::from_decimal(calc.points());
        medal_change_total += calc.medals().final_medal_change as f64;

        let results = evaluate(&mut calc);
        for (tally, pass) in tallies.iter_mut().zip(results) {
            tally.record(seed, pass);
        }
        debug!(seed, ?results, "sweep run");
    }

    let n = runs.max(1) as f64;
    SweepResult {
        runs,
        base_seed,
        qualifying_runs,
        redeemable_runs,
        mean_points: points_total / n,
        mean_final_medal_change: medal_change_total / n,
        invariants: tallies,
    }
}

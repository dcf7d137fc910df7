// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Rebate Engine - VP Projection & Point Deduction

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::arith;
use crate::types::{Level, SimulationState};

// ─── VP → Pips / Percentage ─────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VpProjection {
    pub pips_from_vp: Decimal,
    pub percentage_from_vp: Decimal,
    pub remaining_vp: Decimal,
}

/// Pips needed at `pip_value` to reach `target_vp`. Zero for a non-positive bucket.
pub fn pips_from_vp(target_vp: Decimal, pip_value: Decimal) -> Decimal {
    if pip_value > Decimal::ZERO {
        arith::div(target_vp, pip_value)
    } else {
        Decimal::ZERO
    }
}

pub fn percentage_from_vp(pips: Decimal, normalization: Decimal) -> Decimal {
    arith::div(pips, normalization)
}

pub fn remaining_vp(target_vp: Decimal, losing_trades: Decimal, loss_per_trade_vp: Decimal) -> Decimal {
    arith::sub(target_vp, arith::mul(losing_trades, loss_per_trade_vp))
}

pub fn project(state: &SimulationState, normalization: Decimal) -> VpProjection {
    let pips = pips_from_vp(state.target_vp, state.selected_pip_value);
    VpProjection {
        pips_from_vp: pips,
        percentage_from_vp: percentage_from_vp(pips, normalization),
        remaining_vp: remaining_vp(state.target_vp, state.losing_trades, state.loss_per_trade_vp),
    }
}

// ─── Point Deduction ────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PointDeduction {
    pub loss_vp_input: Decimal,
    pub is_deduction_applied: bool,
    pub total_point_deduction: Decimal,
}

/// Signed VP lost to losing trades; non-positive for non-negative inputs.
pub fn loss_vp(losing_trades: Decimal, loss_per_trade_vp: Decimal) -> Decimal {
    -arith::mul(losing_trades, loss_per_trade_vp)
}

/// Mirror of the qualification cutoff: a loss of at least `threshold` VP deducts.
pub fn deduction_applies(loss_vp_input: Decimal, threshold: Decimal) -> bool {
    loss_vp_input <= -threshold
}

pub fn total_point_deduction(loss_vp_input: Decimal, level: &Level, threshold: Decimal) -> Decimal {
    if deduction_applies(loss_vp_input, threshold) {
        arith::mul(loss_vp_input, level.multiplier)
    } else {
        Decimal::ZERO
    }
}

pub fn deduct(state: &SimulationState, loss_level: &Level, threshold: Decimal) -> PointDeduction {
    let loss = loss_vp(state.losing_trades, state.loss_per_trade_vp);
    PointDeduction {
        loss_vp_input: loss,
        is_deduction_applied: deduction_applies(loss, threshold),
        total_point_deduction: total_point_deduction(loss, loss_level, threshold),
    }
}

// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Rebate Engine - TF Point rewards calculator

pub mod arith;
pub mod types;
pub mod config;
pub mod scoring;
pub mod redemption;
pub mod simulator;
pub mod medals;
pub mod calculator;
pub mod input;
pub mod format;
pub mod adapter;

pub use types::*;
pub use calculator::RewardsCalculator;
pub use config::{ConfigError, ProgramConfig};

use adapter::{from_decimal, to_decimal, to_medals};
use wasm_bindgen::prelude::*;

// ─── WASM Interface ──────────────────────────────────────────────────────────

#[wasm_bindgen]
impl RewardsCalculator {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        #[cfg(target_arch = "wasm32")]
        std::panic::set_hook(Box::new(console_error_panic_hook::hook));

        RewardsCalculator::default()
    }

    /// Build a calculator over a JSON table set instead of the live program.
    #[wasm_bindgen(js_name = fromConfigJson)]
    pub fn from_config_json(json: &str) -> Result<RewardsCalculator, JsValue> {
        #[cfg(target_arch = "wasm32")]
        std::panic::set_hook(Box::new(console_error_panic_hook::hook));

        ProgramConfig::from_json(json)
            .and_then(RewardsCalculator::with_config)
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    #[wasm_bindgen(js_name = setPips)]
    pub fn js_set_pips(&mut self, symbol: &str, pips: f64) {
        self.set_pips(symbol, to_decimal(pips));
    }

    #[wasm_bindgen(js_name = setPipsInput)]
    pub fn js_set_pips_input(&mut self, symbol: &str, raw: &str) {
        self.set_pips_input(symbol, raw);
    }

    #[wasm_bindgen(js_name = selectLevel)]
    pub fn js_select_level(&mut self, name: &str) {
        self.select_level(name);
    }

    /// Unknown tier names are ignored.
    #[wasm_bindgen(js_name = selectPartnershipTier)]
    pub fn js_select_partnership_tier(&mut self, tier: &str) {
        if let Some(tier) = PartnershipTier::from_name(tier) {
            self.select_partnership_tier(tier);
        }
    }

    #[wasm_bindgen(js_name = setPointsToRedeem)]
    pub fn js_set_points_to_redeem(&mut self, points: f64) {
        self.set_points_to_redeem(to_decimal(points));
    }

    #[wasm_bindgen(js_name = setPointsToRedeemInput)]
    pub fn js_set_points_to_redeem_input(&mut self, raw: &str) {
        self.set_points_to_redeem_input(raw);
    }

    #[wasm_bindgen(js_name = setTargetVp)]
    pub fn js_set_target_vp(&mut self, vp: f64) {
        self.set_target_vp(to_decimal(vp));
    }

    #[wasm_bindgen(js_name = setLosingTrades)]
    pub fn js_set_losing_trades(&mut self, trades: f64) {
        self.set_losing_trades(to_decimal(trades));
    }

    #[wasm_bindgen(js_name = setLossPerTradeVp)]
    pub fn js_set_loss_per_trade_vp(&mut self, vp: f64) {
        self.set_loss_per_trade_vp(to_decimal(vp));
    }

    #[wasm_bindgen(js_name = setSelectedPipValue)]
    pub fn js_set_selected_pip_value(&mut self, value: f64) {
        self.set_selected_pip_value(to_decimal(value));
    }

    #[wasm_bindgen(js_name = selectLossLevel)]
    pub fn js_select_loss_level(&mut self, name: &str) {
        self.select_loss_level(name);
    }

    #[wasm_bindgen(js_name = setMonthlyVp)]
    pub fn js_set_monthly_vp(&mut self, index: usize, vp: f64) {
        self.set_monthly_vp(index, to_decimal(vp));
    }

    #[wasm_bindgen(js_name = setCurrentMedals)]
    pub fn js_set_current_medals(&mut self, medals: f64) {
        self.set_current_medals(to_medals(medals));
    }

    #[wasm_bindgen(js_name = calculate)]
    pub fn js_calculate(&mut self) {
        self.calculate();
    }

    #[wasm_bindgen(js_name = reset)]
    pub fn js_reset(&mut self) {
        self.reset();
    }

    /// Every input and derived value in one object.
    #[wasm_bindgen(js_name = snapshot)]
    pub fn js_snapshot(&self) -> JsValue {
        serde_wasm_bindgen::to_value(&self.snapshot()).unwrap_or(JsValue::NULL)
    }

    #[wasm_bindgen(js_name = levelNames)]
    pub fn js_level_names(&self) -> Vec<String> {
        self.level_names().into_iter().map(str::to_string).collect()
    }

    #[wasm_bindgen(js_name = pipValueBuckets)]
    pub fn js_pip_value_buckets(&self) -> Vec<f64> {
        self.pip_value_buckets().into_iter().map(from_decimal).collect()
    }

    #[wasm_bindgen(js_name = totalValuedPips)]
    pub fn js_total_valued_pips(&self) -> f64 {
        from_decimal(self.total_valued_pips())
    }

    #[wasm_bindgen(js_name = points)]
    pub fn js_points(&self) -> f64 {
        from_decimal(self.points())
    }

    #[wasm_bindgen(js_name = redeemableBalance)]
    pub fn js_redeemable_balance(&self) -> f64 {
        from_decimal(self.redeemable_balance())
    }

    #[wasm_bindgen(js_name = redeemedCashValue)]
    pub fn js_redeemed_cash_value(&self) -> f64 {
        from_decimal(self.redeemed_cash_value())
    }

    #[wasm_bindgen(js_name = redemptionMessage)]
    pub fn js_redemption_message(&self) -> String {
        self.redemption_message()
    }

    #[wasm_bindgen(js_name = finalMedalCount)]
    pub fn js_final_medal_count(&self) -> f64 {
        self.final_medal_count() as f64
    }
}

// ─── Display helpers ─────────────────────────────────────────────────────────

#[wasm_bindgen(js_name = formatNumber)]
pub fn js_format_number(value: f64, digits: u32) -> String {
    format::format_number(to_decimal(value), digits)
}

#[wasm_bindgen(js_name = formatPercentage)]
pub fn js_format_percentage(value: f64) -> String {
    format::format_percentage(to_decimal(value))
}

#[wasm_bindgen(js_name = formatCurrency)]
pub fn js_format_currency(value: f64) -> String {
    format::format_currency(to_decimal(value))
}

// Copyright © 2026 Hypermesh Foundation. All rights reserved.
// Licensed under the Business Source License 1.1.
// See the LICENSE file in the repository root for full license text.

//! Program reference data and constants.
//!
//! [`ProgramConfig::default`] is the live rebate program: 16 weighted pairs,
//! six levels from Rookie to Legend, the 300 VP qualification cutoff and both
//! medal staircases. Alternative tables can be loaded from JSON for what-if
//! comparisons; they are validated before use.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::medals::MedalStaircase;
use crate::types::{CurrencyPair, Level, PartnershipRedemption};

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Errors raised when a program table set is malformed.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid program config JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("program config defines no currency pairs")]
    NoPairs,

    #[error("program config defines no levels")]
    NoLevels,

    #[error("duplicate currency pair symbol: {0}")]
    DuplicatePair(String),

    #[error("duplicate level name: {0}")]
    DuplicateLevel(String),

    #[error("pair {symbol} has non-positive value {value}")]
    NonPositivePairValue { symbol: String, value: Decimal },

    #[error("{name} staircase thresholds must be strictly ascending")]
    UnorderedStaircase { name: &'static str },

    #[error("{name} must be positive, got {value}")]
    NonPositiveConstant { name: &'static str, value: Decimal },
}

// ---------------------------------------------------------------------------
// Defaults restored by reset
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct InputDefaults {
    pub loss_per_trade_vp: Decimal,
    pub selected_pip_value: Decimal,
    pub current_medals: i64,
}

impl Default for InputDefaults {
    fn default() -> Self {
        Self {
            loss_per_trade_vp: dec!(125),
            selected_pip_value: dec!(0.5),
            current_medals: 10,
        }
    }
}

// ---------------------------------------------------------------------------
// ProgramConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ProgramConfig {
    pub pairs: Vec<CurrencyPair>,
    /// Ordered lowest to highest. The first level is the reset default.
    pub levels: Vec<Level>,
    /// Minimum total VP that earns any points; also the bar a month must
    /// reach to count toward the medal average.
    pub qualification_threshold: Decimal,
    /// Loss VP magnitude at which point deduction kicks in.
    pub deduction_threshold: Decimal,
    /// Pip count treated as 100% by the VP projection.
    pub pip_normalization: Decimal,
    pub redemption_lot: Decimal,
    /// Average used when no month qualifies.
    pub fallback_average_vp: Decimal,
    pub monthly_staircase: MedalStaircase,
    pub consecutive_staircase: MedalStaircase,
    pub defaults: InputDefaults,
}

impl Default for ProgramConfig {
    fn default() -> Self {
        Self {
            pairs: default_pairs(),
            levels: default_levels(),
            qualification_threshold: dec!(300),
            deduction_threshold: dec!(300),
            pip_normalization: dec!(250),
            redemption_lot: dec!(100),
            fallback_average_vp: dec!(300),
            monthly_staircase: MedalStaircase::monthly(),
            consecutive_staircase: MedalStaircase::consecutive(),
            defaults: InputDefaults::default(),
        }
    }
}

impl ProgramConfig {
    /// Parse and validate a table set. Missing fields fall back to the
    /// live program's values.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: ProgramConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.pairs.is_empty() {
            return Err(ConfigError::NoPairs);
        }
        if self.levels.is_empty() {
            return Err(ConfigError::NoLevels);
        }

        let mut symbols = HashSet::new();
        for pair in &self.pairs {
            if !symbols.insert(pair.symbol.as_str()) {
                return Err(ConfigError::DuplicatePair(pair.symbol.clone()));
            }
            if pair.value <= Decimal::ZERO {
                return Err(ConfigError::NonPositivePairValue {
                    symbol: pair.symbol.clone(),
                    value: pair.value,
                });
            }
        }

        let mut names = HashSet::new();
        for level in &self.levels {
            if !names.insert(level.name.as_str()) {
                return Err(ConfigError::DuplicateLevel(level.name.clone()));
            }
        }

        for (name, value) in [
            ("pip_normalization", self.pip_normalization),
            ("redemption_lot", self.redemption_lot),
            ("fallback_average_vp", self.fallback_average_vp),
        ] {
            if value <= Decimal::ZERO {
                return Err(ConfigError::NonPositiveConstant { name, value });
            }
        }

        if !self.monthly_staircase.is_ascending() {
            return Err(ConfigError::UnorderedStaircase { name: "monthly" });
        }
        if !self.consecutive_staircase.is_ascending() {
            return Err(ConfigError::UnorderedStaircase { name: "consecutive" });
        }

        Ok(())
    }

    pub fn level_index(&self, name: &str) -> Option<usize> {
        self.levels.iter().position(|l| l.name == name)
    }

    pub fn pair(&self, symbol: &str) -> Option<&CurrencyPair> {
        self.pairs.iter().find(|p| p.symbol == symbol)
    }

    /// Distinct pair values, highest first. These are the pip-value buckets
    /// offered by the VP projection.
    pub fn pip_value_buckets(&self) -> Vec<Decimal> {
        let mut buckets: Vec<Decimal> = Vec::new();
        for pair in &self.pairs {
            if !buckets.contains(&pair.value) {
                buckets.push(pair.value);
            }
        }
        buckets.sort_by(|a, b| b.cmp(a));
        buckets
    }
}

fn default_pairs() -> Vec<CurrencyPair> {
    [
        ("NZDUSD", dec!(2)),
        ("AUDUSD", dec!(2)),
        ("EURGBP", dec!(2)),
        ("USDCHF", dec!(2)),
        ("USDCAD", dec!(1.5)),
        ("EURUSD", dec!(1.5)),
        ("GBPUSD", dec!(1.5)),
        ("NZDJPY", dec!(1.5)),
        ("CADJPY", dec!(1.5)),
        ("AUDJPY", dec!(1.5)),
        ("CHFJPY", dec!(1)),
        ("EURNZD", dec!(1)),
        ("USDJPY", dec!(1)),
        ("EURJPY", dec!(1)),
        ("GBPJPY", dec!(1)),
        ("XAUUSD", dec!(0.5)),
    ]
    .into_iter()
    .map(|(symbol, value)| CurrencyPair::new(symbol, value))
    .collect()
}

fn default_levels() -> Vec<Level> {
    vec![
        Level::new("Rookie", dec!(0.3), dec!(0), PartnershipRedemption::none()),
        Level::new("Pro", dec!(0.4), dec!(0), PartnershipRedemption::none()),
        Level::new(
            "Elite",
            dec!(0.5),
            dec!(5000),
            PartnershipRedemption::new(dec!(0.2), dec!(0.3), dec!(0)),
        ),
        Level::new(
            "Master (Medal 8-10)",
            dec!(0.7),
            dec!(10000),
            PartnershipRedemption::new(dec!(0.3), dec!(0.5), dec!(1.0)),
        ),
        Level::new(
            "Master (Medal 11-12)",
            dec!(1.0),
            dec!(10000),
            PartnershipRedemption::new(dec!(0.3), dec!(0.5), dec!(1.0)),
        ),
        Level::new(
            "Legend",
            dec!(1.5),
            dec!(20000),
            PartnershipRedemption::new(dec!(0.5), dec!(0.75), dec!(1.0)),
        ),
    ]
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

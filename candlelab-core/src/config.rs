//! Strategy parameters — one struct covering every rule-set variant.
//!
//! The wick ratios are percentages of the candle body (350 means the wick
//! must reach 3.5x the body). Variant-specific behavior is a flag
//! (`shooting_star_arms_timer`) rather than a separate rule set.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from parameter validation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParamsError {
    #[error("{field} must be >= 1")]
    ZeroPeriod { field: &'static str },

    #[error("short_sma_period {short} must be < long_sma_period {long}")]
    SmaPeriodsInverted { short: usize, long: usize },

    #[error("{field} must be positive and finite, got {value}")]
    NonPositive { field: &'static str, value: f64 },

    #[error("stop_loss_pct {0} must be in (0, 100)")]
    StopLossOutOfRange(f64),

    #[error("cash_fraction {0} must be in (0, 1]")]
    CashFractionOutOfRange(f64),

    #[error("failed to parse params TOML: {0}")]
    Toml(String),
}

/// All tunable parameters of the reversal strategy.
///
/// Defaults reproduce the reference parameter set:
/// 20-bar band with 2 standard deviations, 50/150 SMA crossover pair,
/// 5% stop-loss, trend margin 2, wick ratios 350/10, 2-day hold timer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StrategyParams {
    /// Lookback for the volatility band center and deviation.
    pub band_period: usize,
    /// Band half-width in standard deviations.
    pub band_dev_factor: f64,
    /// Fast moving average lookback.
    pub short_sma_period: usize,
    /// Slow moving average lookback.
    pub long_sma_period: usize,
    /// Forced exit when close falls this percentage below entry.
    pub stop_loss_pct: f64,
    /// Three-delta trend sum must exceed this margin to leave Neutral.
    pub acceptable_margin: f64,
    /// Dominant wick threshold, percent of body.
    pub high_wick_ratio: f64,
    /// Bounded wick threshold, percent of body.
    pub low_wick_ratio: f64,
    /// Full days a pattern-entered position is held before the timed exit.
    pub hold_days: i64,
    /// Whether a shooting star also arms the hold timer.
    pub shooting_star_arms_timer: bool,
    /// Fraction of available cash committed per entry.
    pub cash_fraction: f64,
}

impl Default for StrategyParams {
    fn default() -> Self {
        Self {
            band_period: 20,
            band_dev_factor: 2.0,
            short_sma_period: 50,
            long_sma_period: 150,
            stop_loss_pct: 5.0,
            acceptable_margin: 2.0,
            high_wick_ratio: 350.0,
            low_wick_ratio: 10.0,
            hold_days: 2,
            shooting_star_arms_timer: false,
            cash_fraction: 0.9,
        }
    }
}

impl StrategyParams {
    /// Check every parameter is in its legal range.
    pub fn validate(&self) -> Result<(), ParamsError> {
        if self.band_period < 1 {
            return Err(ParamsError::ZeroPeriod {
                field: "band_period",
            });
        }
        if self.short_sma_period < 1 {
            return Err(ParamsError::ZeroPeriod {
                field: "short_sma_period",
            });
        }
        if self.long_sma_period < 1 {
            return Err(ParamsError::ZeroPeriod {
                field: "long_sma_period",
            });
        }
        if self.short_sma_period >= self.long_sma_period {
            return Err(ParamsError::SmaPeriodsInverted {
                short: self.short_sma_period,
                long: self.long_sma_period,
            });
        }
        if self.hold_days < 1 {
            return Err(ParamsError::ZeroPeriod { field: "hold_days" });
        }

        for (field, value) in [
            ("band_dev_factor", self.band_dev_factor),
            ("acceptable_margin", self.acceptable_margin),
            ("high_wick_ratio", self.high_wick_ratio),
            ("low_wick_ratio", self.low_wick_ratio),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(ParamsError::NonPositive { field, value });
            }
        }

        if !self.stop_loss_pct.is_finite()
            || self.stop_loss_pct <= 0.0
            || self.stop_loss_pct >= 100.0
        {
            return Err(ParamsError::StopLossOutOfRange(self.stop_loss_pct));
        }

        if !self.cash_fraction.is_finite()
            || self.cash_fraction <= 0.0
            || self.cash_fraction > 1.0
        {
            return Err(ParamsError::CashFractionOutOfRange(self.cash_fraction));
        }

        Ok(())
    }

    /// Parse and validate parameters from a TOML document.
    ///
    /// Missing keys fall back to the defaults, so a partial override file
    /// like `stop_loss_pct = 3.0` is enough for a sweep run.
    pub fn from_toml_str(content: &str) -> Result<Self, ParamsError> {
        let params: Self =
            toml::from_str(content).map_err(|e| ParamsError::Toml(e.to_string()))?;
        params.validate()?;
        Ok(params)
    }

    /// Stable identity of this parameter set.
    ///
    /// Canonical serde_json serialization (struct field order is fixed)
    /// hashed with blake3. Two runs with the same fingerprint are exact
    /// replays of the same rule set.
    pub fn fingerprint(&self) -> String {
        let json = serde_json::to_string(self).expect("StrategyParams must serialize");
        blake3::hash(json.as_bytes()).to_hex().to_string()
    }
}

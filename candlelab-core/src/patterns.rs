//! Candlestick shape classification.
//!
//! All four patterns share one geometry parameterization: a dominant wick
//! that must reach `high_wick_ratio` percent of the body, and an opposite
//! wick bounded by `low_wick_ratio` percent of the body. The trend gate
//! distinguishes a hammer (bearish context) from the same shape appearing
//! mid-rally.
//!
//! A bar with a zero body (open == close) matches nothing: every comparison
//! scales the body, so a doji would otherwise match vacuously.

use crate::domain::Bar;
use crate::trend::Trend;
use serde::{Deserialize, Serialize};

/// Per-bar pattern classification result. Computed fresh every bar.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatternFlags {
    /// Bullish body, dominant lower wick, bearish context. Entry signal.
    pub hammer: bool,
    /// Bullish body, dominant upper wick, bearish context. Entry signal.
    pub inverted_hammer: bool,
    /// Bearish body, dominant upper wick, bullish context. Exit signal.
    pub shooting_star: bool,
    /// Bearish body, dominant lower wick, bearish context. Exit signal.
    pub deadman: bool,
}

impl PatternFlags {
    /// Patterns that arm the hold timer unconditionally.
    pub fn bullish_reversal(&self) -> bool {
        self.hammer || self.inverted_hammer
    }
}

/// Wick thresholds, pre-divided from the percentage parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WickThresholds {
    /// Dominant wick must reach body * dominant.
    pub dominant: f64,
    /// Opposite wick must stay within body * bounded.
    pub bounded: f64,
}

impl WickThresholds {
    /// Convert the percentage parameters (350 -> 3.5x body).
    pub fn from_ratios(high_wick_ratio: f64, low_wick_ratio: f64) -> Self {
        Self {
            dominant: high_wick_ratio / 100.0,
            bounded: low_wick_ratio / 100.0,
        }
    }
}

/// Classify one bar against the already-computed trend.
///
/// Pure: same bar, trend, and thresholds always produce the same flags.
pub fn classify(bar: &Bar, trend: Trend, thresholds: WickThresholds) -> PatternFlags {
    let body = bar.body();
    if body == 0.0 {
        return PatternFlags::default();
    }

    let dominant = body * thresholds.dominant;
    let bounded = body * thresholds.bounded;
    let upper = bar.upper_wick();
    let lower = bar.lower_wick();

    let mut flags = PatternFlags::default();

    if trend == Trend::Bearish {
        if bar.is_bullish() {
            // Long tail below a small bullish body.
            flags.hammer = lower >= dominant && upper < bounded;
            // Mirror image: long wick above, tail bounded (inverse-signed
            // check in the reference rules, hence <= rather than <).
            flags.inverted_hammer = upper >= dominant && lower <= bounded;
        } else {
            // Hammer shape with a bearish body.
            flags.deadman = lower >= dominant && upper < bounded;
        }
    }

    if trend == Trend::Bullish && bar.is_bearish() {
        flags.shooting_star = upper >= dominant && lower <= bounded;
    }

    flags
}

//! Incremental rolling indicators and the per-bar engine that advances them.
//!
//! Each indicator is an explicit fixed-size ring buffer exposing its current
//! (and where needed, previous) value, advanced exactly once per bar. Values
//! are `None` until the window has filled; the signal layer treats every
//! trigger as false while any needed value is missing.

pub mod bollinger;
pub mod sma;

pub use bollinger::{BandValues, RollingBollinger};
pub use sma::RollingSma;

use crate::config::StrategyParams;
use crate::domain::Bar;
use serde::{Deserialize, Serialize};

/// Derived indicator values for one bar.
///
/// Previous-bar SMA values are carried alongside the current ones so the
/// crossover predicates need no history access of their own.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IndicatorSnapshot {
    pub band: Option<BandValues>,
    pub short_sma: Option<f64>,
    pub long_sma: Option<f64>,
    pub prev_short_sma: Option<f64>,
    pub prev_long_sma: Option<f64>,
}

impl IndicatorSnapshot {
    /// Every derived value is defined, including the previous-bar pair
    /// needed for crossover detection.
    pub fn is_warm(&self) -> bool {
        self.band.is_some()
            && self.short_sma.is_some()
            && self.long_sma.is_some()
            && self.prev_short_sma.is_some()
            && self.prev_long_sma.is_some()
    }
}

/// Owns the rolling indicators and advances them one bar at a time.
#[derive(Debug, Clone)]
pub struct IndicatorEngine {
    band: RollingBollinger,
    short_sma: RollingSma,
    long_sma: RollingSma,
}

impl IndicatorEngine {
    pub fn new(params: &StrategyParams) -> Self {
        Self {
            band: RollingBollinger::new(params.band_period, params.band_dev_factor),
            short_sma: RollingSma::new(params.short_sma_period),
            long_sma: RollingSma::new(params.long_sma_period),
        }
    }

    /// Bars before every snapshot value is defined. The +1 covers the
    /// previous-bar SMA pair used by the crossover predicates.
    pub fn warmup_bars(&self) -> usize {
        self.band
            .warmup_bars()
            .max(self.long_sma.warmup_bars() + 1)
            .max(self.short_sma.warmup_bars() + 1)
    }

    /// Slide every window forward by one bar and snapshot the results.
    pub fn advance(&mut self, bar: &Bar) -> IndicatorSnapshot {
        self.band.update(bar.close);
        self.short_sma.update(bar.close);
        self.long_sma.update(bar.close);

        IndicatorSnapshot {
            band: self.band.current(),
            short_sma: self.short_sma.current(),
            long_sma: self.long_sma.current(),
            prev_short_sma: self.short_sma.previous(),
            prev_long_sma: self.long_sma.previous(),
        }
    }
}

/// Create synthetic bars from close prices for testing.
///
/// Generates plausible OHLV: open = prev_close (or close for the first bar),
/// high = max(open,close) + 1.0, low = min(open,close) - 1.0, volume = 1000.
#[cfg(test)]
pub fn make_bars(closes: &[f64]) -> Vec<Bar> {
    let base_date = chrono::NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| {
            let open = if i == 0 { close } else { closes[i - 1] };
            Bar {
                date: base_date + chrono::Duration::days(i as i64),
                open,
                high: open.max(close) + 1.0,
                low: (open.min(close) - 1.0).max(0.0),
                close,
                volume: 1000,
            }
        })
        .collect()
}

/// Assert two f64 values are approximately equal (within epsilon).
#[cfg(test)]
pub fn assert_approx(actual: f64, expected: f64, epsilon: f64) {
    assert!(
        (actual - expected).abs() < epsilon,
        "assert_approx failed: actual={actual}, expected={expected}, diff={}, epsilon={epsilon}",
        (actual - expected).abs()
    );
}

/// Default epsilon for indicator tests.
#[cfg(test)]
pub const DEFAULT_EPSILON: f64 = 1e-10;

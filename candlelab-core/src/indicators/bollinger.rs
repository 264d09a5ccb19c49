//! Volatility band — moving average +/- standard deviation multiplier.
//!
//! Center: SMA(close, period). Half-width: dev_factor * stddev(close, period).
//! Uses population stddev (divide by N). The deviation pass rescans the
//! window each bar, so an update costs O(period); the mean itself rolls in
//! O(1).

use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// One bar's band values.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BandValues {
    pub middle: f64,
    pub upper: f64,
    pub lower: f64,
}

#[derive(Debug, Clone)]
pub struct RollingBollinger {
    period: usize,
    dev_factor: f64,
    window: VecDeque<f64>,
    sum: f64,
    current: Option<BandValues>,
}

impl RollingBollinger {
    pub fn new(period: usize, dev_factor: f64) -> Self {
        assert!(period >= 1, "band period must be >= 1");
        assert!(
            dev_factor > 0.0 && dev_factor.is_finite(),
            "dev_factor must be positive and finite"
        );
        Self {
            period,
            dev_factor,
            window: VecDeque::with_capacity(period + 1),
            sum: 0.0,
            current: None,
        }
    }

    /// Bars required before `current()` is defined.
    pub fn warmup_bars(&self) -> usize {
        self.period
    }

    /// Push the next close, sliding the window forward.
    pub fn update(&mut self, close: f64) {
        self.window.push_back(close);
        self.sum += close;
        if self.window.len() > self.period {
            if let Some(oldest) = self.window.pop_front() {
                self.sum -= oldest;
            }
        }

        if self.window.len() < self.period {
            return;
        }

        let mean = self.sum / self.period as f64;
        let variance: f64 = self
            .window
            .iter()
            .map(|close| {
                let diff = close - mean;
                diff * diff
            })
            .sum::<f64>()
            / self.period as f64;
        let half_width = self.dev_factor * variance.sqrt();

        self.current = Some(BandValues {
            middle: mean,
            upper: mean + half_width,
            lower: mean - half_width,
        });
    }

    /// This bar's band, `None` during warm-up.
    pub fn current(&self) -> Option<BandValues> {
        self.current
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::{assert_approx, DEFAULT_EPSILON};

    fn advance(band: &mut RollingBollinger, closes: &[f64]) {
        for &close in closes {
            band.update(close);
        }
    }

    #[test]
    fn middle_is_sma() {
        let mut band = RollingBollinger::new(3, 2.0);
        advance(&mut band, &[10.0, 11.0]);
        assert!(band.current().is_none());

        band.update(12.0);
        // mean(10,11,12) = 11.0
        assert_approx(band.current().unwrap().middle, 11.0, DEFAULT_EPSILON);

        band.update(13.0);
        // mean(11,12,13) = 12.0
        assert_approx(band.current().unwrap().middle, 12.0, DEFAULT_EPSILON);
    }

    #[test]
    fn bands_symmetric_around_middle() {
        let mut band = RollingBollinger::new(3, 2.0);
        advance(&mut band, &[10.0, 11.0, 12.0, 13.0, 14.0]);

        let values = band.current().unwrap();
        let upper_gap = values.upper - values.middle;
        let lower_gap = values.middle - values.lower;
        assert_approx(upper_gap, lower_gap, DEFAULT_EPSILON);
        assert!(upper_gap > 0.0);
    }

    #[test]
    fn constant_price_zero_width() {
        let mut band = RollingBollinger::new(3, 2.0);
        advance(&mut band, &[100.0, 100.0, 100.0, 100.0]);

        // Constant price -> stddev = 0 -> bands collapse to the mean
        let values = band.current().unwrap();
        assert_approx(values.upper, 100.0, DEFAULT_EPSILON);
        assert_approx(values.lower, 100.0, DEFAULT_EPSILON);
    }

    #[test]
    fn known_population_stddev() {
        // closes 2, 4, 6: mean 4, population variance (4+0+4)/3 = 8/3
        let mut band = RollingBollinger::new(3, 1.0);
        advance(&mut band, &[2.0, 4.0, 6.0]);

        let expected_sd = (8.0f64 / 3.0).sqrt();
        let values = band.current().unwrap();
        assert_approx(values.upper, 4.0 + expected_sd, 1e-9);
        assert_approx(values.lower, 4.0 - expected_sd, 1e-9);
    }

    #[test]
    fn warmup_bars_equals_period() {
        assert_eq!(RollingBollinger::new(20, 2.0).warmup_bars(), 20);
    }
}

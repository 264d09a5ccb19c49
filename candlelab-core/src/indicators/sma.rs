//! Simple Moving Average (SMA).
//!
//! Incremental rolling mean of close prices: oldest sample dropped, newest
//! added, O(1) per bar. The previous bar's value is retained for crossover
//! detection.

use std::collections::VecDeque;

#[derive(Debug, Clone)]
pub struct RollingSma {
    period: usize,
    window: VecDeque<f64>,
    sum: f64,
    current: Option<f64>,
    previous: Option<f64>,
}

impl RollingSma {
    pub fn new(period: usize) -> Self {
        assert!(period >= 1, "SMA period must be >= 1");
        Self {
            period,
            window: VecDeque::with_capacity(period + 1),
            sum: 0.0,
            current: None,
            previous: None,
        }
    }

    /// Bars required before `current()` is defined.
    pub fn warmup_bars(&self) -> usize {
        self.period
    }

    /// Push the next close, sliding the window forward.
    pub fn update(&mut self, close: f64) {
        self.previous = self.current;

        self.window.push_back(close);
        self.sum += close;
        if self.window.len() > self.period {
            if let Some(oldest) = self.window.pop_front() {
                self.sum -= oldest;
            }
        }

        if self.window.len() == self.period {
            self.current = Some(self.sum / self.period as f64);
        }
    }

    /// This bar's average, `None` during warm-up.
    pub fn current(&self) -> Option<f64> {
        self.current
    }

    /// The previous bar's average, `None` until one bar after warm-up.
    pub fn previous(&self) -> Option<f64> {
        self.previous
    }
}

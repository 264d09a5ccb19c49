//! Short-term trend classification over the last three close-to-close deltas.

use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Direction of the recent close-to-close drift.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Trend {
    Bearish,
    Bullish,
    Neutral,
}

/// Rolling window of the closes needed to form three consecutive deltas.
///
/// With fewer than four observed closes the classification is `Neutral`,
/// which suppresses every trend-gated pattern during early bars.
#[derive(Debug, Clone, Default)]
pub struct TrendWindow {
    closes: VecDeque<f64>,
}

impl TrendWindow {
    /// Closes retained: three deltas need four samples.
    pub const SPAN: usize = 4;

    pub fn new() -> Self {
        Self {
            closes: VecDeque::with_capacity(Self::SPAN + 1),
        }
    }

    /// Record this bar's close, dropping the oldest beyond the span.
    pub fn observe(&mut self, close: f64) {
        self.closes.push_back(close);
        if self.closes.len() > Self::SPAN {
            self.closes.pop_front();
        }
    }

    /// Sum the three most recent deltas and compare against the margin.
    pub fn classify(&self, acceptable_margin: f64) -> Trend {
        if self.closes.len() < Self::SPAN {
            return Trend::Neutral;
        }

        let mut balance = 0.0;
        for pair in self.closes.iter().zip(self.closes.iter().skip(1)) {
            balance += pair.1 - pair.0;
        }

        if balance < -acceptable_margin {
            Trend::Bearish
        } else if balance > acceptable_margin {
            Trend::Bullish
        } else {
            Trend::Neutral
        }
    }
}

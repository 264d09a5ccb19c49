//! Bar — the fundamental market data unit.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from bar validation.
///
/// An invalid bar is fatal to that bar's processing: the strategy rejects it
/// without advancing any rolling state.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BarError {
    #[error("bar {date}: non-finite value in field {field}")]
    NonFinite { date: NaiveDate, field: &'static str },

    #[error("bar {date}: negative price in field {field}")]
    NegativePrice { date: NaiveDate, field: &'static str },

    #[error("bar {date}: high {high} is below low {low}")]
    HighBelowLow {
        date: NaiveDate,
        high: f64,
        low: f64,
    },

    #[error("bar {date}: open {open} or close {close} outside [{low}, {high}]")]
    BodyOutsideRange {
        date: NaiveDate,
        open: f64,
        close: f64,
        high: f64,
        low: f64,
    },
}

/// OHLCV bar for a single instrument on a single day.
///
/// Produced once per time step by the execution environment and borrowed
/// read-only by the engine for the duration of one evaluation step.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bar {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: u64,
}

impl Bar {
    /// Basic OHLC sanity check: high >= low, body inside the high/low range,
    /// all prices finite and non-negative.
    pub fn is_sane(&self) -> bool {
        self.validate().is_ok()
    }

    /// Full validation with a typed error naming the violated relationship.
    pub fn validate(&self) -> Result<(), BarError> {
        for (field, value) in [
            ("open", self.open),
            ("high", self.high),
            ("low", self.low),
            ("close", self.close),
        ] {
            if !value.is_finite() {
                return Err(BarError::NonFinite {
                    date: self.date,
                    field,
                });
            }
            if value < 0.0 {
                return Err(BarError::NegativePrice {
                    date: self.date,
                    field,
                });
            }
        }

        if self.high < self.low {
            return Err(BarError::HighBelowLow {
                date: self.date,
                high: self.high,
                low: self.low,
            });
        }

        let body_hi = self.open.max(self.close);
        let body_lo = self.open.min(self.close);
        if body_hi > self.high || body_lo < self.low {
            return Err(BarError::BodyOutsideRange {
                date: self.date,
                open: self.open,
                close: self.close,
                high: self.high,
                low: self.low,
            });
        }

        Ok(())
    }

    /// Absolute candle body: |close - open|.
    pub fn body(&self) -> f64 {
        (self.close - self.open).abs()
    }

    /// Upper wick: high - max(open, close).
    pub fn upper_wick(&self) -> f64 {
        self.high - self.open.max(self.close)
    }

    /// Lower wick: min(open, close) - low.
    pub fn lower_wick(&self) -> f64 {
        self.open.min(self.close) - self.low
    }

    /// Close above open.
    pub fn is_bullish(&self) -> bool {
        self.close > self.open
    }

    /// Close below open.
    pub fn is_bearish(&self) -> bool {
        self.close < self.open
    }
}

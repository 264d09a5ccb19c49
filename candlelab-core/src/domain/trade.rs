//! Closed-trade record delivered by the execution environment.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One completed round trip (buy fill through sell fill).
///
/// The engine does not compute these — profit and commission bookkeeping
/// belong to the execution environment. The record is consumed purely for
/// inspection via [`crate::strategy::ReversalStrategy::last_trade`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClosedTrade {
    pub entry_date: NaiveDate,
    pub exit_date: NaiveDate,
    pub size: u64,
    pub entry_price: f64,
    pub exit_price: f64,
}

impl ClosedTrade {
    /// Gross price move captured by the trade, before commission.
    pub fn gross_pnl(&self) -> f64 {
        (self.exit_price - self.entry_price) * self.size as f64
    }
}

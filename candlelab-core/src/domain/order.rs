//! Order intents emitted by the strategy and fill notifications consumed
//! from the execution environment.

use serde::{Deserialize, Serialize};

/// Buy or sell, from the strategy's perspective.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderSide {
    Buy,
    Sell,
}

/// A market order the strategy wants the execution environment to place.
///
/// At most one intent is emitted per bar, and only while no other order is
/// pending. `size` is always > 0 — a sizing rule that rounds down to zero
/// suppresses the intent instead of emitting an empty order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderIntent {
    pub side: OrderSide,
    pub size: u64,
}

impl OrderIntent {
    pub fn buy(size: u64) -> Self {
        debug_assert!(size > 0, "order size must be > 0");
        Self {
            side: OrderSide::Buy,
            size,
        }
    }

    pub fn sell(size: u64) -> Self {
        debug_assert!(size > 0, "order size must be > 0");
        Self {
            side: OrderSide::Sell,
            size,
        }
    }
}

/// Order lifecycle states reported back by the execution environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderStatus {
    /// Order handed to the broker, not yet acknowledged.
    Submitted,
    /// Broker acknowledged the order.
    Accepted,
    /// Completely filled.
    Completed,
    /// Broker refused the order (margin, liquidity, etc).
    Rejected,
}

/// Notification about a previously submitted order.
///
/// The strategy acts on `Completed` (advance the state machine) and
/// `Rejected` (roll back to the pre-submission state); `Submitted` and
/// `Accepted` are informational and ignored.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OrderNotification {
    pub status: OrderStatus,
    pub side: OrderSide,
    /// Filled quantity; meaningful only for `Completed`.
    pub filled_size: u64,
    /// Fill price; meaningful only for `Completed`.
    pub filled_price: f64,
}

impl OrderNotification {
    pub fn completed(side: OrderSide, filled_size: u64, filled_price: f64) -> Self {
        Self {
            status: OrderStatus::Completed,
            side,
            filled_size,
            filled_price,
        }
    }

    pub fn rejected(side: OrderSide) -> Self {
        Self {
            status: OrderStatus::Rejected,
            side,
            filled_size: 0,
            filled_price: 0.0,
        }
    }

    /// Statuses that resolve the pending order one way or the other.
    pub fn is_terminal(&self) -> bool {
        matches!(self.status, OrderStatus::Completed | OrderStatus::Rejected)
    }
}

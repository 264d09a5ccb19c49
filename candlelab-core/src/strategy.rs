//! The position & order state machine.
//!
//! `ReversalStrategy` owns every piece of mutable state: the rolling
//! indicators, the trend window, the machine state, and the pattern hold
//! timer. It consumes one bar at a time, emits at most one order intent per
//! bar, and advances on fill/reject notifications from the execution
//! environment.
//!
//! The machine walks a single cycle:
//!
//! ```text
//! Flat --entry trigger--> BuyPending --fill--> Long --exit trigger--> SellPending --fill--> Flat
//! ```
//!
//! While an order is pending, trigger evaluation is suppressed entirely; the
//! rolling windows still advance. A rejected order restores the exact
//! pre-submission state. Submitting while pending is unrepresentable:
//! intents are only constructed in the `Flat` and `Long` arms.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::{ParamsError, StrategyParams};
use crate::domain::{
    Bar, BarError, ClosedTrade, OrderIntent, OrderNotification, OrderSide, OrderStatus,
};
use crate::indicators::IndicatorEngine;
use crate::patterns::{self, WickThresholds};
use crate::signal::{self, EntryConditions, ExitConditions};
use crate::trend::TrendWindow;

/// Errors from strategy evaluation and notification handling.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum StrategyError {
    /// The bar violated the OHLC contract; no state was advanced.
    #[error(transparent)]
    InvalidBar(#[from] BarError),

    /// A terminal notification arrived that does not match the machine state.
    #[error("unexpected {status:?} notification for {side:?} order in state {state}")]
    UnexpectedNotification {
        status: OrderStatus,
        side: OrderSide,
        state: &'static str,
    },
}

/// Machine state: position and pending-order discipline in one enum.
///
/// `entry_price` lives only in the variants where a position exists, so it
/// cannot survive a round trip by accident.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PositionState {
    Flat,
    BuyPending {
        size: u64,
        submitted: NaiveDate,
    },
    Long {
        size: u64,
        entry_price: f64,
    },
    SellPending {
        size: u64,
        entry_price: f64,
        submitted: NaiveDate,
    },
}

impl PositionState {
    /// A position is held (including while its closing order is in flight).
    pub fn is_open(&self) -> bool {
        matches!(
            self,
            PositionState::Long { .. } | PositionState::SellPending { .. }
        )
    }

    /// An order is awaiting resolution.
    pub fn has_pending_order(&self) -> bool {
        matches!(
            self,
            PositionState::BuyPending { .. } | PositionState::SellPending { .. }
        )
    }

    pub fn entry_price(&self) -> Option<f64> {
        match self {
            PositionState::Long { entry_price, .. }
            | PositionState::SellPending { entry_price, .. } => Some(*entry_price),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            PositionState::Flat => "Flat",
            PositionState::BuyPending { .. } => "BuyPending",
            PositionState::Long { .. } => "Long",
            PositionState::SellPending { .. } => "SellPending",
        }
    }
}

/// Which condition set produced an intent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TriggerConditions {
    Entry(EntryConditions),
    Exit(ExitConditions),
}

/// Audit record for one emitted intent: when, what, and why.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DecisionRecord {
    pub date: NaiveDate,
    pub intent: OrderIntent,
    pub conditions: TriggerConditions,
}

/// Bar-driven long-only reversal strategy.
#[derive(Debug, Clone)]
pub struct ReversalStrategy {
    params: StrategyParams,
    thresholds: WickThresholds,
    indicators: IndicatorEngine,
    trend: TrendWindow,
    state: PositionState,
    hold_timer: Option<NaiveDate>,
    decisions: Vec<DecisionRecord>,
    last_trade: Option<ClosedTrade>,
}

impl ReversalStrategy {
    pub fn new(params: StrategyParams) -> Result<Self, ParamsError> {
        params.validate()?;
        let thresholds = WickThresholds::from_ratios(params.high_wick_ratio, params.low_wick_ratio);
        let indicators = IndicatorEngine::new(&params);
        Ok(Self {
            params,
            thresholds,
            indicators,
            trend: TrendWindow::new(),
            state: PositionState::Flat,
            hold_timer: None,
            decisions: Vec::new(),
            last_trade: None,
        })
    }

    pub fn params(&self) -> &StrategyParams {
        &self.params
    }

    pub fn state(&self) -> PositionState {
        self.state
    }

    pub fn hold_timer(&self) -> Option<NaiveDate> {
        self.hold_timer
    }

    /// Every intent emitted so far, in order.
    pub fn decisions(&self) -> &[DecisionRecord] {
        &self.decisions
    }

    pub fn last_trade(&self) -> Option<&ClosedTrade> {
        self.last_trade.as_ref()
    }

    /// Bars before the indicator snapshot is fully defined. No intent can
    /// be emitted earlier.
    pub fn warmup_bars(&self) -> usize {
        self.indicators.warmup_bars()
    }

    /// Evaluate one bar. Returns the order intent for this bar, if any.
    ///
    /// `available_cash` is the execution environment's current free cash,
    /// used by the entry sizing rule. An invalid bar is rejected without
    /// advancing any rolling state.
    pub fn on_bar(
        &mut self,
        bar: &Bar,
        available_cash: f64,
    ) -> Result<Option<OrderIntent>, StrategyError> {
        bar.validate()?;

        let snapshot = self.indicators.advance(bar);
        // Trend over the window preceding this bar; today's close enters the
        // window only after classification.
        let trend = self.trend.classify(self.params.acceptable_margin);
        self.trend.observe(bar.close);

        if self.state.has_pending_order() {
            return Ok(None);
        }
        if !snapshot.is_warm() {
            return Ok(None);
        }

        let flags = patterns::classify(bar, trend, self.thresholds);

        match self.state {
            PositionState::Flat => {
                let entry = EntryConditions::evaluate(bar, &snapshot, flags);

                // Reversal patterns arm the timer whenever they appear,
                // not only when they are the condition that fires.
                if flags.bullish_reversal() {
                    self.hold_timer = Some(bar.date);
                }

                if !entry.any() {
                    return Ok(None);
                }

                let size =
                    signal::entry_size(available_cash, bar.close, self.params.cash_fraction);
                if size == 0 {
                    return Ok(None);
                }

                let intent = OrderIntent::buy(size);
                self.state = PositionState::BuyPending {
                    size,
                    submitted: bar.date,
                };
                self.decisions.push(DecisionRecord {
                    date: bar.date,
                    intent,
                    conditions: TriggerConditions::Entry(entry),
                });
                Ok(Some(intent))
            }

            PositionState::Long { size, entry_price } => {
                let hold_expired = self
                    .hold_timer
                    .is_some_and(|armed| (bar.date - armed).num_days() >= self.params.hold_days);

                let exit = ExitConditions::evaluate(
                    bar,
                    &snapshot,
                    flags,
                    entry_price,
                    self.params.stop_loss_pct,
                    hold_expired,
                );

                if hold_expired {
                    self.hold_timer = None;
                }
                if self.params.shooting_star_arms_timer && flags.shooting_star {
                    self.hold_timer = Some(bar.date);
                }

                if !exit.any() {
                    return Ok(None);
                }

                let intent = OrderIntent::sell(size);
                self.state = PositionState::SellPending {
                    size,
                    entry_price,
                    submitted: bar.date,
                };
                self.decisions.push(DecisionRecord {
                    date: bar.date,
                    intent,
                    conditions: TriggerConditions::Exit(exit),
                });
                Ok(Some(intent))
            }

            // Unreachable: pending states returned above.
            PositionState::BuyPending { .. } | PositionState::SellPending { .. } => Ok(None),
        }
    }

    /// Consume an order notification from the execution environment.
    ///
    /// `Submitted`/`Accepted` are informational. `Completed` advances the
    /// machine; `Rejected` restores the pre-submission state. A terminal
    /// notification that does not match the current state is an error and
    /// leaves the machine untouched.
    pub fn on_order_notification(
        &mut self,
        notification: &OrderNotification,
    ) -> Result<(), StrategyError> {
        match notification.status {
            OrderStatus::Submitted | OrderStatus::Accepted => Ok(()),

            OrderStatus::Completed => match (self.state, notification.side) {
                (PositionState::BuyPending { .. }, OrderSide::Buy) => {
                    self.state = PositionState::Long {
                        size: notification.filled_size,
                        entry_price: notification.filled_price,
                    };
                    Ok(())
                }
                (PositionState::SellPending { .. }, OrderSide::Sell) => {
                    self.state = PositionState::Flat;
                    self.hold_timer = None;
                    Ok(())
                }
                _ => Err(self.unexpected(notification)),
            },

            OrderStatus::Rejected => match (self.state, notification.side) {
                (PositionState::BuyPending { .. }, OrderSide::Buy) => {
                    self.state = PositionState::Flat;
                    Ok(())
                }
                (PositionState::SellPending { size, entry_price, .. }, OrderSide::Sell) => {
                    self.state = PositionState::Long { size, entry_price };
                    Ok(())
                }
                _ => Err(self.unexpected(notification)),
            },
        }
    }

    /// Consume a closed-trade record. Informational only; retrievable via
    /// [`Self::last_trade`].
    pub fn on_trade_closed(&mut self, trade: &ClosedTrade) {
        self.last_trade = Some(trade.clone());
    }

    fn unexpected(&self, notification: &OrderNotification) -> StrategyError {
        StrategyError::UnexpectedNotification {
            status: notification.status,
            side: notification.side,
            state: self.state.name(),
        }
    }
}

//! CandleLab Core — candlestick reversal signal engine.
//!
//! This crate contains the decision core of the strategy lab:
//! - Domain types (bars, order intents, fill notifications, closed trades)
//! - Incremental rolling indicators (volatility band, SMA pair)
//! - Pure candlestick pattern detectors gated by a three-delta trend classifier
//! - Entry/exit condition sets combined per bar
//! - Position & order state machine with stop-loss and pattern hold timer
//!
//! The execution environment (data feed, broker simulation, accounting,
//! plotting) lives outside this crate and interacts through
//! [`strategy::ReversalStrategy::on_bar`] and the notification callbacks.

pub mod config;
pub mod domain;
pub mod indicators;
pub mod patterns;
pub mod signal;
pub mod strategy;
pub mod trend;

//! Entry and exit condition sets — the per-bar trigger logic.
//!
//! Conditions are an unordered logical OR: one true member fires the
//! trigger. Every member is computed eagerly each bar, so the strategy can
//! record which ones fired and pattern side effects (timer arming) do not
//! depend on evaluation order. During warm-up every member is false.

use crate::domain::Bar;
use crate::indicators::IndicatorSnapshot;
use crate::patterns::PatternFlags;
use serde::{Deserialize, Serialize};

/// Entry trigger members, evaluated only while flat with no pending order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryConditions {
    /// Close fell below the lower volatility band.
    pub below_lower_band: bool,
    /// Short SMA crossed above the long SMA this bar.
    pub golden_cross: bool,
    pub hammer: bool,
    pub inverted_hammer: bool,
}

impl EntryConditions {
    pub fn evaluate(bar: &Bar, snapshot: &IndicatorSnapshot, flags: PatternFlags) -> Self {
        Self {
            below_lower_band: snapshot
                .band
                .is_some_and(|band| bar.close < band.lower),
            golden_cross: crossed_above(snapshot),
            hammer: flags.hammer,
            inverted_hammer: flags.inverted_hammer,
        }
    }

    pub fn any(&self) -> bool {
        self.below_lower_band || self.golden_cross || self.hammer || self.inverted_hammer
    }
}

/// Exit trigger members, evaluated only while long with no pending order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExitConditions {
    /// Short SMA crossed below the long SMA this bar.
    pub death_cross: bool,
    pub shooting_star: bool,
    /// Hold timer armed by a reversal pattern has run its full period.
    pub hold_expired: bool,
    /// Close fell below entry * (1 - stop_loss_pct/100).
    pub stop_loss: bool,
    pub deadman: bool,
}

impl ExitConditions {
    pub fn evaluate(
        bar: &Bar,
        snapshot: &IndicatorSnapshot,
        flags: PatternFlags,
        entry_price: f64,
        stop_loss_pct: f64,
        hold_expired: bool,
    ) -> Self {
        Self {
            death_cross: crossed_below(snapshot),
            shooting_star: flags.shooting_star,
            hold_expired,
            stop_loss: bar.close < stop_floor(entry_price, stop_loss_pct),
            deadman: flags.deadman,
        }
    }

    pub fn any(&self) -> bool {
        self.death_cross
            || self.shooting_star
            || self.hold_expired
            || self.stop_loss
            || self.deadman
    }
}

/// Price below which the stop-loss exit fires.
pub fn stop_floor(entry_price: f64, stop_loss_pct: f64) -> f64 {
    entry_price * (1.0 - stop_loss_pct / 100.0)
}

/// Whole-share entry size: floor(cash * fraction / close).
///
/// Returns 0 when the close is not positive or cash cannot cover one share;
/// the strategy suppresses the intent in that case.
pub fn entry_size(available_cash: f64, close: f64, cash_fraction: f64) -> u64 {
    if close <= 0.0 || available_cash <= 0.0 {
        return 0;
    }
    (available_cash * cash_fraction / close).floor() as u64
}

fn crossed_above(snapshot: &IndicatorSnapshot) -> bool {
    match (
        snapshot.short_sma,
        snapshot.long_sma,
        snapshot.prev_short_sma,
        snapshot.prev_long_sma,
    ) {
        (Some(short), Some(long), Some(prev_short), Some(prev_long)) => {
            short > long && prev_short <= prev_long
        }
        _ => false,
    }
}

fn crossed_below(snapshot: &IndicatorSnapshot) -> bool {
    match (
        snapshot.short_sma,
        snapshot.long_sma,
        snapshot.prev_short_sma,
        snapshot.prev_long_sma,
    ) {
        (Some(short), Some(long), Some(prev_short), Some(prev_long)) => {
            short < long && prev_short >= prev_long
        }
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::BandValues;
    use chrono::NaiveDate;

    fn make_bar(close: f64) -> Bar {
        Bar {
            date: NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(),
            open: close - 0.5,
            high: close + 1.0,
            low: close - 1.0,
            close,
            volume: 1000,
        }
    }

    fn warm_snapshot(
        short: f64,
        long: f64,
        prev_short: f64,
        prev_long: f64,
        lower_band: f64,
    ) -> IndicatorSnapshot {
        IndicatorSnapshot {
            band: Some(BandValues {
                middle: lower_band + 10.0,
                upper: lower_band + 20.0,
                lower: lower_band,
            }),
            short_sma: Some(short),
            long_sma: Some(long),
            prev_short_sma: Some(prev_short),
            prev_long_sma: Some(prev_long),
        }
    }

    fn cold_snapshot() -> IndicatorSnapshot {
        IndicatorSnapshot {
            band: None,
            short_sma: None,
            long_sma: None,
            prev_short_sma: None,
            prev_long_sma: None,
        }
    }

    #[test]
    fn entry_fires_below_lower_band() {
        let bar = make_bar(94.0);
        let snapshot = warm_snapshot(100.0, 100.0, 100.0, 100.0, 95.0);
        let entry = EntryConditions::evaluate(&bar, &snapshot, PatternFlags::default());
        assert!(entry.below_lower_band);
        assert!(entry.any());
    }

    #[test]
    fn entry_quiet_above_lower_band() {
        let bar = make_bar(96.0);
        let snapshot = warm_snapshot(100.0, 100.0, 100.0, 100.0, 95.0);
        let entry = EntryConditions::evaluate(&bar, &snapshot, PatternFlags::default());
        assert!(!entry.any());
    }

    #[test]
    fn entry_fires_on_golden_cross() {
        let bar = make_bar(100.0);
        // prev: short <= long, current: short > long
        let snapshot = warm_snapshot(105.0, 100.0, 95.0, 100.0, 0.0);
        let entry = EntryConditions::evaluate(&bar, &snapshot, PatternFlags::default());
        assert!(entry.golden_cross);
        assert!(entry.any());
    }

    #[test]
    fn no_cross_when_already_above() {
        let bar = make_bar(100.0);
        let snapshot = warm_snapshot(105.0, 100.0, 104.0, 100.0, 0.0);
        let entry = EntryConditions::evaluate(&bar, &snapshot, PatternFlags::default());
        assert!(!entry.golden_cross);
    }

    #[test]
    fn cross_from_exact_equality_counts() {
        let bar = make_bar(100.0);
        // prev short == prev long, current short > long
        let snapshot = warm_snapshot(101.0, 100.0, 100.0, 100.0, 0.0);
        let entry = EntryConditions::evaluate(&bar, &snapshot, PatternFlags::default());
        assert!(entry.golden_cross);
    }

    #[test]
    fn entry_fires_on_hammer_flag() {
        let bar = make_bar(100.0);
        let snapshot = warm_snapshot(100.0, 100.0, 100.0, 100.0, 0.0);
        let flags = PatternFlags {
            hammer: true,
            ..Default::default()
        };
        let entry = EntryConditions::evaluate(&bar, &snapshot, flags);
        assert!(entry.hammer);
        assert!(entry.any());
    }

    #[test]
    fn entry_all_false_during_warmup() {
        // Even a close of zero against a cold snapshot fires nothing.
        let bar = make_bar(0.5);
        let entry = EntryConditions::evaluate(&bar, &cold_snapshot(), PatternFlags::default());
        assert_eq!(entry, EntryConditions::default());
        assert!(!entry.any());
    }

    #[test]
    fn exit_fires_on_death_cross() {
        let bar = make_bar(100.0);
        let snapshot = warm_snapshot(95.0, 100.0, 105.0, 100.0, 0.0);
        let exit = ExitConditions::evaluate(
            &bar,
            &snapshot,
            PatternFlags::default(),
            100.0,
            5.0,
            false,
        );
        assert!(exit.death_cross);
        assert!(exit.any());
    }

    #[test]
    fn stop_loss_boundary() {
        let snapshot = warm_snapshot(100.0, 99.0, 100.0, 99.0, 0.0);

        // entry 100, stop 5%: floor at 95
        let below = ExitConditions::evaluate(
            &make_bar(94.0),
            &snapshot,
            PatternFlags::default(),
            100.0,
            5.0,
            false,
        );
        assert!(below.stop_loss);

        let above = ExitConditions::evaluate(
            &make_bar(96.0),
            &snapshot,
            PatternFlags::default(),
            100.0,
            5.0,
            false,
        );
        assert!(!above.stop_loss);

        // exactly at the floor: not strictly below, no exit
        let at_floor = ExitConditions::evaluate(
            &make_bar(95.0),
            &snapshot,
            PatternFlags::default(),
            100.0,
            5.0,
            false,
        );
        assert!(!at_floor.stop_loss);
    }

    #[test]
    fn exit_fires_on_hold_expiry_alone() {
        let bar = make_bar(100.0);
        let snapshot = warm_snapshot(100.0, 99.0, 100.0, 99.0, 0.0);
        let exit =
            ExitConditions::evaluate(&bar, &snapshot, PatternFlags::default(), 100.0, 5.0, true);
        assert!(exit.hold_expired);
        assert!(exit.any());
    }

    #[test]
    fn entry_size_floors_to_whole_shares() {
        // 100_000 * 0.9 / 103.0 = 873.78... -> 873
        assert_eq!(entry_size(100_000.0, 103.0, 0.9), 873);
        assert_eq!(entry_size(1_000.0, 100.0, 0.9), 9);
    }

    #[test]
    fn entry_size_zero_when_unaffordable() {
        assert_eq!(entry_size(50.0, 100.0, 0.9), 0);
        assert_eq!(entry_size(0.0, 100.0, 0.9), 0);
        assert_eq!(entry_size(-10.0, 100.0, 0.9), 0);
        assert_eq!(entry_size(1_000.0, 0.0, 0.9), 0);
    }

    #[test]
    fn conditions_serialization_roundtrip() {
        let entry = EntryConditions {
            below_lower_band: true,
            golden_cross: false,
            hammer: true,
            inverted_hammer: false,
        };
        let json = serde_json::to_string(&entry).unwrap();
        let deser: EntryConditions = serde_json::from_str(&json).unwrap();
        assert_eq!(entry, deser);
    }
}

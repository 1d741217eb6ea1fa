//! Property tests for indicator bounds and lifecycle invariants.

mod common;

use common::*;
use proptest::prelude::*;
use sigscan::domain::indicator::rsi;
use sigscan::domain::lifecycle::{self, LifecycleParams, TickFlags, Verdict};
use sigscan::domain::position::Position;
use sigscan::domain::snapshot::IndicatorSnapshot;
use sigscan::domain::strategy::{StrategyKind, StrategyProfile};

proptest! {
    #[test]
    fn oscillator_stays_within_bounds(
        closes in prop::collection::vec(1.0f64..1000.0, 15..60)
    ) {
        let bars = bars_from_closes("X.NS", &closes);
        let out = rsi(&bars, 14).unwrap();
        for v in out {
            prop_assert!((0.0..=100.0).contains(&v), "RSI {v} out of range");
        }
    }

    #[test]
    fn trailing_stop_never_decreases(
        path in prop::collection::vec(90.0f64..130.0, 1..30)
    ) {
        let mut position = Position::open(
            "X",
            "X.NS",
            StrategyKind::Swing,
            100.0,
            97.0,
            105.4,
            Some(109.0),
            date(2024, 1, 15),
        )
        .unwrap();
        let profile = StrategyProfile::swing_strict();
        let params = LifecycleParams::default();
        let mut closes = zigzag_closes(60);
        let mut last_stop = position.stop_loss;

        for price in path {
            closes.push(price);
            let bars = bars_from_closes("X.NS", &closes);
            let snap = IndicatorSnapshot::compute(&bars, &[20, 50]).unwrap();

            let mut events = Vec::new();
            let verdict = lifecycle::manage(
                &mut position,
                &snap,
                &profile,
                TickFlags::default(),
                &params,
                &mut events,
            );

            prop_assert!(
                position.stop_loss >= last_stop,
                "stop fell from {last_stop} to {}",
                position.stop_loss
            );
            last_stop = position.stop_loss;

            if verdict != Verdict::Hold {
                break;
            }
        }
    }

    #[test]
    fn targets_stay_ordered_through_lifecycle(
        path in prop::collection::vec(95.0f64..120.0, 1..30)
    ) {
        let mut position = Position::open(
            "X",
            "X.NS",
            StrategyKind::Swing,
            100.0,
            97.0,
            105.4,
            Some(109.0),
            date(2024, 1, 15),
        )
        .unwrap();
        let profile = StrategyProfile::swing_strict();
        let params = LifecycleParams::default();
        let mut closes = zigzag_closes(60);

        for price in path {
            closes.push(price);
            let bars = bars_from_closes("X.NS", &closes);
            let snap = IndicatorSnapshot::compute(&bars, &[20, 50]).unwrap();

            let mut events = Vec::new();
            let verdict = lifecycle::manage(
                &mut position,
                &snap,
                &profile,
                TickFlags::default(),
                &params,
                &mut events,
            );

            if let Some(t2) = position.target_2 {
                prop_assert!(position.target_1 < t2);
            }
            prop_assert!(position.validate().is_ok());

            if verdict != Verdict::Hold {
                break;
            }
        }
    }
}

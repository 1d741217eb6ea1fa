//! Strategy kinds and entry-rule profiles.
//!
//! A strategy is data, not a code path: a [`StrategyProfile`] carries a list
//! of weighted predicates, optional hard gates, an acceptance threshold and
//! an optional extreme-oscillator veto band. New strategies are added by
//! composing predicates, not by copying engine logic.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

use crate::domain::snapshot::IndicatorSnapshot;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StrategyKind {
    Intraday,
    Btst,
    Swing,
    Gold,
}

impl StrategyKind {
    pub const ALL: [StrategyKind; 4] = [
        StrategyKind::Intraday,
        StrategyKind::Btst,
        StrategyKind::Swing,
        StrategyKind::Gold,
    ];

    /// Daily entry cap for capacity-limited categories.
    pub fn daily_cap(&self) -> Option<u32> {
        match self {
            StrategyKind::Intraday => Some(3),
            StrategyKind::Btst => Some(4),
            StrategyKind::Swing | StrategyKind::Gold => None,
        }
    }

    /// Swing-class kinds carry the two-target T1/T2 lifecycle.
    pub fn is_swing_class(&self) -> bool {
        matches!(self, StrategyKind::Swing | StrategyKind::Gold)
    }

    /// Basename for the persisted position document of this category.
    pub fn document_name(&self) -> &'static str {
        match self {
            StrategyKind::Intraday => "intraday_positions",
            StrategyKind::Btst => "btst_positions",
            StrategyKind::Swing => "swing_positions",
            StrategyKind::Gold => "gold_positions",
        }
    }
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StrategyKind::Intraday => write!(f, "INTRADAY"),
            StrategyKind::Btst => write!(f, "BTST"),
            StrategyKind::Swing => write!(f, "SWING"),
            StrategyKind::Gold => write!(f, "GOLD"),
        }
    }
}

/// One boolean entry condition over the latest indicator values.
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    /// Close above every EMA in the list.
    CloseAboveEmas(Vec<usize>),
    /// Oscillator inside [lower, upper].
    OscillatorIn { lower: f64, upper: f64 },
    /// Trend-difference line above its signal line.
    TrendAboveSignal,
    /// Fast EMA above slow EMA.
    EmaAbove { fast: usize, slow: usize },
    /// Fast EMA above slow EMA and close above both.
    FastTrendStack { fast: usize, slow: usize },
    /// Today's range within `mult` × its 10-bar average.
    RangeWithin { mult: f64 },
    /// Volume at least `mult` × its 10- or 20-bar average.
    VolumeAtLeast { mult: f64, lookback: usize },
    /// Close above the session VWAP.
    CloseAboveVwap,
    /// Close in the top quartile of the day's range.
    CloseInTopQuartile,
}

impl Predicate {
    pub fn holds(&self, snap: &IndicatorSnapshot) -> bool {
        match self {
            Predicate::CloseAboveEmas(spans) => spans
                .iter()
                .all(|&s| snap.ema(s).is_some_and(|e| snap.close > e)),
            Predicate::OscillatorIn { lower, upper } => {
                snap.oscillator >= *lower && snap.oscillator <= *upper
            }
            Predicate::TrendAboveSignal => snap.trend_line > snap.trend_signal,
            Predicate::EmaAbove { fast, slow } => match (snap.ema(*fast), snap.ema(*slow)) {
                (Some(f), Some(s)) => f > s,
                _ => false,
            },
            Predicate::FastTrendStack { fast, slow } => {
                match (snap.ema(*fast), snap.ema(*slow)) {
                    (Some(f), Some(s)) => f > s && snap.close > f && snap.close > s,
                    _ => false,
                }
            }
            Predicate::RangeWithin { mult } => snap.range <= mult * snap.avg_range_10,
            Predicate::VolumeAtLeast { mult, lookback } => {
                let avg = if *lookback <= 10 {
                    snap.avg_volume_10
                } else {
                    snap.avg_volume_20
                };
                snap.volume >= mult * avg
            }
            Predicate::CloseAboveVwap => snap.close > snap.vwap,
            Predicate::CloseInTopQuartile => snap.close_in_top_quartile(),
        }
    }

    /// Human-readable reason string for a matched predicate.
    pub fn describe(&self, snap: &IndicatorSnapshot) -> String {
        match self {
            Predicate::CloseAboveEmas(spans) => {
                let list: Vec<String> = spans.iter().map(|s| s.to_string()).collect();
                format!("Price above EMA {}", list.join(" & "))
            }
            Predicate::OscillatorIn { .. } => {
                format!("RSI healthy ({:.1})", snap.oscillator)
            }
            Predicate::TrendAboveSignal => "MACD bullish crossover".into(),
            Predicate::EmaAbove { .. } => "Trend alignment positive".into(),
            Predicate::FastTrendStack { fast, slow } => {
                format!("EMA {fast}/{slow} stack aligned")
            }
            Predicate::RangeWithin { .. } => "No abnormal volatility".into(),
            Predicate::VolumeAtLeast { mult, lookback } => {
                format!("Volume {mult}x above {lookback}-bar average")
            }
            Predicate::CloseAboveVwap => "Price above session VWAP".into(),
            Predicate::CloseInTopQuartile => "Close in top quartile of range".into(),
        }
    }

    fn collect_ema_spans(&self, spans: &mut BTreeSet<usize>) {
        match self {
            Predicate::CloseAboveEmas(list) => spans.extend(list.iter().copied()),
            Predicate::EmaAbove { fast, slow } | Predicate::FastTrendStack { fast, slow } => {
                spans.insert(*fast);
                spans.insert(*slow);
            }
            _ => {}
        }
    }
}

#[derive(Debug, Clone)]
pub struct WeightedRule {
    pub predicate: Predicate,
    pub weight: u32,
}

/// Oscillator band outside which a candidate is rejected regardless of score.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VetoBand {
    pub lower: f64,
    pub upper: f64,
}

impl VetoBand {
    pub fn rejects(&self, oscillator: f64) -> bool {
        oscillator < self.lower || oscillator > self.upper
    }
}

#[derive(Debug, Clone)]
pub struct StrategyProfile {
    pub name: &'static str,
    pub rules: Vec<WeightedRule>,
    /// Hard pass/fail filters; any failure rejects the candidate outright.
    pub gates: Vec<Predicate>,
    pub threshold: u32,
    pub veto: Option<VetoBand>,
    /// Fast trend EMA referenced by the momentum-weakness exit.
    pub fast_span: usize,
}

const EXTREME_VETO: VetoBand = VetoBand {
    lower: 25.0,
    upper: 75.0,
};

impl StrategyProfile {
    /// Generic swing/BTST/intraday baseline; also the GOLD profile.
    pub fn baseline() -> Self {
        Self {
            name: "baseline",
            rules: vec![
                WeightedRule {
                    predicate: Predicate::CloseAboveEmas(vec![20, 50]),
                    weight: 25,
                },
                WeightedRule {
                    predicate: Predicate::OscillatorIn {
                        lower: 45.0,
                        upper: 65.0,
                    },
                    weight: 20,
                },
                WeightedRule {
                    predicate: Predicate::TrendAboveSignal,
                    weight: 25,
                },
                WeightedRule {
                    predicate: Predicate::EmaAbove { fast: 20, slow: 50 },
                    weight: 15,
                },
                WeightedRule {
                    predicate: Predicate::RangeWithin { mult: 1.5 },
                    weight: 15,
                },
            ],
            gates: vec![],
            threshold: 80,
            veto: Some(EXTREME_VETO),
            fast_span: 20,
        }
    }

    /// Strict swing: three trend averages plus volume confirmation.
    pub fn swing_strict() -> Self {
        Self {
            name: "swing_strict",
            rules: vec![
                WeightedRule {
                    predicate: Predicate::CloseAboveEmas(vec![20, 50, 200]),
                    weight: 40,
                },
                WeightedRule {
                    predicate: Predicate::OscillatorIn {
                        lower: 45.0,
                        upper: 65.0,
                    },
                    weight: 30,
                },
                WeightedRule {
                    predicate: Predicate::VolumeAtLeast {
                        mult: 1.5,
                        lookback: 20,
                    },
                    weight: 30,
                },
            ],
            gates: vec![],
            threshold: 70,
            veto: Some(EXTREME_VETO),
            fast_span: 20,
        }
    }

    /// Intraday fast-trend profile over session bars.
    pub fn intraday_fast() -> Self {
        Self {
            name: "intraday_fast",
            rules: vec![
                WeightedRule {
                    predicate: Predicate::FastTrendStack { fast: 9, slow: 21 },
                    weight: 40,
                },
                WeightedRule {
                    predicate: Predicate::CloseAboveVwap,
                    weight: 30,
                },
                WeightedRule {
                    predicate: Predicate::OscillatorIn {
                        lower: 50.0,
                        upper: 65.0,
                    },
                    weight: 30,
                },
            ],
            gates: vec![],
            threshold: 80,
            veto: Some(EXTREME_VETO),
            fast_span: 9,
        }
    }

    /// BTST end-of-day profile.
    pub fn btst_eod() -> Self {
        Self {
            name: "btst_eod",
            rules: vec![
                WeightedRule {
                    predicate: Predicate::CloseAboveEmas(vec![20, 50]),
                    weight: 40,
                },
                WeightedRule {
                    predicate: Predicate::OscillatorIn {
                        lower: 50.0,
                        upper: 65.0,
                    },
                    weight: 30,
                },
                WeightedRule {
                    predicate: Predicate::RangeWithin { mult: 1.5 },
                    weight: 30,
                },
            ],
            gates: vec![],
            threshold: 80,
            veto: Some(EXTREME_VETO),
            fast_span: 20,
        }
    }

    /// Conservative gap-candidate BTST: hard filters, no weights.
    pub fn btst_gap() -> Self {
        Self {
            name: "btst_gap",
            rules: vec![],
            gates: vec![
                Predicate::CloseInTopQuartile,
                Predicate::VolumeAtLeast {
                    mult: 2.0,
                    lookback: 10,
                },
            ],
            threshold: 0,
            veto: None,
            fast_span: 20,
        }
    }

    /// Look up a profile by config name.
    pub fn by_name(name: &str) -> Option<Self> {
        match name {
            "baseline" => Some(Self::baseline()),
            "swing_strict" => Some(Self::swing_strict()),
            "intraday_fast" => Some(Self::intraday_fast()),
            "btst_eod" => Some(Self::btst_eod()),
            "btst_gap" => Some(Self::btst_gap()),
            _ => None,
        }
    }

    /// Default profile for a strategy kind.
    pub fn default_for(kind: StrategyKind) -> Self {
        match kind {
            StrategyKind::Intraday => Self::intraday_fast(),
            StrategyKind::Btst => Self::btst_eod(),
            StrategyKind::Swing => Self::swing_strict(),
            StrategyKind::Gold => Self::baseline(),
        }
    }

    /// Every EMA span this profile (or its exit logic) will look up.
    pub fn ema_spans(&self) -> Vec<usize> {
        let mut spans = BTreeSet::new();
        for rule in &self.rules {
            rule.predicate.collect_ema_spans(&mut spans);
        }
        for gate in &self.gates {
            gate.collect_ema_spans(&mut spans);
        }
        spans.insert(self.fast_span);
        // lifecycle transitions reference the 20/50 trend pair
        spans.insert(20);
        spans.insert(50);
        spans.into_iter().collect()
    }

    /// Total weight of all rules; 100 for every weighted profile.
    pub fn total_weight(&self) -> u32 {
        self.rules.iter().map(|r| r.weight).sum()
    }
}

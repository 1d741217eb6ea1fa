#![allow(dead_code)]

use chrono::{NaiveDate, NaiveDateTime};
use sigscan::domain::error::SigscanError;
pub use sigscan::domain::ohlcv::OhlcvBar;
use sigscan::domain::position::{ClosedTrade, DailyCounter, Position};
use sigscan::domain::strategy::StrategyKind;
use sigscan::ports::data_port::{Interval, MarketDataPort};
use sigscan::ports::journal_port::TradeJournalPort;
use sigscan::ports::notify_port::NotifyPort;
use sigscan::ports::state_port::StateStorePort;
use std::cell::RefCell;
use std::collections::{HashMap, HashSet};

pub struct MockDataPort {
    pub data: HashMap<String, Vec<OhlcvBar>>,
    pub unavailable: HashSet<String>,
}

impl MockDataPort {
    pub fn new() -> Self {
        Self {
            data: HashMap::new(),
            unavailable: HashSet::new(),
        }
    }

    pub fn with_bars(mut self, instrument: &str, bars: Vec<OhlcvBar>) -> Self {
        self.data.insert(instrument.to_string(), bars);
        self
    }

    pub fn with_unavailable(mut self, instrument: &str) -> Self {
        self.unavailable.insert(instrument.to_string());
        self
    }
}

impl MarketDataPort for MockDataPort {
    fn fetch_series(
        &self,
        instrument: &str,
        _interval: Interval,
        lookback: usize,
    ) -> Result<Vec<OhlcvBar>, SigscanError> {
        if self.unavailable.contains(instrument) {
            return Err(SigscanError::DataUnavailable {
                symbol: instrument.to_string(),
            });
        }
        let bars = self.data.get(instrument).cloned().unwrap_or_default();
        let start = bars.len().saturating_sub(lookback);
        Ok(bars[start..].to_vec())
    }
}

#[derive(Default)]
pub struct MockStateStore {
    pub positions: RefCell<HashMap<StrategyKind, HashMap<String, Position>>>,
    pub counters: RefCell<HashMap<StrategyKind, DailyCounter>>,
    pub fail_saves: bool,
    pub fail_position_saves: bool,
}

impl MockStateStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_saves() -> Self {
        Self {
            fail_saves: true,
            ..Self::default()
        }
    }

    pub fn failing_position_saves() -> Self {
        Self {
            fail_position_saves: true,
            ..Self::default()
        }
    }

    pub fn seed_position(&self, position: Position) {
        self.positions
            .borrow_mut()
            .entry(position.kind)
            .or_default()
            .insert(position.symbol.clone(), position);
    }

    pub fn seed_counter(&self, kind: StrategyKind, counter: DailyCounter) {
        self.counters.borrow_mut().insert(kind, counter);
    }

    pub fn position_count(&self, kind: StrategyKind) -> usize {
        self.positions
            .borrow()
            .get(&kind)
            .map(|m| m.len())
            .unwrap_or(0)
    }
}

impl StateStorePort for MockStateStore {
    fn load_positions(
        &self,
        kind: StrategyKind,
    ) -> Result<HashMap<String, Position>, SigscanError> {
        Ok(self.positions.borrow().get(&kind).cloned().unwrap_or_default())
    }

    fn save_positions(
        &self,
        kind: StrategyKind,
        positions: &HashMap<String, Position>,
    ) -> Result<(), SigscanError> {
        if self.fail_saves || self.fail_position_saves {
            return Err(SigscanError::StatePersistence {
                document: kind.document_name().to_string(),
                reason: "simulated write failure".into(),
            });
        }
        self.positions.borrow_mut().insert(kind, positions.clone());
        Ok(())
    }

    fn load_counter(&self, kind: StrategyKind) -> Result<Option<DailyCounter>, SigscanError> {
        Ok(self.counters.borrow().get(&kind).cloned())
    }

    fn save_counter(&self, kind: StrategyKind, counter: &DailyCounter) -> Result<(), SigscanError> {
        if self.fail_saves {
            return Err(SigscanError::StatePersistence {
                document: kind.document_name().to_string(),
                reason: "simulated write failure".into(),
            });
        }
        self.counters.borrow_mut().insert(kind, counter.clone());
        Ok(())
    }
}

#[derive(Default)]
pub struct MockNotify {
    pub sent: RefCell<Vec<String>>,
    pub fail: bool,
}

impl MockNotify {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }
}

impl NotifyPort for MockNotify {
    fn send(&self, text: &str) -> Result<(), SigscanError> {
        if self.fail {
            return Err(SigscanError::Notification {
                reason: "simulated delivery failure".into(),
            });
        }
        self.sent.borrow_mut().push(text.to_string());
        Ok(())
    }
}

#[derive(Default)]
pub struct MockJournal {
    pub rows: RefCell<Vec<ClosedTrade>>,
    pub fail: bool,
}

impl MockJournal {
    pub fn new() -> Self {
        Self::default()
    }
}

impl TradeJournalPort for MockJournal {
    fn append(&self, trade: &ClosedTrade) -> Result<(), SigscanError> {
        if self.fail {
            return Err(SigscanError::Journal {
                reason: "simulated append failure".into(),
            });
        }
        self.rows.borrow_mut().push(trade.clone());
        Ok(())
    }
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn stamp(i: usize) -> NaiveDateTime {
    (date(2023, 1, 1) + chrono::Duration::days(i as i64))
        .and_hms_opt(0, 0, 0)
        .unwrap()
}

pub fn bars_from_closes(instrument: &str, closes: &[f64]) -> Vec<OhlcvBar> {
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| OhlcvBar {
            symbol: instrument.to_string(),
            timestamp: stamp(i),
            open: close - 0.5,
            high: close + 1.0,
            low: close - 1.0,
            close,
            volume: 1000,
        })
        .collect()
}

/// Drifting zig-zag: +0.3 on odd steps, -0.2 on even steps. Keeps the
/// oscillator near 60 (inside every entry band, clear of the extreme veto)
/// while the close stays above the long trend averages.
pub fn zigzag_closes(n: usize) -> Vec<f64> {
    let mut closes = Vec::with_capacity(n);
    let mut price = 100.0;
    closes.push(price);
    for i in 1..n {
        price += if i % 2 == 1 { 0.3 } else { -0.2 };
        closes.push(price);
    }
    closes
}

/// A candidate series that passes the weighted entry profiles: zig-zag trend
/// with a volume surge on the final bar.
pub fn accepted_candidate_bars(instrument: &str) -> Vec<OhlcvBar> {
    let mut bars = bars_from_closes(instrument, &zigzag_closes(220));
    bars.last_mut().unwrap().volume = 3000;
    bars
}

/// Straight gains only; the oscillator saturates at 100 and hits the veto.
pub fn overheated_bars(instrument: &str) -> Vec<OhlcvBar> {
    let closes: Vec<f64> = (0..220).map(|i| 100.0 + i as f64 * 0.5).collect();
    bars_from_closes(instrument, &closes)
}

//! One complete evaluation pass over injected ports.
//!
//! Tick order: scheduler gate, load-and-validate persisted state, manage
//! open positions, scan entries under the per-tick and daily caps, commit
//! each category document atomically, then flush journal rows and
//! notifications. A `StatePersistence` failure aborts the tick before any
//! sink flush; a data failure for one symbol never stalls the rest of the
//! batch.

use chrono::{DateTime, FixedOffset, NaiveDate};
use std::collections::hash_map::Entry;
use std::collections::{HashMap, HashSet};

use crate::domain::engine_config::EngineConfig;
use crate::domain::error::SigscanError;
use crate::domain::lifecycle::{self, TickFlags, TradeEvent, Verdict};
use crate::domain::messages;
use crate::domain::ohlcv::OhlcvBar;
use crate::domain::position::{ClosedTrade, DailyCounter, Position};
use crate::domain::scheduler::SessionWindows;
use crate::domain::scorer::{self, Evaluation};
use crate::domain::snapshot::IndicatorSnapshot;
use crate::domain::strategy::{StrategyKind, StrategyProfile};
use crate::ports::data_port::{Interval, MarketDataPort};
use crate::ports::journal_port::TradeJournalPort;
use crate::ports::notify_port::NotifyPort;
use crate::ports::state_port::StateStorePort;

pub struct Engine<'a> {
    data: &'a dyn MarketDataPort,
    store: &'a dyn StateStorePort,
    journal: &'a dyn TradeJournalPort,
    notify: &'a dyn NotifyPort,
    config: EngineConfig,
}

/// What one tick did; returned to the caller and useful in tests.
#[derive(Debug, Default)]
pub struct TickReport {
    /// False when the scheduler gated the whole pass (weekend, off-session).
    pub active: bool,
    pub entered: usize,
    pub exited: usize,
    /// Symbols skipped on DataUnavailable/InsufficientHistory.
    pub skipped: usize,
    /// Malformed persisted records dropped on load.
    pub dropped_records: usize,
    pub events: Vec<TradeEvent>,
}

type SeriesCache = HashMap<(String, Interval), Vec<OhlcvBar>>;

impl<'a> Engine<'a> {
    pub fn new(
        data: &'a dyn MarketDataPort,
        store: &'a dyn StateStorePort,
        journal: &'a dyn TradeJournalPort,
        notify: &'a dyn NotifyPort,
        config: EngineConfig,
    ) -> Self {
        Self {
            data,
            store,
            journal,
            notify,
            config,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Run one evaluation pass at the given exchange-local instant.
    pub fn run_tick(&self, now: DateTime<FixedOffset>) -> Result<TickReport, SigscanError> {
        let date = now.date_naive();
        let time = now.time();
        let mut report = TickReport::default();

        if !SessionWindows::is_trading_day(date) || !self.config.windows.in_session(time) {
            return Ok(report);
        }
        report.active = true;

        let mut cache = SeriesCache::new();
        let mut closed = Vec::new();

        for &kind in &self.config.enabled {
            self.run_category(kind, date, time, &mut cache, &mut closed, &mut report)?;
        }

        // Sinks flush only after every category document committed.
        self.flush_journal(&closed);
        self.flush_notifications(&report.events, now);

        Ok(report)
    }

    fn run_category(
        &self,
        kind: StrategyKind,
        date: NaiveDate,
        time: chrono::NaiveTime,
        cache: &mut SeriesCache,
        closed: &mut Vec<ClosedTrade>,
        report: &mut TickReport,
    ) -> Result<(), SigscanError> {
        let profile = self.config.profile(kind);
        let spans = profile.ema_spans();

        let mut positions = self.load_valid_positions(kind, report)?;
        let mut touched_this_tick: HashSet<String> = HashSet::new();

        // Manage open positions first.
        let symbols: Vec<String> = positions.keys().cloned().collect();
        for symbol in symbols {
            let Some(position) = positions.get_mut(&symbol) else {
                continue;
            };

            // BTST positions opened today rest until a later date.
            if kind == StrategyKind::Btst && position.entry_date == date {
                continue;
            }

            let snap = match self.snapshot_for(&position.instrument, kind, &spans, cache) {
                Ok(snap) => snap,
                Err(e) if e.is_skippable() => {
                    eprintln!("warning: skipping {symbol} ({e})");
                    report.skipped += 1;
                    continue;
                }
                Err(e) => return Err(e),
            };

            let flags = TickFlags {
                square_off_due: self.config.windows.square_off_due(time),
                btst_exit_due: SessionWindows::btst_exit_due(position.entry_date, date),
            };

            match lifecycle::manage(
                position,
                &snap,
                &profile,
                flags,
                &self.config.lifecycle,
                &mut report.events,
            ) {
                Verdict::Hold => {}
                Verdict::Exit(reason) => {
                    let trade = ClosedTrade::from_exit(position, snap.close, date, reason);
                    report.events.push(TradeEvent::Exited {
                        symbol: symbol.clone(),
                        kind,
                        price: snap.close,
                        reason,
                        pnl: trade.pnl(),
                        r_multiple: trade.r_multiple(),
                    });
                    closed.push(trade);
                    positions.remove(&symbol);
                    touched_this_tick.insert(symbol);
                    report.exited += 1;
                }
            }
        }

        // Then scan for new entries inside this kind's window.
        let mut counter = self.rolled_counter(kind, date)?;
        if self.config.windows.entries_allowed(kind, time) {
            self.scan_entries(
                kind,
                date,
                &profile,
                &spans,
                &mut positions,
                &touched_this_tick,
                counter.as_mut(),
                cache,
                report,
            )?;
        }

        // Commit: counter first. A partial failure then leaves the day
        // over-counted rather than under-counted, so a retried tick can
        // never exceed the daily cap.
        if let Some(counter) = counter {
            self.store.save_counter(kind, &counter)?;
        }
        self.store.save_positions(kind, &positions)?;
        Ok(())
    }

    #[allow(clippy::too_many_arguments)]
    fn scan_entries(
        &self,
        kind: StrategyKind,
        date: NaiveDate,
        profile: &StrategyProfile,
        spans: &[usize],
        positions: &mut HashMap<String, Position>,
        touched_this_tick: &HashSet<String>,
        mut counter: Option<&mut DailyCounter>,
        cache: &mut SeriesCache,
        report: &mut TickReport,
    ) -> Result<(), SigscanError> {
        let daily_cap = self.config.daily_cap(kind);
        let mut opened = 0usize;

        for item in self.config.watch_list_for(kind) {
            if opened >= self.config.per_tick_cap {
                break;
            }
            if let (Some(cap), Some(counter)) = (daily_cap, counter.as_deref()) {
                if counter.remaining(cap) == 0 {
                    break;
                }
            }
            if positions.contains_key(&item.name) || touched_this_tick.contains(&item.name) {
                continue;
            }

            let snap = match self.snapshot_for(&item.instrument, kind, spans, cache) {
                Ok(snap) => snap,
                Err(e) if e.is_skippable() => {
                    eprintln!("warning: skipping {} ({e})", item.name);
                    report.skipped += 1;
                    continue;
                }
                Err(e) => return Err(e),
            };

            let result = match scorer::evaluate(profile, &snap) {
                Evaluation::Accepted(result) => result,
                Evaluation::Rejected(_) => continue,
            };

            let position = match lifecycle::open_position(
                &item.name,
                &item.instrument,
                kind,
                &snap,
                &self.config.risk,
                date,
            ) {
                Ok(position) => position,
                Err(e) => {
                    // Degenerate placement (e.g. zero ATR); not a candidate.
                    eprintln!("warning: rejecting {} ({e})", item.name);
                    continue;
                }
            };

            report.events.push(TradeEvent::Entered {
                symbol: position.symbol.clone(),
                kind,
                entry: position.entry_price,
                stop: position.stop_loss,
                target_1: position.target_1,
                target_2: position.target_2,
                score: result.score,
                reasons: result.reasons,
            });
            positions.insert(position.symbol.clone(), position);
            opened += 1;
            report.entered += 1;
            if let Some(counter) = counter.as_deref_mut() {
                counter.increment();
            }
        }
        Ok(())
    }

    fn load_valid_positions(
        &self,
        kind: StrategyKind,
        report: &mut TickReport,
    ) -> Result<HashMap<String, Position>, SigscanError> {
        let raw = self.store.load_positions(kind)?;
        let mut positions = HashMap::new();
        for (symbol, position) in raw {
            if position.kind != kind {
                eprintln!("warning: dropping {symbol}: kind mismatch in {kind} document");
                report.dropped_records += 1;
                continue;
            }
            match position.validate() {
                Ok(()) => {
                    positions.insert(symbol, position);
                }
                Err(e) => {
                    eprintln!("warning: dropping malformed record ({e})");
                    report.dropped_records += 1;
                }
            }
        }
        Ok(positions)
    }

    /// Load, roll and return the daily counter for capacity-limited kinds.
    /// The roll is idempotent: same-date ticks leave the count untouched.
    fn rolled_counter(
        &self,
        kind: StrategyKind,
        date: NaiveDate,
    ) -> Result<Option<DailyCounter>, SigscanError> {
        if self.config.daily_cap(kind).is_none() {
            return Ok(None);
        }
        let mut counter = self
            .store
            .load_counter(kind)?
            .unwrap_or_else(|| DailyCounter::new(date));
        counter.roll(date);
        Ok(Some(counter))
    }

    fn series_request(&self, kind: StrategyKind) -> (Interval, usize) {
        match kind {
            StrategyKind::Intraday => (
                Interval::Minutes(self.config.intraday_interval_minutes),
                self.config.intraday_lookback,
            ),
            _ => (Interval::Daily, self.config.daily_lookback),
        }
    }

    fn snapshot_for(
        &self,
        instrument: &str,
        kind: StrategyKind,
        spans: &[usize],
        cache: &mut SeriesCache,
    ) -> Result<IndicatorSnapshot, SigscanError> {
        let (interval, lookback) = self.series_request(kind);
        let bars = match cache.entry((instrument.to_string(), interval)) {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => {
                let bars = self.data.fetch_series(instrument, interval, lookback)?;
                if bars.is_empty() {
                    return Err(SigscanError::DataUnavailable {
                        symbol: instrument.to_string(),
                    });
                }
                entry.insert(bars)
            }
        };
        IndicatorSnapshot::compute(bars, spans)
    }

    /// Trade-history failures are logged and swallowed; the position
    /// lifecycle is the authoritative side-effect.
    fn flush_journal(&self, closed: &[ClosedTrade]) {
        for trade in closed {
            if let Err(e) = self.journal.append(trade) {
                eprintln!("warning: trade journal write failed ({e})");
            }
        }
    }

    fn flush_notifications(&self, events: &[TradeEvent], now: DateTime<FixedOffset>) {
        let label = time_label(now);
        for event in events {
            let text = messages::render_event(event, &label);
            if let Err(e) = self.notify.send(&text) {
                eprintln!("warning: notification failed ({e})");
            }
        }
    }
}

/// "15 Jan 2024 | 10:30 AM IST", matching the alert wording.
pub fn time_label(now: DateTime<FixedOffset>) -> String {
    now.format("%d %b %Y | %I:%M %p IST").to_string()
}

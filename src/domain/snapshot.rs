//! Latest indicator values for one symbol.
//!
//! Built once per symbol per tick from a fresh price series, then consumed
//! by the entry scorer and the position lifecycle. Building fails with
//! `InsufficientHistory` when any required series is short; the engine
//! treats that as a per-symbol skip.

use std::collections::BTreeMap;

use crate::domain::error::SigscanError;
use crate::domain::indicator::{atr, ema, rsi, sma, vwap};
use crate::domain::indicator::macd::macd_default;
use crate::domain::ohlcv::OhlcvBar;

pub const OSCILLATOR_PERIOD: usize = 14;
pub const ATR_PERIOD: usize = 14;
pub const RANGE_LOOKBACK: usize = 10;

#[derive(Debug, Clone)]
pub struct IndicatorSnapshot {
    pub close: f64,
    pub high: f64,
    pub low: f64,
    pub volume: f64,
    pub range: f64,
    pub avg_range_10: f64,
    pub avg_volume_10: f64,
    pub avg_volume_20: f64,
    pub vwap: f64,
    pub oscillator: f64,
    pub trend_line: f64,
    pub trend_signal: f64,
    pub atr: f64,
    pub last_three_rising: bool,
    emas: BTreeMap<usize, f64>,
}

impl IndicatorSnapshot {
    /// Compute a snapshot from the supplied bars. `ema_spans` lists every
    /// span the caller's strategy profile will look up.
    pub fn compute(bars: &[OhlcvBar], ema_spans: &[usize]) -> Result<Self, SigscanError> {
        let last = bars.last().ok_or_else(|| SigscanError::DataUnavailable {
            symbol: String::new(),
        })?;

        let mut emas = BTreeMap::new();
        for &span in ema_spans {
            let series = ema(bars, span)?;
            emas.insert(span, *series.last().expect("non-empty by construction"));
        }

        let oscillator = *rsi(bars, OSCILLATOR_PERIOD)?.last().unwrap_or(&50.0);
        let trend = macd_default(bars)?;
        let atr_series = atr(bars, ATR_PERIOD)?;
        let vwap_series = vwap(bars)?;

        let ranges: Vec<f64> = bars.iter().map(|b| b.range()).collect();
        let avg_range_10 = *sma(&ranges, RANGE_LOOKBACK)?.last().unwrap_or(&0.0);

        let volumes: Vec<f64> = bars.iter().map(|b| b.volume as f64).collect();
        let avg_volume_10 = *sma(&volumes, 10)?.last().unwrap_or(&0.0);
        let avg_volume_20 = *sma(&volumes, 20)?.last().unwrap_or(&0.0);

        let n = bars.len();
        let last_three_rising = n >= 3
            && bars[n - 3].close < bars[n - 2].close
            && bars[n - 2].close < bars[n - 1].close;

        Ok(Self {
            close: last.close,
            high: last.high,
            low: last.low,
            volume: last.volume as f64,
            range: last.range(),
            avg_range_10,
            avg_volume_10,
            avg_volume_20,
            vwap: *vwap_series.last().unwrap_or(&last.close),
            oscillator,
            trend_line: *trend.line.last().unwrap_or(&0.0),
            trend_signal: *trend.signal.last().unwrap_or(&0.0),
            atr: *atr_series.last().unwrap_or(&0.0),
            last_three_rising,
            emas,
        })
    }

    /// Latest EMA for a span requested at compute time.
    pub fn ema(&self, span: usize) -> Option<f64> {
        self.emas.get(&span).copied()
    }

    /// True when the close sits in the top quartile of the day's range.
    pub fn close_in_top_quartile(&self) -> bool {
        let range = self.high - self.low;
        if range <= 0.0 {
            return false;
        }
        self.close >= self.low + 0.75 * range
    }
}

//! Trend-difference series (MACD-style).
//!
//! Line = EMA(fast) − EMA(slow); signal = EMA(signal_period) of the line.
//! Default parameters: fast=12, slow=26, signal=9.
//! Needs slow + signal_period − 1 bars for a settled signal value.

use crate::domain::error::SigscanError;
use crate::domain::ohlcv::OhlcvBar;

use super::ema::ema_values;
use super::require_bars;

pub const DEFAULT_FAST: usize = 12;
pub const DEFAULT_SLOW: usize = 26;
pub const DEFAULT_SIGNAL: usize = 9;

#[derive(Debug, Clone)]
pub struct MacdSeries {
    pub line: Vec<f64>,
    pub signal: Vec<f64>,
}

pub fn macd(
    bars: &[OhlcvBar],
    fast: usize,
    slow: usize,
    signal_period: usize,
) -> Result<MacdSeries, SigscanError> {
    let minimum = slow.max(fast).max(1) + signal_period.max(1) - 1;
    require_bars(bars, minimum)?;

    let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();
    let ema_fast = ema_values(&closes, fast);
    let ema_slow = ema_values(&closes, slow);

    let line: Vec<f64> = ema_fast
        .iter()
        .zip(&ema_slow)
        .map(|(f, s)| f - s)
        .collect();
    let signal = ema_values(&line, signal_period);

    Ok(MacdSeries { line, signal })
}

pub fn macd_default(bars: &[OhlcvBar]) -> Result<MacdSeries, SigscanError> {
    macd(bars, DEFAULT_FAST, DEFAULT_SLOW, DEFAULT_SIGNAL)
}

//! RSI-style oscillator.
//!
//! Per-bar delta = close[t] − close[t−1]; gain = max(delta, 0),
//! loss = max(−delta, 0). Average gain/loss is a simple moving average over
//! the period (not Wilder smoothing). RSI = 100 − 100/(1 + avg_gain/avg_loss).
//! Degenerate case: avg_loss == 0 defines RSI = 100 (all-gain regime), never
//! an error.
//!
//! Needs period + 1 bars (one extra for the first delta). Warmup entries use
//! the deltas available so far; index 0 is neutral 50.

use crate::domain::error::SigscanError;
use crate::domain::ohlcv::OhlcvBar;

use super::require_bars;

pub fn rsi(bars: &[OhlcvBar], period: usize) -> Result<Vec<f64>, SigscanError> {
    require_bars(bars, period.max(1) + 1)?;

    let mut gains = Vec::with_capacity(bars.len() - 1);
    let mut losses = Vec::with_capacity(bars.len() - 1);
    for i in 1..bars.len() {
        let delta = bars[i].close - bars[i - 1].close;
        gains.push(delta.max(0.0));
        losses.push((-delta).max(0.0));
    }

    let mut out = Vec::with_capacity(bars.len());
    out.push(50.0);

    for i in 0..gains.len() {
        let window = (i + 1).min(period);
        let start = i + 1 - window;
        let avg_gain: f64 = gains[start..=i].iter().sum::<f64>() / window as f64;
        let avg_loss: f64 = losses[start..=i].iter().sum::<f64>() / window as f64;

        let value = if avg_loss == 0.0 {
            100.0
        } else {
            100.0 - 100.0 / (1.0 + avg_gain / avg_loss)
        };
        out.push(value);
    }

    Ok(out)
}

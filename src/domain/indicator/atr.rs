//! Average true range.
//!
//! TR[t] = max(high−low, |high−prev_close|, |low−prev_close|); TR[0] has no
//! previous close and falls back to high−low. ATR is a simple moving average
//! of TR over the period.

use crate::domain::error::SigscanError;
use crate::domain::ohlcv::OhlcvBar;

use super::require_bars;
use super::sma::sma;

pub fn atr(bars: &[OhlcvBar], period: usize) -> Result<Vec<f64>, SigscanError> {
    require_bars(bars, period.max(1))?;

    let mut tr = Vec::with_capacity(bars.len());
    for (i, bar) in bars.iter().enumerate() {
        if i == 0 {
            tr.push(bar.high - bar.low);
        } else {
            tr.push(bar.true_range(bars[i - 1].close));
        }
    }

    sma(&tr, period).map_err(|_| SigscanError::InsufficientHistory {
        symbol: bars.first().map(|b| b.symbol.clone()).unwrap_or_default(),
        bars: bars.len(),
        minimum: period,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use chrono::NaiveDate;

    fn make_bar(day: u32, high: f64, low: f64, close: f64) -> OhlcvBar {
        OhlcvBar {
            symbol: "TEST".into(),
            timestamp: NaiveDate::from_ymd_opt(2024, 1, day)
                .unwrap()
                .and_hms_opt(15, 30, 0)
                .unwrap(),
            open: close,
            high,
            low,
            close,
            volume: 1000,
        }
    }

    #[test]
    fn atr_constant_range() {
        // Every bar: high-low = 4, no gaps → every TR = 4, every ATR = 4.
        let bars: Vec<OhlcvBar> = (1..=6)
            .map(|i| make_bar(i, 102.0, 98.0, 100.0))
            .collect();
        let out = atr(&bars, 3).unwrap();
        for v in out {
            assert_abs_diff_eq!(v, 4.0);
        }
    }

    #[test]
    fn atr_gap_dominates() {
        let bars = vec![
            make_bar(1, 102.0, 98.0, 100.0),
            // gap up: |high - prev_close| = 20 dominates high-low = 4
            make_bar(2, 120.0, 116.0, 118.0),
            make_bar(3, 120.0, 116.0, 118.0),
        ];
        let out = atr(&bars, 3).unwrap();
        // TRs: 4, 20, 4 → final ATR = 28/3
        assert_abs_diff_eq!(out[2], 28.0 / 3.0, epsilon = 1e-9);
    }

    #[test]
    fn atr_insufficient_history() {
        let bars = vec![make_bar(1, 102.0, 98.0, 100.0)];
        assert!(atr(&bars, 3).is_err());
    }

    #[test]
    fn atr_aligned_with_input() {
        let bars: Vec<OhlcvBar> = (1..=10)
            .map(|i| make_bar(i, 102.0, 98.0, 100.0))
            .collect();
        let out = atr(&bars, 5).unwrap();
        assert_eq!(out.len(), bars.len());
    }
}

//! Exponential moving average.
//!
//! k = 2/(n+1), seed with the first n-bar SMA, then
//! EMA[i] = C[i]*k + EMA[i-1]*(1-k).
//! Warmup: the first (n-1) entries hold the running partial mean.

use crate::domain::error::SigscanError;
use crate::domain::ohlcv::OhlcvBar;

use super::require_bars;

pub fn ema(bars: &[OhlcvBar], span: usize) -> Result<Vec<f64>, SigscanError> {
    require_bars(bars, span.max(1))?;
    let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();
    Ok(ema_values(&closes, span))
}

/// EMA over a raw value slice. The length check belongs to the caller.
pub(crate) fn ema_values(values: &[f64], span: usize) -> Vec<f64> {
    let span = span.max(1);
    let k = 2.0 / (span as f64 + 1.0);
    let mut out = Vec::with_capacity(values.len());
    let mut sum = 0.0;
    let mut prev = 0.0;

    for (i, &v) in values.iter().enumerate() {
        let current = if i < span {
            sum += v;
            sum / (i + 1) as f64
        } else {
            v * k + prev * (1.0 - k)
        };
        out.push(current);
        prev = current;
    }

    out
}

#[cfg(test)]
mod tests {
    use super::super::test_support::make_bars;
    use super::*;

    #[test]
    fn ema_seed_is_sma() {
        let bars = make_bars(&[10.0, 20.0, 30.0]);
        let out = ema(&bars, 3).unwrap();
        let expected_sma = (10.0 + 20.0 + 30.0) / 3.0;
        assert!((out[2] - expected_sma).abs() < f64::EPSILON);
    }

    #[test]
    fn ema_recursive_calculation() {
        let bars = make_bars(&[10.0, 20.0, 30.0, 40.0, 50.0]);
        let out = ema(&bars, 3).unwrap();

        let k = 2.0 / 4.0;
        let sma = (10.0 + 20.0 + 30.0) / 3.0;
        let ema_3 = 40.0 * k + sma * (1.0 - k);
        let ema_4 = 50.0 * k + ema_3 * (1.0 - k);

        assert!((out[2] - sma).abs() < f64::EPSILON);
        assert!((out[3] - ema_3).abs() < f64::EPSILON);
        assert!((out[4] - ema_4).abs() < f64::EPSILON);
    }

    #[test]
    fn ema_equal_prices() {
        let bars = make_bars(&[100.0, 100.0, 100.0, 100.0, 100.0]);
        let out = ema(&bars, 3).unwrap();
        for v in out {
            assert!((v - 100.0).abs() < f64::EPSILON);
        }
    }

    #[test]
    fn ema_period_1_tracks_closes() {
        let bars = make_bars(&[10.0, 20.0, 30.0]);
        let out = ema(&bars, 1).unwrap();
        assert!((out[0] - 10.0).abs() < f64::EPSILON);
        assert!((out[1] - 20.0).abs() < f64::EPSILON);
        assert!((out[2] - 30.0).abs() < f64::EPSILON);
    }

    #[test]
    fn ema_insufficient_history() {
        let bars = make_bars(&[10.0, 20.0]);
        assert!(ema(&bars, 3).is_err());
    }

    #[test]
    fn ema_warmup_is_partial_mean() {
        let bars = make_bars(&[10.0, 20.0, 30.0, 40.0]);
        let out = ema(&bars, 3).unwrap();
        assert!((out[0] - 10.0).abs() < f64::EPSILON);
        assert!((out[1] - 15.0).abs() < f64::EPSILON);
    }
}

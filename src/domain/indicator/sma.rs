//! Simple moving average over an arbitrary value slice.
//!
//! Warmup: entries before a full window hold the mean of the values seen so
//! far, keeping the output aligned with the input.

use crate::domain::error::SigscanError;

pub fn sma(values: &[f64], period: usize) -> Result<Vec<f64>, SigscanError> {
    if period == 0 || values.len() < period {
        return Err(SigscanError::InsufficientHistory {
            symbol: String::new(),
            bars: values.len(),
            minimum: period.max(1),
        });
    }

    let mut out = Vec::with_capacity(values.len());
    let mut window_sum = 0.0;

    for (i, &v) in values.iter().enumerate() {
        window_sum += v;
        if i >= period {
            window_sum -= values[i - period];
            out.push(window_sum / period as f64);
        } else {
            out.push(window_sum / (i + 1) as f64);
        }
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn sma_full_window() {
        let values = [1.0, 2.0, 3.0, 4.0, 5.0];
        let out = sma(&values, 3).unwrap();
        assert_eq!(out.len(), 5);
        // index 2 onward: full 3-value windows
        assert_abs_diff_eq!(out[2], 2.0);
        assert_abs_diff_eq!(out[3], 3.0);
        assert_abs_diff_eq!(out[4], 4.0);
    }

    #[test]
    fn sma_warmup_partial_means() {
        let values = [10.0, 20.0, 30.0];
        let out = sma(&values, 3).unwrap();
        assert_abs_diff_eq!(out[0], 10.0);
        assert_abs_diff_eq!(out[1], 15.0);
        assert_abs_diff_eq!(out[2], 20.0);
    }

    #[test]
    fn sma_insufficient_history() {
        let values = [1.0, 2.0];
        assert!(sma(&values, 3).is_err());
    }

    #[test]
    fn sma_zero_period() {
        let values = [1.0, 2.0];
        assert!(sma(&values, 0).is_err());
    }

    #[test]
    fn sma_period_1_is_identity() {
        let values = [5.0, 7.0, 9.0];
        let out = sma(&values, 1).unwrap();
        assert_eq!(out, vec![5.0, 7.0, 9.0]);
    }
}

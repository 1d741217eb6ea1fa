//! Volume-weighted average price.
//!
//! Cumulative (typical price × volume) ÷ cumulative volume from the start of
//! the supplied series. Session-scoped when fed session-only bars.

use crate::domain::error::SigscanError;
use crate::domain::ohlcv::OhlcvBar;

use super::require_bars;

pub fn vwap(bars: &[OhlcvBar]) -> Result<Vec<f64>, SigscanError> {
    require_bars(bars, 1)?;

    let mut out = Vec::with_capacity(bars.len());
    let mut cum_pv = 0.0;
    let mut cum_vol = 0.0;

    for bar in bars {
        cum_pv += bar.typical_price() * bar.volume as f64;
        cum_vol += bar.volume as f64;
        if cum_vol > 0.0 {
            out.push(cum_pv / cum_vol);
        } else {
            out.push(bar.typical_price());
        }
    }

    Ok(out)
}

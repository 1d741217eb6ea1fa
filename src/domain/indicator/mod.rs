//! Technical indicator implementations.
//!
//! Pure functions over OHLCV bars. Each returns a derived series aligned
//! 1:1 with the input bars, and fails with
//! [`SigscanError::InsufficientHistory`] when the input is shorter than the
//! indicator's period. Callers treat that as "skip this symbol", not as a
//! hard error.
//!
//! Warmup entries (before a full period is available) hold partial-window
//! values so the output vector stays aligned; only the tail of a series that
//! passed the length check is meaningful to consumers.

pub mod sma;
pub mod ema;
pub mod rsi;
pub mod macd;
pub mod atr;
pub mod vwap;

pub use atr::atr;
pub use ema::ema;
pub use macd::{macd, MacdSeries};
pub use rsi::rsi;
pub use sma::sma;
pub use vwap::vwap;

use crate::domain::error::SigscanError;
use crate::domain::ohlcv::OhlcvBar;

pub(crate) fn require_bars(
    bars: &[OhlcvBar],
    minimum: usize,
) -> Result<(), SigscanError> {
    if bars.len() < minimum {
        return Err(SigscanError::InsufficientHistory {
            symbol: bars.first().map(|b| b.symbol.clone()).unwrap_or_default(),
            bars: bars.len(),
            minimum,
        });
    }
    Ok(())
}

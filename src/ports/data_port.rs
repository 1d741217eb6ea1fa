//! Market-data access port trait.

use crate::domain::error::SigscanError;
use crate::domain::ohlcv::OhlcvBar;

/// Bar interval for a price-series request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Interval {
    Daily,
    Minutes(u32),
}

pub trait MarketDataPort {
    /// Fetch up to `lookback` most recent bars for an instrument, oldest
    /// first. An empty result maps to `DataUnavailable`; a short result is
    /// surfaced by the indicator layer as `InsufficientHistory`. Both are
    /// per-symbol skips, never batch aborts.
    fn fetch_series(
        &self,
        instrument: &str,
        interval: Interval,
        lookback: usize,
    ) -> Result<Vec<OhlcvBar>, SigscanError>;
}

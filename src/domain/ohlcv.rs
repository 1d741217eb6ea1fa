//! OHLCV bar representation.

use chrono::{NaiveDate, NaiveDateTime};

#[derive(Debug, Clone)]
pub struct OhlcvBar {
    pub symbol: String,
    pub timestamp: NaiveDateTime,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: i64,
}

impl OhlcvBar {
    pub fn date(&self) -> NaiveDate {
        self.timestamp.date()
    }

    /// (high + low + close) / 3
    pub fn typical_price(&self) -> f64 {
        (self.high + self.low + self.close) / 3.0
    }

    /// max(high - low, |high - prev_close|, |low - prev_close|)
    pub fn true_range(&self, prev_close: f64) -> f64 {
        let hl = self.high - self.low;
        let hc = (self.high - prev_close).abs();
        let lc = (self.low - prev_close).abs();
        hl.max(hc).max(lc)
    }

    /// high - low of this bar.
    pub fn range(&self) -> f64 {
        self.high - self.low
    }
}

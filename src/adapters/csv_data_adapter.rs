//! CSV file market-data adapter.
//!
//! One file per instrument: `{instrument}.csv` for daily bars and
//! `{instrument}_{n}m.csv` for n-minute bars, columns
//! `timestamp,open,high,low,close,volume`. Timestamps accept either
//! `%Y-%m-%d %H:%M:%S` or a bare `%Y-%m-%d`.

use crate::domain::error::SigscanError;
use crate::domain::ohlcv::OhlcvBar;
use crate::ports::data_port::{Interval, MarketDataPort};
use chrono::{NaiveDate, NaiveDateTime};
use std::path::PathBuf;

pub struct CsvDataAdapter {
    base_path: PathBuf,
}

impl CsvDataAdapter {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    fn csv_path(&self, instrument: &str, interval: Interval) -> PathBuf {
        let name = match interval {
            Interval::Daily => format!("{instrument}.csv"),
            Interval::Minutes(n) => format!("{instrument}_{n}m.csv"),
        };
        self.base_path.join(name)
    }
}

fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S")
        .ok()
        .or_else(|| {
            NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}

fn field<'r>(record: &'r csv::StringRecord, index: usize, name: &str) -> Result<&'r str, SigscanError> {
    record
        .get(index)
        .ok_or_else(|| std::io::Error::other(format!("missing {name} column")).into())
}

impl MarketDataPort for CsvDataAdapter {
    fn fetch_series(
        &self,
        instrument: &str,
        interval: Interval,
        lookback: usize,
    ) -> Result<Vec<OhlcvBar>, SigscanError> {
        let path = self.csv_path(instrument, interval);
        if !path.exists() {
            return Err(SigscanError::DataUnavailable {
                symbol: instrument.to_string(),
            });
        }

        let mut rdr = csv::Reader::from_path(&path)
            .map_err(|e| std::io::Error::other(format!("CSV open error: {e}")))?;
        let mut bars = Vec::new();

        for result in rdr.records() {
            let record =
                result.map_err(|e| std::io::Error::other(format!("CSV parse error: {e}")))?;

            let raw_ts = field(&record, 0, "timestamp")?;
            let timestamp = parse_timestamp(raw_ts).ok_or_else(|| {
                std::io::Error::other(format!("invalid timestamp '{raw_ts}' in {}", path.display()))
            })?;

            let numeric = |index: usize, name: &str| -> Result<f64, SigscanError> {
                field(&record, index, name)?.parse().map_err(|e| {
                    std::io::Error::other(format!("invalid {name} value: {e}")).into()
                })
            };

            let open = numeric(1, "open")?;
            let high = numeric(2, "high")?;
            let low = numeric(3, "low")?;
            let close = numeric(4, "close")?;
            let volume: i64 = field(&record, 5, "volume")?
                .parse()
                .map_err(|e| std::io::Error::other(format!("invalid volume value: {e}")))?;

            bars.push(OhlcvBar {
                symbol: instrument.to_string(),
                timestamp,
                open,
                high,
                low,
                close,
                volume,
            });
        }

        bars.sort_by_key(|b| b.timestamp);
        if bars.len() > lookback {
            bars.drain(..bars.len() - lookback);
        }
        Ok(bars)
    }
}

//! CSV trade-journal adapter.
//!
//! Appends one row per closed trade to a single log file, writing the header
//! only when the file is new or empty. Rows are never rewritten.

use crate::domain::error::SigscanError;
use crate::domain::position::ClosedTrade;
use crate::ports::journal_port::TradeJournalPort;
use std::fs::OpenOptions;
use std::path::PathBuf;

const HEADER: [&str; 9] = [
    "date",
    "symbol",
    "side",
    "entry",
    "exit",
    "risk",
    "pnl",
    "r_multiple",
    "exit_reason",
];

pub struct CsvJournalAdapter {
    path: PathBuf,
}

impl CsvJournalAdapter {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    fn needs_header(&self) -> bool {
        match std::fs::metadata(&self.path) {
            Ok(meta) => meta.len() == 0,
            Err(_) => true,
        }
    }
}

fn journal_error(cause: impl std::fmt::Display) -> SigscanError {
    SigscanError::Journal {
        reason: cause.to_string(),
    }
}

impl TradeJournalPort for CsvJournalAdapter {
    fn append(&self, trade: &ClosedTrade) -> Result<(), SigscanError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(journal_error)?;
            }
        }
        let write_header = self.needs_header();

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(journal_error)?;
        let mut wtr = csv::WriterBuilder::new().has_headers(false).from_writer(file);

        if write_header {
            wtr.write_record(HEADER).map_err(journal_error)?;
        }
        wtr.write_record(&[
            trade.date.format("%Y-%m-%d").to_string(),
            trade.symbol.clone(),
            trade.side.clone(),
            format!("{:.2}", trade.entry),
            format!("{:.2}", trade.exit),
            format!("{:.2}", trade.risk),
            format!("{:.2}", trade.pnl()),
            format!("{:.2}", trade.r_multiple()),
            trade.reason.as_code().to_string(),
        ])
        .map_err(journal_error)?;
        wtr.flush().map_err(journal_error)?;
        Ok(())
    }
}

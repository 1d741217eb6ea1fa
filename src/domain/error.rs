//! Domain error types.
//!
//! `DataUnavailable` and `InsufficientHistory` are non-fatal and per-symbol:
//! the engine skips that symbol for the tick and carries on.
//! `StatePersistence` is fatal for the tick — no position mutation counts
//! unless the store confirmed a durable write.

/// Top-level error type for sigscan.
#[derive(Debug, thiserror::Error)]
pub enum SigscanError {
    #[error("no data for {symbol}")]
    DataUnavailable { symbol: String },

    #[error("insufficient history for {symbol}: have {bars} bars, need {minimum}")]
    InsufficientHistory {
        symbol: String,
        bars: usize,
        minimum: usize,
    },

    #[error("state persistence failure for {document}: {reason}")]
    StatePersistence { document: String, reason: String },

    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("missing config key [{section}] {key}")]
    ConfigMissing { section: String, key: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error("invalid position for {symbol}: {reason}")]
    InvalidPosition { symbol: String, reason: String },

    #[error("notification failure: {reason}")]
    Notification { reason: String },

    #[error("trade journal failure: {reason}")]
    Journal { reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl SigscanError {
    /// Non-fatal errors cause a per-symbol skip rather than aborting the tick.
    pub fn is_skippable(&self) -> bool {
        matches!(
            self,
            SigscanError::DataUnavailable { .. } | SigscanError::InsufficientHistory { .. }
        )
    }
}

impl From<&SigscanError> for std::process::ExitCode {
    fn from(err: &SigscanError) -> Self {
        let code: u8 = match err {
            SigscanError::Io(_) => 1,
            SigscanError::ConfigParse { .. }
            | SigscanError::ConfigMissing { .. }
            | SigscanError::ConfigInvalid { .. } => 2,
            SigscanError::StatePersistence { .. } => 3,
            SigscanError::InvalidPosition { .. } => 4,
            SigscanError::DataUnavailable { .. } | SigscanError::InsufficientHistory { .. } => 5,
            SigscanError::Notification { .. } | SigscanError::Journal { .. } => 6,
        };
        std::process::ExitCode::from(code)
    }
}

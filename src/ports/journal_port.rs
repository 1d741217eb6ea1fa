//! Trade-history sink port trait.

use crate::domain::error::SigscanError;
use crate::domain::position::ClosedTrade;

/// Append-only: one row per closed position, written once, never rewritten.
pub trait TradeJournalPort {
    fn append(&self, trade: &ClosedTrade) -> Result<(), SigscanError>;
}

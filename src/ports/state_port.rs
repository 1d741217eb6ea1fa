//! Persisted-state port trait.
//!
//! One structured document per strategy category mapping symbol → Position,
//! plus one {date, count} document per capacity-limited category. Saves must
//! be atomic (write-then-replace): a failed save leaves the prior good
//! document authoritative.

use std::collections::HashMap;

use crate::domain::error::SigscanError;
use crate::domain::position::{DailyCounter, Position};
use crate::domain::strategy::StrategyKind;

pub trait StateStorePort {
    /// Load the full position set for a category; missing document = empty.
    fn load_positions(
        &self,
        kind: StrategyKind,
    ) -> Result<HashMap<String, Position>, SigscanError>;

    /// Atomically replace the full position set for a category.
    fn save_positions(
        &self,
        kind: StrategyKind,
        positions: &HashMap<String, Position>,
    ) -> Result<(), SigscanError>;

    /// Load the daily counter for a category, if one has been written.
    fn load_counter(&self, kind: StrategyKind) -> Result<Option<DailyCounter>, SigscanError>;

    fn save_counter(
        &self,
        kind: StrategyKind,
        counter: &DailyCounter,
    ) -> Result<(), SigscanError>;
}

//! JSON file state-store adapter.
//!
//! One document per strategy category under a state directory, e.g.
//! `swing_positions.json`, plus `intraday_counter.json` / `btst_counter.json`
//! for the capped categories. Writes go to a `.tmp` sibling first and are
//! renamed into place, so a crash mid-write never leaves a torn document.

use crate::domain::error::SigscanError;
use crate::domain::position::{DailyCounter, Position};
use crate::domain::strategy::StrategyKind;
use crate::ports::state_port::StateStorePort;
use serde::{de::DeserializeOwned, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

pub struct JsonStateAdapter {
    state_dir: PathBuf,
}

impl JsonStateAdapter {
    pub fn new(state_dir: PathBuf) -> Self {
        Self { state_dir }
    }

    fn positions_path(&self, kind: StrategyKind) -> PathBuf {
        self.state_dir.join(format!("{}.json", kind.document_name()))
    }

    fn counter_path(&self, kind: StrategyKind) -> PathBuf {
        let name = match kind {
            StrategyKind::Intraday => "intraday_counter.json",
            StrategyKind::Btst => "btst_counter.json",
            StrategyKind::Swing => "swing_counter.json",
            StrategyKind::Gold => "gold_counter.json",
        };
        self.state_dir.join(name)
    }

    fn load_document<T: DeserializeOwned>(path: &Path) -> Result<Option<T>, SigscanError> {
        if !path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(path).map_err(|e| persistence_error(path, e))?;
        let value = serde_json::from_str(&content).map_err(|e| persistence_error(path, e))?;
        Ok(Some(value))
    }

    fn save_document<T: Serialize>(&self, path: &Path, value: &T) -> Result<(), SigscanError> {
        fs::create_dir_all(&self.state_dir).map_err(|e| persistence_error(path, e))?;
        let json = serde_json::to_string_pretty(value).map_err(|e| persistence_error(path, e))?;

        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, json).map_err(|e| persistence_error(path, e))?;
        fs::rename(&tmp, path).map_err(|e| persistence_error(path, e))?;
        Ok(())
    }
}

fn persistence_error(path: &Path, cause: impl std::fmt::Display) -> SigscanError {
    SigscanError::StatePersistence {
        document: path.display().to_string(),
        reason: cause.to_string(),
    }
}

impl StateStorePort for JsonStateAdapter {
    fn load_positions(
        &self,
        kind: StrategyKind,
    ) -> Result<HashMap<String, Position>, SigscanError> {
        Ok(Self::load_document(&self.positions_path(kind))?.unwrap_or_default())
    }

    fn save_positions(
        &self,
        kind: StrategyKind,
        positions: &HashMap<String, Position>,
    ) -> Result<(), SigscanError> {
        self.save_document(&self.positions_path(kind), positions)
    }

    fn load_counter(&self, kind: StrategyKind) -> Result<Option<DailyCounter>, SigscanError> {
        Self::load_document(&self.counter_path(kind))
    }

    fn save_counter(&self, kind: StrategyKind, counter: &DailyCounter) -> Result<(), SigscanError> {
        self.save_document(&self.counter_path(kind), counter)
    }
}

//! Open-position records, daily entry counters and closed-trade rows.
//!
//! Positions are keyed by symbol: at most one open position per symbol per
//! strategy category. Records round-trip through the JSON state store, so
//! everything here derives serde and is validated on load rather than
//! trusted.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::error::SigscanError;
use crate::domain::strategy::StrategyKind;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub symbol: String,
    /// Provider-side instrument identifier (e.g. "RELIANCE.NS").
    pub instrument: String,
    pub kind: StrategyKind,
    pub entry_price: f64,
    pub stop_loss: f64,
    pub target_1: f64,
    /// Second target; swing-class positions only.
    pub target_2: Option<f64>,
    /// entry − initial stop; fixed at creation, always > 0.
    pub risk: f64,
    pub trailing_active: bool,
    pub t1_hit: bool,
    pub dynamic_extended: bool,
    pub highest_seen: f64,
    pub entry_date: NaiveDate,
}

impl Position {
    /// Create a new position. The only creation path is the scorer's
    /// acceptance; rejects non-positive risk and T2 ≤ T1.
    pub fn open(
        symbol: &str,
        instrument: &str,
        kind: StrategyKind,
        entry_price: f64,
        stop_loss: f64,
        target_1: f64,
        target_2: Option<f64>,
        entry_date: NaiveDate,
    ) -> Result<Self, SigscanError> {
        let position = Self {
            symbol: symbol.to_string(),
            instrument: instrument.to_string(),
            kind,
            entry_price,
            stop_loss,
            target_1,
            target_2,
            risk: entry_price - stop_loss,
            trailing_active: false,
            t1_hit: false,
            dynamic_extended: false,
            highest_seen: entry_price,
            entry_date,
        };
        position.validate()?;
        Ok(position)
    }

    /// Invariants every record must satisfy, at creation and on load.
    pub fn validate(&self) -> Result<(), SigscanError> {
        if self.risk <= 0.0 {
            return Err(SigscanError::InvalidPosition {
                symbol: self.symbol.clone(),
                reason: format!("non-positive risk {:.2}", self.risk),
            });
        }
        if let Some(t2) = self.target_2 {
            if t2 <= self.target_1 {
                return Err(SigscanError::InvalidPosition {
                    symbol: self.symbol.clone(),
                    reason: format!("target_2 {:.2} not above target_1 {:.2}", t2, self.target_1),
                });
            }
        }
        if self.highest_seen < self.entry_price {
            return Err(SigscanError::InvalidPosition {
                symbol: self.symbol.clone(),
                reason: "highest_seen below entry price".into(),
            });
        }
        Ok(())
    }

    pub fn final_target(&self) -> f64 {
        self.target_2.unwrap_or(self.target_1)
    }

    pub fn unrealized_gain(&self, price: f64) -> f64 {
        price - self.entry_price
    }

    pub fn stop_breached(&self, price: f64) -> bool {
        price <= self.stop_loss
    }

    /// Ratchet the stop upward; never lowers it. Returns (from, to) when the
    /// stop actually moved.
    pub fn raise_stop(&mut self, candidate: f64) -> Option<(f64, f64)> {
        if candidate > self.stop_loss {
            let from = self.stop_loss;
            self.stop_loss = candidate;
            Some((from, candidate))
        } else {
            None
        }
    }

    /// Track the highest price observed while the position is open.
    pub fn observe_price(&mut self, price: f64) {
        if price > self.highest_seen {
            self.highest_seen = price;
        }
    }
}

/// Why a position was closed; the code lands in the trade journal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExitReason {
    StopLoss,
    Target,
    MomentumWeak,
    SquareOff,
    BtstTimeExit,
}

impl ExitReason {
    pub fn as_code(&self) -> &'static str {
        match self {
            ExitReason::StopLoss => "STOP_LOSS",
            ExitReason::Target => "TARGET",
            ExitReason::MomentumWeak => "MOMENTUM_WEAK",
            ExitReason::SquareOff => "SQUARE_OFF",
            ExitReason::BtstTimeExit => "BTST_TIME_EXIT",
        }
    }
}

impl fmt::Display for ExitReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_code())
    }
}

/// One append-only trade-history row.
#[derive(Debug, Clone, PartialEq)]
pub struct ClosedTrade {
    pub date: NaiveDate,
    pub symbol: String,
    pub side: String,
    pub entry: f64,
    pub exit: f64,
    pub risk: f64,
    pub reason: ExitReason,
}

impl ClosedTrade {
    pub fn from_exit(position: &Position, exit: f64, date: NaiveDate, reason: ExitReason) -> Self {
        Self {
            date,
            symbol: position.symbol.clone(),
            side: "BUY".to_string(),
            entry: position.entry_price,
            exit,
            risk: position.risk,
            reason,
        }
    }

    pub fn pnl(&self) -> f64 {
        self.exit - self.entry
    }

    /// Realized P&L as a multiple of initial risk.
    pub fn r_multiple(&self) -> f64 {
        if self.risk == 0.0 {
            0.0
        } else {
            self.pnl() / self.risk
        }
    }
}

/// Per-category entry counter with an exchange-local calendar date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyCounter {
    pub date: NaiveDate,
    pub count: u32,
}

impl DailyCounter {
    pub fn new(date: NaiveDate) -> Self {
        Self { date, count: 0 }
    }

    /// Reset to {today, 0} when the stored date differs. Idempotent: calling
    /// again on the same date is a no-op. Returns true when a reset happened.
    pub fn roll(&mut self, today: NaiveDate) -> bool {
        if self.date != today {
            self.date = today;
            self.count = 0;
            true
        } else {
            false
        }
    }

    pub fn increment(&mut self) {
        self.count += 1;
    }

    pub fn remaining(&self, cap: u32) -> u32 {
        cap.saturating_sub(self.count)
    }
}

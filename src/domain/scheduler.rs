//! Time-of-day and day-of-week gating.
//!
//! The exchange clock is IST (UTC+5:30). Trading is evaluated on weekdays
//! only, inside a global session window. Each strategy kind has its own
//! entry window; session-close values differ across historical variants of
//! this system, so every boundary here is configurable with one canonical
//! default.

use chrono::{DateTime, Datelike, FixedOffset, NaiveDate, NaiveTime, Utc, Weekday};

use crate::domain::strategy::StrategyKind;

/// IST: UTC+5:30.
pub fn exchange_offset() -> FixedOffset {
    FixedOffset::east_opt(5 * 3600 + 30 * 60).expect("valid fixed offset")
}

/// Current wall-clock time on the exchange.
pub fn exchange_now() -> DateTime<FixedOffset> {
    Utc::now().with_timezone(&exchange_offset())
}

#[derive(Debug, Clone, PartialEq)]
pub struct SessionWindows {
    pub open: NaiveTime,
    pub close: NaiveTime,
    pub intraday_entry_cutoff: NaiveTime,
    pub intraday_square_off: NaiveTime,
    pub btst_entry_open: NaiveTime,
    pub btst_entry_close: NaiveTime,
}

fn hm(h: u32, m: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(h, m, 0).expect("valid time")
}

impl Default for SessionWindows {
    fn default() -> Self {
        Self {
            open: hm(9, 15),
            close: hm(15, 30),
            intraday_entry_cutoff: hm(14, 30),
            intraday_square_off: hm(15, 15),
            btst_entry_open: hm(15, 0),
            btst_entry_close: hm(15, 25),
        }
    }
}

impl SessionWindows {
    pub fn is_trading_day(date: NaiveDate) -> bool {
        !matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
    }

    pub fn in_session(&self, time: NaiveTime) -> bool {
        time >= self.open && time <= self.close
    }

    /// May this strategy originate new entries at this time-of-day?
    /// Callers have already gated on trading day and session.
    pub fn entries_allowed(&self, kind: StrategyKind, time: NaiveTime) -> bool {
        match kind {
            StrategyKind::Intraday => time >= self.open && time < self.intraday_entry_cutoff,
            StrategyKind::Btst => time >= self.btst_entry_open && time <= self.btst_entry_close,
            StrategyKind::Swing | StrategyKind::Gold => self.in_session(time),
        }
    }

    /// Intraday positions still open at or past this time must square off.
    pub fn square_off_due(&self, time: NaiveTime) -> bool {
        time >= self.intraday_square_off
    }

    /// A BTST position opened on date D closes on the first evaluation
    /// whose date differs from D.
    pub fn btst_exit_due(entry_date: NaiveDate, today: NaiveDate) -> bool {
        today != entry_date
    }

    /// Window boundaries must be ordered inside the session.
    pub fn validate(&self) -> Result<(), String> {
        if self.open >= self.close {
            return Err("session open must precede close".into());
        }
        if self.intraday_entry_cutoff > self.intraday_square_off {
            return Err("intraday entry cutoff must not pass square-off".into());
        }
        if self.intraday_square_off > self.close {
            return Err("square-off must not pass session close".into());
        }
        if self.btst_entry_open >= self.btst_entry_close {
            return Err("BTST window open must precede its close".into());
        }
        Ok(())
    }
}

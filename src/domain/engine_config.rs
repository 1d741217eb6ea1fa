//! Engine configuration, assembled and validated from a [`ConfigPort`].
//!
//! Everything tunable lives here: watch-list, session windows, caps,
//! stop/target multipliers and per-kind strategy profiles. The engine takes
//! this struct at construction; no module-level state.

use chrono::NaiveTime;
use std::collections::HashMap;

use crate::domain::error::SigscanError;
use crate::domain::lifecycle::{LifecycleParams, RiskParams};
use crate::domain::scheduler::SessionWindows;
use crate::domain::strategy::{StrategyKind, StrategyProfile};
use crate::ports::config_port::ConfigPort;

#[derive(Debug, Clone, PartialEq)]
pub struct WatchItem {
    /// Display name used in messages and as the position key.
    pub name: String,
    /// Provider-side instrument identifier.
    pub instrument: String,
}

#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub watch_list: Vec<WatchItem>,
    /// Separate universe for the GOLD strategy (ETF instruments); may be
    /// empty, in which case GOLD originates nothing.
    pub gold_watch_list: Vec<WatchItem>,
    pub windows: SessionWindows,
    pub enabled: Vec<StrategyKind>,
    pub profiles: HashMap<StrategyKind, StrategyProfile>,
    /// New positions per strategy category per evaluation pass.
    pub per_tick_cap: usize,
    pub intraday_daily_cap: u32,
    pub btst_daily_cap: u32,
    pub risk: RiskParams,
    pub lifecycle: LifecycleParams,
    pub intraday_interval_minutes: u32,
    pub intraday_lookback: usize,
    pub daily_lookback: usize,
}

impl EngineConfig {
    pub fn from_config(config: &dyn ConfigPort) -> Result<Self, SigscanError> {
        let watch_list = parse_watch_list(config)?;
        let gold_watch_list = parse_gold_watch_list(config);
        let windows = parse_windows(config)?;
        let enabled = parse_enabled(config)?;
        let profiles = parse_profiles(config)?;

        let per_tick_cap = parse_positive_int(config, "engine", "per_tick_cap", 3)? as usize;
        let intraday_daily_cap =
            parse_positive_int(config, "engine", "intraday_daily_cap", 3)? as u32;
        let btst_daily_cap = parse_positive_int(config, "engine", "btst_daily_cap", 4)? as u32;

        let defaults = RiskParams::default();
        let risk = RiskParams {
            stop_atr_mult: parse_positive_double(
                config,
                "engine",
                "stop_atr_mult",
                defaults.stop_atr_mult,
            )?,
            t1_risk_mult: parse_positive_double(
                config,
                "engine",
                "t1_risk_mult",
                defaults.t1_risk_mult,
            )?,
            t2_risk_mult: parse_positive_double(
                config,
                "engine",
                "t2_risk_mult",
                defaults.t2_risk_mult,
            )?,
        };
        if risk.t2_risk_mult <= risk.t1_risk_mult {
            return Err(SigscanError::ConfigInvalid {
                section: "engine".into(),
                key: "t2_risk_mult".into(),
                reason: "t2_risk_mult must exceed t1_risk_mult".into(),
            });
        }

        let lifecycle_defaults = LifecycleParams::default();
        let lifecycle = LifecycleParams {
            trail_atr_mult: parse_positive_double(
                config,
                "engine",
                "trail_atr_mult",
                lifecycle_defaults.trail_atr_mult,
            )?,
            ..lifecycle_defaults
        };

        let intraday_interval_minutes =
            parse_positive_int(config, "data", "intraday_interval_minutes", 5)? as u32;
        let intraday_lookback =
            parse_positive_int(config, "data", "intraday_lookback", 100)? as usize;
        let daily_lookback = parse_positive_int(config, "data", "daily_lookback", 250)? as usize;

        Ok(Self {
            watch_list,
            gold_watch_list,
            windows,
            enabled,
            profiles,
            per_tick_cap,
            intraday_daily_cap,
            btst_daily_cap,
            risk,
            lifecycle,
            intraday_interval_minutes,
            intraday_lookback,
            daily_lookback,
        })
    }

    pub fn watch_list_for(&self, kind: StrategyKind) -> &[WatchItem] {
        match kind {
            StrategyKind::Gold => &self.gold_watch_list,
            _ => &self.watch_list,
        }
    }

    pub fn daily_cap(&self, kind: StrategyKind) -> Option<u32> {
        match kind {
            StrategyKind::Intraday => Some(self.intraday_daily_cap),
            StrategyKind::Btst => Some(self.btst_daily_cap),
            StrategyKind::Swing | StrategyKind::Gold => None,
        }
    }

    pub fn profile(&self, kind: StrategyKind) -> StrategyProfile {
        self.profiles
            .get(&kind)
            .cloned()
            .unwrap_or_else(|| StrategyProfile::default_for(kind))
    }
}

fn parse_watch_list(config: &dyn ConfigPort) -> Result<Vec<WatchItem>, SigscanError> {
    let mut items: Vec<WatchItem> = config
        .get_section("watchlist")
        .into_iter()
        .map(|(name, instrument)| WatchItem {
            name: name.to_uppercase(),
            instrument,
        })
        .collect();
    items.sort_by(|a, b| a.name.cmp(&b.name));

    if items.is_empty() {
        return Err(SigscanError::ConfigMissing {
            section: "watchlist".into(),
            key: "<any symbol>".into(),
        });
    }
    Ok(items)
}

fn parse_gold_watch_list(config: &dyn ConfigPort) -> Vec<WatchItem> {
    let mut items: Vec<WatchItem> = config
        .get_section("gold_watchlist")
        .into_iter()
        .map(|(name, instrument)| WatchItem {
            name: name.to_uppercase(),
            instrument,
        })
        .collect();
    items.sort_by(|a, b| a.name.cmp(&b.name));
    items
}

fn parse_windows(config: &dyn ConfigPort) -> Result<SessionWindows, SigscanError> {
    let defaults = SessionWindows::default();
    let windows = SessionWindows {
        open: parse_time(config, "session", "open", defaults.open)?,
        close: parse_time(config, "session", "close", defaults.close)?,
        intraday_entry_cutoff: parse_time(
            config,
            "session",
            "intraday_entry_cutoff",
            defaults.intraday_entry_cutoff,
        )?,
        intraday_square_off: parse_time(
            config,
            "session",
            "intraday_square_off",
            defaults.intraday_square_off,
        )?,
        btst_entry_open: parse_time(config, "session", "btst_entry_open", defaults.btst_entry_open)?,
        btst_entry_close: parse_time(
            config,
            "session",
            "btst_entry_close",
            defaults.btst_entry_close,
        )?,
    };
    windows.validate().map_err(|reason| SigscanError::ConfigInvalid {
        section: "session".into(),
        key: "windows".into(),
        reason,
    })?;
    Ok(windows)
}

fn parse_enabled(config: &dyn ConfigPort) -> Result<Vec<StrategyKind>, SigscanError> {
    let raw = match config.get_string("engine", "enabled") {
        Some(v) => v,
        None => return Ok(StrategyKind::ALL.to_vec()),
    };

    let mut kinds = Vec::new();
    for token in raw.split(',').map(|t| t.trim()).filter(|t| !t.is_empty()) {
        let kind = match token.to_uppercase().as_str() {
            "INTRADAY" => StrategyKind::Intraday,
            "BTST" => StrategyKind::Btst,
            "SWING" => StrategyKind::Swing,
            "GOLD" => StrategyKind::Gold,
            other => {
                return Err(SigscanError::ConfigInvalid {
                    section: "engine".into(),
                    key: "enabled".into(),
                    reason: format!("unknown strategy kind '{other}'"),
                })
            }
        };
        if !kinds.contains(&kind) {
            kinds.push(kind);
        }
    }

    if kinds.is_empty() {
        return Err(SigscanError::ConfigInvalid {
            section: "engine".into(),
            key: "enabled".into(),
            reason: "no strategy kinds enabled".into(),
        });
    }
    Ok(kinds)
}

fn parse_profiles(
    config: &dyn ConfigPort,
) -> Result<HashMap<StrategyKind, StrategyProfile>, SigscanError> {
    let mut profiles = HashMap::new();
    for (kind, key) in [
        (StrategyKind::Intraday, "intraday_profile"),
        (StrategyKind::Btst, "btst_profile"),
        (StrategyKind::Swing, "swing_profile"),
        (StrategyKind::Gold, "gold_profile"),
    ] {
        let profile = match config.get_string("strategy", key) {
            Some(name) => {
                StrategyProfile::by_name(&name).ok_or_else(|| SigscanError::ConfigInvalid {
                    section: "strategy".into(),
                    key: key.into(),
                    reason: format!("unknown profile '{name}'"),
                })?
            }
            None => StrategyProfile::default_for(kind),
        };
        profiles.insert(kind, profile);
    }
    Ok(profiles)
}

fn parse_time(
    config: &dyn ConfigPort,
    section: &str,
    key: &str,
    default: NaiveTime,
) -> Result<NaiveTime, SigscanError> {
    match config.get_string(section, key) {
        None => Ok(default),
        Some(raw) => NaiveTime::parse_from_str(raw.trim(), "%H:%M").map_err(|e| {
            SigscanError::ConfigInvalid {
                section: section.into(),
                key: key.into(),
                reason: format!("expected HH:MM, got '{raw}': {e}"),
            }
        }),
    }
}

fn parse_positive_int(
    config: &dyn ConfigPort,
    section: &str,
    key: &str,
    default: i64,
) -> Result<i64, SigscanError> {
    let value = config.get_int(section, key, default);
    if value <= 0 {
        return Err(SigscanError::ConfigInvalid {
            section: section.into(),
            key: key.into(),
            reason: format!("{key} must be positive, got {value}"),
        });
    }
    Ok(value)
}

fn parse_positive_double(
    config: &dyn ConfigPort,
    section: &str,
    key: &str,
    default: f64,
) -> Result<f64, SigscanError> {
    let value = config.get_double(section, key, default);
    if value <= 0.0 {
        return Err(SigscanError::ConfigInvalid {
            section: section.into(),
            key: key.into(),
            reason: format!("{key} must be positive, got {value}"),
        });
    }
    Ok(value)
}

//! Position state machine.
//!
//! Per tick, per open position: exit conditions are checked in priority
//! order (stop-loss breach, final target, momentum weakness, intraday
//! square-off, BTST next-session exit — first match wins), then the staged
//! ratchets advance. The stop only ever moves up once trailing is active.
//!
//! Swing-class staging:
//! OPEN → (gain ≥ risk) → trailing active → (price ≥ T1) → T1 locked →
//! (3 rising closes + trend/oscillator/volume confirm) → extended, once →
//! (price ≥ revised T2) → closed.
//!
//! This module never formats messages; it emits [`TradeEvent`] values and
//! leaves wording to `messages`.

use crate::domain::position::{ExitReason, Position};
use crate::domain::snapshot::IndicatorSnapshot;
use crate::domain::strategy::{StrategyKind, StrategyProfile};

/// Stop/target placement at entry.
#[derive(Debug, Clone, Copy)]
pub struct RiskParams {
    /// Initial stop distance in ATRs below entry.
    pub stop_atr_mult: f64,
    /// First target distance in risk multiples above entry.
    pub t1_risk_mult: f64,
    /// Second target distance in risk multiples (swing-class only).
    pub t2_risk_mult: f64,
}

impl Default for RiskParams {
    fn default() -> Self {
        Self {
            stop_atr_mult: 1.5,
            t1_risk_mult: 1.8,
            t2_risk_mult: 3.0,
        }
    }
}

/// Ratchet and exit tuning.
#[derive(Debug, Clone, Copy)]
pub struct LifecycleParams {
    /// Trailing distance in ATRs below the highest price seen.
    pub trail_atr_mult: f64,
    /// Profit-lock stop as a multiple of entry once T1 is hit.
    pub t1_lock_mult: f64,
    /// Revised T2 as a multiple of the old T2 on dynamic extension.
    pub extension_target_mult: f64,
    /// Extension stop as a multiple of the new T1.
    pub extension_stop_mult: f64,
    /// Oscillator floor for the momentum-weakness exit.
    pub weak_oscillator: f64,
}

impl Default for LifecycleParams {
    fn default() -> Self {
        Self {
            trail_atr_mult: 1.2,
            t1_lock_mult: 1.05,
            extension_target_mult: 1.125,
            extension_stop_mult: 0.95,
            weak_oscillator: 40.0,
        }
    }
}

/// Time-based exit obligations computed by the scheduler for this tick.
#[derive(Debug, Clone, Copy, Default)]
pub struct TickFlags {
    /// Intraday session end reached; square off open intraday positions.
    pub square_off_due: bool,
    /// Evaluation date differs from the position's entry date (BTST).
    pub btst_exit_due: bool,
}

/// Stage transitions and terminal outcomes, consumed by the notifier.
#[derive(Debug, Clone, PartialEq)]
pub enum TradeEvent {
    Entered {
        symbol: String,
        kind: StrategyKind,
        entry: f64,
        stop: f64,
        target_1: f64,
        target_2: Option<f64>,
        score: u32,
        reasons: Vec<String>,
    },
    TrailingActivated {
        symbol: String,
        stop: f64,
    },
    StopRaised {
        symbol: String,
        from: f64,
        to: f64,
    },
    TargetLocked {
        symbol: String,
        stop: f64,
    },
    TargetExtended {
        symbol: String,
        target_1: f64,
        target_2: f64,
        stop: f64,
    },
    Exited {
        symbol: String,
        kind: StrategyKind,
        price: f64,
        reason: ExitReason,
        pnl: f64,
        r_multiple: f64,
    },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Verdict {
    Hold,
    Exit(ExitReason),
}

/// Open a position from an accepted entry signal.
pub fn open_position(
    symbol: &str,
    instrument: &str,
    kind: StrategyKind,
    snap: &IndicatorSnapshot,
    params: &RiskParams,
    entry_date: chrono::NaiveDate,
) -> Result<Position, crate::domain::error::SigscanError> {
    let entry = snap.close;
    let stop = entry - params.stop_atr_mult * snap.atr;
    let risk = entry - stop;
    let target_1 = entry + params.t1_risk_mult * risk;
    let target_2 = if kind.is_swing_class() {
        Some(entry + params.t2_risk_mult * risk)
    } else {
        None
    };
    Position::open(symbol, instrument, kind, entry, stop, target_1, target_2, entry_date)
}

/// Advance one open position against a fresh snapshot. Mutates stage state
/// in place, pushes stage-transition events, and returns the exit verdict.
pub fn manage(
    position: &mut Position,
    snap: &IndicatorSnapshot,
    profile: &StrategyProfile,
    flags: TickFlags,
    params: &LifecycleParams,
    events: &mut Vec<TradeEvent>,
) -> Verdict {
    let price = snap.close;
    position.observe_price(price);

    if let Some(reason) = exit_reason(position, snap, profile, flags, params) {
        return Verdict::Exit(reason);
    }

    advance_stages(position, snap, params, events);
    Verdict::Hold
}

fn exit_reason(
    position: &Position,
    snap: &IndicatorSnapshot,
    profile: &StrategyProfile,
    flags: TickFlags,
    params: &LifecycleParams,
) -> Option<ExitReason> {
    let price = snap.close;

    if position.stop_breached(price) {
        return Some(ExitReason::StopLoss);
    }
    if price >= position.final_target() {
        return Some(ExitReason::Target);
    }
    if !position.kind.is_swing_class() && momentum_weak(snap, profile, params) {
        return Some(ExitReason::MomentumWeak);
    }
    if position.kind == StrategyKind::Intraday && flags.square_off_due {
        return Some(ExitReason::SquareOff);
    }
    if position.kind == StrategyKind::Btst && flags.btst_exit_due {
        return Some(ExitReason::BtstTimeExit);
    }
    None
}

/// Close below the fast trend average, or oscillator under the floor.
fn momentum_weak(
    snap: &IndicatorSnapshot,
    profile: &StrategyProfile,
    params: &LifecycleParams,
) -> bool {
    let below_fast = snap
        .ema(profile.fast_span)
        .is_some_and(|fast| snap.close < fast);
    below_fast || snap.oscillator < params.weak_oscillator
}

fn advance_stages(
    position: &mut Position,
    snap: &IndicatorSnapshot,
    params: &LifecycleParams,
    events: &mut Vec<TradeEvent>,
) {
    let price = snap.close;

    // Breakeven ratchet: unrealized gain covers initial risk.
    if !position.trailing_active && position.unrealized_gain(price) >= position.risk {
        position.trailing_active = true;
        position.raise_stop(position.entry_price);
        events.push(TradeEvent::TrailingActivated {
            symbol: position.symbol.clone(),
            stop: position.stop_loss,
        });
    }

    // Trailing ratchet from the highest price seen.
    if position.trailing_active {
        let candidate = position.highest_seen - params.trail_atr_mult * snap.atr;
        if let Some((from, to)) = position.raise_stop(candidate) {
            events.push(TradeEvent::StopRaised {
                symbol: position.symbol.clone(),
                from,
                to,
            });
        }
    }

    if !position.kind.is_swing_class() {
        return;
    }

    // T1 profit lock.
    if !position.t1_hit && price >= position.target_1 {
        position.t1_hit = true;
        position.raise_stop(position.entry_price * params.t1_lock_mult);
        events.push(TradeEvent::TargetLocked {
            symbol: position.symbol.clone(),
            stop: position.stop_loss,
        });
    }

    // Dynamic extension: fires at most once, after T1, on confirmation.
    if position.t1_hit && !position.dynamic_extended {
        if let Some(old_t2) = position.target_2 {
            if extension_confirmed(snap) {
                let new_t1 = old_t2;
                let new_t2 = old_t2 * params.extension_target_mult;
                position.target_1 = new_t1;
                position.target_2 = Some(new_t2);
                position.raise_stop(new_t1 * params.extension_stop_mult);
                position.dynamic_extended = true;
                events.push(TradeEvent::TargetExtended {
                    symbol: position.symbol.clone(),
                    target_1: new_t1,
                    target_2: new_t2,
                    stop: position.stop_loss,
                });
            }
        }
    }
}

/// Trend, oscillator, volume and price-structure confirmation for the
/// one-time target extension.
fn extension_confirmed(snap: &IndicatorSnapshot) -> bool {
    let above_trend = snap.ema(20).is_some_and(|e| snap.close > e)
        && snap.ema(50).is_some_and(|e| snap.close > e);
    above_trend
        && (55.0..=70.0).contains(&snap.oscillator)
        && snap.volume >= snap.avg_volume_20
        && snap.last_three_rising
}

//! Event-to-text rendering for the notification sink.
//!
//! The state machine and engine emit structured [`TradeEvent`]s; every piece
//! of human wording lives here.

use crate::domain::lifecycle::TradeEvent;

pub fn render_event(event: &TradeEvent, time_label: &str) -> String {
    match event {
        TradeEvent::Entered {
            symbol,
            kind,
            entry,
            stop,
            target_1,
            target_2,
            score,
            reasons,
        } => {
            let mut text = format!(
                "📈 HIGH-CONFIDENCE BUY SIGNAL\n{symbol} [{kind}]\nTime: {time_label}\n\n\
                 Confidence: {score}%\nEntry: {entry:.2}\nStop-loss: {stop:.2}\nTarget: {target_1:.2}"
            );
            if let Some(t2) = target_2 {
                text.push_str(&format!("\nTarget 2: {t2:.2}"));
            }
            if !reasons.is_empty() {
                text.push_str("\n\nWhy:\n• ");
                text.push_str(&reasons.join("\n• "));
            }
            text.push_str("\n\nRisk Note:\n• Use strict stop-loss\n• Risk ≤ 1% capital");
            text
        }
        TradeEvent::TrailingActivated { symbol, stop } => {
            format!("🔒 {symbol}: breakeven reached — stop moved to {stop:.2}, trailing active")
        }
        TradeEvent::StopRaised { symbol, from, to } => {
            format!("🔒 {symbol}: trailing stop raised {from:.2} → {to:.2}")
        }
        TradeEvent::TargetLocked { symbol, stop } => {
            format!("🎯 {symbol}: target 1 hit — profit locked, stop now {stop:.2}")
        }
        TradeEvent::TargetExtended {
            symbol,
            target_1,
            target_2,
            stop,
        } => {
            format!(
                "🚀 {symbol}: momentum confirmed — targets revised to {target_1:.2} / {target_2:.2}, stop {stop:.2}"
            )
        }
        TradeEvent::Exited {
            symbol,
            kind,
            price,
            reason,
            pnl,
            r_multiple,
        } => {
            format!(
                "🏁 EXIT {symbol} [{kind}]\nTime: {time_label}\nPrice: {price:.2}\n\
                 Reason: {reason}\nP&L: {pnl:+.2} ({r_multiple:+.2}R)"
            )
        }
    }
}

/// Market snapshot: one line per watch-list symbol.
pub fn snapshot_message(lines: &[(String, Option<f64>)], time_label: &str) -> String {
    let body: Vec<String> = lines
        .iter()
        .map(|(name, price)| match price {
            Some(p) => format!("{name}: {p:.2}"),
            None => format!("{name}: data unavailable"),
        })
        .collect();
    format!("📊 Market Snapshot\n{time_label}\n\n{}", body.join("\n"))
}

pub fn pre_market_heartbeat(swing_open: usize, time_label: &str) -> String {
    format!(
        "🔔 MARKET OPEN — SYSTEM CHECK\n{time_label}\n\n\
         System Status:\n\
         • Swing Engine: ACTIVE ({swing_open} open trades)\n\
         • BTST Engine: ACTIVE\n\
         • Risk/Trade: 1% max\n\n\
         Reminder:\n\
         • Trades only on high-confidence alerts\n\
         • No action required now"
    )
}

pub fn post_market_heartbeat(swing_open: usize, btst_taken: u32, time_label: &str) -> String {
    format!(
        "🔔 MARKET CLOSED — DAILY SUMMARY\n{time_label}\n\n\
         Today's Activity:\n\
         • Swing Trades Active: {swing_open}\n\
         • BTST Trades Taken: {btst_taken}\n\n\
         System Health:\n\
         • All workflows executed\n\
         • No manual action required"
    )
}

pub fn live_check() -> String {
    "✅ sigscan is LIVE.\nYou will receive alerts here.".to_string()
}

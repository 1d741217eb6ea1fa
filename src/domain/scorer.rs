//! Entry scoring.
//!
//! Evaluation order: extreme-oscillator veto first (rejects regardless of
//! score), then hard gates (all must hold), then the weighted sum of matched
//! predicates against the profile threshold. Deterministic for identical
//! inputs; matched reasons are collected in rule order.

use crate::domain::snapshot::IndicatorSnapshot;
use crate::domain::strategy::StrategyProfile;

/// Score plus the ordered list of matched-predicate descriptions.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreResult {
    pub score: u32,
    pub reasons: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Evaluation {
    Accepted(ScoreResult),
    Rejected(Rejection),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Rejection {
    /// Oscillator outside the profile's safe band.
    Veto { oscillator: f64 },
    /// A hard gate failed.
    GateFailed(String),
    /// Scored below the acceptance threshold.
    BelowThreshold(ScoreResult),
}

pub fn evaluate(profile: &StrategyProfile, snap: &IndicatorSnapshot) -> Evaluation {
    if let Some(veto) = &profile.veto {
        if veto.rejects(snap.oscillator) {
            return Evaluation::Rejected(Rejection::Veto {
                oscillator: snap.oscillator,
            });
        }
    }

    let mut reasons = Vec::new();

    for gate in &profile.gates {
        if !gate.holds(snap) {
            return Evaluation::Rejected(Rejection::GateFailed(gate.describe(snap)));
        }
        reasons.push(gate.describe(snap));
    }

    if profile.rules.is_empty() {
        // Gate-only profile: a full pass counts as a full score.
        return Evaluation::Accepted(ScoreResult {
            score: 100,
            reasons,
        });
    }

    let mut score = 0;
    for rule in &profile.rules {
        if rule.predicate.holds(snap) {
            score += rule.weight;
            reasons.push(rule.predicate.describe(snap));
        }
    }

    let result = ScoreResult { score, reasons };
    if score >= profile.threshold {
        Evaluation::Accepted(result)
    } else {
        Evaluation::Rejected(Rejection::BelowThreshold(result))
    }
}

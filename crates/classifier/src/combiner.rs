//! Merges evaluator signals into a single verdict.
//!
//! The combiner is an ordered chain of guards. The first one that applies
//! decides the posture:
//!
//! 1. liquidity veto
//! 2. hedge override
//! 3. objective filter on the directional score
//! 4. conviction threshold
//! 5. directional verdict

use posture_core::{Confidence, Leaning, Posture, Signal, Thresholds, Verdict};

use crate::evaluator::SignalSet;

const HEDGE_BASE_SCORE: f64 = 0.5;
const HEDGE_CAUTION_BONUS: f64 = 0.25;
const HEDGE_NEUTRAL_VOL_PENALTY: f64 = 0.1;
const HEDGE_HIGH_SCORE: f64 = 0.75;
const HEDGE_MEDIUM_SCORE: f64 = 0.4;

/// Applies precedence and conflict resolution to a `SignalSet`.
#[derive(Debug, Clone, Copy)]
pub struct Combiner<'a> {
    thresholds: &'a Thresholds,
}

impl<'a> Combiner<'a> {
    #[must_use]
    pub fn new(thresholds: &'a Thresholds) -> Self {
        Self { thresholds }
    }

    /// Produces the verdict for one set of signals. Never fails.
    #[must_use]
    pub fn combine(&self, signals: &SignalSet) -> Verdict {
        if let Some(verdict) = self.liquidity_veto(signals) {
            return verdict;
        }
        if let Some(verdict) = Self::hedge_override(signals) {
            return verdict;
        }
        self.directional(signals)
    }

    fn liquidity_veto(&self, signals: &SignalSet) -> Option<Verdict> {
        let liquidity = &signals.liquidity;
        if !liquidity.is_caution() || liquidity.weight < self.thresholds.liquidity_veto_weight {
            return None;
        }

        tracing::warn!(
            weight = liquidity.weight,
            veto_weight = self.thresholds.liquidity_veto_weight,
            "Liquidity veto triggered, standing aside"
        );

        let reasons = liquidity
            .reasons
            .iter()
            .chain(signals.event_risk.reasons.iter())
            .cloned()
            .collect();
        Some(Verdict::new(Posture::StandAside, Confidence::Low, reasons))
    }

    fn hedge_override(signals: &SignalSet) -> Option<Verdict> {
        if signals.objective.leaning != Leaning::Hedge {
            return None;
        }

        let cautions: Vec<&Signal> = [&signals.time_decay, &signals.event_risk]
            .into_iter()
            .filter(|s| s.is_caution())
            .collect();

        let mut score = HEDGE_BASE_SCORE;
        for _ in &cautions {
            score += HEDGE_CAUTION_BONUS;
        }
        if signals.volatility.leaning == Leaning::Neutral {
            score -= HEDGE_NEUTRAL_VOL_PENALTY;
        }

        let confidence = if score >= HEDGE_HIGH_SCORE {
            Confidence::High
        } else if score >= HEDGE_MEDIUM_SCORE {
            Confidence::Medium
        } else {
            Confidence::Low
        };

        tracing::debug!(score, %confidence, "Hedge objective overrides directional scoring");

        let reasons = cautions
            .iter()
            .flat_map(|s| s.reasons.iter())
            .chain(signals.objective.reasons.iter())
            .cloned()
            .collect();
        Some(Verdict::new(Posture::Hedge, confidence, reasons))
    }

    fn directional(&self, signals: &SignalSet) -> Verdict {
        let t = self.thresholds;
        let mut reasons = signals.reasons();

        let raw = signals.volatility.signed_weight() + signals.time_decay.signed_weight();
        let dampening = t.caution_dampening * signals.caution_weight();
        let magnitude = (raw.abs() - dampening).max(0.0);
        let net = magnitude.copysign(raw);

        let candidate = if net > 0.0 {
            Posture::BuyPremium
        } else {
            Posture::SellPremium
        };

        tracing::debug!(raw, dampening, net, "Directional score");

        if magnitude > 0.0 && !signals.objective.allows(candidate) {
            reasons.push(format!(
                "Objective filter: {} is not allowed under the {} objective, standing aside rather than contradicting the objective",
                candidate,
                objective_label(&signals.objective)
            ));
            return Verdict::new(Posture::StandAside, Confidence::Low, reasons);
        }

        // A zero score has no direction even when min_conviction is 0.
        if magnitude == 0.0 || magnitude < t.min_conviction {
            reasons.push(format!(
                "No clear edge: net score {net:+.2} below conviction threshold {:.2}",
                t.min_conviction
            ));
            return Verdict::new(Posture::StandAside, Confidence::Low, reasons);
        }

        let confidence = if magnitude > t.high_conviction && !signals.any_caution() {
            Confidence::High
        } else {
            Confidence::Medium
        };

        if candidate == Posture::BuyPremium && signals.event_risk.is_caution() {
            reasons.push(
                "Buying premium into a scheduled event risks IV crush after the release"
                    .to_string(),
            );
        }

        Verdict::new(candidate, confidence, reasons)
    }
}

/// Objective name for notes, taken from the allowed-posture set.
fn objective_label(objective: &Signal) -> &'static str {
    match objective.allowed_postures.as_deref() {
        Some([Posture::SellPremium]) => "income",
        Some([Posture::Hedge]) => "hedge",
        _ => "speculate",
    }
}

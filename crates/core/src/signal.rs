//! Per-evaluator signals.
//!
//! Each rule evaluator produces one `Signal`: which evaluator it came from,
//! which way it leans, how hard it pushes, and why.

use serde::{Deserialize, Serialize};

use crate::verdict::Posture;

/// Identifies a rule evaluator. Variant order is the declaration order used
/// when reasons are assembled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EvaluatorKind {
    Volatility,
    TimeDecay,
    Liquidity,
    EventRisk,
    Objective,
}

impl EvaluatorKind {
    /// All evaluators in declaration order.
    pub const ALL: [Self; 5] = [
        Self::Volatility,
        Self::TimeDecay,
        Self::Liquidity,
        Self::EventRisk,
        Self::Objective,
    ];
}

impl std::fmt::Display for EvaluatorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Volatility => write!(f, "volatility"),
            Self::TimeDecay => write!(f, "time_decay"),
            Self::Liquidity => write!(f, "liquidity"),
            Self::EventRisk => write!(f, "event_risk"),
            Self::Objective => write!(f, "objective"),
        }
    }
}

/// Which way an evaluator pushes the final posture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Leaning {
    /// Premium is cheap or time is plentiful: buying options is favored.
    FavorLongPremium,
    /// Premium is rich: selling options is favored.
    FavorShortPremium,
    /// No directional bias
    Neutral,
    /// Conditions argue for less exposure in either direction.
    Caution,
    /// The caller wants protection; only the objective evaluator emits this.
    Hedge,
}

impl Leaning {
    /// +1 for long premium, -1 for short premium, 0 otherwise.
    #[must_use]
    pub const fn sign(self) -> f64 {
        match self {
            Self::FavorLongPremium => 1.0,
            Self::FavorShortPremium => -1.0,
            Self::Neutral | Self::Caution | Self::Hedge => 0.0,
        }
    }

    /// Returns true if this leaning has a premium direction.
    #[must_use]
    pub const fn is_directional(self) -> bool {
        matches!(self, Self::FavorLongPremium | Self::FavorShortPremium)
    }
}

/// Output of one rule evaluator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Signal {
    pub source: EvaluatorKind,
    pub leaning: Leaning,
    /// How strongly this evaluator should influence the posture, 0..=max weight.
    pub weight: f64,
    pub reasons: Vec<String>,
    /// Postures the caller's objective permits. Only the objective evaluator sets it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allowed_postures: Option<Vec<Posture>>,
}

impl Signal {
    #[must_use]
    pub fn new(source: EvaluatorKind, leaning: Leaning, weight: f64) -> Self {
        Self {
            source,
            leaning,
            weight,
            reasons: Vec::new(),
            allowed_postures: None,
        }
    }

    /// Creates a neutral signal with zero weight and no reasons.
    #[must_use]
    pub fn neutral(source: EvaluatorKind) -> Self {
        Self::new(source, Leaning::Neutral, 0.0)
    }

    /// Appends a reason.
    #[must_use]
    pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
        self.reasons.push(reason.into());
        self
    }

    #[must_use]
    pub fn with_allowed_postures(mut self, postures: Vec<Posture>) -> Self {
        self.allowed_postures = Some(postures);
        self
    }

    /// Weight carrying the leaning's sign: positive favors buying premium.
    #[must_use]
    pub fn signed_weight(&self) -> f64 {
        self.leaning.sign() * self.weight
    }

    #[must_use]
    pub fn is_caution(&self) -> bool {
        self.leaning == Leaning::Caution
    }

    /// Whether the objective filter lets `posture` through. Signals without a
    /// posture set allow everything.
    #[must_use]
    pub fn allows(&self, posture: Posture) -> bool {
        self.allowed_postures
            .as_ref()
            .map_or(true, |allowed| allowed.contains(&posture))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signed_weight_follows_leaning() {
        let long = Signal::new(EvaluatorKind::Volatility, Leaning::FavorLongPremium, 0.8);
        let short = Signal::new(EvaluatorKind::Volatility, Leaning::FavorShortPremium, 0.8);
        let caution = Signal::new(EvaluatorKind::TimeDecay, Leaning::Caution, 0.9);
        assert!((long.signed_weight() - 0.8).abs() < f64::EPSILON);
        assert!((short.signed_weight() + 0.8).abs() < f64::EPSILON);
        assert_eq!(caution.signed_weight(), 0.0);
        assert!(caution.is_caution());
    }

    #[test]
    fn neutral_signal_is_empty() {
        let s = Signal::neutral(EvaluatorKind::EventRisk);
        assert_eq!(s.leaning, Leaning::Neutral);
        assert_eq!(s.weight, 0.0);
        assert!(s.reasons.is_empty());
        assert!(!s.leaning.is_directional());
    }

    #[test]
    fn allowed_postures_filter() {
        let open = Signal::neutral(EvaluatorKind::Objective);
        assert!(open.allows(Posture::BuyPremium));

        let income = Signal::neutral(EvaluatorKind::Objective)
            .with_allowed_postures(vec![Posture::SellPremium]);
        assert!(income.allows(Posture::SellPremium));
        assert!(!income.allows(Posture::BuyPremium));
    }

    #[test]
    fn declaration_order_is_stable() {
        let mut kinds = EvaluatorKind::ALL;
        kinds.sort();
        assert_eq!(kinds, EvaluatorKind::ALL);
        assert_eq!(EvaluatorKind::TimeDecay.to_string(), "time_decay");
    }
}

//! Final classification output.

use serde::{Deserialize, Serialize};

/// Recommended stance toward option premium.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Posture {
    BuyPremium,
    SellPremium,
    Hedge,
    StandAside,
}

impl Posture {
    /// Structuring hint shown next to the posture.
    #[must_use]
    pub const fn guidance(self) -> &'static str {
        match self {
            Self::BuyPremium => "prefer defined-risk spreads",
            Self::SellPremium => "use defined-risk structures",
            Self::Hedge => "prefer spreads/collars for cost control",
            Self::StandAside => "no position",
        }
    }
}

impl std::fmt::Display for Posture {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BuyPremium => write!(f, "BUY PREMIUM"),
            Self::SellPremium => write!(f, "SELL PREMIUM"),
            Self::Hedge => write!(f, "HEDGE"),
            Self::StandAside => write!(f, "STAND ASIDE"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    Low,
    Medium,
    High,
}

impl std::fmt::Display for Confidence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Low => write!(f, "low"),
            Self::Medium => write!(f, "medium"),
            Self::High => write!(f, "high"),
        }
    }
}

/// Posture, confidence and the reasons behind them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Verdict {
    posture: Posture,
    confidence: Confidence,
    reasons: Vec<String>,
}

impl Verdict {
    /// Builds a verdict, dropping exact-duplicate reasons while keeping the
    /// first occurrence order.
    #[must_use]
    pub fn new(posture: Posture, confidence: Confidence, reasons: Vec<String>) -> Self {
        let mut unique: Vec<String> = Vec::with_capacity(reasons.len());
        for reason in reasons {
            if !unique.contains(&reason) {
                unique.push(reason);
            }
        }
        Self {
            posture,
            confidence,
            reasons: unique,
        }
    }

    #[must_use]
    pub fn posture(&self) -> Posture {
        self.posture
    }

    #[must_use]
    pub fn confidence(&self) -> Confidence {
        self.confidence
    }

    #[must_use]
    pub fn reasons(&self) -> &[String] {
        &self.reasons
    }

    /// Returns true if any reason contains `needle`.
    #[must_use]
    pub fn cites(&self, needle: &str) -> bool {
        self.reasons.iter().any(|r| r.contains(needle))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reasons_are_deduplicated_in_order() {
        let verdict = Verdict::new(
            Posture::SellPremium,
            Confidence::Medium,
            vec![
                "b".to_string(),
                "a".to_string(),
                "b".to_string(),
                "c".to_string(),
                "a".to_string(),
            ],
        );
        assert_eq!(verdict.reasons(), ["b", "a", "c"]);
    }

    #[test]
    fn confidence_orders_low_to_high() {
        assert!(Confidence::Low < Confidence::Medium);
        assert!(Confidence::Medium < Confidence::High);
    }

    #[test]
    fn verdict_serializes_snake_case() {
        let verdict = Verdict::new(Posture::StandAside, Confidence::Low, vec!["x".to_string()]);
        let json = serde_json::to_string(&verdict).unwrap();
        assert_eq!(
            json,
            r#"{"posture":"stand_aside","confidence":"low","reasons":["x"]}"#
        );
    }

    #[test]
    fn display_matches_report_labels() {
        assert_eq!(Posture::BuyPremium.to_string(), "BUY PREMIUM");
        assert_eq!(Posture::Hedge.guidance(), "prefer spreads/collars for cost control");
        assert_eq!(Confidence::High.to_string(), "high");
    }
}

//! Objective alignment: filters candidate postures by what the caller wants.

use posture_core::{
    ClassifyError, EvaluatorKind, Leaning, Objective, OptionSnapshot, Posture, Signal, Thresholds,
};

use super::RuleEvaluator;

/// Not an independent vote: speculate and income only restrict which
/// postures the combiner may choose, while hedge overrides it outright.
#[derive(Debug, Clone, Copy, Default)]
pub struct ObjectiveAlignment;

impl ObjectiveAlignment {
    /// Postures each objective permits.
    #[must_use]
    pub fn allowed_postures(objective: Objective) -> Vec<Posture> {
        match objective {
            Objective::Speculate => vec![Posture::BuyPremium, Posture::SellPremium],
            Objective::Income => vec![Posture::SellPremium],
            Objective::Hedge => vec![Posture::Hedge],
        }
    }
}

impl RuleEvaluator for ObjectiveAlignment {
    fn kind(&self) -> EvaluatorKind {
        EvaluatorKind::Objective
    }

    fn evaluate(
        &self,
        snapshot: &OptionSnapshot,
        thresholds: &Thresholds,
    ) -> Result<Signal, ClassifyError> {
        let objective = snapshot.objective();
        let allowed = Self::allowed_postures(objective);

        let signal = match objective {
            Objective::Speculate => Signal::neutral(self.kind()).with_reason(
                "Objective = speculate: buy or sell premium as the volatility regime suggests",
            ),
            Objective::Income => Signal::neutral(self.kind())
                .with_reason("Objective = income: premium-selling postures only"),
            Objective::Hedge => {
                Signal::new(self.kind(), Leaning::Hedge, thresholds.max_signal_weight)
                    .with_reason("Objective = hedge: protect the existing position")
            }
        };

        Ok(signal.with_allowed_postures(allowed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evaluator::test_support::snapshot;

    fn eval(objective: Objective) -> Signal {
        let snap = snapshot(|i| i.objective = objective);
        ObjectiveAlignment
            .evaluate(&snap, &Thresholds::default())
            .unwrap()
    }

    #[test]
    fn speculate_allows_either_direction() {
        let s = eval(Objective::Speculate);
        assert_eq!(s.leaning, Leaning::Neutral);
        assert!(s.allows(Posture::BuyPremium));
        assert!(s.allows(Posture::SellPremium));
        assert!(!s.allows(Posture::Hedge));
    }

    #[test]
    fn income_allows_selling_only() {
        let s = eval(Objective::Income);
        assert!(s.allows(Posture::SellPremium));
        assert!(!s.allows(Posture::BuyPremium));
        assert!(s.reasons[0].starts_with("Objective = income"));
    }

    #[test]
    fn hedge_is_dominant_leaning() {
        let s = eval(Objective::Hedge);
        assert_eq!(s.leaning, Leaning::Hedge);
        assert!((s.weight - 1.0).abs() < f64::EPSILON);
        assert!(s.allows(Posture::Hedge));
    }
}

//! Event risk rule. Scheduled releases distort implied volatility.

use posture_core::{ClassifyError, EvaluatorKind, Leaning, OptionSnapshot, Signal, Thresholds};

use super::RuleEvaluator;

/// Cautions when a flagged event falls inside `event_risk_window_days`.
///
/// Weight rises linearly as the event approaches, reaching the maximum on the
/// event day. A flagged event with no day count is treated as sitting on the
/// far edge of the window.
#[derive(Debug, Clone, Copy, Default)]
pub struct EventRisk;

impl EventRisk {
    fn weight(days: u32, thresholds: &Thresholds) -> f64 {
        let span = f64::from(thresholds.event_risk_window_days) + 1.0;
        thresholds.max_signal_weight * (span - f64::from(days)) / span
    }
}

impl RuleEvaluator for EventRisk {
    fn kind(&self) -> EvaluatorKind {
        EvaluatorKind::EventRisk
    }

    fn evaluate(
        &self,
        snapshot: &OptionSnapshot,
        thresholds: &Thresholds,
    ) -> Result<Signal, ClassifyError> {
        if !snapshot.upcoming_event() {
            return Ok(Signal::neutral(self.kind()));
        }

        let window = thresholds.event_risk_window_days;
        let days = snapshot.days_to_event().unwrap_or(window);
        if days > window {
            return Ok(Signal::neutral(self.kind()));
        }

        let reason = match snapshot.days_to_event() {
            Some(days) => format!(
                "Upcoming event in {days} day(s), within the {window}-day risk window: IV distortion/IV crush risk likely"
            ),
            None => format!(
                "Upcoming event within ~{window} days: IV distortion/IV crush risk likely"
            ),
        };

        Ok(
            Signal::new(self.kind(), Leaning::Caution, Self::weight(days, thresholds))
                .with_reason(reason),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evaluator::test_support::snapshot;

    fn eval(flag: bool, days: Option<i64>) -> Signal {
        let snap = snapshot(|i| {
            i.upcoming_event = flag;
            i.days_to_event = days;
        });
        EventRisk.evaluate(&snap, &Thresholds::default()).unwrap()
    }

    #[test]
    fn no_event_is_silent() {
        let s = eval(false, Some(1));
        assert_eq!(s.leaning, Leaning::Neutral);
        assert!(s.reasons.is_empty());
    }

    #[test]
    fn event_inside_window_is_caution() {
        let s = eval(true, Some(2));
        assert_eq!(s.leaning, Leaning::Caution);
        assert!(s.reasons[0].contains("2 day(s)"));
    }

    #[test]
    fn event_outside_window_is_silent() {
        let s = eval(true, Some(8));
        assert_eq!(s.leaning, Leaning::Neutral);
        assert!(s.reasons.is_empty());
    }

    #[test]
    fn window_edge_is_inclusive() {
        assert_eq!(eval(true, Some(7)).leaning, Leaning::Caution);
    }

    #[test]
    fn weight_increases_as_event_nears() {
        let weights: Vec<f64> = (0..=7).rev().map(|d| eval(true, Some(d)).weight).collect();
        assert!(weights.windows(2).all(|w| w[1] > w[0]));
        assert!((eval(true, Some(0)).weight - 1.0).abs() < 1e-12);
        // Linear: each day closer adds max / (window + 1).
        let step = weights[1] - weights[0];
        assert!((step - 1.0 / 8.0).abs() < 1e-12);
    }

    #[test]
    fn flagged_event_without_day_count_sits_at_window_edge() {
        let s = eval(true, None);
        assert_eq!(s.leaning, Leaning::Caution);
        assert!((s.weight - eval(true, Some(7)).weight).abs() < 1e-12);
        assert!(s.reasons[0].contains("~7 days"));
    }
}

//! Rule evaluators.
//!
//! Each evaluator independently maps a snapshot and the thresholds to one
//! `Signal`. Evaluators hold no state, so a single static instance of each is
//! shared by every call.

pub mod event_risk;
pub mod liquidity;
pub mod objective;
pub mod time_decay;
pub mod volatility;

use posture_core::{ClassifyError, EvaluatorKind, OptionSnapshot, Signal, Thresholds};
use serde::{Deserialize, Serialize};

pub use event_risk::EventRisk;
pub use liquidity::Liquidity;
pub use objective::ObjectiveAlignment;
pub use time_decay::TimeDecay;
pub use volatility::VolatilityRegime;

/// A single classification rule.
///
/// Implementations must be pure: the same snapshot and thresholds always
/// produce the same signal.
pub trait RuleEvaluator: Send + Sync {
    /// Which evaluator this is.
    fn kind(&self) -> EvaluatorKind;

    /// Evaluates the rule for one snapshot.
    ///
    /// # Errors
    /// Only on a snapshot that violates an invariant the evaluator re-checks.
    fn evaluate(
        &self,
        snapshot: &OptionSnapshot,
        thresholds: &Thresholds,
    ) -> Result<Signal, ClassifyError>;
}

/// All evaluators in declaration order.
#[must_use]
pub fn evaluators() -> [&'static dyn RuleEvaluator; 5] {
    [
        &VolatilityRegime,
        &TimeDecay,
        &Liquidity,
        &EventRisk,
        &ObjectiveAlignment,
    ]
}

/// One signal per evaluator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignalSet {
    pub volatility: Signal,
    pub time_decay: Signal,
    pub liquidity: Signal,
    pub event_risk: Signal,
    pub objective: Signal,
}

impl SignalSet {
    /// Places each signal by its source. Evaluators without a signal count as neutral.
    #[must_use]
    pub fn from_signals(signals: impl IntoIterator<Item = Signal>) -> Self {
        let mut set = Self {
            volatility: Signal::neutral(EvaluatorKind::Volatility),
            time_decay: Signal::neutral(EvaluatorKind::TimeDecay),
            liquidity: Signal::neutral(EvaluatorKind::Liquidity),
            event_risk: Signal::neutral(EvaluatorKind::EventRisk),
            objective: Signal::neutral(EvaluatorKind::Objective),
        };
        for signal in signals {
            match signal.source {
                EvaluatorKind::Volatility => set.volatility = signal,
                EvaluatorKind::TimeDecay => set.time_decay = signal,
                EvaluatorKind::Liquidity => set.liquidity = signal,
                EvaluatorKind::EventRisk => set.event_risk = signal,
                EvaluatorKind::Objective => set.objective = signal,
            }
        }
        set
    }

    /// Signals in declaration order.
    #[must_use]
    pub fn in_order(&self) -> [&Signal; 5] {
        [
            &self.volatility,
            &self.time_decay,
            &self.liquidity,
            &self.event_risk,
            &self.objective,
        ]
    }

    /// Every reason in declaration order (duplicates kept).
    #[must_use]
    pub fn reasons(&self) -> Vec<String> {
        self.in_order()
            .iter()
            .flat_map(|s| s.reasons.iter().cloned())
            .collect()
    }

    /// Summed weight of all caution signals.
    #[must_use]
    pub fn caution_weight(&self) -> f64 {
        self.in_order()
            .iter()
            .filter(|s| s.is_caution())
            .map(|s| s.weight)
            .sum()
    }

    #[must_use]
    pub fn any_caution(&self) -> bool {
        self.in_order().iter().any(|s| s.is_caution())
    }
}

/// Runs every evaluator against the snapshot.
///
/// # Errors
/// Propagates the first evaluator failure.
pub fn evaluate_all(
    snapshot: &OptionSnapshot,
    thresholds: &Thresholds,
) -> Result<SignalSet, ClassifyError> {
    let mut signals = Vec::with_capacity(5);
    for evaluator in evaluators() {
        let signal = evaluator.evaluate(snapshot, thresholds)?;
        tracing::debug!(
            evaluator = %evaluator.kind(),
            leaning = ?signal.leaning,
            weight = signal.weight,
            "Rule evaluated"
        );
        signals.push(signal);
    }
    Ok(SignalSet::from_signals(signals))
}

#[cfg(test)]
pub(crate) mod test_support {
    use posture_core::{Objective, OptionSnapshot, SnapshotInput};
    use rust_decimal_macros::dec;

    /// Baseline: mid IV rank, mid DTE, tight quote, no event, speculate.
    pub fn base_input() -> SnapshotInput {
        SnapshotInput {
            symbol: Some("SPY".to_string()),
            right: None,
            price: dec!(100),
            strike: dec!(100),
            days_to_expiry: 20,
            iv_rank: 50.0,
            iv: None,
            delta: 0.30,
            gamma: 0.02,
            theta: -0.03,
            vega: None,
            bid: dec!(4.99),
            ask: dec!(5.01),
            upcoming_event: false,
            days_to_event: None,
            trend: None,
            objective: Objective::Speculate,
        }
    }

    pub fn snapshot(f: impl FnOnce(&mut SnapshotInput)) -> OptionSnapshot {
        let mut input = base_input();
        f(&mut input);
        OptionSnapshot::new(input).unwrap()
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::snapshot;
    use super::*;
    use posture_core::Leaning;

    #[test]
    fn evaluators_are_in_declaration_order() {
        let kinds: Vec<EvaluatorKind> = evaluators().iter().map(|e| e.kind()).collect();
        assert_eq!(kinds, EvaluatorKind::ALL);
    }

    #[test]
    fn evaluate_all_places_signals_by_source() {
        let snap = snapshot(|_| {});
        let set = evaluate_all(&snap, &Thresholds::default()).unwrap();
        for (signal, kind) in set.in_order().iter().zip(EvaluatorKind::ALL) {
            assert_eq!(signal.source, kind);
        }
    }

    #[test]
    fn missing_signals_default_to_neutral() {
        let set = SignalSet::from_signals(Vec::new());
        assert!(set.in_order().iter().all(|s| s.leaning == Leaning::Neutral));
        assert!(!set.any_caution());
        assert_eq!(set.caution_weight(), 0.0);
    }

    #[test]
    fn caution_weight_sums_only_cautions() {
        let set = SignalSet::from_signals(vec![
            Signal::new(EvaluatorKind::Volatility, Leaning::FavorShortPremium, 0.9),
            Signal::new(EvaluatorKind::TimeDecay, Leaning::Caution, 0.6),
            Signal::new(EvaluatorKind::EventRisk, Leaning::Caution, 0.25),
        ]);
        assert!((set.caution_weight() - 0.85).abs() < 1e-12);
        assert!(set.any_caution());
    }
}

//! Liquidity filter. A wide or missing market vetoes any position.

use posture_core::{ClassifyError, EvaluatorKind, Leaning, OptionSnapshot, Signal, Thresholds};

use super::RuleEvaluator;

/// Spread ratio = (ask - bid) / mid.
///
/// A zero midpoint or a ratio above `max_spread_ratio` yields a caution at the
/// maximum weight, which the combiner treats as a veto.
#[derive(Debug, Clone, Copy, Default)]
pub struct Liquidity;

impl RuleEvaluator for Liquidity {
    fn kind(&self) -> EvaluatorKind {
        EvaluatorKind::Liquidity
    }

    fn evaluate(
        &self,
        snapshot: &OptionSnapshot,
        thresholds: &Thresholds,
    ) -> Result<Signal, ClassifyError> {
        let limit_pct = thresholds.max_spread_ratio * 100.0;

        let signal = match snapshot.spread_ratio() {
            None => Signal::new(self.kind(), Leaning::Caution, thresholds.max_signal_weight)
                .with_reason(format!(
                    "Liquidity filter: unquoted/degenerate market (bid {}, ask {})",
                    snapshot.bid(),
                    snapshot.ask()
                )),
            Some(ratio) if ratio > thresholds.max_spread_ratio => {
                Signal::new(self.kind(), Leaning::Caution, thresholds.max_signal_weight)
                    .with_reason(format!(
                        "Liquidity filter: bid-ask spread {:.2}% of mid > {limit_pct:.2}% threshold",
                        ratio * 100.0
                    ))
            }
            Some(ratio) => Signal::neutral(self.kind()).with_reason(format!(
                "Liquidity OK: bid-ask spread {:.2}% of mid ≤ {limit_pct:.2}%",
                ratio * 100.0
            )),
        };

        Ok(signal)
    }
}

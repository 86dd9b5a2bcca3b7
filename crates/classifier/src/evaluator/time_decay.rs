//! Time-decay / gamma risk rule.

use posture_core::{ClassifyError, EvaluatorKind, Leaning, OptionSnapshot, Signal, Thresholds};
use rust_decimal::prelude::ToPrimitive;

use super::RuleEvaluator;

/// Short-dated contracts raise a caution; long-dated ones mildly favor buying
/// premium. Both band edges are inclusive.
#[derive(Debug, Clone, Copy, Default)]
pub struct TimeDecay;

impl TimeDecay {
    /// Caution weight: half the maximum on the `dte_short` edge, full at expiry.
    fn caution_weight(dte: u32, thresholds: &Thresholds) -> f64 {
        if thresholds.dte_short == 0 {
            return thresholds.max_signal_weight;
        }
        let closeness = f64::from(thresholds.dte_short - dte) / f64::from(thresholds.dte_short);
        thresholds.max_signal_weight * (0.5 + 0.5 * closeness)
    }

    /// |theta| as a fraction of the option midpoint, when the quote is live.
    fn theta_fraction(snapshot: &OptionSnapshot) -> Option<f64> {
        let mid = snapshot.mid().to_f64()?;
        (mid > 0.0).then(|| snapshot.theta().abs() / mid)
    }
}

impl RuleEvaluator for TimeDecay {
    fn kind(&self) -> EvaluatorKind {
        EvaluatorKind::TimeDecay
    }

    fn evaluate(
        &self,
        snapshot: &OptionSnapshot,
        thresholds: &Thresholds,
    ) -> Result<Signal, ClassifyError> {
        let dte = snapshot.days_to_expiry();

        let mut signal = if dte <= thresholds.dte_short {
            Signal::new(
                self.kind(),
                Leaning::Caution,
                Self::caution_weight(dte, thresholds),
            )
            .with_reason(format!(
                "Short DTE ({dte} ≤ {}): elevated gamma/theta risk near expiry (gamma {:.4}, theta {:.4})",
                thresholds.dte_short,
                snapshot.gamma(),
                snapshot.theta()
            ))
        } else if dte >= thresholds.dte_long {
            Signal::new(
                self.kind(),
                Leaning::FavorLongPremium,
                thresholds.long_dte_weight,
            )
            .with_reason(format!(
                "Long DTE ({dte} ≥ {}): slower decay tolerates buying premium",
                thresholds.dte_long
            ))
        } else {
            Signal::neutral(self.kind()).with_reason(format!(
                "DTE {dte} between {} and {}: neutral time decay",
                thresholds.dte_short, thresholds.dte_long
            ))
        };

        if let Some(fraction) = Self::theta_fraction(snapshot) {
            if fraction > thresholds.max_theta_fraction {
                signal = signal.with_reason(format!(
                    "Aggressive time decay: |theta| is {:.1}% of premium per day (> {:.1}%)",
                    fraction * 100.0,
                    thresholds.max_theta_fraction * 100.0
                ));
            }
        }

        Ok(signal)
    }
}

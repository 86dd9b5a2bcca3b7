//! Volatility regime rule: is premium rich or cheap relative to its own history?

use posture_core::{
    ClassifyError, EvaluatorKind, InvalidInput, Leaning, OptionSnapshot, Signal, Thresholds,
};

use super::RuleEvaluator;

/// Maps IV rank onto a premium leaning.
///
/// At or above `iv_rank_high` premium is rich (favor selling); at or below
/// `iv_rank_low` it is cheap (favor buying). The weight starts at half the
/// maximum on the band edge and saturates `iv_rank_full_weight_distance`
/// points past it.
#[derive(Debug, Clone, Copy, Default)]
pub struct VolatilityRegime;

impl VolatilityRegime {
    fn weight(distance: f64, thresholds: &Thresholds) -> f64 {
        let reach = (distance / thresholds.iv_rank_full_weight_distance).clamp(0.0, 1.0);
        thresholds.max_signal_weight * (0.5 + 0.5 * reach)
    }
}

impl RuleEvaluator for VolatilityRegime {
    fn kind(&self) -> EvaluatorKind {
        EvaluatorKind::Volatility
    }

    fn evaluate(
        &self,
        snapshot: &OptionSnapshot,
        thresholds: &Thresholds,
    ) -> Result<Signal, ClassifyError> {
        let rank = snapshot.iv_rank();
        if !(0.0..=100.0).contains(&rank) {
            return Err(InvalidInput::IvRankOutOfRange(rank).into());
        }

        let signal = if rank >= thresholds.iv_rank_high {
            Signal::new(
                self.kind(),
                Leaning::FavorShortPremium,
                Self::weight(rank - thresholds.iv_rank_high, thresholds),
            )
            .with_reason(format!(
                "Elevated IV rank ({rank:.0} ≥ {:.0}): premium is rich, favors selling premium",
                thresholds.iv_rank_high
            ))
        } else if rank <= thresholds.iv_rank_low {
            Signal::new(
                self.kind(),
                Leaning::FavorLongPremium,
                Self::weight(thresholds.iv_rank_low - rank, thresholds),
            )
            .with_reason(format!(
                "Depressed IV rank ({rank:.0} ≤ {:.0}): premium is cheap, favors buying premium",
                thresholds.iv_rank_low
            ))
        } else {
            Signal::neutral(self.kind()).with_reason(format!(
                "Mid IV rank ({rank:.0}): neutral volatility regime"
            ))
        };

        Ok(signal)
    }
}

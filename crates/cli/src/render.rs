//! Report rendering, plain text or JSON.

use clap::ValueEnum;
use posture_core::{Objective, OptionSnapshot, Thresholds, Verdict};
use serde::Serialize;

/// Output format for reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Default)]
pub enum OutputFormat {
    /// Human-readable report
    #[default]
    Text,
    /// One JSON document
    Json,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}

/// JSON view of one classified snapshot.
#[derive(Debug, Serialize)]
pub struct Report<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub symbol: Option<&'a str>,
    pub objective: Objective,
    pub iv_rank: f64,
    pub days_to_expiry: u32,
    /// Bid-ask spread as a percent of mid; absent for a zero-mid quote.
    pub spread_pct: Option<f64>,
    #[serde(flatten)]
    pub verdict: &'a Verdict,
}

impl<'a> Report<'a> {
    #[must_use]
    pub fn new(snapshot: &'a OptionSnapshot, verdict: &'a Verdict) -> Self {
        Self {
            symbol: snapshot.symbol(),
            objective: snapshot.objective(),
            iv_rank: snapshot.iv_rank(),
            days_to_expiry: snapshot.days_to_expiry(),
            spread_pct: snapshot.spread_ratio().map(|r| r * 100.0),
            verdict,
        }
    }

    /// Multi-line text report.
    #[must_use]
    pub fn to_text(&self) -> String {
        let mut out = String::new();
        out.push_str("\nOptions Posture Classification\n");
        out.push_str(&"-".repeat(30));
        out.push('\n');
        if let Some(symbol) = self.symbol {
            out.push_str(&format!("Symbol: {symbol}\n"));
        }
        out.push_str(&format!("Objective: {}\n", self.objective));
        out.push_str(&format!("IV Rank: {:.0}\n", self.iv_rank));
        out.push_str(&format!("DTE: {}\n", self.days_to_expiry));
        match self.spread_pct {
            Some(pct) => out.push_str(&format!("Bid-ask spread: {pct:.2}%\n")),
            None => out.push_str("Bid-ask spread: n/a (no quote)\n"),
        }

        let posture = self.verdict.posture();
        out.push_str(&format!(
            "\nSuggested posture: {posture} ({})\n",
            posture.guidance()
        ));
        out.push_str(&format!("Confidence: {}\n", self.verdict.confidence()));
        out.push_str("\nReasons:\n");
        for reason in self.verdict.reasons() {
            out.push_str(&format!("- {reason}\n"));
        }
        out
    }
}

/// Threshold table, one `name = value` line per key in name order.
#[must_use]
pub fn thresholds_text(thresholds: &Thresholds) -> String {
    thresholds
        .to_configuration()
        .iter()
        .map(|(name, value)| format!("{name:<30} = {value}\n"))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use posture_core::{Confidence, Posture, SnapshotInput};
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    fn snapshot(bid: Decimal, ask: Decimal) -> OptionSnapshot {
        OptionSnapshot::new(SnapshotInput {
            symbol: Some("TSLA".to_string()),
            right: None,
            price: dec!(250),
            strike: dec!(240),
            days_to_expiry: 12,
            iv_rank: 64.4,
            iv: None,
            delta: -0.3,
            gamma: 0.01,
            theta: -0.1,
            vega: None,
            bid,
            ask,
            upcoming_event: false,
            days_to_event: None,
            trend: None,
            objective: Objective::Income,
        })
        .unwrap()
    }

    fn verdict() -> Verdict {
        Verdict::new(
            Posture::SellPremium,
            Confidence::Medium,
            vec!["first".to_string(), "second".to_string()],
        )
    }

    #[test]
    fn text_report_lists_context_and_reasons() {
        let snap = snapshot(dec!(4.95), dec!(5.05));
        let verdict = verdict();
        let text = Report::new(&snap, &verdict).to_text();

        assert!(text.contains("Symbol: TSLA"));
        assert!(text.contains("IV Rank: 64"));
        assert!(text.contains("DTE: 12"));
        assert!(text.contains("Bid-ask spread: 2.00%"));
        assert!(text.contains("Suggested posture: SELL PREMIUM (use defined-risk structures)"));
        assert!(text.contains("Confidence: medium"));
        assert!(text.ends_with("- first\n- second\n"));
    }

    #[test]
    fn zero_mid_quote_has_no_spread() {
        let snap = snapshot(Decimal::ZERO, Decimal::ZERO);
        let verdict = verdict();
        let report = Report::new(&snap, &verdict);
        assert!(report.spread_pct.is_none());
        assert!(report.to_text().contains("n/a"));
    }

    #[test]
    fn json_report_flattens_verdict() {
        let snap = snapshot(dec!(4.95), dec!(5.05));
        let verdict = verdict();
        let json = serde_json::to_value(Report::new(&snap, &verdict)).unwrap();

        assert_eq!(json["symbol"], "TSLA");
        assert_eq!(json["objective"], "income");
        assert_eq!(json["posture"], "sell_premium");
        assert_eq!(json["confidence"], "medium");
        assert_eq!(json["reasons"][1], "second");
    }

    #[test]
    fn thresholds_are_listed_by_name() {
        let text = thresholds_text(&Thresholds::default());
        assert_eq!(text.lines().count(), 14);
        assert!(text.lines().next().unwrap().starts_with("caution_dampening"));
        assert!(text.contains("iv_rank_high"));
    }
}

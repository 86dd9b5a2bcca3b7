//! Classify a JSON array of snapshots with one set of thresholds.
//!
//! Entries are independent: an invalid entry is reported and the rest are
//! still classified. The process exits non-zero if any entry failed.

use std::path::PathBuf;

use anyhow::Result;
use chrono::{NaiveDate, Utc};
use clap::Args;
use posture_classifier::Classifier;
use posture_core::{OptionSnapshot, Verdict};
use serde::Serialize;

use crate::commands::load_classifier;
use crate::input::{parse_entry, read_batch};
use crate::render::{OutputFormat, Report};

/// Arguments for the batch command.
#[derive(Args, Debug, Clone)]
pub struct BatchArgs {
    /// JSON file holding an array of snapshots
    #[arg(short, long, default_value = "data/sample_batch.json")]
    pub snapshots: PathBuf,

    /// Thresholds TOML file (defaults to config/Thresholds.toml when present)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, default_value = "text", value_enum)]
    pub format: OutputFormat,
}

/// Result of one batch entry.
#[derive(Debug)]
pub enum Outcome {
    Classified(OptionSnapshot, Verdict),
    Failed(String),
}

/// Classifies every raw entry, in order.
#[must_use]
pub fn classify_entries(
    classifier: &Classifier,
    entries: Vec<serde_json::Value>,
    today: NaiveDate,
) -> Vec<Outcome> {
    entries
        .into_iter()
        .enumerate()
        .map(|(index, entry)| {
            let result = parse_entry(entry, today).and_then(|snapshot| {
                let verdict = classifier.classify(&snapshot)?;
                Ok((snapshot, verdict))
            });
            match result {
                Ok((snapshot, verdict)) => Outcome::Classified(snapshot, verdict),
                Err(e) => {
                    tracing::warn!(index, error = %format!("{e:#}"), "Skipping batch entry");
                    Outcome::Failed(format!("{e:#}"))
                }
            }
        })
        .collect()
}

#[derive(Serialize)]
struct JsonEntry<'a> {
    index: usize,
    #[serde(flatten)]
    report: Option<Report<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<&'a str>,
}

/// Runs the batch command.
///
/// # Errors
/// Returns an error if the thresholds or the batch file cannot be loaded.
pub fn run_batch(args: BatchArgs) -> Result<()> {
    let classifier = load_classifier(args.config.as_deref())?;
    let entries = read_batch(&args.snapshots)?;
    let total = entries.len();

    let outcomes = classify_entries(&classifier, entries, Utc::now().date_naive());
    let failed = outcomes
        .iter()
        .filter(|o| matches!(o, Outcome::Failed(_)))
        .count();

    match args.format {
        OutputFormat::Text => {
            for (index, outcome) in outcomes.iter().enumerate() {
                match outcome {
                    Outcome::Classified(snapshot, verdict) => {
                        print!("{}", Report::new(snapshot, verdict).to_text());
                    }
                    Outcome::Failed(error) => println!("\nEntry {index}: {error}"),
                }
                println!("{}", "=".repeat(60));
            }
            println!("Classified {} of {total} snapshot(s)", total - failed);
        }
        OutputFormat::Json => {
            let json: Vec<JsonEntry<'_>> = outcomes
                .iter()
                .enumerate()
                .map(|(index, outcome)| match outcome {
                    Outcome::Classified(snapshot, verdict) => JsonEntry {
                        index,
                        report: Some(Report::new(snapshot, verdict)),
                        error: None,
                    },
                    Outcome::Failed(error) => JsonEntry {
                        index,
                        report: None,
                        error: Some(error.as_str()),
                    },
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&json)?);
        }
    }

    tracing::info!(total, failed, "Batch complete");

    if failed > 0 {
        std::process::exit(1);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use posture_core::Posture;
    use serde_json::json;

    fn entry(iv_rank: f64, bid: &str) -> serde_json::Value {
        json!({
            "price": 100,
            "strike": 100,
            "days_to_expiry": 20,
            "iv_rank": iv_rank,
            "delta": 0.4,
            "gamma": 0.02,
            "theta": -0.03,
            "bid": bid,
            "ask": "5.00",
            "objective": "speculate"
        })
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 1, 5).unwrap()
    }

    #[test]
    fn bad_entry_does_not_stop_the_batch() {
        let entries = vec![
            entry(90.0, "4.95"),
            entry(90.0, "5.50"),
            json!({"symbol": "broken"}),
            entry(10.0, "4.95"),
        ];
        let outcomes = classify_entries(&Classifier::default(), entries, today());

        assert_eq!(outcomes.len(), 4);
        assert!(matches!(&outcomes[0], Outcome::Classified(_, v) if v.posture() == Posture::SellPremium));
        assert!(matches!(&outcomes[1], Outcome::Failed(e) if e.contains("invalid snapshot")));
        assert!(matches!(&outcomes[2], Outcome::Failed(e) if e.contains("malformed")));
        assert!(matches!(&outcomes[3], Outcome::Classified(_, v) if v.posture() == Posture::BuyPremium));
    }

    #[test]
    fn json_entry_carries_either_report_or_error() {
        let outcomes = classify_entries(
            &Classifier::default(),
            vec![entry(90.0, "4.95"), entry(90.0, "5.50")],
            today(),
        );
        let Outcome::Classified(snapshot, verdict) = &outcomes[0] else {
            panic!("first entry should classify");
        };
        let ok = serde_json::to_value(JsonEntry {
            index: 0,
            report: Some(Report::new(snapshot, verdict)),
            error: None,
        })
        .unwrap();
        assert_eq!(ok["index"], 0);
        assert_eq!(ok["posture"], "sell_premium");
        assert!(ok.get("error").is_none());

        let failed = serde_json::to_value(JsonEntry {
            index: 1,
            report: None,
            error: Some("bad"),
        })
        .unwrap();
        assert_eq!(failed["error"], "bad");
        assert!(failed.get("posture").is_none());
    }
}

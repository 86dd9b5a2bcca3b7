//! Snapshot model: one observation of the underlying, one option contract and
//! the caller's intent.
//!
//! `SnapshotInput` is the raw, serde-facing record. `OptionSnapshot` is only
//! obtainable through validation, so every snapshot the engine sees already
//! satisfies its invariants.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::InvalidInput;

/// What the caller wants the position to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Objective {
    Speculate,
    Income,
    Hedge,
}

impl std::fmt::Display for Objective {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Speculate => write!(f, "speculate"),
            Self::Income => write!(f, "income"),
            Self::Hedge => write!(f, "hedge"),
        }
    }
}

/// Options contract right (call or put).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OptionRight {
    Call,
    Put,
}

impl std::fmt::Display for OptionRight {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Call => write!(f, "call"),
            Self::Put => write!(f, "put"),
        }
    }
}

/// Prevailing trend of the underlying, as judged by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Up,
    Down,
    Sideways,
}

/// Unvalidated snapshot fields as they arrive from JSON or a caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapshotInput {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub symbol: Option<String>,
    #[serde(default, alias = "option_type", skip_serializing_if = "Option::is_none")]
    pub right: Option<OptionRight>,
    /// Underlying price.
    pub price: Decimal,
    pub strike: Decimal,
    pub days_to_expiry: i64,
    /// 0..=100
    pub iv_rank: f64,
    /// Implied volatility as a decimal (0.25 = 25%).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iv: Option<f64>,
    pub delta: f64,
    pub gamma: f64,
    /// Per-day theta, usually negative for long options.
    pub theta: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vega: Option<f64>,
    pub bid: Decimal,
    pub ask: Decimal,
    #[serde(default)]
    pub upcoming_event: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub days_to_event: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trend: Option<Trend>,
    pub objective: Objective,
}

/// A validated, immutable market/option observation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "SnapshotInput", into = "SnapshotInput")]
pub struct OptionSnapshot {
    symbol: Option<String>,
    right: Option<OptionRight>,
    price: Decimal,
    strike: Decimal,
    days_to_expiry: u32,
    iv_rank: f64,
    iv: Option<f64>,
    delta: f64,
    gamma: f64,
    theta: f64,
    vega: Option<f64>,
    bid: Decimal,
    ask: Decimal,
    upcoming_event: bool,
    days_to_event: Option<u32>,
    trend: Option<Trend>,
    objective: Objective,
}

fn require_finite(field: &'static str, value: f64) -> Result<f64, InvalidInput> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(InvalidInput::NonFinite(field))
    }
}

fn require_positive(field: &'static str, value: Decimal) -> Result<Decimal, InvalidInput> {
    if value > Decimal::ZERO {
        Ok(value)
    } else {
        Err(InvalidInput::NonPositive {
            field,
            value: value.to_string(),
        })
    }
}

fn require_non_negative(field: &'static str, value: Decimal) -> Result<Decimal, InvalidInput> {
    if value < Decimal::ZERO {
        Err(InvalidInput::Negative {
            field,
            value: value.to_string(),
        })
    } else {
        Ok(value)
    }
}

impl OptionSnapshot {
    /// Validates raw fields into a snapshot.
    ///
    /// # Errors
    /// Returns the first violated invariant.
    pub fn new(input: SnapshotInput) -> Result<Self, InvalidInput> {
        let price = require_positive("price", input.price)?;
        let strike = require_positive("strike", input.strike)?;

        if input.days_to_expiry < 0 {
            return Err(InvalidInput::NegativeDte(input.days_to_expiry));
        }
        let days_to_expiry = u32::try_from(input.days_to_expiry).unwrap_or(u32::MAX);

        let iv_rank = require_finite("iv_rank", input.iv_rank)?;
        if !(0.0..=100.0).contains(&iv_rank) {
            return Err(InvalidInput::IvRankOutOfRange(iv_rank));
        }

        if let Some(iv) = input.iv {
            if require_finite("iv", iv)? < 0.0 {
                return Err(InvalidInput::Negative {
                    field: "iv",
                    value: iv.to_string(),
                });
            }
        }

        let delta = require_finite("delta", input.delta)?;
        // Allows slight broker/model rounding outside [-1, 1].
        if !(-1.05..=1.05).contains(&delta) {
            return Err(InvalidInput::DeltaOutOfRange(delta));
        }
        let gamma = require_finite("gamma", input.gamma)?;
        let theta = require_finite("theta", input.theta)?;
        if let Some(vega) = input.vega {
            require_finite("vega", vega)?;
        }

        let bid = require_non_negative("bid", input.bid)?;
        let ask = require_non_negative("ask", input.ask)?;
        if ask < bid {
            return Err(InvalidInput::CrossedQuote {
                bid: bid.to_string(),
                ask: ask.to_string(),
            });
        }

        let days_to_event = match input.days_to_event {
            Some(days) if days < 0 => return Err(InvalidInput::NegativeDaysToEvent(days)),
            Some(days) => Some(u32::try_from(days).unwrap_or(u32::MAX)),
            None => None,
        };

        Ok(Self {
            symbol: input.symbol,
            right: input.right,
            price,
            strike,
            days_to_expiry,
            iv_rank,
            iv: input.iv,
            delta,
            gamma,
            theta,
            vega: input.vega,
            bid,
            ask,
            upcoming_event: input.upcoming_event,
            days_to_event,
            trend: input.trend,
            objective: input.objective,
        })
    }

    #[must_use]
    pub fn symbol(&self) -> Option<&str> {
        self.symbol.as_deref()
    }

    #[must_use]
    pub fn right(&self) -> Option<OptionRight> {
        self.right
    }

    #[must_use]
    pub fn price(&self) -> Decimal {
        self.price
    }

    #[must_use]
    pub fn strike(&self) -> Decimal {
        self.strike
    }

    #[must_use]
    pub fn days_to_expiry(&self) -> u32 {
        self.days_to_expiry
    }

    #[must_use]
    pub fn iv_rank(&self) -> f64 {
        self.iv_rank
    }

    #[must_use]
    pub fn iv(&self) -> Option<f64> {
        self.iv
    }

    #[must_use]
    pub fn delta(&self) -> f64 {
        self.delta
    }

    #[must_use]
    pub fn gamma(&self) -> f64 {
        self.gamma
    }

    #[must_use]
    pub fn theta(&self) -> f64 {
        self.theta
    }

    #[must_use]
    pub fn vega(&self) -> Option<f64> {
        self.vega
    }

    #[must_use]
    pub fn bid(&self) -> Decimal {
        self.bid
    }

    #[must_use]
    pub fn ask(&self) -> Decimal {
        self.ask
    }

    #[must_use]
    pub fn upcoming_event(&self) -> bool {
        self.upcoming_event
    }

    #[must_use]
    pub fn days_to_event(&self) -> Option<u32> {
        self.days_to_event
    }

    #[must_use]
    pub fn trend(&self) -> Option<Trend> {
        self.trend
    }

    #[must_use]
    pub fn objective(&self) -> Objective {
        self.objective
    }

    /// Quote midpoint: (bid + ask) / 2.
    ///
    /// Halves each side first so quotes near `Decimal::MAX` cannot overflow.
    #[must_use]
    pub fn mid(&self) -> Decimal {
        self.bid / Decimal::TWO + self.ask / Decimal::TWO
    }

    /// (ask - bid) / mid, or `None` for a degenerate zero-mid quote.
    #[must_use]
    pub fn spread_ratio(&self) -> Option<f64> {
        let mid = self.mid();
        if mid.is_zero() {
            return None;
        }
        (self.ask - self.bid).checked_div(mid)?.to_f64()
    }
}

impl TryFrom<SnapshotInput> for OptionSnapshot {
    type Error = InvalidInput;

    fn try_from(input: SnapshotInput) -> Result<Self, Self::Error> {
        Self::new(input)
    }
}

impl From<OptionSnapshot> for SnapshotInput {
    fn from(s: OptionSnapshot) -> Self {
        Self {
            symbol: s.symbol,
            right: s.right,
            price: s.price,
            strike: s.strike,
            days_to_expiry: i64::from(s.days_to_expiry),
            iv_rank: s.iv_rank,
            iv: s.iv,
            delta: s.delta,
            gamma: s.gamma,
            theta: s.theta,
            vega: s.vega,
            bid: s.bid,
            ask: s.ask,
            upcoming_event: s.upcoming_event,
            days_to_event: s.days_to_event.map(i64::from),
            trend: s.trend,
            objective: s.objective,
        }
    }
}

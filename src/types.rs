// 1.0: all the primitives live here. nothing in the board works without these types.
// owner IDs, trade sides, settlement methods, units, premiums. each is a newtype
// or enum so the compiler catches mixups.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OwnerId(pub u64);

impl fmt::Display for OwnerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// Sell = offering sats for fiat. Buy = offering fiat for sats.
// fixed at creation, never changed by an edit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Sell,
    Buy,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Sell => write!(f, "sell"),
            Side::Buy => write!(f, "buy"),
        }
    }
}

// 1.1: settlement channel. the only enum an edit is allowed to change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Method {
    Lightning,
    OnChain,
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Method::Lightning => write!(f, "lightning"),
            Method::OnChain => write!(f, "onchain"),
        }
    }
}

// 1.2: amount denomination. fixed at creation; edits reuse the original unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Unit {
    Sats,
    Won,
}

impl Unit {
    pub const ALL: [Unit; 2] = [Unit::Sats, Unit::Won];
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Unit::Sats => write!(f, "sats"),
            Unit::Won => write!(f, "won"),
        }
    }
}

// 1.3: signed percentage deviation from the reference price. the sole board
// sort key. always stored rounded to 2 fractional digits, half-up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Premium(Decimal);

impl Premium {
    pub fn new(value: Decimal) -> Self {
        Self(value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero))
    }

    pub fn value(&self) -> Decimal {
        self.0
    }
}

impl fmt::Display for Premium {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.0)
    }
}

// 1.4: thousands-separated amount rendering, e.g. 1000000 → "1,000,000 sats".
// cached on the record as amount_display and recomputed whenever amount changes.
pub fn format_amount(amount: u64, unit: Unit) -> String {
    let digits = amount.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 5);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    format!("{} {}", grouped, unit)
}

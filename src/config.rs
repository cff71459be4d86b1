// 5.0 config.rs: all settings in one place. amount bounds, premium range,
// note length, snapshot location, backup retention.
// 5.1 bounds are per-unit configuration, not hard-coded constants, so units
// can diverge later.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;

use crate::types::Unit;

// Inclusive amount range for one unit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AmountLimits {
    // Minimum accepted amount
    pub min: u64,
    // Maximum accepted amount
    pub max: u64,
}

impl AmountLimits {
    pub fn contains(&self, amount: u64) -> bool {
        amount >= self.min && amount <= self.max
    }
}

// Complete configuration for one board deployment
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoardConfig {
    // Per-unit amount bounds. A unit missing from this map is rejected at validation.
    pub amount_limits: HashMap<Unit, AmountLimits>,
    // Minimum accepted premium percentage (inclusive)
    pub premium_min: Decimal,
    // Maximum accepted premium percentage (inclusive)
    pub premium_max: Decimal,
    // Maximum note length after sanitization
    pub note_max_chars: usize,
    // Canonical snapshot path
    pub snapshot_path: PathBuf,
    // Number of backup snapshots retained
    pub backup_retention: usize,
}

impl BoardConfig {
    pub fn with_snapshot_path(path: impl Into<PathBuf>) -> Self {
        Self {
            snapshot_path: path.into(),
            ..Self::default()
        }
    }

    pub fn limits_for(&self, unit: Unit) -> Option<AmountLimits> {
        self.amount_limits.get(&unit).copied()
    }
}

impl Default for BoardConfig {
    fn default() -> Self {
        let shared = AmountLimits {
            min: 1_000,
            max: 100_000_000,
        };
        Self {
            amount_limits: Unit::ALL.iter().map(|u| (*u, shared)).collect(),
            premium_min: dec!(-50.0),
            premium_max: dec!(100.0),
            note_max_chars: 200,
            snapshot_path: PathBuf::from("data/trades.json"),
            backup_retention: 3,
        }
    }
}

// 3.0 record.rs: one stated trading intent. fixed-shape struct, serde field
// names are the on-disk snapshot schema.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{format_amount, Method, OwnerId, Premium, Side, Unit};
use crate::validate::ValidatedInput;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeRecord {
    // immutable after creation
    pub owner_id: OwnerId,
    // display name snapshot at creation time, never re-synced
    pub owner_name: String,
    // immutable after creation
    pub side: Side,
    pub method: Method,
    // fixed at creation; edits validate against this unit
    pub unit: Unit,
    pub amount: u64,
    // derived from amount + unit, recomputed on every amount change
    pub amount_display: String,
    pub premium: Premium,
    pub note: String,
    // creation or most recent edit, ISO-8601
    pub updated_at: DateTime<Utc>,
}

impl TradeRecord {
    pub fn new(
        owner_id: OwnerId,
        owner_name: impl Into<String>,
        side: Side,
        method: Method,
        unit: Unit,
        input: ValidatedInput,
    ) -> Self {
        Self {
            owner_id,
            owner_name: owner_name.into(),
            side,
            method,
            unit,
            amount_display: format_amount(input.amount, unit),
            amount: input.amount,
            premium: input.premium,
            note: input.note,
            updated_at: Utc::now(),
        }
    }

    /// Applies a validated edit. Owner, side, and unit are preserved;
    /// method, amount, premium, note, and the timestamp change.
    pub fn apply_edit(&mut self, method: Method, input: ValidatedInput) {
        self.method = method;
        self.amount = input.amount;
        self.amount_display = format_amount(input.amount, self.unit);
        self.premium = input.premium;
        self.note = input.note;
        self.updated_at = Utc::now();
    }
}

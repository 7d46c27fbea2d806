//! Local rule filter
//!
//! Prunes pairs that cannot satisfy the duplicate definition before any
//! classifier budget is spent. It only ever decides negatives.

use shared::{PairVerdict, Record};
use crate::types::RuleOutcome;

pub const DIFFERENT_COMPANIES: &str = "Different companies";
pub const NO_DATE_OR_AMOUNT_MATCH: &str = "Neither close date nor amount match";

/// Evaluate the cheap rules for `(subject, other)` in order
pub fn evaluate(subject: &Record, other: &Record) -> RuleOutcome {
    if subject.primary_company() != other.primary_company() {
        return RuleOutcome::Reject(PairVerdict::rejected(other, DIFFERENT_COMPANIES));
    }

    if subject.close_date != other.close_date && subject.amount != other.amount {
        return RuleOutcome::Reject(PairVerdict::rejected(other, NO_DATE_OR_AMOUNT_MATCH));
    }

    RuleOutcome::Escalate
}

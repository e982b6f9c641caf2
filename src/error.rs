use chrono::NaiveDate;
use thiserror::Error;

/// Failures surfaced by schedule generation and amortization.
#[derive(Clone, PartialEq, Debug, Error)]
pub enum LoanError {
    /// Terms rejected before any computation runs. Carries the offending
    /// field so callers can point at the right input.
    #[error("invalid {field}: {reason}")]
    InvalidInput {
        field: &'static str,
        reason: &'static str,
    },

    /// No payment date exists after this one within the representable
    /// calendar range.
    #[error("no payment date can follow {0}")]
    DateOverflow(NaiveDate),
}

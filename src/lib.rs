//! Loan amortization over a fortnightly payment calendar that collects no
//! payments in December.

pub mod error;
pub mod loan;
pub mod schedule;

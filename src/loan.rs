use chrono::{Datelike, NaiveDate};
use log::trace;
use std::fmt;

use crate::error::LoanError;
use crate::schedule::{compute_schedule, PaymentSchedule};

/// Caller-supplied terms of a loan.
#[derive(Clone, Copy, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LoanTerms {
    /// Requested principal.
    pub capital: f64,
    /// Fixed monthly rate as a percentage (25 means 25%).
    pub rate: f64,
    /// Requested number of installments.
    pub payments: u32,
}

impl LoanTerms {
    pub fn new(capital: f64, rate: f64, payments: u32) -> Self {
        Self {
            capital,
            rate,
            payments,
        }
    }

    /// Rejects terms the engine cannot price, naming the offending field.
    pub fn validate(&self) -> Result<(), LoanError> {
        if self.payments == 0 {
            return Err(LoanError::InvalidInput {
                field: "payments",
                reason: "must be at least 1",
            });
        }
        if !self.capital.is_finite() || self.capital <= 0. {
            return Err(LoanError::InvalidInput {
                field: "capital",
                reason: "must be a positive amount",
            });
        }
        if !self.rate.is_finite() || self.rate < 0. {
            return Err(LoanError::InvalidInput {
                field: "rate",
                reason: "must be zero or a positive percentage",
            });
        }
        Ok(())
    }
}

/// Outcome of one amortization: the payment calendar plus the money figures
/// consistent with it.
#[derive(Clone, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CalculationResult {
    pub start_date: NaiveDate,
    pub months: u32,
    pub dates: Vec<NaiveDate>,
    pub interests: f64,
    pub total: f64,
    pub payment_amt: f64,
}

/// One line of a rendered schedule.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct PaymentRow {
    pub number: u32,
    pub date: NaiveDate,
    pub amount: f64,
}

impl fmt::Display for PaymentRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "pmt number {}, date {}, amount ${:.2}",
            self.number, self.date, self.amount
        )
    }
}

impl CalculationResult {
    /// Rows for a rendering sink, numbered from 1. December dates never
    /// reach the payer, so they are filtered again here even though the
    /// schedule correction already accounted for them.
    pub fn rows(&self) -> Vec<PaymentRow> {
        self.dates
            .iter()
            .filter(|date| date.month() != 12)
            .enumerate()
            .map(|(index, &date)| PaymentRow {
                number: index as u32 + 1,
                date,
                amount: self.payment_amt,
            })
            .collect()
    }

    pub fn show_schedule(&self) {
        for row in self.rows() {
            println!("{}", row);
        }
    }
}

// round amt up to dec decimal places; installments round toward the lender
fn round_up(amt: f64, dec: f64) -> f64 {
    (amt * 10_f64.powf(dec)).ceil() / 10_f64.powf(dec)
}

/// Prices a loan over the fortnightly calendar.
///
/// The interest accrues per month of the corrected calendar, each
/// installment rounds up to the cent, and the total and interests are then
/// restated from the rounded installment so the three figures agree.
pub fn amortize(terms: &LoanTerms, start_date: NaiveDate) -> Result<CalculationResult, LoanError> {
    terms.validate()?;

    let PaymentSchedule { dates, months, .. } = compute_schedule(terms.payments, start_date)?;

    let interests = terms.capital * (terms.rate / 100.) * f64::from(months);
    let total = interests + terms.capital;
    trace!(
        "months {}, raw interests {}, raw total {}",
        months,
        interests,
        total
    );

    let payment_amt = round_up(total / f64::from(terms.payments), 2.);
    let total = payment_amt * f64::from(terms.payments);
    let interests = total - terms.capital;

    Ok(CalculationResult {
        start_date,
        months,
        dates,
        interests,
        total,
        payment_amt,
    })
}

#[cfg(test)]
mod tests {
    use super::{amortize, round_up, LoanTerms};
    use crate::error::LoanError;
    use chrono::NaiveDate;
    use test_log::test;

    fn ymd(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    #[test]
    fn test_round_up() {
        assert_eq!(round_up(416.666666, 2.), 416.67);
        assert_eq!(round_up(285.7142857142857, 2.), 285.72);
        // whole cents pass through
        assert_eq!(round_up(500., 2.), 500.);
    }

    #[test]
    fn test_amortize_one_payment() {
        let terms = LoanTerms::new(1000., 25., 1);
        let result = amortize(&terms, ymd(2024, 1, 1)).unwrap();

        assert_eq!(result.start_date, ymd(2024, 1, 1));
        assert_eq!(result.months, 1);
        assert_eq!(result.dates, vec![ymd(2024, 1, 28)]);
        assert_eq!(result.payment_amt, 1250.);
        assert_eq!(result.total, 1250.);
        assert_eq!(result.interests, 250.);
    }

    #[test]
    fn test_amortize_three_payments() {
        let terms = LoanTerms::new(1000., 25., 3);
        let result = amortize(&terms, ymd(2024, 1, 1)).unwrap();

        assert_eq!(result.months, 2);
        assert_eq!(result.payment_amt, 500.);
        assert_eq!(result.total, 1500.);
        assert_eq!(result.interests, 500.);
    }

    #[test]
    fn test_amortize_rounds_up_to_the_cent() {
        let terms = LoanTerms::new(1000., 25., 7);
        let result = amortize(&terms, ymd(2024, 1, 1)).unwrap();

        assert_eq!(result.months, 4);
        assert_eq!(result.payment_amt, 285.72);
        assert!((result.total - 2000.04).abs() < 1e-9);
        assert!((result.interests - 1000.04).abs() < 1e-9);
        // the restated figures stay mutually consistent
        assert_eq!(result.total, result.payment_amt * 7.);
        assert_eq!(result.interests, result.total - terms.capital);
    }

    #[test]
    fn test_amortize_around_december() {
        let terms = LoanTerms::new(1000., 25., 2);
        let result = amortize(&terms, ymd(2024, 11, 20)).unwrap();

        assert_eq!(result.months, 2);
        assert_eq!(result.dates.len(), 4);
        assert_eq!(result.payment_amt, 750.);

        let rows = result.rows();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].number, 1);
        assert_eq!(rows[0].date, ymd(2025, 1, 15));
        assert_eq!(rows[1].number, 2);
        assert_eq!(rows[1].date, ymd(2025, 1, 28));
        assert_eq!(rows[0].amount, result.payment_amt);
    }

    #[test]
    fn test_invalid_terms_are_rejected() {
        let start = ymd(2024, 1, 1);

        assert!(matches!(
            amortize(&LoanTerms::new(1000., 25., 0), start),
            Err(LoanError::InvalidInput {
                field: "payments",
                ..
            })
        ));
        assert!(matches!(
            amortize(&LoanTerms::new(0., 25., 3), start),
            Err(LoanError::InvalidInput { field: "capital", .. })
        ));
        assert!(matches!(
            amortize(&LoanTerms::new(f64::NAN, 25., 3), start),
            Err(LoanError::InvalidInput { field: "capital", .. })
        ));
        assert!(matches!(
            amortize(&LoanTerms::new(1000., -1., 3), start),
            Err(LoanError::InvalidInput { field: "rate", .. })
        ));
    }

    #[test]
    fn test_overflow_is_reported() {
        let terms = LoanTerms::new(1000., 25., 4);
        assert!(matches!(
            amortize(&terms, NaiveDate::MAX),
            Err(LoanError::DateOverflow(_))
        ));
    }

    #[test]
    fn test_display_row() {
        let terms = LoanTerms::new(1000., 25., 1);
        let result = amortize(&terms, ymd(2024, 1, 1)).unwrap();
        assert_eq!(
            result.rows()[0].to_string(),
            "pmt number 1, date 2024-01-28, amount $1250.00"
        );
    }
}

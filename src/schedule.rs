use chrono::{Datelike, NaiveDate};
use log::{trace, warn};

use crate::error::LoanError;

const DECEMBER: u32 = 12;

/// One payment calendar: the corrected fortnight dates, the month count
/// derived from them and the start date they were generated from.
///
/// December entries stay in `dates` so the fortnight count (and with it the
/// month count) is preserved; [`PaymentSchedule::payment_dates`] is the view
/// a payer actually sees.
#[derive(Clone, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PaymentSchedule {
    pub start_date: NaiveDate,
    pub dates: Vec<NaiveDate>,
    pub months: u32,
}

impl PaymentSchedule {
    /// Dates a payment is actually collected on. No payment is collected in
    /// December.
    pub fn payment_dates(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.dates.iter().copied().filter(|date| date.month() != DECEMBER)
    }
}

/// Returns the next semi-monthly payment date.
///
/// The 15th or earlier advances to the 28th of the same month, anything
/// later advances to the 15th of the next month, rolling the year at
/// December. The next-month branch can land in December; the corrector
/// accounts for that, not this function.
pub fn next_fortnight(date: NaiveDate) -> Result<NaiveDate, LoanError> {
    let next = if date.day() <= 15 {
        NaiveDate::from_ymd_opt(date.year(), date.month(), 28)
    } else if date.month() == DECEMBER {
        NaiveDate::from_ymd_opt(date.year() + 1, 1, 15)
    } else {
        NaiveDate::from_ymd_opt(date.year(), date.month() + 1, 15)
    };
    next.ok_or(LoanError::DateOverflow(date))
}

/// Produces exactly `fortnights` dates by repeatedly stepping from
/// `start_date`. The start date itself is never part of the sequence.
pub fn dates_from_fortnights(
    fortnights: usize,
    start_date: NaiveDate,
) -> Result<Vec<NaiveDate>, LoanError> {
    let mut dates = Vec::with_capacity(fortnights);
    let mut current = start_date;

    for number in 1..=fortnights {
        current = next_fortnight(current)?;
        trace!("fortnight {}: {}", number, current);
        dates.push(current);
    }
    Ok(dates)
}

/// Total fortnights once December is accounted for. Any December occurrence
/// adds two fortnights of compensation, one per skipped payment, flat
/// regardless of how many dates landed there.
pub fn fix_decembers(dates: &[NaiveDate]) -> usize {
    if dates.iter().any(|date| date.month() == DECEMBER) {
        dates.len() + 2
    } else {
        dates.len()
    }
}

fn december_count(dates: &[NaiveDate]) -> usize {
    dates.iter().filter(|date| date.month() == DECEMBER).count()
}

/// Builds the payment calendar for `payments` installments after
/// `start_date`.
///
/// The December correction runs once: the naive sequence is inspected, the
/// count grows by two if a December was hit, and the sequence is regenerated
/// at the new length. A regenerated tail can cross a second December the
/// single pass never saw; that historical behavior is kept and logged, and
/// [`compute_schedule_exact`] closes the gap.
pub fn compute_schedule(
    payments: u32,
    start_date: NaiveDate,
) -> Result<PaymentSchedule, LoanError> {
    let naive = dates_from_fortnights(payments as usize, start_date)?;
    let corrected = fix_decembers(&naive);
    let dates = dates_from_fortnights(corrected, start_date)?;

    let delivered = dates.len() - december_count(&dates);
    if delivered < payments as usize {
        warn!(
            "single-pass december correction from {} covers {} of {} payments",
            start_date, delivered, payments
        );
    }

    let months = dates.len().div_ceil(2) as u32;
    Ok(PaymentSchedule {
        start_date,
        dates,
        months,
    })
}

/// Fixed-point variant of [`compute_schedule`]: grows the fortnight count
/// until the calendar holds exactly `payments` collectable dates, however
/// many Decembers the tail crosses.
pub fn compute_schedule_exact(
    payments: u32,
    start_date: NaiveDate,
) -> Result<PaymentSchedule, LoanError> {
    let mut count = payments as usize;
    let mut dates = dates_from_fortnights(count, start_date)?;

    loop {
        let needed = payments as usize + december_count(&dates);
        if needed == count {
            break;
        }
        trace!("extending schedule {} -> {} fortnights", count, needed);
        count = needed;
        dates = dates_from_fortnights(count, start_date)?;
    }

    let months = dates.len().div_ceil(2) as u32;
    Ok(PaymentSchedule {
        start_date,
        dates,
        months,
    })
}

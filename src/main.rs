#![allow(unused_imports, dead_code)]
use chrono::Local;
use loancalc::loan::{amortize, CalculationResult, LoanTerms};
use log::{info, warn};
use simple_logger::SimpleLogger;

fn display_currency(amount: f64) -> String {
    format!("B/. {:.2}", amount)
}

fn main() {
    SimpleLogger::new()
        .with_level(log::LevelFilter::Info)
        .init()
        .unwrap();

    let terms = LoanTerms::new(1000.0, 25.0, 6);
    // the clock is read exactly once; the calculator only sees this value
    let today = Local::now().date_naive();

    match amortize(&terms, today) {
        Ok(result) => {
            println!(
                "Loan of {} at {}% monthly over {} payments",
                display_currency(terms.capital),
                terms.rate,
                terms.payments
            );
            println!("Interests: {}", display_currency(result.interests));
            println!("Total:     {}", display_currency(result.total));
            for row in result.rows() {
                println!(
                    "{:>3}  {}  {}",
                    row.number,
                    row.date.format("%A, %B %-d, %Y"),
                    display_currency(row.amount)
                );
            }
        }
        Err(err) => eprintln!("calculation failed: {}", err),
    }
}

// verifies that types can implement the gated traits below
fn is_normal<T: Sized + Send + Sync + Unpin>() {}

#[test]
fn normal_types() {
    is_normal::<CalculationResult>();
}

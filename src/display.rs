//! Text rendering of amounts and records for the console.

use std::sync::OnceLock;

use numfmt::{Formatter, Precision};

use crate::repository::StoredRow;

/// Format `number` as rupiah rounded to the nearest whole unit, e.g. "Rp 1,344,000".
pub fn format_rupiah(number: f64) -> String {
    static FMT: OnceLock<Formatter> = OnceLock::new();

    let fmt = FMT.get_or_init(|| {
        Formatter::currency("Rp ")
            .expect("currency prefix is within the numfmt length limit")
            .precision(Precision::Decimals(0))
    });

    let number = number.round();

    if number == 0.0 {
        // Zero is hardcoded as "0", so we must specify the formatted string for zero
        "Rp 0".to_owned()
    } else if number < 0.0 {
        format!("-{}", format_rupiah(number.abs()))
    } else if number >= NUMFMT_EXPONENT_THRESHOLD {
        format!("Rp {}", group_thousands(&format!("{number:.0}")))
    } else {
        fmt.fmt_string(number)
    }
}

/// numfmt switches to exponent notation from here on, dropping digits.
const NUMFMT_EXPONENT_THRESHOLD: f64 = 1e12;

/// Insert a comma between every group of three digits, e.g. "1234567" -> "1,234,567".
fn group_thousands(digits: &str) -> String {
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);

    for (i, digit) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }

        grouped.push(digit);
    }

    grouped
}

/// Format an interest rate with a percent sign, e.g. "12%" or "9.75%".
pub fn format_percent(rate_percent: f64) -> String {
    format!("{rate_percent}%")
}

/// Describe a stored transaction on a single line.
///
/// Loan details are only shown for rows that have them.
pub fn describe(row: &StoredRow) -> String {
    let mut line = format!(
        "ID: {}, Name: {}, Type: {}, Amount: {}",
        row.id,
        row.name,
        row.transaction_type,
        format_rupiah(row.amount)
    );

    if let Some(term_months) = row.term_months {
        line.push_str(&format!(", Term: {term_months} months"));
    }

    if let Some(rate_percent) = row.rate_percent {
        line.push_str(&format!(", Interest: {}", format_percent(rate_percent)));
    }

    if let Some(total_repayment) = row.total_repayment {
        line.push_str(&format!(
            ", Total Repayment: {}",
            format_rupiah(total_repayment)
        ));
    }

    if let Some(monthly_installment) = row.monthly_installment {
        line.push_str(&format!(
            ", Installment/Month: {}",
            format_rupiah(monthly_installment)
        ));
    }

    line.push_str(&format!(", Date: {}", row.created_at));

    line
}

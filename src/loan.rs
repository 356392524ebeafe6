//! Interest and repayment calculations for loans.

/// The term and annual interest rate of a loan.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LoanTerms {
    /// How many monthly installments the loan is repaid over.
    pub term_months: i64,
    /// The annual interest rate in percent, e.g. `12.0` for 12%.
    pub rate_percent: f64,
}

/// The amounts derived from a loan's principal and [LoanTerms].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LoanSummary {
    /// Principal plus interest, rounded to a whole currency unit.
    pub total_repayment: f64,
    /// The rounded total split evenly over the term, rounded again.
    pub monthly_installment: f64,
}

/// The interest charged per month at full precision.
pub fn monthly_interest(amount: f64, rate_percent: f64) -> f64 {
    amount * (rate_percent / 100.0) / 12.0
}

/// Principal plus flat monthly interest over the whole term.
///
/// Rounds half away from zero.
pub fn total_repayment(amount: f64, terms: LoanTerms) -> f64 {
    (amount + monthly_interest(amount, terms.rate_percent) * terms.term_months as f64).round()
}

/// Calculate the repayment figures for a loan of `amount`.
///
/// The installment is derived from the already rounded total, so
/// `monthly_installment * term_months` may differ from `total_repayment` by
/// up to `term_months`.
///
/// The caller must ensure `terms.term_months` is positive, which
/// record validation guarantees.
pub fn calculate(amount: f64, terms: LoanTerms) -> LoanSummary {
    let total_repayment = total_repayment(amount, terms);
    let monthly_installment = (total_repayment / terms.term_months as f64).round();

    LoanSummary {
        total_repayment,
        monthly_installment,
    }
}

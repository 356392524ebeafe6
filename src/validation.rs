//! Field checks applied to raw input before a transaction record is built.
//!
//! Every check is a pure function. The same checks run when a record is
//! created and when it is updated.

use std::{fmt::Display, str::FromStr};

use crate::database_id::TransactionId;

/// The smallest principal accepted for a loan.
pub const MIN_LOAN_AMOUNT: f64 = 100_000.0;

/// The reasons a field can be rejected.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    /// The transaction ID was zero or negative.
    #[error("transaction ID must be greater than 0")]
    InvalidId,

    /// The member name was empty after trimming whitespace.
    #[error("name cannot be empty")]
    EmptyName,

    /// The transaction type was not one of the two known labels.
    #[error("invalid transaction type \"{0}\", must be 'Simpanan' or 'Peminjaman'")]
    InvalidType(String),

    /// The amount was zero or negative.
    #[error("amount must be greater than 0")]
    NonPositiveAmount,

    /// The amount was infinite.
    #[error("amount must be a finite number")]
    NonFiniteAmount,

    /// A loan was requested for less than [MIN_LOAN_AMOUNT].
    #[error("loan amount cannot be less than 100,000")]
    LoanBelowMinimum,

    /// The loan term was zero or negative.
    #[error("the loan term must be more than 0 months")]
    NonPositiveTerm,

    /// The interest rate was zero or negative.
    #[error("the interest rate must be greater than 0")]
    NonPositiveRate,

    /// The interest rate was infinite.
    #[error("the interest rate must be a finite number")]
    NonFiniteRate,

    /// The loan's repayment figures overflowed.
    #[error("the loan is too large to calculate its repayment")]
    LoanTooLarge,
}

/// Whether money is paid into the cooperative or lent out by it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransactionType {
    /// A savings deposit ("Simpanan").
    Deposit,
    /// A loan ("Peminjaman").
    Loan,
}

impl TransactionType {
    /// The canonical label written to storage.
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Deposit => "Simpanan",
            TransactionType::Loan => "Peminjaman",
        }
    }
}

impl FromStr for TransactionType {
    type Err = ValidationError;

    /// Parse a transaction type, ignoring case and surrounding whitespace.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let label = s.trim();

        if label.eq_ignore_ascii_case("Simpanan") {
            Ok(TransactionType::Deposit)
        } else if label.eq_ignore_ascii_case("Peminjaman") {
            Ok(TransactionType::Loan)
        } else {
            Err(ValidationError::InvalidType(label.to_owned()))
        }
    }
}

impl Display for TransactionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A validated member name, trimmed and upper-cased.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MemberName(String);

impl MemberName {
    /// Create a member name.
    ///
    /// # Errors
    ///
    /// This function will return a [ValidationError::EmptyName] if `name` is
    /// empty or only whitespace.
    pub fn new(name: &str) -> Result<Self, ValidationError> {
        let name = name.trim();

        if name.is_empty() {
            Err(ValidationError::EmptyName)
        } else {
            Ok(Self(name.to_uppercase()))
        }
    }
}

impl AsRef<str> for MemberName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Display for MemberName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Check that `id` is positive.
pub fn validate_id(id: TransactionId) -> Result<TransactionId, ValidationError> {
    if id > 0 {
        Ok(id)
    } else {
        Err(ValidationError::InvalidId)
    }
}

/// Check that `amount` is positive and, for loans, at least [MIN_LOAN_AMOUNT].
pub fn validate_amount(
    amount: f64,
    transaction_type: TransactionType,
) -> Result<f64, ValidationError> {
    match amount {
        amount if amount.is_nan() || amount <= 0.0 => Err(ValidationError::NonPositiveAmount),
        amount if amount.is_infinite() => Err(ValidationError::NonFiniteAmount),
        amount if transaction_type == TransactionType::Loan && amount < MIN_LOAN_AMOUNT => {
            Err(ValidationError::LoanBelowMinimum)
        }
        amount => Ok(amount),
    }
}

/// Check that a loan term in months is positive.
pub fn validate_term(term_months: i64) -> Result<i64, ValidationError> {
    if term_months > 0 {
        Ok(term_months)
    } else {
        Err(ValidationError::NonPositiveTerm)
    }
}

/// Check that an annual interest rate in percent is positive and finite.
pub fn validate_rate(rate_percent: f64) -> Result<f64, ValidationError> {
    match rate_percent {
        rate if rate.is_nan() || rate <= 0.0 => Err(ValidationError::NonPositiveRate),
        rate if rate.is_infinite() => Err(ValidationError::NonFiniteRate),
        rate => Ok(rate),
    }
}



#[cfg(test)]
mod field_tests {
    use super::{
        TransactionType, ValidationError, validate_amount, validate_id, validate_rate,
        validate_term,
    };

    #[test]
    fn id_must_be_positive() {
        assert_eq!(validate_id(1), Ok(1));
        assert_eq!(validate_id(0), Err(ValidationError::InvalidId));
        assert_eq!(validate_id(-7), Err(ValidationError::InvalidId));
    }

    #[test]
    fn amount_must_be_positive() {
        assert_eq!(
            validate_amount(0.0, TransactionType::Deposit),
            Err(ValidationError::NonPositiveAmount)
        );
        assert_eq!(
            validate_amount(-10.0, TransactionType::Loan),
            Err(ValidationError::NonPositiveAmount)
        );
        assert_eq!(
            validate_amount(f64::NAN, TransactionType::Deposit),
            Err(ValidationError::NonPositiveAmount)
        );
    }

    #[test]
    fn deposit_has_no_minimum() {
        assert_eq!(validate_amount(50_000.0, TransactionType::Deposit), Ok(50_000.0));
    }

    #[test]
    fn loan_below_minimum_is_rejected() {
        assert_eq!(
            validate_amount(50_000.0, TransactionType::Loan),
            Err(ValidationError::LoanBelowMinimum)
        );
        assert_eq!(
            validate_amount(99_999.99, TransactionType::Loan),
            Err(ValidationError::LoanBelowMinimum)
        );
    }

    #[test]
    fn loan_at_minimum_is_accepted() {
        assert_eq!(validate_amount(100_000.0, TransactionType::Loan), Ok(100_000.0));
    }

    #[test]
    fn term_and_rate_must_be_positive() {
        assert_eq!(validate_term(12), Ok(12));
        assert_eq!(validate_term(0), Err(ValidationError::NonPositiveTerm));
        assert_eq!(validate_rate(1.5), Ok(1.5));
        assert_eq!(validate_rate(0.0), Err(ValidationError::NonPositiveRate));
        assert_eq!(validate_rate(-2.0), Err(ValidationError::NonPositiveRate));
        assert_eq!(validate_rate(f64::NAN), Err(ValidationError::NonPositiveRate));
    }

    #[test]
    fn infinite_values_are_rejected() {
        assert_eq!(
            validate_amount(f64::INFINITY, TransactionType::Deposit),
            Err(ValidationError::NonFiniteAmount)
        );
        assert_eq!(
            validate_amount(f64::INFINITY, TransactionType::Loan),
            Err(ValidationError::NonFiniteAmount)
        );
        assert_eq!(
            validate_rate(f64::INFINITY),
            Err(ValidationError::NonFiniteRate)
        );
    }
}

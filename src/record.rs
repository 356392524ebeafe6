//! The transaction record and how it is assembled from raw input.

use time::{PrimitiveDateTime, format_description::BorrowedFormatItem, macros::format_description};

use crate::{
    Error,
    database_id::TransactionId,
    loan::{self, LoanSummary, LoanTerms},
    validation::{
        MemberName, TransactionType, ValidationError, validate_amount, validate_id, validate_rate,
        validate_term,
    },
};

/// How creation timestamps are written to storage and shown to the operator.
pub const TIMESTAMP_FORMAT: &[BorrowedFormatItem<'static>] =
    format_description!("[year]-[month]-[day] [hour]:[minute]:[second]");

/// Format `timestamp` as `yyyy-MM-dd HH:mm:ss`.
///
/// # Errors
///
/// Returns an [Error::InvalidTimestamp] if the timestamp cannot be formatted.
pub fn format_timestamp(timestamp: PrimitiveDateTime) -> Result<String, Error> {
    timestamp
        .format(TIMESTAMP_FORMAT)
        .map_err(|error| Error::InvalidTimestamp(error.to_string()))
}

/// Parse a `yyyy-MM-dd HH:mm:ss` timestamp.
///
/// # Errors
///
/// Returns an [Error::InvalidTimestamp] if `text` is not in the expected format.
pub fn parse_timestamp(text: &str) -> Result<PrimitiveDateTime, Error> {
    PrimitiveDateTime::parse(text, TIMESTAMP_FORMAT)
        .map_err(|error| Error::InvalidTimestamp(format!("\"{text}\": {error}")))
}

/// A deposit, or a loan along with its repayment terms.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TransactionKind {
    /// Money paid into the cooperative.
    Deposit,
    /// Money lent out by the cooperative.
    Loan(LoanTerms),
}

impl TransactionKind {
    /// The type label this kind is stored under.
    pub fn transaction_type(&self) -> TransactionType {
        match self {
            TransactionKind::Deposit => TransactionType::Deposit,
            TransactionKind::Loan(_) => TransactionType::Loan,
        }
    }

    /// The loan terms, or `None` for a deposit.
    pub fn loan_terms(&self) -> Option<LoanTerms> {
        match self {
            TransactionKind::Deposit => None,
            TransactionKind::Loan(terms) => Some(*terms),
        }
    }
}

/// A validated deposit or loan.
///
/// To create a new `TransactionRecord`, use [TransactionRecord::build].
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionRecord {
    id: TransactionId,
    name: MemberName,
    kind: TransactionKind,
    amount: f64,
    created_at: PrimitiveDateTime,
}

impl TransactionRecord {
    /// Start building a record from raw input.
    ///
    /// Shortcut for [TransactionBuilder] for discoverability.
    pub fn build(
        id: TransactionId,
        name: &str,
        transaction_type: &str,
        amount: f64,
    ) -> TransactionBuilder {
        TransactionBuilder {
            id,
            name: name.to_owned(),
            transaction_type: transaction_type.to_owned(),
            amount,
            term_months: None,
            rate_percent: None,
        }
    }

    /// The caller-supplied identifier.
    pub fn id(&self) -> TransactionId {
        self.id
    }

    /// The member's name, trimmed and upper-cased.
    pub fn name(&self) -> &MemberName {
        &self.name
    }

    /// Whether this is a deposit or a loan.
    pub fn kind(&self) -> TransactionKind {
        self.kind
    }

    /// The deposited amount or the loan principal.
    pub fn amount(&self) -> f64 {
        self.amount
    }

    /// When the record was first created.
    pub fn created_at(&self) -> PrimitiveDateTime {
        self.created_at
    }

    /// The total repayment and monthly installment of a loan.
    ///
    /// Always `None` for deposits, which have no repayment rather than a
    /// repayment of zero.
    pub fn loan_summary(&self) -> Option<LoanSummary> {
        self.kind
            .loan_terms()
            .map(|terms| loan::calculate(self.amount, terms))
    }
}

/// Raw, unvalidated input for a [TransactionRecord].
///
/// Call [TransactionBuilder::finalise] to validate the input and create the
/// record. The same path is used for new records and for updates, which pass
/// in the original creation time.
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionBuilder {
    /// Must be positive.
    pub id: TransactionId,
    /// Must not be blank. Normalised to trimmed upper case.
    pub name: String,
    /// "Simpanan" or "Peminjaman" in any case.
    pub transaction_type: String,
    /// Must be positive, and at least 100,000 for loans.
    pub amount: f64,
    /// Required for loans, ignored for deposits.
    pub term_months: Option<i64>,
    /// Required for loans, ignored for deposits.
    pub rate_percent: Option<f64>,
}

impl TransactionBuilder {
    /// Set the term and annual interest rate of a loan.
    pub fn loan_terms(mut self, term_months: i64, rate_percent: f64) -> Self {
        self.term_months = Some(term_months);
        self.rate_percent = Some(rate_percent);
        self
    }

    /// Validate the input and create the record.
    ///
    /// Fields are checked in input order and the first failure is returned.
    ///
    /// # Errors
    ///
    /// Returns the [ValidationError] of the first invalid field. A loan
    /// without a term or rate fails with [ValidationError::NonPositiveTerm]
    /// or [ValidationError::NonPositiveRate].
    pub fn finalise(
        self,
        created_at: PrimitiveDateTime,
    ) -> Result<TransactionRecord, ValidationError> {
        let id = validate_id(self.id)?;
        let name = MemberName::new(&self.name)?;
        let transaction_type: TransactionType = self.transaction_type.parse()?;
        let amount = validate_amount(self.amount, transaction_type)?;

        let kind = match transaction_type {
            TransactionType::Deposit => TransactionKind::Deposit,
            TransactionType::Loan => {
                let term_months = validate_term(self.term_months.unwrap_or(0))?;
                let rate_percent = validate_rate(self.rate_percent.unwrap_or(0.0))?;
                let terms = LoanTerms {
                    term_months,
                    rate_percent,
                };

                let summary = loan::calculate(amount, terms);
                if !summary.total_repayment.is_finite() || !summary.monthly_installment.is_finite() {
                    return Err(ValidationError::LoanTooLarge);
                }

                TransactionKind::Loan(terms)
            }
        };

        Ok(TransactionRecord {
            id,
            name,
            kind,
            amount,
            created_at,
        })
    }
}

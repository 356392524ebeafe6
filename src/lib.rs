//! Koperasi is a console tool for recording the deposits ("Simpanan") and
//! loans ("Peminjaman") of a savings and loan cooperative.
//!
//! Records are validated and normalised before they are stored in SQLite.
//! Loans carry a total repayment and monthly installment derived from the
//! principal, term and annual interest rate.

#![warn(missing_docs)]

mod console;
mod database_id;
mod db;
mod display;
mod loan;
mod logging;
mod record;
mod repository;
mod timezone;
mod validation;

pub use console::{Console, LineInput, StdinInput};
pub use database_id::{RowsAffected, TransactionId};
pub use db::initialize as initialize_db;
pub use loan::{LoanSummary, LoanTerms};
pub use logging::setup_logging;
pub use record::{TransactionBuilder, TransactionKind, TransactionRecord};
pub use repository::{SQLiteTransactionRepository, StoredRow, TransactionRepository};
pub use timezone::{Clock, LocalClock};
pub use validation::{MIN_LOAN_AMOUNT, MemberName, TransactionType, ValidationError};

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// A field failed validation.
    ///
    /// Interactive callers should report the message and ask for the field
    /// again.
    #[error("{0}")]
    Validation(#[from] ValidationError),

    /// The requested transaction was not found.
    ///
    /// Internally, this error may occur when a query returns no rows.
    #[error("the requested transaction could not be found")]
    NotFound,

    /// A transaction with the given ID already exists in the database.
    #[error("a transaction with the ID {0} already exists")]
    DuplicateId(TransactionId),

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),

    /// The configured timezone is not a valid, canonical timezone string.
    #[error("invalid timezone {0}")]
    InvalidTimezone(String),

    /// A timestamp could not be formatted or parsed.
    #[error("invalid timestamp {0}")]
    InvalidTimestamp(String),

    /// The operator's input stream was closed.
    #[error("the input stream was closed")]
    InputClosed,

    /// Reading from or writing to the console failed.
    #[error("console I/O failed: {0}")]
    Io(String),
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound,
            error => {
                tracing::error!("an unhandled SQL error occurred: {}", error);
                Error::SqlError(error)
            }
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(value: std::io::Error) -> Self {
        Error::Io(value.to_string())
    }
}

//! Database ID type definition.

/// The caller-supplied primary key of a transaction record.
pub type TransactionId = i64;

/// The number of rows changed by an `UPDATE` or `DELETE`.
pub type RowsAffected = usize;

//! Persistence for transaction records.

use rusqlite::{Connection, OptionalExtension, Row, params};

use crate::{
    Error,
    database_id::{RowsAffected, TransactionId},
    record::{TransactionRecord, format_timestamp, parse_timestamp},
};

/// A row of the `transaksi` table as it is stored.
///
/// The loan-only columns are `None` for deposits.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredRow {
    /// `id`
    pub id: TransactionId,
    /// `nama`
    pub name: String,
    /// `jenis_transaksi`
    pub transaction_type: String,
    /// `jumlah`
    pub amount: f64,
    /// `cicilan_per_bulan`
    pub term_months: Option<i64>,
    /// `bunga_per_persen`
    pub rate_percent: Option<f64>,
    /// `tanggal_transaksi`
    pub created_at: String,
    /// `total_pinjaman`
    pub total_repayment: Option<f64>,
    /// `angsuran_per_bulan`
    pub monthly_installment: Option<f64>,
}

impl TryFrom<&TransactionRecord> for StoredRow {
    type Error = Error;

    fn try_from(record: &TransactionRecord) -> Result<Self, Self::Error> {
        let terms = record.kind().loan_terms();
        let summary = record.loan_summary();

        Ok(Self {
            id: record.id(),
            name: record.name().to_string(),
            transaction_type: record.kind().transaction_type().to_string(),
            amount: record.amount(),
            term_months: terms.map(|terms| terms.term_months),
            rate_percent: terms.map(|terms| terms.rate_percent),
            created_at: format_timestamp(record.created_at())?,
            total_repayment: summary.map(|summary| summary.total_repayment),
            monthly_installment: summary.map(|summary| summary.monthly_installment),
        })
    }
}

impl TryFrom<StoredRow> for TransactionRecord {
    type Error = Error;

    /// Rebuild a record from a stored row.
    ///
    /// The row is validated again and the loan amounts are recalculated, the
    /// stored derived columns are not read.
    fn try_from(row: StoredRow) -> Result<Self, Self::Error> {
        let mut builder =
            TransactionRecord::build(row.id, &row.name, &row.transaction_type, row.amount);
        builder.term_months = row.term_months;
        builder.rate_percent = row.rate_percent;

        let created_at = parse_timestamp(&row.created_at)?;

        builder.finalise(created_at).map_err(Error::from)
    }
}

/// Create, read, update and delete transaction records.
///
/// Each operation is committed on its own.
pub trait TransactionRepository {
    /// Store a new record.
    ///
    /// # Errors
    /// Implementers should return [Error::DuplicateId] if a record with the
    /// same ID already exists.
    fn insert(&mut self, record: &TransactionRecord) -> Result<(), Error>;

    /// Retrieve the row with `id`, or `None` if there is no such row.
    fn find_by_id(&self, id: TransactionId) -> Result<Option<StoredRow>, Error>;

    /// Overwrite the name, type, amount, loan terms and derived loan amounts
    /// of row `id` with those of `record`. The creation time is left as is.
    fn update_by_id(
        &mut self,
        id: TransactionId,
        record: &TransactionRecord,
    ) -> Result<RowsAffected, Error>;

    /// Delete the row with `id`.
    fn delete_by_id(&mut self, id: TransactionId) -> Result<RowsAffected, Error>;

    /// Retrieve every row, ordered by ID.
    fn list_all(&self) -> Result<Vec<StoredRow>, Error>;
}

/// Stores transaction records in a SQLite database.
///
/// The `transaksi` table must already exist, see [crate::initialize_db].
#[derive(Debug)]
pub struct SQLiteTransactionRepository {
    connection: Connection,
}

impl SQLiteTransactionRepository {
    /// Create a new repository for the SQLite `connection`.
    pub fn new(connection: Connection) -> Self {
        Self { connection }
    }
}

impl TransactionRepository for SQLiteTransactionRepository {
    /// Insert `record` into the database.
    ///
    /// # Errors
    /// This function will return a:
    /// - [Error::DuplicateId] if a transaction with the same ID already exists,
    /// - [Error::InvalidTimestamp] if the creation time cannot be formatted,
    /// - or [Error::SqlError] if there is some other SQL error.
    fn insert(&mut self, record: &TransactionRecord) -> Result<(), Error> {
        let row = StoredRow::try_from(record)?;

        self.connection
            .execute(
                "INSERT INTO transaksi (id, nama, jenis_transaksi, jumlah, cicilan_per_bulan, \
                 bunga_per_persen, tanggal_transaksi, total_pinjaman, angsuran_per_bulan)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
                params![
                    row.id,
                    row.name,
                    row.transaction_type,
                    row.amount,
                    row.term_months,
                    row.rate_percent,
                    row.created_at,
                    row.total_repayment,
                    row.monthly_installment,
                ],
            )
            .map_err(|error| match error {
                rusqlite::Error::SqliteFailure(
                    rusqlite::ffi::Error {
                        code: _,
                        extended_code: rusqlite::ffi::SQLITE_CONSTRAINT_PRIMARYKEY,
                    },
                    _,
                ) => Error::DuplicateId(row.id),
                error => error.into(),
            })?;

        tracing::info!("Inserted {} transaction {}", row.transaction_type, row.id);

        Ok(())
    }

    fn find_by_id(&self, id: TransactionId) -> Result<Option<StoredRow>, Error> {
        tracing::debug!("Looking up transaction {id}");

        self.connection
            .prepare(
                "SELECT id, nama, jenis_transaksi, jumlah, cicilan_per_bulan, bunga_per_persen, \
                 tanggal_transaksi, total_pinjaman, angsuran_per_bulan
                 FROM transaksi WHERE id = :id",
            )?
            .query_row(&[(":id", &id)], map_stored_row)
            .optional()
            .map_err(Error::from)
    }

    fn update_by_id(
        &mut self,
        id: TransactionId,
        record: &TransactionRecord,
    ) -> Result<RowsAffected, Error> {
        let row = StoredRow::try_from(record)?;

        let rows_affected = self.connection.execute(
            "UPDATE transaksi
            SET \
                nama = ?1, \
                jenis_transaksi = ?2, \
                jumlah = ?3, \
                cicilan_per_bulan = ?4, \
                bunga_per_persen = ?5, \
                total_pinjaman = ?6, \
                angsuran_per_bulan = ?7 \
            WHERE id = ?8;",
            params![
                row.name,
                row.transaction_type,
                row.amount,
                row.term_months,
                row.rate_percent,
                row.total_repayment,
                row.monthly_installment,
                id,
            ],
        )?;

        tracing::info!("Updated transaction {id}: {rows_affected} row(s) affected");

        Ok(rows_affected)
    }

    fn delete_by_id(&mut self, id: TransactionId) -> Result<RowsAffected, Error> {
        let rows_affected = self
            .connection
            .execute("DELETE FROM transaksi WHERE id = :id", &[(":id", &id)])?;

        tracing::info!("Deleted transaction {id}: {rows_affected} row(s) affected");

        Ok(rows_affected)
    }

    fn list_all(&self) -> Result<Vec<StoredRow>, Error> {
        let rows = self
            .connection
            .prepare(
                "SELECT id, nama, jenis_transaksi, jumlah, cicilan_per_bulan, bunga_per_persen, \
                 tanggal_transaksi, total_pinjaman, angsuran_per_bulan
                 FROM transaksi ORDER BY id",
            )?
            .query_map([], map_stored_row)?
            .collect::<Result<Vec<_>, _>>()?;

        tracing::debug!("Listed {} transaction(s)", rows.len());

        Ok(rows)
    }
}

/// Map a database row to a [StoredRow].
pub fn map_stored_row(row: &Row) -> Result<StoredRow, rusqlite::Error> {
    let id = row.get(0)?;
    let name = row.get(1)?;
    let transaction_type = row.get(2)?;
    let amount = row.get(3)?;
    let term_months = row.get(4)?;
    let rate_percent = row.get(5)?;
    let created_at = row.get(6)?;
    let total_repayment = row.get(7)?;
    let monthly_installment = row.get(8)?;

    Ok(StoredRow {
        id,
        name,
        transaction_type,
        amount,
        term_months,
        rate_percent,
        created_at,
        total_repayment,
        monthly_installment,
    })
}

//! Sets up the application's SQLite database.

use rusqlite::Connection;

use crate::Error;

/// Create the tables used by the application if they do not already exist.
///
/// # Errors
/// Returns an error if there is an SQL error.
pub fn initialize(connection: &Connection) -> Result<(), Error> {
    create_transaction_table(connection)?;

    Ok(())
}

/// Create the `transaksi` table.
///
/// IDs are supplied by the operator, so the primary key does not
/// autoincrement. Loan-only columns are NULL for deposits.
///
/// # Errors
/// Returns an error if there is an SQL error.
pub fn create_transaction_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS transaksi (
                id INTEGER PRIMARY KEY,
                nama TEXT NOT NULL,
                jenis_transaksi TEXT NOT NULL CHECK (jenis_transaksi IN ('Simpanan', 'Peminjaman')),
                jumlah REAL NOT NULL,
                cicilan_per_bulan INTEGER,
                bunga_per_persen REAL,
                tanggal_transaksi TEXT NOT NULL,
                total_pinjaman REAL,
                angsuran_per_bulan REAL
                )",
        (),
    )?;

    Ok(())
}

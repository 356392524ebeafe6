use std::error::Error;
use std::path::Path;
use std::process::exit;

use clap::Parser;
use rusqlite::Connection;
use time::macros::datetime;

use koperasi_rs::{
    SQLiteTransactionRepository, TransactionRecord, TransactionRepository, initialize_db,
};

/// A utility for creating a test database for the koperasi console.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to save the SQLite database to.
    #[arg(long, short)]
    output_path: String,
}

/// Create and populate a database for manual testing.
fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    let output_path = Path::new(&args.output_path);

    match output_path.extension() {
        None => {
            eprintln!("Output path must include a file extension (e.g., 'my_database.db').");
            exit(1);
        }
        Some(extension) if extension.is_empty() => {
            eprintln!("Output path must include a file extension (e.g., 'my_database.db').");
            exit(1);
        }
        _ => {}
    }

    if output_path.is_file() {
        eprintln!("File already exists at {output_path:#?}!");
        exit(1);
    }

    println!("Creating database at {output_path:#?}");
    let conn = Connection::open(output_path)?;

    initialize_db(&conn)?;

    let mut repository = SQLiteTransactionRepository::new(conn);

    println!("Creating test transactions...");

    let records = [
        TransactionRecord::build(1, "Budi Santoso", "Simpanan", 250_000.0)
            .finalise(datetime!(2025-01-06 09:00:00))?,
        TransactionRecord::build(2, "Siti Aminah", "Peminjaman", 1_200_000.0)
            .loan_terms(12, 12.0)
            .finalise(datetime!(2025-01-07 10:30:00))?,
        TransactionRecord::build(3, "Joko Widodo", "Peminjaman", 5_000_000.0)
            .loan_terms(24, 9.5)
            .finalise(datetime!(2025-02-03 13:15:00))?,
        TransactionRecord::build(4, "Siti Aminah", "Simpanan", 75_000.0)
            .finalise(datetime!(2025-02-10 08:45:00))?,
    ];

    for record in &records {
        repository.insert(record)?;
    }

    println!("Success!");

    Ok(())
}

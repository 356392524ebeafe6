use std::{
    error::Error,
    io::{self},
    path::{Path, PathBuf},
    process::exit,
};

use clap::Parser;
use rusqlite::Connection;

use koperasi_rs::{
    Console, LocalClock, SQLiteTransactionRepository, StdinInput, initialize_db, setup_logging,
};

/// A console for recording the deposits and loans of a savings and loan cooperative.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to the application SQLite database. Created if it does not exist.
    #[arg(long)]
    db_path: PathBuf,

    /// Canonical timezone used to stamp new transactions.
    #[arg(long, default_value = "Asia/Jakarta")]
    timezone: String,

    /// File path to append logs to.
    #[arg(long, default_value = "koperasi.log")]
    log_path: PathBuf,
}

fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();
    validate_db_path(&args.db_path);

    setup_logging(&args.log_path)?;

    let clock = match LocalClock::new(&args.timezone) {
        Ok(clock) => clock,
        Err(error) => {
            eprintln!("{error}. Use a canonical timezone name such as 'Asia/Jakarta'.");
            exit(1);
        }
    };

    let connection = Connection::open(&args.db_path)?;
    initialize_db(&connection)?;
    tracing::info!("Opened database at {:?}", args.db_path);

    let mut console = Console::new(
        SQLiteTransactionRepository::new(connection),
        StdinInput,
        io::stdout(),
        clock,
    );
    console.run()?;

    Ok(())
}

fn validate_db_path(db_path: &Path) {
    match db_path.extension() {
        None => {
            eprintln!("Database path must include a file extension (e.g., 'koperasi.db').");
            exit(1);
        }
        Some(extension) if extension.is_empty() => {
            eprintln!("Database path must include a file extension (e.g., 'koperasi.db').");
            exit(1);
        }
        _ => {}
    }
}

//! The interactive menu for managing transactions.
//!
//! Input is read through the [LineInput] port so the menu can be driven by
//! stdin in the binary and by scripted lines in tests.

use std::{
    io::{self, BufRead, Write},
    str::FromStr,
};

use crate::{
    Error,
    database_id::TransactionId,
    display::{describe, format_rupiah},
    record::{TransactionBuilder, TransactionRecord, parse_timestamp},
    repository::TransactionRepository,
    timezone::Clock,
    validation::{
        MemberName, TransactionType, ValidationError, validate_amount, validate_id, validate_rate,
        validate_term,
    },
};

/// A synchronous source of operator input, one line at a time.
pub trait LineInput {
    /// Read the next line without its line ending.
    ///
    /// Returns `Ok(None)` once the input has been closed.
    fn read_line(&mut self) -> Result<Option<String>, Error>;
}

/// Reads lines from standard input.
#[derive(Debug, Default)]
pub struct StdinInput;

impl LineInput for StdinInput {
    fn read_line(&mut self) -> Result<Option<String>, Error> {
        let mut line = String::new();

        match io::stdin().lock().read_line(&mut line)? {
            0 => Ok(None),
            _ => Ok(Some(line.trim_end_matches(['\r', '\n']).to_owned())),
        }
    }
}

/// The actions offered by the main menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    /// 1. Add a transaction.
    Add,
    /// 2. List all transactions.
    List,
    /// 3. Update a transaction by ID.
    Update,
    /// 4. Delete a transaction by ID.
    Delete,
    /// 5. Exit.
    Exit,
}

impl FromStr for MenuChoice {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "1" => Ok(MenuChoice::Add),
            "2" => Ok(MenuChoice::List),
            "3" => Ok(MenuChoice::Update),
            "4" => Ok(MenuChoice::Delete),
            "5" => Ok(MenuChoice::Exit),
            _ => Err(()),
        }
    }
}

/// Why a line typed at a field prompt was not accepted.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum InputError {
    /// The line was not a whole number.
    #[error("\"{0}\" is not a whole number")]
    NotAnInteger(String),

    /// The line was not a finite number.
    #[error("\"{0}\" is not a number")]
    NotANumber(String),

    /// The value was parsed but failed validation.
    #[error(transparent)]
    Invalid(#[from] ValidationError),
}

fn parse_integer(line: &str) -> Result<i64, InputError> {
    let line = line.trim();

    line.parse()
        .map_err(|_| InputError::NotAnInteger(line.to_owned()))
}

fn parse_number(line: &str) -> Result<f64, InputError> {
    let line = line.trim();

    match line.parse::<f64>() {
        Ok(number) if number.is_finite() => Ok(number),
        _ => Err(InputError::NotANumber(line.to_owned())),
    }
}

const MENU: &str = "
=== KOPERASI SIMPAN PINJAM ===
1. Add Transaction
2. List All Transactions
3. Update Transaction
4. Delete Transaction
5. Exit";

/// Drives the menu loop against a repository.
pub struct Console<R, I, W, C> {
    repository: R,
    input: I,
    output: W,
    clock: C,
}

impl<R, I, W, C> Console<R, I, W, C>
where
    R: TransactionRepository,
    I: LineInput,
    W: Write,
    C: Clock,
{
    /// Create a console that reads from `input`, writes to `output` and
    /// stamps new records with the time from `clock`.
    pub fn new(repository: R, input: I, output: W, clock: C) -> Self {
        Self {
            repository,
            input,
            output,
            clock,
        }
    }

    /// The repository the console reads from and writes to.
    pub fn repository(&self) -> &R {
        &self.repository
    }

    /// The writer the console prints to.
    pub fn output(&self) -> &W {
        &self.output
    }

    /// Show the menu and perform the chosen actions until the operator exits
    /// or the input is closed.
    ///
    /// Failed actions are reported to the operator and the menu is shown
    /// again.
    ///
    /// # Errors
    ///
    /// Returns an [Error::Io] if reading input or writing output fails.
    pub fn run(&mut self) -> Result<(), Error> {
        loop {
            writeln!(self.output, "{MENU}")?;

            let Some(line) = self.prompt("Choose a menu option (1-5): ")? else {
                tracing::info!("Input closed, leaving the menu");
                return Ok(());
            };

            let Ok(choice) = line.parse::<MenuChoice>() else {
                writeln!(
                    self.output,
                    "Invalid choice! Please choose between 1 and 5."
                )?;
                continue;
            };

            if choice == MenuChoice::Exit {
                writeln!(self.output, "Goodbye.")?;
                return Ok(());
            }

            match self.perform(choice) {
                Ok(()) => {}
                Err(Error::InputClosed) => {
                    tracing::info!("Input closed during {choice:?}, leaving the menu");
                    return Ok(());
                }
                Err(Error::Io(error)) => return Err(Error::Io(error)),
                Err(Error::NotFound) => {
                    tracing::warn!("{choice:?} failed: transaction not found");
                    self.print_error(Error::NotFound)?;
                }
                Err(error) => {
                    tracing::error!("{choice:?} failed: {error}");
                    self.print_error(error)?;
                }
            }
        }
    }

    /// Perform a single menu action.
    pub fn perform(&mut self, choice: MenuChoice) -> Result<(), Error> {
        match choice {
            MenuChoice::Add => self.add_transaction(),
            MenuChoice::List => self.list_transactions(),
            MenuChoice::Update => self.update_transaction(),
            MenuChoice::Delete => self.delete_transaction(),
            MenuChoice::Exit => Ok(()),
        }
    }

    /// Ask for every field of a new transaction and store it.
    ///
    /// The record is fully built before anything is written, so an
    /// abandoned or rejected entry leaves the repository untouched.
    pub fn add_transaction(&mut self) -> Result<(), Error> {
        writeln!(self.output, "\n--- Add Transaction ---")?;

        let id = self.prompt_transaction_id("Transaction ID: ")?;
        let record = self.prompt_details(id)?.finalise(self.clock.now())?;

        self.print_loan_details(&record)?;
        self.repository.insert(&record)?;

        writeln!(self.output, "Transaction added successfully!")?;

        Ok(())
    }

    /// Print every stored transaction.
    pub fn list_transactions(&mut self) -> Result<(), Error> {
        writeln!(self.output, "\n--- Transactions ---")?;

        let rows = self.repository.list_all()?;

        if rows.is_empty() {
            writeln!(self.output, "No transactions found.")?;
        }

        for row in &rows {
            writeln!(self.output, "{}", describe(row))?;
        }

        Ok(())
    }

    /// Replace the details of an existing transaction.
    ///
    /// The original creation time is kept.
    ///
    /// # Errors
    ///
    /// Returns an [Error::NotFound] if there is no transaction with the
    /// entered ID.
    pub fn update_transaction(&mut self) -> Result<(), Error> {
        writeln!(self.output, "\n--- Update Transaction ---")?;

        let id = self.prompt_transaction_id("ID of the transaction to update: ")?;
        let existing = self.repository.find_by_id(id)?.ok_or(Error::NotFound)?;

        writeln!(self.output, "Transaction found: {}", describe(&existing))?;

        let created_at = parse_timestamp(&existing.created_at)?;
        let record = self.prompt_details(id)?.finalise(created_at)?;

        self.print_loan_details(&record)?;

        if self.repository.update_by_id(id, &record)? == 0 {
            return Err(Error::NotFound);
        }

        writeln!(self.output, "Transaction updated successfully!")?;

        Ok(())
    }

    /// Delete a transaction by ID.
    ///
    /// # Errors
    ///
    /// Returns an [Error::NotFound] if no rows were deleted.
    pub fn delete_transaction(&mut self) -> Result<(), Error> {
        writeln!(self.output, "\n--- Delete Transaction ---")?;

        let id = self.prompt_transaction_id("ID of the transaction to delete: ")?;

        if self.repository.delete_by_id(id)? == 0 {
            return Err(Error::NotFound);
        }

        writeln!(self.output, "Transaction deleted successfully!")?;

        Ok(())
    }

    fn prompt_transaction_id(&mut self, prompt: &str) -> Result<TransactionId, Error> {
        self.prompt_for(prompt, |line| Ok(validate_id(parse_integer(line)?)?))
    }

    /// Ask for the name, type, amount and, for loans, the term and rate.
    fn prompt_details(&mut self, id: TransactionId) -> Result<TransactionBuilder, Error> {
        let name = self.prompt_for("Member name: ", |line| Ok(MemberName::new(line)?))?;
        let transaction_type = self.prompt_for(
            "Transaction type (Simpanan/Peminjaman): ",
            |line| Ok(line.parse::<TransactionType>()?),
        )?;
        let amount = self.prompt_for("Amount: ", |line| {
            Ok(validate_amount(parse_number(line)?, transaction_type)?)
        })?;

        let builder = TransactionRecord::build(
            id,
            name.as_ref(),
            transaction_type.as_str(),
            amount,
        );

        if transaction_type == TransactionType::Deposit {
            return Ok(builder);
        }

        let term_months = self.prompt_for("Term (months): ", |line| {
            Ok(validate_term(parse_integer(line)?)?)
        })?;
        let rate_percent = self.prompt_for("Annual interest rate (%): ", |line| {
            Ok(validate_rate(parse_number(line)?)?)
        })?;

        Ok(builder.loan_terms(term_months, rate_percent))
    }

    /// Ask for a field until `parse` accepts the entered line.
    fn prompt_for<T>(
        &mut self,
        prompt: &str,
        parse: impl Fn(&str) -> Result<T, InputError>,
    ) -> Result<T, Error> {
        loop {
            let line = self.prompt(prompt)?.ok_or(Error::InputClosed)?;

            match parse(&line) {
                Ok(value) => return Ok(value),
                Err(error) => self.print_error(error)?,
            }
        }
    }

    fn prompt(&mut self, prompt: &str) -> Result<Option<String>, Error> {
        write!(self.output, "{prompt}")?;
        self.output.flush()?;

        self.input.read_line()
    }

    fn print_loan_details(&mut self, record: &TransactionRecord) -> Result<(), Error> {
        if let Some(summary) = record.loan_summary() {
            writeln!(self.output, "\nLoan calculation details:")?;
            writeln!(
                self.output,
                "Total repayment (including interest): {}",
                format_rupiah(summary.total_repayment)
            )?;
            writeln!(
                self.output,
                "Installment per month: {}",
                format_rupiah(summary.monthly_installment)
            )?;
        }

        Ok(())
    }

    fn print_error(&mut self, error: impl ToString) -> Result<(), Error> {
        writeln!(
            self.output,
            "Error: {}",
            capitalise_first_char(&error.to_string())
        )?;

        Ok(())
    }
}

/// From https://crates.io/crates/capitalize
fn capitalise_first_char(string: &str) -> String {
    let mut chars = string.chars();
    let Some(first) = chars.next() else {
        return String::with_capacity(0);
    };
    first.to_uppercase().chain(chars).collect()
}

/// Replays a fixed list of lines, then reports the input as closed.
#[cfg(test)]
pub struct ScriptedInput(std::collections::VecDeque<String>);

#[cfg(test)]
impl ScriptedInput {
    /// Create an input that yields `lines` in order.
    pub fn new(lines: &[&str]) -> Self {
        Self(lines.iter().map(|line| line.to_string()).collect())
    }
}

#[cfg(test)]
impl LineInput for ScriptedInput {
    fn read_line(&mut self) -> Result<Option<String>, Error> {
        Ok(self.0.pop_front())
    }
}


#[cfg(test)]
mod console_tests {
    use rusqlite::Connection;
    use time::macros::datetime;

    use crate::{
        initialize_db,
        record::TransactionRecord,
        repository::{SQLiteTransactionRepository, TransactionRepository},
        timezone::FixedClock,
    };

    use super::{Console, ScriptedInput};

    type TestConsole = Console<SQLiteTransactionRepository, ScriptedInput, Vec<u8>, FixedClock>;

    fn get_test_console(lines: &[&str]) -> TestConsole {
        let connection = Connection::open_in_memory().unwrap();
        initialize_db(&connection).unwrap();

        Console::new(
            SQLiteTransactionRepository::new(connection),
            ScriptedInput::new(lines),
            Vec::new(),
            FixedClock(datetime!(2025-03-10 14:45:00)),
        )
    }

    fn get_console_with(records: &[TransactionRecord], lines: &[&str]) -> TestConsole {
        let connection = Connection::open_in_memory().unwrap();
        initialize_db(&connection).unwrap();
        let mut repository = SQLiteTransactionRepository::new(connection);

        for record in records {
            repository.insert(record).unwrap();
        }

        Console::new(
            repository,
            ScriptedInput::new(lines),
            Vec::new(),
            FixedClock(datetime!(2025-03-10 14:45:00)),
        )
    }

    fn output_of(console: &TestConsole) -> String {
        String::from_utf8(console.output().clone()).unwrap()
    }

    fn stored_loan(id: i64) -> TransactionRecord {
        TransactionRecord::build(id, "andi", "Peminjaman", 1_200_000.0)
            .loan_terms(12, 12.0)
            .finalise(datetime!(2025-01-01 07:00:00))
            .unwrap()
    }

    #[test]
    fn adds_loan() {
        let mut console = get_test_console(&[
            "1",
            "1",
            "andi",
            "Peminjaman",
            "1200000",
            "12",
            "12",
            "5",
        ]);

        console.run().unwrap();

        let row = console.repository().find_by_id(1).unwrap().unwrap();
        assert_eq!(row.name, "ANDI");
        assert_eq!(row.transaction_type, "Peminjaman");
        assert_eq!(row.total_repayment, Some(1_344_000.0));
        assert_eq!(row.monthly_installment, Some(112_000.0));
        assert_eq!(row.created_at, "2025-03-10 14:45:00");

        let output = output_of(&console);
        assert!(output.contains("Loan calculation details:"));
        assert!(output.contains("Transaction added successfully!"));
        assert!(output.contains("Goodbye."));
    }

    #[test]
    fn adds_lowercase_deposit_without_loan_prompts() {
        let mut console = get_test_console(&["1", "2", "sari", "simpanan", "50000", "5"]);

        console.run().unwrap();

        let row = console.repository().find_by_id(2).unwrap().unwrap();
        assert_eq!(row.transaction_type, "Simpanan");
        assert_eq!(row.total_repayment, None);
        assert_eq!(row.monthly_installment, None);

        let output = output_of(&console);
        assert!(!output.contains("Term (months): "));
        assert!(!output.contains("Loan calculation details:"));
    }

    #[test]
    fn reprompts_invalid_fields() {
        let mut console = get_test_console(&[
            "1",
            "0",
            "abc",
            "3",
            "   ",
            "joko",
            "hibah",
            "PEMINJAMAN",
            "50000",
            "150000",
            "0",
            "6",
            "-1",
            "10",
            "5",
        ]);

        console.run().unwrap();

        let output = output_of(&console);
        assert!(output.contains("Error: Transaction ID must be greater than 0"));
        assert!(output.contains("Error: \"abc\" is not a whole number"));
        assert!(output.contains("Error: Name cannot be empty"));
        assert!(output.contains("Error: Invalid transaction type \"hibah\""));
        assert!(output.contains("Error: Loan amount cannot be less than 100,000"));
        assert!(output.contains("Error: The loan term must be more than 0 months"));
        assert!(output.contains("Error: The interest rate must be greater than 0"));

        let row = console.repository().find_by_id(3).unwrap().unwrap();
        assert_eq!(row.name, "JOKO");
        assert_eq!(row.amount, 150_000.0);
        assert_eq!(row.term_months, Some(6));
        assert_eq!(row.rate_percent, Some(10.0));
    }

    #[test]
    fn duplicate_id_is_reported_and_menu_continues() {
        let mut console = get_console_with(
            &[stored_loan(1)],
            &["1", "1", "sari", "Simpanan", "10000", "2", "5"],
        );

        console.run().unwrap();

        let output = output_of(&console);
        assert!(output.contains("Error: A transaction with the ID 1 already exists"));
        assert!(output.contains("ID: 1, Name: ANDI, Type: Peminjaman"));
        assert_eq!(console.repository().list_all().unwrap().len(), 1);
    }

    #[test]
    fn storage_failure_is_reported_and_menu_continues() {
        let connection = Connection::open_in_memory().unwrap();
        initialize_db(&connection).unwrap();
        connection.execute("DROP TABLE transaksi", ()).unwrap();
        let mut console = Console::new(
            SQLiteTransactionRepository::new(connection),
            ScriptedInput::new(&["2", "4", "1", "5"]),
            Vec::new(),
            FixedClock(datetime!(2025-03-10 14:45:00)),
        );

        assert_eq!(console.run(), Ok(()));

        let output = output_of(&console);
        assert_eq!(
            output
                .matches("Error: An unexpected SQL error occurred: no such table: transaksi")
                .count(),
            2
        );
        assert!(output.ends_with("Goodbye.\n"));
    }

    #[test]
    fn lists_transactions() {
        let mut console = get_console_with(&[stored_loan(1)], &["2", "5"]);

        console.run().unwrap();

        let output = output_of(&console);
        assert!(output.contains("--- Transactions ---"));
        assert!(output.contains("ID: 1, Name: ANDI, Type: Peminjaman"));
        assert!(output.contains("Date: 2025-01-01 07:00:00"));
    }

    #[test]
    fn lists_no_transactions() {
        let mut console = get_test_console(&["2", "5"]);

        console.run().unwrap();

        assert!(output_of(&console).contains("No transactions found."));
    }

    #[test]
    fn update_loan_to_deposit_clears_loan_amounts() {
        let mut console =
            get_console_with(&[stored_loan(1)], &["3", "1", "andi w", "Simpanan", "90000", "5"]);

        console.run().unwrap();

        let row = console.repository().find_by_id(1).unwrap().unwrap();
        assert_eq!(row.name, "ANDI W");
        assert_eq!(row.transaction_type, "Simpanan");
        assert_eq!(row.amount, 90_000.0);
        assert_eq!(row.term_months, None);
        assert_eq!(row.total_repayment, None);
        assert_eq!(row.monthly_installment, None);
        assert_eq!(row.created_at, "2025-01-01 07:00:00");
        assert!(output_of(&console).contains("Transaction updated successfully!"));
    }

    #[test]
    fn update_validates_like_add() {
        let mut console = get_console_with(
            &[stored_loan(1)],
            &["3", "1", "andi", "Peminjaman", "99999", "2400000", "24", "6", "5"],
        );

        console.run().unwrap();

        let row = console.repository().find_by_id(1).unwrap().unwrap();
        assert_eq!(row.amount, 2_400_000.0);
        assert_eq!(row.total_repayment, Some(2_688_000.0));
        assert_eq!(row.monthly_installment, Some(112_000.0));
        assert!(output_of(&console).contains("Error: Loan amount cannot be less than 100,000"));
    }

    #[test]
    fn update_missing_reports_not_found() {
        let mut console = get_test_console(&["3", "9", "5"]);

        console.run().unwrap();

        let output = output_of(&console);
        assert!(output.contains("Error: The requested transaction could not be found"));
        assert!(!output.contains("Member name: "));
        assert!(output.contains("Goodbye."));
    }

    #[test]
    fn deletes_transaction() {
        let mut console = get_console_with(&[stored_loan(1)], &["4", "1", "5"]);

        console.run().unwrap();

        assert_eq!(console.repository().find_by_id(1), Ok(None));
        assert!(output_of(&console).contains("Transaction deleted successfully!"));
    }

    #[test]
    fn delete_missing_reports_not_found() {
        let mut console = get_console_with(&[stored_loan(1)], &["4", "42", "5"]);

        console.run().unwrap();

        let output = output_of(&console);
        assert!(output.contains("Error: The requested transaction could not be found"));
        assert!(output.contains("Goodbye."));
        assert_eq!(console.repository().list_all().unwrap().len(), 1);
    }

    #[test]
    fn invalid_menu_choice_reprompts() {
        let mut console = get_test_console(&["9", "five", "5"]);

        console.run().unwrap();

        let output = output_of(&console);
        assert_eq!(
            output
                .matches("Invalid choice! Please choose between 1 and 5.")
                .count(),
            2
        );
        assert!(output.contains("Goodbye."));
    }

    #[test]
    fn closed_input_ends_the_loop() {
        let mut console = get_test_console(&["1", "7", "budi"]);

        assert_eq!(console.run(), Ok(()));
        assert_eq!(console.repository().find_by_id(7), Ok(None));
    }
}

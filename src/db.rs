//! Sets up the application's SQLite database.

use rusqlite::{Connection, Transaction as SqlTransaction, TransactionBehavior};

use crate::{Error, expense::create_expense_table, income::create_income_table};

/// Create the ledger tables if they do not already exist.
///
/// All tables are created in a single exclusive transaction, so either every
/// table exists afterwards or none of the changes are kept.
///
/// # Errors
/// Returns an [Error::SqlError] if any of the tables could not be created.
pub fn initialize(connection: &Connection) -> Result<(), Error> {
    let transaction = SqlTransaction::new_unchecked(connection, TransactionBehavior::Exclusive)?;

    create_income_table(&transaction)?;
    create_expense_table(&transaction)?;

    transaction.commit()?;

    Ok(())
}

#[cfg(test)]
mod initialize_tests {
    use rusqlite::Connection;

    use super::initialize;

    fn count_tables(connection: &Connection) -> u32 {
        connection
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name IN ('income', 'expense')",
                [],
                |row| row.get(0),
            )
            .expect("Could not count tables")
    }

    #[test]
    fn creates_tables() {
        let connection = Connection::open_in_memory().unwrap();

        initialize(&connection).expect("Could not initialize database");

        assert_eq!(count_tables(&connection), 2);
    }

    #[test]
    fn can_initialize_twice() {
        let connection = Connection::open_in_memory().unwrap();
        initialize(&connection).expect("Could not initialize database");

        let result = initialize(&connection);

        assert!(result.is_ok(), "want second initialization to succeed, got {result:?}");
        assert_eq!(count_tables(&connection), 2);
    }
}

//! Defines the expense record model and its database queries.

use rusqlite::{Connection, Row};
use serde::{Deserialize, Serialize};
use time::Date;

use crate::{
    Error, ValidationError,
    database_id::ExpenseId,
    form::{parse_date, parse_non_negative_amount, required},
};

// ============================================================================
// MODELS
// ============================================================================

/// The categories suggested on the expense forms.
///
/// Any other non-empty category is also accepted.
pub const EXPENSE_CATEGORIES: [&str; 5] = [
    "Gym Equipment",
    "Trainer Salary",
    "Rent",
    "Maintenance",
    "Electricity",
];

/// The maximum number of characters in an expense category.
pub const MAX_CATEGORY_LENGTH: usize = 50;

/// Money spent running the gym.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpenseRecord {
    /// The ID of the record.
    pub id: ExpenseId,
    /// The day the money was spent.
    pub date: Date,
    /// What the money was spent on, e.g. "Rent".
    pub category: String,
    /// The amount of money spent.
    pub amount: f64,
}

/// A validated expense record that has not been saved yet.
///
/// Use [NewExpense::parse] to create one from raw form values.
#[derive(Debug, Clone, PartialEq)]
pub struct NewExpense {
    pub(crate) date: Date,
    pub(crate) category: String,
    pub(crate) amount: f64,
}

impl NewExpense {
    /// Parse and validate the raw form values for an expense record.
    ///
    /// `date` must be in the `YYYY-MM-DD` format, `category` must not be
    /// blank or longer than [MAX_CATEGORY_LENGTH] characters and `amount`
    /// must be a number between zero and one trillion.
    ///
    /// # Errors
    /// Returns the first [ValidationError] found, checking the fields in the
    /// order `date`, `category`, `amount`.
    pub fn parse(date: &str, category: &str, amount: &str) -> Result<Self, ValidationError> {
        let date = parse_date("date", date)?;

        let category = required("category", category)?;
        let length = category.chars().count();
        if length > MAX_CATEGORY_LENGTH {
            return Err(ValidationError::CategoryTooLong {
                max: MAX_CATEGORY_LENGTH,
                length,
            });
        }

        let amount = parse_non_negative_amount("amount", amount)?;

        Ok(Self {
            date,
            category: category.to_owned(),
            amount,
        })
    }
}

// ============================================================================
// DATABASE FUNCTIONS
// ============================================================================

/// Save a new expense record and return it with its generated ID.
///
/// # Errors
/// This function will return a [Error::SqlError] if there is some SQL error.
pub fn create_expense(expense: NewExpense, connection: &Connection) -> Result<ExpenseRecord, Error> {
    let record = connection
        .prepare(
            "INSERT INTO expense (date, category, amount)
             VALUES (?1, ?2, ?3)
             RETURNING id, date, category, amount",
        )?
        .query_row(
            (expense.date, expense.category, expense.amount),
            map_expense_row,
        )?;

    Ok(record)
}

/// Retrieve all expense records, newest date first.
///
/// Records on the same date are ordered by most recently created first.
///
/// # Errors
/// This function will return a [Error::SqlError] if there is some SQL error.
pub fn get_all_expenses(connection: &Connection) -> Result<Vec<ExpenseRecord>, Error> {
    connection
        .prepare(
            "SELECT id, date, category, amount FROM expense ORDER BY date DESC, id DESC",
        )?
        .query_map([], map_expense_row)?
        .map(|maybe_record| maybe_record.map_err(|error| error.into()))
        .collect()
}

/// Retrieve all expense records in the order they were created.
///
/// # Errors
/// This function will return a [Error::SqlError] if there is some SQL error.
pub fn get_expenses_in_insertion_order(
    connection: &Connection,
) -> Result<Vec<ExpenseRecord>, Error> {
    connection
        .prepare("SELECT id, date, category, amount FROM expense ORDER BY id ASC")?
        .query_map([], map_expense_row)?
        .map(|maybe_record| maybe_record.map_err(|error| error.into()))
        .collect()
}

/// The sum of every expense amount, zero if there are none.
///
/// # Errors
/// This function will return a [Error::SqlError] if there is some SQL error.
pub fn get_total_expense(connection: &Connection) -> Result<f64, Error> {
    connection
        .query_row("SELECT COALESCE(SUM(amount), 0.0) FROM expense", [], |row| {
            row.get(0)
        })
        .map_err(|error| error.into())
}

/// Get the total number of expense records in the database.
///
/// # Errors
/// This function will return a [Error::SqlError] if there is some SQL error.
pub fn count_expenses(connection: &Connection) -> Result<u32, Error> {
    connection
        .query_row("SELECT COUNT(id) FROM expense", [], |row| row.get(0))
        .map_err(|error| error.into())
}

/// Create the expense table in the database.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub fn create_expense_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute_batch(
        "CREATE TABLE IF NOT EXISTS expense (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            date TEXT NOT NULL,
            category TEXT NOT NULL,
            amount REAL NOT NULL CHECK (amount BETWEEN 0 AND 1000000000000)
        );

        CREATE INDEX IF NOT EXISTS idx_expense_date ON expense(date);",
    )?;

    Ok(())
}

fn map_expense_row(row: &Row) -> Result<ExpenseRecord, rusqlite::Error> {
    let id = row.get(0)?;
    let date = row.get(1)?;
    let category = row.get(2)?;
    let amount = row.get(3)?;

    Ok(ExpenseRecord {
        id,
        date,
        category,
        amount,
    })
}

// ============================================================================
// TESTS
// ============================================================================


#[cfg(test)]
mod database_tests {
    use rusqlite::Connection;
    use time::macros::date;

    use crate::{
        db::initialize,
        expense::{
            NewExpense, count_expenses, create_expense, get_all_expenses,
            get_expenses_in_insertion_order, get_total_expense,
        },
    };

    fn get_test_connection() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();
        conn
    }

    fn new_expense(date: &str, category: &str, amount: f64) -> NewExpense {
        NewExpense::parse(date, category, &amount.to_string()).unwrap()
    }

    #[test]
    fn create_succeeds() {
        let conn = get_test_connection();

        let record = create_expense(new_expense("2024-01-05", "Rent", 200.0), &conn)
            .expect("Could not create expense");

        assert_eq!(record.id, 1);
        assert_eq!(record.date, date!(2024 - 01 - 05));
        assert_eq!(record.category, "Rent");
        assert_eq!(record.amount, 200.0);
    }

    #[test]
    fn created_record_is_totalled() {
        let conn = get_test_connection();
        create_expense(new_expense("2024-01-05", "Rent", 200.0), &conn).unwrap();

        let records = get_all_expenses(&conn).expect("Could not list expenses");

        assert_eq!(records.len(), 1);
        assert_eq!(get_total_expense(&conn), Ok(200.0));
    }

    #[test]
    fn lists_newest_date_first() {
        let conn = get_test_connection();
        for date in ["2024-01-05", "2024-03-01", "2023-12-31", "2024-02-10"] {
            create_expense(new_expense(date, "Rent", 1.0), &conn).unwrap();
        }

        let dates = get_all_expenses(&conn)
            .unwrap()
            .into_iter()
            .map(|record| record.date)
            .collect::<Vec<_>>();

        assert_eq!(
            dates,
            vec![
                date!(2024 - 03 - 01),
                date!(2024 - 02 - 10),
                date!(2024 - 01 - 05),
                date!(2023 - 12 - 31),
            ]
        );
    }

    #[test]
    fn insertion_order_ignores_date() {
        let conn = get_test_connection();
        for date in ["2024-01-05", "2024-03-01", "2023-12-31"] {
            create_expense(new_expense(date, "Rent", 1.0), &conn).unwrap();
        }

        let ids = get_expenses_in_insertion_order(&conn)
            .unwrap()
            .into_iter()
            .map(|record| record.id)
            .collect::<Vec<_>>();

        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[test]
    fn total_is_zero_without_records() {
        let conn = get_test_connection();

        assert_eq!(get_total_expense(&conn), Ok(0.0));
    }

    #[test]
    fn total_sums_amounts() {
        let conn = get_test_connection();
        let amounts = [200.0, 12.5, 0.25, 1000.0];
        for amount in amounts {
            create_expense(new_expense("2024-01-05", "Rent", amount), &conn).unwrap();
        }

        let want: f64 = amounts.iter().sum();

        assert_eq!(get_total_expense(&conn), Ok(want));
    }

    #[test]
    fn counts_records() {
        let conn = get_test_connection();
        for _ in 0..3 {
            create_expense(new_expense("2024-01-05", "Rent", 1.0), &conn).unwrap();
        }

        assert_eq!(count_expenses(&conn), Ok(3));
    }

    #[test]
    fn database_rejects_amounts_above_limit() {
        let conn = get_test_connection();
        let expense = NewExpense {
            date: date!(2024 - 01 - 05),
            category: "Rent".to_owned(),
            amount: 1e308,
        };

        let result = create_expense(expense, &conn);

        assert!(result.is_err(), "want CHECK constraint to reject 1e308");
        assert_eq!(count_expenses(&conn), Ok(0));
    }
}

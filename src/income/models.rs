//! Defines the income record model and its database queries.

use rusqlite::{Connection, Row};
use serde::{Deserialize, Serialize};
use time::Date;

use crate::{
    Error, ValidationError,
    database_id::IncomeId,
    form::{parse_date, parse_non_negative_integer},
};

// ============================================================================
// MODELS
// ============================================================================

/// A day's takings, split between the men's and girls' memberships.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncomeRecord {
    /// The ID of the record.
    pub id: IncomeId,
    /// The day the money was received.
    pub date: Date,
    /// Income from men's memberships.
    pub men: i64,
    /// Income from girls' memberships.
    pub girls: i64,
}

impl IncomeRecord {
    /// The record's total contribution to income.
    ///
    /// Saturates at `i64::MAX` rather than overflowing.
    pub fn total(&self) -> i64 {
        self.men.saturating_add(self.girls)
    }
}

/// A validated income record that has not been saved yet.
///
/// Use [NewIncome::parse] to create one from raw form values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewIncome {
    pub(crate) date: Date,
    pub(crate) men: i64,
    pub(crate) girls: i64,
}

impl NewIncome {
    /// Parse and validate the raw form values for an income record.
    ///
    /// `date` must be in the `YYYY-MM-DD` format, `men` and `girls` must be
    /// whole numbers between zero and one billion.
    ///
    /// # Errors
    /// Returns the first [ValidationError] found, checking the fields in the
    /// order `date`, `men`, `girls`.
    pub fn parse(date: &str, men: &str, girls: &str) -> Result<Self, ValidationError> {
        Ok(Self {
            date: parse_date("date", date)?,
            men: parse_non_negative_integer("men", men)?,
            girls: parse_non_negative_integer("girls", girls)?,
        })
    }
}

// ============================================================================
// DATABASE FUNCTIONS
// ============================================================================

/// Save a new income record and return it with its generated ID.
///
/// # Errors
/// This function will return a [Error::SqlError] if there is some SQL error.
pub fn create_income(income: NewIncome, connection: &Connection) -> Result<IncomeRecord, Error> {
    let record = connection
        .prepare(
            "INSERT INTO income (date, men, girls)
             VALUES (?1, ?2, ?3)
             RETURNING id, date, men, girls",
        )?
        .query_row((income.date, income.men, income.girls), map_income_row)?;

    Ok(record)
}

/// Retrieve all income records, newest date first.
///
/// Records on the same date are ordered by most recently created first.
///
/// # Errors
/// This function will return a [Error::SqlError] if there is some SQL error.
pub fn get_all_income(connection: &Connection) -> Result<Vec<IncomeRecord>, Error> {
    connection
        .prepare("SELECT id, date, men, girls FROM income ORDER BY date DESC, id DESC")?
        .query_map([], map_income_row)?
        .map(|maybe_record| maybe_record.map_err(|error| error.into()))
        .collect()
}

/// Retrieve all income records in the order they were created.
///
/// # Errors
/// This function will return a [Error::SqlError] if there is some SQL error.
pub fn get_income_in_insertion_order(connection: &Connection) -> Result<Vec<IncomeRecord>, Error> {
    connection
        .prepare("SELECT id, date, men, girls FROM income ORDER BY id ASC")?
        .query_map([], map_income_row)?
        .map(|maybe_record| maybe_record.map_err(|error| error.into()))
        .collect()
}

/// The sum of men's and girls' income over every record, zero if there are none.
///
/// # Errors
/// This function will return a [Error::SqlError] if there is some SQL error.
pub fn get_total_income(connection: &Connection) -> Result<i64, Error> {
    connection
        .query_row("SELECT COALESCE(SUM(men + girls), 0) FROM income", [], |row| {
            row.get(0)
        })
        .map_err(|error| error.into())
}

/// Create the income table in the database.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub fn create_income_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute_batch(
        "CREATE TABLE IF NOT EXISTS income (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            date TEXT NOT NULL,
            men INTEGER NOT NULL CHECK (men BETWEEN 0 AND 1000000000),
            girls INTEGER NOT NULL CHECK (girls BETWEEN 0 AND 1000000000)
        );

        CREATE INDEX IF NOT EXISTS idx_income_date ON income(date);",
    )?;

    Ok(())
}

/// Map a database row to an [IncomeRecord].
fn map_income_row(row: &Row) -> Result<IncomeRecord, rusqlite::Error> {
    let id = row.get(0)?;
    let date = row.get(1)?;
    let men = row.get(2)?;
    let girls = row.get(3)?;

    Ok(IncomeRecord {
        id,
        date,
        men,
        girls,
    })
}

// ============================================================================
// TESTS
// ============================================================================

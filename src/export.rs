//! Spreadsheet export of every income and expense record.
//!
//! The workbook is built in memory with an "Income" and an "Expense" sheet.
//! Each sheet has a header row, one row per record in the order the records
//! were created and a trailing total row.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, State},
    http::header::{CONTENT_DISPOSITION, CONTENT_TYPE},
    response::{IntoResponse, Response},
};
use rusqlite::Connection;
use rust_xlsxwriter::{ExcelDateTime, Format, Workbook, Worksheet};
use time::Date;

use crate::{
    AppState, Error,
    expense::{ExpenseRecord, get_expenses_in_insertion_order},
    income::{IncomeRecord, get_income_in_insertion_order},
};

/// The MIME type of an Office Open XML workbook.
pub const XLSX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

/// The file name suggested to the browser for the download.
pub const EXPORT_FILE_NAME: &str = "gym_data.xlsx";

const INCOME_SHEET_NAME: &str = "Income";
const EXPENSE_SHEET_NAME: &str = "Expense";
const INCOME_SOURCE_LABEL: &str = "Men + Girls";
const DATE_FORMAT: &str = "yyyy-mm-dd";

/// The state needed for exporting the records.
#[derive(Debug, Clone)]
pub struct ExportState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for ExportState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// A route handler that sends every record as an xlsx download.
pub async fn export_excel_endpoint(State(state): State<ExportState>) -> Result<Response, Error> {
    let (income, expenses) = {
        let connection = state
            .db_connection
            .lock()
            .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
            .map_err(|_| Error::DatabaseLockError)?;

        let income = get_income_in_insertion_order(&connection)
            .inspect_err(|error| tracing::error!("Failed to retrieve income: {error}"))?;
        let expenses = get_expenses_in_insertion_order(&connection)
            .inspect_err(|error| tracing::error!("Failed to retrieve expenses: {error}"))?;

        (income, expenses)
    };

    let workbook = build_workbook(&income, &expenses)
        .inspect_err(|error| tracing::error!("Failed to build workbook: {error}"))?;

    tracing::info!(
        "exporting {} income and {} expense records ({} bytes)",
        income.len(),
        expenses.len(),
        workbook.len()
    );

    Ok((
        [
            (CONTENT_TYPE, XLSX_CONTENT_TYPE.to_owned()),
            (
                CONTENT_DISPOSITION,
                format!("attachment; filename=\"{EXPORT_FILE_NAME}\""),
            ),
        ],
        workbook,
    )
        .into_response())
}

/// Write the income and expense records to an xlsx workbook and return its bytes.
///
/// # Errors
/// Returns [Error::Export] if the workbook cannot be written or a total does
/// not fit in a number.
pub fn build_workbook(income: &[IncomeRecord], expenses: &[ExpenseRecord]) -> Result<Vec<u8>, Error> {
    let mut workbook = Workbook::new();
    let header_format = Format::new().set_bold();
    let date_format = Format::new().set_num_format(DATE_FORMAT);

    let sheet = workbook.add_worksheet().set_name(INCOME_SHEET_NAME)?;
    write_header(sheet, ["Date", "Source", "Amount"], &header_format)?;
    let mut total_income: i64 = 0;
    let mut row = 1;
    for record in income {
        write_date(sheet, row, record.date, &date_format)?;
        sheet.write_string(row, 1, INCOME_SOURCE_LABEL)?;
        sheet.write_number(row, 2, record.total() as f64)?;
        total_income = record
            .men
            .checked_add(record.girls)
            .and_then(|amount| total_income.checked_add(amount))
            .ok_or_else(|| Error::Export("the total income is too large".to_owned()))?;
        row += 1;
    }
    write_total(sheet, row, total_income as f64, &header_format)?;

    let sheet = workbook.add_worksheet().set_name(EXPENSE_SHEET_NAME)?;
    write_header(sheet, ["Date", "Category", "Amount"], &header_format)?;
    let mut total_expense = 0.0;
    let mut row = 1;
    for record in expenses {
        write_date(sheet, row, record.date, &date_format)?;
        sheet.write_string(row, 1, &record.category)?;
        sheet.write_number(row, 2, record.amount)?;
        total_expense += record.amount;
        row += 1;
    }
    if !total_expense.is_finite() {
        return Err(Error::Export("the total expense is too large".to_owned()));
    }
    write_total(sheet, row, total_expense, &header_format)?;

    Ok(workbook.save_to_buffer()?)
}

fn write_header(sheet: &mut Worksheet, titles: [&str; 3], format: &Format) -> Result<(), Error> {
    for (column, title) in (0..).zip(titles) {
        sheet.write_string_with_format(0, column, title, format)?;
    }

    Ok(())
}

fn write_date(sheet: &mut Worksheet, row: u32, date: Date, format: &Format) -> Result<(), Error> {
    let year = u16::try_from(date.year())
        .map_err(|_| Error::Export(format!("the date {date} cannot be written to a workbook")))?;
    let date_time = ExcelDateTime::from_ymd(year, date.month().into(), date.day())?;

    sheet.write_datetime_with_format(row, 0, &date_time, format)?;

    Ok(())
}

// The first cell of the total row is left blank.
fn write_total(sheet: &mut Worksheet, row: u32, total: f64, format: &Format) -> Result<(), Error> {
    sheet.write_string_with_format(row, 1, "Total", format)?;
    sheet.write_number_with_format(row, 2, total, format)?;

    Ok(())
}

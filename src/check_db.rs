//! A plain text health check for the database.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use rusqlite::Connection;

use crate::{AppState, Error, expense::count_expenses};

/// The state needed for the database health check.
#[derive(Debug, Clone)]
pub struct CheckDbState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for CheckDbState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Report whether the expense table can be read and how many records it holds.
///
/// Failures are reported as plain text with a 500 status code instead of an HTML page.
pub async fn check_db_endpoint(State(state): State<CheckDbState>) -> Response {
    match count_expense_records(&state) {
        Ok(count) => format!("Expense table exists. Total records: {count}").into_response(),
        Err(error) => {
            tracing::error!("database check failed: {error}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Error: {error}"),
            )
                .into_response()
        }
    }
}

fn count_expense_records(state: &CheckDbState) -> Result<u32, Error> {
    let connection = state
        .db_connection
        .lock()
        .map_err(|_| Error::DatabaseLockError)?;

    count_expenses(&connection)
}

//! Defines the page and endpoint for recording an expense.

use std::sync::{Arc, Mutex};

use axum::{
    Form,
    extract::{FromRef, State},
    response::{IntoResponse, Redirect, Response},
};
use maud::{Markup, html};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use time::Date;

use crate::{
    AppState, Error, endpoints,
    expense::{EXPENSE_CATEGORIES, NewExpense, create_expense},
    html::{BUTTON_PRIMARY_STYLE, FORM_CONTAINER_STYLE, InputExtras, base, required_input},
    navigation::NavBar,
    timezone::get_local_date,
};

const CATEGORY_LIST_ID: &str = "expense-categories";

/// The state needed to show the expense form and record expenses.
#[derive(Debug, Clone)]
pub struct ExpenseState {
    /// The database connection for managing expense records.
    pub db_connection: Arc<Mutex<Connection>>,
    /// The local timezone as a canonical timezone name, e.g. "Pacific/Auckland".
    pub local_timezone: String,
}

impl FromRef<AppState> for ExpenseState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            local_timezone: state.local_timezone.clone(),
        }
    }
}

/// The raw form data for recording an expense.
///
/// Fields are kept as text and validated by [NewExpense::parse].
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct ExpenseForm {
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub amount: String,
}

/// Renders the page for recording an expense.
pub async fn get_expense_page(State(state): State<ExpenseState>) -> Result<Response, Error> {
    let today = get_local_date(&state.local_timezone)?;

    Ok(expense_view(today).into_response())
}

/// A route handler for recording an expense, redirects to the expense list on success.
///
/// Malformed values are rejected and no record is created.
pub async fn create_expense_endpoint(
    State(state): State<ExpenseState>,
    Form(form): Form<ExpenseForm>,
) -> Result<Redirect, Error> {
    let expense = NewExpense::parse(&form.date, &form.category, &form.amount)?;

    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    create_expense(expense, &connection)
        .inspect_err(|error| tracing::error!("could not create expense record: {error}"))?;

    Ok(Redirect::to(endpoints::EXPENSE_VIEW))
}

/// The expense form fields, shared with the combined entry page.
pub(crate) fn expense_fields(date_name: &str, today: Date) -> Markup {
    let today = today.to_string();

    html! {
        (required_input(date_name, "Date", "date", InputExtras {
            value: Some(&today),
            ..Default::default()
        }))

        (required_input("category", "Category", "text", InputExtras {
            placeholder: Some("Category"),
            list: Some(CATEGORY_LIST_ID),
            ..Default::default()
        }))

        datalist id=(CATEGORY_LIST_ID)
        {
            @for category in EXPENSE_CATEGORIES {
                option value=(category) {}
            }
        }

        (required_input("amount", "Amount", "number", InputExtras {
            min: Some("0"),
            step: Some("0.01"),
            placeholder: Some("0.00"),
            ..Default::default()
        }))
    }
}

fn expense_view(today: Date) -> Markup {
    let nav_bar = NavBar::new(endpoints::EXPENSE).into_html();

    let content = html! {
        (nav_bar)

        div class=(FORM_CONTAINER_STYLE)
        {
            form
                method="post"
                action=(endpoints::EXPENSE)
                class="w-full space-y-4 md:space-y-6"
            {
                h2 class="text-xl font-bold" { "Add Expense" }

                (expense_fields("date", today))

                button type="submit" class=(BUTTON_PRIMARY_STYLE) { "Save Expense" }
            }
        }
    };

    base("Add Expense", &content)
}


#[cfg(test)]
mod create_expense_endpoint_tests {
    use std::sync::{Arc, Mutex};

    use axum::{Form, extract::State, http::StatusCode, response::IntoResponse};
    use rusqlite::Connection;

    use crate::{
        Error, ValidationError,
        db::initialize,
        endpoints,
        expense::{ExpenseForm, ExpenseState, create_expense_endpoint, get_all_expenses},
        test_utils::get_header,
    };

    fn get_test_state() -> ExpenseState {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();

        ExpenseState {
            db_connection: Arc::new(Mutex::new(conn)),
            local_timezone: "Etc/UTC".to_owned(),
        }
    }

    fn form(date: &str, category: &str, amount: &str) -> ExpenseForm {
        ExpenseForm {
            date: date.to_owned(),
            category: category.to_owned(),
            amount: amount.to_owned(),
        }
    }

    #[tokio::test]
    async fn can_record_expense() {
        let state = get_test_state();

        let response = create_expense_endpoint(
            State(state.clone()),
            Form(form("2024-01-05", "Rent", "200.0")),
        )
        .await
        .into_response();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(get_header(&response, "location"), endpoints::EXPENSE_VIEW);
        let records = get_all_expenses(&state.db_connection.lock().unwrap()).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].category, "Rent");
        assert_eq!(records[0].amount, 200.0);
    }

    #[tokio::test]
    async fn negative_amount_is_rejected() {
        let state = get_test_state();

        let result = create_expense_endpoint(
            State(state.clone()),
            Form(form("2024-01-05", "Rent", "-20")),
        )
        .await;

        assert_eq!(
            result.err(),
            Some(Error::Validation(ValidationError::NegativeAmount("amount")))
        );
        let records = get_all_expenses(&state.db_connection.lock().unwrap()).unwrap();
        assert!(records.is_empty(), "want no records, got {records:?}");
    }

    #[tokio::test]
    async fn missing_category_responds_with_bad_request() {
        let state = get_test_state();

        let response = create_expense_endpoint(State(state), Form(form("2024-01-05", "", "20")))
            .await
            .into_response();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}

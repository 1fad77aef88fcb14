//! Defines the page and endpoint for recording income.

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
    html::{BUTTON_PRIMARY_STYLE, FORM_CONTAINER_STYLE, InputExtras, base, required_input},
    income::{NewIncome, create_income},
    navigation::NavBar,
    timezone::get_local_date,
};

/// The state needed to show the income form and record income.
#[derive(Debug, Clone)]
pub struct IncomeState {
    /// The database connection for managing income records.
    pub db_connection: Arc<Mutex<Connection>>,
    /// The local timezone as a canonical timezone name, e.g. "Pacific/Auckland".
    pub local_timezone: String,
}

impl FromRef<AppState> for IncomeState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            local_timezone: state.local_timezone.clone(),
        }
    }
}

/// The raw form data for recording income.
///
/// Fields are kept as text and validated by [NewIncome::parse].
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct IncomeForm {
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub men: String,
    #[serde(default)]
    pub girls: String,
}

/// Renders the page for recording income.
pub async fn get_income_page(State(state): State<IncomeState>) -> Result<Response, Error> {
    let today = get_local_date(&state.local_timezone)?;

    Ok(income_view(today).into_response())
}

/// A route handler for recording income, redirects to the income list on success.
///
/// Malformed values are rejected and no record is created.
pub async fn create_income_endpoint(
    State(state): State<IncomeState>,
    Form(form): Form<IncomeForm>,
) -> Result<Redirect, Error> {
    let income = NewIncome::parse(&form.date, &form.men, &form.girls)?;

    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    create_income(income, &connection)
        .inspect_err(|error| tracing::error!("could not create income record: {error}"))?;

    Ok(Redirect::to(endpoints::INCOME_VIEW))
}

/// The income form fields, shared with the combined entry page.
pub(crate) fn income_fields(date_name: &str, today: Date) -> Markup {
    let today = today.to_string();

    html! {
        (required_input(date_name, "Date", "date", InputExtras {
            value: Some(&today),
            ..Default::default()
        }))

        (required_input("men", "Men", "number", InputExtras {
            min: Some("0"),
            step: Some("1"),
            placeholder: Some("0"),
            ..Default::default()
        }))

        (required_input("girls", "Girls", "number", InputExtras {
            min: Some("0"),
            step: Some("1"),
            placeholder: Some("0"),
            ..Default::default()
        }))
    }
}

fn income_view(today: Date) -> Markup {
    let nav_bar = NavBar::new(endpoints::INCOME).into_html();

    let content = html! {
        (nav_bar)

        div class=(FORM_CONTAINER_STYLE)
        {
            form
                method="post"
                action=(endpoints::INCOME)
                class="w-full space-y-4 md:space-y-6"
            {
                h2 class="text-xl font-bold" { "Add Income" }

                (income_fields("date", today))

                button type="submit" class=(BUTTON_PRIMARY_STYLE) { "Save Income" }
            }
        }
    };

    base("Add Income", &content)
}


#[cfg(test)]
mod create_income_endpoint_tests {
    use std::sync::{Arc, Mutex};

    use axum::{Form, extract::State, http::StatusCode, response::IntoResponse};
    use rusqlite::Connection;

    use crate::{
        Error, ValidationError,
        db::initialize,
        endpoints,
        income::{IncomeForm, IncomeState, create_income_endpoint, get_all_income},
        test_utils::get_header,
    };

    fn get_test_state() -> IncomeState {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();

        IncomeState {
            db_connection: Arc::new(Mutex::new(conn)),
            local_timezone: "Etc/UTC".to_owned(),
        }
    }

    fn form(date: &str, men: &str, girls: &str) -> IncomeForm {
        IncomeForm {
            date: date.to_owned(),
            men: men.to_owned(),
            girls: girls.to_owned(),
        }
    }

    #[tokio::test]
    async fn can_record_income() {
        let state = get_test_state();

        let response = create_income_endpoint(
            State(state.clone()),
            Form(form("2024-01-05", "100", "50")),
        )
        .await
        .into_response();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(get_header(&response, "location"), endpoints::INCOME_VIEW);
        let records = get_all_income(&state.db_connection.lock().unwrap()).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].total(), 150);
    }

    #[tokio::test]
    async fn non_numeric_men_is_rejected() {
        let state = get_test_state();

        let result =
            create_income_endpoint(State(state.clone()), Form(form("2024-01-05", "abc", "50")))
                .await;

        assert_eq!(
            result.err(),
            Some(Error::Validation(ValidationError::InvalidInteger {
                field: "men",
                value: "abc".to_owned()
            }))
        );
        let records = get_all_income(&state.db_connection.lock().unwrap()).unwrap();
        assert!(records.is_empty(), "want no records, got {records:?}");
    }

    #[tokio::test]
    async fn amount_too_large_to_sum_is_rejected() {
        let state = get_test_state();

        let result = create_income_endpoint(
            State(state.clone()),
            Form(form("2024-01-05", "9223372036854775807", "1")),
        )
        .await;

        assert_eq!(
            result.err(),
            Some(Error::Validation(ValidationError::AmountTooLarge {
                field: "men",
                max: 1_000_000_000
            }))
        );
        let records = get_all_income(&state.db_connection.lock().unwrap()).unwrap();
        assert!(records.is_empty(), "want no records, got {records:?}");
    }

    #[tokio::test]
    async fn malformed_date_responds_with_bad_request() {
        let state = get_test_state();

        let response =
            create_income_endpoint(State(state), Form(form("05/01/2024", "100", "50")))
                .await
                .into_response();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}

//! The quick entry page: the income and expense forms side by side with the current totals.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, State},
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::Form;
use maud::{Markup, html};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use time::Date;

use crate::{
    AppState, Error, ValidationError,
    dashboard::Totals,
    endpoints,
    expense::{NewExpense, create_expense, expense_fields},
    html::{BUTTON_PRIMARY_STYLE, CARD_STYLE, PAGE_CONTAINER_STYLE, base},
    income::{NewIncome, create_income, income_fields},
    navigation::NavBar,
    timezone::get_local_date,
};

const INCOME_FORM_TYPE: &str = "income";
const EXPENSE_FORM_TYPE: &str = "expense";

/// The state needed for the quick entry page.
#[derive(Debug, Clone)]
pub struct EntryState {
    /// The database connection for managing income and expense records.
    pub db_connection: Arc<Mutex<Connection>>,
    /// The local timezone as a canonical timezone name, e.g. "Pacific/Auckland".
    pub local_timezone: String,
}

impl FromRef<AppState> for EntryState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            local_timezone: state.local_timezone.clone(),
        }
    }
}

/// The raw form data posted from either form on the quick entry page.
///
/// `form_type` decides which of the other fields are read.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct EntryForm {
    pub form_type: Option<String>,
    #[serde(default)]
    pub income_date: String,
    #[serde(default)]
    pub men: String,
    #[serde(default)]
    pub girls: String,
    #[serde(default)]
    pub expense_date: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub amount: String,
}

/// A validated record from the quick entry page.
#[derive(Debug, PartialEq)]
enum Entry {
    Income(NewIncome),
    Expense(NewExpense),
}

impl TryFrom<EntryForm> for Entry {
    type Error = ValidationError;

    fn try_from(form: EntryForm) -> Result<Self, Self::Error> {
        match form.form_type.as_deref() {
            Some(INCOME_FORM_TYPE) => {
                NewIncome::parse(&form.income_date, &form.men, &form.girls).map(Entry::Income)
            }
            Some(EXPENSE_FORM_TYPE) => {
                NewExpense::parse(&form.expense_date, &form.category, &form.amount)
                    .map(Entry::Expense)
            }
            _ => Err(ValidationError::UnknownFormType(form.form_type)),
        }
    }
}

/// Renders the quick entry page.
pub async fn get_entry_page(State(state): State<EntryState>) -> Result<Response, Error> {
    let today = get_local_date(&state.local_timezone)?;

    let totals = {
        let connection = state
            .db_connection
            .lock()
            .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
            .map_err(|_| Error::DatabaseLockError)?;

        Totals::query(&connection)?
    };

    Ok(entry_view(today, totals).into_response())
}

/// A route handler for either form on the quick entry page, redirects back to the page on success.
pub async fn create_entry_endpoint(
    State(state): State<EntryState>,
    Form(form): Form<EntryForm>,
) -> Result<Redirect, Error> {
    let entry = Entry::try_from(form)?;

    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    match entry {
        Entry::Income(income) => {
            create_income(income, &connection)
                .inspect_err(|error| tracing::error!("could not create income record: {error}"))?;
        }
        Entry::Expense(expense) => {
            create_expense(expense, &connection)
                .inspect_err(|error| tracing::error!("could not create expense record: {error}"))?;
        }
    }

    Ok(Redirect::to(endpoints::ENTRY))
}

fn entry_form(form_type: &str, title: &str, fields: Markup) -> Markup {
    html! {
        form
            method="post"
            action=(endpoints::ENTRY)
            class={ "space-y-4 " (CARD_STYLE) }
        {
            h2 class="text-xl font-bold" { (title) }

            input type="hidden" name="form_type" value=(form_type);

            (fields)

            button type="submit" class=(BUTTON_PRIMARY_STYLE) { "Save " (title) }
        }
    }
}

fn entry_view(today: Date, totals: Totals) -> Markup {
    let nav_bar = NavBar::new(endpoints::ENTRY).into_html();

    let content = html! {
        (nav_bar)

        main class=(PAGE_CONTAINER_STYLE)
        {
            div class="space-y-6 w-full lg:max-w-5xl"
            {
                h1 class="text-2xl font-bold" { "Quick Entry" }

                (totals.into_html())

                div class="grid grid-cols-1 md:grid-cols-2 gap-4"
                {
                    (entry_form(INCOME_FORM_TYPE, "Income", income_fields("income_date", today)))
                    (entry_form(EXPENSE_FORM_TYPE, "Expense", expense_fields("expense_date", today)))
                }
            }
        }
    };

    base("Quick Entry", &content)
}

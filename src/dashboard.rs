//! The dashboard: totals, the net balance and every income and expense record.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use rusqlite::Connection;

use crate::{
    AppState, Error, endpoints,
    expense::{ExpenseRecord, expense_table, get_expenses_in_insertion_order, get_total_expense},
    html::{LINK_STYLE, PAGE_CONTAINER_STYLE, base, format_currency, total_card},
    income::{IncomeRecord, get_income_in_insertion_order, get_total_income, income_table},
    navigation::NavBar,
};

/// The state needed for displaying the dashboard page.
#[derive(Debug, Clone)]
pub struct DashboardState {
    /// The database connection for reading income and expense records.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for DashboardState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The figures shown at the top of the dashboard and the entry page.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Totals {
    pub income: i64,
    pub expense: f64,
}

impl Totals {
    /// Read the current income and expense totals.
    pub fn query(connection: &Connection) -> Result<Self, Error> {
        let income = get_total_income(connection)
            .inspect_err(|error| tracing::error!("Failed to total income: {error}"))?;
        let expense = get_total_expense(connection)
            .inspect_err(|error| tracing::error!("Failed to total expenses: {error}"))?;

        Ok(Self { income, expense })
    }

    /// Total income minus total expense.
    pub fn net(&self) -> f64 {
        self.income as f64 - self.expense
    }

    pub fn into_html(self) -> Markup {
        html! {
            div class="grid grid-cols-1 md:grid-cols-3 gap-4 w-full"
            {
                div id="total-income" { (total_card("Total Income", &format_currency(self.income as f64))) }
                div id="total-expense" { (total_card("Total Expense", &format_currency(self.expense))) }
                div id="net-balance" { (total_card("Net Balance", &format_currency(self.net()))) }
            }
        }
    }
}

/// Display a page with the totals and both record lists in the order they were created.
pub async fn get_dashboard_page(State(state): State<DashboardState>) -> Result<Response, Error> {
    let (income, expenses, totals) = {
        let connection = state
            .db_connection
            .lock()
            .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
            .map_err(|_| Error::DatabaseLockError)?;

        let income = get_income_in_insertion_order(&connection)
            .inspect_err(|error| tracing::error!("Failed to retrieve income: {error}"))?;
        let expenses = get_expenses_in_insertion_order(&connection)
            .inspect_err(|error| tracing::error!("Failed to retrieve expenses: {error}"))?;
        let totals = Totals::query(&connection)?;

        (income, expenses, totals)
    };

    Ok(dashboard_view(&income, &expenses, totals).into_response())
}

fn dashboard_view(income: &[IncomeRecord], expenses: &[ExpenseRecord], totals: Totals) -> Markup {
    let nav_bar = NavBar::new(endpoints::DASHBOARD_VIEW).into_html();

    let content = html! {
        (nav_bar)

        main class=(PAGE_CONTAINER_STYLE)
        {
            div class="space-y-6 w-full lg:max-w-5xl"
            {
                header class="flex justify-between flex-wrap items-end"
                {
                    h1 class="text-2xl font-bold" { "Dashboard" }

                    a href=(endpoints::EXPORT_EXCEL) class=(LINK_STYLE) { "Download as Excel" }
                }

                (totals.into_html())

                section id="income" class="space-y-2"
                {
                    h2 class="text-xl font-bold" { "Income" }
                    (income_table(income))
                }

                section id="expenses" class="space-y-2"
                {
                    h2 class="text-xl font-bold" { "Expenses" }
                    (expense_table(expenses))
                }
            }
        }
    };

    base("Dashboard", &content)
}

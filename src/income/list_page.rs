//! Income listing page.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use rusqlite::Connection;

use crate::{
    AppState, Error, endpoints,
    html::{
        LINK_STYLE, PAGE_CONTAINER_STYLE, TABLE_CELL_STYLE, TABLE_HEADER_STYLE, TABLE_ROW_STYLE,
        TABLE_STYLE, base, format_currency, total_card,
    },
    income::{IncomeRecord, get_all_income, get_total_income},
    navigation::NavBar,
};

/// The state needed for the income listing page.
#[derive(Debug, Clone)]
pub struct IncomeListState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for IncomeListState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Render the income records, newest first, with the total income.
pub async fn get_income_list_page(State(state): State<IncomeListState>) -> Result<Response, Error> {
    let (records, total) = {
        let connection = state
            .db_connection
            .lock()
            .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
            .map_err(|_| Error::DatabaseLockError)?;

        let records = get_all_income(&connection)
            .inspect_err(|error| tracing::error!("Failed to retrieve income: {error}"))?;
        let total = get_total_income(&connection)
            .inspect_err(|error| tracing::error!("Failed to total income: {error}"))?;

        (records, total)
    };

    Ok(income_list_view(&records, total).into_response())
}

/// A table of income records.
pub(crate) fn income_table(records: &[IncomeRecord]) -> Markup {
    html! {
        table class=(TABLE_STYLE)
        {
            thead class=(TABLE_HEADER_STYLE)
            {
                tr
                {
                    th scope="col" class=(TABLE_CELL_STYLE) { "Date" }
                    th scope="col" class=(TABLE_CELL_STYLE) { "Men" }
                    th scope="col" class=(TABLE_CELL_STYLE) { "Girls" }
                    th scope="col" class=(TABLE_CELL_STYLE) { "Total" }
                }
            }

            tbody
            {
                @for record in records {
                    tr class=(TABLE_ROW_STYLE) data-income-id=(record.id)
                    {
                        td class=(TABLE_CELL_STYLE) { (record.date) }
                        td class=(TABLE_CELL_STYLE) { (format_currency(record.men as f64)) }
                        td class=(TABLE_CELL_STYLE) { (format_currency(record.girls as f64)) }
                        td class=(TABLE_CELL_STYLE) { (format_currency(record.total() as f64)) }
                    }
                }

                @if records.is_empty() {
                    tr
                    {
                        td
                            colspan="4"
                            class="px-6 py-4 text-center text-gray-500 dark:text-gray-400"
                        {
                            "No income recorded yet. "
                            a href=(endpoints::INCOME) class=(LINK_STYLE) { "Add income" }
                        }
                    }
                }
            }
        }
    }
}

fn income_list_view(records: &[IncomeRecord], total: i64) -> Markup {
    let nav_bar = NavBar::new(endpoints::INCOME_VIEW).into_html();

    let content = html!(
        (nav_bar)

        main class=(PAGE_CONTAINER_STYLE)
        {
            section class="space-y-4 w-full lg:max-w-5xl"
            {
                header class="flex justify-between flex-wrap items-end"
                {
                    h1 class="text-xl font-bold" { "Income" }

                    a href=(endpoints::INCOME) class=(LINK_STYLE) { "Add Income" }
                }

                div id="total-income" { (total_card("Total Income", &format_currency(total as f64))) }

                (income_table(records))
            }
        }
    );

    base("Income", &content)
}

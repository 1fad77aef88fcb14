//! Expense listing page.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use rusqlite::Connection;

use crate::{
    AppState, Error, endpoints,
    expense::{ExpenseRecord, get_all_expenses, get_total_expense},
    html::{
        LINK_STYLE, PAGE_CONTAINER_STYLE, TABLE_CELL_STYLE, TABLE_HEADER_STYLE, TABLE_ROW_STYLE,
        TABLE_STYLE, base, format_currency, total_card,
    },
    navigation::NavBar,
};

/// The state needed for the expense listing page.
#[derive(Debug, Clone)]
pub struct ExpenseListState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for ExpenseListState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Render the expense records, newest first, with the total expense.
pub async fn get_expense_list_page(
    State(state): State<ExpenseListState>,
) -> Result<Response, Error> {
    let (records, total) = {
        let connection = state
            .db_connection
            .lock()
            .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
            .map_err(|_| Error::DatabaseLockError)?;

        let records = get_all_expenses(&connection)
            .inspect_err(|error| tracing::error!("Failed to retrieve expenses: {error}"))?;
        let total = get_total_expense(&connection)
            .inspect_err(|error| tracing::error!("Failed to total expenses: {error}"))?;

        (records, total)
    };

    Ok(expense_list_view(&records, total).into_response())
}

/// A table of expense records.
pub(crate) fn expense_table(records: &[ExpenseRecord]) -> Markup {
    html! {
        table class=(TABLE_STYLE)
        {
            thead class=(TABLE_HEADER_STYLE)
            {
                tr
                {
                    th scope="col" class=(TABLE_CELL_STYLE) { "Date" }
                    th scope="col" class=(TABLE_CELL_STYLE) { "Category" }
                    th scope="col" class=(TABLE_CELL_STYLE) { "Amount" }
                }
            }

            tbody
            {
                @for record in records {
                    tr class=(TABLE_ROW_STYLE) data-expense-id=(record.id)
                    {
                        td class=(TABLE_CELL_STYLE) { (record.date) }
                        td class=(TABLE_CELL_STYLE) { (record.category) }
                        td class=(TABLE_CELL_STYLE) { (format_currency(record.amount)) }
                    }
                }

                @if records.is_empty() {
                    tr
                    {
                        td
                            colspan="3"
                            class="px-6 py-4 text-center text-gray-500 dark:text-gray-400"
                        {
                            "No expenses recorded yet. "
                            a href=(endpoints::EXPENSE) class=(LINK_STYLE) { "Add an expense" }
                        }
                    }
                }
            }
        }
    }
}

fn expense_list_view(records: &[ExpenseRecord], total: f64) -> Markup {
    let nav_bar = NavBar::new(endpoints::EXPENSE_VIEW).into_html();

    let content = html!(
        (nav_bar)

        main class=(PAGE_CONTAINER_STYLE)
        {
            section class="space-y-4 w-full lg:max-w-5xl"
            {
                header class="flex justify-between flex-wrap items-end"
                {
                    h1 class="text-xl font-bold" { "Expenses" }

                    a href=(endpoints::EXPENSE) class=(LINK_STYLE) { "Add Expense" }
                }

                div id="total-expense" { (total_card("Total Expense", &format_currency(total))) }

                (expense_table(records))
            }
        }
    );

    base("Expenses", &content)
}

#[cfg(test)]
mod expense_list_page_tests {
    use std::sync::{Arc, Mutex};

    use axum::extract::State;
    use rusqlite::Connection;
    use scraper::{Html, Selector};

    use crate::{
        db::initialize,
        expense::{ExpenseListState, NewExpense, create_expense, get_expense_list_page},
        test_utils::{assert_status_ok, assert_valid_html, parse_html_document},
    };

    fn get_test_state() -> ExpenseListState {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();

        ExpenseListState {
            db_connection: Arc::new(Mutex::new(conn)),
        }
    }

    #[tokio::test]
    async fn shows_records_newest_first_with_total() {
        let state = get_test_state();
        {
            let conn = state.db_connection.lock().unwrap();
            create_expense(NewExpense::parse("2024-01-05", "Rent", "200.0").unwrap(), &conn)
                .unwrap();
            create_expense(NewExpense::parse("2024-01-20", "Electricity", "50.5").unwrap(), &conn)
                .unwrap();
            create_expense(NewExpense::parse("2023-12-01", "Rent", "200.0").unwrap(), &conn)
                .unwrap();
        }

        let response = get_expense_list_page(State(state)).await.unwrap();

        assert_status_ok(&response);
        let html = parse_html_document(response).await;
        assert_valid_html(&html);
        let ids = html
            .select(&Selector::parse("tr[data-expense-id]").unwrap())
            .filter_map(|row| row.value().attr("data-expense-id"))
            .collect::<Vec<_>>();
        assert_eq!(ids, vec!["2", "1", "3"]);
        let total = total_text(&html);
        assert!(total.contains("$450.50"), "want total $450.50, got {total:?}");
    }

    fn total_text(html: &Html) -> String {
        html.select(&Selector::parse("#total-expense").unwrap())
            .next()
            .expect("No total found")
            .text()
            .collect::<String>()
    }
}

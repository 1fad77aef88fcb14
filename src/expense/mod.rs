//! Expense records: money spent running the gym, labelled with a category.

mod create_page;
mod list_page;
mod models;

pub use create_page::{create_expense_endpoint, get_expense_page};
pub use list_page::get_expense_list_page;
pub use models::{
    EXPENSE_CATEGORIES, ExpenseRecord, NewExpense, count_expenses, create_expense,
    create_expense_table, get_all_expenses, get_expenses_in_insertion_order, get_total_expense,
};

pub(crate) use create_page::expense_fields;
pub(crate) use list_page::expense_table;

#[cfg(test)]
pub(crate) use create_page::{ExpenseForm, ExpenseState};
#[cfg(test)]
pub(crate) use list_page::ExpenseListState;
#[cfg(test)]
pub(crate) use models::MAX_CATEGORY_LENGTH;

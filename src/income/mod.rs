//! Income records: a day's takings split between men's and girls' memberships.
//!
//! This module contains the `IncomeRecord` model, its database functions and
//! the pages for recording and listing income.

mod create_page;
mod list_page;
mod models;

pub use create_page::{create_income_endpoint, get_income_page};
pub use list_page::get_income_list_page;
pub use models::{
    IncomeRecord, NewIncome, create_income, create_income_table, get_all_income,
    get_income_in_insertion_order, get_total_income,
};

pub(crate) use create_page::income_fields;
pub(crate) use list_page::income_table;

#[cfg(test)]
pub(crate) use create_page::{IncomeForm, IncomeState};
#[cfg(test)]
pub(crate) use list_page::IncomeListState;

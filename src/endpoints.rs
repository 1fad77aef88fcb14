//! The URIs of the app's pages and endpoints.

/// The root route which redirects to the income entry page.
pub const ROOT: &str = "/";
/// The page for recording income, also accepts the income form.
pub const INCOME: &str = "/income";
/// The page listing income records with the total income.
pub const INCOME_VIEW: &str = "/income/view";
/// The page for recording an expense, also accepts the expense form.
pub const EXPENSE: &str = "/expense";
/// The page listing expense records with the total expense.
pub const EXPENSE_VIEW: &str = "/expense/view";
/// The page combining totals and both record lists.
pub const DASHBOARD_VIEW: &str = "/dashboard";
/// The route for downloading the ledger as a spreadsheet.
pub const EXPORT_EXCEL: &str = "/export/excel";
/// The page with both entry forms, also accepts either form.
pub const ENTRY: &str = "/entry";
/// A plain text check that the expense table can be queried.
pub const CHECK_DB: &str = "/check-db";
/// The page to display when an internal server error occurs.
pub const INTERNAL_ERROR_VIEW: &str = "/error";
/// The route for static files.
pub const STATIC: &str = "/static";

//! Application router configuration.

use axum::{
    Router, middleware,
    response::Redirect,
    routing::get,
};
use tower_http::services::ServeDir;

use crate::{
    AppState,
    check_db::check_db_endpoint,
    dashboard::get_dashboard_page,
    endpoints,
    entry::{create_entry_endpoint, get_entry_page},
    expense::{create_expense_endpoint, get_expense_list_page, get_expense_page},
    export::export_excel_endpoint,
    income::{create_income_endpoint, get_income_list_page, get_income_page},
    internal_server_error::get_internal_server_error_page,
    logging::logging_middleware,
    not_found::get_404_not_found,
};

/// Return a router with all the app's routes.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route(endpoints::ROOT, get(get_index_page))
        .route(
            endpoints::INCOME,
            get(get_income_page).post(create_income_endpoint),
        )
        .route(endpoints::INCOME_VIEW, get(get_income_list_page))
        .route(
            endpoints::EXPENSE,
            get(get_expense_page).post(create_expense_endpoint),
        )
        .route(endpoints::EXPENSE_VIEW, get(get_expense_list_page))
        .route(endpoints::DASHBOARD_VIEW, get(get_dashboard_page))
        .route(endpoints::EXPORT_EXCEL, get(export_excel_endpoint))
        .route(
            endpoints::ENTRY,
            get(get_entry_page).post(create_entry_endpoint),
        )
        .route(endpoints::CHECK_DB, get(check_db_endpoint))
        .route(
            endpoints::INTERNAL_ERROR_VIEW,
            get(get_internal_server_error_page),
        )
        .nest_service(endpoints::STATIC, ServeDir::new("static/"))
        .fallback(get_404_not_found)
        .layer(middleware::from_fn(logging_middleware))
        .with_state(state)
}

/// The root path '/' redirects to the income entry page.
async fn get_index_page() -> Redirect {
    Redirect::to(endpoints::INCOME)
}

//! Application router configuration with protected and unprotected route definitions.

use axum::{
    Router, middleware,
    routing::{get, post},
};
use tower_http::services::ServeDir;

use crate::{
    AppState,
    auth::{
        auth_guard, auth_guard_hx, get_customize_page, get_log_in_page, get_log_out,
        get_register_page, post_customize, post_log_in, register_user,
    },
    category::{
        create_category_endpoint, delete_category_endpoint, get_categories_page,
        get_edit_category_page, rename_category_endpoint,
    },
    dashboard::get_dashboard_page,
    endpoints,
    expense::{
        create_expense_endpoint, delete_expense_endpoint, get_edit_expense_page,
        update_expense_endpoint,
    },
    export::export_csv,
    internal_server_error::get_internal_server_error_page,
    landing::get_landing_page,
    not_found::get_404_not_found,
};

/// Return a router with all the app's routes.
pub fn build_router(state: AppState) -> Router {
    let unprotected_routes = Router::new()
        .route(endpoints::ROOT, get(get_landing_page))
        .route(endpoints::LOG_IN, get(get_log_in_page).post(post_log_in))
        .route(endpoints::REGISTER, get(get_register_page).post(register_user))
        .route(endpoints::LOG_OUT, get(get_log_out))
        .route(
            endpoints::INTERNAL_ERROR_VIEW,
            get(get_internal_server_error_page),
        );

    let protected_pages = Router::new()
        .route(endpoints::DASHBOARD, get(get_dashboard_page))
        .route(endpoints::CUSTOMIZE, get(get_customize_page))
        .route(endpoints::CATEGORIES, get(get_categories_page))
        .route(endpoints::EDIT_CATEGORY, get(get_edit_category_page))
        .route(endpoints::EDIT_EXPENSE, get(get_edit_expense_page))
        .route(endpoints::EXPORT_CSV, get(export_csv))
        .route_layer(middleware::from_fn_with_state(state.clone(), auth_guard));

    // Forms are submitted by HTMX, which needs the HX-Redirect header to follow auth redirects.
    let protected_forms = Router::new()
        .route(endpoints::CUSTOMIZE, post(post_customize))
        .route(endpoints::ADD_CATEGORY, post(create_category_endpoint))
        .route(endpoints::EDIT_CATEGORY, post(rename_category_endpoint))
        .route(endpoints::DELETE_CATEGORY, post(delete_category_endpoint))
        .route(endpoints::ADD_EXPENSE, post(create_expense_endpoint))
        .route(endpoints::EDIT_EXPENSE, post(update_expense_endpoint))
        .route(endpoints::DELETE_EXPENSE, post(delete_expense_endpoint))
        .route_layer(middleware::from_fn_with_state(state.clone(), auth_guard_hx));

    protected_pages
        .merge(protected_forms)
        .merge(unprotected_routes)
        .nest_service(endpoints::STATIC, ServeDir::new("static/"))
        .fallback(get_404_not_found)
        .with_state(state)
}

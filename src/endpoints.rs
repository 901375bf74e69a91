//! The endpoint URIs.
//!
//! For endpoints that take a parameter, e.g., '/edit/{expense_id}', use [format_endpoint].

/// The landing page for visitors who are not logged in.
pub const ROOT: &str = "/";
/// The page with the expense table, filters, totals and charts.
pub const DASHBOARD: &str = "/dashboard";
/// The route for getting the log in page and logging in.
pub const LOG_IN: &str = "/login";
/// The route for getting the registration page and registering.
pub const REGISTER: &str = "/register";
/// The route for choosing the display name shown on the dashboard.
pub const CUSTOMIZE: &str = "/customize";
/// The route for the client to log out the current user.
pub const LOG_OUT: &str = "/logout";
/// The page for listing, adding, renaming and deleting categories.
pub const CATEGORIES: &str = "/edit_categories";
/// The route to create a category.
pub const ADD_CATEGORY: &str = "/edit_categories/add";
/// The page and route for renaming a category.
pub const EDIT_CATEGORY: &str = "/edit_categories/{category_id}/edit";
/// The route to delete a category.
pub const DELETE_CATEGORY: &str = "/edit_categories/{category_id}/delete";
/// The route to create an expense.
pub const ADD_EXPENSE: &str = "/add";
/// The page and route for editing an expense.
pub const EDIT_EXPENSE: &str = "/edit/{expense_id}";
/// The route to delete an expense.
pub const DELETE_EXPENSE: &str = "/delete/{expense_id}";
/// The route to download the filtered expenses as a CSV file.
pub const EXPORT_CSV: &str = "/export.csv";
/// The page to display when an internal server error occurs.
pub const INTERNAL_ERROR_VIEW: &str = "/error";
/// The route for static files.
pub const STATIC: &str = "/static";

/// Replace the parameter in `endpoint_path` with `id`.
///
/// A parameter is a string that starts with a left brace, followed by
/// lowercase letters or underscores, and ends with a right brace.
/// For example, in the endpoint path '/edit/{expense_id}', '{expense_id}' is the parameter.
///
/// This function assumes that an endpoint path only contains ASCII characters
/// and a single parameter.
///
/// If no parameter is found in `endpoint_path`, the function returns the
/// the original `endpoint_path`.
pub fn format_endpoint(endpoint_path: &str, id: i64) -> String {
    let Some(param_start) = endpoint_path.find('{') else {
        return endpoint_path.to_owned();
    };

    let param_end = endpoint_path[param_start..]
        .find('}')
        .map(|offset| param_start + offset + 1)
        .unwrap_or(endpoint_path.len());

    format!(
        "{}{}{}",
        &endpoint_path[..param_start],
        id,
        &endpoint_path[param_end..]
    )
}

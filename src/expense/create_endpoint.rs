//! The endpoint for recording a new expense from the dashboard.

use std::sync::{Arc, Mutex};

use axum::{
    Extension,
    extract::{FromRef, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_extra::extract::Form;
use axum_htmx::HxRedirect;
use rusqlite::Connection;

use crate::{
    AppState, Error,
    auth::UserID,
    category::get_category_by_name,
    endpoints,
    expense::{
        Expense, ExpenseForm, create_expense,
        form::{non_empty, parse_amount, parse_date},
    },
    timezone::local_today,
};

/// The state needed for creating an expense.
#[derive(Debug, Clone)]
pub struct CreateExpenseState {
    pub db_connection: Arc<Mutex<Connection>>,
    /// The local timezone as a canonical timezone name, e.g. "Pacific/Auckland".
    pub local_timezone: String,
}

impl FromRef<AppState> for CreateExpenseState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            local_timezone: state.local_timezone.clone(),
        }
    }
}

/// Record an expense for the current user and reload the dashboard.
///
/// A missing or unreadable date is replaced with today's date in the server's
/// timezone. Nothing is stored if any other field is invalid.
pub async fn create_expense_endpoint(
    State(state): State<CreateExpenseState>,
    Extension(user_id): Extension<UserID>,
    Form(form): Form<ExpenseForm>,
) -> Response {
    match create_expense_from_form(&state, user_id, &form) {
        Ok(expense) => {
            tracing::info!("User {user_id} added expense {}", expense.id);
            (
                HxRedirect(endpoints::DASHBOARD.to_owned()),
                StatusCode::SEE_OTHER,
            )
                .into_response()
        }
        Err(error) => error.into_alert_response(),
    }
}

fn create_expense_from_form(
    state: &CreateExpenseState,
    user_id: UserID,
    form: &ExpenseForm,
) -> Result<Expense, Error> {
    let amount = parse_amount(form.amount.as_deref().unwrap_or_default())?;

    let date = match non_empty(form.date.as_deref()).and_then(parse_date) {
        Some(date) => date,
        None => local_today(&state.local_timezone)?,
    };

    let (Some(description), Some(category_name)) = (
        non_empty(form.description.as_deref()),
        non_empty(form.category.as_deref()),
    ) else {
        return Err(Error::IncompleteExpense);
    };

    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let category = match get_category_by_name(category_name, user_id, &connection) {
        Ok(category) => category,
        Err(Error::NotFound) => return Err(Error::InvalidCategory(category_name.to_owned())),
        Err(error) => return Err(error),
    };

    create_expense(
        Expense::build(user_id, description, amount, date).category_id(category.id),
        &connection,
    )
}

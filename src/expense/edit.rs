//! The page and endpoint for editing an expense.

use std::sync::{Arc, Mutex};

use axum::{
    Extension,
    extract::{FromRef, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_extra::extract::Form;
use axum_htmx::HxRedirect;
use maud::html;
use rusqlite::Connection;

use crate::{
    AppState, Error,
    auth::UserID,
    category::{get_categories, get_category, get_category_by_name},
    endpoints,
    expense::{
        Expense, ExpenseForm, ExpenseId, get_expense, update_expense,
        form::{ExpenseFieldValues, expense_form_fields, non_empty, parse_amount, parse_date},
    },
    html::{FORM_CONTAINER_STYLE, LINK_STYLE, base, submit_button},
    navigation::NavBar,
};

/// The state needed for editing an expense.
#[derive(Debug, Clone)]
pub struct EditExpenseState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for EditExpenseState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Render the edit form filled in with the stored expense.
///
/// Responds with the 404 page if the expense does not exist or belongs to someone else.
pub async fn get_edit_expense_page(
    Path(expense_id): Path<ExpenseId>,
    State(state): State<EditExpenseState>,
    Extension(user_id): Extension<UserID>,
) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let expense = get_expense(expense_id, user_id, &connection)?;
    let categories = get_categories(user_id, &connection)?;
    let category_name = match expense.category_id {
        Some(category_id) => Some(get_category(category_id, user_id, &connection)?.name),
        None => None,
    };

    let update_endpoint = endpoints::format_endpoint(endpoints::EDIT_EXPENSE, expense_id);
    let fields = expense_form_fields(
        &ExpenseFieldValues {
            description: &expense.description,
            amount: Some(expense.amount),
            category: category_name.as_ref().map(AsRef::as_ref),
            category_required: category_name.is_some(),
            date: expense.date,
        },
        &categories,
    );

    let content = html! {
        (NavBar::new(endpoints::DASHBOARD).into_html())

        div class=(FORM_CONTAINER_STYLE)
        {
            div class="w-full max-w-md space-y-4"
            {
                h1 class="text-xl font-bold" { "Edit expense" }

                form
                    hx-post=(update_endpoint)
                    hx-target-error="#alert-container"
                    hx-indicator="#indicator"
                    hx-disabled-elt="#submit-button"
                    class="w-full space-y-4 md:space-y-6"
                {
                    (fields)
                    (submit_button("Save"))
                }

                a href=(endpoints::DASHBOARD) class=(LINK_STYLE) { "Back to dashboard" }
            }
        }
    };

    Ok(base("Edit Expense", &[], &content).into_response())
}

/// Update one of the user's expenses and go back to the dashboard.
///
/// Blank fields keep their stored value. The whole edit is rejected if any
/// supplied field is invalid.
pub async fn update_expense_endpoint(
    Path(expense_id): Path<ExpenseId>,
    State(state): State<EditExpenseState>,
    Extension(user_id): Extension<UserID>,
    Form(form): Form<ExpenseForm>,
) -> Response {
    let result = match state.db_connection.lock() {
        Ok(connection) => apply_edit(expense_id, user_id, &form, &connection),
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            Err(Error::DatabaseLockError)
        }
    };

    match result {
        Ok(()) => (
            HxRedirect(endpoints::DASHBOARD.to_owned()),
            StatusCode::SEE_OTHER,
        )
            .into_response(),
        Err(Error::NotFound) => Error::UpdateMissingExpense.into_alert_response(),
        Err(error) => error.into_alert_response(),
    }
}

fn apply_edit(
    expense_id: ExpenseId,
    user_id: UserID,
    form: &ExpenseForm,
    connection: &Connection,
) -> Result<(), Error> {
    let stored = get_expense(expense_id, user_id, connection)?;

    let category_id = match non_empty(form.category.as_deref()) {
        Some(name) => match get_category_by_name(name, user_id, connection) {
            Ok(category) => Some(category.id),
            Err(Error::NotFound) => return Err(Error::InvalidCategory(name.to_owned())),
            Err(error) => return Err(error),
        },
        None => stored.category_id,
    };

    let amount = match non_empty(form.amount.as_deref()) {
        Some(raw) => parse_amount(raw)?,
        None => stored.amount,
    };

    let date = match non_empty(form.date.as_deref()) {
        Some(raw) => parse_date(raw).ok_or_else(|| Error::InvalidDate(raw.to_owned()))?,
        None => stored.date,
    };

    let description = non_empty(form.description.as_deref())
        .map(str::to_owned)
        .unwrap_or(stored.description);

    update_expense(
        &Expense {
            id: stored.id,
            description,
            amount,
            date,
            category_id,
            user_id,
        },
        connection,
    )
}

//! The endpoint for deleting an expense.

use std::sync::{Arc, Mutex};

use axum::{
    Extension,
    extract::{FromRef, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_htmx::HxRedirect;
use rusqlite::Connection;

use crate::{
    AppState, Error,
    auth::UserID,
    endpoints,
    expense::{ExpenseId, delete_expense},
};

/// The state needed for deleting an expense.
#[derive(Debug, Clone)]
pub struct DeleteExpenseState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for DeleteExpenseState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Delete one of the user's expenses and reload the dashboard.
///
/// Expenses owned by other users are treated as missing.
pub async fn delete_expense_endpoint(
    Path(expense_id): Path<ExpenseId>,
    State(state): State<DeleteExpenseState>,
    Extension(user_id): Extension<UserID>,
) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    match delete_expense(expense_id, user_id, &connection) {
        Ok(()) => {
            tracing::info!("User {user_id} deleted expense {expense_id}");
            (
                HxRedirect(endpoints::DASHBOARD.to_owned()),
                StatusCode::SEE_OTHER,
            )
                .into_response()
        }
        Err(Error::DeleteMissingExpense) => Error::DeleteMissingExpense.into_alert_response(),
        Err(error) => {
            tracing::error!(
                "An unexpected error occurred while deleting expense {expense_id}: {error}"
            );
            error.into_alert_response()
        }
    }
}

#[cfg(test)]
mod delete_expense_endpoint_tests {
    use std::sync::{Arc, Mutex};

    use axum::{
        Extension,
        extract::{Path, State},
        http::StatusCode,
    };
    use time::macros::date;

    use crate::{
        Error, endpoints,
        expense::get_expense,
        test_utils::{
            assert_hx_redirect, assert_valid_html, element_texts, get_test_connection,
            insert_test_expense, insert_test_user, parse_html_fragment,
        },
    };

    use super::{DeleteExpenseState, delete_expense_endpoint};

    #[tokio::test]
    async fn deletes_own_expense() {
        let connection = get_test_connection();
        let user = insert_test_user("alice", &connection);
        let expense = insert_test_expense(
            &user,
            "Lunch",
            12.5,
            date!(2024 - 05 - 01),
            None,
            &connection,
        );
        let db_connection = Arc::new(Mutex::new(connection));
        let state = DeleteExpenseState {
            db_connection: db_connection.clone(),
        };

        let response =
            delete_expense_endpoint(Path(expense.id), State(state), Extension(user.id)).await;

        assert_hx_redirect(&response, endpoints::DASHBOARD);
        assert_eq!(
            get_expense(expense.id, user.id, &db_connection.lock().unwrap()),
            Err(Error::NotFound)
        );
    }

    #[tokio::test]
    async fn other_users_expense_is_not_found_and_kept() {
        let connection = get_test_connection();
        let alice = insert_test_user("alice", &connection);
        let bob = insert_test_user("bobby", &connection);
        let expense = insert_test_expense(
            &alice,
            "Lunch",
            12.5,
            date!(2024 - 05 - 01),
            None,
            &connection,
        );
        let db_connection = Arc::new(Mutex::new(connection));
        let state = DeleteExpenseState {
            db_connection: db_connection.clone(),
        };

        let response =
            delete_expense_endpoint(Path(expense.id), State(state), Extension(bob.id)).await;

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let html = parse_html_fragment(response).await;
        assert_valid_html(&html);
        assert_eq!(
            element_texts(&html, "p.font-medium"),
            ["Could not delete expense"]
        );
        assert!(get_expense(expense.id, alice.id, &db_connection.lock().unwrap()).is_ok());
    }
}

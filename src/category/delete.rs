//! The endpoint for deleting a category.

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
    category::{CategoryId, delete_category},
    endpoints,
};

/// The state needed for deleting a category.
#[derive(Debug, Clone)]
pub struct DeleteCategoryState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for DeleteCategoryState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Delete one of the user's categories if no expense uses it.
pub async fn delete_category_endpoint(
    Path(category_id): Path<CategoryId>,
    State(state): State<DeleteCategoryState>,
    Extension(user_id): Extension<UserID>,
) -> Response {
    let result = match state.db_connection.lock() {
        Ok(connection) => delete_category(category_id, user_id, &connection),
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            Err(Error::DatabaseLockError)
        }
    };

    match result {
        Ok(()) => (
            HxRedirect(endpoints::CATEGORIES.to_owned()),
            StatusCode::SEE_OTHER,
        )
            .into_response(),
        Err(error @ Error::CategoryInUse(_)) => {
            tracing::debug!("Refused to delete category {category_id}: {error}");
            error.into_alert_response()
        }
        Err(error) => error.into_alert_response(),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::{
        Extension,
        extract::{Path, State},
        http::StatusCode,
    };
    use time::macros::date;

    use crate::{
        Error,
        category::{get_category, get_category_by_name},
        endpoints,
        test_utils::{
            assert_hx_redirect, element_texts, get_test_connection, insert_test_expense,
            insert_test_user, parse_html_fragment,
        },
    };

    use super::{DeleteCategoryState, delete_category_endpoint};

    #[tokio::test]
    async fn deletes_unused_category() {
        let connection = get_test_connection();
        let user = insert_test_user("alice", &connection);
        let food = get_category_by_name("Food", user.id, &connection).unwrap();
        let db_connection = Arc::new(Mutex::new(connection));
        let state = DeleteCategoryState {
            db_connection: db_connection.clone(),
        };

        let response = delete_category_endpoint(Path(food.id), State(state), Extension(user.id)).await;

        assert_hx_redirect(&response, endpoints::CATEGORIES);
        assert_eq!(
            get_category(food.id, user.id, &db_connection.lock().unwrap()),
            Err(Error::NotFound)
        );
    }

    #[tokio::test]
    async fn category_in_use_is_kept() {
        let connection = get_test_connection();
        let user = insert_test_user("alice", &connection);
        let food = get_category_by_name("Food", user.id, &connection).unwrap();
        insert_test_expense(
            &user,
            "Lunch",
            9.5,
            date!(2024 - 02 - 10),
            Some(food.id),
            &connection,
        );
        let db_connection = Arc::new(Mutex::new(connection));
        let state = DeleteCategoryState {
            db_connection: db_connection.clone(),
        };

        let response = delete_category_endpoint(Path(food.id), State(state), Extension(user.id)).await;

        assert_eq!(response.status(), StatusCode::CONFLICT);
        let html = parse_html_fragment(response).await;
        assert_eq!(
            element_texts(&html, "p.font-medium"),
            ["Cannot delete a category that is in use"]
        );
        assert!(get_category(food.id, user.id, &db_connection.lock().unwrap()).is_ok());
    }

    #[tokio::test]
    async fn other_users_category_is_not_found() {
        let connection = get_test_connection();
        let alice = insert_test_user("alice", &connection);
        let bob = insert_test_user("bobby", &connection);
        let food = get_category_by_name("Food", alice.id, &connection).unwrap();
        let db_connection = Arc::new(Mutex::new(connection));
        let state = DeleteCategoryState {
            db_connection: db_connection.clone(),
        };

        let response = delete_category_endpoint(Path(food.id), State(state), Extension(bob.id)).await;

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert!(get_category(food.id, alice.id, &db_connection.lock().unwrap()).is_ok());
    }
}

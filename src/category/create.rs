//! The endpoint for adding a category.

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
use serde::{Deserialize, Serialize};

use crate::{
    AppState, Error,
    auth::UserID,
    category::{CategoryName, create_category},
    endpoints,
};

/// The state needed for creating a category.
#[derive(Debug, Clone)]
pub struct CreateCategoryState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for CreateCategoryState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct NewCategoryForm {
    #[serde(default)]
    pub new_category: String,
}

/// Add a category for the current user and reload the categories page.
pub async fn create_category_endpoint(
    State(state): State<CreateCategoryState>,
    Extension(user_id): Extension<UserID>,
    Form(form): Form<NewCategoryForm>,
) -> Response {
    let name = match CategoryName::new(&form.new_category) {
        Ok(name) => name,
        Err(error) => return error.into_alert_response(),
    };

    let result = match state.db_connection.lock() {
        Ok(connection) => create_category(name, user_id, &connection),
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            Err(Error::DatabaseLockError)
        }
    };

    match result {
        Ok(category) => {
            tracing::info!("User {user_id} created category {}", category.id);
            (
                HxRedirect(endpoints::CATEGORIES.to_owned()),
                StatusCode::SEE_OTHER,
            )
                .into_response()
        }
        Err(error) => error.into_alert_response(),
    }
}

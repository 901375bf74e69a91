//! The page and endpoint for renaming a category.

use std::sync::{Arc, Mutex};

use axum::{
    Extension,
    extract::{FromRef, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_extra::extract::Form;
use axum_htmx::HxRedirect;
use maud::{Markup, html};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};

use crate::{
    AppState, Error,
    auth::UserID,
    category::{CategoryId, CategoryName, get_category, rename_category},
    endpoints,
    html::{
        FORM_CONTAINER_STYLE, FORM_ERROR_STYLE, FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE,
        LINK_STYLE, base, submit_button,
    },
    navigation::NavBar,
};

/// The state needed for renaming a category.
#[derive(Debug, Clone)]
pub struct EditCategoryState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for EditCategoryState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RenameCategoryForm {
    #[serde(default)]
    pub name: String,
}

/// Render the rename form for one of the user's categories.
///
/// Responds with the 404 page if the category does not exist or belongs to someone else.
pub async fn get_edit_category_page(
    Path(category_id): Path<CategoryId>,
    State(state): State<EditCategoryState>,
    Extension(user_id): Extension<UserID>,
) -> Result<Response, Error> {
    let category = {
        let connection = state
            .db_connection
            .lock()
            .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
            .map_err(|_| Error::DatabaseLockError)?;

        get_category(category_id, user_id, &connection)?
    };

    let nav_bar = NavBar::new(endpoints::CATEGORIES).into_html();
    let update_endpoint = endpoints::format_endpoint(endpoints::EDIT_CATEGORY, category_id);
    let form = rename_form(&update_endpoint, category.name.as_ref(), None);

    let content = html! {
        (nav_bar)

        div class=(FORM_CONTAINER_STYLE)
        {
            div class="w-full max-w-md space-y-4"
            {
                h1 class="text-xl font-bold" { "Rename category" }
                (form)
                a href=(endpoints::CATEGORIES) class=(LINK_STYLE) { "Back to categories" }
            }
        }
    };

    Ok(base("Rename Category", &[], &content).into_response())
}

fn rename_form(update_endpoint: &str, name: &str, error_message: Option<&str>) -> Markup {
    html! {
        form
            hx-post=(update_endpoint)
            hx-swap="outerHTML"
            hx-target-error="#alert-container"
            hx-indicator="#indicator"
            hx-disabled-elt="#submit-button"
            class="w-full space-y-4 md:space-y-6"
        {
            div
            {
                label for="name" class=(FORM_LABEL_STYLE) { "Name" }

                input
                    id="name"
                    type="text"
                    name="name"
                    required
                    autofocus
                    value=(name)
                    class=(FORM_TEXT_INPUT_STYLE);

                @if let Some(error_message) = error_message {
                    p class=(FORM_ERROR_STYLE) { (error_message) }
                }
            }

            (submit_button("Save"))
        }
    }
}

/// Rename one of the user's categories and go back to the categories page.
///
/// An empty name re-renders the form with an error. Renaming onto a name the
/// user already has is rejected.
pub async fn rename_category_endpoint(
    Path(category_id): Path<CategoryId>,
    State(state): State<EditCategoryState>,
    Extension(user_id): Extension<UserID>,
    Form(form): Form<RenameCategoryForm>,
) -> Response {
    let update_endpoint = endpoints::format_endpoint(endpoints::EDIT_CATEGORY, category_id);

    let name = match CategoryName::new(&form.name) {
        Ok(name) => name,
        Err(error) => {
            return rename_form(&update_endpoint, &form.name, Some(&error.to_string()))
                .into_response();
        }
    };

    let result = match state.db_connection.lock() {
        Ok(connection) => rename_category(category_id, user_id, name, &connection),
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
        Err(error) => error.into_alert_response(),
    }
}

#[cfg(test)]
mod get_edit_category_page_tests {
    use std::sync::{Arc, Mutex};

    use axum::{
        Extension,
        extract::{Path, State},
        http::StatusCode,
        response::IntoResponse,
    };

    use crate::{
        category::get_category_by_name,
        endpoints,
        test_utils::{
            assert_form_input_with_value, assert_hx_endpoint, assert_valid_html,
            get_test_connection, insert_test_user, must_get_form, parse_html_document,
        },
    };

    use super::{EditCategoryState, get_edit_category_page};

    #[tokio::test]
    async fn renders_form_with_current_name() {
        let connection = get_test_connection();
        let user = insert_test_user("alice", &connection);
        let food = get_category_by_name("Food", user.id, &connection).unwrap();
        let state = EditCategoryState {
            db_connection: Arc::new(Mutex::new(connection)),
        };

        let response = get_edit_category_page(Path(food.id), State(state), Extension(user.id))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let html = parse_html_document(response).await;
        assert_valid_html(&html);
        let form = must_get_form(&html);
        assert_hx_endpoint(
            &form,
            &endpoints::format_endpoint(endpoints::EDIT_CATEGORY, food.id),
            "hx-post",
        );
        assert_form_input_with_value(&form, "name", "text", "Food");
    }

    #[tokio::test]
    async fn other_users_category_is_not_found() {
        let connection = get_test_connection();
        let alice = insert_test_user("alice", &connection);
        let bob = insert_test_user("bobby", &connection);
        let food = get_category_by_name("Food", alice.id, &connection).unwrap();
        let state = EditCategoryState {
            db_connection: Arc::new(Mutex::new(connection)),
        };

        let response = get_edit_category_page(Path(food.id), State(state), Extension(bob.id))
            .await
            .into_response();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}

#[cfg(test)]
mod rename_category_endpoint_tests {
    use std::sync::{Arc, Mutex};

    use axum::{
        Extension,
        extract::{Path, State},
        http::StatusCode,
    };
    use axum_extra::extract::Form;

    use crate::{
        category::{get_category, get_category_by_name},
        endpoints,
        test_utils::{
            assert_form_error_message, assert_hx_redirect, element_texts, get_test_connection,
            insert_test_user, must_get_form, parse_html_fragment,
        },
    };

    use super::{EditCategoryState, RenameCategoryForm, rename_category_endpoint};

    fn form(name: &str) -> Form<RenameCategoryForm> {
        Form(RenameCategoryForm {
            name: name.to_owned(),
        })
    }

    #[tokio::test]
    async fn rename_succeeds() {
        let connection = get_test_connection();
        let user = insert_test_user("alice", &connection);
        let food = get_category_by_name("Food", user.id, &connection).unwrap();
        let db_connection = Arc::new(Mutex::new(connection));
        let state = EditCategoryState {
            db_connection: db_connection.clone(),
        };

        let response =
            rename_category_endpoint(Path(food.id), State(state), Extension(user.id), form("Groceries"))
                .await;

        assert_hx_redirect(&response, endpoints::CATEGORIES);
        let renamed = get_category(food.id, user.id, &db_connection.lock().unwrap()).unwrap();
        assert_eq!(renamed.name.as_ref(), "Groceries");
    }

    #[tokio::test]
    async fn rename_to_existing_name_is_blocked() {
        let connection = get_test_connection();
        let user = insert_test_user("alice", &connection);
        let food = get_category_by_name("Food", user.id, &connection).unwrap();
        let db_connection = Arc::new(Mutex::new(connection));
        let state = EditCategoryState {
            db_connection: db_connection.clone(),
        };

        let response =
            rename_category_endpoint(Path(food.id), State(state), Extension(user.id), form("Rent"))
                .await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let html = parse_html_fragment(response).await;
        assert_eq!(
            element_texts(&html, "p.font-medium"),
            ["Category with this name already exists"]
        );
        let unchanged = get_category(food.id, user.id, &db_connection.lock().unwrap()).unwrap();
        assert_eq!(unchanged.name.as_ref(), "Food");
    }

    #[tokio::test]
    async fn empty_name_rerenders_form() {
        let connection = get_test_connection();
        let user = insert_test_user("alice", &connection);
        let food = get_category_by_name("Food", user.id, &connection).unwrap();
        let state = EditCategoryState {
            db_connection: Arc::new(Mutex::new(connection)),
        };

        let response =
            rename_category_endpoint(Path(food.id), State(state), Extension(user.id), form(" "))
                .await;

        assert_eq!(response.status(), StatusCode::OK);
        let html = parse_html_fragment(response).await;
        assert_form_error_message(&must_get_form(&html), "Category name cannot be empty");
    }

    #[tokio::test]
    async fn other_users_category_is_not_found() {
        let connection = get_test_connection();
        let alice = insert_test_user("alice", &connection);
        let bob = insert_test_user("bobby", &connection);
        let food = get_category_by_name("Food", alice.id, &connection).unwrap();
        let state = EditCategoryState {
            db_connection: Arc::new(Mutex::new(connection)),
        };

        let response =
            rename_category_endpoint(Path(food.id), State(state), Extension(bob.id), form("Mine"))
                .await;

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}

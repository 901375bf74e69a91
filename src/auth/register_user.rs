//! The registration page and the handler that creates new users.
use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, State},
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
    auth::{PasswordHash, Username, ValidatedPassword, create_user},
    category::create_default_categories,
    endpoints,
    html::{
        FORM_ERROR_STYLE, FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE, LINK_STYLE, base,
        log_in_register, password_input, submit_button,
    },
};

const DUPLICATE_USERNAME_ERROR_MSG: &str = "Username already taken. Please choose another.";
const PASSWORD_MISMATCH_ERROR_MSG: &str = "Passwords do not match";
const INTERNAL_ERROR_MSG: &str = "An internal error occurred. Please try again later.";

/// Error messages to show under each field of the registration form.
#[derive(Default)]
struct FormErrors<'a> {
    username: Option<&'a str>,
    password: Option<&'a str>,
    confirm_password: Option<&'a str>,
}

pub fn username_input(username: &str, error_message: Option<&str>) -> Markup {
    html! {
        div
        {
            label for="username" class=(FORM_LABEL_STYLE) { "Username" }

            input
                type="text"
                name="username"
                id="username"
                class=(FORM_TEXT_INPUT_STYLE)
                required
                autofocus
                autocomplete="username"
                value=(username);

            @if let Some(error_message) = error_message
            {
                p class=(FORM_ERROR_STYLE) { (error_message) }
            }
        }
    }
}

fn confirm_password_input(error_message: Option<&str>) -> Markup {
    html! {
        div
        {
            label
                for="confirm-password"
                class=(FORM_LABEL_STYLE)
            {
                "Confirm Password"
            }

            input
                type="password"
                name="confirm_password"
                id="confirm-password"
                placeholder="••••••••"
                class=(FORM_TEXT_INPUT_STYLE)
                required;

            @if let Some(error_message) = error_message
            {
                p class=(FORM_ERROR_STYLE) { (error_message) }
            }
        }
    }
}

fn registration_form(username: &str, password: &str, errors: FormErrors) -> Markup {
    html! {
        form
            hx-post=(endpoints::REGISTER)
            hx-swap="outerHTML"
            hx-indicator="#indicator"
            hx-disabled-elt="#submit-button"
            class="space-y-4 md:space-y-6"
        {
            (username_input(username, errors.username))
            (password_input(password, errors.password))
            (confirm_password_input(errors.confirm_password))
            (submit_button("Register"))

            p class="text-sm font-light text-gray-500 dark:text-gray-400"
            {
                "Already have an account? "
                a href=(endpoints::LOG_IN) tabindex="0" class=(LINK_STYLE) { "Log in here" }
            }
        }
    }
}

/// Display the registration page.
pub async fn get_register_page() -> Response {
    let registration_form = registration_form("", "", FormErrors::default());
    let content = log_in_register("Create an account", &registration_form);
    base("Register", &[], &content).into_response()
}

/// The state needed for creating a new user.
#[derive(Debug, Clone)]
pub struct RegistrationState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for RegistrationState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

#[derive(Serialize, Deserialize)]
pub struct RegisterForm {
    pub username: String,
    pub password: String,
    pub confirm_password: String,
}

/// Create a user with the default categories and send them to the log in page.
///
/// Invalid input re-renders the form with an error under the offending field.
pub async fn register_user(
    State(state): State<RegistrationState>,
    Form(user_data): Form<RegisterForm>,
) -> Response {
    let username = match Username::new(&user_data.username) {
        Ok(username) => username,
        Err(error) => {
            let message = error.to_string();
            return registration_form(
                &user_data.username,
                &user_data.password,
                FormErrors {
                    username: Some(&message),
                    ..Default::default()
                },
            )
            .into_response();
        }
    };

    let validated_password = match ValidatedPassword::new(&user_data.password, &[username.as_ref()])
    {
        Ok(password) => password,
        Err(error) => {
            let message = error.to_string();
            return registration_form(
                &user_data.username,
                &user_data.password,
                FormErrors {
                    password: Some(&message),
                    ..Default::default()
                },
            )
            .into_response();
        }
    };

    if user_data.password != user_data.confirm_password {
        return registration_form(
            &user_data.username,
            &user_data.password,
            FormErrors {
                confirm_password: Some(PASSWORD_MISMATCH_ERROR_MSG),
                ..Default::default()
            },
        )
        .into_response();
    }

    let password_hash = match PasswordHash::new(validated_password, PasswordHash::DEFAULT_COST) {
        Ok(hash) => hash,
        Err(error) => {
            tracing::error!("an error occurred while hashing a password: {error}");
            return registration_form(
                &user_data.username,
                "",
                FormErrors {
                    password: Some(INTERNAL_ERROR_MSG),
                    ..Default::default()
                },
            )
            .into_response();
        }
    };

    let result = match state.db_connection.lock() {
        Ok(connection) => create_user_with_categories(username, password_hash, &connection),
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            Err(Error::DatabaseLockError)
        }
    };

    match result {
        Ok(()) => (
            HxRedirect(endpoints::LOG_IN.to_owned()),
            StatusCode::SEE_OTHER,
        )
            .into_response(),
        Err(Error::DuplicateUsername(_)) => registration_form(
            &user_data.username,
            "",
            FormErrors {
                username: Some(DUPLICATE_USERNAME_ERROR_MSG),
                ..Default::default()
            },
        )
        .into_response(),
        Err(error) => {
            tracing::error!("An unhandled error occurred while inserting a new user: {error}");
            registration_form(
                &user_data.username,
                "",
                FormErrors {
                    password: Some(INTERNAL_ERROR_MSG),
                    ..Default::default()
                },
            )
            .into_response()
        }
    }
}

/// Insert the user and their starter categories together so a failure leaves neither behind.
fn create_user_with_categories(
    username: Username,
    password_hash: PasswordHash,
    connection: &Connection,
) -> Result<(), Error> {
    let transaction = connection.unchecked_transaction()?;

    let user = create_user(username, password_hash, &transaction)?;
    create_default_categories(user.id, &transaction)?;

    transaction.commit()?;

    Ok(())
}

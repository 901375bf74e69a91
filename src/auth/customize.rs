//! The page where a user picks the name they are greeted with.

use std::sync::{Arc, Mutex};

use axum::{
    Extension,
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
    auth::{DisplayName, UserID, get_user_by_id, set_display_name},
    endpoints,
    html::{
        FORM_ERROR_STYLE, FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE, base, log_in_register,
        submit_button,
    },
};

#[derive(Debug, Clone)]
pub struct CustomizeState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for CustomizeState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

#[derive(Serialize, Deserialize)]
pub struct CustomizeForm {
    pub name: String,
}

fn customize_form(name: &str, error_message: Option<&str>) -> Markup {
    html! {
        form
            hx-post=(endpoints::CUSTOMIZE)
            hx-swap="outerHTML"
            hx-target-error="#alert-container"
            hx-indicator="#indicator"
            hx-disabled-elt="#submit-button"
            class="space-y-4 md:space-y-6"
        {
            div
            {
                label for="name" class=(FORM_LABEL_STYLE) { "What should we call you?" }

                input
                    type="text"
                    name="name"
                    id="name"
                    class=(FORM_TEXT_INPUT_STYLE)
                    required
                    autofocus
                    value=(name);

                @if let Some(error_message) = error_message
                {
                    p class=(FORM_ERROR_STYLE) { (error_message) }
                }
            }

            (submit_button("Save"))
        }
    }
}

/// Show the display name form, filled in with the current name if there is one.
pub async fn get_customize_page(
    State(state): State<CustomizeState>,
    Extension(user_id): Extension<UserID>,
) -> Result<Response, Error> {
    let user = {
        let connection = state
            .db_connection
            .lock()
            .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
            .map_err(|_| Error::DatabaseLockError)?;

        get_user_by_id(user_id, &connection)?
    };

    let current_name = user.name.as_ref().map(AsRef::as_ref).unwrap_or_default();
    let form = customize_form(current_name, None);
    let content = log_in_register("Personalize your dashboard", &form);

    Ok(base("Customize", &[], &content).into_response())
}

/// Save the display name and go to the dashboard.
pub async fn post_customize(
    State(state): State<CustomizeState>,
    Extension(user_id): Extension<UserID>,
    Form(form): Form<CustomizeForm>,
) -> Response {
    let name = match DisplayName::new(&form.name) {
        Ok(name) => name,
        Err(error) => {
            return customize_form(&form.name, Some(&error.to_string())).into_response();
        }
    };

    let result = match state.db_connection.lock() {
        Ok(connection) => set_display_name(user_id, &name, &connection),
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
        Err(error) => error.into_alert_response(),
    }
}

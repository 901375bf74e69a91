//! Alert messages shown to users when a form submission fails.
//!
//! Alerts are rendered as HTML fragments and swapped into the `#alert-container`
//! element of the base page by HTMX.

use axum::response::{IntoResponse, Response};
use maud::{Markup, html};

/// A dismissable message for the user.
///
/// Successful submissions redirect instead, so every alert is an error.
#[derive(Debug, Clone, PartialEq)]
pub enum Alert {
    /// An error message with extra details.
    Error { message: String, details: String },
    /// An error message with no details.
    ErrorSimple { message: String },
}

impl Alert {
    pub fn into_html(self) -> Markup {
        let (message, details) = match self {
            Alert::Error { message, details } => (message, Some(details)),
            Alert::ErrorSimple { message } => (message, None),
        };

        html! {
            div
                class="flex items-start p-4 mb-4 text-sm text-red-800 border border-red-300 \
                    rounded-lg bg-red-50 dark:bg-gray-800 dark:text-red-400 dark:border-red-800"
                role="alert"
            {
                div class="flex-1"
                {
                    p class="font-medium" { (message) }

                    @if let Some(details) = details.filter(|details| !details.is_empty())
                    {
                        p class="mt-1" { (details) }
                    }
                }

                button
                    type="button"
                    aria-label="Dismiss"
                    class="ms-3 font-bold cursor-pointer"
                    onclick="this.closest('[role=alert]').remove()"
                {
                    "×"
                }
            }
        }
    }
}

impl IntoResponse for Alert {
    fn into_response(self) -> Response {
        self.into_html().into_response()
    }
}

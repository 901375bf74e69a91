//! The landing page for visitors who are not logged in.

use axum::response::{IntoResponse, Response};
use maud::html;

use crate::{
    endpoints,
    html::{LINK_STYLE, base, log_in_register},
};

/// Display a short introduction with links to log in and register.
pub async fn get_landing_page() -> Response {
    let content = html! {
        div class="space-y-4 text-gray-900 dark:text-white"
        {
            p
            {
                "Keep track of what you spend, group it into categories and \
                see where your money goes."
            }

            a
                href=(endpoints::LOG_IN)
                class="block w-full px-4 py-2 text-center bg-blue-500 dark:bg-blue-600 \
                    hover:bg-blue-600 hover:dark:bg-blue-700 text-white rounded"
            {
                "Log in"
            }

            p class="text-sm font-light text-gray-500 dark:text-gray-400"
            {
                "New here? "
                a href=(endpoints::REGISTER) class=(LINK_STYLE) { "Create an account" }
            }
        }
    };

    base("Welcome", &[], &log_in_register("Welcome", &content)).into_response()
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use scraper::Selector;

    use crate::{
        endpoints,
        test_utils::{assert_valid_html, parse_html_document},
    };

    use super::get_landing_page;

    #[tokio::test]
    async fn links_to_log_in_and_register() {
        let response = get_landing_page().await;

        assert_eq!(response.status(), StatusCode::OK);
        let html = parse_html_document(response).await;
        assert_valid_html(&html);

        for endpoint in [endpoints::LOG_IN, endpoints::REGISTER] {
            let selector = Selector::parse(&format!("a[href=\"{endpoint}\"]")).unwrap();
            assert_eq!(html.select(&selector).count(), 1, "want one link to {endpoint}");
        }
    }
}

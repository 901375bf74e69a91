//! The category management page.

use std::sync::{Arc, Mutex};

use axum::{
    Extension,
    extract::{FromRef, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    auth::UserID,
    category::{Category, count_expenses_per_category, get_categories},
    endpoints,
    html::{
        BUTTON_DELETE_STYLE, FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE, LINK_STYLE,
        PAGE_CONTAINER_STYLE, TABLE_CELL_STYLE, TABLE_HEADER_STYLE, TABLE_ROW_STYLE, base,
    },
    navigation::NavBar,
};

/// The state needed for the categories page.
#[derive(Debug, Clone)]
pub struct CategoriesPageState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for CategoriesPageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

struct CategoryRow {
    category: Category,
    edit_url: String,
    delete_url: String,
    expense_count: u32,
}

/// Render the user's categories with the number of expenses in each.
pub async fn get_categories_page(
    State(state): State<CategoriesPageState>,
    Extension(user_id): Extension<UserID>,
) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let categories = get_categories(user_id, &connection)
        .inspect_err(|error| tracing::error!("Failed to retrieve categories: {error}"))?;
    let expenses_per_category = count_expenses_per_category(user_id, &connection)
        .inspect_err(|error| tracing::error!("Could not count expenses per category: {error}"))?;

    let rows = categories
        .into_iter()
        .map(|category| CategoryRow {
            edit_url: endpoints::format_endpoint(endpoints::EDIT_CATEGORY, category.id),
            delete_url: endpoints::format_endpoint(endpoints::DELETE_CATEGORY, category.id),
            expense_count: expenses_per_category
                .get(&category.id)
                .copied()
                .unwrap_or_default(),
            category,
        })
        .collect::<Vec<_>>();

    Ok(categories_view(&rows).into_response())
}

fn add_category_form() -> Markup {
    html! {
        form
            hx-post=(endpoints::ADD_CATEGORY)
            hx-target-error="#alert-container"
            class="flex items-end gap-4"
        {
            div class="grow"
            {
                label for="new_category" class=(FORM_LABEL_STYLE) { "New category" }

                input
                    id="new_category"
                    type="text"
                    name="new_category"
                    placeholder="e.g. Groceries"
                    required
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            button
                type="submit"
                class="px-4 py-2.5 bg-blue-500 dark:bg-blue-600 hover:bg-blue-600 \
                    hover:dark:bg-blue-700 text-white rounded"
            {
                "Add"
            }
        }
    }
}

fn categories_view(rows: &[CategoryRow]) -> Markup {
    let nav_bar = NavBar::new(endpoints::CATEGORIES).into_html();

    let table_row = |row: &CategoryRow| {
        let confirm_message = format!(
            "Are you sure you want to delete '{}'?",
            row.category.name
        );

        html!(
            tr class=(TABLE_ROW_STYLE)
            {
                td class=(TABLE_CELL_STYLE) { (row.category.name) }
                td class=(TABLE_CELL_STYLE) { (row.expense_count) }
                td class=(TABLE_CELL_STYLE)
                {
                    div class="flex gap-4"
                    {
                        a href=(row.edit_url) class=(LINK_STYLE) { "Rename" }

                        button
                            hx-post=(row.delete_url)
                            hx-confirm=(confirm_message)
                            hx-target-error="#alert-container"
                            class=(BUTTON_DELETE_STYLE)
                        {
                            "Delete"
                        }
                    }
                }
            }
        )
    };

    let content = html!(
        (nav_bar)

        main class=(PAGE_CONTAINER_STYLE)
        {
            section class="space-y-4 max-w-3xl mx-auto"
            {
                h1 class="text-xl font-bold" { "Categories" }

                (add_category_form())

                table class="w-full text-sm text-left rtl:text-right text-gray-500 dark:text-gray-400"
                {
                    thead class=(TABLE_HEADER_STYLE)
                    {
                        tr
                        {
                            th scope="col" class=(TABLE_CELL_STYLE) { "Name" }
                            th scope="col" class=(TABLE_CELL_STYLE) { "Expenses" }
                            th scope="col" class=(TABLE_CELL_STYLE) { "Actions" }
                        }
                    }

                    tbody
                    {
                        @for row in rows {
                            (table_row(row))
                        }

                        @if rows.is_empty() {
                            tr
                            {
                                td colspan="3" class="px-6 py-4 text-center"
                                {
                                    "No categories yet. Add one above to start grouping your expenses."
                                }
                            }
                        }
                    }
                }
            }
        }
    );

    base("Categories", &[], &content)
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::{Extension, extract::State, http::StatusCode};
    use time::macros::date;

    use crate::{
        category::get_category_by_name,
        endpoints,
        test_utils::{
            assert_form_input, assert_hx_endpoint, assert_valid_html, element_texts,
            get_test_connection, insert_test_expense, insert_test_user, must_get_form,
            parse_html_document,
        },
    };

    use super::{CategoriesPageState, get_categories_page};

    #[tokio::test]
    async fn lists_categories_with_expense_counts() {
        let connection = get_test_connection();
        let user = insert_test_user("alice", &connection);
        let food = get_category_by_name("Food", user.id, &connection).unwrap();
        insert_test_expense(
            &user,
            "Lunch",
            12.0,
            date!(2024 - 05 - 01),
            Some(food.id),
            &connection,
        );
        let state = CategoriesPageState {
            db_connection: Arc::new(Mutex::new(connection)),
        };

        let response = get_categories_page(State(state), Extension(user.id))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let html = parse_html_document(response).await;
        assert_valid_html(&html);

        let form = must_get_form(&html);
        assert_hx_endpoint(&form, endpoints::ADD_CATEGORY, "hx-post");
        assert_form_input(&form, "new_category", "text");

        let names = element_texts(&html, "tbody tr td:first-child");
        assert_eq!(
            names,
            [
                "Entertainment",
                "Food",
                "Rent",
                "Subscriptions",
                "Transportation",
                "Utilities"
            ]
        );
        let counts = element_texts(&html, "tbody tr td:nth-child(2)");
        assert_eq!(counts, ["0", "1", "0", "0", "0", "0"]);
    }

    #[tokio::test]
    async fn rows_link_to_rename_and_delete() {
        let connection = get_test_connection();
        let user = insert_test_user("alice", &connection);
        let food = get_category_by_name("Food", user.id, &connection).unwrap();
        let state = CategoriesPageState {
            db_connection: Arc::new(Mutex::new(connection)),
        };

        let response = get_categories_page(State(state), Extension(user.id))
            .await
            .unwrap();

        let html = parse_html_document(response).await;
        let edit_url = endpoints::format_endpoint(endpoints::EDIT_CATEGORY, food.id);
        let delete_url = endpoints::format_endpoint(endpoints::DELETE_CATEGORY, food.id);
        let edit_selector = scraper::Selector::parse(&format!("a[href=\"{edit_url}\"]")).unwrap();
        let delete_selector =
            scraper::Selector::parse(&format!("button[hx-post=\"{delete_url}\"]")).unwrap();
        assert_eq!(html.select(&edit_selector).count(), 1);
        assert_eq!(html.select(&delete_selector).count(), 1);
    }
}

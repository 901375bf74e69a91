//! HTTP handler for the dashboard page.

use std::sync::{Arc, Mutex};

use axum::{
    Extension,
    extract::{FromRef, Query, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use rusqlite::Connection;
use time::Date;

use crate::{
    AppState, Error,
    auth::{UserID, get_user_by_id},
    category::{Category, get_categories},
    endpoints,
    expense::form::{ExpenseFieldValues, expense_form_fields},
    filter::{ExpenseFilter, ExpenseRow, FilterQuery, get_filtered_expenses},
    html::{
        BUTTON_DELETE_STYLE, FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE, HeadElement, LINK_STYLE,
        PAGE_CONTAINER_STYLE, TABLE_CELL_STYLE, TABLE_HEADER_STYLE, TABLE_ROW_STYLE, base,
        format_currency, submit_button,
    },
    navigation::NavBar,
    timezone::local_today,
};

use super::{
    aggregation::{category_totals, day_totals, grand_total},
    charts::{
        DashboardChart, ECHARTS_SCRIPT_URL, category_chart, charts_script, charts_view, day_chart,
    },
};

/// The state needed for displaying the dashboard page.
#[derive(Debug, Clone)]
pub struct DashboardState {
    /// The database connection for reading expenses and categories.
    pub db_connection: Arc<Mutex<Connection>>,
    /// The local timezone as a canonical timezone name, e.g. "Pacific/Auckland".
    pub local_timezone: String,
}

impl FromRef<AppState> for DashboardState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            local_timezone: state.local_timezone.clone(),
        }
    }
}

/// Everything the dashboard view renders.
struct DashboardData<'a> {
    greeting_name: &'a str,
    today: Date,
    categories: &'a [Category],
    query: FilterQuery,
    rows: &'a [ExpenseRow],
    total: f64,
    charts: Vec<DashboardChart>,
}

/// Display the user's expenses that match the query's filters.
///
/// The table and the total only cover the filtered expenses, while the charts
/// always cover every expense the user has.
pub async fn get_dashboard_page(
    State(state): State<DashboardState>,
    Extension(user_id): Extension<UserID>,
    Query(query): Query<FilterQuery>,
) -> Result<Response, Error> {
    let filter = ExpenseFilter::from_query(&query)?;

    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let user = get_user_by_id(user_id, &connection)
        .inspect_err(|error| tracing::error!("could not get user {user_id}: {error}"))?;
    let categories = get_categories(user_id, &connection)
        .inspect_err(|error| tracing::error!("Failed to retrieve categories: {error}"))?;
    let filtered_expenses = get_filtered_expenses(user_id, &filter, &connection)
        .inspect_err(|error| tracing::error!("Failed to retrieve filtered expenses: {error}"))?;
    let all_expenses = get_filtered_expenses(user_id, &ExpenseFilter::default(), &connection)
        .inspect_err(|error| tracing::error!("Failed to retrieve expenses: {error}"))?;

    let today = local_today(&state.local_timezone)
        .inspect_err(|error| tracing::error!("could not get today's date: {error}"))?;

    let data = DashboardData {
        greeting_name: user.greeting_name(),
        today,
        categories: &categories,
        query: query.active(),
        total: grand_total(&filtered_expenses),
        rows: &filtered_expenses,
        charts: build_dashboard_charts(&all_expenses),
    };

    Ok(dashboard_view(&data).into_response())
}

/// Builds the charts over all of the user's expenses, or none if there are no expenses.
fn build_dashboard_charts(all_expenses: &[ExpenseRow]) -> Vec<DashboardChart> {
    if all_expenses.is_empty() {
        return Vec::new();
    }

    vec![
        DashboardChart {
            id: "category-chart",
            options: category_chart(&category_totals(all_expenses)).to_string(),
        },
        DashboardChart {
            id: "day-chart",
            options: day_chart(&day_totals(all_expenses)).to_string(),
        },
    ]
}

/// The query string that repeats the active filters, including the leading '?'.
fn filter_query_string(query: &FilterQuery) -> String {
    match serde_urlencoded::to_string(query) {
        Ok(query_string) if query_string.is_empty() => String::new(),
        Ok(query_string) => format!("?{query_string}"),
        Err(error) => {
            tracing::warn!("could not encode filter query {query:?}: {error}");
            String::new()
        }
    }
}

fn add_expense_form(today: Date, categories: &[Category]) -> Markup {
    let values = ExpenseFieldValues {
        description: "",
        amount: None,
        category: None,
        category_required: true,
        date: today,
    };

    html! {
        form
            id="add-expense-form"
            hx-post=(endpoints::ADD_EXPENSE)
            hx-target-error="#alert-container"
            class="grid grid-cols-1 md:grid-cols-5 gap-4 items-end w-full"
        {
            (expense_form_fields(&values, categories))

            (submit_button("Add expense"))
        }
    }
}

fn filter_form(query: &FilterQuery, categories: &[Category]) -> Markup {
    let selected_category = query.filter_category.as_deref();
    let export_url = format!("{}{}", endpoints::EXPORT_CSV, filter_query_string(query));
    let clear_url = format!("{}?clear_filters=true", endpoints::DASHBOARD);

    html! {
        form
            id="filter-form"
            method="get"
            action=(endpoints::DASHBOARD)
            class="grid grid-cols-2 md:grid-cols-6 gap-4 items-end w-full"
        {
            div
            {
                label for="start" class=(FORM_LABEL_STYLE) { "From" }
                input
                    id="start"
                    name="start"
                    type="date"
                    value=[query.start.as_deref()]
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            div
            {
                label for="end" class=(FORM_LABEL_STYLE) { "To" }
                input
                    id="end"
                    name="end"
                    type="date"
                    value=[query.end.as_deref()]
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            div
            {
                label for="min_amount" class=(FORM_LABEL_STYLE) { "Min amount" }
                input
                    id="min_amount"
                    name="min_amount"
                    type="number"
                    step="0.01"
                    value=[query.min_amount.as_deref()]
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            div
            {
                label for="max_amount" class=(FORM_LABEL_STYLE) { "Max amount" }
                input
                    id="max_amount"
                    name="max_amount"
                    type="number"
                    step="0.01"
                    value=[query.max_amount.as_deref()]
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            div
            {
                label for="filter_category" class=(FORM_LABEL_STYLE) { "Category" }
                select
                    id="filter_category"
                    name="filter_category"
                    class=(FORM_TEXT_INPUT_STYLE)
                {
                    option value="" selected[selected_category.is_none()] { "All categories" }

                    @for category in categories {
                        @let name = category.name.as_ref();
                        option value=(name) selected[selected_category == Some(name)] { (name) }
                    }
                }
            }

            div class="flex flex-col gap-2"
            {
                button
                    type="submit"
                    class="px-4 py-2.5 bg-blue-500 dark:bg-blue-600 hover:bg-blue-600 \
                        hover:dark:bg-blue-700 text-white rounded"
                {
                    "Filter"
                }

                div class="flex gap-4 justify-center text-sm"
                {
                    a id="clear-filters" href=(clear_url) class=(LINK_STYLE) { "Clear" }
                    a id="export-csv" href=(export_url) class=(LINK_STYLE) { "Export CSV" }
                }
            }
        }
    }
}

fn expense_table(rows: &[ExpenseRow], total: f64) -> Markup {
    let table_row = |row: &ExpenseRow| {
        let edit_url = endpoints::format_endpoint(endpoints::EDIT_EXPENSE, row.id);
        let delete_url = endpoints::format_endpoint(endpoints::DELETE_EXPENSE, row.id);
        let confirm_message = format!("Are you sure you want to delete '{}'?", row.description);

        html!(
            tr class=(TABLE_ROW_STYLE)
            {
                td class=(TABLE_CELL_STYLE) { (row.date) }
                td class=(TABLE_CELL_STYLE) { (row.description) }
                td class=(TABLE_CELL_STYLE) { (row.category_name.as_deref().unwrap_or("")) }
                td class="px-6 py-4 text-right" { (format_currency(row.amount)) }
                td class=(TABLE_CELL_STYLE)
                {
                    div class="flex gap-4"
                    {
                        a href=(edit_url) class=(LINK_STYLE) { "Edit" }

                        button
                            hx-post=(delete_url)
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

    html! {
        table
            id="expense-table"
            class="w-full text-sm text-left rtl:text-right text-gray-500 dark:text-gray-400"
        {
            thead class=(TABLE_HEADER_STYLE)
            {
                tr
                {
                    th scope="col" class=(TABLE_CELL_STYLE) { "Date" }
                    th scope="col" class=(TABLE_CELL_STYLE) { "Description" }
                    th scope="col" class=(TABLE_CELL_STYLE) { "Category" }
                    th scope="col" class="px-6 py-4 text-right" { "Amount" }
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
                        td colspan="5" class="px-6 py-4 text-center"
                        {
                            "No expenses match these filters."
                        }
                    }
                }
            }

            tfoot class="font-semibold text-gray-900 dark:text-white"
            {
                tr
                {
                    th scope="row" colspan="3" class=(TABLE_CELL_STYLE) { "Total" }
                    td id="grand-total" class="px-6 py-4 text-right" { (format_currency(total)) }
                    td {}
                }
            }
        }
    }
}

fn dashboard_view(data: &DashboardData<'_>) -> Markup {
    let nav_bar = NavBar::new(endpoints::DASHBOARD).into_html();

    let content = html!(
        (nav_bar)

        main class=(PAGE_CONTAINER_STYLE)
        {
            div class="w-full max-w-screen-xl mx-auto space-y-8"
            {
                h1 class="text-xl font-bold" { "Hello, " (data.greeting_name) "!" }

                section class="space-y-2"
                {
                    h2 class="text-lg font-semibold" { "Add an expense" }
                    (add_expense_form(data.today, data.categories))
                }

                @if data.charts.is_empty() {
                    p class="text-gray-500 dark:text-gray-400"
                    {
                        "Charts of your spending will show up here once you add an expense."
                    }
                } @else {
                    (charts_view(&data.charts))
                }

                section class="space-y-4"
                {
                    h2 class="text-lg font-semibold" { "Expenses" }
                    (filter_form(&data.query, data.categories))
                    (expense_table(data.rows, data.total))
                }
            }
        }
    );

    if data.charts.is_empty() {
        return base("Dashboard", &[], &content);
    }

    let scripts = [
        HeadElement::ScriptLink(ECHARTS_SCRIPT_URL.to_owned()),
        charts_script(&data.charts),
    ];

    base("Dashboard", &scripts, &content)
}

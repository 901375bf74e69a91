//! Downloads the dashboard's filtered expenses as a CSV file.

use std::sync::{Arc, Mutex};

use axum::{
    Extension,
    extract::{FromRef, Query, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    auth::UserID,
    filter::{ExpenseFilter, ExpenseRow, FilterQuery, get_filtered_expenses},
};

/// The state needed for exporting expenses.
#[derive(Debug, Clone)]
pub struct ExportState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for ExportState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Respond with the user's expenses that match the query's filters as a CSV attachment.
///
/// Takes the same query parameters as the dashboard.
pub async fn export_csv(
    State(state): State<ExportState>,
    Extension(user_id): Extension<UserID>,
    Query(query): Query<FilterQuery>,
) -> Result<Response, Error> {
    let filter = ExpenseFilter::from_query(&query)?;

    let expenses = {
        let connection = state
            .db_connection
            .lock()
            .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
            .map_err(|_| Error::DatabaseLockError)?;

        get_filtered_expenses(user_id, &filter, &connection)
            .inspect_err(|error| tracing::error!("Failed to retrieve expenses: {error}"))?
    };

    let body = expenses_to_csv(&expenses)
        .inspect_err(|error| tracing::error!("could not write CSV: {error}"))?;
    let content_disposition = format!("attachment; filename=\"{}\"", export_filename(&filter));

    tracing::info!("User {user_id} exported {} expenses", expenses.len());

    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_owned()),
            (header::CONTENT_DISPOSITION, content_disposition),
        ],
        body,
    )
        .into_response())
}

/// The download's file name, e.g. "expenses_2024-01-01_to_all.csv".
fn export_filename(filter: &ExpenseFilter) -> String {
    let start = filter
        .start
        .map_or_else(|| "all".to_owned(), |date| date.to_string());
    let end = filter
        .end
        .map_or_else(|| "all".to_owned(), |date| date.to_string());

    format!("expenses_{start}_to_{end}.csv")
}

/// Write `expenses` with a `date,description,category,amount` header.
///
/// Uncategorised expenses get an empty category and amounts always have two decimal places.
fn expenses_to_csv(expenses: &[ExpenseRow]) -> Result<Vec<u8>, Error> {
    let mut writer = csv::WriterBuilder::new()
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    writer.write_record(["date", "description", "category", "amount"])?;

    for expense in expenses {
        writer.write_record([
            expense.date.to_string().as_str(),
            expense.description.as_str(),
            expense.category_name.as_deref().unwrap_or(""),
            format!("{:.2}", expense.amount).as_str(),
        ])?;
    }

    writer
        .into_inner()
        .map_err(|error| Error::CsvError(error.to_string()))
}

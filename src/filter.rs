//! Turns the dashboard's query parameters into a typed filter and runs it.
//!
//! The same filter drives the dashboard table, the grand total and the CSV export.

use rusqlite::{Connection, params_from_iter, types::Value};
use serde::{Deserialize, Serialize};
use time::Date;

use crate::{
    Error,
    auth::UserID,
    expense::{ExpenseId, form::non_empty, parse_date},
};

/// The raw filter parameters as they appear in the dashboard and export URLs.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterQuery {
    pub start: Option<String>,
    pub end: Option<String>,
    pub min_amount: Option<String>,
    pub max_amount: Option<String>,
    pub filter_category: Option<String>,
    pub clear_filters: Option<String>,
}

/// A parsed filter. Every present bound must hold for an expense to match.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct ExpenseFilter {
    /// Earliest date to include.
    pub start: Option<Date>,
    /// Latest date to include.
    pub end: Option<Date>,
    /// Smallest amount to include.
    pub min_amount: Option<f64>,
    /// Largest amount to include.
    pub max_amount: Option<f64>,
    /// Only include expenses in the category with exactly this name.
    pub category: Option<String>,
}

impl ExpenseFilter {
    /// Parse the query parameters.
    ///
    /// `clear_filters=true` ignores every other parameter. Blank values are
    /// ignored, as are dates that are not written as YYYY-MM-DD.
    ///
    /// # Errors
    ///
    /// Returns [Error::InvalidAmountFilter] if an amount bound is not a finite number.
    pub fn from_query(query: &FilterQuery) -> Result<Self, Error> {
        if query.is_cleared() {
            return Ok(Self::default());
        }

        Ok(Self {
            start: non_empty(query.start.as_deref()).and_then(parse_date),
            end: non_empty(query.end.as_deref()).and_then(parse_date),
            min_amount: parse_amount_bound(query.min_amount.as_deref())?,
            max_amount: parse_amount_bound(query.max_amount.as_deref())?,
            category: non_empty(query.filter_category.as_deref()).map(str::to_owned),
        })
    }
}

impl FilterQuery {
    /// Whether the user asked to drop all filters.
    pub fn is_cleared(&self) -> bool {
        self.clear_filters.as_deref().map(str::trim) == Some("true")
    }

    /// The parameters to carry over to links such as the CSV export, without
    /// blank values or the clear flag.
    pub fn active(&self) -> FilterQuery {
        if self.is_cleared() {
            return FilterQuery::default();
        }

        let keep = |value: &Option<String>| non_empty(value.as_deref()).map(str::to_owned);

        FilterQuery {
            start: keep(&self.start),
            end: keep(&self.end),
            min_amount: keep(&self.min_amount),
            max_amount: keep(&self.max_amount),
            filter_category: keep(&self.filter_category),
            clear_filters: None,
        }
    }
}

fn parse_amount_bound(raw: Option<&str>) -> Result<Option<f64>, Error> {
    let Some(raw) = non_empty(raw) else {
        return Ok(None);
    };

    match raw.parse::<f64>() {
        Ok(amount) if amount.is_finite() => Ok(Some(amount)),
        _ => Err(Error::InvalidAmountFilter(raw.to_owned())),
    }
}

/// An expense joined with the name of its category, as shown in the table and export.
#[derive(Debug, Clone, PartialEq)]
pub struct ExpenseRow {
    pub id: ExpenseId,
    pub description: String,
    pub amount: f64,
    pub date: Date,
    pub category_name: Option<String>,
}

/// Get the user's expenses that match `filter`, newest first.
///
/// Expenses on the same day are ordered by ID so the order is stable.
///
/// # Errors
/// Returns [Error::SqlError] if the query fails.
pub fn get_filtered_expenses(
    user_id: UserID,
    filter: &ExpenseFilter,
    connection: &Connection,
) -> Result<Vec<ExpenseRow>, Error> {
    let mut where_clause_parts = vec!["expense.user_id = ?1".to_owned()];
    let mut query_parameters = vec![Value::Integer(user_id.as_i64())];

    let mut push_condition = |condition: &str, value: Value| {
        query_parameters.push(value);
        where_clause_parts.push(format!("{condition} ?{}", query_parameters.len()));
    };

    if let Some(start) = filter.start {
        push_condition("expense.date >=", Value::Text(start.to_string()));
    }

    if let Some(end) = filter.end {
        push_condition("expense.date <=", Value::Text(end.to_string()));
    }

    if let Some(min_amount) = filter.min_amount {
        push_condition("expense.amount >=", Value::Real(min_amount));
    }

    if let Some(max_amount) = filter.max_amount {
        push_condition("expense.amount <=", Value::Real(max_amount));
    }

    if let Some(category) = &filter.category {
        push_condition("category.name =", Value::Text(category.clone()));
    }

    let query = format!(
        "SELECT expense.id, expense.description, expense.amount, expense.date, category.name \
        FROM expense \
        LEFT JOIN category ON expense.category_id = category.id \
        WHERE {} \
        ORDER BY expense.date DESC, expense.id ASC",
        where_clause_parts.join(" AND ")
    );

    connection
        .prepare(&query)?
        .query_map(params_from_iter(query_parameters.iter()), |row| {
            Ok(ExpenseRow {
                id: row.get(0)?,
                description: row.get(1)?,
                amount: row.get(2)?,
                date: row.get(3)?,
                category_name: row.get(4)?,
            })
        })?
        .map(|row_result| row_result.map_err(Error::SqlError))
        .collect()
}


#[cfg(test)]
mod query_tests {
    use time::macros::date;

    use crate::{
        category::get_category_by_name,
        test_utils::{get_test_connection, insert_test_expense, insert_test_user},
    };

    use super::{ExpenseFilter, get_filtered_expenses};

    fn descriptions(rows: Vec<super::ExpenseRow>) -> Vec<String> {
        rows.into_iter().map(|row| row.description).collect()
    }

    #[test]
    fn no_filter_returns_own_expenses_newest_first() {
        let connection = get_test_connection();
        let alice = insert_test_user("alice", &connection);
        let bob = insert_test_user("bobby", &connection);
        insert_test_expense(&alice, "first", 1.0, date!(2024 - 01 - 01), None, &connection);
        insert_test_expense(&alice, "second", 2.0, date!(2024 - 01 - 02), None, &connection);
        insert_test_expense(&alice, "also second", 3.0, date!(2024 - 01 - 02), None, &connection);
        insert_test_expense(&bob, "bob's", 4.0, date!(2024 - 01 - 03), None, &connection);

        let rows = get_filtered_expenses(alice.id, &ExpenseFilter::default(), &connection).unwrap();

        assert_eq!(descriptions(rows), ["second", "also second", "first"]);
    }

    #[test]
    fn bounds_are_inclusive() {
        let connection = get_test_connection();
        let user = insert_test_user("alice", &connection);
        insert_test_expense(&user, "before", 10.0, date!(2024 - 01 - 09), None, &connection);
        insert_test_expense(&user, "start", 10.0, date!(2024 - 01 - 10), None, &connection);
        insert_test_expense(&user, "end", 20.0, date!(2024 - 01 - 20), None, &connection);
        insert_test_expense(&user, "after", 20.0, date!(2024 - 01 - 21), None, &connection);
        insert_test_expense(&user, "too cheap", 9.99, date!(2024 - 01 - 15), None, &connection);
        insert_test_expense(&user, "too dear", 20.01, date!(2024 - 01 - 15), None, &connection);

        let filter = ExpenseFilter {
            start: Some(date!(2024 - 01 - 10)),
            end: Some(date!(2024 - 01 - 20)),
            min_amount: Some(10.0),
            max_amount: Some(20.0),
            category: None,
        };
        let rows = get_filtered_expenses(user.id, &filter, &connection).unwrap();

        assert_eq!(descriptions(rows), ["end", "start"]);
    }

    #[test]
    fn category_filter_matches_name_exactly() {
        let connection = get_test_connection();
        let user = insert_test_user("alice", &connection);
        let food = get_category_by_name("Food", user.id, &connection).unwrap();
        let rent = get_category_by_name("Rent", user.id, &connection).unwrap();
        let day = date!(2024 - 01 - 10);
        insert_test_expense(&user, "lunch", 10.0, day, Some(food.id), &connection);
        insert_test_expense(&user, "march", 900.0, day, Some(rent.id), &connection);
        insert_test_expense(&user, "misc", 1.0, day, None, &connection);

        let filter = ExpenseFilter {
            category: Some("Food".to_owned()),
            ..Default::default()
        };
        let rows = get_filtered_expenses(user.id, &filter, &connection).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].category_name.as_deref(), Some("Food"));

        let filter = ExpenseFilter {
            category: Some("food".to_owned()),
            ..Default::default()
        };
        assert!(
            get_filtered_expenses(user.id, &filter, &connection)
                .unwrap()
                .is_empty()
        );
    }

    #[test]
    fn uncategorised_expenses_have_no_category_name() {
        let connection = get_test_connection();
        let user = insert_test_user("alice", &connection);
        insert_test_expense(&user, "misc", 1.0, date!(2024 - 01 - 10), None, &connection);

        let rows = get_filtered_expenses(user.id, &ExpenseFilter::default(), &connection).unwrap();

        assert_eq!(rows[0].category_name, None);
    }
}

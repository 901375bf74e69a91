//! The expense model and its database queries.

use rusqlite::{Connection, Row};
use serde::{Deserialize, Serialize};
use time::Date;

use crate::{Error, auth::UserID, category::CategoryId};

/// Database identifier for an expense.
pub type ExpenseId = i64;

/// Money a user spent on a given day.
///
/// To create a new `Expense`, use [Expense::build].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expense {
    /// The ID of the expense.
    pub id: ExpenseId,
    /// What the money was spent on.
    pub description: String,
    /// How much was spent. Always greater than zero.
    pub amount: f64,
    /// When the money was spent.
    pub date: Date,
    /// The category the expense is grouped under, if any.
    pub category_id: Option<CategoryId>,
    /// The user who recorded the expense.
    pub user_id: UserID,
}

impl Expense {
    /// Start building a new expense.
    ///
    /// Shortcut for [ExpenseBuilder] for discoverability.
    pub fn build(user_id: UserID, description: &str, amount: f64, date: Date) -> ExpenseBuilder {
        ExpenseBuilder {
            user_id,
            description: description.to_owned(),
            amount,
            date,
            category_id: None,
        }
    }
}

/// The fields of an expense that has not been stored yet.
///
/// Validation happens before a builder is made, see [crate::expense::form::parse_amount].
#[derive(Debug, PartialEq, Clone)]
pub struct ExpenseBuilder {
    pub user_id: UserID,
    pub description: String,
    pub amount: f64,
    pub date: Date,
    pub category_id: Option<CategoryId>,
}

impl ExpenseBuilder {
    /// Set the category for the expense.
    pub fn category_id(mut self, category_id: CategoryId) -> Self {
        self.category_id = Some(category_id);
        self
    }
}

/// Store a new expense and return it with its generated ID.
///
/// # Errors
/// This function will return a:
/// - [Error::InvalidCategory] if the category ID does not refer to a real category,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn create_expense(builder: ExpenseBuilder, connection: &Connection) -> Result<Expense, Error> {
    let category_id = builder.category_id;

    connection
        .prepare(
            "INSERT INTO expense (description, amount, date, category_id, user_id)
             VALUES (?1, ?2, ?3, ?4, ?5)
             RETURNING id, description, amount, date, category_id, user_id",
        )?
        .query_row(
            (
                builder.description,
                builder.amount,
                builder.date,
                builder.category_id,
                builder.user_id.as_i64(),
            ),
            map_expense_row,
        )
        .map_err(|error| match error {
            rusqlite::Error::SqliteFailure(
                rusqlite::ffi::Error {
                    code: _,
                    extended_code: rusqlite::ffi::SQLITE_CONSTRAINT_FOREIGNKEY,
                },
                _,
            ) => Error::InvalidCategory(
                category_id.map(|id| id.to_string()).unwrap_or_default(),
            ),
            error => error.into(),
        })
}

/// Retrieve one of the user's expenses.
///
/// # Errors
/// This function will return a:
/// - [Error::NotFound] if `id` does not refer to an expense owned by `user_id`,
/// - or [Error::SqlError] there is some other SQL error.
pub fn get_expense(
    id: ExpenseId,
    user_id: UserID,
    connection: &Connection,
) -> Result<Expense, Error> {
    connection
        .prepare(
            "SELECT id, description, amount, date, category_id, user_id FROM expense \
            WHERE id = :id AND user_id = :user_id",
        )?
        .query_row(
            &[(":id", &id), (":user_id", &user_id.as_i64())],
            map_expense_row,
        )
        .map_err(|error| error.into())
}

/// Overwrite the stored fields of `expense`, matched on its ID and owner.
///
/// # Errors
/// Returns [Error::UpdateMissingExpense] if the expense does not exist or belongs to another user.
pub fn update_expense(expense: &Expense, connection: &Connection) -> Result<(), Error> {
    let rows_affected = connection.execute(
        "UPDATE expense SET description = ?1, amount = ?2, date = ?3, category_id = ?4 \
        WHERE id = ?5 AND user_id = ?6",
        (
            &expense.description,
            expense.amount,
            expense.date,
            expense.category_id,
            expense.id,
            expense.user_id.as_i64(),
        ),
    )?;

    if rows_affected == 0 {
        return Err(Error::UpdateMissingExpense);
    }

    Ok(())
}

/// Delete one of the user's expenses.
///
/// # Errors
/// Returns [Error::DeleteMissingExpense] if the expense does not exist or belongs to another user.
pub fn delete_expense(id: ExpenseId, user_id: UserID, connection: &Connection) -> Result<(), Error> {
    let rows_affected = connection.execute(
        "DELETE FROM expense WHERE id = ?1 AND user_id = ?2",
        (id, user_id.as_i64()),
    )?;

    if rows_affected == 0 {
        return Err(Error::DeleteMissingExpense);
    }

    Ok(())
}

/// Retrieve all of the user's expenses, oldest first.
///
/// Pages read expenses through the filter instead, which also joins the category names.
#[cfg(test)]
pub fn get_all_expenses(user_id: UserID, connection: &Connection) -> Result<Vec<Expense>, Error> {
    connection
        .prepare(
            "SELECT id, description, amount, date, category_id, user_id FROM expense \
            WHERE user_id = ?1 ORDER BY date ASC, id ASC",
        )?
        .query_map([user_id.as_i64()], map_expense_row)?
        .map(|maybe_expense| maybe_expense.map_err(|error| error.into()))
        .collect()
}

/// Create the expense table in the database.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub fn create_expense_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute_batch(
        "CREATE TABLE IF NOT EXISTS expense (
            id INTEGER PRIMARY KEY,
            description TEXT NOT NULL,
            amount REAL NOT NULL,
            date TEXT NOT NULL,
            category_id INTEGER,
            user_id INTEGER NOT NULL,
            FOREIGN KEY(category_id) REFERENCES category(id) ON UPDATE CASCADE ON DELETE RESTRICT,
            FOREIGN KEY(user_id) REFERENCES user(id) ON UPDATE CASCADE ON DELETE CASCADE
        );

        CREATE INDEX IF NOT EXISTS idx_expense_user_date ON expense(user_id, date);",
    )?;

    Ok(())
}

/// Map a database row to an Expense.
fn map_expense_row(row: &Row) -> Result<Expense, rusqlite::Error> {
    let id = row.get(0)?;
    let description = row.get(1)?;
    let amount = row.get(2)?;
    let date = row.get(3)?;
    let category_id = row.get(4)?;
    let user_id = UserID::new(row.get(5)?);

    Ok(Expense {
        id,
        description,
        amount,
        date,
        category_id,
        user_id,
    })
}

//! Database operations for categories.

use std::collections::HashMap;

use rusqlite::{Connection, Row};

use crate::{
    Error,
    auth::UserID,
    category::{Category, CategoryId, CategoryName, DEFAULT_CATEGORIES},
};

/// Initialize the category table.
///
/// Names are unique per user, not globally.
pub fn create_category_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute_batch(
        "CREATE TABLE IF NOT EXISTS category (
            id INTEGER PRIMARY KEY,
            name TEXT NOT NULL,
            user_id INTEGER NOT NULL,
            FOREIGN KEY(user_id) REFERENCES user(id) ON UPDATE CASCADE ON DELETE CASCADE,
            UNIQUE(user_id, name)
        );",
    )?;

    Ok(())
}

fn map_unique_violation(error: rusqlite::Error, name: &CategoryName) -> Error {
    match error {
        rusqlite::Error::SqliteFailure(
            rusqlite::ffi::Error {
                code: _,
                extended_code: rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE,
            },
            _,
        ) => Error::DuplicateCategoryName(name.to_string()),
        error => error.into(),
    }
}

/// Create a category for `user_id` and return it with its generated ID.
///
/// # Errors
///
/// - [Error::DuplicateCategoryName] if the user already has a category with this name.
/// - [Error::SqlError] for any other SQL error.
pub fn create_category(
    name: CategoryName,
    user_id: UserID,
    connection: &Connection,
) -> Result<Category, Error> {
    let id = connection
        .query_row(
            "INSERT INTO category (name, user_id) VALUES (?1, ?2) RETURNING id",
            (name.as_ref(), user_id.as_i64()),
            |row| row.get(0),
        )
        .map_err(|error| map_unique_violation(error, &name))?;

    Ok(Category { id, name, user_id })
}

/// Give a freshly registered user the starter categories.
///
/// Categories the user already has are left alone.
pub fn create_default_categories(user_id: UserID, connection: &Connection) -> Result<(), Error> {
    let mut statement =
        connection.prepare("INSERT OR IGNORE INTO category (name, user_id) VALUES (?1, ?2)")?;

    for name in DEFAULT_CATEGORIES {
        statement.execute((name, user_id.as_i64()))?;
    }

    Ok(())
}

/// Retrieve a category owned by `user_id`.
///
/// # Errors
///
/// Returns [Error::NotFound] if the category does not exist or belongs to another user.
pub fn get_category(
    category_id: CategoryId,
    user_id: UserID,
    connection: &Connection,
) -> Result<Category, Error> {
    connection
        .prepare("SELECT id, name, user_id FROM category WHERE id = :id AND user_id = :user_id")?
        .query_row(
            &[(":id", &category_id), (":user_id", &user_id.as_i64())],
            map_row,
        )
        .map_err(|error| error.into())
}

/// Retrieve the user's category with exactly the name `name`.
///
/// The comparison is case-sensitive.
pub fn get_category_by_name(
    name: &str,
    user_id: UserID,
    connection: &Connection,
) -> Result<Category, Error> {
    connection
        .prepare("SELECT id, name, user_id FROM category WHERE name = ?1 AND user_id = ?2")?
        .query_row((name, user_id.as_i64()), map_row)
        .map_err(|error| error.into())
}

/// Retrieve all of the user's categories ordered alphabetically by name.
pub fn get_categories(user_id: UserID, connection: &Connection) -> Result<Vec<Category>, Error> {
    connection
        .prepare("SELECT id, name, user_id FROM category WHERE user_id = ?1 ORDER BY name ASC")?
        .query_map([user_id.as_i64()], map_row)?
        .map(|maybe_category| maybe_category.map_err(|error| error.into()))
        .collect()
}

/// Rename one of the user's categories.
///
/// # Errors
///
/// - [Error::DuplicateCategoryName] if another of the user's categories already has `new_name`.
/// - [Error::UpdateMissingCategory] if the category does not exist or belongs to another user.
pub fn rename_category(
    category_id: CategoryId,
    user_id: UserID,
    new_name: CategoryName,
    connection: &Connection,
) -> Result<(), Error> {
    let rows_affected = connection
        .execute(
            "UPDATE category SET name = ?1 WHERE id = ?2 AND user_id = ?3",
            (new_name.as_ref(), category_id, user_id.as_i64()),
        )
        .map_err(|error| map_unique_violation(error, &new_name))?;

    if rows_affected == 0 {
        return Err(Error::UpdateMissingCategory);
    }

    Ok(())
}

/// Delete one of the user's categories.
///
/// # Errors
///
/// - [Error::DeleteMissingCategory] if the category does not exist or belongs to another user.
/// - [Error::CategoryInUse] if any expense still refers to the category.
pub fn delete_category(
    category_id: CategoryId,
    user_id: UserID,
    connection: &Connection,
) -> Result<(), Error> {
    let category = match get_category(category_id, user_id, connection) {
        Ok(category) => category,
        Err(Error::NotFound) => return Err(Error::DeleteMissingCategory),
        Err(error) => return Err(error),
    };

    let expense_count: i64 = connection.query_row(
        "SELECT COUNT(1) FROM expense WHERE category_id = ?1",
        [category_id],
        |row| row.get(0),
    )?;

    if expense_count > 0 {
        return Err(Error::CategoryInUse(category.name.to_string()));
    }

    let rows_affected = connection
        .execute(
            "DELETE FROM category WHERE id = ?1 AND user_id = ?2",
            (category_id, user_id.as_i64()),
        )
        .map_err(|error| match error {
            rusqlite::Error::SqliteFailure(
                rusqlite::ffi::Error {
                    code: _,
                    extended_code: rusqlite::ffi::SQLITE_CONSTRAINT_FOREIGNKEY,
                },
                _,
            ) => Error::CategoryInUse(category.name.to_string()),
            error => error.into(),
        })?;

    if rows_affected == 0 {
        return Err(Error::DeleteMissingCategory);
    }

    Ok(())
}

/// Count how many expenses each of the user's categories is used by.
///
/// Categories without expenses are absent from the map.
pub fn count_expenses_per_category(
    user_id: UserID,
    connection: &Connection,
) -> Result<HashMap<CategoryId, u32>, Error> {
    let result: Result<HashMap<CategoryId, u32>, rusqlite::Error> = connection
        .prepare(
            "SELECT category_id, COUNT(1) FROM expense \
            WHERE user_id = ?1 AND category_id IS NOT NULL GROUP BY category_id",
        )?
        .query_map([user_id.as_i64()], |row| {
            let category_id = row.get(0)?;
            let count = row.get(1)?;

            Ok((category_id, count))
        })?
        .collect();

    result.map_err(Error::from)
}

fn map_row(row: &Row) -> Result<Category, rusqlite::Error> {
    let id = row.get(0)?;
    let raw_name: String = row.get(1)?;
    let user_id = UserID::new(row.get(2)?);

    Ok(Category {
        id,
        name: CategoryName::new_unchecked(&raw_name),
        user_id,
    })
}

//! Code for creating the user table and reading and writing users.

use std::fmt::Display;

use rusqlite::{Connection, Row};
use serde::{Deserialize, Serialize};
use unicode_segmentation::UnicodeSegmentation;

use crate::{Error, auth::PasswordHash};

/// A newtype wrapper for integer user IDs.
///
/// This helps disambiguate user IDs from other types of IDs, leading to better compile time
/// errors.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, Hash)]
pub struct UserID(i64);

impl UserID {
    /// Create a new user ID.
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    /// Cast the user ID to a 64 bit integer.
    pub fn as_i64(&self) -> i64 {
        self.0
    }
}

impl Display for UserID {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

const USERNAME_MIN_LENGTH: usize = 4;
const USERNAME_MAX_LENGTH: usize = 20;
const DISPLAY_NAME_MAX_LENGTH: usize = 20;

fn count_characters(text: &str) -> usize {
    text.graphemes(true).count()
}

/// The name a user logs in with, 4 to 20 characters after trimming whitespace.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Username(String);

impl Username {
    /// # Errors
    ///
    /// Returns [Error::InvalidUsername] if `username` is too short or too long.
    pub fn new(username: &str) -> Result<Self, Error> {
        let username = username.trim();
        let length = count_characters(username);

        if (USERNAME_MIN_LENGTH..=USERNAME_MAX_LENGTH).contains(&length) {
            Ok(Self(username.to_owned()))
        } else {
            Err(Error::InvalidUsername)
        }
    }

    pub fn new_unchecked(username: &str) -> Self {
        Self(username.to_owned())
    }
}

impl AsRef<str> for Username {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Display for Username {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The name shown in the dashboard greeting, 1 to 20 characters after trimming whitespace.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DisplayName(String);

impl DisplayName {
    /// # Errors
    ///
    /// Returns [Error::InvalidDisplayName] if `name` is empty or too long.
    pub fn new(name: &str) -> Result<Self, Error> {
        let name = name.trim();
        let length = count_characters(name);

        if (1..=DISPLAY_NAME_MAX_LENGTH).contains(&length) {
            Ok(Self(name.to_owned()))
        } else {
            Err(Error::InvalidDisplayName)
        }
    }

    pub fn new_unchecked(name: &str) -> Self {
        Self(name.to_owned())
    }
}

impl AsRef<str> for DisplayName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Display for DisplayName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A registered user.
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    /// The user's ID in the application database.
    pub id: UserID,
    pub username: Username,
    pub password_hash: PasswordHash,
    /// Set by the user after their first log in.
    pub name: Option<DisplayName>,
}

impl User {
    /// The name to greet the user with.
    pub fn greeting_name(&self) -> &str {
        self.name
            .as_ref()
            .map(AsRef::as_ref)
            .unwrap_or(self.username.as_ref())
    }
}

/// Create the user table.
///
/// # Errors
///
/// This function will return an error if the SQL query failed.
pub fn create_user_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS user (
                id INTEGER PRIMARY KEY,
                username TEXT NOT NULL UNIQUE,
                password TEXT NOT NULL,
                name TEXT
                )",
        (),
    )?;

    Ok(())
}

/// Insert a new user without a display name.
///
/// # Errors
///
/// - [Error::DuplicateUsername] if the username is already registered.
/// - [Error::SqlError] if an SQL related error occurred.
pub fn create_user(
    username: Username,
    password_hash: PasswordHash,
    connection: &Connection,
) -> Result<User, Error> {
    let id = connection
        .query_row(
            "INSERT INTO user (username, password) VALUES (?1, ?2) RETURNING id",
            (username.as_ref(), password_hash.to_string()),
            |row| row.get(0),
        )
        .map_err(|error| match error {
            rusqlite::Error::SqliteFailure(
                rusqlite::ffi::Error {
                    code: _,
                    extended_code: rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE,
                },
                _,
            ) => Error::DuplicateUsername(username.to_string()),
            error => error.into(),
        })?;

    Ok(User {
        id: UserID::new(id),
        username,
        password_hash,
        name: None,
    })
}

/// Get the user from the database with an ID equal to `user_id`.
///
/// # Errors
///
/// This function will return an error if:
/// - `user_id` does not belong to a registered user.
/// - there was an error trying to access the database.
pub fn get_user_by_id(user_id: UserID, connection: &Connection) -> Result<User, Error> {
    connection
        .prepare("SELECT id, username, password, name FROM user WHERE id = :id")?
        .query_row(&[(":id", &user_id.as_i64())], map_row)
        .map_err(|error| error.into())
}

/// Get the user registered with `username`.
///
/// # Errors
///
/// Returns [Error::NotFound] if no user has that username.
pub fn get_user_by_username(username: &str, connection: &Connection) -> Result<User, Error> {
    connection
        .prepare("SELECT id, username, password, name FROM user WHERE username = ?1")?
        .query_row([username.trim()], map_row)
        .map_err(|error| error.into())
}

/// Set the name the user is greeted with.
///
/// # Errors
///
/// Returns [Error::NotFound] if the user does not exist.
pub fn set_display_name(
    user_id: UserID,
    name: &DisplayName,
    connection: &Connection,
) -> Result<(), Error> {
    let rows_affected = connection.execute(
        "UPDATE user SET name = ?1 WHERE id = ?2",
        (name.as_ref(), user_id.as_i64()),
    )?;

    if rows_affected == 0 {
        return Err(Error::NotFound);
    }

    Ok(())
}

fn map_row(row: &Row) -> Result<User, rusqlite::Error> {
    let id = UserID::new(row.get(0)?);
    let raw_username: String = row.get(1)?;
    let raw_password_hash: String = row.get(2)?;
    let raw_name: Option<String> = row.get(3)?;

    Ok(User {
        id,
        username: Username::new_unchecked(&raw_username),
        password_hash: PasswordHash::new_unchecked(&raw_password_hash),
        name: raw_name.as_deref().map(DisplayName::new_unchecked),
    })
}

#[cfg(test)]
mod name_tests {
    use crate::{
        Error,
        auth::{DisplayName, Username},
    };

    #[test]
    fn username_length_is_checked_after_trimming() {
        assert_eq!(Username::new("  abc  "), Err(Error::InvalidUsername));
        assert_eq!(Username::new(&"a".repeat(21)), Err(Error::InvalidUsername));
        assert_eq!(
            Username::new("  abcd  "),
            Ok(Username::new_unchecked("abcd"))
        );
        assert!(Username::new(&"a".repeat(20)).is_ok());
    }

    #[test]
    fn username_counts_characters_not_bytes() {
        assert!(Username::new("éééé").is_ok());
    }

    #[test]
    fn display_name_cannot_be_blank() {
        assert_eq!(DisplayName::new(" \t "), Err(Error::InvalidDisplayName));
        assert_eq!(
            DisplayName::new(&"b".repeat(21)),
            Err(Error::InvalidDisplayName)
        );
        assert!(DisplayName::new("Bo").is_ok());
    }
}

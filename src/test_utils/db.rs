use rusqlite::Connection;
use time::Date;

use crate::{
    auth::{PasswordHash, User, Username, create_user},
    category::{CategoryId, create_default_categories},
    db::initialize,
    expense::{Expense, create_expense},
};

/// An initialized in-memory database.
pub(crate) fn get_test_connection() -> Connection {
    let connection =
        Connection::open_in_memory().expect("Could not open in-memory SQLite database");
    initialize(&connection).expect("Could not initialize database");

    connection
}

/// Insert a user with the default categories.
///
/// The password hash is not a real hash, so the user cannot log in.
pub(crate) fn insert_test_user(username: &str, connection: &Connection) -> User {
    let user = create_user(
        Username::new_unchecked(username),
        PasswordHash::new_unchecked("hunter2"),
        connection,
    )
    .expect("Could not create test user");
    create_default_categories(user.id, connection).expect("Could not create default categories");

    user
}

pub(crate) fn insert_test_expense(
    user: &User,
    description: &str,
    amount: f64,
    date: Date,
    category_id: Option<CategoryId>,
    connection: &Connection,
) -> Expense {
    let mut builder = Expense::build(user.id, description, amount, date);
    if let Some(category_id) = category_id {
        builder = builder.category_id(category_id);
    }

    create_expense(builder, connection).expect("Could not create test expense")
}

//! Recording, editing and deleting expenses.

mod create_endpoint;
mod delete_endpoint;
mod edit;
pub(crate) mod form;
mod model;

pub use create_endpoint::create_expense_endpoint;
pub use delete_endpoint::delete_expense_endpoint;
pub use edit::{get_edit_expense_page, update_expense_endpoint};
pub use form::{ExpenseForm, parse_date};
pub use model::{
    Expense, ExpenseId, create_expense, create_expense_table, delete_expense,
    get_expense, update_expense,
};

#[cfg(test)]
pub use model::get_all_expenses;

//! Per-user categories for grouping expenses.

mod create;
mod db;
mod delete;
mod domain;
mod edit;
mod list;

pub use create::create_category_endpoint;
pub use db::{
    count_expenses_per_category, create_category, create_category_table,
    create_default_categories, delete_category, get_categories, get_category,
    get_category_by_name, rename_category,
};
pub use delete::delete_category_endpoint;
pub use domain::{Category, CategoryId, CategoryName, DEFAULT_CATEGORIES};
pub use edit::{get_edit_category_page, rename_category_endpoint};
pub use list::get_categories_page;

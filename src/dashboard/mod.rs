//! Dashboard module
//!
//! Provides the main page: an add expense form, the filtered expense table
//! with its total, and charts of all spending by category and by day.

mod aggregation;
mod charts;
mod handlers;

pub use handlers::get_dashboard_page;

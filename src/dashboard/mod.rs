//! Dashboard module
//!
//! Provides an overview page with a summary, charts and a table of expenses.
//! Includes filtering by date range and category, and a JSON summary API.

mod aggregation;
mod charts;
mod handlers;
mod tables;

pub use aggregation::{
    CategorySeries, CategoryTotal, DateCategorySeries, ExpenseSummary, group_by_category,
    group_by_date_and_category, summarize,
};
pub use handlers::{
    get_dashboard_page, get_dashboard_partial, get_dashboard_reset, get_expense_summary,
};

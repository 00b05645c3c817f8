//! The API endpoints URIs.

/// The root route which redirects to the dashboard.
pub const ROOT: &str = "/";
/// The page with the expense charts, summary and table.
pub const DASHBOARD_VIEW: &str = "/dashboard";
/// The page to display when an internal server error occurs.
pub const INTERNAL_ERROR_VIEW: &str = "/error";
/// The route for static files.
pub const STATIC: &str = "/static";

/// The route that returns the filtered dashboard content for HTMX swaps.
pub const DASHBOARD_FILTER: &str = "/api/expenses/filter";
/// The route that clears the filter and returns the filter form and content.
pub const DASHBOARD_RESET: &str = "/api/expenses/reset";
/// The route that returns the filtered and aggregated expenses as JSON.
pub const EXPENSE_SUMMARY_API: &str = "/api/expenses/summary";

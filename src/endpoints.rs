//! The API endpoint URIs.
//!
//! For endpoints that take a parameter, e.g. '/api/expenses/{expense_id}',
//! use [format_endpoint].

use crate::expense::ExpenseId;

/// The root route which redirects to the dashboard.
pub const ROOT: &str = "/";
/// The dashboard page with the summary cards, charts, and expense table.
pub const DASHBOARD_VIEW: &str = "/dashboard";
/// The htmx partial of the dashboard body, used by the filter and sort controls.
pub const DASHBOARD_CONTENT: &str = "/dashboard/content";
/// The page for recording a new expense.
pub const NEW_EXPENSE_VIEW: &str = "/expenses/new";
/// The page for editing an existing expense.
pub const EDIT_EXPENSE_VIEW: &str = "/expenses/{expense_id}/edit";
/// The page to display when an internal server error occurs.
pub const INTERNAL_ERROR_VIEW: &str = "/error";

/// The route to create an expense.
pub const EXPENSES_API: &str = "/api/expenses";
/// The route to update or delete a single expense.
pub const EXPENSE: &str = "/api/expenses/{expense_id}";
/// The route to download the filtered expenses as a CSV file.
pub const EXPORT_CSV: &str = "/export/csv";

/// Replace the parameter in `endpoint_path` with `id`.
///
/// A parameter is a brace-delimited name such as '{expense_id}'. Endpoint
/// paths are assumed to contain at most one parameter; paths without one
/// are returned unchanged.
pub fn format_endpoint(endpoint_path: &str, id: ExpenseId) -> String {
    match (endpoint_path.find('{'), endpoint_path.find('}')) {
        (Some(start), Some(end)) if start < end => format!(
            "{}{}{}",
            &endpoint_path[..start],
            id,
            &endpoint_path[end + 1..]
        ),
        _ => endpoint_path.to_string(),
    }
}

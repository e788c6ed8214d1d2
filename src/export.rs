//! CSV export of the expense collection.
//!
//! The export honours the same filter and sort query parameters as the
//! dashboard, so the downloaded file matches what is on screen.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, Query, State},
    http::header::{CONTENT_DISPOSITION, CONTENT_TYPE},
    response::{IntoResponse, Response},
};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    dashboard::DashboardQuery,
    expense::{Expense, get_all_expenses, filter::apply_filter, sort::sort_expenses},
};

/// The state needed to export expenses.
#[derive(Debug, Clone)]
pub struct ExportState {
    /// The database connection for managing expenses.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for ExportState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// A route handler for downloading the filtered, sorted expenses as a CSV
/// file.
pub async fn export_csv_endpoint(
    State(state): State<ExportState>,
    Query(query): Query<DashboardQuery>,
) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let expenses = get_all_expenses(&connection)
        .inspect_err(|error| tracing::error!("could not get expenses: {error}"))?;
    let filtered = sort_expenses(&apply_filter(&expenses, &query.filter()), query.sort_option());

    let csv = expenses_to_csv(&filtered)?;

    Ok((
        [
            (CONTENT_TYPE, "text/csv; charset=utf-8"),
            (
                CONTENT_DISPOSITION,
                "attachment; filename=\"expenses.csv\"",
            ),
        ],
        csv,
    )
        .into_response())
}

/// Encode `expenses` as CSV with a header row.
///
/// The csv writer quotes and escapes fields as needed, so titles may
/// freely contain commas and quotes.
fn expenses_to_csv(expenses: &[Expense]) -> Result<String, Error> {
    let mut writer = csv::Writer::from_writer(Vec::new());

    writer
        .write_record(["Title", "Amount (₹)", "Category", "Date"])
        .map_err(|error| Error::CsvError(error.to_string()))?;

    for expense in expenses {
        writer
            .write_record([
                expense.title.as_str(),
                &format!("{:.2}", expense.amount),
                expense.category.as_str(),
                &expense.date.to_string(),
            ])
            .map_err(|error| Error::CsvError(error.to_string()))?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|error| Error::CsvError(error.to_string()))?;

    String::from_utf8(bytes).map_err(|error| Error::CsvError(error.to_string()))
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::{
        extract::{Query, State},
        http::{StatusCode, header::CONTENT_DISPOSITION},
    };
    use rusqlite::Connection;
    use time::macros::date;

    use crate::{
        category::Category,
        dashboard::DashboardQuery,
        db::initialize,
        expense::{NewExpense, create_expense},
    };

    use super::{ExportState, export_csv_endpoint};

    fn get_test_connection() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();
        conn
    }

    async fn response_body(response: axum::response::Response) -> String {
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        String::from_utf8(body.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn exports_expenses_as_csv_attachment() {
        let conn = get_test_connection();
        create_expense(
            NewExpense::new("Groceries", 100.0, Category::Food, date!(2024 - 01 - 10)).unwrap(),
            &conn,
        )
        .unwrap();
        let state = ExportState {
            db_connection: Arc::new(Mutex::new(conn)),
        };

        let response = export_csv_endpoint(State(state), Query(DashboardQuery::default()))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get(CONTENT_DISPOSITION).unwrap(),
            "attachment; filename=\"expenses.csv\""
        );

        let body = response_body(response).await;
        let mut lines = body.lines();
        assert_eq!(lines.next(), Some("Title,Amount (₹),Category,Date"));
        assert_eq!(lines.next(), Some("Groceries,100.00,Food,2024-01-10"));
    }

    #[tokio::test]
    async fn titles_with_commas_and_quotes_are_escaped() {
        let conn = get_test_connection();
        create_expense(
            NewExpense::new(
                "Dinner, drinks and \"dessert\"",
                64.0,
                Category::Food,
                date!(2024 - 01 - 20),
            )
            .unwrap(),
            &conn,
        )
        .unwrap();
        let state = ExportState {
            db_connection: Arc::new(Mutex::new(conn)),
        };

        let response = export_csv_endpoint(State(state), Query(DashboardQuery::default()))
            .await
            .unwrap();
        let body = response_body(response).await;

        assert!(
            body.contains("\"Dinner, drinks and \"\"dessert\"\"\""),
            "want quoted and escaped title in {body}"
        );
    }

    #[tokio::test]
    async fn export_honours_filter_and_sort() {
        let conn = get_test_connection();
        create_expense(
            NewExpense::new("Groceries", 100.0, Category::Food, date!(2024 - 01 - 10)).unwrap(),
            &conn,
        )
        .unwrap();
        create_expense(
            NewExpense::new("Snacks", 10.0, Category::Food, date!(2024 - 01 - 12)).unwrap(),
            &conn,
        )
        .unwrap();
        create_expense(
            NewExpense::new(
                "Bus pass",
                50.0,
                Category::Transportation,
                date!(2024 - 01 - 15),
            )
            .unwrap(),
            &conn,
        )
        .unwrap();
        let state = ExportState {
            db_connection: Arc::new(Mutex::new(conn)),
        };
        let query = DashboardQuery {
            category: Some("Food".to_owned()),
            sort: Some("amount-asc".to_owned()),
            ..Default::default()
        };

        let response = export_csv_endpoint(State(state), Query(query)).await.unwrap();
        let body = response_body(response).await;

        let lines: Vec<&str> = body.lines().collect();
        assert_eq!(lines.len(), 3, "want header plus two Food rows in {body}");
        assert!(lines[1].starts_with("Snacks,10.00"));
        assert!(lines[2].starts_with("Groceries,100.00"));
    }

    #[tokio::test]
    async fn empty_collection_exports_just_the_header() {
        let state = ExportState {
            db_connection: Arc::new(Mutex::new(get_test_connection())),
        };

        let response = export_csv_endpoint(State(state), Query(DashboardQuery::default()))
            .await
            .unwrap();
        let body = response_body(response).await;

        assert_eq!(body.trim_end(), "Title,Amount (₹),Category,Date");
    }
}

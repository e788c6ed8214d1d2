//! Defines the endpoint for deleting an expense.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, Path, State},
    response::{IntoResponse, Response},
};
use maud::html;
use rusqlite::Connection;

use crate::{AppState, Error, alert::Alert};

use super::{ExpenseId, core::delete_expense};

/// The state needed to delete an expense.
#[derive(Debug, Clone)]
pub struct DeleteExpenseState {
    /// The database connection for managing expenses.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for DeleteExpenseState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// A route handler for deleting an expense.
///
/// On success the confirmation alert is swapped out-of-band into the
/// alert container, leaving an empty body to replace the table row the
/// delete button lives in. The status code has to be 200 OK or htmx will
/// not swap out the row.
pub async fn delete_expense_endpoint(
    State(state): State<DeleteExpenseState>,
    Path(expense_id): Path<ExpenseId>,
) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    match delete_expense(expense_id, &connection) {
        Ok(()) => html!(
            div hx-swap-oob="afterbegin:#alert-container"
            {
                (Alert::success("Expense deleted", "").into_markup())
            }
        )
        .into_response(),
        Err(error) => {
            tracing::error!("Could not delete expense {expense_id}: {error}");
            error.into_alert_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::{
        extract::{Path, State},
        http::StatusCode,
    };
    use rusqlite::Connection;
    use time::macros::date;

    use crate::{
        Error,
        category::Category,
        db::initialize,
        expense::{NewExpense, create_expense, get_expense},
    };

    use super::{DeleteExpenseState, delete_expense_endpoint};

    fn get_test_connection() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();
        conn
    }

    #[tokio::test]
    async fn deletes_expense() {
        let conn = get_test_connection();
        let created = create_expense(
            NewExpense::new("Parking", 4.5, Category::Transportation, date!(2024 - 01 - 08))
                .unwrap(),
            &conn,
        )
        .unwrap();
        let state = DeleteExpenseState {
            db_connection: Arc::new(Mutex::new(conn)),
        };

        let response = delete_expense_endpoint(State(state.clone()), Path(created.id)).await;

        assert_eq!(response.status(), StatusCode::OK);
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = String::from_utf8_lossy(&body);
        assert!(
            body.contains("hx-swap-oob"),
            "want an out-of-band alert in {body}"
        );

        let connection = state.db_connection.lock().unwrap();
        assert_eq!(get_expense(created.id, &connection), Err(Error::NotFound));
    }

    #[tokio::test]
    async fn delete_of_missing_expense_responds_not_found() {
        let state = DeleteExpenseState {
            db_connection: Arc::new(Mutex::new(get_test_connection())),
        };

        let response = delete_expense_endpoint(State(state), Path(42)).await;

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}

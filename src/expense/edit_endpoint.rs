//! Defines the endpoint for updating an existing expense.

use std::sync::{Arc, Mutex};

use axum::{
    debug_handler,
    extract::{FromRef, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_extra::extract::Form;
use axum_htmx::HxRedirect;
use rusqlite::Connection;
use serde::Deserialize;

use crate::{AppState, Error, endpoints};

use super::{
    ExpenseId,
    core::{NewExpense, update_expense},
    create_endpoint::validate_expense_fields,
};

/// The state needed to update an expense.
#[derive(Debug, Clone)]
pub struct EditExpenseState {
    /// The database connection for managing expenses.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for EditExpenseState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The raw form data for updating an expense.
///
/// The mutable fields are fully replaced on every update. The `revision`
/// field carries the sequence number the edit form was rendered from.
#[derive(Debug, Default, Deserialize)]
pub struct EditExpenseForm {
    /// What the expense was for.
    #[serde(default)]
    pub title: Option<String>,
    /// How much was spent, as submitted.
    #[serde(default)]
    pub amount: Option<String>,
    /// The category label, as submitted.
    #[serde(default)]
    pub category: Option<String>,
    /// The expense date, as submitted.
    #[serde(default)]
    pub date: Option<String>,
    /// The revision of the expense the form was rendered from.
    #[serde(default)]
    pub revision: Option<i64>,
}

impl EditExpenseForm {
    fn validate(&self) -> Result<(NewExpense, i64), Error> {
        let new_expense = validate_expense_fields(
            self.title.as_deref(),
            self.amount.as_deref(),
            self.category.as_deref(),
            self.date.as_deref(),
        )?;
        let revision = self.revision.ok_or(Error::MissingField("revision"))?;

        Ok((new_expense, revision))
    }
}

/// A route handler for updating an expense, redirects to the dashboard on
/// success.
///
/// Responds with a not-found alert if the expense does not exist and a
/// conflict alert if it was modified after the edit form was loaded.
#[debug_handler]
pub async fn edit_expense_endpoint(
    State(state): State<EditExpenseState>,
    Path(expense_id): Path<ExpenseId>,
    Form(form): Form<EditExpenseForm>,
) -> Response {
    let (new_expense, revision) = match form.validate() {
        Ok(validated) => validated,
        Err(error) => {
            tracing::debug!("rejected expense form: {error}");
            return error.into_alert_response();
        }
    };

    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    match update_expense(expense_id, revision, new_expense, &connection) {
        Ok(expense) => {
            tracing::info!("updated expense {}", expense.id);

            (
                HxRedirect(endpoints::DASHBOARD_VIEW.to_owned()),
                StatusCode::SEE_OTHER,
            )
                .into_response()
        }
        Err(error) => {
            tracing::error!("could not update expense {expense_id}: {error}");
            error.into_alert_response()
        }
    }
}

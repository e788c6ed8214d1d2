//! Defines the endpoint for recording a new expense.
use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
// Must use axum_extra's Form since that parses an empty string as None instead
// of crashing like axum::Form.
use axum_extra::extract::Form;
use axum_htmx::HxRedirect;
use rusqlite::Connection;
use serde::Deserialize;
use time::Date;

use crate::{AppState, Error, endpoints};

use super::core::{DATE_INPUT_FORMAT, NewExpense, create_expense};

/// The state needed to create an expense.
#[derive(Debug, Clone)]
pub struct CreateExpenseState {
    /// The database connection for managing expenses.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for CreateExpenseState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The raw form data for creating an expense.
///
/// Every field is optional at the wire level so that missing or empty
/// fields produce a structured validation error instead of a generic
/// deserialization failure.
#[derive(Debug, Default, Deserialize)]
pub struct ExpenseForm {
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
}

impl ExpenseForm {
    /// Validate the raw form data into a [NewExpense].
    ///
    /// # Errors
    /// Returns a validation error naming the first missing or malformed
    /// field.
    pub(super) fn validate(&self) -> Result<NewExpense, Error> {
        validate_expense_fields(
            self.title.as_deref(),
            self.amount.as_deref(),
            self.category.as_deref(),
            self.date.as_deref(),
        )
    }
}

/// Validate the raw field values shared by the create and edit forms.
pub(super) fn validate_expense_fields(
    title: Option<&str>,
    amount: Option<&str>,
    category: Option<&str>,
    date: Option<&str>,
) -> Result<NewExpense, Error> {
    let title = non_empty(title).ok_or(Error::MissingField("title"))?;

    let amount_text = non_empty(amount).ok_or(Error::MissingField("amount"))?;
    let amount: f64 = amount_text
        .parse()
        .map_err(|_| Error::UnparseableAmount(amount_text.to_owned()))?;

    let category_text = non_empty(category).ok_or(Error::MissingField("category"))?;
    let category = category_text.parse()?;

    let date_text = non_empty(date).ok_or(Error::MissingField("date"))?;
    let date = Date::parse(date_text, DATE_INPUT_FORMAT)
        .map_err(|_| Error::UnparseableDate(date_text.to_owned()))?;

    NewExpense::new(title, amount, category, date)
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|value| !value.is_empty())
}

/// A route handler for recording a new expense, redirects to the dashboard
/// on success.
pub async fn create_expense_endpoint(
    State(state): State<CreateExpenseState>,
    Form(form): Form<ExpenseForm>,
) -> Response {
    let new_expense = match form.validate() {
        Ok(new_expense) => new_expense,
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

    match create_expense(new_expense, &connection) {
        Ok(expense) => {
            tracing::info!("created expense {}", expense.id);

            (
                HxRedirect(endpoints::DASHBOARD_VIEW.to_owned()),
                StatusCode::SEE_OTHER,
            )
                .into_response()
        }
        Err(error) => {
            tracing::error!("could not create expense: {error}");
            error.into_alert_response()
        }
    }
}

//! Kharcha is a web app for recording and understanding your personal
//! expenses.
//!
//! This library provides a REST API that directly serves HTML pages.

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_server::Handle;
use tokio::signal;

mod alert;
mod app_state;
mod category;
mod dashboard;
mod db;
mod endpoints;
mod expense;
mod export;
mod html;
mod internal_server_error;
mod navigation;
mod not_found;
mod routing;
mod timezone;

pub use app_state::AppState;
pub use db::initialize as initialize_db;
pub use routing::build_router;

use crate::{
    alert::{Alert, render},
    expense::ExpenseTitle,
    internal_server_error::{InternalServerErrorPage, render_internal_server_error},
    not_found::get_404_not_found_response,
};

/// An async task that waits for either the ctrl+c or terminate signal, whichever comes first, and
/// then signals the server to shut down gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::debug!("Received ctrl+c signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
        _ = terminate => {
            tracing::debug!("Received terminate signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
    }
}

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// A required form field was missing from the request.
    #[error("missing required field: {0}")]
    MissingField(&'static str),

    /// An empty string was used as an expense title.
    #[error("expense titles cannot be empty")]
    EmptyTitle,

    /// An expense title was longer than the allowed length.
    ///
    /// Carries the number of characters that were submitted.
    #[error("expense titles cannot be more than 60 characters, got {0}")]
    TitleTooLong(usize),

    /// A value that should have been an amount did not parse as a number.
    #[error("{0:?} is not a valid amount")]
    UnparseableAmount(String),

    /// A negative (or non-finite) number was used as an expense amount.
    ///
    /// Expenses record money that was spent, so the amount must be zero or
    /// more.
    #[error("amounts cannot be negative, got {0}")]
    NegativeAmount(f64),

    /// A value that should have been a category did not match any of the
    /// fixed category labels.
    #[error("{0:?} is not a valid category")]
    InvalidCategory(String),

    /// A value that should have been a date did not parse as a calendar
    /// date.
    #[error("{0:?} is not a valid date")]
    UnparseableDate(String),

    /// The requested resource was not found.
    ///
    /// For HTTP request handlers, the client should check that the parameters
    /// (e.g., ID) are correct and that the resource has been created.
    ///
    /// Internally, this error may occur when a query returns no rows.
    #[error("the requested resource could not be found")]
    NotFound,

    /// Tried to update an expense that does not exist
    #[error("tried to update an expense that is not in the database")]
    UpdateMissingExpense,

    /// Tried to delete an expense that does not exist
    #[error("tried to delete an expense that is not in the database")]
    DeleteMissingExpense,

    /// An update carried a revision older than the stored one, meaning the
    /// expense was modified after the form was loaded.
    #[error("the expense was modified after the form was loaded")]
    EditConflict,

    /// An error occurred while getting the local timezone from a canonical timezone string.
    #[error("invalid timezone {0}")]
    InvalidTimezoneError(String),

    /// Could not acquire the database lock
    #[error("could not acquire the database lock")]
    DatabaseLockError,

    /// An error occurred while encoding expenses as CSV.
    #[error("could not encode CSV: {0}")]
    CsvError(String),

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound,
            error => {
                tracing::error!("an unhandled SQL error occurred: {}", error);
                Error::SqlError(error)
            }
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match self {
            Error::NotFound => get_404_not_found_response(),
            Error::InvalidTimezoneError(timezone) => {
                render_internal_server_error(InternalServerErrorPage {
                    description: "Invalid Timezone Settings",
                    fix: &format!(
                        "Could not get local timezone \"{timezone}\". Check your server settings and \
                    ensure the timezone has been set to a valid, canonical timezone string"
                    ),
                })
            }
            Error::DatabaseLockError => render_internal_server_error(Default::default()),
            // Any errors that are not handled above are not intended to be shown to the client.
            error => {
                tracing::error!("An unexpected error occurred: {}", error);
                render_internal_server_error(Default::default())
            }
        }
    }
}

impl Error {
    fn into_alert_response(self) -> Response {
        match self {
            Error::MissingField(field) => render(
                StatusCode::BAD_REQUEST,
                Alert::error(
                    "Invalid expense",
                    &format!("The {field} field is required."),
                ),
            ),
            Error::EmptyTitle => render(
                StatusCode::BAD_REQUEST,
                Alert::error("Invalid expense", "Please provide a title for this expense."),
            ),
            Error::TitleTooLong(length) => render(
                StatusCode::BAD_REQUEST,
                Alert::error(
                    "Invalid expense",
                    &format!(
                        "Titles cannot be more than {} characters, got {length}.",
                        ExpenseTitle::MAX_LENGTH
                    ),
                ),
            ),
            Error::UnparseableAmount(value) => render(
                StatusCode::BAD_REQUEST,
                Alert::error(
                    "Invalid expense",
                    &format!("\"{value}\" is not a valid amount."),
                ),
            ),
            Error::NegativeAmount(_) => render(
                StatusCode::BAD_REQUEST,
                Alert::error("Invalid expense", "Amount cannot be negative."),
            ),
            Error::InvalidCategory(value) => render(
                StatusCode::BAD_REQUEST,
                Alert::error(
                    "Invalid expense",
                    &format!("\"{value}\" is not one of the expense categories."),
                ),
            ),
            Error::UnparseableDate(value) => render(
                StatusCode::BAD_REQUEST,
                Alert::error(
                    "Invalid expense",
                    &format!("\"{value}\" is not a valid date."),
                ),
            ),
            Error::UpdateMissingExpense => render(
                StatusCode::NOT_FOUND,
                Alert::error(
                    "Could not update expense",
                    "The expense could not be found.",
                ),
            ),
            Error::DeleteMissingExpense => render(
                StatusCode::NOT_FOUND,
                Alert::error(
                    "Could not delete expense",
                    "The expense could not be found. \
                    Try refreshing the page to see if the expense has already been deleted.",
                ),
            ),
            Error::EditConflict => render(
                StatusCode::CONFLICT,
                Alert::error(
                    "Could not update expense",
                    "The expense was changed after this form was loaded. \
                    Refresh the page and apply your edit again.",
                ),
            ),
            Error::InvalidTimezoneError(timezone) => render(
                StatusCode::INTERNAL_SERVER_ERROR,
                Alert::error(
                    "Invalid Timezone Settings",
                    &format!(
                        "Could not get local timezone \"{timezone}\". Check your server settings and \
                    ensure the timezone has been set to a valid, canonical timezone string"
                    ),
                ),
            ),
            _ => render(
                StatusCode::INTERNAL_SERVER_ERROR,
                Alert::error(
                    "Something went wrong",
                    "An unexpected error occurred, check the server logs for more details.",
                ),
            ),
        }
    }
}

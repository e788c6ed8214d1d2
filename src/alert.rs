//! Alert partials for displaying success and error messages to users.
//!
//! Endpoints that serve htmx requests respond with an alert partial on
//! failure. Forms point `hx-target-error` at the shared alert container so
//! the message appears without losing the page state.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use maud::{Markup, html};

/// Alert message types for styling
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertType {
    Success,
    Error,
}

/// An alert message with an optional detail line.
pub struct Alert<'a> {
    alert_type: AlertType,
    message: &'a str,
    details: &'a str,
}

impl<'a> Alert<'a> {
    /// Create a new success alert
    pub fn success(message: &'a str, details: &'a str) -> Self {
        Self {
            alert_type: AlertType::Success,
            message,
            details,
        }
    }

    /// Create a new error alert
    pub fn error(message: &'a str, details: &'a str) -> Self {
        Self {
            alert_type: AlertType::Error,
            message,
            details,
        }
    }

    /// Render the alert as markup for swapping into the alert container.
    pub fn into_markup(self) -> Markup {
        let (container_style, role) = match self.alert_type {
            AlertType::Success => (
                "flex items-start gap-3 p-4 mb-4 rounded-lg border \
                 border-green-300 bg-green-50 text-green-800 \
                 dark:border-green-800 dark:bg-gray-800 dark:text-green-400",
                "status",
            ),
            AlertType::Error => (
                "flex items-start gap-3 p-4 mb-4 rounded-lg border \
                 border-red-300 bg-red-50 text-red-800 \
                 dark:border-red-800 dark:bg-gray-800 dark:text-red-400",
                "alert",
            ),
        };

        html!(
            div class=(container_style) role=(role)
            {
                div class="flex-1 text-sm"
                {
                    p class="font-semibold" { (self.message) }

                    @if !self.details.is_empty() {
                        p { (self.details) }
                    }
                }

                button
                    type="button"
                    class="font-bold cursor-pointer"
                    aria-label="Dismiss"
                    onclick="this.closest('[role]').remove()"
                {
                    "✕"
                }
            }
        )
    }
}

/// Render an alert with the given status code as an HTTP response.
#[inline]
pub fn render(status_code: StatusCode, alert: Alert) -> Response {
    (status_code, alert.into_markup()).into_response()
}

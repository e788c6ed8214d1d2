//! Defines the page for editing an existing expense.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, Path, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use rusqlite::Connection;

use crate::{
    AppState, Error, endpoints,
    html::{BUTTON_PRIMARY_STYLE, FORM_CONTAINER_STYLE, base, link, loading_spinner, rupee_input_styles},
    navigation::NavBar,
};

use super::{
    Expense, ExpenseId,
    core::get_expense,
    form::{ExpenseFormDefaults, expense_form_fields},
};

/// The state needed to display the edit expense page.
#[derive(Debug, Clone)]
pub struct EditExpensePageState {
    /// The database connection for managing expenses.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for EditExpensePageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Display the form for editing the expense `expense_id`.
///
/// Responds with the 404 page if the expense does not exist.
pub async fn get_edit_expense_page(
    State(state): State<EditExpensePageState>,
    Path(expense_id): Path<ExpenseId>,
) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let expense = get_expense(expense_id, &connection)?;

    Ok(edit_expense_page_view(&expense).into_response())
}

fn edit_expense_page_view(expense: &Expense) -> Markup {
    let nav_bar = NavBar::new(endpoints::EDIT_EXPENSE_VIEW).into_html();
    let put_url = endpoints::format_endpoint(endpoints::EXPENSE, expense.id);

    let defaults = ExpenseFormDefaults {
        title: Some(expense.title.as_str()),
        amount: Some(expense.amount),
        category: Some(expense.category),
        date: expense.date,
        autofocus_title: false,
    };

    let content = html!(
        (nav_bar)

        div class=(FORM_CONTAINER_STYLE)
        {
            h1 class="text-xl font-bold leading-tight tracking-tight md:text-2xl my-4"
            {
                "Edit Expense"
            }

            form
                class="w-full space-y-4 md:space-y-6"
                hx-put=(put_url)
                hx-target-error="#alert-container"
                hx-disabled-elt="find button"
            {
                (expense_form_fields(&defaults))

                // The revision this form was rendered from. A submission
                // carrying an outdated revision is rejected instead of
                // overwriting a newer edit.
                input type="hidden" name="revision" value=(expense.revision);

                button
                    type="submit"
                    class=(BUTTON_PRIMARY_STYLE)
                {
                    (loading_spinner())
                    "Save changes"
                }
            }

            p class="my-4"
            {
                (link(endpoints::DASHBOARD_VIEW, "Back to the dashboard"))
            }
        }
    );

    base("Edit Expense", &[rupee_input_styles()], &content)
}

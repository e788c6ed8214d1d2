//! Defines the page for recording a new expense.

use axum::{
    extract::{FromRef, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};

use crate::{
    AppState, endpoints,
    html::{BUTTON_PRIMARY_STYLE, FORM_CONTAINER_STYLE, base, link, loading_spinner, rupee_input_styles},
    navigation::NavBar,
    timezone::local_today,
};

use super::form::{ExpenseFormDefaults, expense_form_fields};

/// The state needed to display the new expense page.
#[derive(Debug, Clone)]
pub struct CreateExpensePageState {
    /// The local timezone as a canonical timezone name, e.g. "Asia/Kolkata".
    pub local_timezone: String,
}

impl FromRef<AppState> for CreateExpensePageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            local_timezone: state.local_timezone.clone(),
        }
    }
}

/// Display the form for recording a new expense.
pub async fn get_create_expense_page(State(state): State<CreateExpensePageState>) -> Response {
    let today = match local_today(&state.local_timezone) {
        Ok(today) => today,
        Err(error) => return error.into_response(),
    };

    let defaults = ExpenseFormDefaults {
        title: None,
        amount: None,
        category: None,
        date: today,
        autofocus_title: true,
    };

    create_expense_page_view(&defaults).into_response()
}

fn create_expense_page_view(defaults: &ExpenseFormDefaults<'_>) -> Markup {
    let nav_bar = NavBar::new(endpoints::NEW_EXPENSE_VIEW).into_html();

    let content = html!(
        (nav_bar)

        div class=(FORM_CONTAINER_STYLE)
        {
            h1 class="text-xl font-bold leading-tight tracking-tight md:text-2xl my-4"
            {
                "New Expense"
            }

            form
                class="w-full space-y-4 md:space-y-6"
                hx-post=(endpoints::EXPENSES_API)
                hx-target-error="#alert-container"
                hx-disabled-elt="find button"
            {
                (expense_form_fields(defaults))

                button
                    type="submit"
                    class=(BUTTON_PRIMARY_STYLE)
                {
                    (loading_spinner())
                    "Save expense"
                }
            }

            p class="my-4"
            {
                (link(endpoints::DASHBOARD_VIEW, "Back to the dashboard"))
            }
        }
    );

    base("New Expense", &[rupee_input_styles()], &content)
}

#[cfg(test)]
mod tests {
    use axum::extract::State;
    use scraper::{Html, Selector};

    use super::{CreateExpensePageState, get_create_expense_page};
    use crate::endpoints;

    #[tokio::test]
    async fn page_contains_expense_form() {
        let state = CreateExpensePageState {
            local_timezone: "Etc/UTC".to_owned(),
        };

        let response = get_create_expense_page(State(state)).await;
        let html = parse_html(response).await;

        assert!(
            html.errors.is_empty(),
            "Got HTML parsing errors: {:?}",
            html.errors
        );

        let form_selector =
            Selector::parse(&format!("form[hx-post='{}']", endpoints::EXPENSES_API)).unwrap();
        assert!(
            html.select(&form_selector).next().is_some(),
            "want a form posting to {}",
            endpoints::EXPENSES_API
        );

        for field in ["title", "amount", "date"] {
            let selector = Selector::parse(&format!("input[name={field}]")).unwrap();
            assert!(
                html.select(&selector).next().is_some(),
                "want an input named {field}"
            );
        }

        let category_selector = Selector::parse("select[name=category]").unwrap();
        assert!(html.select(&category_selector).next().is_some());
    }

    async fn parse_html(response: axum::response::Response) -> Html {
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        Html::parse_document(&String::from_utf8_lossy(&body))
    }
}

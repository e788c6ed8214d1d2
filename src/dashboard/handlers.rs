//! Dashboard HTTP handlers and view rendering.
//!
//! This module contains:
//! - The route handlers for the dashboard page and its htmx content partial
//! - The query type carrying the filter and sort state between requests
//! - The view functions assembling cards, charts, controls, and the table
//!
//! The dashboard owns no state of its own. Every request fetches the full
//! expense collection, applies the filter and sort from the query string,
//! and recomputes all derived data from scratch: the summary cards, the
//! category breakdown, and the monthly trend. The filter narrows what the
//! cards, breakdown chart, and table show; the trend chart always covers
//! the full collection.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, Query, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use time::Date;

use crate::{
    AppState, Error,
    category::{ALL_CATEGORIES_LABEL, Category},
    endpoints,
    expense::{
        Expense, get_all_expenses,
        filter::{
            ExpenseFilter, apply_filter, parse_amount_param, parse_category_param,
            parse_date_param,
        },
        sort::{SortOption, sort_expenses},
    },
    html::{
        FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE, HeadElement, LINK_STYLE, base, link,
        rupee_input_styles,
    },
    navigation::NavBar,
    timezone::local_today,
};

use super::{
    aggregation::{Summary, category_totals, summarize},
    cards::summary_cards_view,
    charts::{DashboardChart, category_chart, charts_script, charts_view, trend_chart},
    tables::expense_table,
    trend::monthly_trend,
};

/// The state needed for displaying the dashboard page.
#[derive(Debug, Clone)]
pub struct DashboardState {
    /// The database connection for managing expenses.
    pub db_connection: Arc<Mutex<Connection>>,
    /// The local timezone as a canonical timezone name, e.g. "Asia/Kolkata".
    pub local_timezone: String,
}

impl FromRef<AppState> for DashboardState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            local_timezone: state.local_timezone.clone(),
        }
    }
}

/// The filter and sort state of a dashboard view, as it appears in the
/// query string.
///
/// All values are kept as raw strings and parsed leniently: a malformed
/// value reads as "no filter" rather than failing the request, so a
/// hand-edited URL can never break the page.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardQuery {
    /// The category filter, or the "All Categories" sentinel.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// The minimum amount filter, inclusive.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_amount: Option<String>,
    /// The maximum amount filter, inclusive.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_amount: Option<String>,
    /// The start of the date range filter, inclusive.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,
    /// The end of the date range filter, inclusive.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
    /// The sort option's query value, e.g. "amount-asc".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort: Option<String>,
}

impl DashboardQuery {
    /// The filter criteria described by this query.
    pub(crate) fn filter(&self) -> ExpenseFilter {
        ExpenseFilter {
            category: parse_category_param(self.category.as_deref()),
            min_amount: parse_amount_param(self.min_amount.as_deref()),
            max_amount: parse_amount_param(self.max_amount.as_deref()),
            start_date: parse_date_param(self.start_date.as_deref()),
            end_date: parse_date_param(self.end_date.as_deref()),
        }
    }

    /// The sort option described by this query, falling back to the default
    /// ordering for missing or unrecognised values.
    pub(crate) fn sort_option(&self) -> SortOption {
        self.sort
            .as_deref()
            .and_then(|value| {
                SortOption::ALL
                    .into_iter()
                    .find(|option| option.as_query_value() == value.trim())
            })
            .unwrap_or_default()
    }

    /// Re-encode the query for links that must preserve the view state,
    /// such as the CSV export link.
    pub(crate) fn to_query_string(&self) -> String {
        serde_urlencoded::to_string(self).unwrap_or_default()
    }
}

/// Holds all the data needed to render the dashboard.
struct DashboardData {
    filtered: Vec<Expense>,
    summary: Summary,
    charts: Vec<DashboardChart>,
}

/// Display the dashboard with the summary cards, charts, filter and sort
/// controls, and the expense table.
pub async fn get_dashboard_page(
    State(state): State<DashboardState>,
    Query(query): Query<DashboardQuery>,
) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let nav_bar = NavBar::new(endpoints::DASHBOARD_VIEW);
    let today = local_today(&state.local_timezone)?;

    match build_dashboard_data(&query, today, &connection)? {
        Some(data) => Ok(dashboard_view(nav_bar, &query, &data).into_response()),
        None => Ok(dashboard_no_data_view(nav_bar).into_response()),
    }
}

/// The htmx endpoint behind the filter and sort controls.
///
/// Returns the recomputed dashboard body so the controls can swap it in
/// without a full page load.
pub async fn get_dashboard_content(
    State(state): State<DashboardState>,
    Query(query): Query<DashboardQuery>,
) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    let today = match local_today(&state.local_timezone) {
        Ok(today) => today,
        Err(error) => return error.into_alert_response(),
    };

    match build_dashboard_data(&query, today, &connection) {
        Ok(Some(data)) => dashboard_content(&query, &data).into_response(),
        Ok(None) => no_data_prompt().into_response(),
        Err(error) => {
            tracing::error!("could not build dashboard data: {error}");
            error.into_alert_response()
        }
    }
}

/// Fetches the expense collection and recomputes all derived data.
///
/// # Returns
/// The dashboard data ready for rendering, or `None` if no expenses have
/// been recorded yet.
///
/// # Errors
/// Returns an error if the database queries fail.
fn build_dashboard_data(
    query: &DashboardQuery,
    today: Date,
    connection: &Connection,
) -> Result<Option<DashboardData>, Error> {
    let expenses = get_all_expenses(connection)
        .inspect_err(|error| tracing::error!("could not get expenses: {error}"))?;

    if expenses.is_empty() {
        return Ok(None);
    }

    let filtered = sort_expenses(&apply_filter(&expenses, &query.filter()), query.sort_option());
    let summary = summarize(&filtered);
    let breakdown = category_totals(&filtered);

    // The trend always covers the full collection, so narrowing the filter
    // does not make the six-month history look emptier than it is.
    let trend = monthly_trend(&expenses, today);

    let mut charts = Vec::with_capacity(2);
    if !breakdown.is_empty() {
        charts.push(DashboardChart {
            id: "category-chart",
            options: category_chart(&breakdown).to_string(),
        });
    }
    charts.push(DashboardChart {
        id: "trend-chart",
        options: trend_chart(&trend).to_string(),
    });

    Ok(Some(DashboardData {
        filtered,
        summary,
        charts,
    }))
}

/// Renders the dashboard page when no expenses exist yet.
fn dashboard_no_data_view(nav_bar: NavBar) -> Markup {
    let nav_bar = nav_bar.into_html();

    let content = html!(
        (nav_bar)

        (no_data_prompt())
    );

    base("Dashboard", &[], &content)
}

fn no_data_prompt() -> Markup {
    let new_expense_link = link(endpoints::NEW_EXPENSE_VIEW, "recording your first expense");

    html!(
        div class="flex flex-col items-center px-6 py-8 mx-auto text-gray-900 dark:text-white"
        {
            h2 class="text-xl font-bold"
            {
                "Nothing here yet..."
            }

            p
            {
                "Summaries and charts will show up here once you add some
                expenses. Start by " (new_expense_link) "."
            }
        }
    )
}

/// Renders the full dashboard page.
fn dashboard_view(nav_bar: NavBar, query: &DashboardQuery, data: &DashboardData) -> Markup {
    let nav_bar = nav_bar.into_html();

    let content = html!(
        (nav_bar)

        div
            id="dashboard-content"
            class="flex flex-col items-center px-2 lg:px-6 lg:py-8 mx-auto
                max-w-screen-xl text-gray-900 dark:text-white"
        {
            (dashboard_content(query, data))
        }
    );

    let head_elements = [
        HeadElement::ScriptLink(
            "https://cdn.jsdelivr.net/npm/echarts@6.0.0/dist/echarts.min.js".to_owned(),
        ),
        rupee_input_styles(),
    ];

    base("Dashboard", &head_elements, &content)
}

/// Renders the dashboard body: cards, controls, charts, and the table.
///
/// This is both the body of the full page and the fragment swapped in by
/// the filter and sort controls.
fn dashboard_content(query: &DashboardQuery, data: &DashboardData) -> Markup {
    let filter = query.filter();

    html!(
        (summary_cards_view(&data.summary, data.filtered.len()))

        (filter_controls(query, &filter))

        (charts_view(&data.charts))

        (expense_table(&data.filtered))

        (charts_script(&data.charts))
    )
}

/// Renders the filter and sort controls with the export and add links.
fn filter_controls(query: &DashboardQuery, filter: &ExpenseFilter) -> Markup {
    let sort_option = query.sort_option();
    let export_url = {
        let query_string = query.to_query_string();

        if query_string.is_empty() {
            endpoints::EXPORT_CSV.to_owned()
        } else {
            format!("{}?{}", endpoints::EXPORT_CSV, query_string)
        }
    };

    html!(
        section id="filter-controls" class="w-full mx-auto mb-4"
        {
            div class="flex items-center justify-between mb-2"
            {
                h3 class="text-xl font-semibold"
                {
                    "Filter"

                    @if filter.active_count() > 0 {
                        " "
                        span
                            class="inline-flex h-6 w-6 items-center justify-center
                                rounded-full bg-blue-600 text-xs text-white align-middle"
                        {
                            (filter.active_count())
                        }
                    }
                }

                div class="flex gap-4"
                {
                    @if !filter.is_empty() {
                        a href=(endpoints::DASHBOARD_VIEW) class=(LINK_STYLE) { "Clear filters" }
                    }

                    a href=(export_url) class=(LINK_STYLE) download { "Export CSV" }

                    a href=(endpoints::NEW_EXPENSE_VIEW) class=(LINK_STYLE) { "Add Expense" }
                }
            }

            form
                hx-get=(endpoints::DASHBOARD_CONTENT)
                hx-target="#dashboard-content"
                hx-swap="innerHTML"
                hx-trigger="change, submit"
                class="grid gap-4 md:grid-cols-3 xl:grid-cols-6
                    bg-gray-50 dark:bg-gray-800 p-4 rounded-lg"
            {
                div
                {
                    label for="category" class=(FORM_LABEL_STYLE) { "Category" }

                    select name="category" id="category" class=(FORM_TEXT_INPUT_STYLE)
                    {
                        option
                            value=(ALL_CATEGORIES_LABEL)
                            selected[filter.category.is_none()]
                        {
                            (ALL_CATEGORIES_LABEL)
                        }

                        @for category in Category::ALL {
                            option value=(category) selected[filter.category == Some(category)]
                            {
                                (category)
                            }
                        }
                    }
                }

                div
                {
                    label for="min_amount" class=(FORM_LABEL_STYLE) { "Min Amount (₹)" }

                    div class="input-wrapper w-full"
                    {
                        input
                            name="min_amount"
                            id="min_amount"
                            type="number"
                            step="0.01"
                            min="0"
                            placeholder="0"
                            value=[query.min_amount.as_deref()]
                            class=(FORM_TEXT_INPUT_STYLE);
                    }
                }

                div
                {
                    label for="max_amount" class=(FORM_LABEL_STYLE) { "Max Amount (₹)" }

                    div class="input-wrapper w-full"
                    {
                        input
                            name="max_amount"
                            id="max_amount"
                            type="number"
                            step="0.01"
                            min="0"
                            placeholder="No limit"
                            value=[query.max_amount.as_deref()]
                            class=(FORM_TEXT_INPUT_STYLE);
                    }
                }

                div
                {
                    label for="start_date" class=(FORM_LABEL_STYLE) { "From" }

                    input
                        name="start_date"
                        id="start_date"
                        type="date"
                        value=[query.start_date.as_deref()]
                        class=(FORM_TEXT_INPUT_STYLE);
                }

                div
                {
                    label for="end_date" class=(FORM_LABEL_STYLE) { "To" }

                    input
                        name="end_date"
                        id="end_date"
                        type="date"
                        value=[query.end_date.as_deref()]
                        class=(FORM_TEXT_INPUT_STYLE);
                }

                div
                {
                    label for="sort" class=(FORM_LABEL_STYLE) { "Sort by" }

                    select name="sort" id="sort" class=(FORM_TEXT_INPUT_STYLE)
                    {
                        @for option in SortOption::ALL {
                            option
                                value=(option.as_query_value())
                                selected[option == sort_option]
                            {
                                (option.label())
                            }
                        }
                    }
                }
            }
        }
    )
}

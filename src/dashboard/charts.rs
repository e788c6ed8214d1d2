//! Chart generation and rendering for the dashboard.
//!
//! This module creates the two ECharts visualizations:
//! - **Category Chart**: a pie chart of the filtered expenses grouped by category
//! - **Trend Chart**: monthly totals over the trailing six months
//!
//! Each chart is generated as JSON configuration for the ECharts library and
//! rendered with a corresponding HTML container and initialization script.
//! The script lives next to the containers so that it also runs after htmx
//! swaps in recomputed dashboard content.

use charming::{
    Chart,
    component::{Axis, Grid, Title},
    element::{
        AreaStyle, AxisLabel, AxisPointer, AxisPointerType, AxisType, JsFunction, Tooltip, Trigger,
    },
    series::{Line, Pie},
};
use maud::{Markup, PreEscaped, html};

use super::{aggregation::CategoryTotal, trend::MonthBucket};

/// A dashboard chart with its HTML container ID and ECharts configuration.
pub(super) struct DashboardChart {
    /// The HTML element ID to use for the chart (kebab-case)
    pub id: &'static str,
    /// The ECharts configuration as a JSON string
    pub options: String,
}

/// Renders the HTML containers for the dashboard charts.
pub(super) fn charts_view(charts: &[DashboardChart]) -> Markup {
    html!(
        section
            id="charts"
            class="w-full mx-auto mb-4"
        {
            div class="grid grid-cols-1 xl:grid-cols-2 gap-4"
            {
                @for chart in charts {
                    div
                        id=(chart.id)
                        class="min-h-[380px] rounded bg-white dark:bg-gray-100"
                    {}
                }
            }
        }
    )
}

/// Generates the JavaScript that initializes the dashboard charts.
///
/// The charts are initialized immediately rather than on `DOMContentLoaded`
/// because this script is emitted after the container elements, and it must
/// also run when htmx swaps recomputed content into a page that finished
/// loading long ago.
pub(super) fn charts_script(charts: &[DashboardChart]) -> Markup {
    let script_content = charts
        .iter()
        .map(|chart| {
            format!(
                r#"(function() {{
                    const chartDom = document.getElementById("{}");
                    const chart = echarts.init(chartDom);
                    chart.setOption({});

                    window.addEventListener('resize', chart.resize);
                }})();"#,
                chart.id, chart.options
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    html!( script { (PreEscaped(script_content)) } )
}

/// The pie chart of the filtered expenses grouped by category.
pub(super) fn category_chart(totals: &[CategoryTotal]) -> Chart {
    let data: Vec<(f64, &str)> = totals
        .iter()
        .map(|group| (group.total, group.category.as_str()))
        .collect();

    Chart::new()
        .title(
            Title::new()
                .text("Spending by Category")
                .subtext("Filtered expenses"),
        )
        .tooltip(
            Tooltip::new()
                .trigger(Trigger::Item)
                .value_formatter(currency_formatter()),
        )
        .series(Pie::new().name("Amount").radius("65%").data(data))
}

/// The line chart of monthly totals over the trailing six months.
pub(super) fn trend_chart(buckets: &[MonthBucket]) -> Chart {
    let labels: Vec<String> = buckets.iter().map(|bucket| bucket.label.clone()).collect();
    let values: Vec<f64> = buckets.iter().map(|bucket| bucket.total).collect();

    Chart::new()
        .title(
            Title::new()
                .text("Monthly Trends")
                .subtext("Last six months, all expenses"),
        )
        .tooltip(currency_tooltip())
        .grid(
            Grid::new()
                .left("3%")
                .right("4%")
                .bottom("3%")
                .contain_label(true),
        )
        .x_axis(Axis::new().type_(AxisType::Category).data(labels))
        .y_axis(
            Axis::new()
                .type_(AxisType::Value)
                .axis_label(AxisLabel::new().formatter(currency_formatter())),
        )
        .series(
            Line::new()
                .name("Total Expenses")
                .area_style(AreaStyle::new())
                .data(values),
        )
}

#[inline]
fn currency_formatter() -> JsFunction {
    JsFunction::new_with_args(
        "number",
        "const currencyFormatter = new Intl.NumberFormat('en-IN', {
              style: 'currency',
              currency: 'INR'
            });
            return (number) ? currencyFormatter.format(number) : \"-\";",
    )
}

/// Creates a tooltip configuration for currency values
fn currency_tooltip() -> Tooltip {
    Tooltip::new()
        .trigger(Trigger::Axis)
        .value_formatter(currency_formatter())
        .axis_pointer(AxisPointer::new().type_(AxisPointerType::Shadow))
}

#[cfg(test)]
mod tests {
    use time::macros::date;

    use super::{DashboardChart, category_chart, charts_script, charts_view, trend_chart};
    use crate::{
        category::Category,
        dashboard::{aggregation::category_totals, trend::monthly_trend},
        expense::test_utils::create_test_expense,
    };

    #[test]
    fn category_chart_includes_every_group() {
        let expenses = vec![
            create_test_expense(1, "Groceries", 100.0, Category::Food, date!(2024 - 01 - 10)),
            create_test_expense(
                2,
                "Bus pass",
                50.0,
                Category::Transportation,
                date!(2024 - 01 - 15),
            ),
        ];
        let totals = category_totals(&expenses);

        let options = category_chart(&totals).to_string();

        assert!(options.contains("Food"), "want Food slice in {options}");
        assert!(
            options.contains("Transportation"),
            "want Transportation slice in {options}"
        );
    }

    #[test]
    fn trend_chart_includes_month_labels_and_totals() {
        let expenses = vec![create_test_expense(
            1,
            "Course fee",
            30.0,
            Category::Education,
            date!(2024 - 02 - 20),
        )];
        let buckets = monthly_trend(&expenses, date!(2024 - 06 - 15));

        let options = trend_chart(&buckets).to_string();

        assert!(
            options.contains("Feb 2024"),
            "want Feb 2024 label in {options}"
        );
        assert!(options.contains("30"), "want bucket total in {options}");
    }

    #[test]
    fn charts_view_renders_a_container_per_chart() {
        let charts = [
            DashboardChart {
                id: "category-chart",
                options: "{}".to_owned(),
            },
            DashboardChart {
                id: "trend-chart",
                options: "{}".to_owned(),
            },
        ];

        let markup = charts_view(&charts).into_string();

        assert!(markup.contains("id=\"category-chart\""));
        assert!(markup.contains("id=\"trend-chart\""));
    }

    #[test]
    fn charts_script_initializes_each_chart() {
        let charts = [DashboardChart {
            id: "trend-chart",
            options: "{\"series\":[]}".to_owned(),
        }];

        let markup = charts_script(&charts).into_string();

        assert!(markup.contains("getElementById(\"trend-chart\")"));
        assert!(markup.contains("echarts.init"));
    }
}

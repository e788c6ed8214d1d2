//! The summary stat cards at the top of the dashboard.

use maud::{Markup, html};

use crate::html::format_currency;

use super::aggregation::Summary;

const CARD_STYLE: &str = "bg-white dark:bg-gray-800 border border-gray-200 \
    dark:border-gray-700 rounded-lg p-4 shadow-md";

/// Renders the three summary cards: total, average, and highest expense.
///
/// The statistics describe the filtered collection, so `expense_count` is
/// the number of expenses that matched the active filters.
pub(super) fn summary_cards_view(summary: &Summary, expense_count: usize) -> Markup {
    let expense_noun = if expense_count == 1 {
        "expense"
    } else {
        "expenses"
    };

    let highest_description = if summary.highest.title.is_empty() {
        "No expenses yet"
    } else {
        summary.highest.title.as_str()
    };

    html! {
        section id="summary-cards" class="w-full mx-auto mb-4" {
            div class="grid grid-cols-1 sm:grid-cols-3 gap-4" {
                (summary_card(
                    "Total Expenses",
                    &format_currency(summary.total),
                    &format!("{expense_count} {expense_noun}"),
                ))

                (summary_card(
                    "Average Expense",
                    &format_currency(summary.average),
                    &format!("Across {} categories", summary.category_count),
                ))

                (summary_card(
                    "Highest Expense",
                    &format_currency(summary.highest.amount),
                    highest_description,
                ))
            }
        }
    }
}

/// Renders a single stat card with a title, a large value, and a
/// description line.
fn summary_card(title: &str, value: &str, description: &str) -> Markup {
    html! {
        div class=(CARD_STYLE) {
            h4 class="text-sm font-medium text-gray-600 dark:text-gray-400 mb-2" {
                (title)
            }

            div class="text-3xl font-bold mb-1" {
                (value)
            }

            div class="text-sm text-gray-600 dark:text-gray-400 truncate" title=(description) {
                (description)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use scraper::{Html, Selector};

    use super::summary_cards_view;
    use crate::dashboard::aggregation::{HighestExpense, Summary};

    fn parse(markup: maud::Markup) -> Html {
        Html::parse_fragment(&markup.into_string())
    }

    #[test]
    fn renders_three_cards_with_values() {
        let summary = Summary {
            total: 150.0,
            average: 75.0,
            highest: HighestExpense {
                amount: 100.0,
                title: "Groceries".to_owned(),
            },
            category_count: 2,
        };

        let html = parse(summary_cards_view(&summary, 2));

        let value_selector = Selector::parse("div.text-3xl").unwrap();
        let values: Vec<String> = html
            .select(&value_selector)
            .map(|value| value.text().collect())
            .collect();
        assert_eq!(values, vec!["₹150.00", "₹75.00", "₹100.00"]);

        let text = html.root_element().text().collect::<String>();
        assert!(text.contains("2 expenses"), "want expense count in {text}");
        assert!(
            text.contains("Across 2 categories"),
            "want category count in {text}"
        );
        assert!(text.contains("Groceries"), "want highest title in {text}");
    }

    #[test]
    fn empty_summary_shows_placeholder_for_highest() {
        let summary = Summary {
            total: 0.0,
            average: 0.0,
            highest: HighestExpense {
                amount: 0.0,
                title: String::new(),
            },
            category_count: 0,
        };

        let html = parse(summary_cards_view(&summary, 0));

        let text = html.root_element().text().collect::<String>();
        assert!(
            text.contains("No expenses yet"),
            "want placeholder text in {text}"
        );
        assert!(text.contains("0 expenses"), "want zero count in {text}");
    }
}

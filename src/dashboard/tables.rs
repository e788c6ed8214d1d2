//! The expense table on the dashboard.

use maud::{Markup, html};

use crate::{
    endpoints,
    expense::Expense,
    html::{
        BUTTON_DELETE_STYLE, CATEGORY_BADGE_STYLE, LINK_STYLE, TABLE_CELL_STYLE,
        TABLE_HEADER_STYLE, TABLE_ROW_STYLE, format_currency,
    },
};

/// Renders the filtered, sorted expenses as a table with per-row edit and
/// delete actions.
pub(super) fn expense_table(expenses: &[Expense]) -> Markup {
    html!(
        section id="expense-table" class="w-full mx-auto mb-4 overflow-x-auto shadow-md rounded-lg"
        {
            table class="w-full text-sm text-left text-gray-500 dark:text-gray-400"
            {
                thead class=(TABLE_HEADER_STYLE)
                {
                    tr
                    {
                        th scope="col" class=(TABLE_CELL_STYLE) { "Date" }
                        th scope="col" class=(TABLE_CELL_STYLE) { "Title" }
                        th scope="col" class=(TABLE_CELL_STYLE) { "Category" }
                        th scope="col" class=(TABLE_CELL_STYLE) { "Amount" }
                        th scope="col" class=(TABLE_CELL_STYLE) { span class="sr-only" { "Actions" } }
                    }
                }

                tbody
                {
                    @if expenses.is_empty() {
                        tr class=(TABLE_ROW_STYLE)
                        {
                            td class=(TABLE_CELL_STYLE) colspan="5"
                            {
                                "No expenses match the current filters."
                            }
                        }
                    }

                    @for expense in expenses {
                        (expense_table_row(expense))
                    }
                }
            }
        }
    )
}

fn expense_table_row(expense: &Expense) -> Markup {
    let edit_url = endpoints::format_endpoint(endpoints::EDIT_EXPENSE_VIEW, expense.id);
    let delete_url = endpoints::format_endpoint(endpoints::EXPENSE, expense.id);

    html!(
        tr class=(TABLE_ROW_STYLE)
        {
            td class=(TABLE_CELL_STYLE) { (expense.date) }

            td class=(TABLE_CELL_STYLE) { (expense.title) }

            td class=(TABLE_CELL_STYLE)
            {
                span class=(CATEGORY_BADGE_STYLE) { (expense.category) }
            }

            td class=(TABLE_CELL_STYLE) { (format_currency(expense.amount)) }

            td class=(TABLE_CELL_STYLE)
            {
                div class="flex gap-4"
                {
                    a href=(edit_url) class=(LINK_STYLE) { "Edit" }

                    button
                        type="button"
                        class=(BUTTON_DELETE_STYLE)
                        hx-delete=(delete_url)
                        hx-target="closest tr"
                        hx-swap="outerHTML"
                        hx-confirm=(format!("Delete \"{}\"?", expense.title))
                        hx-target-error="#alert-container"
                    {
                        "Delete"
                    }
                }
            }
        }
    )
}

#[cfg(test)]
mod tests {
    use scraper::{Html, Selector};
    use time::macros::date;

    use super::expense_table;
    use crate::{category::Category, expense::test_utils::create_test_expense};

    #[test]
    fn renders_a_row_per_expense() {
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

        let html = Html::parse_fragment(&expense_table(&expenses).into_string());

        let row_selector = Selector::parse("tbody tr").unwrap();
        assert_eq!(html.select(&row_selector).count(), 2);

        let edit_selector = Selector::parse("a[href='/expenses/1/edit']").unwrap();
        assert!(html.select(&edit_selector).next().is_some());

        let delete_selector = Selector::parse("button[hx-delete='/api/expenses/2']").unwrap();
        assert!(html.select(&delete_selector).next().is_some());
    }

    #[test]
    fn empty_collection_shows_placeholder_row() {
        let html = Html::parse_fragment(&expense_table(&[]).into_string());

        let text = html.root_element().text().collect::<String>();
        assert!(
            text.contains("No expenses match the current filters."),
            "want placeholder row in {text}"
        );
    }
}

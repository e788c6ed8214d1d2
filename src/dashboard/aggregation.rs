//! Summary statistics and category grouping for the dashboard.
//!
//! Provides the derivations behind the stat cards and the category
//! breakdown chart. Everything here is recomputed from scratch on every
//! request; nothing derived is ever stored.

use std::collections::{HashMap, HashSet};

use crate::{category::Category, expense::Expense};

/// The headline statistics shown in the dashboard cards.
#[derive(Debug, PartialEq)]
pub(super) struct Summary {
    /// Sum of all amounts.
    pub total: f64,
    /// Mean amount, zero for an empty collection.
    pub average: f64,
    /// The largest single expense.
    pub highest: HighestExpense,
    /// How many distinct categories appear in the collection.
    pub category_count: usize,
}

/// The largest single expense in a collection.
#[derive(Debug, PartialEq)]
pub(super) struct HighestExpense {
    /// The amount of the largest expense, zero if the collection is empty.
    pub amount: f64,
    /// The title of the largest expense, empty if the collection is empty.
    pub title: String,
}

/// Compute the summary statistics over `expenses`.
///
/// An empty collection yields all-zero statistics rather than NaN from the
/// zero division. When several expenses tie for the largest amount, the
/// first one encountered wins.
pub(super) fn summarize(expenses: &[Expense]) -> Summary {
    if expenses.is_empty() {
        return Summary {
            total: 0.0,
            average: 0.0,
            highest: HighestExpense {
                amount: 0.0,
                title: String::new(),
            },
            category_count: 0,
        };
    }

    let total: f64 = expenses.iter().map(|expense| expense.amount).sum();
    let average = total / expenses.len() as f64;

    let mut highest = HighestExpense {
        amount: 0.0,
        title: String::new(),
    };
    for expense in expenses {
        // Strictly greater, so an equal amount later in the collection does
        // not replace the first maximum.
        if expense.amount > highest.amount {
            highest = HighestExpense {
                amount: expense.amount,
                title: expense.title.to_string(),
            };
        }
    }

    let categories: HashSet<Category> = expenses.iter().map(|expense| expense.category).collect();

    Summary {
        total,
        average,
        highest,
        category_count: categories.len(),
    }
}

/// A category with its summed amount.
#[derive(Debug, PartialEq)]
pub(super) struct CategoryTotal {
    pub category: Category,
    pub total: f64,
}

/// Group `expenses` by category and sum the amounts.
///
/// Only categories that actually appear are returned, largest total first.
/// Equal totals fall back to the category label so the order is
/// deterministic.
pub(super) fn category_totals(expenses: &[Expense]) -> Vec<CategoryTotal> {
    let mut totals: HashMap<Category, f64> = HashMap::new();

    for expense in expenses {
        *totals.entry(expense.category).or_insert(0.0) += expense.amount;
    }

    let mut grouped: Vec<CategoryTotal> = totals
        .into_iter()
        .map(|(category, total)| CategoryTotal { category, total })
        .collect();

    grouped.sort_by(|a, b| {
        b.total
            .total_cmp(&a.total)
            .then_with(|| a.category.as_str().cmp(b.category.as_str()))
    });

    grouped
}

#[cfg(test)]
mod summarize_tests {
    use time::macros::date;

    use super::summarize;
    use crate::{category::Category, expense::test_utils::create_test_expense};

    #[test]
    fn empty_collection_yields_zeroes() {
        let summary = summarize(&[]);

        assert_eq!(summary.total, 0.0);
        assert_eq!(summary.average, 0.0);
        assert_eq!(summary.highest.amount, 0.0);
        assert_eq!(summary.highest.title, "");
        assert_eq!(summary.category_count, 0);
    }

    #[test]
    fn sums_and_averages_amounts() {
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

        let summary = summarize(&expenses);

        assert_eq!(summary.total, 150.0);
        assert_eq!(summary.average, 75.0);
        assert_eq!(summary.highest.amount, 100.0);
        assert_eq!(summary.highest.title, "Groceries");
        assert_eq!(summary.category_count, 2);
    }

    #[test]
    fn first_of_equal_maximum_amounts_wins() {
        let expenses = vec![
            create_test_expense(1, "First big one", 80.0, Category::Shopping, date!(2024 - 01 - 01)),
            create_test_expense(2, "Second big one", 80.0, Category::Housing, date!(2024 - 01 - 02)),
            create_test_expense(3, "Small one", 5.0, Category::Food, date!(2024 - 01 - 03)),
        ];

        let summary = summarize(&expenses);

        assert_eq!(summary.highest.title, "First big one");
    }

    #[test]
    fn counts_distinct_categories_once() {
        let expenses = vec![
            create_test_expense(1, "Breakfast", 8.0, Category::Food, date!(2024 - 01 - 01)),
            create_test_expense(2, "Lunch", 12.0, Category::Food, date!(2024 - 01 - 01)),
            create_test_expense(3, "Dinner", 20.0, Category::Food, date!(2024 - 01 - 01)),
            create_test_expense(4, "Power bill", 60.0, Category::Utilities, date!(2024 - 01 - 02)),
        ];

        let summary = summarize(&expenses);

        assert_eq!(summary.category_count, 2);
    }
}

#[cfg(test)]
mod category_totals_tests {
    use time::macros::date;

    use super::category_totals;
    use crate::{category::Category, expense::test_utils::create_test_expense};

    #[test]
    fn empty_collection_yields_no_groups() {
        assert!(category_totals(&[]).is_empty());
    }

    #[test]
    fn sums_per_category_and_orders_by_total_descending() {
        let expenses = vec![
            create_test_expense(1, "Breakfast", 10.0, Category::Food, date!(2024 - 01 - 01)),
            create_test_expense(2, "Lunch", 15.0, Category::Food, date!(2024 - 01 - 02)),
            create_test_expense(3, "Train", 40.0, Category::Transportation, date!(2024 - 01 - 03)),
            create_test_expense(4, "Movie", 12.0, Category::Entertainment, date!(2024 - 01 - 04)),
        ];

        let got = category_totals(&expenses);

        let got_pairs: Vec<_> = got
            .iter()
            .map(|group| (group.category, group.total))
            .collect();
        assert_eq!(
            got_pairs,
            vec![
                (Category::Transportation, 40.0),
                (Category::Food, 25.0),
                (Category::Entertainment, 12.0),
            ]
        );
    }

    #[test]
    fn equal_totals_order_by_label() {
        let expenses = vec![
            create_test_expense(1, "Rent", 50.0, Category::Housing, date!(2024 - 01 - 01)),
            create_test_expense(2, "Doctor", 50.0, Category::Health, date!(2024 - 01 - 02)),
        ];

        let got = category_totals(&expenses);

        assert_eq!(got[0].category, Category::Health);
        assert_eq!(got[1].category, Category::Housing);
    }
}

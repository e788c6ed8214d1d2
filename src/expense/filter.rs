//! In-memory filtering of the expense collection.
//!
//! Filtering happens over the full fetched collection rather than in SQL so
//! that every dashboard widget derives from the same in-memory snapshot.
//! All predicates are optional and combined with AND semantics.

use time::Date;

use crate::{
    category::{ALL_CATEGORIES_LABEL, Category},
    expense::{Expense, core::DATE_INPUT_FORMAT},
};

/// The active filter criteria for a dashboard view.
///
/// A `None` field means that predicate is skipped. The criteria have no
/// persistent identity and are rebuilt from the query string on every
/// request.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct ExpenseFilter {
    /// Only include expenses with this category.
    pub category: Option<Category>,
    /// Only include expenses with at least this amount (inclusive).
    pub min_amount: Option<f64>,
    /// Only include expenses with at most this amount (inclusive).
    pub max_amount: Option<f64>,
    /// Only include expenses dated on or after this date.
    pub start_date: Option<Date>,
    /// Only include expenses dated on or before this date.
    pub end_date: Option<Date>,
}

impl ExpenseFilter {
    /// Whether no predicate is active.
    pub fn is_empty(&self) -> bool {
        self.active_count() == 0
    }

    /// The number of active predicates, shown as a badge on the filter
    /// controls.
    pub fn active_count(&self) -> usize {
        [
            self.category.is_some(),
            self.min_amount.is_some(),
            self.max_amount.is_some(),
            self.start_date.is_some(),
            self.end_date.is_some(),
        ]
        .into_iter()
        .filter(|&active| active)
        .count()
    }

    /// Whether `expense` satisfies every active predicate.
    pub fn matches(&self, expense: &Expense) -> bool {
        if let Some(category) = self.category
            && expense.category != category
        {
            return false;
        }

        if let Some(min_amount) = self.min_amount
            && expense.amount < min_amount
        {
            return false;
        }

        if let Some(max_amount) = self.max_amount
            && expense.amount > max_amount
        {
            return false;
        }

        if let Some(start_date) = self.start_date
            && expense.date < start_date
        {
            return false;
        }

        if let Some(end_date) = self.end_date
            && expense.date > end_date
        {
            return false;
        }

        true
    }
}

/// Return the expenses that satisfy every active predicate in `filter`.
///
/// The input slice is left untouched; matching expenses are cloned into a
/// new collection in their original order.
pub fn apply_filter(expenses: &[Expense], filter: &ExpenseFilter) -> Vec<Expense> {
    expenses
        .iter()
        .filter(|expense| filter.matches(expense))
        .cloned()
        .collect()
}

/// Leniently parse a category filter value.
///
/// The "All Categories" sentinel and unrecognised labels both read as no
/// filter. Filter controls should never be able to fail a page load.
pub fn parse_category_param(value: Option<&str>) -> Option<Category> {
    value.and_then(|value| {
        let value = value.trim();

        if value.is_empty() || value == ALL_CATEGORIES_LABEL {
            return None;
        }

        value.parse().ok()
    })
}

/// Leniently parse an amount bound. Malformed numbers read as unset.
pub fn parse_amount_param(value: Option<&str>) -> Option<f64> {
    value
        .and_then(|value| value.trim().parse::<f64>().ok())
        .filter(|amount| amount.is_finite())
}

/// Leniently parse a date bound. Malformed dates read as unset.
pub fn parse_date_param(value: Option<&str>) -> Option<Date> {
    value.and_then(|value| Date::parse(value.trim(), DATE_INPUT_FORMAT).ok())
}


#[cfg(test)]
mod param_tests {
    use time::macros::date;

    use super::{parse_amount_param, parse_category_param, parse_date_param};
    use crate::category::{ALL_CATEGORIES_LABEL, Category};

    #[test]
    fn all_categories_sentinel_reads_as_unset() {
        assert_eq!(parse_category_param(Some(ALL_CATEGORIES_LABEL)), None);
    }

    #[test]
    fn known_category_parses() {
        assert_eq!(
            parse_category_param(Some("Housing")),
            Some(Category::Housing)
        );
    }

    #[test]
    fn unknown_category_reads_as_unset() {
        assert_eq!(parse_category_param(Some("Snacks")), None);
    }

    #[test]
    fn malformed_amount_reads_as_unset() {
        assert_eq!(parse_amount_param(Some("abc")), None);
        assert_eq!(parse_amount_param(Some("")), None);
        assert_eq!(parse_amount_param(Some("NaN")), None);
        assert_eq!(parse_amount_param(None), None);
    }

    #[test]
    fn well_formed_amount_parses() {
        assert_eq!(parse_amount_param(Some("12.50")), Some(12.5));
        assert_eq!(parse_amount_param(Some(" 100 ")), Some(100.0));
    }

    #[test]
    fn malformed_date_reads_as_unset() {
        assert_eq!(parse_date_param(Some("yesterday")), None);
        assert_eq!(parse_date_param(Some("2024-13-01")), None);
        assert_eq!(parse_date_param(None), None);
    }

    #[test]
    fn well_formed_date_parses() {
        assert_eq!(parse_date_param(Some("2024-01-15")), Some(date!(2024 - 01 - 15)));
    }
}

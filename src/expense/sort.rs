//! Sort options for the expense collection.

use serde::{Deserialize, Serialize};

use crate::expense::Expense;

/// One of the six fixed orderings the dashboard offers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SortOption {
    /// Most recent date first. The default ordering.
    #[default]
    DateDesc,
    /// Oldest date first.
    DateAsc,
    /// Largest amount first.
    AmountDesc,
    /// Smallest amount first.
    AmountAsc,
    /// Title A to Z.
    TitleAsc,
    /// Title Z to A.
    TitleDesc,
}

impl SortOption {
    /// Every sort option, in the order they are shown in the sort control.
    pub const ALL: [SortOption; 6] = [
        SortOption::DateDesc,
        SortOption::DateAsc,
        SortOption::AmountDesc,
        SortOption::AmountAsc,
        SortOption::TitleAsc,
        SortOption::TitleDesc,
    ];

    /// The value used in query strings and form controls.
    pub fn as_query_value(self) -> &'static str {
        match self {
            SortOption::DateDesc => "date-desc",
            SortOption::DateAsc => "date-asc",
            SortOption::AmountDesc => "amount-desc",
            SortOption::AmountAsc => "amount-asc",
            SortOption::TitleAsc => "title-asc",
            SortOption::TitleDesc => "title-desc",
        }
    }

    /// The human-readable label for the sort control.
    pub fn label(self) -> &'static str {
        match self {
            SortOption::DateDesc => "Date (Newest first)",
            SortOption::DateAsc => "Date (Oldest first)",
            SortOption::AmountDesc => "Amount (Highest first)",
            SortOption::AmountAsc => "Amount (Lowest first)",
            SortOption::TitleAsc => "Title (A-Z)",
            SortOption::TitleDesc => "Title (Z-A)",
        }
    }
}

/// Return a copy of `expenses` ordered by `option`.
///
/// The sort is stable: expenses with equal keys keep their prior relative
/// order. Title comparisons are case-insensitive.
pub fn sort_expenses(expenses: &[Expense], option: SortOption) -> Vec<Expense> {
    let mut sorted = expenses.to_vec();

    match option {
        SortOption::DateDesc => sorted.sort_by(|a, b| b.date.cmp(&a.date)),
        SortOption::DateAsc => sorted.sort_by(|a, b| a.date.cmp(&b.date)),
        SortOption::AmountDesc => sorted.sort_by(|a, b| b.amount.total_cmp(&a.amount)),
        SortOption::AmountAsc => sorted.sort_by(|a, b| a.amount.total_cmp(&b.amount)),
        SortOption::TitleAsc => sorted.sort_by(|a, b| title_key(a).cmp(&title_key(b))),
        SortOption::TitleDesc => sorted.sort_by(|a, b| title_key(b).cmp(&title_key(a))),
    }

    sorted
}

fn title_key(expense: &Expense) -> String {
    expense.title.as_str().to_lowercase()
}
